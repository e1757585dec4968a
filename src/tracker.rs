//! Per-gesture start/current point tracking.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSample {
    pub start: Point,
    pub current: Point,
}

impl GestureSample {
    /// Signed displacement from the start point.
    pub fn delta(&self) -> (f32, f32) {
        (self.current.x - self.start.x, self.current.y - self.start.y)
    }

    pub fn abs_delta(&self) -> (f32, f32) {
        let (dx, dy) = self.delta();
        (dx.abs(), dy.abs())
    }
}

#[derive(Debug, Default)]
pub struct GestureTracker {
    sample: Option<GestureSample>,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, p: Point) {
        self.sample = Some(GestureSample {
            start: p,
            current: p,
        });
    }

    /// Moves without a recorded start are ignored (`None`).
    pub fn update(&mut self, p: Point) -> Option<GestureSample> {
        let s = self.sample.as_mut()?;
        s.current = p;
        Some(*s)
    }

    pub fn end(&mut self) {
        self.sample = None;
    }

    /// Terminate the gesture early after a committed step; later moves are
    /// ignored until the next start.
    pub fn cut(&mut self) {
        self.end();
    }
}
