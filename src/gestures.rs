use log::{debug, trace};
use serde::Serialize;

use crate::config::Thresholds;
use crate::tracker::GestureSample;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    #[default]
    Undetermined,
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GestureState {
    pub locked: bool,
    pub axis: Axis,
}

impl GestureState {
    fn lock(&mut self, axis: Axis) {
        self.locked = true;
        self.axis = axis;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveVerdict {
    pub axis: Axis,
    /// True only on the sample that locked the axis.
    pub newly_locked: bool,
    pub prevent_default: bool,
}

/// Angle of travel folded into `[0, 90]` degrees; 0 is purely horizontal.
pub fn movement_angle(dx: f32, dy: f32) -> f32 {
    let deg = dy.atan2(dx).to_degrees().abs();
    deg.min(180.0 - deg)
}

/// One-shot axis lock-in per gesture.
pub trait AxisClassifier {
    fn begin(&mut self);
    fn classify(&mut self, sample: &GestureSample) -> MoveVerdict;
    fn end(&mut self);
    fn state(&self) -> GestureState;
}

/// `Some(axis)` when one axis dominates the other by `ratio`.
fn ratio_axis(ax: f32, ay: f32, ratio: f32) -> Option<Axis> {
    if ax > ay * ratio {
        Some(Axis::Horizontal)
    } else if ay > ax * ratio {
        Some(Axis::Vertical)
    } else {
        None
    }
}

fn verdict(state: GestureState, newly_locked: bool) -> MoveVerdict {
    MoveVerdict {
        axis: state.axis,
        newly_locked,
        prevent_default: state.axis == Axis::Horizontal,
    }
}

/// Touch input: angle test past `small_px`, then a ratio fallback past `main_px`.
#[derive(Debug)]
pub struct TouchClassifier {
    th: Thresholds,
    state: GestureState,
}

impl TouchClassifier {
    pub fn new(th: Thresholds) -> Self {
        Self {
            th,
            state: GestureState::default(),
        }
    }

    fn by_angle(&self, ax: f32, ay: f32) -> Option<Axis> {
        let angle = movement_angle(ax, ay);
        if angle <= self.th.max_angle_deg {
            Some(Axis::Horizontal)
        } else if angle >= 90.0 - self.th.max_angle_deg {
            Some(Axis::Vertical)
        } else {
            trace!("gray zone at {angle:.1}°, waiting for a clearer sample");
            None
        }
    }
}

impl AxisClassifier for TouchClassifier {
    fn begin(&mut self) {
        self.state = GestureState::default();
    }

    fn classify(&mut self, sample: &GestureSample) -> MoveVerdict {
        if self.state.locked {
            return verdict(self.state, false);
        }
        let (ax, ay) = sample.abs_delta();
        let travel = ax.max(ay);

        let mut decided = None;
        if travel > self.th.small_px {
            decided = self.by_angle(ax, ay);
        }
        if decided.is_none() && travel > self.th.main_px {
            decided = ratio_axis(ax, ay, self.th.touch_ratio);
        }

        match decided {
            Some(axis) => {
                self.state.lock(axis);
                debug!("touch gesture locked {axis:?} (dx={ax:.1}, dy={ay:.1})");
                verdict(self.state, true)
            }
            None => verdict(self.state, false),
        }
    }

    fn end(&mut self) {
        self.state = GestureState::default();
    }

    fn state(&self) -> GestureState {
        self.state
    }
}

/// Mouse and pen input: a single stricter ratio test past `main_px`.
#[derive(Debug)]
pub struct PointerClassifier {
    th: Thresholds,
    state: GestureState,
}

impl PointerClassifier {
    pub fn new(th: Thresholds) -> Self {
        Self {
            th,
            state: GestureState::default(),
        }
    }
}

impl AxisClassifier for PointerClassifier {
    fn begin(&mut self) {
        self.state = GestureState::default();
    }

    fn classify(&mut self, sample: &GestureSample) -> MoveVerdict {
        if self.state.locked {
            return verdict(self.state, false);
        }
        let (ax, ay) = sample.abs_delta();
        if ax.max(ay) <= self.th.main_px {
            return verdict(self.state, false);
        }
        match ratio_axis(ax, ay, self.th.pointer_ratio) {
            Some(axis) => {
                self.state.lock(axis);
                debug!("pointer gesture locked {axis:?} (dx={ax:.1}, dy={ay:.1})");
                verdict(self.state, true)
            }
            None => verdict(self.state, false),
        }
    }

    fn end(&mut self) {
        self.state = GestureState::default();
    }

    fn state(&self) -> GestureState {
        self.state
    }
}
