//! Visual effects a carousel asks its host surface to apply.

use serde::Serialize;

use crate::config::{Animation, DotStyle, Profile};

/// Render request produced by every index change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub offset: f32,
    pub animate: bool,
    pub active_slot: usize,
    pub active_dot: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    CreateDots {
        carousel: String,
        count: usize,
        container_css: String,
        dot_css: String,
    },
    TrackStyle {
        carousel: String,
        transition: String,
        transform: String,
    },
    ActiveCard {
        carousel: String,
        slot: usize,
    },
    DotColors {
        carousel: String,
        active: Option<usize>,
        colors: Vec<String>,
    },
}

impl Effect {
    /// An animated track move; the host will fire transition events for it.
    pub fn is_animated_move(&self) -> bool {
        matches!(self, Effect::TrackStyle { transition, .. } if transition != "none")
    }
}

pub trait Surface {
    fn apply(&mut self, effect: Effect);
}

/// Surface that only records what it was asked to do.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    effects: Vec<Effect>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn drain(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }
}

impl Surface for RecordingSurface {
    fn apply(&mut self, effect: Effect) {
        self.effects.push(effect);
    }
}

pub fn transform_css(offset: f32) -> String {
    let x = -offset;
    // avoid "-0px"
    let x = if x == 0.0 { 0.0 } else { x };
    format!("translateX({x}px)")
}

pub fn transition_css(animate: bool, animation: &Animation) -> String {
    if !animate {
        return "none".to_string();
    }
    let secs = animation.duration_ms as f64 / 1000.0;
    format!("transform {secs}s {}", animation.easing)
}

pub fn dots_container_css(style: &DotStyle) -> String {
    format!(
        "display: flex; justify-content: center; gap: {}px; margin-top: 16px; padding: 8px 0;",
        style.gap_px
    )
}

pub fn dot_css(style: &DotStyle, active: bool) -> String {
    let color = if active {
        &style.active_color
    } else {
        &style.inactive_color
    };
    format!(
        "width: {s}px; height: {s}px; border-radius: 50%; background-color: {color}; \
         cursor: pointer; transition: background-color 0.3s ease;",
        s = style.size_px
    )
}

/// Turns frames into surface effects for one carousel.
#[derive(Debug, Clone)]
pub struct Renderer {
    carousel: String,
    animation: Animation,
    dots: DotStyle,
}

impl Renderer {
    pub fn new(carousel: &str, profile: &Profile) -> Self {
        Self {
            carousel: carousel.to_string(),
            animation: profile.animation.clone(),
            dots: profile.dots.clone(),
        }
    }

    pub fn mount_dots(&self, count: usize, surface: &mut dyn Surface) {
        surface.apply(Effect::CreateDots {
            carousel: self.carousel.clone(),
            count,
            container_css: dots_container_css(&self.dots),
            dot_css: dot_css(&self.dots, false),
        });
    }

    pub fn render(&self, frame: &Frame, dot_count: usize, surface: &mut dyn Surface) {
        surface.apply(Effect::ActiveCard {
            carousel: self.carousel.clone(),
            slot: frame.active_slot,
        });
        let colors = (0..dot_count)
            .map(|i| {
                if frame.active_dot == Some(i) {
                    self.dots.active_color.clone()
                } else {
                    self.dots.inactive_color.clone()
                }
            })
            .collect();
        surface.apply(Effect::DotColors {
            carousel: self.carousel.clone(),
            active: frame.active_dot,
            colors,
        });
        surface.apply(Effect::TrackStyle {
            carousel: self.carousel.clone(),
            transition: transition_css(frame.animate, &self.animation),
            transform: transform_css(frame.offset),
        });
    }
}
