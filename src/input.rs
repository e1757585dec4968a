//! Host input events and what the host should do with them.

use serde::{Deserialize, Serialize};

use crate::tracker::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    Mouse,
    Pen,
    Touch,
}

fn cancelable_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    TouchStart {
        x: f32,
        y: f32,
    },
    TouchMove {
        x: f32,
        y: f32,
        #[serde(default = "cancelable_default")]
        cancelable: bool,
    },
    TouchEnd,
    TouchCancel,
    PointerDown {
        kind: PointerKind,
        x: f32,
        y: f32,
    },
    PointerMove {
        kind: PointerKind,
        x: f32,
        y: f32,
    },
    PointerUp {
        kind: PointerKind,
        x: f32,
        y: f32,
    },
    Click {
        #[serde(default)]
        href: Option<String>,
    },
    ContextMenu,
    Wheel {
        #[serde(default)]
        dy: f32,
    },
    TransitionStart,
    TransitionEnd,
    ImageLoaded,
    DotClick {
        index: usize,
    },
    Resize,
}

impl InputEvent {
    pub fn name(&self) -> &'static str {
        match self {
            InputEvent::TouchStart { .. } => "touch_start",
            InputEvent::TouchMove { .. } => "touch_move",
            InputEvent::TouchEnd => "touch_end",
            InputEvent::TouchCancel => "touch_cancel",
            InputEvent::PointerDown { .. } => "pointer_down",
            InputEvent::PointerMove { .. } => "pointer_move",
            InputEvent::PointerUp { .. } => "pointer_up",
            InputEvent::Click { .. } => "click",
            InputEvent::ContextMenu => "context_menu",
            InputEvent::Wheel { .. } => "wheel",
            InputEvent::TransitionStart => "transition_start",
            InputEvent::TransitionEnd => "transition_end",
            InputEvent::ImageLoaded => "image_loaded",
            InputEvent::DotClick { .. } => "dot_click",
            InputEvent::Resize => "resize",
        }
    }

    /// Scroll-producing input the page freezes while a carousel animates.
    pub fn scrolls_page(&self) -> bool {
        matches!(self, InputEvent::TouchMove { .. } | InputEvent::Wheel { .. })
    }

    pub fn is_cancelable(&self) -> bool {
        match self {
            InputEvent::TouchMove { cancelable, .. } => *cancelable,
            _ => true,
        }
    }

    pub fn point(&self) -> Option<Point> {
        match self {
            InputEvent::TouchStart { x, y }
            | InputEvent::TouchMove { x, y, .. }
            | InputEvent::PointerDown { x, y, .. }
            | InputEvent::PointerMove { x, y, .. }
            | InputEvent::PointerUp { x, y, .. } => Some(Point::new(*x, *y)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Disposition {
    pub prevent_default: bool,
    pub stop_propagation: bool,
}

impl Disposition {
    pub fn pass() -> Self {
        Self::default()
    }

    pub fn prevent() -> Self {
        Self {
            prevent_default: true,
            stop_propagation: false,
        }
    }

    pub fn swallow() -> Self {
        Self {
            prevent_default: true,
            stop_propagation: true,
        }
    }

    pub fn merge(self, other: Disposition) -> Disposition {
        Disposition {
            prevent_default: self.prevent_default || other.prevent_default,
            stop_propagation: self.stop_propagation || other.stop_propagation,
        }
    }
}
