//! Layout measurements the offset math depends on.

use serde::{Deserialize, Serialize};

pub const FALLBACK_GAP_PX: f32 = 16.0;

/// Live measurements of a rendered carousel.
pub trait LayoutQuery {
    fn card_width(&self) -> f32;
    fn gap(&self) -> f32;
    fn padding_left(&self) -> f32;
    fn container_width(&self) -> f32;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedLayout {
    pub card_width: f32,
    #[serde(default = "default_gap")]
    pub gap: f32,
    #[serde(default)]
    pub padding_left: f32,
    pub container_width: f32,
}

fn default_gap() -> f32 {
    FALLBACK_GAP_PX
}

impl LayoutQuery for FixedLayout {
    fn card_width(&self) -> f32 {
        self.card_width
    }
    fn gap(&self) -> f32 {
        self.gap
    }
    fn padding_left(&self) -> f32 {
        self.padding_left
    }
    fn container_width(&self) -> f32 {
        self.container_width
    }
}

/// Translation that centers slot `index` in the container.
pub fn track_offset(index: usize, layout: &dyn LayoutQuery) -> f32 {
    let gap = Some(layout.gap())
        .filter(|g| g.is_finite())
        .unwrap_or(FALLBACK_GAP_PX);
    let padding = Some(layout.padding_left())
        .filter(|p| p.is_finite())
        .unwrap_or(0.0);
    let card = layout.card_width();
    index as f32 * (card + gap) - layout.container_width() / 2.0 + card / 2.0 + padding
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> FixedLayout {
        FixedLayout {
            card_width: 300.0,
            gap: 20.0,
            padding_left: 10.0,
            container_width: 1000.0,
        }
    }

    #[test]
    fn offset_centers_the_slot() {
        // 2 * 320 - 500 + 150 + 10
        assert_eq!(track_offset(2, &layout()), 300.0);
        assert_eq!(track_offset(0, &layout()), -340.0);
    }

    #[test]
    fn offset_grows_by_one_pitch_per_slot() {
        let l = layout();
        assert_eq!(track_offset(5, &l) - track_offset(4, &l), 320.0);
    }

    #[test]
    fn unparseable_gap_and_padding_fall_back() {
        let l = FixedLayout {
            gap: f32::NAN,
            padding_left: f32::NAN,
            ..layout()
        };
        // 1 * (300 + 16) - 500 + 150
        assert_eq!(track_offset(1, &l), -34.0);
    }
}
