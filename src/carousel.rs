//! Looped track state: clone-extended slots, current index and wraparound.

use log::{debug, warn};
use serde::Serialize;

use crate::error::CarouselError;
use crate::layout::{LayoutQuery, track_offset};
use crate::render::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot {
    /// Real card shown in this slot.
    pub card: usize,
    pub clone: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Next,
    Prev,
}

impl Step {
    /// Dragging left (negative dx) moves to the next card.
    pub fn from_drag(dx: f32) -> Self {
        if dx < 0.0 { Step::Next } else { Step::Prev }
    }
}

/// Holds initial placement back until every track image has loaded.
#[derive(Debug, Clone, Copy, Default)]
struct ImageGate {
    pending: usize,
    placed: bool,
}

#[derive(Debug)]
pub struct CarouselState {
    slots: Vec<Slot>,
    real_count: usize,
    current: usize,
    start_slot: usize,
    animating: bool,
    gate: ImageGate,
}

impl CarouselState {
    /// `start_card` is clamped to the real range. A single card disables looping.
    pub fn new(real_count: usize, images: usize, start_card: usize) -> Result<Self, CarouselError> {
        if real_count == 0 {
            return Err(CarouselError::EmptyTrack);
        }
        let mut slots: Vec<Slot> = (0..real_count)
            .map(|card| Slot { card, clone: false })
            .collect();
        let start_card = start_card.min(real_count - 1);
        let start_slot = if real_count >= 2 {
            slots.insert(
                0,
                Slot {
                    card: real_count - 1,
                    clone: true,
                },
            );
            slots.push(Slot {
                card: 0,
                clone: true,
            });
            start_card + 1
        } else {
            0
        };
        Ok(Self {
            slots,
            real_count,
            current: start_slot,
            start_slot,
            animating: false,
            gate: ImageGate {
                pending: images,
                placed: false,
            },
        })
    }

    pub fn looping(&self) -> bool {
        self.real_count >= 2
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn real_count(&self) -> usize {
        self.real_count
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn slot(&self, index: usize) -> Option<Slot> {
        self.slots.get(index).copied()
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn set_animating(&mut self, animating: bool) {
        self.animating = animating;
    }

    pub fn is_placed(&self) -> bool {
        self.gate.placed
    }

    /// Dot bound to `current - 1`; none while resting on a clone.
    pub fn active_dot(&self) -> Option<usize> {
        if !self.looping() {
            return Some(self.current);
        }
        self.current
            .checked_sub(1)
            .filter(|dot| *dot < self.real_count)
    }

    pub fn recompute_offset(&self, layout: &dyn LayoutQuery) -> f32 {
        track_offset(self.current, layout)
    }

    fn frame(&self, layout: &dyn LayoutQuery, animate: bool) -> Frame {
        Frame {
            offset: self.recompute_offset(layout),
            animate,
            active_slot: self.current,
            active_dot: self.active_dot(),
        }
    }

    /// Animated move by one slot, clamped to the extended bounds.
    pub fn advance(&mut self, step: Step, layout: &dyn LayoutQuery) -> Option<Frame> {
        if !self.looping() {
            return None;
        }
        let last = self.len() - 1;
        let next = match step {
            Step::Next => (self.current + 1).min(last),
            Step::Prev => self.current.saturating_sub(1),
        };
        if next == self.current {
            return None;
        }
        debug!("advance {:?}: {} -> {}", step, self.current, next);
        self.current = next;
        Some(self.frame(layout, true))
    }

    /// Reposition without animation.
    pub fn jump_to(&mut self, index: usize, layout: &dyn LayoutQuery) -> Result<Frame, CarouselError> {
        if index >= self.len() {
            return Err(CarouselError::SlotOutOfRange {
                index,
                len: self.len(),
            });
        }
        self.current = index;
        Ok(self.frame(layout, false))
    }

    /// Animated move to the slot bound to dot `dot`.
    pub fn select_dot(&mut self, dot: usize, layout: &dyn LayoutQuery) -> Result<Frame, CarouselError> {
        if dot >= self.real_count {
            return Err(CarouselError::DotOutOfRange {
                index: dot,
                count: self.real_count,
            });
        }
        self.current = if self.looping() { dot + 1 } else { dot };
        Ok(self.frame(layout, true))
    }

    /// Silent correction out of a clone slot once a transition has finished.
    pub fn on_transition_settled(&mut self, layout: &dyn LayoutQuery) -> Option<Frame> {
        if !self.looping() {
            return None;
        }
        let last = self.len() - 1;
        let target = if self.current == last {
            1
        } else if self.current == 0 {
            last - 1
        } else {
            return None;
        };
        debug!("wraparound: slot {} -> {}", self.current, target);
        self.jump_to(target, layout).ok()
    }

    /// Silent re-render at the current index, e.g. after a resize.
    pub fn refresh(&self, layout: &dyn LayoutQuery) -> Frame {
        self.frame(layout, false)
    }

    /// Place on the start slot if no images are outstanding. Runs once.
    pub fn place_if_ready(&mut self, layout: &dyn LayoutQuery) -> Option<Frame> {
        if self.gate.placed || self.gate.pending > 0 {
            return None;
        }
        self.gate.placed = true;
        self.jump_to(self.start_slot, layout).ok()
    }

    pub fn image_loaded(&mut self, layout: &dyn LayoutQuery) -> Option<Frame> {
        if self.gate.pending == 0 {
            warn!("image load reported with no images outstanding");
            return None;
        }
        self.gate.pending -= 1;
        self.place_if_ready(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FixedLayout;

    fn layout() -> FixedLayout {
        FixedLayout {
            card_width: 200.0,
            gap: 16.0,
            padding_left: 0.0,
            container_width: 600.0,
        }
    }

    fn five() -> CarouselState {
        let mut c = CarouselState::new(5, 0, 0).unwrap();
        c.place_if_ready(&layout()).unwrap();
        c
    }

    /// Advance and let the transition settle.
    fn step(c: &mut CarouselState, s: Step) {
        c.advance(s, &layout());
        c.on_transition_settled(&layout());
    }

    #[test]
    fn clones_wrap_the_real_cards() {
        let c = CarouselState::new(5, 0, 0).unwrap();
        assert_eq!(c.len(), 7);
        assert_eq!(c.slot(0), Some(Slot { card: 4, clone: true }));
        assert_eq!(c.slot(1), Some(Slot { card: 0, clone: false }));
        assert_eq!(c.slot(6), Some(Slot { card: 0, clone: true }));
        assert_eq!(c.slot(7), None);
    }

    #[test]
    fn empty_track_is_rejected() {
        assert_eq!(CarouselState::new(0, 0, 0).unwrap_err(), CarouselError::EmptyTrack);
    }

    #[test]
    fn single_card_does_not_loop() {
        let mut c = CarouselState::new(1, 0, 3).unwrap();
        assert_eq!(c.len(), 1);
        assert!(c.place_if_ready(&layout()).is_some());
        assert!(c.advance(Step::Next, &layout()).is_none());
        assert!(c.advance(Step::Prev, &layout()).is_none());
        assert!(c.on_transition_settled(&layout()).is_none());
        assert_eq!(c.active_dot(), Some(0));
    }

    #[test]
    fn forward_past_last_real_card_wraps_to_first() {
        let mut c = five();
        assert_eq!(c.current(), 1);
        for _ in 0..4 {
            step(&mut c, Step::Next);
        }
        assert_eq!(c.current(), 5);

        let f = c.advance(Step::Next, &layout()).unwrap();
        assert!(f.animate);
        assert_eq!(f.active_slot, 6);
        assert_eq!(f.active_dot, None);

        let settled = c.on_transition_settled(&layout()).unwrap();
        assert!(!settled.animate);
        assert_eq!(c.current(), 1);
        assert_eq!(settled.active_dot, Some(0));
    }

    #[test]
    fn backward_past_first_real_card_wraps_to_last() {
        let mut c = five();
        c.advance(Step::Prev, &layout()).unwrap();
        assert_eq!(c.current(), 0);
        c.on_transition_settled(&layout()).unwrap();
        assert_eq!(c.current(), 5);
        assert_eq!(c.active_dot(), Some(4));
    }

    #[test]
    fn settled_index_never_rests_on_a_clone() {
        let mut c = five();
        let moves = [Step::Next, Step::Prev, Step::Prev, Step::Prev, Step::Next];
        for i in 0..40 {
            step(&mut c, moves[i % moves.len()]);
            assert!((1..=c.len() - 2).contains(&c.current()));
        }
    }

    #[test]
    fn advance_is_clamped_before_settle() {
        let mut c = five();
        c.jump_to(6, &layout()).unwrap();
        assert!(c.advance(Step::Next, &layout()).is_none());
        c.jump_to(0, &layout()).unwrap();
        assert!(c.advance(Step::Prev, &layout()).is_none());
    }

    #[test]
    fn settle_on_a_real_slot_is_a_noop() {
        let mut c = five();
        assert!(c.on_transition_settled(&layout()).is_none());
        assert_eq!(c.current(), 1);
    }

    #[test]
    fn placement_waits_for_images() {
        let mut c = CarouselState::new(3, 2, 1).unwrap();
        assert!(c.place_if_ready(&layout()).is_none());
        assert!(c.image_loaded(&layout()).is_none());
        let f = c.image_loaded(&layout()).unwrap();
        assert!(!f.animate);
        assert_eq!(f.active_slot, 2);
        assert!(c.is_placed());
        // later loads never re-place
        assert!(c.image_loaded(&layout()).is_none());
        assert!(c.place_if_ready(&layout()).is_none());
    }

    #[test]
    fn start_card_is_clamped() {
        let mut c = CarouselState::new(3, 0, 9).unwrap();
        assert_eq!(c.place_if_ready(&layout()).unwrap().active_slot, 3);
    }

    #[test]
    fn dot_selection_maps_past_the_leading_clone() {
        let mut c = five();
        let f = c.select_dot(3, &layout()).unwrap();
        assert_eq!(f.active_slot, 4);
        assert_eq!(f.active_dot, Some(3));
        assert_eq!(
            c.select_dot(5, &layout()).unwrap_err(),
            CarouselError::DotOutOfRange { index: 5, count: 5 }
        );
    }

    #[test]
    fn jump_out_of_range_is_an_error() {
        let mut c = five();
        assert_eq!(
            c.jump_to(7, &layout()).unwrap_err(),
            CarouselError::SlotOutOfRange { index: 7, len: 7 }
        );
    }

    #[test]
    fn frame_offset_tracks_the_current_slot() {
        let mut c = five();
        // 1 * 216 - 300 + 100
        assert_eq!(c.refresh(&layout()).offset, 16.0);
        let f = c.advance(Step::Next, &layout()).unwrap();
        assert_eq!(f.offset, 232.0);
    }

    #[test]
    fn placement_and_wraparound_are_silent_jumps() {
        let mut c = CarouselState::new(4, 0, 2).unwrap();
        let placed = c.place_if_ready(&layout()).unwrap();
        let mut other = CarouselState::new(4, 0, 2).unwrap();
        assert_eq!(placed, other.jump_to(3, &layout()).unwrap());

        c.jump_to(0, &layout()).unwrap();
        let settled = c.on_transition_settled(&layout()).unwrap();
        assert_eq!(settled, other.jump_to(4, &layout()).unwrap());
        assert!(!settled.animate);
    }
}
