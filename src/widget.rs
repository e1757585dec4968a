use log::{debug, trace};

use crate::carousel::{CarouselState, Step};
use crate::config::{Profile, Thresholds};
use crate::error::CarouselError;
use crate::gestures::{Axis, AxisClassifier, PointerClassifier, TouchClassifier};
use crate::input::{Disposition, InputEvent, PointerKind};
use crate::layout::LayoutQuery;
use crate::render::{Frame, Renderer, Surface};
use crate::tracker::{GestureSample, GestureTracker};

/// One carousel on the page: gesture handling wired to its loop state.
#[derive(Debug)]
pub struct CarouselWidget {
    id: String,
    state: CarouselState,
    th: Thresholds,
    touch: TouchClassifier,
    pointer: PointerClassifier,
    touch_track: GestureTracker,
    pointer_track: GestureTracker,
    /// Finger or button currently down.
    pressed: bool,
    /// Last interaction crossed the drag threshold; the next click is eaten.
    dragged: bool,
    renderer: Renderer,
}

impl CarouselWidget {
    pub fn new(id: &str, cards: usize, images: usize, profile: &Profile) -> Result<Self, CarouselError> {
        let th = profile.thresholds_for(id);
        Ok(Self {
            id: id.to_string(),
            state: CarouselState::new(cards, images, profile.placement.start_card)?,
            touch: TouchClassifier::new(th.clone()),
            pointer: PointerClassifier::new(th.clone()),
            th,
            touch_track: GestureTracker::new(),
            pointer_track: GestureTracker::new(),
            pressed: false,
            dragged: false,
            renderer: Renderer::new(id, profile),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> &CarouselState {
        &self.state
    }

    pub fn is_animating(&self) -> bool {
        self.state.is_animating()
    }

    /// Create the dot indicators and place the track if nothing is loading.
    pub fn mount(&mut self, layout: &dyn LayoutQuery, surface: &mut dyn Surface) {
        self.renderer.mount_dots(self.state.real_count(), surface);
        if let Some(frame) = self.state.place_if_ready(layout) {
            self.show(&frame, surface);
        }
    }

    fn show(&self, frame: &Frame, surface: &mut dyn Surface) {
        self.renderer.render(frame, self.state.real_count(), surface);
    }

    pub fn handle(
        &mut self,
        event: &InputEvent,
        layout: &dyn LayoutQuery,
        surface: &mut dyn Surface,
    ) -> Result<Disposition, CarouselError> {
        let d = match event {
            InputEvent::TouchStart { .. } => {
                if let Some(p) = event.point() {
                    self.touch_track.begin(p);
                }
                self.touch.begin();
                self.pressed = true;
                self.dragged = false;
                Disposition::pass()
            }
            InputEvent::TouchMove { cancelable, .. } => {
                if self.state.is_animating() {
                    trace!("{}: touch move blocked during transition", self.id);
                    return Ok(if *cancelable {
                        Disposition::prevent()
                    } else {
                        Disposition::pass()
                    });
                }
                let Some(sample) = event.point().and_then(|p| self.touch_track.update(p)) else {
                    // a committed swipe keeps its horizontal lock until touch end
                    let locked = self.touch.state().axis == Axis::Horizontal;
                    return Ok(if locked && *cancelable {
                        Disposition::prevent()
                    } else {
                        Disposition::pass()
                    });
                };
                let verdict = self.touch.classify(&sample);
                if verdict.axis == Axis::Horizontal {
                    self.drag_progress(&sample, true, layout, surface);
                }
                if verdict.prevent_default && !*cancelable {
                    trace!("{}: move not cancelable, scroll proceeds", self.id);
                }
                Disposition {
                    prevent_default: verdict.prevent_default && *cancelable,
                    stop_propagation: false,
                }
            }
            InputEvent::TouchEnd | InputEvent::TouchCancel => {
                self.touch_track.end();
                self.touch.end();
                self.pressed = false;
                Disposition::pass()
            }
            // touch pointers are covered by the touch path
            InputEvent::PointerDown { kind, .. }
            | InputEvent::PointerMove { kind, .. }
            | InputEvent::PointerUp { kind, .. }
                if *kind == PointerKind::Touch =>
            {
                Disposition::pass()
            }
            InputEvent::PointerDown { .. } => {
                if let Some(p) = event.point() {
                    self.pointer_track.begin(p);
                }
                self.pointer.begin();
                self.pressed = true;
                self.dragged = false;
                Disposition::pass()
            }
            InputEvent::PointerMove { .. } => {
                let Some(sample) = event.point().and_then(|p| self.pointer_track.update(p)) else {
                    return Ok(if self.pointer.state().axis == Axis::Horizontal {
                        Disposition::prevent()
                    } else {
                        Disposition::pass()
                    });
                };
                let verdict = self.pointer.classify(&sample);
                self.drag_progress(&sample, verdict.axis == Axis::Horizontal, layout, surface);
                if verdict.prevent_default {
                    Disposition::prevent()
                } else {
                    Disposition::pass()
                }
            }
            InputEvent::PointerUp { .. } => {
                self.pointer_track.end();
                self.pointer.end();
                self.pressed = false;
                if self.dragged {
                    Disposition::swallow()
                } else {
                    Disposition::pass()
                }
            }
            InputEvent::Click { href } => {
                if self.dragged {
                    self.dragged = false;
                    debug!("{}: click suppressed after drag", self.id);
                    Disposition::swallow()
                } else {
                    if let Some(href) = href {
                        debug!("{}: click passes through to {href}", self.id);
                    }
                    Disposition::pass()
                }
            }
            InputEvent::ContextMenu => {
                if self.pressed && self.dragged {
                    Disposition::prevent()
                } else {
                    Disposition::pass()
                }
            }
            InputEvent::Wheel { .. } => Disposition::pass(),
            InputEvent::TransitionStart => {
                self.state.set_animating(true);
                Disposition::pass()
            }
            InputEvent::TransitionEnd => {
                self.state.set_animating(false);
                if let Some(frame) = self.state.on_transition_settled(layout) {
                    self.show(&frame, surface);
                }
                Disposition::pass()
            }
            InputEvent::ImageLoaded => {
                if let Some(frame) = self.state.image_loaded(layout) {
                    debug!("{}: images ready, placed at slot {}", self.id, frame.active_slot);
                    self.show(&frame, surface);
                }
                Disposition::pass()
            }
            InputEvent::DotClick { index } => {
                let frame = self.state.select_dot(*index, layout)?;
                self.show(&frame, surface);
                Disposition::pass()
            }
            InputEvent::Resize => {
                if self.state.is_placed() {
                    let frame = self.state.refresh(layout);
                    self.show(&frame, surface);
                }
                Disposition::pass()
            }
        };
        Ok(d)
    }

    /// Marks the drag once past `main_px` and commits one step past
    /// `commit_px`, cutting the gesture so a swipe never yields two steps.
    fn drag_progress(
        &mut self,
        sample: &GestureSample,
        horizontal: bool,
        layout: &dyn LayoutQuery,
        surface: &mut dyn Surface,
    ) {
        let (dx, _) = sample.delta();
        if dx.abs() > self.th.main_px {
            self.dragged = true;
        }
        if !horizontal || dx.abs() <= self.th.commit_px {
            return;
        }
        let step = Step::from_drag(dx);
        debug!("{}: drag of {dx:.1}px commits {step:?}", self.id);
        if let Some(frame) = self.state.advance(step, layout) {
            self.show(&frame, surface);
        }
        self.touch_track.cut();
        self.pointer_track.cut();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FixedLayout;
    use crate::render::{Effect, RecordingSurface};

    fn layout() -> FixedLayout {
        FixedLayout {
            card_width: 280.0,
            gap: 16.0,
            padding_left: 0.0,
            container_width: 800.0,
        }
    }

    fn mounted(cards: usize) -> (CarouselWidget, RecordingSurface) {
        let mut w = CarouselWidget::new("hero", cards, 0, &Profile::default()).unwrap();
        let mut s = RecordingSurface::new();
        w.mount(&layout(), &mut s);
        s.drain();
        (w, s)
    }

    fn send(w: &mut CarouselWidget, s: &mut RecordingSurface, ev: InputEvent) -> Disposition {
        w.handle(&ev, &layout(), s).unwrap()
    }

    fn touch_swipe(w: &mut CarouselWidget, s: &mut RecordingSurface, dx: f32, dy: f32) -> Vec<Disposition> {
        let mut out = vec![send(w, s, InputEvent::TouchStart { x: 400.0, y: 300.0 })];
        for i in 1..=8 {
            let f = i as f32 / 8.0;
            out.push(send(
                w,
                s,
                InputEvent::TouchMove {
                    x: 400.0 + dx * f,
                    y: 300.0 + dy * f,
                    cancelable: true,
                },
            ));
        }
        out.push(send(w, s, InputEvent::TouchEnd));
        out
    }

    fn settle(w: &mut CarouselWidget, s: &mut RecordingSurface) {
        send(w, s, InputEvent::TransitionStart);
        send(w, s, InputEvent::TransitionEnd);
    }

    #[test]
    fn mount_creates_dots_and_places() {
        let mut w = CarouselWidget::new("hero", 5, 0, &Profile::default()).unwrap();
        let mut s = RecordingSurface::new();
        w.mount(&layout(), &mut s);
        let fx = s.drain();
        assert!(matches!(fx[0], Effect::CreateDots { count: 5, .. }));
        assert_eq!(w.state().current(), 2);
        assert!(!fx.iter().any(Effect::is_animated_move));
    }

    #[test]
    fn long_swipe_commits_exactly_one_step() {
        let (mut w, mut s) = mounted(5);
        touch_swipe(&mut w, &mut s, -80.0, 0.0);
        assert_eq!(w.state().current(), 3);
        assert_eq!(s.drain().iter().filter(|e| e.is_animated_move()).count(), 1);
    }

    #[test]
    fn three_left_swipes_advance_three_cards_and_wrap() {
        let (mut w, mut s) = mounted(5);
        w.state.jump_to(4, &layout()).unwrap();
        for _ in 0..3 {
            touch_swipe(&mut w, &mut s, -70.0, 4.0);
            settle(&mut w, &mut s);
        }
        // 4 -> 5 -> 6 (clone, silently 1) -> 2
        assert_eq!(w.state().current(), 2);
        assert_eq!(w.state().active_dot(), Some(1));
    }

    #[test]
    fn vertical_drag_never_prevents_or_moves() {
        let (mut w, mut s) = mounted(5);
        let ds = touch_swipe(&mut w, &mut s, 3.0, 100.0);
        assert!(ds.iter().all(|d| !d.prevent_default));
        assert_eq!(w.state().current(), 2);
        assert!(s.effects().is_empty());
    }

    #[test]
    fn horizontal_lock_prevents_only_cancelable_moves() {
        let (mut w, mut s) = mounted(5);
        send(&mut w, &mut s, InputEvent::TouchStart { x: 0.0, y: 0.0 });
        let d = send(&mut w, &mut s, InputEvent::TouchMove { x: -8.0, y: 1.0, cancelable: false });
        assert!(!d.prevent_default);
        let d = send(&mut w, &mut s, InputEvent::TouchMove { x: -9.0, y: 1.0, cancelable: true });
        assert!(d.prevent_default);
    }

    #[test]
    fn moves_are_blocked_while_animating() {
        let (mut w, mut s) = mounted(5);
        send(&mut w, &mut s, InputEvent::TransitionStart);
        let ds = touch_swipe(&mut w, &mut s, -80.0, 0.0);
        assert!(ds[1].prevent_default);
        assert_eq!(w.state().current(), 2);
    }

    #[test]
    fn click_after_mouse_drag_is_suppressed() {
        let (mut w, mut s) = mounted(5);
        let kind = PointerKind::Mouse;
        send(&mut w, &mut s, InputEvent::PointerDown { kind, x: 500.0, y: 200.0 });
        send(&mut w, &mut s, InputEvent::PointerMove { kind, x: 470.0, y: 202.0 });
        send(&mut w, &mut s, InputEvent::PointerMove { kind, x: 430.0, y: 203.0 });
        let up = send(&mut w, &mut s, InputEvent::PointerUp { kind, x: 430.0, y: 203.0 });
        assert_eq!(up, Disposition::swallow());
        assert_eq!(w.state().current(), 3);

        let click = send(&mut w, &mut s, InputEvent::Click { href: Some("/a".into()) });
        assert_eq!(click, Disposition::swallow());
        // the flag is consumed by that click
        let click = send(&mut w, &mut s, InputEvent::Click { href: Some("/a".into()) });
        assert_eq!(click, Disposition::pass());
    }

    #[test]
    fn plain_click_navigates() {
        let (mut w, mut s) = mounted(5);
        let kind = PointerKind::Mouse;
        send(&mut w, &mut s, InputEvent::PointerDown { kind, x: 500.0, y: 200.0 });
        send(&mut w, &mut s, InputEvent::PointerMove { kind, x: 503.0, y: 201.0 });
        send(&mut w, &mut s, InputEvent::PointerUp { kind, x: 503.0, y: 201.0 });
        let click = send(&mut w, &mut s, InputEvent::Click { href: Some("/card".into()) });
        assert_eq!(click, Disposition::pass());
    }

    #[test]
    fn touch_kind_pointer_events_are_left_to_the_touch_path() {
        let (mut w, mut s) = mounted(5);
        let kind = PointerKind::Touch;
        send(&mut w, &mut s, InputEvent::PointerDown { kind, x: 500.0, y: 200.0 });
        let d = send(&mut w, &mut s, InputEvent::PointerMove { kind, x: 400.0, y: 200.0 });
        assert_eq!(d, Disposition::pass());
        assert_eq!(w.state().current(), 2);
    }

    #[test]
    fn dot_click_animates_to_the_card() {
        let (mut w, mut s) = mounted(5);
        send(&mut w, &mut s, InputEvent::DotClick { index: 4 });
        assert_eq!(w.state().current(), 5);
        assert!(s.effects().iter().any(Effect::is_animated_move));
        let err = w.handle(&InputEvent::DotClick { index: 9 }, &layout(), &mut s);
        assert!(err.is_err());
    }

    #[test]
    fn resize_before_placement_renders_nothing() {
        let mut w = CarouselWidget::new("hero", 3, 1, &Profile::default()).unwrap();
        let mut s = RecordingSurface::new();
        w.mount(&layout(), &mut s);
        s.drain();
        send(&mut w, &mut s, InputEvent::Resize);
        assert!(s.effects().is_empty());
        send(&mut w, &mut s, InputEvent::ImageLoaded);
        send(&mut w, &mut s, InputEvent::Resize);
        assert_eq!(
            s.effects().iter().filter(|e| matches!(e, Effect::TrackStyle { .. })).count(),
            2
        );
    }

    #[test]
    fn committed_swipe_keeps_blocking_page_scroll() {
        let (mut w, mut s) = mounted(5);
        send(&mut w, &mut s, InputEvent::TouchStart { x: 400.0, y: 300.0 });
        let d = send(&mut w, &mut s, InputEvent::TouchMove { x: 390.0, y: 301.0, cancelable: true });
        assert!(d.prevent_default);
        send(&mut w, &mut s, InputEvent::TouchMove { x: 330.0, y: 302.0, cancelable: true });
        assert_eq!(w.state().current(), 3);

        // later moves in the same touch drift vertically but stay intercepted
        let d = send(&mut w, &mut s, InputEvent::TouchMove { x: 320.0, y: 330.0, cancelable: true });
        assert!(d.prevent_default);
        let d = send(&mut w, &mut s, InputEvent::TouchMove { x: 250.0, y: 340.0, cancelable: true });
        assert!(d.prevent_default);
        assert_eq!(w.state().current(), 3);

        send(&mut w, &mut s, InputEvent::TouchEnd);
        send(&mut w, &mut s, InputEvent::TouchStart { x: 400.0, y: 300.0 });
        let d = send(&mut w, &mut s, InputEvent::TouchMove { x: 401.0, y: 340.0, cancelable: true });
        assert!(!d.prevent_default);
    }

    #[test]
    fn committed_mouse_drag_keeps_preventing() {
        let (mut w, mut s) = mounted(5);
        let kind = PointerKind::Mouse;
        send(&mut w, &mut s, InputEvent::PointerDown { kind, x: 500.0, y: 200.0 });
        send(&mut w, &mut s, InputEvent::PointerMove { kind, x: 420.0, y: 201.0 });
        assert_eq!(w.state().current(), 3);
        let d = send(&mut w, &mut s, InputEvent::PointerMove { kind, x: 300.0, y: 203.0 });
        assert_eq!(d, Disposition::prevent());
        assert_eq!(w.state().current(), 3);
    }

    #[test]
    fn click_after_touch_swipe_is_suppressed() {
        let (mut w, mut s) = mounted(5);
        touch_swipe(&mut w, &mut s, -80.0, 0.0);
        let click = send(&mut w, &mut s, InputEvent::Click { href: Some("/card".into()) });
        assert_eq!(click, Disposition::swallow());
    }

    #[test]
    fn tap_lets_the_click_through() {
        let (mut w, mut s) = mounted(5);
        touch_swipe(&mut w, &mut s, 2.0, 1.0);
        let click = send(&mut w, &mut s, InputEvent::Click { href: Some("/card".into()) });
        assert_eq!(click, Disposition::pass());
    }

    #[test]
    fn context_menu_is_blocked_only_mid_drag() {
        let (mut w, mut s) = mounted(5);
        assert_eq!(send(&mut w, &mut s, InputEvent::ContextMenu), Disposition::pass());

        let kind = PointerKind::Mouse;
        send(&mut w, &mut s, InputEvent::PointerDown { kind, x: 500.0, y: 200.0 });
        assert_eq!(send(&mut w, &mut s, InputEvent::ContextMenu), Disposition::pass());
        send(&mut w, &mut s, InputEvent::PointerMove { kind, x: 470.0, y: 200.0 });
        assert_eq!(send(&mut w, &mut s, InputEvent::ContextMenu), Disposition::prevent());

        send(&mut w, &mut s, InputEvent::PointerUp { kind, x: 470.0, y: 200.0 });
        assert_eq!(send(&mut w, &mut s, InputEvent::ContextMenu), Disposition::pass());
    }
}
