//! Registry of carousels on one page and page-level scroll suppression.

use log::{debug, trace};
use std::collections::BTreeMap;

use crate::error::CarouselError;
use crate::input::{Disposition, InputEvent};
use crate::layout::LayoutQuery;
use crate::render::Surface;
use crate::widget::CarouselWidget;

#[derive(Debug, Default)]
pub struct Page {
    carousels: BTreeMap<String, CarouselWidget>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register and mount a carousel. A widget with the same id is replaced.
    pub fn add(&mut self, mut widget: CarouselWidget, layout: &dyn LayoutQuery, surface: &mut dyn Surface) {
        widget.mount(layout, surface);
        debug!("page: mounted carousel '{}'", widget.id());
        if self.carousels.insert(widget.id().to_string(), widget).is_some() {
            debug!("page: replaced an existing carousel");
        }
    }

    pub fn carousels(&self) -> impl Iterator<Item = &CarouselWidget> {
        self.carousels.values()
    }

    pub fn any_animating(&self) -> bool {
        self.carousels.values().any(CarouselWidget::is_animating)
    }

    /// Route `event` to `target` (if any), then apply page-level suppression:
    /// touch moves and wheel scrolls are swallowed while any carousel animates.
    pub fn dispatch(
        &mut self,
        target: Option<&str>,
        event: &InputEvent,
        layout: &dyn LayoutQuery,
        surface: &mut dyn Surface,
    ) -> Result<Disposition, CarouselError> {
        let mut d = Disposition::pass();
        if let Some(id) = target {
            let widget = self
                .carousels
                .get_mut(id)
                .ok_or_else(|| CarouselError::UnknownCarousel(id.to_string()))?;
            d = widget.handle(event, layout, surface)?;
        }
        if event.scrolls_page() && self.any_animating() {
            trace!("page: {} suppressed during carousel transition", event.name());
            d = d.merge(if event.is_cancelable() {
                Disposition::swallow()
            } else {
                Disposition {
                    prevent_default: false,
                    stop_propagation: true,
                }
            });
        }
        Ok(d)
    }
}
