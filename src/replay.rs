//! Feed a recorded input trace through a page of carousels.

use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::config::Profile;
use crate::input::{Disposition, InputEvent};
use crate::layout::FixedLayout;
use crate::page::Page;
use crate::render::{Effect, RecordingSurface};
use crate::widget::CarouselWidget;

#[derive(Debug, Clone, Deserialize)]
pub struct TraceCarousel {
    pub id: String,
    pub cards: usize,
    #[serde(default)]
    pub images: usize,
    /// Overrides the trace-wide layout for this carousel.
    #[serde(default)]
    pub layout: Option<FixedLayout>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TraceStep {
    /// Carousel the event was dispatched on; `None` for page-level events.
    #[serde(default)]
    pub target: Option<String>,
    pub event: InputEvent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Trace {
    pub layout: FixedLayout,
    pub carousels: Vec<TraceCarousel>,
    #[serde(default)]
    pub steps: Vec<TraceStep>,
    /// Synthesize transition start/end after every animated move, as a
    /// browser would.
    #[serde(default)]
    pub auto_transitions: bool,
}

#[derive(Debug, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub target: Option<String>,
    pub event: &'static str,
    pub disposition: Disposition,
    pub effects: Vec<Effect>,
}

#[derive(Debug, Serialize)]
pub struct CarouselSummary {
    pub id: String,
    pub real_count: usize,
    pub len: usize,
    pub current: usize,
    /// Real card shown at `current`.
    pub active_card: Option<usize>,
    pub active_dot: Option<usize>,
    pub animating: bool,
    pub placed: bool,
}

#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub mount_effects: Vec<Effect>,
    pub steps: Vec<StepReport>,
    pub carousels: Vec<CarouselSummary>,
}

pub fn load_trace(path: &Path) -> Result<Trace> {
    let txt = fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read {}: {e}", path.display()))?;
    let trace = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&txt)
            .map_err(|e| anyhow!("failed to parse {}: {e}", path.display()))?,
        _ => serde_json::from_str(&txt)
            .map_err(|e| anyhow!("failed to parse {}: {e}", path.display()))?,
    };
    Ok(trace)
}

impl Trace {
    fn layout_for(&self, id: &str) -> FixedLayout {
        self.carousels
            .iter()
            .find(|c| c.id == id)
            .and_then(|c| c.layout)
            .unwrap_or(self.layout)
    }
}

pub fn run_trace(trace: &Trace, profile: &Profile) -> Result<ReplayReport> {
    let mut page = Page::new();
    let mut surface = RecordingSurface::new();

    for c in &trace.carousels {
        let widget = CarouselWidget::new(&c.id, c.cards, c.images, profile)
            .with_context(|| format!("carousel '{}'", c.id))?;
        page.add(widget, &trace.layout_for(&c.id), &mut surface);
    }
    let mount_effects = surface.drain();
    info!(
        "replaying {} steps over {} carousels",
        trace.steps.len(),
        trace.carousels.len()
    );

    let mut steps = Vec::with_capacity(trace.steps.len());
    for (index, step) in trace.steps.iter().enumerate() {
        let target = step.target.as_deref();
        let layout = target.map_or(trace.layout, |id| trace.layout_for(id));
        let disposition = page
            .dispatch(target, &step.event, &layout, &mut surface)
            .with_context(|| format!("step {index} ({})", step.event.name()))?;

        if trace.auto_transitions {
            if let Some(id) = target {
                if surface.effects().iter().any(Effect::is_animated_move) {
                    debug!("step {index}: synthesizing transition for '{id}'");
                    for ev in [InputEvent::TransitionStart, InputEvent::TransitionEnd] {
                        page.dispatch(Some(id), &ev, &layout, &mut surface)?;
                    }
                }
            }
        }

        steps.push(StepReport {
            index,
            target: step.target.clone(),
            event: step.event.name(),
            disposition,
            effects: surface.drain(),
        });
    }

    let carousels = page
        .carousels()
        .map(|w| {
            let st = w.state();
            CarouselSummary {
                id: w.id().to_string(),
                real_count: st.real_count(),
                len: st.len(),
                current: st.current(),
                active_card: st.slot(st.current()).map(|s| s.card),
                active_dot: st.active_dot(),
                animating: st.is_animating(),
                placed: st.is_placed(),
            }
        })
        .collect();

    Ok(ReplayReport {
        mount_effects,
        steps,
        carousels,
    })
}
