//! Scenario replay
//!
//! Drives a [`Coordinator`] through the scripted steps of a scenario and
//! records one [`Frame`] per step.

use anyhow::Result;
use furl_core::events::event_types;
use furl_core::{EventType, Rect, ScrollAxes, ScrollType};
use furl_layout::{ContentView, Coordinator, HeaderState, HeaderView, ViewId};
use serde::Serialize;

use crate::config::{ScenarioConfig, Step};

/// Tick length used by `settle`
pub const SETTLE_FRAME_MS: f32 = 16.0;

/// Upper bound on settle ticks; animations are capped well below this
const MAX_SETTLE_FRAMES: usize = 1_000;

/// Observed state after one step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub step: usize,
    pub action: &'static str,
    pub events: Vec<EventType>,
    pub header_offset: i32,
    pub header_state: HeaderState,
    pub content_top: i32,
    pub content_scroll_y: i32,
    /// Pixels the behaviors consumed during this step
    pub consumed: i32,
    pub animating: bool,
}

/// Header geometry after layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderReport {
    /// Container bounds the header was laid out in
    pub container: Rect,
    /// Laid-out header bounds
    pub frame: Rect,
    pub height: i32,
    pub natural_height: i32,
    pub pinned_row_height: i32,
    pub collapsible_range: i32,
    pub scroll_rate: Option<f32>,
    pub rows: Vec<Rect>,
}

impl HeaderReport {
    pub fn from_view(view: &HeaderView, container: Rect) -> Self {
        Self {
            container,
            frame: view.frame(),
            height: view.total_header_height(),
            natural_height: view.natural_height(),
            pinned_row_height: view.pinned_row_height(),
            collapsible_range: view.collapsible_range(),
            scroll_rate: view.scroll_rate(),
            rows: view.row_frames().to_vec(),
        }
    }
}

/// A coordinator set up from a scenario
pub struct Replay {
    coordinator: Coordinator,
    header: ViewId,
    content: ViewId,
    width: i32,
    height: i32,
}

impl Replay {
    pub fn new(config: &ScenarioConfig) -> Result<Self> {
        let mut coordinator = Coordinator::with_padding(config.viewport.padding);
        let header = coordinator.add_header(config.header.clone())?;
        let content = coordinator.add_content(ContentView {
            scroll_y: config.content.scroll_y.min(config.content.scroll_range).max(0),
            ..config.content.clone()
        });

        let width = config.viewport.width;
        let height = config.viewport.height;
        coordinator.layout(width, height);
        tracing::info!(
            "Scenario laid out at {}x{} with {} steps",
            width,
            height,
            config.steps.len()
        );

        Ok(Self {
            coordinator,
            header,
            content,
            width,
            height,
        })
    }

    pub fn header_report(&self) -> Result<HeaderReport> {
        let view = self.coordinator.header(self.header)?;
        Ok(HeaderReport::from_view(view, self.coordinator.bounds()))
    }

    /// Apply one step and capture the resulting frame
    pub fn apply(&mut self, index: usize, step: &Step) -> Result<Frame> {
        let mut events = Vec::new();
        let mut consumed = 0;

        match *step {
            Step::Start => {
                self.coordinator.start_nested_scroll(
                    self.content,
                    ScrollAxes::VERTICAL,
                    ScrollType::Touch,
                )?;
                events.push(event_types::NESTED_SCROLL_START);
            }
            Step::Scroll { dy } => {
                let outcome = self.coordinator.scroll(self.content, dy, ScrollType::Touch)?;
                consumed = outcome.consumed_by_behaviors;
                events.push(event_types::NESTED_PRE_SCROLL);
                if outcome.consumed_by_target != 0 {
                    events.push(event_types::NESTED_SCROLL);
                }
            }
            Step::Stop { touch } => {
                let kind = if touch {
                    ScrollType::Touch
                } else {
                    ScrollType::NonTouch
                };
                self.coordinator.stop_nested_scroll(self.content, kind)?;
                events.push(event_types::NESTED_SCROLL_STOP);
            }
            Step::Fling { velocity } => {
                let handled = self
                    .coordinator
                    .nested_pre_fling(self.content, 0.0, velocity)?;
                events.push(event_types::NESTED_PRE_FLING);
                if !handled {
                    tracing::info!("Step {}: fling at {} not consumed", index, velocity);
                }
            }
            Step::Tick { ms } => {
                let was_animating = self.coordinator.is_animating();
                if was_animating && !self.coordinator.tick(ms) {
                    events.push(event_types::OFFSET_SETTLED);
                }
            }
            Step::Settle => {
                let was_animating = self.coordinator.is_animating();
                let mut frames = 0;
                while self.coordinator.is_animating() {
                    if frames == MAX_SETTLE_FRAMES {
                        anyhow::bail!("Step {index}: animation did not settle");
                    }
                    self.coordinator.tick(SETTLE_FRAME_MS);
                    frames += 1;
                }
                if was_animating {
                    events.push(event_types::OFFSET_SETTLED);
                }
                tracing::debug!("Step {}: settled after {} frames", index, frames);
            }
            Step::Layout { width, height } => {
                self.width = width.unwrap_or(self.width);
                self.height = height.unwrap_or(self.height);
                self.coordinator.layout(self.width, self.height);
                events.push(event_types::LAYOUT);
            }
            Step::Anchor { row } => {
                self.coordinator.set_anchor_row(self.header, row)?;
                self.coordinator.layout(self.width, self.height);
                events.push(event_types::LAYOUT);
            }
        }

        self.frame(index, step, events, consumed)
    }

    fn frame(
        &self,
        index: usize,
        step: &Step,
        events: Vec<EventType>,
        consumed: i32,
    ) -> Result<Frame> {
        let frame = Frame {
            step: index,
            action: step.name(),
            events,
            header_offset: self.coordinator.header_offset(self.header)?,
            header_state: self.coordinator.header_state(self.header)?,
            content_top: self.coordinator.bounds_of(self.content)?.top,
            content_scroll_y: self.coordinator.content(self.content)?.scroll_y,
            consumed,
            animating: self.coordinator.is_animating(),
        };
        tracing::debug!("{:?}", frame);
        Ok(frame)
    }
}

/// Replay every step of a scenario
pub fn run(config: &ScenarioConfig) -> Result<Vec<Frame>> {
    let mut replay = Replay::new(config)?;
    config
        .steps
        .iter()
        .enumerate()
        .map(|(index, step)| replay.apply(index, step))
        .collect()
}
