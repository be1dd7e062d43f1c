use std::cell::RefCell;

use crate::core::AverageCache;
use crate::extensions::EventId;
use crate::interaction::InteractionState;

use super::hit_map::{HitMap, LegendTarget, PointSelection, ZoomAction};

/// Target under the pointer when a press started.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum PressTarget {
    Legend(LegendTarget),
    Zoom(ZoomAction),
    Event(EventId),
    Point(PointSelection),
}

#[derive(Debug, Clone, PartialEq)]
pub(super) struct PressState {
    pub(super) x: f64,
    pub(super) y: f64,
    pub(super) target: Option<PressTarget>,
}

impl PressState {
    pub(super) fn travelled(&self, x: f64, y: f64) -> f64 {
        (x - self.x).hypot(y - self.y)
    }
}

/// Per-frame and per-gesture state that is not part of `ViewState`.
#[derive(Debug, Default)]
pub(super) struct ChartRuntimeState {
    pub(super) interaction: InteractionState,
    /// Regions of the last rendered frame.
    pub(super) hit_map: HitMap,
    pub(super) hovered_event: Option<EventId>,
    pub(super) pinned_event: Option<EventId>,
    pub(super) hovered_point: Option<PointSelection>,
    pub(super) pinned_point: Option<PointSelection>,
    pub(super) press: Option<PressState>,
    pub(super) average_cache: RefCell<AverageCache>,
    pub(super) average_generation: u64,
    pub(super) destroyed: bool,
}

impl ChartRuntimeState {
    /// Event whose tooltip is shown: hover wins over the pinned one.
    pub(super) fn active_event(&self) -> Option<&EventId> {
        self.hovered_event.as_ref().or(self.pinned_event.as_ref())
    }

    pub(super) fn active_point(&self) -> Option<&PointSelection> {
        self.hovered_point.as_ref().or(self.pinned_point.as_ref())
    }

    /// Drops cached aggregate lines on the next render.
    pub(super) fn invalidate_averages(&mut self) {
        self.average_generation = self.average_generation.wrapping_add(1);
    }

    pub(super) fn clear_selection(&mut self) {
        self.hovered_event = None;
        self.pinned_event = None;
        self.hovered_point = None;
        self.pinned_point = None;
        self.press = None;
    }
}
