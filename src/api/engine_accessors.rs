use crate::core::{AverageCacheStats, Viewport, ZoomWindow};
use crate::extensions::EventId;
use crate::interaction::{CrosshairState, InteractionMode};
use crate::render::Renderer;

use super::{ChartConfig, ChartData, CursorReadout, OverlayChart, PointSelection, ViewState};

impl<R: Renderer> OverlayChart<R> {
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.core.viewport
    }

    #[must_use]
    pub fn data(&self) -> &ChartData {
        &self.core.data
    }

    #[must_use]
    pub fn state(&self) -> &ViewState {
        &self.core.state
    }

    /// Snapshot of the current view state.
    #[must_use]
    pub fn get_state(&self) -> ViewState {
        self.core.state.clone()
    }

    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.core.config
    }

    #[must_use]
    pub fn zoom_window(&self) -> ZoomWindow {
        self.core.state.zoom
    }

    #[must_use]
    pub fn interaction_mode(&self) -> InteractionMode {
        self.core.runtime.interaction.mode()
    }

    #[must_use]
    pub fn crosshair_state(&self) -> CrosshairState {
        self.core.runtime.interaction.crosshair()
    }

    /// Event whose tooltip is currently shown.
    #[must_use]
    pub fn active_event(&self) -> Option<&EventId> {
        self.core.runtime.active_event()
    }

    #[must_use]
    pub fn pinned_event(&self) -> Option<&EventId> {
        self.core.runtime.pinned_event.as_ref()
    }

    #[must_use]
    pub fn pinned_point(&self) -> Option<&PointSelection> {
        self.core.runtime.pinned_point.as_ref()
    }

    #[must_use]
    pub fn average_cache_stats(&self) -> AverageCacheStats {
        self.core.runtime.average_cache.borrow().stats()
    }

    /// Panel, time and axis value under `(x, y)` in the last rendered frame.
    #[must_use]
    pub fn readout_at(&self, x: f64, y: f64) -> Option<CursorReadout> {
        self.core.runtime.hit_map.readout_at(x, y)
    }
}
