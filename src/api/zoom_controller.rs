use tracing::debug;

use crate::core::ZoomWindow;
use crate::error::ChartResult;
use crate::render::Renderer;

use super::{OverlayChart, ZoomAction};

impl<R: Renderer> OverlayChart<R> {
    /// One zoom-in step anchored at `anchor_fraction` of the visible window.
    pub fn zoom_in(&mut self, anchor_fraction: f64) -> ChartResult<()> {
        self.ensure_alive()?;
        self.step_zoom(ZoomAction::ZoomIn, anchor_fraction);
        self.render()
    }

    /// Exact inverse of `zoom_in`.
    pub fn zoom_out(&mut self, anchor_fraction: f64) -> ChartResult<()> {
        self.ensure_alive()?;
        self.step_zoom(ZoomAction::ZoomOut, anchor_fraction);
        self.render()
    }

    pub fn reset_zoom(&mut self) -> ChartResult<()> {
        self.ensure_alive()?;
        self.step_zoom(ZoomAction::Reset, 0.5);
        self.render()
    }

    /// Applies one zoom step without rendering.
    pub(super) fn step_zoom(&mut self, action: ZoomAction, anchor_fraction: f64) {
        let tuning = self.core.config.interaction;
        let factor = match action {
            ZoomAction::ZoomIn => tuning.zoom_in_factor,
            ZoomAction::ZoomOut => tuning.zoom_out_factor(),
            ZoomAction::Reset => {
                self.commit_zoom(ZoomWindow::FULL);
                return;
            }
        };
        let next = self.core.state.zoom.zoom_at(
            factor,
            anchor_fraction,
            tuning.min_zoom_span,
            tuning.snap_tolerance,
        );
        self.commit_zoom(next);
    }

    /// Stores a new zoom window without rendering.
    pub(super) fn commit_zoom(&mut self, zoom: ZoomWindow) {
        let zoom = zoom.snapped(self.core.config.interaction.snap_tolerance);
        if zoom != self.core.state.zoom {
            debug!(start = zoom.start(), end = zoom.end(), "zoom committed");
        }
        self.core.state.zoom = zoom;
    }
}
