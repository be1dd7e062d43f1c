use std::sync::Arc;

use crate::error::{ChartError, ChartResult};
use crate::render::Renderer;

use super::{PointSelection, engine_core::EngineCore, render_coordinator::RenderCoordinator};

#[cfg(feature = "cairo-backend")]
use crate::render::CairoContextRenderer;

/// Callback fired when a data point is clicked; `None` when a pinned point is
/// released.
pub type PointClickHandler = Arc<dyn Fn(Option<&PointSelection>) + Send + Sync + 'static>;

/// Main orchestration facade consumed by host applications.
///
/// `OverlayChart` owns the data, the view state and the gesture state of one
/// chart instance. Every mutating call re-renders synchronously through the
/// renderer it was built with.
pub struct OverlayChart<R: Renderer> {
    pub(super) renderer: R,
    pub(super) core: EngineCore,
}

impl<R: Renderer> OverlayChart<R> {
    /// Rebuilds the frame from the current state and hands it to the renderer.
    pub fn render(&mut self) -> ChartResult<()> {
        self.ensure_alive()?;
        RenderCoordinator::render(self)
    }

    /// Renders the frame into a cairo context owned by the host, such as an
    /// image surface or a widget draw callback.
    #[cfg(feature = "cairo-backend")]
    pub fn render_on_cairo_context(&mut self, context: &cairo::Context) -> ChartResult<()>
    where
        R: CairoContextRenderer,
    {
        self.ensure_alive()?;
        RenderCoordinator::render_on_cairo_context(self, context)
    }

    /// Tears the chart down. Later `resize` calls are ignored and every other
    /// mutating call fails with `ChartError::Destroyed`.
    pub fn destroy(&mut self) {
        if !self.core.runtime.destroyed {
            tracing::debug!("chart destroyed");
        }
        self.core.runtime.destroyed = true;
        self.core.runtime.clear_selection();
        self.core.runtime.average_cache.borrow_mut().clear();
        self.core.point_click_handler = None;
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.core.runtime.destroyed
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    pub(super) fn ensure_alive(&self) -> ChartResult<()> {
        if self.core.runtime.destroyed {
            Err(ChartError::Destroyed)
        } else {
            Ok(())
        }
    }
}
