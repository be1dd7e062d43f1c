use tracing::{trace, warn};

use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer};

use super::OverlayChart;
use super::hit_map::HitMap;

#[cfg(feature = "cairo-backend")]
use crate::render::CairoContextRenderer;

pub(super) struct RenderCoordinator;

impl RenderCoordinator {
    pub(super) fn render<R: Renderer>(engine: &mut OverlayChart<R>) -> ChartResult<()> {
        let (frame, hit_map) = Self::prepare(engine)?;
        if let Err(err) = engine.renderer.render(&frame) {
            warn!(error = %err, "renderer rejected frame");
            return Err(err);
        }
        Self::finalize(engine, &frame, hit_map);
        Ok(())
    }

    #[cfg(feature = "cairo-backend")]
    pub(super) fn render_on_cairo_context<R: Renderer + CairoContextRenderer>(
        engine: &mut OverlayChart<R>,
        context: &cairo::Context,
    ) -> ChartResult<()> {
        let (frame, hit_map) = Self::prepare(engine)?;
        engine.renderer.render_on_cairo_context(context, &frame)?;
        Self::finalize(engine, &frame, hit_map);
        Ok(())
    }

    fn prepare<R: Renderer>(engine: &OverlayChart<R>) -> ChartResult<(RenderFrame, HitMap)> {
        engine
            .core
            .runtime
            .average_cache
            .borrow_mut()
            .sync_generation(engine.core.runtime.average_generation);
        engine.build_render_frame()
    }

    fn finalize<R: Renderer>(engine: &mut OverlayChart<R>, frame: &RenderFrame, hit_map: HitMap) {
        trace!(
            commands = frame.commands.len(),
            events = hit_map.events.len(),
            points = hit_map.points.len(),
            "frame rendered"
        );
        engine.core.runtime.hit_map = hit_map;
    }
}
