use tracing::warn;

use crate::error::ChartResult;
use crate::render::{LayeredRenderFrame, RenderFrame, Renderer};

use super::OverlayChart;
use super::frame_plan::FramePlan;
use super::hit_map::{HitMap, PanelHit};

impl<R: Renderer> OverlayChart<R> {
    /// Materializes the whole pipeline for the current state.
    ///
    /// Builders may run in any order; the layered frame flattens them into
    /// paint order. Returns the frame together with the hit regions the
    /// gesture handlers read until the next render.
    pub(super) fn build_render_frame(&self) -> ChartResult<(RenderFrame, HitMap)> {
        let plan = FramePlan::build(
            &self.core.data,
            &self.core.state,
            &self.core.config,
            self.core.viewport,
        );
        let mut frame = LayeredRenderFrame::new(plan.viewport);
        let mut hits = HitMap {
            plot_area: plan.plot_area,
            ..HitMap::default()
        };

        self.build_background_layer(&plan, &mut frame);
        self.build_axis_layers(&plan, plan.window, &mut frame);
        self.build_legend_layer(&plan, &mut frame, &mut hits);
        self.build_divider_layer(&plan, &mut frame);
        self.build_zoom_controls(&plan, plan.window, &mut frame, &mut hits);

        if let Some(window) = plan.window {
            self.build_series_layers(&plan, window, &mut frame, &mut hits);
            self.build_average_layers(&plan, window, &mut frame);
            if self.core.state.show_events {
                self.build_event_layer(&plan, window, &mut frame, &mut hits);
            }
            self.build_point_tooltip(&plan, &mut frame, &hits);
            self.build_event_tooltip(&plan, &mut frame, &hits);
            self.build_crosshair_layer(&plan, window, &mut frame);

            hits.panels = plan
                .panels
                .iter()
                .map(|panel| PanelHit {
                    key: panel.key.clone(),
                    projection: panel.axis_projection(window),
                    normalized: panel.scaling.is_normalized(),
                })
                .collect();
        }
        self.build_selection_layer(&plan, &mut frame);

        let frame = frame.flatten();
        if let Err(err) = frame.validate() {
            warn!(error = %err, "frame failed validation");
            return Err(err);
        }
        Ok((frame, hits))
    }
}
