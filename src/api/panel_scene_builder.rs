use crate::render::{
    DrawCommand, FrameLayer, LayeredRenderFrame, LinePrimitive, RectPrimitive, Renderer, Stroke,
};

use super::OverlayChart;
use super::frame_plan::FramePlan;

impl<R: Renderer> OverlayChart<R> {
    /// Canvas fill plus one fill per panel.
    pub(super) fn build_background_layer(
        &self,
        plan: &FramePlan<'_>,
        frame: &mut LayeredRenderFrame,
    ) {
        let background = self.core.config.style.background;
        frame.push(
            FrameLayer::Background,
            DrawCommand::Rect(RectPrimitive::filled(
                0.0,
                0.0,
                f64::from(plan.viewport.width),
                f64::from(plan.viewport.height),
                background,
            )),
        );
        for panel in &plan.panels {
            frame.push(
                FrameLayer::Background,
                DrawCommand::Rect(RectPrimitive::filled(
                    panel.rect.left,
                    panel.rect.top,
                    panel.rect.width,
                    panel.rect.height,
                    background,
                )),
            );
        }
    }

    /// Horizontal rule between consecutive panels.
    pub(super) fn build_divider_layer(
        &self,
        plan: &FramePlan<'_>,
        frame: &mut LayeredRenderFrame,
    ) {
        let stroke = Stroke::solid(1.0, self.core.config.style.divider);
        for pair in plan.panels.windows(2) {
            let y = (pair[0].rect.bottom() + pair[1].rect.top) / 2.0;
            frame.push(
                FrameLayer::Dividers,
                DrawCommand::Line(LinePrimitive::new(
                    pair[0].rect.left,
                    y,
                    pair[0].rect.right(),
                    y,
                    stroke,
                )),
            );
        }
    }
}
