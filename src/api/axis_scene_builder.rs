use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::core::TimeWindow;
use crate::render::{
    DrawCommand, FrameLayer, LayeredRenderFrame, LinePrimitive, Renderer, Stroke, TextBaseline,
    TextHAlign,
};

use super::OverlayChart;
use super::axis_ticks::{
    VALUE_LABEL_MIN_SPACING_PX, select_ticks_with_min_spacing, time_ticks, value_ticks,
};
use super::frame_plan::{FramePlan, PanelPlan};
use super::label_formatter::format_percent;
use super::layout_helpers::label;

const TICK_LABEL_GAP_PX: f64 = 6.0;
const TICK_MARK_PX: f64 = 4.0;
const AXIS_TITLE_X_PX: f64 = 14.0;

impl<R: Renderer> OverlayChart<R> {
    /// Grid lines, value axes with titles and, with a window, the time axis.
    pub(super) fn build_axis_layers(
        &self,
        plan: &FramePlan<'_>,
        window: Option<TimeWindow>,
        frame: &mut LayeredRenderFrame,
    ) {
        let times = window
            .map(|window| (window, time_ticks(window, self.core.config.layout.max_x_labels)));
        for panel in &plan.panels {
            let ticks = self.value_tick_positions(panel);
            if self.core.state.show_grid {
                self.push_grid(panel, &ticks, times.as_ref(), frame);
            }
            self.push_value_axis(panel, &ticks, frame);
        }
        if let Some((window, ticks)) = &times {
            self.push_time_axis(plan, *window, ticks, frame);
        }
    }

    /// Value ticks in axis units with their pixel rows, thinned so labels
    /// never overlap.
    fn value_tick_positions(&self, panel: &PanelPlan) -> Vec<(f64, f64)> {
        let range = panel.scaling.axis_range();
        // Projection rows do not depend on time, any window will do.
        let projection = panel.axis_projection(TimeWindow::new(0, 0));
        let ticks = value_ticks(range, self.core.config.layout.y_tick_count)
            .into_iter()
            .map(|value| (value, projection.y(value)))
            .filter(|(_, y)| *y >= panel.rect.top && *y <= panel.rect.bottom())
            .collect();
        select_ticks_with_min_spacing(ticks, VALUE_LABEL_MIN_SPACING_PX)
    }

    fn push_grid(
        &self,
        panel: &PanelPlan,
        value_ticks: &[(f64, f64)],
        times: Option<&(TimeWindow, Vec<i64>)>,
        frame: &mut LayeredRenderFrame,
    ) {
        let stroke = Stroke::solid(1.0, self.core.config.style.grid);
        let rect = panel.rect;
        for (_, y) in value_ticks {
            frame.push(
                FrameLayer::Grid,
                DrawCommand::Line(LinePrimitive::new(rect.left, *y, rect.right(), *y, stroke)),
            );
        }
        if let Some((window, ticks)) = times {
            let projection = panel.axis_projection(*window);
            for time in ticks {
                let x = projection.x(*time);
                frame.push(
                    FrameLayer::Grid,
                    DrawCommand::Line(LinePrimitive::new(x, rect.top, x, rect.bottom(), stroke)),
                );
            }
        }
    }

    fn push_value_axis(
        &self,
        panel: &PanelPlan,
        ticks: &[(f64, f64)],
        frame: &mut LayeredRenderFrame,
    ) {
        let style = &self.core.config.style;
        let font = self.core.config.layout.axis_font_size_px;
        let rect = panel.rect;
        let stroke = Stroke::solid(1.0, style.axis);
        frame.push(
            FrameLayer::ValueAxis,
            DrawCommand::Line(LinePrimitive::new(
                rect.left,
                rect.top,
                rect.left,
                rect.bottom(),
                stroke,
            )),
        );

        if !self.core.state.hide_values {
            let normalized = panel.scaling.is_normalized();
            for (value, y) in ticks {
                frame.push(
                    FrameLayer::ValueAxis,
                    DrawCommand::Line(LinePrimitive::new(
                        rect.left - TICK_MARK_PX,
                        *y,
                        rect.left,
                        *y,
                        stroke,
                    )),
                );
                let text = if normalized {
                    format_percent(*value)
                } else {
                    self.core.formatters.format_y(*value)
                };
                frame.extend(
                    FrameLayer::ValueAxis,
                    label(
                        text,
                        rect.left - TICK_LABEL_GAP_PX,
                        *y,
                        font,
                        style.text,
                        TextHAlign::Right,
                    )
                    .map(DrawCommand::Text),
                );
            }
        }

        let title = self.core.formatters.format_axis_title(&panel.key);
        frame.extend(
            FrameLayer::ValueAxis,
            label(
                title,
                AXIS_TITLE_X_PX,
                rect.center_y(),
                font,
                style.text,
                TextHAlign::Center,
            )
            .map(|text| DrawCommand::Text(text.with_rotation(-FRAC_PI_2))),
        );
    }

    fn push_time_axis(
        &self,
        plan: &FramePlan<'_>,
        window: TimeWindow,
        ticks: &[i64],
        frame: &mut LayeredRenderFrame,
    ) {
        let (Some(area), Some(last)) = (plan.plot_area, plan.panels.last()) else {
            return;
        };
        let style = &self.core.config.style;
        let layout = &self.core.config.layout;
        let stroke = Stroke::solid(1.0, style.axis);
        let bottom = area.bottom();
        frame.push(
            FrameLayer::TimeAxis,
            DrawCommand::Line(LinePrimitive::new(
                area.left,
                bottom,
                area.right(),
                bottom,
                stroke,
            )),
        );

        let projection = last.axis_projection(window);
        let (align, rotation) = if layout.incline_x_labels {
            (TextHAlign::Right, -FRAC_PI_4)
        } else {
            (TextHAlign::Center, 0.0)
        };
        for time in ticks {
            let x = projection.x(*time);
            frame.push(
                FrameLayer::TimeAxis,
                DrawCommand::Line(LinePrimitive::new(
                    x,
                    bottom,
                    x,
                    bottom + TICK_MARK_PX,
                    stroke,
                )),
            );
            frame.extend(
                FrameLayer::TimeAxis,
                label(
                    self.core.formatters.format_x(*time),
                    x,
                    bottom + TICK_LABEL_GAP_PX,
                    layout.axis_font_size_px,
                    style.text,
                    align,
                )
                .map(|text| {
                    DrawCommand::Text(
                        text.with_baseline(TextBaseline::Top)
                            .with_rotation(rotation),
                    )
                }),
            );
        }
    }
}
