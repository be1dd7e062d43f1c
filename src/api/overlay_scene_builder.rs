use crate::core::{PlotRect, TimeWindow};
use crate::render::{
    CirclePrimitive, Color, DrawCommand, FrameLayer, LayeredRenderFrame, LinePrimitive,
    RectPrimitive, Renderer, Stroke, StrokeStyle, TextBaseline, TextHAlign, TextPrimitive,
    estimate_text_width_px, line_height_px,
};

use super::OverlayChart;
use super::frame_plan::FramePlan;
use super::hit_map::{HitMap, LegendHit, LegendTarget, ZoomAction, ZoomButtonHit};
use super::label_formatter::format_percent;
use super::layout_helpers::{label, readout_commands, tooltip_commands, tooltip_rect};

const LEGEND_TOP_PX: f64 = 8.0;
const LEGEND_SWATCH_PX: f64 = 14.0;
const LEGEND_SWATCH_GAP_PX: f64 = 4.0;
const LEGEND_ITEM_GAP_PX: f64 = 14.0;
const LEGEND_HIDDEN_ALPHA: f64 = 0.35;

const ZOOM_BUTTON_TOP_PX: f64 = 6.0;
const ZOOM_BUTTON_HEIGHT_PX: f64 = 18.0;
const ZOOM_BUTTON_MIN_WIDTH_PX: f64 = 20.0;
const ZOOM_BUTTON_GAP_PX: f64 = 4.0;
const ZOOM_CAPTION_GAP_PX: f64 = 4.0;
const ZOOM_BUTTONS: [(ZoomAction, &str); 3] = [
    (ZoomAction::ZoomOut, "-"),
    (ZoomAction::ZoomIn, "+"),
    (ZoomAction::Reset, "reset"),
];

const POINT_HIGHLIGHT_GROWTH_PX: f64 = 2.0;
const READOUT_GAP_PX: f64 = 2.0;

/// One legend entry before layout.
struct LegendItem {
    target: LegendTarget,
    text: String,
    color: Color,
    visible: bool,
    dashed: bool,
}

impl<R: Renderer> OverlayChart<R> {
    /// Wrapping legend of enabled tickers and configured averages.
    ///
    /// Rows wrap before the zoom controls so both stay clickable.
    pub(super) fn build_legend_layer(
        &self,
        plan: &FramePlan<'_>,
        frame: &mut LayeredRenderFrame,
        hits: &mut HitMap,
    ) {
        let state = &self.core.state;
        let config = &self.core.config;
        let font = config.layout.legend_font_size_px;
        let row_height = line_height_px(font);

        let items = plan
            .enabled
            .iter()
            .map(|drawn| LegendItem {
                target: LegendTarget::Ticker(drawn.symbol().to_owned()),
                text: drawn.symbol().to_owned(),
                color: drawn.color,
                visible: state.visible_tickers.contains(drawn.symbol()),
                dashed: false,
            })
            .chain(state.average_configs.iter().map(|spec| LegendItem {
                target: LegendTarget::Average(spec.id.clone()),
                text: spec.label.clone(),
                color: spec.resolved_color().unwrap_or(config.style.text),
                visible: spec.visible,
                dashed: true,
            }));

        let left = config.layout.padding.left;
        let right_limit = (f64::from(plan.viewport.width)
            - config.layout.padding.right
            - zoom_controls_width(font))
        .max(left);
        let mut x = left;
        let mut y = LEGEND_TOP_PX;
        for item in items {
            let text_width = estimate_text_width_px(&item.text, font);
            let width = LEGEND_SWATCH_PX + LEGEND_SWATCH_GAP_PX + text_width;
            if x > left && x + width > right_limit {
                x = left;
                y += row_height;
            }
            let alpha = if item.visible { 1.0 } else { LEGEND_HIDDEN_ALPHA };
            let color = item.color.with_alpha(item.color.alpha * alpha);
            let center_y = y + row_height / 2.0;
            let stroke = if item.dashed {
                Stroke::dashed(2.0, color, StrokeStyle::AVERAGE)
            } else {
                Stroke::solid(2.0, color)
            };
            frame.push(
                FrameLayer::Legend,
                DrawCommand::Line(LinePrimitive::new(
                    x,
                    center_y,
                    x + LEGEND_SWATCH_PX,
                    center_y,
                    stroke,
                )),
            );
            let text_color = config
                .style
                .text
                .with_alpha(config.style.text.alpha * alpha);
            frame.extend(
                FrameLayer::Legend,
                label(
                    item.text,
                    x + LEGEND_SWATCH_PX + LEGEND_SWATCH_GAP_PX,
                    center_y,
                    font,
                    text_color,
                    TextHAlign::Left,
                )
                .map(DrawCommand::Text),
            );
            hits.legend.push(LegendHit {
                rect: PlotRect::new(x, y, width, row_height),
                target: item.target,
            });
            x += width + LEGEND_ITEM_GAP_PX;
        }
    }

    /// Zoom buttons in the top-right corner and the visible date range.
    pub(super) fn build_zoom_controls(
        &self,
        plan: &FramePlan<'_>,
        window: Option<TimeWindow>,
        frame: &mut LayeredRenderFrame,
        hits: &mut HitMap,
    ) {
        let config = &self.core.config;
        let font = config.layout.legend_font_size_px;
        let right = f64::from(plan.viewport.width) - config.layout.padding.right;
        let mut x = right - zoom_controls_width(font) + ZOOM_BUTTON_GAP_PX;
        for (action, text) in ZOOM_BUTTONS {
            let width = zoom_button_width(text, font);
            let rect = PlotRect::new(x, ZOOM_BUTTON_TOP_PX, width, ZOOM_BUTTON_HEIGHT_PX);
            frame.push(
                FrameLayer::ZoomControls,
                DrawCommand::Rect(
                    RectPrimitive::filled(
                        rect.left,
                        rect.top,
                        rect.width,
                        rect.height,
                        config.style.tooltip_background,
                    )
                    .with_border(Stroke::solid(1.0, config.style.tooltip_border))
                    .with_corner_radius(3.0),
                ),
            );
            frame.push(
                FrameLayer::ZoomControls,
                DrawCommand::Text(TextPrimitive::new(
                    text,
                    rect.center_x(),
                    rect.center_y(),
                    font,
                    config.style.text,
                    TextHAlign::Center,
                )),
            );
            hits.zoom_buttons.push(ZoomButtonHit { rect, action });
            x += width + ZOOM_BUTTON_GAP_PX;
        }

        if let Some(window) = window {
            let formatters = &self.core.formatters;
            let caption = format!(
                "{} - {}",
                formatters.format_x(window.min),
                formatters.format_x(window.max)
            );
            frame.push(
                FrameLayer::ZoomControls,
                DrawCommand::Text(
                    TextPrimitive::new(
                        caption,
                        right,
                        ZOOM_BUTTON_TOP_PX + ZOOM_BUTTON_HEIGHT_PX + ZOOM_CAPTION_GAP_PX,
                        config.layout.axis_font_size_px,
                        config.style.text,
                        TextHAlign::Right,
                    )
                    .with_baseline(TextBaseline::Top),
                ),
            );
        }
    }

    /// Highlight ring and tooltip for the hovered or pinned data point.
    pub(super) fn build_point_tooltip(
        &self,
        plan: &FramePlan<'_>,
        frame: &mut LayeredRenderFrame,
        hits: &HitMap,
    ) {
        let Some(hit) = self
            .core
            .runtime
            .active_point()
            .and_then(|selection| hits.find_point(selection))
        else {
            return;
        };
        let radius = self.core.config.style.point_radius_px + POINT_HIGHLIGHT_GROWTH_PX;
        frame.push(
            FrameLayer::PointTooltip,
            DrawCommand::Circle(
                CirclePrimitive::filled(hit.x, hit.y, radius, hit.color)
                    .with_border(Stroke::solid(1.5, self.core.config.style.background)),
            ),
        );

        let formatters = &self.core.formatters;
        let selection = &hit.selection;
        let mut lines = vec![
            format!("{} ({})", selection.symbol, selection.chart_key),
            formatters.format_tooltip_time(selection.point.time),
        ];
        if !self.core.state.hide_values {
            lines.push(formatters.format_tooltip_value(selection.point.close));
        }
        lines.retain(|line| !line.is_empty());
        let style = self.tooltip_box_style();
        let rect = tooltip_rect(&lines, (hit.x, hit.y), style.font_size_px, plan.viewport);
        frame.extend(FrameLayer::PointTooltip, tooltip_commands(&lines, rect, style));
    }

    /// Translucent band while a zoom selection is being dragged.
    pub(super) fn build_selection_layer(
        &self,
        plan: &FramePlan<'_>,
        frame: &mut LayeredRenderFrame,
    ) {
        let (Some(area), Some((left, right))) =
            (plan.plot_area, self.core.runtime.interaction.selection())
        else {
            return;
        };
        let left = left.clamp(area.left, area.right());
        let right = right.clamp(area.left, area.right());
        if right <= left {
            return;
        }
        let style = &self.core.config.style;
        frame.push(
            FrameLayer::Selection,
            DrawCommand::Rect(
                RectPrimitive::filled(left, area.top, right - left, area.height, style.selection)
                    .with_border(Stroke::solid(1.0, style.selection.with_alpha(0.8))),
            ),
        );
    }

    /// Guide lines through the cursor with time and value readouts.
    pub(super) fn build_crosshair_layer(
        &self,
        plan: &FramePlan<'_>,
        window: TimeWindow,
        frame: &mut LayeredRenderFrame,
    ) {
        let interaction = self.core.runtime.interaction;
        let crosshair = interaction.crosshair();
        if !crosshair.visible || interaction.crosshair_suppressed() {
            return;
        }
        let Some(area) = plan.plot_area else {
            return;
        };
        let (x, y) = (crosshair.x, crosshair.y);
        if !area.contains(x, y) {
            return;
        }
        let Some(panel) = plan
            .panels
            .iter()
            .find(|panel| y >= panel.rect.top && y <= panel.rect.bottom())
        else {
            return;
        };

        let style = &self.core.config.style;
        let stroke = Stroke::dashed(1.0, style.crosshair, StrokeStyle::GAP);
        frame.push(
            FrameLayer::Crosshair,
            DrawCommand::Line(LinePrimitive::new(x, area.top, x, area.bottom(), stroke)),
        );
        frame.push(
            FrameLayer::Crosshair,
            DrawCommand::Line(LinePrimitive::new(
                panel.rect.left,
                y,
                panel.rect.right(),
                y,
                stroke,
            )),
        );

        let projection = panel.axis_projection(window);
        let readout_style = self.tooltip_box_style();
        let formatters = &self.core.formatters;
        let time = projection.time_at(x).round() as i64;
        let readout_y = area.bottom() + READOUT_GAP_PX + readout_style.font_size_px / 2.0 + 2.0;
        frame.extend(
            FrameLayer::Crosshair,
            readout_commands(
                formatters.format_crosshair_x(time),
                x,
                readout_y,
                TextHAlign::Center,
                readout_style,
            ),
        );
        if !self.core.state.hide_values {
            let value = projection.value_at(y);
            let text = if panel.scaling.is_normalized() {
                format_percent(value)
            } else {
                formatters.format_crosshair_y(value)
            };
            frame.extend(
                FrameLayer::Crosshair,
                readout_commands(
                    text,
                    panel.rect.left - READOUT_GAP_PX,
                    y,
                    TextHAlign::Right,
                    readout_style,
                ),
            );
        }
    }
}

fn zoom_button_width(text: &str, font_size_px: f64) -> f64 {
    (estimate_text_width_px(text, font_size_px) + 8.0).max(ZOOM_BUTTON_MIN_WIDTH_PX)
}

/// Horizontal space reserved for the zoom buttons, including gaps.
fn zoom_controls_width(font_size_px: f64) -> f64 {
    ZOOM_BUTTONS
        .iter()
        .map(|(_, text)| zoom_button_width(text, font_size_px) + ZOOM_BUTTON_GAP_PX)
        .sum::<f64>()
        + ZOOM_BUTTON_GAP_PX
}

#[cfg(test)]
mod tests {
    use super::{ZOOM_BUTTON_MIN_WIDTH_PX, zoom_button_width, zoom_controls_width};

    #[test]
    fn zoom_buttons_have_a_minimum_width() {
        assert_eq!(zoom_button_width("+", 12.0), ZOOM_BUTTON_MIN_WIDTH_PX);
        assert!(zoom_button_width("reset", 12.0) > ZOOM_BUTTON_MIN_WIDTH_PX);
        assert!(zoom_controls_width(12.0) > 3.0 * ZOOM_BUTTON_MIN_WIDTH_PX);
    }
}
