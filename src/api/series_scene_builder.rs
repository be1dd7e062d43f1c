use std::ops::Range;

use crate::core::{
    Extrapolation, LineStyle, PanelProjection, PathVertex, SegmentKind, StyledRun,
    TimeWindow, build_line_runs, classify_segments, close_samples,
    known_indices, points_in_time_window, resample, widened_points,
};
use crate::render::{
    CirclePrimitive, Color, DrawCommand, FrameLayer, LayeredRenderFrame, LinePrimitive,
    PathPrimitive, RectPrimitive, Renderer, Stroke, StrokeStyle,
};

use super::OverlayChart;
use super::frame_plan::{DrawnTicker, FramePlan, PanelPlan};
use super::hit_map::{HitMap, PointHit, PointSelection};
use super::{NamedSeries, ViewState};

const CANDLE_BODY_FRACTION: f64 = 0.6;
const CANDLE_MIN_WIDTH_PX: f64 = 1.0;
const CANDLE_MAX_WIDTH_PX: f64 = 12.0;

impl<R: Renderer> OverlayChart<R> {
    /// Candles, lines and scatter points of every drawn ticker.
    pub(super) fn build_series_layers(
        &self,
        plan: &FramePlan<'_>,
        window: TimeWindow,
        frame: &mut LayeredRenderFrame,
        hits: &mut HitMap,
    ) {
        let state = &self.core.state;
        let timeline = plan.timeline.as_slice();
        for panel in &plan.panels {
            for drawn in &plan.tickers {
                let Some(series) = drawn.series(&panel.key) else {
                    continue;
                };
                if series.points.is_empty() {
                    continue;
                }
                let projection = panel.projection_for(window, drawn.symbol());
                let color = self
                    .core
                    .formatters
                    .line_color_for(drawn.symbol(), &panel.key)
                    .unwrap_or(drawn.color);

                if state.show_candles {
                    let commands = self.candle_commands(drawn, series, &projection);
                    frame.push_clipped(FrameLayer::Candles, panel.rect, commands);
                }
                if !state.hide_lines {
                    let style = resolved_line_style(state, drawn, series);
                    let runs =
                        series_line_runs(series, timeline, &projection, style, state.fill_gaps);
                    let width = self.core.config.style.line_width_px;
                    let commands = runs
                        .into_iter()
                        .map(|run| {
                            let stroke = run_stroke(run.dashed, width, color);
                            DrawCommand::Path(PathPrimitive::stroked(run.commands, stroke))
                        })
                        .collect();
                    frame.push_clipped(FrameLayer::Lines, panel.rect, commands);
                }
                if state.show_points {
                    self.push_points(panel, drawn, series, &projection, color, frame, hits);
                }
            }
        }
    }

    fn candle_commands(
        &self,
        drawn: &DrawnTicker<'_>,
        series: &NamedSeries,
        projection: &PanelProjection,
    ) -> Vec<DrawCommand> {
        let style = &self.core.config.style;
        let visible = widened_points(&series.points, projection.window);
        let body_width = candle_body_width(projection.rect.width, visible.len());
        let mut commands = Vec::with_capacity(visible.len() * 2);
        for point in visible {
            let Some(ohlc) = point.ohlc else {
                continue;
            };
            let rising = point.close >= ohlc.open;
            let color = self
                .core
                .formatters
                .candle_color_for(drawn.symbol(), point)
                .unwrap_or(if rising { style.candle_up } else { style.candle_down });
            let x = projection.x(point.time);
            commands.push(DrawCommand::Line(LinePrimitive::new(
                x,
                projection.y(ohlc.high),
                x,
                projection.y(ohlc.low),
                Stroke::solid(1.0, color),
            )));
            let open_y = projection.y(ohlc.open);
            let close_y = projection.y(point.close);
            let top = open_y.min(close_y);
            let height = (open_y - close_y).abs().max(1.0);
            commands.push(DrawCommand::Rect(RectPrimitive::filled(
                x - body_width / 2.0,
                top,
                body_width,
                height,
                color,
            )));
        }
        commands
    }

    #[allow(clippy::too_many_arguments)]
    fn push_points(
        &self,
        panel: &PanelPlan,
        drawn: &DrawnTicker<'_>,
        series: &NamedSeries,
        projection: &PanelProjection,
        color: Color,
        frame: &mut LayeredRenderFrame,
        hits: &mut HitMap,
    ) {
        let radius = self.core.config.style.point_radius_px;
        for point in points_in_time_window(&series.points, projection.window) {
            let x = projection.x(point.time);
            let y = projection.y(point.close);
            frame.push(
                FrameLayer::Points,
                DrawCommand::Circle(CirclePrimitive::filled(x, y, radius, color)),
            );
            hits.points.push(PointHit {
                x,
                y,
                color,
                selection: PointSelection {
                    symbol: drawn.symbol().to_owned(),
                    chart_key: panel.key.clone(),
                    point: *point,
                },
            });
        }
    }
}

/// Series style wins over the ticker style, which wins over the view state.
fn resolved_line_style(state: &ViewState, drawn: &DrawnTicker<'_>, series: &NamedSeries) -> LineStyle {
    series
        .line_style
        .or(drawn.ticker.line_style)
        .unwrap_or(state.line_style)
}

fn run_stroke(dashed: bool, width: f64, color: Color) -> Stroke {
    if dashed {
        Stroke::dashed(width, color, StrokeStyle::GAP)
    } else {
        Stroke::solid(width, color)
    }
}

/// Styled path runs of one series over the master timeline, restricted to
/// the window.
///
/// The series keeps its own sample on each side of the window, so a line
/// crossing a zoomed window with no sample inside it still reaches the clip
/// edges. It is resampled without extrapolation and only spans its own
/// samples. Gaps are classified over the whole series so zooming never
/// changes which segments are dashed.
pub(super) fn series_line_runs(
    series: &NamedSeries,
    timeline: &[i64],
    projection: &PanelProjection,
    style: LineStyle,
    fill_gaps: bool,
) -> Vec<StyledRun> {
    let widened = widened_points(&series.points, projection.window);
    let (Some(first), Some(last)) = (widened.first(), widened.last()) else {
        return Vec::new();
    };
    let start = timeline.partition_point(|time| *time < first.time);
    let end = timeline.partition_point(|time| *time <= last.time);
    let mut timeline: Vec<i64> = timeline[start..end.max(start)]
        .iter()
        .copied()
        .chain(widened.iter().map(|point| point.time))
        .collect();
    timeline.sort_unstable();
    timeline.dedup();

    let samples = close_samples(&series.points);
    let known = known_indices(&resample(&samples, &timeline, Extrapolation::None));
    let Some((first_index, _)) = known.first() else {
        return Vec::new();
    };
    let offset = series
        .points
        .partition_point(|point| point.time < timeline[*first_index]);
    let all_times: Vec<i64> = series.points.iter().map(|point| point.time).collect();
    let all_segments = classify_segments(&all_times);

    let vertices: Vec<PathVertex> = known
        .iter()
        .enumerate()
        .map(|(k, (index, value))| {
            let vertex = PathVertex::new(projection.x(timeline[*index]), projection.y(*value));
            match (style, series.points.get(offset + k)) {
                (LineStyle::Smooth(source), Some(point)) => {
                    vertex.with_control_y(projection.y(point.value_for(source)))
                }
                _ => vertex,
            }
        })
        .collect();
    let segment_range = offset..offset + vertices.len().saturating_sub(1);
    let segments = segment_slice(&all_segments, segment_range);
    build_line_runs(&vertices, &segments, style, fill_gaps)
}

fn segment_slice(all: &[SegmentKind], range: Range<usize>) -> Vec<SegmentKind> {
    range
        .map(|index| all.get(index).copied().unwrap_or(SegmentKind::Continuous))
        .collect()
}

fn candle_body_width(plot_width: f64, count: usize) -> f64 {
    if count == 0 {
        return CANDLE_MIN_WIDTH_PX;
    }
    (plot_width / count as f64 * CANDLE_BODY_FRACTION).clamp(CANDLE_MIN_WIDTH_PX, CANDLE_MAX_WIDTH_PX)
}
