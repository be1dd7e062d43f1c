use std::sync::Arc;

use crate::core::{
    AverageCache, AverageCacheKey, AverageLineId, PanelProjection, TimeWindow, close_samples,
    global_average, master_timeline, polyline_commands, rolling_average,
};
use crate::render::{
    DrawCommand, FrameLayer, LayeredRenderFrame, PathPrimitive, Renderer, Stroke, StrokeStyle,
};

use super::OverlayChart;
use super::frame_plan::{DrawnTicker, FramePlan, PanelPlan};
use super::{AverageKind, AverageSpec};

const TICKER_AVERAGE_ALPHA: f64 = 0.7;
const TICKER_AVERAGE_WIDTH_PX: f64 = 1.0;
const SPEC_AVERAGE_WIDTH_PX: f64 = 1.25;
const GLOBAL_AVERAGE_WIDTH_PX: f64 = 2.0;

impl<R: Renderer> OverlayChart<R> {
    /// Rolling and cross-symbol averages, one clipped group per panel.
    pub(super) fn build_average_layers(
        &self,
        plan: &FramePlan<'_>,
        window: TimeWindow,
        frame: &mut LayeredRenderFrame,
    ) {
        let specs: Vec<&AverageSpec> = self
            .core
            .state
            .average_configs
            .iter()
            .filter(|spec| spec.visible)
            .collect();
        let mut cache = self.core.runtime.average_cache.borrow_mut();
        for panel in &plan.panels {
            let contributors: Vec<DrawnTicker<'_>> = plan
                .tickers
                .iter()
                .filter(|drawn| {
                    drawn
                        .series(&panel.key)
                        .is_some_and(|series| !series.points.is_empty())
                })
                .copied()
                .collect();
            if contributors.is_empty() {
                continue;
            }

            let mut commands = Vec::new();
            for drawn in &contributors {
                let stroke = Stroke::dashed(
                    TICKER_AVERAGE_WIDTH_PX,
                    drawn.color.with_alpha(TICKER_AVERAGE_ALPHA),
                    StrokeStyle::AVERAGE,
                );
                for window_ms in &drawn.ticker.moving_average_windows {
                    let line = rolling_line(&mut cache, panel, drawn, None, *window_ms);
                    commands.extend(average_path(
                        &line,
                        &panel.projection_for(window, drawn.symbol()),
                        stroke,
                    ));
                }
            }

            for spec in &specs {
                let Some(color) = spec.resolved_color() else {
                    continue;
                };
                match spec.kind {
                    AverageKind::MovingAverage => {
                        let Some(window_ms) = spec.window_duration else {
                            continue;
                        };
                        let stroke =
                            Stroke::dashed(SPEC_AVERAGE_WIDTH_PX, color, StrokeStyle::AVERAGE);
                        for drawn in &contributors {
                            let line =
                                rolling_line(&mut cache, panel, drawn, Some(&spec.id), window_ms);
                            commands.extend(average_path(
                                &line,
                                &panel.projection_for(window, drawn.symbol()),
                                stroke,
                            ));
                        }
                    }
                    AverageKind::GlobalAverage => {
                        let line = global_line(&mut cache, panel, &contributors, &spec.id, window);
                        let stroke =
                            Stroke::dashed(GLOBAL_AVERAGE_WIDTH_PX, color, StrokeStyle::AVERAGE);
                        commands.extend(average_path(
                            &line,
                            &panel.axis_projection(window),
                            stroke,
                        ));
                    }
                }
            }
            frame.push_clipped(FrameLayer::Averages, panel.rect, commands);
        }
    }
}

fn rolling_line(
    cache: &mut AverageCache,
    panel: &PanelPlan,
    drawn: &DrawnTicker<'_>,
    spec_id: Option<&str>,
    window_ms: i64,
) -> Arc<[(i64, f64)]> {
    let key = AverageCacheKey {
        chart_key: panel.key.clone(),
        line: AverageLineId::Rolling {
            spec_id: spec_id.map(str::to_owned),
            symbol: drawn.symbol().to_owned(),
            window_ms,
        },
        tickers: vec![drawn.symbol().to_owned()],
        normalized_window: None,
    };
    cache.get_or_compute(key, || {
        drawn
            .series(&panel.key)
            .map(|series| rolling_average(&close_samples(&series.points), window_ms))
            .unwrap_or_default()
    })
}

/// Mean of every contributor in axis units, extrapolated over the panel's
/// master timeline.
fn global_line(
    cache: &mut AverageCache,
    panel: &PanelPlan,
    contributors: &[DrawnTicker<'_>],
    spec_id: &str,
    window: TimeWindow,
) -> Arc<[(i64, f64)]> {
    let mut tickers: Vec<String> = contributors
        .iter()
        .map(|drawn| drawn.symbol().to_owned())
        .collect();
    tickers.sort();
    let normalized = panel.scaling.is_normalized();
    let key = AverageCacheKey {
        chart_key: panel.key.clone(),
        line: AverageLineId::Global {
            spec_id: spec_id.to_owned(),
        },
        tickers,
        normalized_window: normalized.then_some((window.min, window.max)),
    };
    cache.get_or_compute(key, || {
        let series: Vec<_> = contributors
            .iter()
            .filter_map(|drawn| drawn.series(&panel.key).map(|series| (drawn.symbol(), series)))
            .collect();
        let timeline = master_timeline(series.iter().map(|(_, series)| series.points.as_slice()));
        let samples: Vec<Vec<(i64, f64)>> = series
            .iter()
            .map(|(symbol, series)| {
                close_samples(&series.points)
                    .into_iter()
                    .map(|(time, value)| (time, panel.scaling.to_axis_value(symbol, value)))
                    .collect()
            })
            .collect();
        global_average(&samples, &timeline)
    })
}

/// Path through the samples inside `projection.window`, widened by one
/// neighbor so the line reaches the panel edges.
fn average_path(
    line: &[(i64, f64)],
    projection: &PanelProjection,
    stroke: Stroke,
) -> Option<DrawCommand> {
    let window = projection.window;
    let start = line
        .partition_point(|(time, _)| *time < window.min)
        .saturating_sub(1);
    let end = (line.partition_point(|(time, _)| *time <= window.max) + 1).min(line.len());
    let points: Vec<(f64, f64)> = line
        .get(start..end)?
        .iter()
        .map(|(time, value)| (projection.x(*time), projection.y(*value)))
        .collect();
    if points.len() < 2 {
        return None;
    }
    Some(DrawCommand::Path(PathPrimitive::stroked(
        polyline_commands(&points, false),
        stroke,
    )))
}

#[cfg(test)]
mod tests {
    use super::average_path;
    use crate::core::{PanelProjection, PlotRect, TimeWindow, ValueRange};
    use crate::render::{Color, DrawCommand, Stroke};

    fn projection(window: TimeWindow) -> PanelProjection {
        PanelProjection::new(
            window,
            ValueRange::new(0.0, 10.0),
            PlotRect::new(0.0, 0.0, 100.0, 100.0),
        )
    }

    #[test]
    fn average_path_keeps_one_sample_past_each_edge() {
        let line: Vec<(i64, f64)> = (0..10).map(|i| (i * 10, i as f64)).collect();
        let stroke = Stroke::solid(1.0, Color::rgb(0.0, 0.0, 0.0));
        let Some(DrawCommand::Path(path)) =
            average_path(&line, &projection(TimeWindow::new(25, 55)), stroke)
        else {
            panic!("expected a path");
        };
        // Samples 20..=60 are kept: five vertices.
        assert_eq!(path.commands.len(), 5);
    }

    #[test]
    fn single_sample_draws_nothing() {
        let stroke = Stroke::solid(1.0, Color::rgb(0.0, 0.0, 0.0));
        assert!(average_path(&[(10, 1.0)], &projection(TimeWindow::new(0, 100)), stroke).is_none());
    }
}
