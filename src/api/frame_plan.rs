use crate::core::{
    PanelProjection, PanelScaling, PlotRect, ScaleInput, TimeSeriesPoint, TimeWindow, ValueRange,
    Viewport, layout_panels, master_timeline, plot_area, points_in_time_window, time_extent,
};
use crate::render::Color;

use super::{ChartConfig, ChartData, NamedSeries, Ticker, ViewState};

/// A ticker drawn in this frame, with its resolved base color.
#[derive(Debug, Clone, Copy)]
pub(super) struct DrawnTicker<'a> {
    pub(super) ticker: &'a Ticker,
    pub(super) color: Color,
}

impl<'a> DrawnTicker<'a> {
    pub(super) fn symbol(&self) -> &'a str {
        &self.ticker.symbol
    }

    pub(super) fn series(&self, chart_key: &str) -> Option<&'a NamedSeries> {
        self.ticker.series.get(chart_key)
    }
}

/// One visible panel with the value scaling it uses this frame.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct PanelPlan {
    pub(super) key: String,
    pub(super) rect: PlotRect,
    pub(super) scaling: PanelScaling,
    pub(super) first: bool,
}

impl PanelPlan {
    /// Projection of `symbol`'s raw values.
    pub(super) fn projection_for(&self, window: TimeWindow, symbol: &str) -> PanelProjection {
        PanelProjection::new(window, self.scaling.range_for(symbol), self.rect)
    }

    /// Projection of values shared by every symbol in the panel.
    pub(super) fn shared_projection(&self, window: TimeWindow) -> PanelProjection {
        PanelProjection::new(window, self.scaling.shared_range(), self.rect)
    }

    /// Projection in axis units: percent when normalized, raw otherwise.
    pub(super) fn axis_projection(&self, window: TimeWindow) -> PanelProjection {
        PanelProjection::new(window, self.scaling.axis_range(), self.rect)
    }
}

/// Everything a frame needs that derives from data, state and viewport.
///
/// Built once per render so every layer reads the same window, timeline and
/// scaling policy.
#[derive(Debug, Clone)]
pub(super) struct FramePlan<'a> {
    pub(super) viewport: Viewport,
    /// Enabled tickers in data order with their colors.
    pub(super) enabled: Vec<DrawnTicker<'a>>,
    /// Enabled and visible tickers in data order.
    pub(super) tickers: Vec<DrawnTicker<'a>>,
    pub(super) panels: Vec<PanelPlan>,
    pub(super) plot_area: Option<PlotRect>,
    /// Sorted union of sample times of the drawn tickers.
    pub(super) timeline: Vec<i64>,
    /// Visible time window, `None` when no enabled ticker has samples.
    pub(super) window: Option<TimeWindow>,
}

impl<'a> FramePlan<'a> {
    pub(super) fn build(
        data: &'a ChartData,
        state: &ViewState,
        config: &ChartConfig,
        viewport: Viewport,
    ) -> Self {
        let keys = &state.visible_chart_keys;
        let enabled: Vec<DrawnTicker<'a>> = data
            .tickers
            .iter()
            .enumerate()
            .filter(|(_, (symbol, _))| state.enabled_tickers.contains(*symbol))
            .map(|(index, (_, ticker))| DrawnTicker {
                ticker,
                color: ticker
                    .parsed_color()
                    .unwrap_or_else(|| config.style.palette_color(index)),
            })
            .collect();
        let tickers: Vec<DrawnTicker<'a>> = enabled
            .iter()
            .filter(|drawn| state.visible_tickers.contains(drawn.symbol()))
            .copied()
            .collect();

        let visible_points = |set: &[DrawnTicker<'a>]| -> Vec<&'a [TimeSeriesPoint]> {
            set.iter()
                .flat_map(|drawn| {
                    keys.iter()
                        .filter_map(move |key| drawn.series(key))
                        .map(|series| series.points.as_slice())
                })
                .collect()
        };

        // The extent follows enabled tickers so legend toggles never rescale
        // the time axis.
        let window = time_extent(visible_points(&enabled)).map(|full| {
            full.slice_percent(state.range.start(), state.range.end())
                .slice_percent(state.zoom.start(), state.zoom.end())
        });
        let timeline = master_timeline(visible_points(&tickers));

        let regions = layout_panels(viewport, config.layout.padding, keys);
        let plot_area = plot_area(&regions);
        let panels = regions
            .into_iter()
            .enumerate()
            .map(|(index, region)| {
                let scaling = panel_scaling(data, &tickers, &region.key, window, state);
                PanelPlan {
                    key: region.key,
                    rect: region.rect,
                    scaling,
                    first: index == 0,
                }
            })
            .collect();

        Self {
            viewport,
            enabled,
            tickers,
            panels,
            plot_area,
            timeline,
            window,
        }
    }

    #[cfg(test)]
    pub(super) fn panel(&self, chart_key: &str) -> Option<&PanelPlan> {
        self.panels.iter().find(|panel| panel.key == chart_key)
    }
}

fn panel_scaling(
    data: &ChartData,
    tickers: &[DrawnTicker<'_>],
    chart_key: &str,
    window: Option<TimeWindow>,
    state: &ViewState,
) -> PanelScaling {
    let inputs: Vec<ScaleInput<'_>> = tickers
        .iter()
        .filter_map(|drawn| {
            let series = drawn.series(chart_key)?;
            let points = match window {
                Some(window) => points_in_time_window(&series.points, window),
                None => &series.points[..0],
            };
            Some(ScaleInput {
                symbol: drawn.symbol(),
                points,
                min_override: series.min_value,
                max_override: series.max_value,
                include_wicks: state.show_candles,
            })
        })
        .collect();
    if let Some(scaling) = PanelScaling::compute(&inputs, state.normalize) {
        return scaling;
    }

    // Nothing visible: fall back to all samples, then to annotation values.
    let all_values = tickers
        .iter()
        .filter_map(|drawn| drawn.series(chart_key))
        .flat_map(|series| series.points.iter().map(|point| point.close));
    let event_values = tickers
        .iter()
        .filter_map(|drawn| drawn.series(chart_key))
        .flat_map(|series| series.events.iter())
        .chain(
            data.common_events
                .per_chart_events
                .get(chart_key)
                .into_iter()
                .flatten(),
        )
        .flat_map(|marker| marker.values());
    let shared = ValueRange::from_values(all_values)
        .or_else(|| ValueRange::from_values(event_values))
        .unwrap_or(ValueRange::new(0.0, 1.0));
    PanelScaling::from_shared(shared, state.normalize)
}

#[cfg(test)]
mod tests {
    use super::FramePlan;
    use crate::api::{ChartConfig, ChartData, NamedSeries, Ticker, ViewState, ViewStatePatch};
    use crate::core::{TimeSeriesPoint, Viewport};
    use crate::extensions::CommonEvents;

    fn ticker(symbol: &str, times: &[i64], base: f64) -> Ticker {
        let points: Vec<TimeSeriesPoint> = times
            .iter()
            .enumerate()
            .map(|(i, t)| TimeSeriesPoint::line(*t, base + i as f64).expect("point"))
            .collect();
        Ticker::new(symbol)
            .with_series("price", NamedSeries::new(points.clone()))
            .with_series("volume", NamedSeries::new(points))
    }

    fn data() -> ChartData {
        ChartData::new(
            vec![
                ticker("AAA", &[0, 10, 20, 30], 10.0),
                ticker("BBB", &[5, 15, 40], 100.0),
            ],
            CommonEvents::default(),
        )
        .expect("data")
    }

    #[test]
    fn hidden_tickers_keep_the_time_extent() {
        let data = data();
        let config = ChartConfig::default();
        let state = ViewState::for_data(&data);
        let plan = FramePlan::build(&data, &state, &config, Viewport::new(800, 600));
        assert_eq!(plan.window.map(|w| (w.min, w.max)), Some((0, 40)));
        assert_eq!(plan.timeline, vec![0, 5, 10, 15, 20, 30, 40]);

        let hidden = state
            .merged(&ViewStatePatch {
                visible_tickers: Some(vec!["AAA".to_owned()]),
                ..ViewStatePatch::default()
            })
            .expect("state");
        let plan = FramePlan::build(&data, &hidden, &config, Viewport::new(800, 600));
        assert_eq!(plan.window.map(|w| (w.min, w.max)), Some((0, 40)));
        assert_eq!(plan.timeline, vec![0, 10, 20, 30]);
        assert_eq!(plan.tickers.len(), 1);
        assert_eq!(plan.enabled.len(), 2);
    }

    #[test]
    fn zoom_slices_the_range_extent() {
        let data = data();
        let state = ViewState::for_data(&data)
            .merged(&ViewStatePatch {
                range_min: Some(0.0),
                range_max: Some(50.0),
                zoom_start: Some(50.0),
                zoom_end: Some(100.0),
                ..ViewStatePatch::default()
            })
            .expect("state");
        let plan = FramePlan::build(&data, &state, &ChartConfig::default(), Viewport::new(800, 600));
        assert_eq!(plan.window.map(|w| (w.min, w.max)), Some((10, 20)));
    }

    #[test]
    fn panels_share_one_scaling_policy() {
        let data = data();
        let state = ViewState::for_data(&data);
        let plan = FramePlan::build(&data, &state, &ChartConfig::default(), Viewport::new(800, 600));
        let price = plan.panel("price").expect("price");
        assert!(price.first);
        assert_eq!(price.scaling.shared_range().min, 10.0);
        assert_eq!(price.scaling.shared_range().max, 102.0);
        assert_eq!(plan.panels.len(), 2);
    }
}
