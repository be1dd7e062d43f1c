use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::core::{LineStyle, ZoomWindow};
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

use super::ChartData;

/// Aggregate line family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AverageKind {
    /// Cross-symbol mean over the whole timeline.
    GlobalAverage,
    /// Trailing mean per visible ticker.
    MovingAverage,
}

/// One configured aggregate line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageSpec {
    pub id: String,
    pub kind: AverageKind,
    /// Trailing window in milliseconds; required for moving averages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_duration: Option<i64>,
    pub label: String,
    pub color: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_true() -> bool {
    true
}

fn default_opacity() -> f64 {
    0.8
}

impl AverageSpec {
    #[must_use]
    pub fn global(id: impl Into<String>, label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: AverageKind::GlobalAverage,
            window_duration: None,
            label: label.into(),
            color: color.into(),
            visible: true,
            opacity: default_opacity(),
        }
    }

    #[must_use]
    pub fn moving(
        id: impl Into<String>,
        label: impl Into<String>,
        color: impl Into<String>,
        window_ms: i64,
    ) -> Self {
        Self {
            kind: AverageKind::MovingAverage,
            window_duration: Some(window_ms),
            ..Self::global(id, label, color)
        }
    }

    /// Color with the configured opacity applied.
    #[must_use]
    pub fn resolved_color(&self) -> Option<Color> {
        Color::from_hex(&self.color)
            .ok()
            .map(|color| color.with_alpha(color.alpha * self.opacity))
    }

    fn validate(&self) -> ChartResult<()> {
        if self.id.is_empty() {
            return Err(ChartError::InvalidData(
                "average spec id must not be empty".to_owned(),
            ));
        }
        Color::from_hex(&self.color)?;
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(ChartError::InvalidData(format!(
                "average {}: opacity must be in [0, 1]",
                self.id
            )));
        }
        match (self.kind, self.window_duration) {
            (AverageKind::MovingAverage, Some(window)) if window > 0 => Ok(()),
            (AverageKind::MovingAverage, _) => Err(ChartError::InvalidData(format!(
                "average {}: moving averages need a positive windowDuration",
                self.id
            ))),
            (AverageKind::GlobalAverage, None) => Ok(()),
            (AverageKind::GlobalAverage, Some(_)) => Err(ChartError::InvalidData(format!(
                "average {}: windowDuration only applies to moving averages",
                self.id
            ))),
        }
    }
}

/// Snapshot of everything the user can change about one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    /// Tickers loaded into the chart and listed in the legend.
    pub enabled_tickers: IndexSet<String>,
    /// Enabled tickers currently drawn.
    pub visible_tickers: IndexSet<String>,
    /// Panels, top to bottom.
    pub visible_chart_keys: Vec<String>,
    pub zoom: ZoomWindow,
    /// Zoomable extent as a percentage slice of the full data span.
    pub range: ZoomWindow,
    pub line_style: LineStyle,
    pub average_configs: Vec<AverageSpec>,
    pub normalize: bool,
    pub show_grid: bool,
    pub show_points: bool,
    pub show_candles: bool,
    pub show_events: bool,
    pub hide_lines: bool,
    pub hide_values: bool,
    pub fill_gaps: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            enabled_tickers: IndexSet::new(),
            visible_tickers: IndexSet::new(),
            visible_chart_keys: Vec::new(),
            zoom: ZoomWindow::FULL,
            range: ZoomWindow::FULL,
            line_style: LineStyle::Linear,
            average_configs: Vec::new(),
            normalize: false,
            show_grid: true,
            show_points: false,
            show_candles: false,
            show_events: true,
            hide_lines: false,
            hide_values: false,
            fill_gaps: false,
        }
    }
}

impl ViewState {
    /// Initial state for `data`: every ticker enabled and visible, every
    /// chart key shown.
    #[must_use]
    pub fn for_data(data: &ChartData) -> Self {
        let symbols: IndexSet<String> = data.tickers.keys().cloned().collect();
        Self {
            enabled_tickers: symbols.clone(),
            visible_tickers: symbols,
            visible_chart_keys: data.chart_keys(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_ticker_drawn(&self, symbol: &str) -> bool {
        self.enabled_tickers.contains(symbol) && self.visible_tickers.contains(symbol)
    }

    /// Merges `patch` into a copy of this state and validates the result.
    pub fn merged(&self, patch: &ViewStatePatch) -> ChartResult<Self> {
        let mut next = self.clone();
        if let Some(enabled) = &patch.enabled_tickers {
            next.enabled_tickers = enabled.iter().cloned().collect();
        }
        if let Some(visible) = &patch.visible_tickers {
            next.visible_tickers = visible.iter().cloned().collect();
        }
        if let Some(keys) = &patch.visible_chart_keys {
            next.visible_chart_keys = keys.clone();
        }
        if patch.zoom_start.is_some() || patch.zoom_end.is_some() {
            next.zoom = ZoomWindow::new(
                patch.zoom_start.unwrap_or(self.zoom.start()),
                patch.zoom_end.unwrap_or(self.zoom.end()),
            )?;
        }
        if patch.range_min.is_some() || patch.range_max.is_some() {
            next.range = ZoomWindow::new(
                patch.range_min.unwrap_or(self.range.start()),
                patch.range_max.unwrap_or(self.range.end()),
            )?;
        }
        if let Some(style) = patch.line_style {
            next.line_style = style;
        }
        if let Some(configs) = &patch.average_configs {
            for spec in configs {
                spec.validate()?;
            }
            next.average_configs = configs.clone();
        }
        let flags = [
            (patch.normalize, &mut next.normalize),
            (patch.show_grid, &mut next.show_grid),
            (patch.show_points, &mut next.show_points),
            (patch.show_candles, &mut next.show_candles),
            (patch.show_events, &mut next.show_events),
            (patch.hide_lines, &mut next.hide_lines),
            (patch.hide_values, &mut next.hide_values),
            (patch.fill_gaps, &mut next.fill_gaps),
        ];
        for (value, slot) in flags {
            if let Some(value) = value {
                *slot = value;
            }
        }
        next.validate()?;
        Ok(next)
    }

    fn validate(&self) -> ChartResult<()> {
        let mut seen = IndexSet::new();
        for key in &self.visible_chart_keys {
            if key.is_empty() || !seen.insert(key.as_str()) {
                return Err(ChartError::InvalidData(format!(
                    "visible chart keys must be non-empty and unique (got `{key}`)"
                )));
            }
        }
        let mut ids = IndexSet::new();
        for spec in &self.average_configs {
            if !ids.insert(spec.id.as_str()) {
                return Err(ChartError::InvalidData(format!(
                    "duplicate average id {}",
                    spec.id
                )));
            }
        }
        Ok(())
    }
}

/// Partial update of a `ViewState`; `None` fields are left untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewStatePatch {
    pub enabled_tickers: Option<Vec<String>>,
    pub visible_tickers: Option<Vec<String>>,
    pub visible_chart_keys: Option<Vec<String>>,
    pub zoom_start: Option<f64>,
    pub zoom_end: Option<f64>,
    pub range_min: Option<f64>,
    pub range_max: Option<f64>,
    pub line_style: Option<LineStyle>,
    pub average_configs: Option<Vec<AverageSpec>>,
    pub normalize: Option<bool>,
    pub show_grid: Option<bool>,
    pub show_points: Option<bool>,
    pub show_candles: Option<bool>,
    pub show_events: Option<bool>,
    pub hide_lines: Option<bool>,
    pub hide_values: Option<bool>,
    pub fill_gaps: Option<bool>,
}

impl ViewStatePatch {
    pub fn from_json_str(json: &str) -> ChartResult<Self> {
        serde_json::from_str(json)
            .map_err(|err| ChartError::InvalidData(format!("failed to parse view state: {err}")))
    }

    #[must_use]
    pub fn zoom(start: f64, end: f64) -> Self {
        Self {
            zoom_start: Some(start),
            zoom_end: Some(end),
            ..Self::default()
        }
    }

    /// Whether applying this patch can change cached aggregate lines.
    ///
    /// Candle visibility counts because wicks widen normalization ranges.
    #[must_use]
    pub fn touches_averages(&self) -> bool {
        self.enabled_tickers.is_some()
            || self.visible_tickers.is_some()
            || self.average_configs.is_some()
            || self.show_candles.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{AverageSpec, ViewState, ViewStatePatch};

    #[test]
    fn invalid_patches_leave_state_untouched() {
        let state = ViewState::default();
        let inverted = ViewStatePatch::zoom(60.0, 40.0);
        assert!(state.merged(&inverted).is_err());

        let duplicate_keys = ViewStatePatch {
            visible_chart_keys: Some(vec!["price".to_owned(), "price".to_owned()]),
            ..ViewStatePatch::default()
        };
        assert!(state.merged(&duplicate_keys).is_err());
    }

    #[test]
    fn partial_zoom_patch_keeps_the_other_edge() {
        let state = ViewState::default()
            .merged(&ViewStatePatch::zoom(20.0, 80.0))
            .expect("zoom");
        let next = state
            .merged(&ViewStatePatch {
                zoom_end: Some(90.0),
                ..ViewStatePatch::default()
            })
            .expect("end only");
        assert_eq!((next.zoom.start(), next.zoom.end()), (20.0, 90.0));
    }

    #[test]
    fn moving_average_requires_window() {
        let mut spec = AverageSpec::moving("ma", "MA 20", "#ff0000", 1_000);
        assert!(spec.validate().is_ok());
        spec.window_duration = None;
        assert!(spec.validate().is_err());
        assert!(AverageSpec::global("avg", "Average", "#00ff00").validate().is_ok());
    }

    #[test]
    fn patch_json_uses_camel_case() {
        let patch = ViewStatePatch::from_json_str(
            r##"{"zoomStart": 10, "showCandles": true, "averageConfigs": [
                {"id": "g", "kind": "global-average", "label": "Avg", "color": "#333333"}
            ]}"##,
        )
        .expect("patch");
        assert_eq!(patch.zoom_start, Some(10.0));
        assert_eq!(patch.show_candles, Some(true));
        assert!(patch.touches_averages());
        let state = ViewState::default().merged(&patch).expect("merged");
        assert!(state.show_candles);
        assert!(state.average_configs[0].visible);
    }
}
