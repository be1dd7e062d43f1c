use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{LineStyle, TimeSeriesPoint, validate_points};
use crate::error::{ChartError, ChartResult};
use crate::extensions::{CommonEvents, EventMarker};
use crate::render::Color;

/// One metric of one ticker, drawn in the panel of its chart key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedSeries {
    pub points: Vec<TimeSeriesPoint>,
    #[serde(default)]
    pub events: Vec<EventMarker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_style: Option<LineStyle>,
    /// Explicit lower bound used instead of the visible minimum.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
}

impl NamedSeries {
    #[must_use]
    pub fn new(points: Vec<TimeSeriesPoint>) -> Self {
        Self {
            points,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_events(mut self, events: Vec<EventMarker>) -> Self {
        self.events = events;
        self
    }

    #[must_use]
    pub fn with_line_style(mut self, style: LineStyle) -> Self {
        self.line_style = Some(style);
        self
    }

    fn validate(&self, context: &str) -> ChartResult<()> {
        validate_points(&self.points, context)?;
        for (value, name) in [(self.min_value, "minValue"), (self.max_value, "maxValue")] {
            if value.is_some_and(|v| !v.is_finite()) {
                return Err(ChartError::InvalidData(format!(
                    "{context}: `{name}` must be finite"
                )));
            }
        }
        if let (Some(min), Some(max)) = (self.min_value, self.max_value) {
            if min > max {
                return Err(ChartError::InvalidData(format!(
                    "{context}: minValue must not exceed maxValue"
                )));
            }
        }
        Ok(())
    }
}

/// One symbol with its per-chart-key series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker {
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_style: Option<LineStyle>,
    /// Rolling-average durations in milliseconds drawn for this ticker.
    #[serde(default)]
    pub moving_average_windows: Vec<i64>,
    pub series: IndexMap<String, NamedSeries>,
}

impl Ticker {
    #[must_use]
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_color(mut self, hex: impl Into<String>) -> Self {
        self.color = Some(hex.into());
        self
    }

    #[must_use]
    pub fn with_series(mut self, chart_key: impl Into<String>, series: NamedSeries) -> Self {
        self.series.insert(chart_key.into(), series);
        self
    }

    #[must_use]
    pub fn with_moving_average_windows(mut self, windows: Vec<i64>) -> Self {
        self.moving_average_windows = windows;
        self
    }

    /// Parsed color; only valid after `ChartData` validation.
    #[must_use]
    pub fn parsed_color(&self) -> Option<Color> {
        self.color.as_deref().and_then(|hex| Color::from_hex(hex).ok())
    }

    fn validate(&self) -> ChartResult<()> {
        if self.symbol.trim().is_empty() {
            return Err(ChartError::InvalidData(
                "ticker symbol must not be empty".to_owned(),
            ));
        }
        if let Some(hex) = &self.color {
            Color::from_hex(hex)?;
        }
        if let Some(window) = self.moving_average_windows.iter().find(|w| **w <= 0) {
            return Err(ChartError::InvalidData(format!(
                "ticker {}: moving average window {window} must be > 0",
                self.symbol
            )));
        }
        for (chart_key, series) in &self.series {
            series.validate(&format!("ticker {} / {chart_key}", self.symbol))?;
        }
        Ok(())
    }
}

/// Complete chart input: tickers keyed by symbol plus chart-wide events.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub tickers: IndexMap<String, Ticker>,
    #[serde(default)]
    pub common_events: CommonEvents,
}

impl ChartData {
    pub fn new(tickers: Vec<Ticker>, common_events: CommonEvents) -> ChartResult<Self> {
        let mut map = IndexMap::with_capacity(tickers.len());
        for ticker in tickers {
            if map.contains_key(&ticker.symbol) {
                return Err(ChartError::InvalidData(format!(
                    "duplicate ticker symbol {}",
                    ticker.symbol
                )));
            }
            map.insert(ticker.symbol.clone(), ticker);
        }
        let data = Self {
            tickers: map,
            common_events,
        };
        data.validate()?;
        Ok(data)
    }

    pub fn from_json_str(json: &str) -> ChartResult<Self> {
        let data: Self = serde_json::from_str(json)
            .map_err(|err| ChartError::InvalidData(format!("failed to parse chart data: {err}")))?;
        data.validate()?;
        Ok(data)
    }

    pub fn validate(&self) -> ChartResult<()> {
        for (symbol, ticker) in &self.tickers {
            if symbol != &ticker.symbol {
                return Err(ChartError::InvalidData(format!(
                    "ticker keyed as {symbol} declares symbol {}",
                    ticker.symbol
                )));
            }
            ticker.validate()?;
        }
        Ok(())
    }

    /// Chart keys in first-seen order across tickers, then common events.
    #[must_use]
    pub fn chart_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        let per_ticker = self.tickers.values().flat_map(|ticker| ticker.series.keys());
        for key in per_ticker.chain(self.common_events.per_chart_events.keys()) {
            if !keys.contains(key) {
                keys.push(key.clone());
            }
        }
        keys
    }

    #[must_use]
    pub fn symbols(&self) -> Vec<String> {
        self.tickers.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::ChartData;
    use crate::error::ChartError;

    const SAMPLE: &str = r##"{
        "tickers": {
            "AAA": {
                "symbol": "AAA",
                "color": "#1f77b4",
                "movingAverageWindows": [172800000],
                "series": {
                    "price": {
                        "points": [
                            {"time": 0, "valueOpen": 1, "valueHigh": 2, "valueLow": 0.5, "valueClose": 1.5},
                            {"time": 86400000, "valueClose": 1.7}
                        ],
                        "events": [{"label": "buy", "time": 0, "value": 1.5, "markerKind": "arrow"}],
                        "lineStyle": {"step": "center"}
                    },
                    "volume": {"points": [{"time": 0, "valueClose": 100}]}
                }
            }
        },
        "commonEvents": {"xAxisEvents": [{"label": "fomc", "time": 43200000}]}
    }"##;

    #[test]
    fn parses_camel_case_json() {
        let data = ChartData::from_json_str(SAMPLE).expect("data");
        assert_eq!(data.symbols(), vec!["AAA".to_owned()]);
        assert_eq!(data.chart_keys(), vec!["price".to_owned(), "volume".to_owned()]);
        let ticker = &data.tickers["AAA"];
        assert_eq!(ticker.series["price"].events.len(), 1);
        assert!(ticker.parsed_color().is_some());
        assert!(data.common_events.x_axis_events[0].is_common_x());
    }

    #[test]
    fn rejects_unsorted_points_and_bad_windows() {
        let unsorted = SAMPLE.replace("\"time\": 86400000", "\"time\": -5");
        assert!(matches!(
            ChartData::from_json_str(&unsorted),
            Err(ChartError::InvalidData(_))
        ));
        let bad_window = SAMPLE.replace("172800000", "0");
        assert!(ChartData::from_json_str(&bad_window).is_err());
        let bad_color = SAMPLE.replace("#1f77b4", "blue");
        assert!(ChartData::from_json_str(&bad_color).is_err());
    }

    #[test]
    fn malformed_events_fail_ingestion() {
        let mixed = SAMPLE.replace(
            r#""time": 0, "value": 1.5, "markerKind": "arrow""#,
            r#""time": 0, "startValue": 1.5, "endValue": 2.0"#,
        );
        assert!(ChartData::from_json_str(&mixed).is_err());
    }
}
