use std::fmt;
use std::sync::Arc;

use crate::core::{TimeSeriesPoint, epoch_millis_to_datetime};
use crate::render::Color;

pub type TimeFormatterFn = Arc<dyn Fn(i64) -> String + Send + Sync + 'static>;
pub type ValueFormatterFn = Arc<dyn Fn(f64) -> String + Send + Sync + 'static>;
/// Maps a chart key to its axis title.
pub type AxisTitleFormatterFn = Arc<dyn Fn(&str) -> String + Send + Sync + 'static>;
/// Line color override for `(symbol, chart_key)`.
pub type LineColorFn = Arc<dyn Fn(&str, &str) -> Option<Color> + Send + Sync + 'static>;
/// Candle body color override for `(symbol, point)`.
pub type CandleColorFn =
    Arc<dyn Fn(&str, &TimeSeriesPoint) -> Option<Color> + Send + Sync + 'static>;

/// Caller-supplied formatting and styling callbacks.
///
/// Every callback is optional; missing ones fall back to UTC dates and
/// two-decimal values.
#[derive(Clone, Default)]
pub struct ChartFormatters {
    pub x_format: Option<TimeFormatterFn>,
    pub y_format: Option<ValueFormatterFn>,
    pub label_format: Option<AxisTitleFormatterFn>,
    pub crosshair_x_format: Option<TimeFormatterFn>,
    pub crosshair_y_format: Option<ValueFormatterFn>,
    pub tooltip_time_format: Option<TimeFormatterFn>,
    pub tooltip_value_format: Option<ValueFormatterFn>,
    pub line_color: Option<LineColorFn>,
    pub candle_color: Option<CandleColorFn>,
}

impl fmt::Debug for ChartFormatters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartFormatters")
            .field("x_format", &self.x_format.is_some())
            .field("y_format", &self.y_format.is_some())
            .field("label_format", &self.label_format.is_some())
            .field("crosshair_x_format", &self.crosshair_x_format.is_some())
            .field("crosshair_y_format", &self.crosshair_y_format.is_some())
            .field("tooltip_time_format", &self.tooltip_time_format.is_some())
            .field("tooltip_value_format", &self.tooltip_value_format.is_some())
            .field("line_color", &self.line_color.is_some())
            .field("candle_color", &self.candle_color.is_some())
            .finish()
    }
}

impl ChartFormatters {
    #[must_use]
    pub fn with_x_format(mut self, formatter: TimeFormatterFn) -> Self {
        self.x_format = Some(formatter);
        self
    }

    #[must_use]
    pub fn with_y_format(mut self, formatter: ValueFormatterFn) -> Self {
        self.y_format = Some(formatter);
        self
    }

    #[must_use]
    pub fn with_label_format(mut self, formatter: AxisTitleFormatterFn) -> Self {
        self.label_format = Some(formatter);
        self
    }

    #[must_use]
    pub fn with_tooltip_time_format(mut self, formatter: TimeFormatterFn) -> Self {
        self.tooltip_time_format = Some(formatter);
        self
    }

    #[must_use]
    pub fn with_tooltip_value_format(mut self, formatter: ValueFormatterFn) -> Self {
        self.tooltip_value_format = Some(formatter);
        self
    }

    #[must_use]
    pub fn with_line_color(mut self, callback: LineColorFn) -> Self {
        self.line_color = Some(callback);
        self
    }

    #[must_use]
    pub fn with_candle_color(mut self, callback: CandleColorFn) -> Self {
        self.candle_color = Some(callback);
        self
    }

    pub(crate) fn format_x(&self, time: i64) -> String {
        match &self.x_format {
            Some(formatter) => formatter(time),
            None => format_utc(time, "%Y-%m-%d"),
        }
    }

    pub(crate) fn format_y(&self, value: f64) -> String {
        match &self.y_format {
            Some(formatter) => formatter(value),
            None => format_value(value),
        }
    }

    pub(crate) fn format_axis_title(&self, chart_key: &str) -> String {
        match &self.label_format {
            Some(formatter) => formatter(chart_key),
            None => chart_key.to_owned(),
        }
    }

    pub(crate) fn format_crosshair_x(&self, time: i64) -> String {
        match &self.crosshair_x_format {
            Some(formatter) => formatter(time),
            None => format_utc(time, "%Y-%m-%d %H:%M"),
        }
    }

    pub(crate) fn format_crosshair_y(&self, value: f64) -> String {
        match &self.crosshair_y_format {
            Some(formatter) => formatter(value),
            None => format_value(value),
        }
    }

    pub(crate) fn format_tooltip_time(&self, time: i64) -> String {
        match &self.tooltip_time_format {
            Some(formatter) => formatter(time),
            None => format_utc(time, "%Y-%m-%d %H:%M"),
        }
    }

    pub(crate) fn format_tooltip_value(&self, value: f64) -> String {
        match &self.tooltip_value_format {
            Some(formatter) => formatter(value),
            None => format_value(value),
        }
    }

    pub(crate) fn line_color_for(&self, symbol: &str, chart_key: &str) -> Option<Color> {
        self.line_color
            .as_ref()
            .and_then(|callback| callback(symbol, chart_key))
    }

    pub(crate) fn candle_color_for(&self, symbol: &str, point: &TimeSeriesPoint) -> Option<Color> {
        self.candle_color
            .as_ref()
            .and_then(|callback| callback(symbol, point))
    }
}

fn format_utc(time: i64, pattern: &str) -> String {
    match epoch_millis_to_datetime(time) {
        Some(datetime) => datetime.format(pattern).to_string(),
        None => time.to_string(),
    }
}

/// Two-decimal value text without a trailing `-0.00`.
pub(crate) fn format_value(value: f64) -> String {
    let text = format!("{value:.2}");
    if text == "-0.00" { "0.00".to_owned() } else { text }
}

/// Axis text for normalized panels.
pub(crate) fn format_percent(value: f64) -> String {
    format!("{value:.0}%")
}
