use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_epoch_millis, decimal_to_f64};
use crate::error::{ChartError, ChartResult};

/// Open/high/low triple carried by candle-eligible samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcValues {
    pub open: f64,
    pub high: f64,
    pub low: f64,
}

impl OhlcValues {
    #[must_use]
    pub fn mid(self) -> f64 {
        (self.high + self.low) * 0.5
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTimeSeriesPoint {
    time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value_open: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value_high: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value_low: Option<f64>,
    value_close: Option<f64>,
}

impl From<TimeSeriesPoint> for RawTimeSeriesPoint {
    fn from(point: TimeSeriesPoint) -> Self {
        Self {
            time: point.time,
            value_open: point.ohlc.map(|ohlc| ohlc.open),
            value_high: point.ohlc.map(|ohlc| ohlc.high),
            value_low: point.ohlc.map(|ohlc| ohlc.low),
            value_close: Some(point.close),
        }
    }
}

/// One sample of a named series.
///
/// `close` is always present. OHLC values are either all present or all
/// absent, which is enforced by every constructor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeSeriesPoint", into = "RawTimeSeriesPoint")]
pub struct TimeSeriesPoint {
    pub time: i64,
    pub close: f64,
    pub ohlc: Option<OhlcValues>,
}

impl TryFrom<RawTimeSeriesPoint> for TimeSeriesPoint {
    type Error = ChartError;

    fn try_from(raw: RawTimeSeriesPoint) -> ChartResult<Self> {
        let close = raw.value_close.ok_or_else(|| {
            ChartError::InvalidData(format!("point at {} has no close value", raw.time))
        })?;
        match (raw.value_open, raw.value_high, raw.value_low) {
            (Some(open), Some(high), Some(low)) => Self::candle(raw.time, open, high, low, close),
            (None, None, None) => Self::line(raw.time, close),
            _ => Err(ChartError::InvalidData(format!(
                "point at {} mixes present and absent ohlc fields",
                raw.time
            ))),
        }
    }
}

impl TimeSeriesPoint {
    /// Builds a line-only sample.
    pub fn line(time: i64, close: f64) -> ChartResult<Self> {
        if !close.is_finite() {
            return Err(ChartError::InvalidData(format!(
                "point at {time} has a non-finite close value"
            )));
        }
        Ok(Self {
            time,
            close,
            ohlc: None,
        })
    }

    /// Builds a candle-eligible sample.
    ///
    /// Invariants: all values finite and `low <= high`.
    pub fn candle(time: i64, open: f64, high: f64, low: f64, close: f64) -> ChartResult<Self> {
        if !open.is_finite() || !high.is_finite() || !low.is_finite() || !close.is_finite() {
            return Err(ChartError::InvalidData(format!(
                "point at {time} has non-finite ohlc values"
            )));
        }
        if low > high {
            return Err(ChartError::InvalidData(format!(
                "point at {time} has low above high"
            )));
        }
        Ok(Self {
            time,
            close,
            ohlc: Some(OhlcValues { open, high, low }),
        })
    }

    /// Converts strongly-typed temporal/decimal input into a line sample.
    pub fn from_decimal_time(time: DateTime<Utc>, close: Decimal) -> ChartResult<Self> {
        Self::line(datetime_to_epoch_millis(time), decimal_to_f64(close, "close")?)
    }

    /// Value used by a smoothing source, falling back to close without OHLC.
    #[must_use]
    pub fn value_for(&self, source: SmoothSource) -> f64 {
        match (source, self.ohlc) {
            (SmoothSource::Open, Some(ohlc)) => ohlc.open,
            (SmoothSource::High, Some(ohlc)) => ohlc.high,
            (SmoothSource::Low, Some(ohlc)) => ohlc.low,
            (SmoothSource::Mid, Some(ohlc)) => ohlc.mid(),
            _ => self.close,
        }
    }
}

/// Checks ascending time order without duplicates.
pub fn validate_points(points: &[TimeSeriesPoint], context: &str) -> ChartResult<()> {
    for pair in points.windows(2) {
        if pair[1].time <= pair[0].time {
            return Err(ChartError::InvalidData(format!(
                "{context}: points must be sorted ascending by time (at {})",
                pair[1].time
            )));
        }
    }
    Ok(())
}

/// Which value of the destination sample drives Bezier control points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothSource {
    #[default]
    Close,
    Open,
    High,
    Low,
    Mid,
}

/// Step function variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepMode {
    /// Jump to the destination value at the source x, then hold.
    To,
    /// Hold the source value until the destination x, then jump.
    From,
    /// Jump halfway between both samples.
    Center,
}

/// Line interpolation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    #[default]
    Linear,
    Smooth(SmoothSource),
    Step(StepMode),
}

#[cfg(test)]
mod tests {
    use super::{LineStyle, SmoothSource, StepMode, TimeSeriesPoint, validate_points};

    #[test]
    fn deserializes_line_and_candle_points() {
        let line: TimeSeriesPoint =
            serde_json::from_str(r#"{"time": 10, "valueClose": 4.5}"#).expect("line");
        assert!(line.ohlc.is_none());

        let candle: TimeSeriesPoint = serde_json::from_str(
            r#"{"time": 10, "valueOpen": 4, "valueHigh": 6, "valueLow": 3, "valueClose": 5}"#,
        )
        .expect("candle");
        assert_eq!(candle.ohlc.map(|o| o.high), Some(6.0));
    }

    #[test]
    fn rejects_partial_ohlc_and_missing_close() {
        assert!(
            serde_json::from_str::<TimeSeriesPoint>(r#"{"time": 1, "valueOpen": 1, "valueClose": 2}"#)
                .is_err()
        );
        assert!(serde_json::from_str::<TimeSeriesPoint>(r#"{"time": 1, "valueClose": null}"#).is_err());
    }

    #[test]
    fn value_for_falls_back_to_close() {
        let line = TimeSeriesPoint::line(1, 7.0).expect("line");
        assert_eq!(line.value_for(SmoothSource::High), 7.0);
        let candle = TimeSeriesPoint::candle(1, 2.0, 10.0, 4.0, 5.0).expect("candle");
        assert_eq!(candle.value_for(SmoothSource::Mid), 7.0);
    }

    #[test]
    fn validate_points_requires_strict_ordering() {
        let points = vec![
            TimeSeriesPoint::line(2, 1.0).expect("p"),
            TimeSeriesPoint::line(1, 1.0).expect("p"),
        ];
        assert!(validate_points(&points, "AAA/price").is_err());
    }

    #[test]
    fn line_style_serde_shape() {
        let style: LineStyle = serde_json::from_str(r#"{"step":"center"}"#).expect("style");
        assert_eq!(style, LineStyle::Step(StepMode::Center));
        let style: LineStyle = serde_json::from_str(r#""linear""#).expect("style");
        assert_eq!(style, LineStyle::Linear);
    }
}
