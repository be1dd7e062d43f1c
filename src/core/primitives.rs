use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{ChartError, ChartResult};

pub const MILLIS_PER_DAY: i64 = 86_400_000;

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

#[must_use]
pub fn datetime_to_epoch_millis(time: DateTime<Utc>) -> i64 {
    time.timestamp_millis()
}

/// Converts epoch milliseconds back to UTC, `None` when out of chrono's range.
#[must_use]
pub fn epoch_millis_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(millis)
}

/// First UTC midnight at or after `millis`.
#[must_use]
pub fn next_day_boundary(millis: i64) -> i64 {
    let floor = millis.div_euclid(MILLIS_PER_DAY) * MILLIS_PER_DAY;
    if floor == millis {
        floor
    } else {
        floor + MILLIS_PER_DAY
    }
}
