use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Size of the drawable surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn validate(self) -> ChartResult<Self> {
        if !self.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }
}

/// Axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlotRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotRect {
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.top + self.height
    }

    #[must_use]
    pub fn center_x(self) -> f64 {
        self.left + self.width * 0.5
    }

    #[must_use]
    pub fn center_y(self) -> f64 {
        self.top + self.height * 0.5
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }

    /// Smallest rectangle covering both inputs.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(left, top, right - left, bottom - top)
    }
}

/// Visible time window in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub min: i64,
    pub max: i64,
}

impl TimeWindow {
    #[must_use]
    pub fn new(a: i64, b: i64) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    #[must_use]
    pub fn span(self) -> i64 {
        self.max - self.min
    }

    #[must_use]
    pub fn contains(self, time: i64) -> bool {
        time >= self.min && time <= self.max
    }

    /// Sub-window addressed by percentages of this window.
    #[must_use]
    pub fn slice_percent(self, start_pct: f64, end_pct: f64) -> Self {
        let span = self.span() as f64;
        let start = self.min as f64 + span * start_pct / 100.0;
        let end = self.min as f64 + span * end_pct / 100.0;
        Self::new(start.floor() as i64, end.ceil() as i64)
    }
}

/// Closed numeric value range used by one projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    /// Range spanning the normalized 0-100 percent scale.
    pub const PERCENT: Self = Self {
        min: 0.0,
        max: 100.0,
    };

    #[must_use]
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.max - self.min
    }

    #[must_use]
    pub fn clamp(self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Grows the range to include `value`.
    #[must_use]
    pub fn include(self, value: f64) -> Self {
        Self {
            min: self.min.min(value),
            max: self.max.max(value),
        }
    }

    /// Maps `value` onto 0-100 relative to this range.
    #[must_use]
    pub fn to_percent(self, value: f64) -> f64 {
        let span = self.span();
        if span == 0.0 {
            return 50.0;
        }
        (value - self.min) / span * 100.0
    }

    /// Computes min/max of a value stream; `None` when the stream is empty.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values
            .into_iter()
            .filter(|value| value.is_finite())
            .fold(None, |acc: Option<Self>, value| match acc {
                Some(range) => Some(range.include(value)),
                None => Some(Self {
                    min: value,
                    max: value,
                }),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::{PlotRect, TimeWindow, ValueRange, Viewport};

    #[test]
    fn viewport_validate_rejects_zero_dimensions() {
        assert!(Viewport::new(0, 10).validate().is_err());
        assert!(Viewport::new(10, 10).validate().is_ok());
    }

    #[test]
    fn plot_rect_union_covers_both() {
        let a = PlotRect::new(10.0, 10.0, 20.0, 20.0);
        let b = PlotRect::new(5.0, 40.0, 10.0, 10.0);
        let u = a.union(b);
        assert_eq!(u, PlotRect::new(5.0, 10.0, 25.0, 40.0));
    }

    #[test]
    fn time_window_slice_percent_addresses_sub_range() {
        let window = TimeWindow::new(1_000, 2_000);
        assert_eq!(window.slice_percent(25.0, 75.0), TimeWindow::new(1_250, 1_750));
    }

    #[test]
    fn value_range_from_values_skips_non_finite() {
        let range = ValueRange::from_values([3.0, f64::NAN, -1.0, 8.0]).expect("range");
        assert_eq!(range, ValueRange::new(-1.0, 8.0));
        assert!(ValueRange::from_values(std::iter::empty()).is_none());
    }
}
