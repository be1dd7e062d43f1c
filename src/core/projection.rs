use crate::core::{PlotRect, TimeWindow, ValueRange};

/// Fraction of panel height kept free above and below the value range.
pub const VALUE_MARGIN_FRACTION: f64 = 0.1;

/// Maps a time onto a pixel x coordinate.
///
/// A zero-width window collapses every time onto the horizontal center.
#[must_use]
pub fn project_x(time: f64, min_time: f64, max_time: f64, left: f64, width: f64) -> f64 {
    let span = max_time - min_time;
    if span == 0.0 || !span.is_finite() {
        return left + width * 0.5;
    }
    left + (time - min_time) / span * width
}

/// Inverse of [`project_x`].
#[must_use]
pub fn inverse_project_x(pixel_x: f64, min_time: f64, max_time: f64, left: f64, width: f64) -> f64 {
    let span = max_time - min_time;
    if span == 0.0 || width == 0.0 {
        return min_time;
    }
    min_time + (pixel_x - left) / width * span
}

/// Maps a value onto a pixel y coordinate, larger values towards the top.
///
/// The value range is inset by `margin_fraction` of the panel height on both
/// edges. A zero-height range collapses onto the vertical center.
#[must_use]
pub fn project_y(
    value: f64,
    min_value: f64,
    max_value: f64,
    top: f64,
    height: f64,
    margin_fraction: f64,
) -> f64 {
    let span = max_value - min_value;
    if span == 0.0 || !span.is_finite() {
        return top + height * 0.5;
    }
    let margin = height * margin_fraction;
    let usable = height - 2.0 * margin;
    top + margin + (1.0 - (value - min_value) / span) * usable
}

/// Inverse of [`project_y`].
#[must_use]
pub fn inverse_project_y(
    pixel_y: f64,
    min_value: f64,
    max_value: f64,
    top: f64,
    height: f64,
    margin_fraction: f64,
) -> f64 {
    let span = max_value - min_value;
    let margin = height * margin_fraction;
    let usable = height - 2.0 * margin;
    if span == 0.0 || usable == 0.0 {
        return min_value;
    }
    min_value + (1.0 - (pixel_y - top - margin) / usable) * span
}

/// Bundles one panel's time window, value range and pixel bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelProjection {
    pub window: TimeWindow,
    pub range: ValueRange,
    pub rect: PlotRect,
}

impl PanelProjection {
    #[must_use]
    pub fn new(window: TimeWindow, range: ValueRange, rect: PlotRect) -> Self {
        Self {
            window,
            range,
            rect,
        }
    }

    #[must_use]
    pub fn with_range(self, range: ValueRange) -> Self {
        Self { range, ..self }
    }

    #[must_use]
    pub fn x(&self, time: i64) -> f64 {
        project_x(
            time as f64,
            self.window.min as f64,
            self.window.max as f64,
            self.rect.left,
            self.rect.width,
        )
    }

    #[must_use]
    pub fn y(&self, value: f64) -> f64 {
        project_y(
            value,
            self.range.min,
            self.range.max,
            self.rect.top,
            self.rect.height,
            VALUE_MARGIN_FRACTION,
        )
    }

    #[must_use]
    pub fn time_at(&self, pixel_x: f64) -> f64 {
        inverse_project_x(
            pixel_x,
            self.window.min as f64,
            self.window.max as f64,
            self.rect.left,
            self.rect.width,
        )
    }

    #[must_use]
    pub fn value_at(&self, pixel_y: f64) -> f64 {
        inverse_project_y(
            pixel_y,
            self.range.min,
            self.range.max,
            self.rect.top,
            self.rect.height,
            VALUE_MARGIN_FRACTION,
        )
    }
}
