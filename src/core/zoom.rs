use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

pub const ZOOM_MIN_PERCENT: f64 = 0.0;
pub const ZOOM_MAX_PERCENT: f64 = 100.0;

/// Visible sub-range of the zoomable extent, in percent.
///
/// Invariant: `0 <= start < end <= 100`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomWindow {
    start: f64,
    end: f64,
}

impl Default for ZoomWindow {
    fn default() -> Self {
        Self::FULL
    }
}

impl ZoomWindow {
    pub const FULL: Self = Self {
        start: ZOOM_MIN_PERCENT,
        end: ZOOM_MAX_PERCENT,
    };

    /// Validates and clamps a percentage pair.
    pub fn new(start: f64, end: f64) -> ChartResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(ChartError::InvalidData(
                "zoom window bounds must be finite".to_owned(),
            ));
        }
        let start = start.clamp(ZOOM_MIN_PERCENT, ZOOM_MAX_PERCENT);
        let end = end.clamp(ZOOM_MIN_PERCENT, ZOOM_MAX_PERCENT);
        if start >= end {
            return Err(ChartError::InvalidData(format!(
                "zoom window start ({start}) must be below end ({end})"
            )));
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn start(self) -> f64 {
        self.start
    }

    #[must_use]
    pub fn end(self) -> f64 {
        self.end
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.end - self.start
    }

    #[must_use]
    pub fn is_full(self) -> bool {
        self.start <= ZOOM_MIN_PERCENT && self.end >= ZOOM_MAX_PERCENT
    }

    /// Percentage addressed by a fraction `[0, 1]` of this window.
    #[must_use]
    pub fn percent_at(self, fraction: f64) -> f64 {
        self.start + fraction.clamp(0.0, 1.0) * self.span()
    }

    /// Snaps to the full range when both edges are within `tolerance` of it.
    #[must_use]
    pub fn snapped(self, tolerance: f64) -> Self {
        if self.start <= ZOOM_MIN_PERCENT + tolerance && self.end >= ZOOM_MAX_PERCENT - tolerance {
            Self::FULL
        } else {
            self
        }
    }

    /// Scales the span by `factor` keeping the anchor at the same fraction.
    ///
    /// `factor < 1` zooms in, `factor > 1` zooms out. The result is kept inside
    /// `[0, 100]` by shifting, never narrower than `min_span`, then snapped.
    #[must_use]
    pub fn zoom_at(self, factor: f64, anchor_fraction: f64, min_span: f64, snap_tolerance: f64) -> Self {
        if !factor.is_finite() || factor <= 0.0 {
            return self;
        }
        let fraction = if anchor_fraction.is_finite() {
            anchor_fraction.clamp(0.0, 1.0)
        } else {
            0.5
        };
        let anchor = self.percent_at(fraction);
        let new_span = (self.span() * factor).clamp(min_span.min(ZOOM_MAX_PERCENT), ZOOM_MAX_PERCENT);
        let mut start = anchor - fraction * new_span;
        let mut end = start + new_span;
        if start < ZOOM_MIN_PERCENT {
            end -= start;
            start = ZOOM_MIN_PERCENT;
        }
        if end > ZOOM_MAX_PERCENT {
            start -= end - ZOOM_MAX_PERCENT;
            end = ZOOM_MAX_PERCENT;
        }
        Self {
            start: start.max(ZOOM_MIN_PERCENT),
            end: end.min(ZOOM_MAX_PERCENT),
        }
        .snapped(snap_tolerance)
    }

    /// Translates the window by `delta` percent, preserving its span.
    #[must_use]
    pub fn pan_by(self, delta: f64) -> Self {
        if !delta.is_finite() {
            return self;
        }
        let delta = delta.clamp(ZOOM_MIN_PERCENT - self.start, ZOOM_MAX_PERCENT - self.end);
        Self {
            start: self.start + delta,
            end: self.end + delta,
        }
    }

    /// Sub-window addressed by two fractions of this window.
    ///
    /// Returns `None` when the fractions select an empty span.
    #[must_use]
    pub fn select(self, fraction_a: f64, fraction_b: f64) -> Option<Self> {
        let a = self.percent_at(fraction_a.min(fraction_b));
        let b = self.percent_at(fraction_a.max(fraction_b));
        (b > a).then_some(Self { start: a, end: b })
    }
}

#[cfg(test)]
mod tests {
    use super::ZoomWindow;

    const ZOOM_IN: f64 = 0.7;

    #[test]
    fn new_clamps_and_rejects_inverted_pairs() {
        let window = ZoomWindow::new(-5.0, 140.0).expect("clamped");
        assert!(window.is_full());
        assert!(ZoomWindow::new(60.0, 40.0).is_err());
        assert!(ZoomWindow::new(f64::NAN, 40.0).is_err());
    }

    #[test]
    fn zoom_in_contracts_around_anchor() {
        let zoomed = ZoomWindow::FULL.zoom_at(ZOOM_IN, 0.25, 0.1, 0.5);
        assert!((zoomed.span() - 70.0).abs() <= 1e-9);
        // Anchor at 25% stays at 25% of the new window.
        assert!((zoomed.percent_at(0.25) - 25.0).abs() <= 1e-9);
    }

    #[test]
    fn zoom_out_is_clamped_to_full_range() {
        let window = ZoomWindow::new(80.0, 100.0).expect("window");
        let out = window.zoom_at(1.0 / ZOOM_IN, 1.0, 0.1, 0.5);
        assert!(out.end() <= 100.0);
        assert!(out.start() >= 0.0);
        assert!(out.span() > window.span());
    }

    #[test]
    fn near_full_windows_snap_to_exact_full_range() {
        let window = ZoomWindow::new(0.4, 99.6).expect("window");
        assert_eq!(window.snapped(0.5), ZoomWindow::FULL);
        let window = ZoomWindow::new(0.6, 99.6).expect("window");
        assert_eq!(window.snapped(0.5), window);
    }

    #[test]
    fn pan_is_clamped_and_preserves_span() {
        let window = ZoomWindow::new(10.0, 30.0).expect("window");
        let panned = window.pan_by(-50.0);
        assert_eq!(panned.start(), 0.0);
        assert_eq!(panned.end(), 20.0);
        let panned = window.pan_by(500.0);
        assert_eq!(panned.end(), 100.0);
        assert_eq!(panned.start(), 80.0);
    }

    #[test]
    fn select_orders_fractions() {
        let selected = ZoomWindow::FULL.select(0.75, 0.25).expect("selection");
        assert_eq!(selected.start(), 25.0);
        assert_eq!(selected.end(), 75.0);
        assert!(ZoomWindow::FULL.select(0.5, 0.5).is_none());
    }
}
