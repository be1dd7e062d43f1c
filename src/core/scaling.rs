use indexmap::IndexMap;

use crate::core::{TimeSeriesPoint, ValueRange};

/// One symbol's contribution to a panel's value scale.
#[derive(Debug, Clone, Copy)]
pub struct ScaleInput<'a> {
    pub symbol: &'a str,
    /// Samples inside the visible time window.
    pub points: &'a [TimeSeriesPoint],
    pub min_override: Option<f64>,
    pub max_override: Option<f64>,
    /// Include high/low so candle wicks stay in range.
    pub include_wicks: bool,
}

impl ScaleInput<'_> {
    fn range(&self) -> Option<ValueRange> {
        let values = self.points.iter().flat_map(|point| {
            let wicks = point
                .ohlc
                .filter(|_| self.include_wicks)
                .map(|ohlc| [ohlc.high, ohlc.low]);
            std::iter::once(point.close).chain(wicks.into_iter().flatten())
        });
        let computed = ValueRange::from_values(values)?;
        Some(ValueRange::new(
            self.min_override.unwrap_or(computed.min),
            self.max_override.unwrap_or(computed.max),
        ))
    }
}

/// Value scales of one panel for one frame.
///
/// With normalization every symbol keeps its own range and the axis reads
/// 0-100 percent; without it every symbol shares one global range. All
/// consumers (lines, candles, events, crosshair) go through this type so a
/// frame never mixes policies.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelScaling {
    normalized: bool,
    shared: ValueRange,
    per_symbol: IndexMap<String, ValueRange>,
}

impl PanelScaling {
    /// Computes the scaling, `None` when no input has visible samples.
    #[must_use]
    pub fn compute(inputs: &[ScaleInput<'_>], normalized: bool) -> Option<Self> {
        let per_symbol: IndexMap<String, ValueRange> = inputs
            .iter()
            .filter_map(|input| Some((input.symbol.to_owned(), input.range()?)))
            .collect();
        let shared = per_symbol
            .values()
            .copied()
            .reduce(|acc, range| acc.include(range.min).include(range.max))?;
        Some(Self {
            normalized,
            shared,
            per_symbol,
        })
    }

    /// Scaling used when only annotations exist in a panel.
    #[must_use]
    pub fn from_shared(shared: ValueRange, normalized: bool) -> Self {
        Self {
            normalized,
            shared,
            per_symbol: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    /// Raw-value range used to project `symbol`'s samples.
    #[must_use]
    pub fn range_for(&self, symbol: &str) -> ValueRange {
        if self.normalized {
            self.per_symbol.get(symbol).copied().unwrap_or(self.shared)
        } else {
            self.shared
        }
    }

    /// Raw-value range shared by all symbols.
    #[must_use]
    pub fn shared_range(&self) -> ValueRange {
        self.shared
    }

    /// Range labelled on the Y axis.
    #[must_use]
    pub fn axis_range(&self) -> ValueRange {
        if self.normalized {
            ValueRange::PERCENT
        } else {
            self.shared
        }
    }

    /// Converts a raw value of `symbol` into axis units.
    #[must_use]
    pub fn to_axis_value(&self, symbol: &str, raw: f64) -> f64 {
        if self.normalized {
            self.range_for(symbol).to_percent(raw)
        } else {
            raw
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PanelScaling, ScaleInput};
    use crate::core::{TimeSeriesPoint, ValueRange};

    fn points(values: &[f64]) -> Vec<TimeSeriesPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| TimeSeriesPoint::line(i as i64, *v).expect("point"))
            .collect()
    }

    fn input<'a>(symbol: &'a str, points: &'a [TimeSeriesPoint]) -> ScaleInput<'a> {
        ScaleInput {
            symbol,
            points,
            min_override: None,
            max_override: None,
            include_wicks: false,
        }
    }

    #[test]
    fn shared_policy_uses_global_min_max() {
        let a = points(&[1.0, 5.0]);
        let b = points(&[100.0, 200.0]);
        let scaling =
            PanelScaling::compute(&[input("A", &a), input("B", &b)], false).expect("scaling");
        assert_eq!(scaling.range_for("A"), ValueRange::new(1.0, 200.0));
        assert_eq!(scaling.axis_range(), ValueRange::new(1.0, 200.0));
    }

    #[test]
    fn normalized_policy_keeps_per_symbol_ranges() {
        let a = points(&[1.0, 5.0]);
        let b = points(&[100.0, 200.0]);
        let scaling =
            PanelScaling::compute(&[input("A", &a), input("B", &b)], true).expect("scaling");
        assert_eq!(scaling.range_for("A"), ValueRange::new(1.0, 5.0));
        assert_eq!(scaling.range_for("B"), ValueRange::new(100.0, 200.0));
        assert_eq!(scaling.axis_range(), ValueRange::PERCENT);
        assert_eq!(scaling.to_axis_value("B", 150.0), 50.0);
    }

    #[test]
    fn explicit_overrides_replace_computed_bounds() {
        let a = points(&[1.0, 5.0]);
        let mut first = input("A", &a);
        first.min_override = Some(0.0);
        first.max_override = Some(10.0);
        let scaling = PanelScaling::compute(&[first], true).expect("scaling");
        assert_eq!(scaling.range_for("A"), ValueRange::new(0.0, 10.0));
    }

    #[test]
    fn wicks_extend_range_only_when_requested() {
        let candles = vec![TimeSeriesPoint::candle(0, 5.0, 9.0, 2.0, 6.0).expect("candle")];
        let mut with_wicks = input("A", &candles);
        assert_eq!(
            PanelScaling::compute(&[with_wicks], false)
                .expect("scaling")
                .shared_range(),
            ValueRange::new(6.0, 6.0)
        );
        with_wicks.include_wicks = true;
        assert_eq!(
            PanelScaling::compute(&[with_wicks], false)
                .expect("scaling")
                .shared_range(),
            ValueRange::new(2.0, 9.0)
        );
    }

    #[test]
    fn empty_inputs_have_no_scaling() {
        let empty: Vec<TimeSeriesPoint> = Vec::new();
        assert!(PanelScaling::compute(&[input("A", &empty)], false).is_none());
    }
}
