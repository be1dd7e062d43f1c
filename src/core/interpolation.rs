#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;

use crate::core::TimeSeriesPoint;

/// A segment longer than this multiple of the average spacing is a gap.
pub const GAP_SPACING_MULTIPLIER: f64 = 2.0;

/// How indices outside the known samples are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extrapolation {
    /// Only indices with an exact source sample carry a value.
    None,
    /// Interior indices are interpolated and edges extrapolated linearly.
    Linear,
}

/// Classification of the segment joining two consecutive known samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Continuous,
    Gap,
}

/// `(time, value)` pairs taken from sample closes.
#[must_use]
pub fn close_samples(points: &[TimeSeriesPoint]) -> Vec<(i64, f64)> {
    points.iter().map(|point| (point.time, point.close)).collect()
}

/// Resamples sorted `(time, value)` pairs onto a sorted master timeline.
///
/// The output is aligned with `timeline`; `None` marks a missing value.
#[must_use]
pub fn resample(samples: &[(i64, f64)], timeline: &[i64], mode: Extrapolation) -> Vec<Option<f64>> {
    match mode {
        Extrapolation::None => resample_exact(samples, timeline),
        Extrapolation::Linear => resample_linear(samples, timeline),
    }
}

/// Resamples many series against the same timeline.
#[must_use]
pub fn resample_many(
    series: &[Vec<(i64, f64)>],
    timeline: &[i64],
    mode: Extrapolation,
) -> Vec<Vec<Option<f64>>> {
    #[cfg(feature = "parallel-projection")]
    {
        series
            .par_iter()
            .map(|samples| resample(samples, timeline, mode))
            .collect()
    }

    #[cfg(not(feature = "parallel-projection"))]
    {
        series
            .iter()
            .map(|samples| resample(samples, timeline, mode))
            .collect()
    }
}

fn resample_exact(samples: &[(i64, f64)], timeline: &[i64]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(timeline.len());
    let mut cursor = 0;
    for time in timeline {
        while cursor < samples.len() && samples[cursor].0 < *time {
            cursor += 1;
        }
        match samples.get(cursor) {
            Some((sample_time, value)) if sample_time == time && value.is_finite() => {
                out.push(Some(*value));
            }
            _ => out.push(None),
        }
    }
    out
}

fn resample_linear(samples: &[(i64, f64)], timeline: &[i64]) -> Vec<Option<f64>> {
    let known: Vec<(i64, f64)> = samples
        .iter()
        .copied()
        .filter(|(_, value)| value.is_finite())
        .collect();
    match known.as_slice() {
        [] => vec![None; timeline.len()],
        [(_, only)] => vec![Some(*only); timeline.len()],
        _ => timeline
            .iter()
            .map(|time| Some(linear_value_at(&known, *time)))
            .collect(),
    }
}

/// Value at `time` over at least two known samples, extrapolating at edges.
fn linear_value_at(known: &[(i64, f64)], time: i64) -> f64 {
    let last = known.len() - 1;
    let index = known.partition_point(|(sample_time, _)| *sample_time < time);
    if index <= last && known[index].0 == time {
        return known[index].1;
    }
    let (a, b) = if index == 0 {
        (known[0], known[1])
    } else if index > last {
        (known[last - 1], known[last])
    } else {
        (known[index - 1], known[index])
    };
    lerp(a, b, time)
}

fn lerp((t0, v0): (i64, f64), (t1, v1): (i64, f64), time: i64) -> f64 {
    let span = (t1 - t0) as f64;
    if span == 0.0 {
        return v0;
    }
    v0 + (v1 - v0) * ((time - t0) as f64 / span)
}

/// Known `(timeline index, value)` pairs of a resampled series.
#[must_use]
pub fn known_indices(values: &[Option<f64>]) -> Vec<(usize, f64)> {
    values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| value.map(|value| (index, value)))
        .collect()
}

/// Total time range divided by sample count; `None` for fewer than two samples.
#[must_use]
pub fn average_sample_spacing(times: &[i64]) -> Option<f64> {
    match times {
        [first, .., last] => Some((last - first) as f64 / times.len() as f64),
        _ => None,
    }
}

/// Classifies each segment between consecutive sorted times.
///
/// The output has `times.len() - 1` entries.
#[must_use]
pub fn classify_segments(times: &[i64]) -> Vec<SegmentKind> {
    let Some(spacing) = average_sample_spacing(times) else {
        return Vec::new();
    };
    let threshold = spacing * GAP_SPACING_MULTIPLIER;
    times
        .windows(2)
        .map(|pair| {
            if (pair[1] - pair[0]) as f64 > threshold {
                SegmentKind::Gap
            } else {
                SegmentKind::Continuous
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{Extrapolation, SegmentKind, average_sample_spacing, classify_segments, resample};

    #[test]
    fn exact_mode_leaves_missing_indices_empty() {
        let samples = [(10, 1.0), (30, 3.0)];
        let timeline = [0, 10, 20, 30, 40];
        assert_eq!(
            resample(&samples, &timeline, Extrapolation::None),
            vec![None, Some(1.0), None, Some(3.0), None]
        );
    }

    #[test]
    fn linear_mode_interpolates_and_extrapolates_edges() {
        let samples = [(10, 1.0), (20, 2.0), (30, 6.0)];
        let timeline = [0, 10, 15, 30, 40];
        let values = resample(&samples, &timeline, Extrapolation::Linear);
        assert_eq!(values[0], Some(0.0));
        assert_eq!(values[1], Some(1.0));
        assert_eq!(values[2], Some(1.5));
        assert_eq!(values[3], Some(6.0));
        assert_eq!(values[4], Some(10.0));
    }

    #[test]
    fn linear_mode_with_single_sample_is_flat() {
        let values = resample(&[(5, 4.0)], &[0, 5, 9], Extrapolation::Linear);
        assert_eq!(values, vec![Some(4.0); 3]);
        assert_eq!(resample(&[], &[1, 2], Extrapolation::Linear), vec![None, None]);
    }

    #[test]
    fn gap_threshold_uses_twice_average_spacing() {
        // 5 samples over 100ms -> average spacing 20ms, gap threshold 40ms.
        let times = [0, 10, 20, 30, 100];
        assert_eq!(average_sample_spacing(&times), Some(20.0));
        assert_eq!(
            classify_segments(&times),
            vec![
                SegmentKind::Continuous,
                SegmentKind::Continuous,
                SegmentKind::Continuous,
                SegmentKind::Gap
            ]
        );
        assert!(classify_segments(&[5]).is_empty());
    }
}
