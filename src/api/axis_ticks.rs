use crate::core::{MILLIS_PER_DAY, TimeWindow, ValueRange, next_day_boundary};

/// Evenly spaced time ticks used when the window holds fewer than two day
/// boundaries.
const FALLBACK_TIME_TICKS: usize = 5;
/// Minimum vertical distance between two value labels.
pub(super) const VALUE_LABEL_MIN_SPACING_PX: f64 = 14.0;

const NICE_STEPS: [f64; 4] = [1.0, 2.0, 2.5, 5.0];
const MAX_VALUE_TICKS: usize = 64;

/// Round-number value ticks covering `range`, roughly `count` of them.
pub(super) fn value_ticks(range: ValueRange, count: usize) -> Vec<f64> {
    let span = range.max - range.min;
    if !span.is_finite() || span <= 0.0 || count < 2 {
        return vec![range.min];
    }

    let step = nice_step(span / (count - 1) as f64);
    let first = (range.min / step).ceil() * step;
    let mut ticks = Vec::with_capacity(count + 1);
    let mut index = 0_usize;
    while ticks.len() < MAX_VALUE_TICKS {
        let value = first + step * index as f64;
        if value > range.max + step * 1e-9 {
            break;
        }
        // Snap values like 0.30000000000000004 back to the grid.
        ticks.push((value / step).round() * step);
        index += 1;
    }
    ticks
}

fn nice_step(raw: f64) -> f64 {
    let magnitude = 10_f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    NICE_STEPS
        .iter()
        .copied()
        .find(|step| *step >= normalized)
        .unwrap_or(10.0)
        * magnitude
}

/// UTC day boundaries inside `window`, subsampled to at most `max_labels`.
///
/// Falls back to evenly spaced times when fewer than two boundaries fall
/// inside the window.
pub(super) fn time_ticks(window: TimeWindow, max_labels: usize) -> Vec<i64> {
    let max_labels = max_labels.max(1);
    let first = next_day_boundary(window.min);
    let boundary_count = if first <= window.max {
        ((window.max - first) / MILLIS_PER_DAY + 1) as usize
    } else {
        0
    };

    if boundary_count >= 2 {
        let stride = boundary_count.div_ceil(max_labels) as i64;
        return (0..boundary_count as i64)
            .step_by(stride as usize)
            .map(|index| first + index * MILLIS_PER_DAY)
            .collect();
    }

    let span = window.span();
    if span == 0 {
        return vec![window.min];
    }
    let count = max_labels.clamp(2, FALLBACK_TIME_TICKS);
    (0..count)
        .map(|index| window.min + (span as f64 * index as f64 / (count - 1) as f64).round() as i64)
        .collect()
}

/// Keeps ticks at least `min_spacing_px` apart along their pixel coordinate.
///
/// Each tick is `(value, pixel)`. The last tick is preferred over its
/// predecessor when both cannot fit.
pub(super) fn select_ticks_with_min_spacing(
    mut ticks: Vec<(f64, f64)>,
    min_spacing_px: f64,
) -> Vec<(f64, f64)> {
    ticks.sort_by(|left, right| left.1.total_cmp(&right.1));
    if ticks.len() <= 1 || !min_spacing_px.is_finite() || min_spacing_px <= 0.0 {
        return ticks;
    }

    let mut selected: Vec<(f64, f64)> = Vec::with_capacity(ticks.len());
    for tick in ticks.iter().copied() {
        match selected.last() {
            Some(last) if tick.1 - last.1 < min_spacing_px => {}
            _ => selected.push(tick),
        }
    }

    if let (Some(&last_tick), Some(&selected_last)) = (ticks.last(), selected.last()) {
        if selected_last != last_tick {
            let len = selected.len();
            if len == 1 {
                // On very short axes a single label is clearer than overlapping pairs.
                selected[0] = last_tick;
            } else if last_tick.1 - selected[len - 2].1 >= min_spacing_px {
                selected[len - 1] = last_tick;
            }
        }
    }
    selected
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{select_ticks_with_min_spacing, time_ticks, value_ticks};
    use crate::core::{MILLIS_PER_DAY, TimeWindow, ValueRange};

    #[test]
    fn value_ticks_land_on_round_numbers() {
        let ticks = value_ticks(ValueRange::new(3.0, 97.0), 5);
        assert_eq!(ticks, vec![25.0, 50.0, 75.0]);

        let ticks = value_ticks(ValueRange::new(0.0, 100.0), 5);
        assert_eq!(ticks.len(), 5);
        assert_relative_eq!(ticks[1], 25.0);
    }

    #[test]
    fn flat_range_yields_one_tick() {
        assert_eq!(value_ticks(ValueRange::new(5.0, 5.0), 5), vec![5.0]);
    }

    #[test]
    fn time_ticks_sit_on_day_boundaries_and_are_capped() {
        let window = TimeWindow::new(MILLIS_PER_DAY / 2, 30 * MILLIS_PER_DAY);
        let ticks = time_ticks(window, 8);
        assert!(ticks.len() <= 8);
        assert!(ticks.iter().all(|t| t % MILLIS_PER_DAY == 0));
        assert_eq!(ticks[0], MILLIS_PER_DAY);
    }

    #[test]
    fn intraday_windows_fall_back_to_even_spacing() {
        let window = TimeWindow::new(MILLIS_PER_DAY + 1_000, MILLIS_PER_DAY + 5_000);
        assert_eq!(
            time_ticks(window, 8),
            vec![
                MILLIS_PER_DAY + 1_000,
                MILLIS_PER_DAY + 2_000,
                MILLIS_PER_DAY + 3_000,
                MILLIS_PER_DAY + 4_000,
                MILLIS_PER_DAY + 5_000,
            ]
        );
    }

    #[test]
    fn min_spacing_prefers_the_last_tick() {
        let selected = select_ticks_with_min_spacing(
            vec![(1.0, 0.0), (2.0, 10.0), (3.0, 20.0), (4.0, 26.0)],
            14.0,
        );
        assert_eq!(selected, vec![(1.0, 0.0), (4.0, 26.0)]);

        let single = select_ticks_with_min_spacing(vec![(1.0, 0.0), (2.0, 5.0)], 14.0);
        assert_eq!(single, vec![(2.0, 5.0)]);
    }
}
