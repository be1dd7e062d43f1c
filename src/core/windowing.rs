use crate::core::{TimeSeriesPoint, TimeWindow};

/// Sorted, de-duplicated union of sample times across many series.
#[must_use]
pub fn master_timeline<'a, I>(series: I) -> Vec<i64>
where
    I: IntoIterator<Item = &'a [TimeSeriesPoint]>,
{
    let mut times: Vec<i64> = series
        .into_iter()
        .flat_map(|points| points.iter().map(|point| point.time))
        .collect();
    times.sort_unstable();
    times.dedup();
    times
}

/// Full time extent covered by a set of series, `None` when all are empty.
#[must_use]
pub fn time_extent<'a, I>(series: I) -> Option<TimeWindow>
where
    I: IntoIterator<Item = &'a [TimeSeriesPoint]>,
{
    series
        .into_iter()
        .filter_map(|points| Some((points.first()?.time, points.last()?.time)))
        .fold(None, |acc: Option<TimeWindow>, (first, last)| match acc {
            Some(window) => Some(TimeWindow::new(window.min.min(first), window.max.max(last))),
            None => Some(TimeWindow::new(first, last)),
        })
}

/// Returns points whose time falls inside an inclusive window.
///
/// Points must be sorted ascending by time.
#[must_use]
pub fn points_in_time_window(points: &[TimeSeriesPoint], window: TimeWindow) -> &[TimeSeriesPoint] {
    let start = points.partition_point(|point| point.time < window.min);
    let end = points.partition_point(|point| point.time <= window.max);
    &points[start..end.max(start)]
}

/// Points inside `window` plus the series' own neighbor on each side, so
/// paths reach the clip edges even when no sample falls inside the window.
#[must_use]
pub fn widened_points(points: &[TimeSeriesPoint], window: TimeWindow) -> &[TimeSeriesPoint] {
    let start = points
        .partition_point(|point| point.time < window.min)
        .saturating_sub(1);
    let end = (points.partition_point(|point| point.time <= window.max) + 1).min(points.len());
    &points[start..end.max(start)]
}
