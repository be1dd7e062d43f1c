use criterion::{Criterion, criterion_group, criterion_main};
use overlay_chart::api::{
    AverageSpec, ChartConfig, ChartData, ChartFormatters, NamedSeries, OverlayChart, Ticker,
    ViewStatePatch,
};
use overlay_chart::core::{
    Extrapolation, MILLIS_PER_DAY, PanelProjection, PlotRect, TimeSeriesPoint, TimeWindow,
    ValueRange, Viewport, global_average, master_timeline, resample_many,
};
use overlay_chart::extensions::CommonEvents;
use overlay_chart::render::NullRenderer;
use std::hint::black_box;

fn ragged_samples(tickers: usize, len: usize) -> Vec<Vec<(i64, f64)>> {
    (0..tickers)
        .map(|ticker| {
            let offset = ticker as i64 * 7;
            (0..len as i64)
                .map(|i| {
                    let time = (offset + i * 3) * MILLIS_PER_DAY;
                    (time, 100.0 + (i as f64 * 0.1).sin() * 10.0 + ticker as f64)
                })
                .collect()
        })
        .collect()
}

fn bench_projection_round_trip(c: &mut Criterion) {
    let projection = PanelProjection::new(
        TimeWindow::new(0, 10_000 * MILLIS_PER_DAY),
        ValueRange::new(0.0, 10_000.0),
        PlotRect::new(60.0, 50.0, 1_840.0, 990.0),
    );

    c.bench_function("projection_round_trip", |b| {
        b.iter(|| {
            let x = projection.x(black_box(4_321 * MILLIS_PER_DAY));
            let y = projection.y(black_box(4_321.123));
            black_box((projection.time_at(x), projection.value_at(y)))
        })
    });
}

fn bench_resample_ragged_20x2k(c: &mut Criterion) {
    let samples = ragged_samples(20, 2_000);
    let points: Vec<Vec<TimeSeriesPoint>> = samples
        .iter()
        .map(|series| {
            series
                .iter()
                .map(|(time, value)| TimeSeriesPoint::line(*time, *value).expect("valid point"))
                .collect()
        })
        .collect();
    let timeline = master_timeline(points.iter().map(Vec::as_slice));

    c.bench_function("resample_ragged_20x2k", |b| {
        b.iter(|| {
            let _ = resample_many(black_box(&samples), black_box(&timeline), Extrapolation::None);
        })
    });

    c.bench_function("global_average_20x2k", |b| {
        b.iter(|| {
            let _ = global_average(black_box(&samples), black_box(&timeline));
        })
    });
}

fn bench_render_frame_10_tickers(c: &mut Criterion) {
    let tickers = ragged_samples(10, 1_000)
        .into_iter()
        .enumerate()
        .map(|(index, samples)| {
            let points = samples
                .into_iter()
                .map(|(time, value)| TimeSeriesPoint::line(time, value).expect("valid point"))
                .collect();
            Ticker::new(format!("T{index}"))
                .with_series("price", NamedSeries::new(points))
                .with_moving_average_windows(vec![30 * MILLIS_PER_DAY])
        })
        .collect();
    let data = ChartData::new(tickers, CommonEvents::default()).expect("valid data");
    let patch = ViewStatePatch {
        normalize: Some(true),
        average_configs: Some(vec![AverageSpec::global("avg", "Average", "#2ca02c")]),
        ..ViewStatePatch::default()
    };
    let mut chart = OverlayChart::new(
        NullRenderer::new(Viewport::new(1920, 1080)),
        data,
        patch,
        ChartConfig::default(),
        ChartFormatters::default(),
    )
    .expect("chart init");

    c.bench_function("render_frame_10_tickers_hover", |b| {
        let mut x = 100.0;
        b.iter(|| {
            x = if x > 1_800.0 { 100.0 } else { x + 7.0 };
            chart.pointer_move(black_box(x), 500.0).expect("hover");
        })
    });
}

criterion_group!(
    benches,
    bench_projection_round_trip,
    bench_resample_ragged_20x2k,
    bench_render_frame_10_tickers
);
criterion_main!(benches);
