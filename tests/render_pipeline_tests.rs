use approx::assert_abs_diff_eq;
use overlay_chart::api::{
    AverageSpec, ChartConfig, ChartData, ChartFormatters, NamedSeries, OverlayChart, Ticker,
    ViewStatePatch,
};
use overlay_chart::core::{MILLIS_PER_DAY, PathCommand, TimeSeriesPoint, Viewport};
use overlay_chart::extensions::CommonEvents;
use overlay_chart::render::{
    Color, DrawCommand, NullRenderer, PathPrimitive, RenderFrame, StrokeStyle,
};

const AAA_HEX: &str = "#1f77b4";
const BBB_HEX: &str = "#d62728";

fn series_at(days: &[i64], values: &[f64]) -> NamedSeries {
    NamedSeries::new(
        days.iter()
            .zip(values)
            .map(|(day, value)| TimeSeriesPoint::line(day * MILLIS_PER_DAY, *value).expect("point"))
            .collect(),
    )
}

fn chart_with(tickers: Vec<Ticker>, patch: ViewStatePatch) -> OverlayChart<NullRenderer> {
    let data = ChartData::new(tickers, CommonEvents::default()).expect("data");
    OverlayChart::new(
        NullRenderer::new(Viewport::new(800, 600)),
        data,
        patch,
        ChartConfig::default(),
        ChartFormatters::default(),
    )
    .expect("chart init")
}

fn last_frame(chart: &OverlayChart<NullRenderer>) -> &RenderFrame {
    chart.renderer().last_frame.as_ref().expect("frame")
}

fn paths_in<'a>(frame: &'a RenderFrame, color: Color) -> Vec<&'a PathPrimitive> {
    frame
        .paths()
        .filter(|path| path.stroke.is_some_and(|stroke| stroke.color == color))
        .collect()
}

fn vertical_extent(paths: &[&PathPrimitive]) -> (f64, f64) {
    paths
        .iter()
        .flat_map(|path| path.commands.iter().filter_map(|command| command.end_point()))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, y)| {
            (lo.min(y), hi.max(y))
        })
}

fn color(hex: &str) -> Color {
    Color::from_hex(hex).expect("hex")
}

#[test]
fn background_is_painted_first_and_crosshair_last() {
    let ticker = Ticker::new("AAA")
        .with_color(AAA_HEX)
        .with_series("price", series_at(&[0, 1, 2, 3], &[1.0, 2.0, 3.0, 2.0]));
    let mut chart = chart_with(vec![ticker], ViewStatePatch::default());
    chart.pointer_move(400.0, 300.0).expect("hover");

    let frame = last_frame(&chart);
    let background = chart.config().style.background;
    match frame.commands.first() {
        Some(DrawCommand::Rect(rect)) => {
            assert_eq!(rect.fill_color, Some(background));
            assert_eq!((rect.width, rect.height), (800.0, 600.0));
        }
        other => panic!("expected background rect first, got {other:?}"),
    }

    let crosshair = chart.config().style.crosshair;
    let position = |predicate: &dyn Fn(&DrawCommand) -> bool| {
        frame
            .commands
            .iter()
            .position(|command| predicate(command))
            .expect("command present")
    };
    let crosshair_at = position(&|command: &DrawCommand| {
        matches!(command, DrawCommand::Line(line) if line.stroke.color == crosshair && line.x1 == 400.0)
    });
    let reset_at = position(&|command: &DrawCommand| {
        matches!(command, DrawCommand::Text(text) if text.text == "reset")
    });
    let line_at = position(&|command: &DrawCommand| {
        matches!(command, DrawCommand::Path(path) if path.stroke.is_some_and(|s| s.color == color(AAA_HEX)))
    });
    assert!(line_at < reset_at);
    assert!(reset_at < crosshair_at);
}

#[test]
fn series_gaps_are_dashed_unless_filled() {
    let ticker = Ticker::new("AAA").with_color(AAA_HEX).with_series(
        "price",
        series_at(&[0, 1, 2, 3, 10, 11], &[5.0, 6.0, 5.5, 6.5, 7.0, 7.5]),
    );
    let mut chart = chart_with(vec![ticker], ViewStatePatch::default());

    let dashed = |chart: &OverlayChart<NullRenderer>| {
        paths_in(last_frame(chart), color(AAA_HEX))
            .iter()
            .filter(|path| path.stroke.is_some_and(|s| s.style == StrokeStyle::GAP))
            .count()
    };
    assert_eq!(dashed(&chart), 1);
    assert!(paths_in(last_frame(&chart), color(AAA_HEX)).len() >= 2);

    chart
        .update_state(ViewStatePatch {
            fill_gaps: Some(true),
            ..ViewStatePatch::default()
        })
        .expect("fill gaps");
    assert_eq!(dashed(&chart), 0);
}

#[test]
fn normalized_tickers_share_the_panel_height() {
    let small = Ticker::new("AAA")
        .with_color(AAA_HEX)
        .with_series("price", series_at(&[0, 1, 2, 3], &[10.0, 20.0, 15.0, 12.0]));
    let large = Ticker::new("BBB")
        .with_color(BBB_HEX)
        .with_series("price", series_at(&[0, 1, 2, 3], &[1_000.0, 1_500.0, 2_000.0, 1_200.0]));
    let chart = chart_with(
        vec![small, large],
        ViewStatePatch {
            normalize: Some(true),
            ..ViewStatePatch::default()
        },
    );

    let frame = last_frame(&chart);
    let (a_top, a_bottom) = vertical_extent(&paths_in(frame, color(AAA_HEX)));
    let (b_top, b_bottom) = vertical_extent(&paths_in(frame, color(BBB_HEX)));
    assert_abs_diff_eq!(a_top, b_top, epsilon = 1e-6);
    assert_abs_diff_eq!(a_bottom, b_bottom, epsilon = 1e-6);

    let readout = chart.readout_at(400.0, 300.0).expect("inside plot");
    assert!(readout.normalized);
    assert!((0.0..=100.0).contains(&readout.value));
}

#[test]
fn raw_mode_keeps_tickers_on_one_shared_scale() {
    let small = Ticker::new("AAA")
        .with_color(AAA_HEX)
        .with_series("price", series_at(&[0, 1, 2], &[10.0, 20.0, 15.0]));
    let large = Ticker::new("BBB")
        .with_color(BBB_HEX)
        .with_series("price", series_at(&[0, 1, 2], &[1_000.0, 2_000.0, 1_500.0]));
    let chart = chart_with(vec![small, large], ViewStatePatch::default());

    let frame = last_frame(&chart);
    let (a_top, a_bottom) = vertical_extent(&paths_in(frame, color(AAA_HEX)));
    let (b_top, b_bottom) = vertical_extent(&paths_in(frame, color(BBB_HEX)));
    assert!(b_bottom - b_top > 10.0 * (a_bottom - a_top));
    assert!(!chart.readout_at(400.0, 300.0).expect("inside plot").normalized);
}

#[test]
fn global_average_spans_ragged_tickers_and_is_cached() {
    let early = Ticker::new("AAA")
        .with_color(AAA_HEX)
        .with_series("price", series_at(&[0, 1, 2, 3, 4], &[10.0, 11.0, 12.0, 13.0, 14.0]));
    let late = Ticker::new("BBB")
        .with_color(BBB_HEX)
        .with_series("price", series_at(&[3, 4, 5, 6, 7], &[20.0, 21.0, 22.0, 23.0, 24.0]));
    let average = AverageSpec::global("avg", "Average", "#2ca02c");
    let mut chart = chart_with(
        vec![early, late],
        ViewStatePatch {
            average_configs: Some(vec![average.clone()]),
            ..ViewStatePatch::default()
        },
    );

    let average_color = average.resolved_color().expect("color");
    let frame = last_frame(&chart);
    let average_paths = paths_in(frame, average_color);
    assert_eq!(average_paths.len(), 1);
    let stroke = average_paths[0].stroke.expect("stroke");
    assert_eq!(stroke.style, StrokeStyle::AVERAGE);
    assert_eq!(stroke.width, 2.0);
    // One vertex per master timeline sample (days 0 to 7).
    assert_eq!(average_paths[0].commands.len(), 8);
    assert!(matches!(
        average_paths[0].commands[0],
        PathCommand::MoveTo { .. }
    ));

    let misses = chart.average_cache_stats().misses;
    chart.pointer_move(400.0, 300.0).expect("hover");
    let stats = chart.average_cache_stats();
    assert_eq!(stats.misses, misses);
    assert!(stats.hits >= 1);

    chart
        .update_state(ViewStatePatch {
            visible_tickers: Some(vec!["AAA".to_owned()]),
            ..ViewStatePatch::default()
        })
        .expect("hide BBB");
    assert!(chart.average_cache_stats().misses > misses);
}

#[test]
fn hidden_average_draws_nothing_but_stays_in_the_legend() {
    let ticker = Ticker::new("AAA")
        .with_color(AAA_HEX)
        .with_series("price", series_at(&[0, 1, 2], &[1.0, 2.0, 3.0]));
    let mut average = AverageSpec::moving("ma", "MA 2d", "#9467bd", 2 * MILLIS_PER_DAY);
    average.visible = false;
    let chart = chart_with(
        vec![ticker],
        ViewStatePatch {
            average_configs: Some(vec![average.clone()]),
            ..ViewStatePatch::default()
        },
    );

    let frame = last_frame(&chart);
    assert!(paths_in(frame, average.resolved_color().expect("color")).is_empty());
    assert!(frame.texts().any(|text| text.text == "MA 2d"));
}

#[test]
fn candles_draw_bodies_and_hide_values_drops_value_labels() {
    let points = (0..4)
        .map(|day| {
            let open = 10.0 + day as f64;
            TimeSeriesPoint::candle(day * MILLIS_PER_DAY, open, open + 2.0, open - 1.0, open + 1.0)
                .expect("candle")
        })
        .collect();
    let ticker = Ticker::new("AAA")
        .with_color(AAA_HEX)
        .with_series("price", NamedSeries::new(points));
    let mut chart = chart_with(
        vec![ticker],
        ViewStatePatch {
            show_candles: Some(true),
            hide_lines: Some(true),
            ..ViewStatePatch::default()
        },
    );

    let candle_up = chart.config().style.candle_up;
    let frame = last_frame(&chart);
    assert_eq!(
        frame
            .rects()
            .filter(|rect| rect.fill_color == Some(candle_up))
            .count(),
        4
    );
    assert!(paths_in(frame, color(AAA_HEX)).is_empty());
    let labels_before = frame.texts().count();

    chart
        .update_state(ViewStatePatch {
            hide_values: Some(true),
            ..ViewStatePatch::default()
        })
        .expect("hide values");
    assert!(last_frame(&chart).texts().count() < labels_before);
}

#[test]
fn sparse_series_keeps_its_line_inside_a_zoomed_window() {
    let sparse = Ticker::new("AAA")
        .with_color(AAA_HEX)
        .with_series("price", series_at(&[0, 100], &[10.0, 30.0]));
    let days: Vec<i64> = (0..=100).collect();
    let values: Vec<f64> = days.iter().map(|day| 20.0 + (*day % 7) as f64).collect();
    let dense = Ticker::new("BBB")
        .with_color(BBB_HEX)
        .with_series("price", series_at(&days, &values));
    let mut chart = chart_with(vec![sparse, dense], ViewStatePatch::default());
    assert_eq!(paths_in(last_frame(&chart), color(AAA_HEX)).len(), 1);

    // Days 40..60 hold no AAA sample.
    chart
        .update_state(ViewStatePatch::zoom(40.0, 60.0))
        .expect("zoom");
    let frame = last_frame(&chart);
    let sparse_paths = paths_in(frame, color(AAA_HEX));
    assert_eq!(sparse_paths.len(), 1);
    let ends: Vec<(f64, f64)> = sparse_paths[0]
        .commands
        .iter()
        .filter_map(|command| command.end_point())
        .collect();
    let (first_x, _) = ends.first().copied().expect("start");
    let (last_x, _) = ends.last().copied().expect("end");
    // The default padding puts the plot between x 60 and 780.
    assert!(first_x < 60.0);
    assert!(last_x > 780.0);
    assert!(!paths_in(frame, color(BBB_HEX)).is_empty());
}

#[test]
fn candle_direction_follows_the_close_against_the_open() {
    let points = vec![
        TimeSeriesPoint::candle(0, 10.0, 12.0, 8.0, 11.0).expect("rising"),
        TimeSeriesPoint::candle(MILLIS_PER_DAY, 11.0, 12.0, 8.0, 9.0).expect("falling"),
        TimeSeriesPoint::candle(2 * MILLIS_PER_DAY, 9.0, 10.0, 7.0, 8.0).expect("falling"),
    ];
    let ticker = Ticker::new("AAA")
        .with_color(AAA_HEX)
        .with_series("price", NamedSeries::new(points));
    let chart = chart_with(
        vec![ticker],
        ViewStatePatch {
            show_candles: Some(true),
            ..ViewStatePatch::default()
        },
    );

    let style = &chart.config().style;
    let frame = last_frame(&chart);
    let bodies = |fill: Color| {
        frame
            .rects()
            .filter(|rect| rect.fill_color == Some(fill))
            .count()
    };
    assert_eq!(bodies(style.candle_up), 1);
    assert_eq!(bodies(style.candle_down), 2);
}
