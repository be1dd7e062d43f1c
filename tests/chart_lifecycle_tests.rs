use overlay_chart::api::{
    ChartConfig, ChartData, ChartFormatters, NamedSeries, OverlayChart, Ticker, ViewStatePatch,
};
use overlay_chart::core::{MILLIS_PER_DAY, TimeSeriesPoint, Viewport};
use overlay_chart::error::ChartError;
use overlay_chart::extensions::CommonEvents;
use overlay_chart::render::{DrawCommand, NullRenderer};

fn daily_series(values: &[f64]) -> NamedSeries {
    NamedSeries::new(
        values
            .iter()
            .enumerate()
            .map(|(day, value)| {
                TimeSeriesPoint::line(day as i64 * MILLIS_PER_DAY, *value).expect("valid point")
            })
            .collect(),
    )
}

fn three_panel_data() -> ChartData {
    let ticker = Ticker::new("AAA")
        .with_color("#1f77b4")
        .with_series("price", daily_series(&[10.0, 11.0, 12.5, 12.0]))
        .with_series("volume", daily_series(&[100.0, 140.0, 90.0, 120.0]))
        .with_series("rsi", daily_series(&[45.0, 55.0, 62.0, 58.0]));
    ChartData::new(vec![ticker], CommonEvents::default()).expect("valid data")
}

fn chart(viewport: Viewport, data: ChartData) -> OverlayChart<NullRenderer> {
    OverlayChart::new(
        NullRenderer::new(viewport),
        data,
        ViewStatePatch::default(),
        ChartConfig::default(),
        ChartFormatters::default(),
    )
    .expect("chart init")
}

#[test]
fn construction_renders_the_first_frame() {
    let chart = chart(Viewport::new(800, 600), three_panel_data());
    assert_eq!(chart.renderer().render_count, 1);
    let frame = chart.renderer().last_frame.as_ref().expect("frame");
    assert!(!frame.is_empty());
    assert_eq!(
        chart.state().visible_chart_keys,
        vec!["price".to_owned(), "volume".to_owned(), "rsi".to_owned()]
    );
}

#[test]
fn missing_surface_fails_fast() {
    let result = OverlayChart::new(
        NullRenderer::detached(),
        three_panel_data(),
        ViewStatePatch::default(),
        ChartConfig::default(),
        ChartFormatters::default(),
    );
    assert!(matches!(result, Err(ChartError::SurfaceUnavailable)));
}

#[test]
fn invalid_initial_state_is_rejected() {
    let result = OverlayChart::new(
        NullRenderer::new(Viewport::new(800, 600)),
        three_panel_data(),
        ViewStatePatch::zoom(70.0, 20.0),
        ChartConfig::default(),
        ChartFormatters::default(),
    );
    assert!(matches!(result, Err(ChartError::InvalidData(_))));
}

#[test]
fn panels_split_the_padded_height_evenly() {
    // 900 px minus 50 px top and 40 px bottom padding, three panels.
    let chart = chart(Viewport::new(800, 900), three_panel_data());

    let keys: Vec<String> = [60.0, 319.0, 321.0, 589.0, 591.0, 859.0]
        .iter()
        .map(|y| chart.readout_at(400.0, *y).expect("inside plot").chart_key)
        .collect();
    assert_eq!(keys, vec!["price", "price", "volume", "volume", "rsi", "rsi"]);
    assert!(chart.readout_at(400.0, 861.0).is_none());

    let divider = chart.config().style.divider;
    let frame = chart.renderer().last_frame.as_ref().expect("frame");
    let mut divider_ys: Vec<f64> = frame
        .lines()
        .filter(|line| line.stroke.color == divider && line.y1 == line.y2)
        .map(|line| line.y1)
        .collect();
    divider_ys.sort_by(f64::total_cmp);
    assert_eq!(divider_ys, vec![320.0, 590.0]);
}

#[test]
fn hiding_chart_keys_relayouts_the_remaining_panels() {
    let mut chart = chart(Viewport::new(800, 900), three_panel_data());
    chart
        .update_state(ViewStatePatch {
            visible_chart_keys: Some(vec!["volume".to_owned()]),
            ..ViewStatePatch::default()
        })
        .expect("update");
    let readout = chart.readout_at(400.0, 60.0).expect("inside plot");
    assert_eq!(readout.chart_key, "volume");
    assert_eq!(
        chart.readout_at(400.0, 859.0).map(|r| r.chart_key),
        Some("volume".to_owned())
    );
}

#[test]
fn resize_rerenders_at_the_new_size() {
    let mut chart = chart(Viewport::new(800, 600), three_panel_data());
    chart.resize(Viewport::new(1024, 768)).expect("resize");
    assert_eq!(chart.viewport(), Viewport::new(1024, 768));
    assert_eq!(chart.renderer().render_count, 2);
    let frame = chart.renderer().last_frame.as_ref().expect("frame");
    assert_eq!(frame.viewport, Viewport::new(1024, 768));

    assert!(matches!(
        chart.resize(Viewport::new(0, 768)),
        Err(ChartError::InvalidViewport { .. })
    ));
}

#[test]
fn destroyed_chart_ignores_resize_and_rejects_everything_else() {
    let mut chart = chart(Viewport::new(800, 600), three_panel_data());
    chart.destroy();
    chart.destroy();
    assert!(chart.is_destroyed());

    let renders = chart.renderer().render_count;
    chart
        .resize(Viewport::new(640, 480))
        .expect("resize after destroy is a no-op");
    assert_eq!(chart.renderer().render_count, renders);
    assert_eq!(chart.viewport(), Viewport::new(800, 600));

    assert!(matches!(chart.render(), Err(ChartError::Destroyed)));
    assert!(matches!(chart.zoom_in(0.5), Err(ChartError::Destroyed)));
    assert!(matches!(chart.pointer_move(100.0, 100.0), Err(ChartError::Destroyed)));
    assert!(matches!(
        chart.update_state(ViewStatePatch::default()),
        Err(ChartError::Destroyed)
    ));
    assert!(matches!(
        chart.set_data(three_panel_data()),
        Err(ChartError::Destroyed)
    ));
}

#[test]
fn set_data_keeps_survivor_visibility_and_shows_new_tickers() {
    let first = ChartData::new(
        vec![
            Ticker::new("AAA").with_series("price", daily_series(&[1.0, 2.0])),
            Ticker::new("BBB").with_series("price", daily_series(&[3.0, 4.0])),
        ],
        CommonEvents::default(),
    )
    .expect("data");
    let mut chart = chart(Viewport::new(800, 600), first);
    chart
        .update_state(ViewStatePatch {
            visible_tickers: Some(vec!["AAA".to_owned()]),
            ..ViewStatePatch::default()
        })
        .expect("hide BBB");

    let second = ChartData::new(
        vec![
            Ticker::new("AAA").with_series("price", daily_series(&[1.0, 2.0])),
            Ticker::new("BBB").with_series("price", daily_series(&[3.0, 4.0])),
            Ticker::new("CCC").with_series("price", daily_series(&[5.0, 6.0])),
        ],
        CommonEvents::default(),
    )
    .expect("data");
    chart.set_data(second).expect("set data");

    let visible: Vec<&str> = chart
        .state()
        .visible_tickers
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(visible, vec!["AAA", "CCC"]);
    assert_eq!(chart.state().enabled_tickers.len(), 3);
}

#[test]
fn empty_data_renders_chrome_without_series() {
    let empty = ChartData::new(Vec::new(), CommonEvents::default()).expect("data");
    let chart = chart(Viewport::new(800, 600), empty);
    let frame = chart.renderer().last_frame.as_ref().expect("frame");
    assert!(frame.paths().next().is_none());
    assert!(matches!(frame.commands.first(), Some(DrawCommand::Rect(_))));
    assert!(chart.readout_at(400.0, 300.0).is_none());
}
