//! overlay-chart: interactive multi-panel overlay charts for financial time
//! series.
//!
//! Several tickers share one time axis and are stacked into one panel per
//! chart key (price, volume, ...). The crate resamples ragged series onto a
//! master timeline, projects them into panel rectangles, and emits an
//! immediate-mode `RenderFrame` that any `Renderer` backend can draw. Pointer
//! and touch gestures mutate the view state and re-render synchronously.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{
    AverageKind, AverageSpec, ChartConfig, ChartData, ChartFormatters, CursorReadout,
    LegendTarget, NamedSeries, OverlayChart, PointClickHandler, PointSelection, Ticker, ViewState,
    ViewStatePatch, ZoomAction,
};
pub use error::{ChartError, ChartResult};
