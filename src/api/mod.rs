//! Public chart facade.
//!
//! `OverlayChart` is split across small `impl` blocks: construction and
//! accessors, data/state controllers, gesture controllers, and one scene
//! builder per group of pipeline layers. Builders only read state; the
//! render coordinator stores the hit regions they produce.

mod average_scene_builder;
mod axis_scene_builder;
mod axis_ticks;
mod chart_data;
mod chart_runtime;
mod data_controller;
mod engine;
mod engine_accessors;
mod engine_config;
mod engine_core;
mod engine_init;
mod event_scene_builder;
mod frame_plan;
mod hit_map;
mod interaction_controller;
mod label_formatter;
mod layout_helpers;
mod overlay_scene_builder;
mod panel_scene_builder;
mod render_coordinator;
mod render_frame_builder;
mod series_scene_builder;
mod touch_controller;
mod view_state;
mod zoom_controller;

pub use chart_data::{ChartData, NamedSeries, Ticker};
pub use engine::{OverlayChart, PointClickHandler};
pub use engine_config::{ChartConfig, ChartLayout, ChartStyle, InteractionTuning};
pub use hit_map::{CursorReadout, LegendTarget, PointSelection, ZoomAction};
pub use label_formatter::{
    AxisTitleFormatterFn, CandleColorFn, ChartFormatters, LineColorFn, TimeFormatterFn,
    ValueFormatterFn,
};
pub use view_state::{AverageKind, AverageSpec, ViewState, ViewStatePatch};
