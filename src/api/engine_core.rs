use crate::core::Viewport;

use super::{ChartConfig, ChartData, ChartFormatters, ViewState, chart_runtime::ChartRuntimeState};
use super::engine::PointClickHandler;

/// Internal engine state used by the public facade (`OverlayChart`).
pub(super) struct EngineCore {
    pub(super) viewport: Viewport,
    pub(super) data: ChartData,
    pub(super) state: ViewState,
    pub(super) config: ChartConfig,
    pub(super) formatters: ChartFormatters,
    pub(super) runtime: ChartRuntimeState,
    pub(super) point_click_handler: Option<PointClickHandler>,
}
