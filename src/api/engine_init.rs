use tracing::debug;

use crate::error::{ChartError, ChartResult};
use crate::render::Renderer;

use super::{
    ChartConfig, ChartData, ChartFormatters, OverlayChart, ViewState, ViewStatePatch,
    chart_runtime::ChartRuntimeState, engine_core::EngineCore,
};

impl<R: Renderer> OverlayChart<R> {
    /// Creates a chart over `renderer` and renders the first frame.
    ///
    /// Fails fast with `ChartError::SurfaceUnavailable` when the renderer has
    /// no drawable surface, and with `InvalidData`/`InvalidEvent` when the
    /// inputs do not validate.
    pub fn new(
        renderer: R,
        data: ChartData,
        initial_state: ViewStatePatch,
        config: ChartConfig,
        formatters: ChartFormatters,
    ) -> ChartResult<Self> {
        let viewport = renderer
            .surface_size()
            .ok_or(ChartError::SurfaceUnavailable)?
            .validate()?;
        config.validate()?;
        data.validate()?;
        let state = ViewState::for_data(&data).merged(&initial_state)?;

        debug!(
            tickers = data.tickers.len(),
            panels = state.visible_chart_keys.len(),
            width = viewport.width,
            height = viewport.height,
            "chart created"
        );

        let mut chart = Self {
            renderer,
            core: EngineCore {
                viewport,
                data,
                state,
                config,
                formatters,
                runtime: ChartRuntimeState::default(),
                point_click_handler: None,
            },
        };
        chart.render()?;
        Ok(chart)
    }
}
