use indexmap::IndexSet;
use tracing::debug;

use crate::core::Viewport;
use crate::error::ChartResult;
use crate::render::Renderer;

use super::engine::PointClickHandler;
use super::{
    ChartConfig, ChartData, ChartFormatters, LegendTarget, OverlayChart, ViewState,
    ViewStatePatch,
};

impl<R: Renderer> OverlayChart<R> {
    /// Replaces all data, drops cached aggregates and re-renders.
    ///
    /// Tickers keep their visibility when they survive the replacement; new
    /// tickers start visible. Chart keys that no longer exist are dropped.
    pub fn set_data(&mut self, data: ChartData) -> ChartResult<()> {
        self.ensure_alive()?;
        data.validate()?;

        let previous = &self.core.state;
        let known: IndexSet<&str> = self.core.data.tickers.keys().map(String::as_str).collect();
        let visible_tickers: IndexSet<String> = data
            .tickers
            .keys()
            .filter(|symbol| {
                previous.visible_tickers.contains(*symbol) || !known.contains(symbol.as_str())
            })
            .cloned()
            .collect();
        let available_keys = data.chart_keys();
        let mut visible_chart_keys: Vec<String> = previous
            .visible_chart_keys
            .iter()
            .filter(|key| available_keys.contains(key))
            .cloned()
            .collect();
        if visible_chart_keys.is_empty() {
            visible_chart_keys = available_keys;
        }

        let state = ViewState {
            enabled_tickers: data.tickers.keys().cloned().collect(),
            visible_tickers,
            visible_chart_keys,
            ..previous.clone()
        };
        debug!(
            tickers = data.tickers.len(),
            panels = state.visible_chart_keys.len(),
            "chart data replaced"
        );
        self.core.data = data;
        self.core.state = state;
        self.core.runtime.clear_selection();
        self.core.runtime.average_cache.borrow_mut().clear();
        self.core.runtime.invalidate_averages();
        self.render()
    }

    /// Merges `patch` into the view state and re-renders. Invalid patches are
    /// rejected without touching the current state.
    pub fn update_state(&mut self, patch: ViewStatePatch) -> ChartResult<()> {
        self.ensure_alive()?;
        let next = self.core.state.merged(&patch)?;
        if patch.touches_averages() {
            self.core.runtime.invalidate_averages();
        }
        debug!(?patch, "view state updated");
        self.core.state = next;
        self.render()
    }

    /// Replaces layout, style and gesture tuning.
    pub fn set_config(&mut self, config: ChartConfig) -> ChartResult<()> {
        self.ensure_alive()?;
        config.validate()?;
        self.core.config = config;
        self.render()
    }

    pub fn set_formatters(&mut self, formatters: ChartFormatters) -> ChartResult<()> {
        self.ensure_alive()?;
        self.core.formatters = formatters;
        self.render()
    }

    pub fn set_point_click_handler(
        &mut self,
        handler: Option<PointClickHandler>,
    ) -> ChartResult<()> {
        self.ensure_alive()?;
        self.core.point_click_handler = handler;
        Ok(())
    }

    /// Applies a new surface size and re-renders. A no-op once destroyed.
    pub fn resize(&mut self, viewport: Viewport) -> ChartResult<()> {
        if self.core.runtime.destroyed {
            return Ok(());
        }
        let viewport = viewport.validate()?;
        if viewport != self.core.viewport {
            debug!(width = viewport.width, height = viewport.height, "chart resized");
        }
        self.core.viewport = viewport;
        self.render()
    }

    /// Flips the visibility of a legend item without touching whether the
    /// ticker is loaded.
    pub fn toggle_legend_item(&mut self, target: &LegendTarget) -> ChartResult<()> {
        self.ensure_alive()?;
        if self.flip_legend_item(target) {
            self.render()
        } else {
            Ok(())
        }
    }

    /// Mutates visibility only; reports whether anything changed.
    pub(super) fn flip_legend_item(&mut self, target: &LegendTarget) -> bool {
        match target {
            LegendTarget::Ticker(symbol) => {
                if !self.core.state.enabled_tickers.contains(symbol) {
                    return false;
                }
                let visible = &mut self.core.state.visible_tickers;
                if !visible.shift_remove(symbol) {
                    visible.insert(symbol.clone());
                }
            }
            LegendTarget::Average(id) => {
                let Some(spec) = self
                    .core
                    .state
                    .average_configs
                    .iter_mut()
                    .find(|spec| &spec.id == id)
                else {
                    return false;
                };
                spec.visible = !spec.visible;
            }
        }
        debug!(?target, "legend item toggled");
        self.core.runtime.invalidate_averages();
        true
    }
}
