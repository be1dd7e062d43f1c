use crate::core::TimeWindow;
use crate::extensions::{
    EventId, EventMarker, EventPlacementContext, EventSource, EventStyle, PlacedEvent,
    TooltipFormat, compose_event_tooltip, draw_events, place_event,
};
use crate::render::{FrameLayer, LayeredRenderFrame, Renderer};

use super::frame_plan::FramePlan;
use super::hit_map::HitMap;
use super::layout_helpers::{BoxStyle, tooltip_commands, tooltip_rect};
use super::{ChartData, OverlayChart};

impl<R: Renderer> OverlayChart<R> {
    pub(super) fn event_style(&self) -> EventStyle {
        let config = &self.core.config;
        EventStyle {
            font_size_px: config.layout.axis_font_size_px,
            text_color: config.style.text,
            default_color: config.style.event,
            ..EventStyle::default()
        }
    }

    /// Places and draws ticker, per-chart and x-axis events.
    pub(super) fn build_event_layer(
        &self,
        plan: &FramePlan<'_>,
        window: TimeWindow,
        frame: &mut LayeredRenderFrame,
        hits: &mut HitMap,
    ) {
        let Some(plot_area) = plan.plot_area else {
            return;
        };
        let style = self.event_style();
        let data = &self.core.data;
        let mut placed: Vec<PlacedEvent> = Vec::new();

        for panel in &plan.panels {
            for drawn in &plan.tickers {
                let Some(series) = drawn.series(&panel.key) else {
                    continue;
                };
                let ctx = EventPlacementContext {
                    projection: panel.projection_for(window, drawn.symbol()),
                    plot_area,
                    first_panel: panel.first,
                };
                let source = EventSource::Ticker(drawn.symbol().to_owned());
                place_all(&series.events, &source, &panel.key, &ctx, &style, &mut placed);
            }
            if let Some(events) = data.common_events.per_chart_events.get(&panel.key) {
                let ctx = EventPlacementContext {
                    projection: panel.shared_projection(window),
                    plot_area,
                    first_panel: panel.first,
                };
                place_all(
                    events,
                    &EventSource::CommonChart,
                    &panel.key,
                    &ctx,
                    &style,
                    &mut placed,
                );
            }
        }

        // One placement spans every panel; the first panel carries the label.
        if let Some(first) = plan.panels.first() {
            let ctx = EventPlacementContext {
                projection: first.shared_projection(window),
                plot_area,
                first_panel: true,
            };
            place_all(
                &data.common_events.x_axis_events,
                &EventSource::CommonXAxis,
                "",
                &ctx,
                &style,
                &mut placed,
            );
        }

        draw_events(frame, &placed, &style, self.core.runtime.active_event());
        hits.events = placed;
    }

    /// Tooltip of the hovered or pinned event, if it is on screen.
    pub(super) fn build_event_tooltip(
        &self,
        plan: &FramePlan<'_>,
        frame: &mut LayeredRenderFrame,
        hits: &HitMap,
    ) {
        let Some(id) = self.core.runtime.active_event() else {
            return;
        };
        let marker = resolve_marker(&self.core.data, id);
        let (Some(marker), Some(placed)) = (marker, hits.find_event(id)) else {
            return;
        };
        let formatters = &self.core.formatters;
        let time = |t: i64| formatters.format_tooltip_time(t);
        let value = |v: f64| formatters.format_tooltip_value(v);
        let format = TooltipFormat {
            time: &time,
            value: &value,
            hide_values: self.core.state.hide_values,
        };
        let lines = compose_event_tooltip(marker, id.vertex, &format);
        if lines.is_empty() {
            return;
        }
        let style = self.tooltip_box_style();
        let anchor = placed.anchor(id.vertex);
        let rect = tooltip_rect(&lines, anchor, style.font_size_px, plan.viewport);
        frame.extend(FrameLayer::EventTooltip, tooltip_commands(&lines, rect, style));
    }

    pub(super) fn tooltip_box_style(&self) -> BoxStyle {
        let config = &self.core.config;
        BoxStyle {
            background: config.style.tooltip_background,
            border: config.style.tooltip_border,
            text: config.style.text,
            font_size_px: config.layout.axis_font_size_px,
        }
    }
}

fn place_all(
    markers: &[EventMarker],
    source: &EventSource,
    chart_key: &str,
    ctx: &EventPlacementContext,
    style: &EventStyle,
    placed: &mut Vec<PlacedEvent>,
) {
    placed.extend(markers.iter().enumerate().filter_map(|(index, marker)| {
        place_event(
            marker,
            EventId::new(source.clone(), chart_key, index),
            ctx,
            style,
        )
    }));
}

/// Marker an id points at in the current data.
pub(super) fn resolve_marker<'a>(data: &'a ChartData, id: &EventId) -> Option<&'a EventMarker> {
    match &id.source {
        EventSource::Ticker(symbol) => data
            .tickers
            .get(symbol)?
            .series
            .get(&id.chart_key)?
            .events
            .get(id.index),
        EventSource::CommonChart => data
            .common_events
            .per_chart_events
            .get(&id.chart_key)?
            .get(id.index),
        EventSource::CommonXAxis => data.common_events.x_axis_events.get(id.index),
    }
}
