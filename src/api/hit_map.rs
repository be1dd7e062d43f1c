use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::{PanelProjection, PlotRect, TimeSeriesPoint};
use crate::extensions::{EventId, PlacedEvent, hit_test_events};
use crate::render::Color;

/// Action bound to one zoom control button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoomAction {
    ZoomIn,
    ZoomOut,
    Reset,
}

/// Item toggled by a legend click.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LegendTarget {
    Ticker(String),
    /// `AverageSpec::id`.
    Average(String),
}

/// Data point handed to the point-click callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointSelection {
    pub symbol: String,
    pub chart_key: String,
    pub point: TimeSeriesPoint,
}

impl PointSelection {
    pub(super) fn same_point(&self, other: &Self) -> bool {
        self.symbol == other.symbol
            && self.chart_key == other.chart_key
            && self.point.time == other.point.time
    }
}

/// Axis values under a pixel position of the last rendered frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorReadout {
    pub chart_key: String,
    pub time: i64,
    /// Percent of the symbol range when the panel is normalized.
    pub value: f64,
    pub normalized: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub(super) struct LegendHit {
    pub(super) rect: PlotRect,
    pub(super) target: LegendTarget,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct ZoomButtonHit {
    pub(super) rect: PlotRect,
    pub(super) action: ZoomAction,
}

#[derive(Debug, Clone, PartialEq)]
pub(super) struct PointHit {
    pub(super) x: f64,
    pub(super) y: f64,
    pub(super) color: Color,
    pub(super) selection: PointSelection,
}

/// Panel geometry kept for crosshair readouts.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct PanelHit {
    pub(super) key: String,
    /// Projection in axis units (percent when normalized).
    pub(super) projection: PanelProjection,
    pub(super) normalized: bool,
}

/// Interactive regions of the last rendered frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub(super) struct HitMap {
    pub(super) plot_area: Option<PlotRect>,
    pub(super) panels: Vec<PanelHit>,
    pub(super) legend: Vec<LegendHit>,
    pub(super) zoom_buttons: Vec<ZoomButtonHit>,
    pub(super) points: Vec<PointHit>,
    pub(super) events: Vec<PlacedEvent>,
}

impl HitMap {
    pub(super) fn plot_contains(&self, x: f64, y: f64) -> bool {
        self.plot_area.is_some_and(|area| area.contains(x, y))
    }

    /// Horizontal position as a fraction of the plot area width.
    pub(super) fn plot_fraction(&self, x: f64) -> Option<f64> {
        let area = self.plot_area?;
        (area.width > 0.0).then(|| ((x - area.left) / area.width).clamp(0.0, 1.0))
    }

    pub(super) fn legend_at(&self, x: f64, y: f64) -> Option<&LegendTarget> {
        self.legend
            .iter()
            .find(|item| item.rect.contains(x, y))
            .map(|item| &item.target)
    }

    pub(super) fn zoom_button_at(&self, x: f64, y: f64) -> Option<ZoomAction> {
        self.zoom_buttons
            .iter()
            .find(|button| button.rect.contains(x, y))
            .map(|button| button.action)
    }

    /// Nearest point within `radius_px`; later points win ties.
    pub(super) fn point_at(&self, x: f64, y: f64, radius_px: f64) -> Option<&PointHit> {
        self.points
            .iter()
            .rev()
            .map(|hit| (OrderedFloat((hit.x - x).hypot(hit.y - y)), hit))
            .filter(|(distance, _)| distance.0 <= radius_px)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, hit)| hit)
    }

    pub(super) fn find_point(&self, selection: &PointSelection) -> Option<&PointHit> {
        self.points
            .iter()
            .find(|hit| hit.selection.same_point(selection))
    }

    pub(super) fn event_at(&self, x: f64, y: f64, radius_px: f64) -> Option<EventId> {
        hit_test_events(&self.events, x, y, radius_px)
    }

    /// First placement of the marker `id` refers to.
    pub(super) fn find_event(&self, id: &EventId) -> Option<&PlacedEvent> {
        self.events.iter().find(|event| event.id.same_marker(id))
    }

    pub(super) fn panel_at(&self, y: f64) -> Option<&PanelHit> {
        self.panels.iter().find(|panel| {
            let rect = panel.projection.rect;
            y >= rect.top && y <= rect.bottom()
        })
    }

    pub(super) fn readout_at(&self, x: f64, y: f64) -> Option<CursorReadout> {
        if !self.plot_contains(x, y) {
            return None;
        }
        let panel = self.panel_at(y)?;
        Some(CursorReadout {
            chart_key: panel.key.clone(),
            time: panel.projection.time_at(x).round() as i64,
            value: panel.projection.value_at(y),
            normalized: panel.normalized,
        })
    }
}
