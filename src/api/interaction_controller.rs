use tracing::debug;

use crate::error::{ChartError, ChartResult};
use crate::extensions::EventId;
use crate::interaction::InteractionMode;
use crate::render::Renderer;

use super::chart_runtime::{PressState, PressTarget};
use super::{OverlayChart, PointSelection, ZoomAction};

impl<R: Renderer> OverlayChart<R> {
    /// Starts a press: on a control it arms a click, inside the plot it starts
    /// a zoom selection (fully zoomed out) or a pan (zoomed in).
    pub fn pointer_down(&mut self, x: f64, y: f64) -> ChartResult<()> {
        self.ensure_alive()?;
        validate_pointer(x, y)?;
        self.press_at(x, y);
        self.render()
    }

    /// Tracks the cursor: extends a selection, pans, or updates hover state.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> ChartResult<()> {
        self.ensure_alive()?;
        validate_pointer(x, y)?;
        self.move_to(x, y);
        self.render()
    }

    /// Ends a press: commits a selection or resolves a click.
    pub fn pointer_up(&mut self, x: f64, y: f64) -> ChartResult<()> {
        self.ensure_alive()?;
        validate_pointer(x, y)?;
        self.release_at(x, y);
        self.render()
    }

    /// Hides the crosshair and abandons any drag in progress.
    pub fn pointer_leave(&mut self) -> ChartResult<()> {
        self.ensure_alive()?;
        let runtime = &mut self.core.runtime;
        runtime.interaction.end_gesture();
        runtime.interaction.on_pointer_leave();
        runtime.press = None;
        runtime.hovered_event = None;
        runtime.hovered_point = None;
        self.render()
    }

    /// Wheel over the plot area zooms one step around the cursor; negative
    /// deltas zoom in.
    pub fn wheel(&mut self, x: f64, y: f64, delta_y: f64) -> ChartResult<()> {
        self.ensure_alive()?;
        validate_pointer(x, y)?;
        let hit_map = &self.core.runtime.hit_map;
        if !hit_map.plot_contains(x, y) || delta_y == 0.0 || !delta_y.is_finite() {
            return Ok(());
        }
        let anchor = hit_map.plot_fraction(x).unwrap_or(0.5);
        let action = if delta_y < 0.0 {
            ZoomAction::ZoomIn
        } else {
            ZoomAction::ZoomOut
        };
        self.step_zoom(action, anchor);
        self.render()
    }

    /// Double click inside the plot resets a zoomed chart.
    pub fn double_click(&mut self, x: f64, y: f64) -> ChartResult<()> {
        self.ensure_alive()?;
        validate_pointer(x, y)?;
        if !self.core.runtime.hit_map.plot_contains(x, y) || self.core.state.zoom.is_full() {
            return Ok(());
        }
        self.reset_zoom()
    }

    pub(super) fn press_at(&mut self, x: f64, y: f64) {
        let target = self.press_target_at(x, y);
        let runtime = &mut self.core.runtime;
        if target.is_none() && runtime.hit_map.plot_contains(x, y) {
            if self.core.state.zoom.is_full() {
                runtime.interaction.begin_zoom_select(x);
            } else {
                runtime.interaction.begin_pan(x);
            }
            runtime.hovered_event = None;
            runtime.hovered_point = None;
        }
        runtime.interaction.on_pointer_move(x, y);
        runtime.press = Some(PressState { x, y, target });
    }

    pub(super) fn move_to(&mut self, x: f64, y: f64) {
        if let Some(dx) = self.core.runtime.interaction.pan_to(x) {
            if let Some(area) = self.core.runtime.hit_map.plot_area.filter(|a| a.width > 0.0) {
                let zoom = self.core.state.zoom;
                self.commit_zoom(zoom.pan_by(-dx / area.width * zoom.span()));
            }
        }
        let runtime = &mut self.core.runtime;
        runtime.interaction.on_pointer_move(x, y);
        if runtime.interaction.mode() == InteractionMode::Idle {
            self.update_hover(x, y);
        }
    }

    pub(super) fn release_at(&mut self, x: f64, y: f64) {
        let tuning = self.core.config.interaction;
        let mode = self.core.runtime.interaction.end_gesture();
        let press = self.core.runtime.press.take();
        self.core.runtime.interaction.on_pointer_move(x, y);

        if let InteractionMode::ZoomSelecting { origin_x, .. } = mode {
            let (left, right) = (origin_x.min(x), origin_x.max(x));
            if right - left >= tuning.min_selection_px {
                let hit_map = &self.core.runtime.hit_map;
                let selected = hit_map
                    .plot_fraction(left)
                    .zip(hit_map.plot_fraction(right))
                    .and_then(|(a, b)| self.core.state.zoom.select(a, b));
                if let Some(zoom) = selected {
                    self.commit_zoom(zoom);
                }
                return;
            }
        }

        let Some(press) = press else {
            return;
        };
        if press.travelled(x, y) <= tuning.click_slop_px {
            self.click(press.target);
        }
    }

    /// Resolves a completed click on whatever was under the press.
    fn click(&mut self, target: Option<PressTarget>) {
        match target {
            Some(PressTarget::Zoom(action)) => self.step_zoom(action, 0.5),
            Some(PressTarget::Legend(target)) => {
                self.flip_legend_item(&target);
            }
            Some(PressTarget::Event(id)) => self.toggle_pinned_event(id),
            Some(PressTarget::Point(selection)) => self.toggle_pinned_point(selection),
            None => self.release_pins(),
        }
    }

    fn press_target_at(&self, x: f64, y: f64) -> Option<PressTarget> {
        let hit_map = &self.core.runtime.hit_map;
        let tuning = self.core.config.interaction;
        if let Some(action) = hit_map.zoom_button_at(x, y) {
            return Some(PressTarget::Zoom(action));
        }
        if let Some(target) = hit_map.legend_at(x, y) {
            return Some(PressTarget::Legend(target.clone()));
        }
        if self.core.state.show_events {
            if let Some(id) = hit_map.event_at(x, y, tuning.event_hit_radius_px) {
                return Some(PressTarget::Event(id));
            }
        }
        if self.core.state.show_points {
            if let Some(hit) = hit_map.point_at(x, y, tuning.point_hit_radius_px) {
                return Some(PressTarget::Point(hit.selection.clone()));
            }
        }
        None
    }

    fn update_hover(&mut self, x: f64, y: f64) {
        let tuning = self.core.config.interaction;
        let runtime = &mut self.core.runtime;
        runtime.hovered_event = if self.core.state.show_events {
            runtime.hit_map.event_at(x, y, tuning.event_hit_radius_px)
        } else {
            None
        };
        runtime.hovered_point = if self.core.state.show_points {
            runtime
                .hit_map
                .point_at(x, y, tuning.point_hit_radius_px)
                .map(|hit| hit.selection.clone())
        } else {
            None
        };
    }

    /// Clicking the pinned marker again closes its tooltip.
    fn toggle_pinned_event(&mut self, id: EventId) {
        let runtime = &mut self.core.runtime;
        if runtime.pinned_event.as_ref() == Some(&id) {
            runtime.pinned_event = None;
            runtime.hovered_event = None;
            debug!(?id, "event unpinned");
        } else {
            debug!(?id, "event pinned");
            runtime.pinned_event = Some(id);
        }
    }

    fn toggle_pinned_point(&mut self, selection: PointSelection) {
        let runtime = &mut self.core.runtime;
        let released = runtime
            .pinned_point
            .as_ref()
            .is_some_and(|pinned| pinned.same_point(&selection));
        if released {
            runtime.pinned_point = None;
            runtime.hovered_point = None;
            self.notify_point_click(None);
        } else {
            self.notify_point_click(Some(&selection));
            self.core.runtime.pinned_point = Some(selection);
        }
    }

    /// Empty-area click closes pinned tooltips.
    fn release_pins(&mut self) {
        let runtime = &mut self.core.runtime;
        runtime.pinned_event = None;
        if runtime.pinned_point.take().is_some() {
            self.notify_point_click(None);
        }
    }

    fn notify_point_click(&self, selection: Option<&PointSelection>) {
        if let Some(handler) = &self.core.point_click_handler {
            handler(selection);
        }
    }
}

fn validate_pointer(x: f64, y: f64) -> ChartResult<()> {
    if x.is_finite() && y.is_finite() {
        Ok(())
    } else {
        Err(ChartError::InvalidData(
            "pointer coordinates must be finite".to_owned(),
        ))
    }
}
