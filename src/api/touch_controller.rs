use crate::error::{ChartError, ChartResult};
use crate::interaction::{InteractionMode, PinchStep, TouchPoint};
use crate::render::Renderer;

use super::{OverlayChart, ZoomAction};

impl<R: Renderer> OverlayChart<R> {
    /// New touches on the surface. Two touches start a pinch; a single touch
    /// behaves like a press, and a quick second tap inside a zoomed plot
    /// resets the zoom.
    pub fn touch_start(&mut self, touches: &[TouchPoint], time_ms: i64) -> ChartResult<()> {
        self.ensure_alive()?;
        validate_touches(touches)?;
        match touches {
            [] => Ok(()),
            [first, second, ..] => {
                let runtime = &mut self.core.runtime;
                runtime.interaction.begin_pinch(first.distance_to(*second));
                runtime.press = None;
                runtime.hovered_event = None;
                runtime.hovered_point = None;
                self.render()
            }
            [touch] => {
                let tuning = self.core.config.interaction;
                let double_tap = self.core.runtime.interaction.register_tap(
                    time_ms,
                    touch.x,
                    touch.y,
                    tuning.double_tap_ms,
                    tuning.double_tap_slop_px,
                );
                let zoomed = !self.core.state.zoom.is_full();
                if double_tap && zoomed && self.core.runtime.hit_map.plot_contains(touch.x, touch.y)
                {
                    self.core.runtime.interaction.end_gesture();
                    self.core.runtime.press = None;
                    self.step_zoom(ZoomAction::Reset, 0.5);
                } else {
                    self.press_at(touch.x, touch.y);
                }
                self.render()
            }
        }
    }

    /// Touch movement: pinch steps while two fingers are down, otherwise a
    /// pointer move.
    pub fn touch_move(&mut self, touches: &[TouchPoint]) -> ChartResult<()> {
        self.ensure_alive()?;
        validate_touches(touches)?;
        match touches {
            [] => Ok(()),
            [first, second, ..] => {
                let threshold = self.core.config.interaction.pinch_threshold_px;
                let step = self
                    .core
                    .runtime
                    .interaction
                    .pinch_to(first.distance_to(*second), threshold);
                let Some(step) = step else {
                    return Ok(());
                };
                let (mid_x, _) = first.midpoint(*second);
                let anchor = self.core.runtime.hit_map.plot_fraction(mid_x).unwrap_or(0.5);
                let action = match step {
                    PinchStep::ZoomIn => ZoomAction::ZoomIn,
                    PinchStep::ZoomOut => ZoomAction::ZoomOut,
                };
                self.step_zoom(action, anchor);
                self.render()
            }
            [touch] => {
                if matches!(
                    self.core.runtime.interaction.mode(),
                    InteractionMode::Pinching { .. }
                ) {
                    return Ok(());
                }
                self.move_to(touch.x, touch.y);
                self.render()
            }
        }
    }

    /// A finger lifted at `lifted`. Ends a pinch, or releases the press and
    /// hides the crosshair.
    pub fn touch_end(&mut self, lifted: TouchPoint) -> ChartResult<()> {
        self.ensure_alive()?;
        validate_touches(&[lifted])?;
        if matches!(
            self.core.runtime.interaction.mode(),
            InteractionMode::Pinching { .. }
        ) {
            self.core.runtime.interaction.end_gesture();
        } else {
            self.release_at(lifted.x, lifted.y);
        }
        self.core.runtime.interaction.on_pointer_leave();
        self.core.runtime.hovered_event = None;
        self.core.runtime.hovered_point = None;
        self.render()
    }
}

fn validate_touches(touches: &[TouchPoint]) -> ChartResult<()> {
    if touches
        .iter()
        .all(|touch| touch.x.is_finite() && touch.y.is_finite())
    {
        Ok(())
    } else {
        Err(ChartError::InvalidData(
            "touch coordinates must be finite".to_owned(),
        ))
    }
}
