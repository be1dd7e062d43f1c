use serde::{Deserialize, Serialize};

/// Mutually exclusive pointer gesture modes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InteractionMode {
    Idle,
    /// Horizontal zoom-box drag, only started while fully zoomed out.
    ZoomSelecting { origin_x: f64, current_x: f64 },
    /// Window translation drag, only started while zoomed in.
    Panning { last_x: f64 },
    /// Two-touch gesture; `last_distance` is the distance at the last step.
    Pinching { last_distance: f64 },
}

/// One discrete zoom step produced by a pinch gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PinchStep {
    ZoomIn,
    ZoomOut,
}

/// Public crosshair state exposed to host applications.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CrosshairState {
    pub visible: bool,
    pub x: f64,
    pub y: f64,
}

/// One active touch contact in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub id: u64,
    pub x: f64,
    pub y: f64,
}

impl TouchPoint {
    #[must_use]
    pub fn new(id: u64, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    #[must_use]
    pub fn midpoint(self, other: Self) -> (f64, f64) {
        ((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TapRecord {
    time_ms: i64,
    x: f64,
    y: f64,
}

/// Gesture state machine. Pure bookkeeping; the engine decides what each
/// transition means for the view state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionState {
    mode: InteractionMode,
    cursor_x: f64,
    cursor_y: f64,
    crosshair: CrosshairState,
    last_tap: Option<TapRecord>,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            mode: InteractionMode::Idle,
            cursor_x: 0.0,
            cursor_y: 0.0,
            crosshair: CrosshairState::default(),
            last_tap: None,
        }
    }
}

impl InteractionState {
    #[must_use]
    pub fn mode(self) -> InteractionMode {
        self.mode
    }

    #[must_use]
    pub fn cursor(self) -> (f64, f64) {
        (self.cursor_x, self.cursor_y)
    }

    #[must_use]
    pub fn crosshair(self) -> CrosshairState {
        self.crosshair
    }

    /// Crosshair is hidden while a drag gesture owns the pointer.
    #[must_use]
    pub fn crosshair_suppressed(self) -> bool {
        matches!(
            self.mode,
            InteractionMode::ZoomSelecting { .. } | InteractionMode::Panning { .. }
        )
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        self.cursor_x = x;
        self.cursor_y = y;
        self.crosshair = CrosshairState {
            visible: true,
            x,
            y,
        };
        match &mut self.mode {
            InteractionMode::ZoomSelecting { current_x, .. } => *current_x = x,
            InteractionMode::Idle
            | InteractionMode::Panning { .. }
            | InteractionMode::Pinching { .. } => {}
        }
    }

    pub fn on_pointer_leave(&mut self) {
        self.crosshair.visible = false;
    }

    pub fn begin_zoom_select(&mut self, x: f64) {
        self.mode = InteractionMode::ZoomSelecting {
            origin_x: x,
            current_x: x,
        };
    }

    /// Current selection as `(left, right)` pixels.
    #[must_use]
    pub fn selection(self) -> Option<(f64, f64)> {
        match self.mode {
            InteractionMode::ZoomSelecting {
                origin_x,
                current_x,
            } => Some((origin_x.min(current_x), origin_x.max(current_x))),
            _ => None,
        }
    }

    pub fn begin_pan(&mut self, x: f64) {
        self.mode = InteractionMode::Panning { last_x: x };
    }

    /// Pixel delta since the previous pan position, `None` outside a pan.
    pub fn pan_to(&mut self, x: f64) -> Option<f64> {
        match &mut self.mode {
            InteractionMode::Panning { last_x } => {
                let delta = x - *last_x;
                *last_x = x;
                Some(delta)
            }
            _ => None,
        }
    }

    pub fn begin_pinch(&mut self, distance: f64) {
        self.mode = InteractionMode::Pinching {
            last_distance: distance,
        };
    }

    /// Emits one zoom step once the distance moved beyond `threshold_px`
    /// since the last step. Spreading the fingers zooms in.
    pub fn pinch_to(&mut self, distance: f64, threshold_px: f64) -> Option<PinchStep> {
        let InteractionMode::Pinching { last_distance } = &mut self.mode else {
            return None;
        };
        let delta = distance - *last_distance;
        if delta.abs() <= threshold_px {
            return None;
        }
        *last_distance = distance;
        Some(if delta > 0.0 {
            PinchStep::ZoomIn
        } else {
            PinchStep::ZoomOut
        })
    }

    /// Leaves the current gesture and returns the mode it ended.
    pub fn end_gesture(&mut self) -> InteractionMode {
        std::mem::replace(&mut self.mode, InteractionMode::Idle)
    }

    /// Records a tap and reports whether it completes a double tap.
    pub fn register_tap(
        &mut self,
        time_ms: i64,
        x: f64,
        y: f64,
        window_ms: i64,
        slop_px: f64,
    ) -> bool {
        let is_double = self.last_tap.is_some_and(|previous| {
            let elapsed = time_ms.saturating_sub(previous.time_ms);
            (0..=window_ms).contains(&elapsed) && (x - previous.x).hypot(y - previous.y) <= slop_px
        });
        self.last_tap = if is_double {
            None
        } else {
            Some(TapRecord { time_ms, x, y })
        };
        is_double
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::{InteractionMode, InteractionState, PinchStep, TouchPoint};

    #[test]
    fn zoom_selection_tracks_pointer_and_orders_edges() {
        let mut state = InteractionState::default();
        state.begin_zoom_select(300.0);
        state.on_pointer_move(120.0, 40.0);
        assert_eq!(state.selection(), Some((120.0, 300.0)));
        assert!(state.crosshair_suppressed());
        let ended = state.end_gesture();
        assert!(matches!(ended, InteractionMode::ZoomSelecting { .. }));
        assert_eq!(state.mode(), InteractionMode::Idle);
    }

    #[test]
    fn pan_reports_incremental_deltas() {
        let mut state = InteractionState::default();
        assert_eq!(state.pan_to(5.0), None);
        state.begin_pan(100.0);
        assert_eq!(state.pan_to(90.0), Some(-10.0));
        assert_eq!(state.pan_to(95.0), Some(5.0));
    }

    #[test]
    fn pinch_steps_only_past_threshold() {
        let a = TouchPoint::new(1, 0.0, 0.0);
        let b = TouchPoint::new(2, 30.0, 40.0);
        let mut state = InteractionState::default();
        state.begin_pinch(a.distance_to(b));
        assert_eq!(state.pinch_to(55.0, 10.0), None);
        assert_eq!(state.pinch_to(61.0, 10.0), Some(PinchStep::ZoomIn));
        assert_eq!(state.pinch_to(55.0, 10.0), None);
        assert_eq!(state.pinch_to(40.0, 10.0), Some(PinchStep::ZoomOut));
        assert_eq!(a.midpoint(b), (15.0, 20.0));
    }

    #[test]
    fn double_tap_requires_time_and_distance_proximity() {
        let mut state = InteractionState::default();
        assert!(!state.register_tap(1_000, 10.0, 10.0, 300, 30.0));
        assert!(state.register_tap(1_200, 20.0, 15.0, 300, 30.0));
        // A completed double tap does not chain into a third.
        assert!(!state.register_tap(1_300, 20.0, 15.0, 300, 30.0));
        assert!(!state.register_tap(1_800, 20.0, 15.0, 300, 30.0));
        assert!(!state.register_tap(1_900, 200.0, 15.0, 300, 30.0));
    }
}
