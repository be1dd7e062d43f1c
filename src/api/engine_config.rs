use serde::{Deserialize, Serialize};

use crate::core::ChartPadding;
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// Public chart bootstrap configuration.
///
/// This type is serializable so host applications can persist/load chart setup
/// without inventing their own ad-hoc format. Formatting callbacks live in
/// `ChartFormatters` because closures cannot be serialized.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub layout: ChartLayout,
    pub style: ChartStyle,
    pub interaction: InteractionTuning,
}

impl ChartConfig {
    pub fn validate(&self) -> ChartResult<()> {
        self.layout.validate()?;
        self.style.validate()?;
        self.interaction.validate()
    }

    #[must_use]
    pub fn with_padding(mut self, padding: ChartPadding) -> Self {
        self.layout.padding = padding;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartLayout {
    pub padding: ChartPadding,
    pub max_x_labels: usize,
    pub incline_x_labels: bool,
    pub y_tick_count: usize,
    pub legend_font_size_px: f64,
    pub axis_font_size_px: f64,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            padding: ChartPadding::default(),
            max_x_labels: 8,
            incline_x_labels: false,
            y_tick_count: 5,
            legend_font_size_px: 12.0,
            axis_font_size_px: 11.0,
        }
    }
}

impl ChartLayout {
    fn validate(&self) -> ChartResult<()> {
        self.padding.validate()?;
        if self.max_x_labels == 0 {
            return Err(ChartError::InvalidData(
                "layout `max_x_labels` must be > 0".to_owned(),
            ));
        }
        if self.y_tick_count < 2 {
            return Err(ChartError::InvalidData(
                "layout `y_tick_count` must be >= 2".to_owned(),
            ));
        }
        for (value, name) in [
            (self.legend_font_size_px, "legend_font_size_px"),
            (self.axis_font_size_px, "axis_font_size_px"),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "layout `{name}` must be finite and > 0"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    pub background: Color,
    pub grid: Color,
    pub axis: Color,
    pub text: Color,
    pub divider: Color,
    pub crosshair: Color,
    pub selection: Color,
    pub tooltip_background: Color,
    pub tooltip_border: Color,
    pub candle_up: Color,
    pub candle_down: Color,
    pub event: Color,
    pub line_width_px: f64,
    pub point_radius_px: f64,
    /// Colors assigned in order to tickers without an explicit color.
    pub palette: Vec<Color>,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            background: Color::rgb(1.0, 1.0, 1.0),
            grid: Color::rgba(0.0, 0.0, 0.0, 0.07),
            axis: Color::rgb(0.55, 0.55, 0.58),
            text: Color::rgb(0.2, 0.2, 0.24),
            divider: Color::rgb(0.8, 0.8, 0.82),
            crosshair: Color::rgba(0.25, 0.25, 0.3, 0.6),
            selection: Color::rgba(0.16, 0.47, 0.87, 0.18),
            tooltip_background: Color::rgba(1.0, 1.0, 1.0, 0.95),
            tooltip_border: Color::rgb(0.75, 0.75, 0.78),
            candle_up: Color::rgb(0.149, 0.651, 0.604),
            candle_down: Color::rgb(0.937, 0.325, 0.314),
            event: Color::rgb(0.55, 0.27, 0.68),
            line_width_px: 1.5,
            point_radius_px: 3.0,
            palette: vec![
                Color::rgb(0.122, 0.467, 0.706),
                Color::rgb(1.0, 0.498, 0.055),
                Color::rgb(0.173, 0.627, 0.173),
                Color::rgb(0.839, 0.153, 0.157),
                Color::rgb(0.580, 0.404, 0.741),
                Color::rgb(0.549, 0.337, 0.294),
                Color::rgb(0.890, 0.467, 0.761),
                Color::rgb(0.498, 0.498, 0.498),
            ],
        }
    }
}

impl ChartStyle {
    fn validate(&self) -> ChartResult<()> {
        for color in [
            self.background,
            self.grid,
            self.axis,
            self.text,
            self.divider,
            self.crosshair,
            self.selection,
            self.tooltip_background,
            self.tooltip_border,
            self.candle_up,
            self.candle_down,
            self.event,
        ]
        .iter()
        .chain(self.palette.iter())
        {
            color.validate()?;
        }
        if self.palette.is_empty() {
            return Err(ChartError::InvalidData(
                "style palette must not be empty".to_owned(),
            ));
        }
        for (value, name) in [
            (self.line_width_px, "line_width_px"),
            (self.point_radius_px, "point_radius_px"),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "style `{name}` must be finite and > 0"
                )));
            }
        }
        Ok(())
    }

    /// Palette color for the `index`-th ticker.
    #[must_use]
    pub fn palette_color(&self, index: usize) -> Color {
        self.palette
            .get(index % self.palette.len().max(1))
            .copied()
            .unwrap_or(self.text)
    }
}

/// Gesture tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionTuning {
    /// Span multiplier of one zoom-in step; zoom-out uses its inverse.
    pub zoom_in_factor: f64,
    /// Windows within this many percent of the full range snap to it.
    pub snap_tolerance: f64,
    /// Narrowest zoom window, in percent.
    pub min_zoom_span: f64,
    pub min_selection_px: f64,
    pub pinch_threshold_px: f64,
    pub event_hit_radius_px: f64,
    pub point_hit_radius_px: f64,
    pub double_tap_ms: i64,
    pub double_tap_slop_px: f64,
    /// Pointer travel below which a press/release pair counts as a click.
    pub click_slop_px: f64,
}

impl Default for InteractionTuning {
    fn default() -> Self {
        Self {
            zoom_in_factor: 0.7,
            snap_tolerance: 0.5,
            min_zoom_span: 0.1,
            min_selection_px: 5.0,
            pinch_threshold_px: 10.0,
            event_hit_radius_px: 6.0,
            point_hit_radius_px: 6.0,
            double_tap_ms: 300,
            double_tap_slop_px: 30.0,
            click_slop_px: 3.0,
        }
    }
}

impl InteractionTuning {
    #[must_use]
    pub fn zoom_out_factor(self) -> f64 {
        1.0 / self.zoom_in_factor
    }

    fn validate(&self) -> ChartResult<()> {
        if !(self.zoom_in_factor > 0.0 && self.zoom_in_factor < 1.0) {
            return Err(ChartError::InvalidData(
                "interaction `zoom_in_factor` must be in (0, 1)".to_owned(),
            ));
        }
        for (value, name) in [
            (self.snap_tolerance, "snap_tolerance"),
            (self.min_zoom_span, "min_zoom_span"),
            (self.min_selection_px, "min_selection_px"),
            (self.pinch_threshold_px, "pinch_threshold_px"),
            (self.event_hit_radius_px, "event_hit_radius_px"),
            (self.point_hit_radius_px, "point_hit_radius_px"),
            (self.double_tap_slop_px, "double_tap_slop_px"),
            (self.click_slop_px, "click_slop_px"),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "interaction `{name}` must be finite and >= 0"
                )));
            }
        }
        if self.double_tap_ms < 0 {
            return Err(ChartError::InvalidData(
                "interaction `double_tap_ms` must be >= 0".to_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ChartConfig, InteractionTuning};

    #[test]
    fn defaults_are_valid_and_zoom_out_inverts_zoom_in() {
        let config = ChartConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.layout.padding.top, 50.0);
        assert_eq!(config.layout.max_x_labels, 8);
        let tuning = InteractionTuning::default();
        assert!((tuning.zoom_in_factor * tuning.zoom_out_factor() - 1.0).abs() <= 1e-12);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: ChartConfig =
            serde_json::from_str(r#"{"layout":{"max_x_labels":4}}"#).expect("config");
        assert_eq!(config.layout.max_x_labels, 4);
        assert_eq!(config.layout.y_tick_count, 5);
        assert_eq!(config.interaction.pinch_threshold_px, 10.0);
    }

    #[test]
    fn invalid_zoom_factor_is_rejected() {
        let mut config = ChartConfig::default();
        config.interaction.zoom_in_factor = 1.2;
        assert!(config.validate().is_err());
    }
}
