use serde::{Deserialize, Serialize};

use crate::core::{PlotRect, Viewport};
use crate::error::{ChartError, ChartResult};

/// Space reserved around the stacked panels.
///
/// `top` hosts the zoom controls, `bottom` the X-axis labels and `left`/`right`
/// the Y-axis gutters shared by every panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPadding {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Default for ChartPadding {
    fn default() -> Self {
        Self {
            top: 50.0,
            bottom: 40.0,
            left: 60.0,
            right: 20.0,
        }
    }
}

impl ChartPadding {
    pub fn validate(self) -> ChartResult<Self> {
        for (value, name) in [
            (self.top, "top"),
            (self.bottom, "bottom"),
            (self.left, "left"),
            (self.right, "right"),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "padding `{name}` must be finite and >= 0"
                )));
            }
        }
        Ok(self)
    }
}

/// Draw rectangle assigned to one visible chart key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelRegion {
    pub key: String,
    pub rect: PlotRect,
}

/// Splits the padded canvas into equal-height panels stacked top to bottom.
///
/// Adjacent panels share their dividing edge; the last panel absorbs any
/// floating-point remainder so the stack ends exactly at the bottom padding.
#[must_use]
pub fn layout_panels(viewport: Viewport, padding: ChartPadding, keys: &[String]) -> Vec<PanelRegion> {
    if keys.is_empty() {
        return Vec::new();
    }

    let width = f64::from(viewport.width);
    let height = f64::from(viewport.height);
    let left = padding.left.min(width);
    let plot_width = (width - padding.left - padding.right).max(0.0);
    let top = padding.top.min(height);
    let bottom = (height - padding.bottom).max(top);
    let panel_height = (bottom - top) / keys.len() as f64;

    let last_index = keys.len() - 1;
    let mut cursor = top;
    keys.iter()
        .enumerate()
        .map(|(index, key)| {
            let next = if index == last_index {
                bottom
            } else {
                cursor + panel_height
            };
            let region = PanelRegion {
                key: key.clone(),
                rect: PlotRect::new(left, cursor, plot_width, next - cursor),
            };
            cursor = next;
            region
        })
        .collect()
}

/// Bounding rectangle of all panels.
#[must_use]
pub fn plot_area(panels: &[PanelRegion]) -> Option<PlotRect> {
    panels
        .iter()
        .map(|panel| panel.rect)
        .reduce(PlotRect::union)
}
