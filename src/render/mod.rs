mod frame;
mod layer_stack;
mod layered_frame;
mod null_renderer;
mod primitives;
mod text_metrics;

pub use frame::{DrawCommand, RenderFrame};
pub use layer_stack::FrameLayer;
pub use layered_frame::{LayerCommands, LayeredRenderFrame};
pub use null_renderer::NullRenderer;
pub use primitives::{
    CirclePrimitive, Color, LinePrimitive, PathPrimitive, RectPrimitive, Stroke, StrokeStyle,
    TextBaseline, TextHAlign, TextPrimitive,
};
pub use text_metrics::{estimate_text_width_px, line_height_px};

use crate::core::Viewport;
use crate::error::ChartResult;

/// Contract implemented by any drawing surface.
///
/// Backends receive a fully materialized, validated-by-construction
/// `RenderFrame` so drawing code stays isolated from chart state and gesture
/// handling.
pub trait Renderer {
    /// Size of the drawable surface, `None` when no surface is available.
    fn surface_size(&self) -> Option<Viewport>;

    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoContextRenderer, CairoRenderStats, CairoRenderer};
