use crate::core::Viewport;
use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer};

/// Headless renderer used by tests and non-visual hosts.
///
/// It validates every frame and keeps the last one so tests can inspect the
/// exact draw commands a real backend would execute.
#[derive(Debug)]
pub struct NullRenderer {
    surface: Option<Viewport>,
    pub render_count: usize,
    pub last_frame: Option<RenderFrame>,
}

impl NullRenderer {
    #[must_use]
    pub fn new(surface: Viewport) -> Self {
        Self {
            surface: Some(surface),
            render_count: 0,
            last_frame: None,
        }
    }

    /// Renderer without a drawable surface.
    #[must_use]
    pub fn detached() -> Self {
        Self {
            surface: None,
            render_count: 0,
            last_frame: None,
        }
    }

    pub fn set_surface_size(&mut self, surface: Viewport) {
        self.surface = Some(surface);
    }
}

impl Default for NullRenderer {
    fn default() -> Self {
        Self::new(Viewport::new(800, 600))
    }
}

impl Renderer for NullRenderer {
    fn surface_size(&self) -> Option<Viewport> {
        self.surface
    }

    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.render_count += 1;
        self.last_frame = Some(frame.clone());
        Ok(())
    }
}
