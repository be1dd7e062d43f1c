use crate::core::{PlotRect, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{CirclePrimitive, LinePrimitive, PathPrimitive, RectPrimitive, TextPrimitive};

/// One ordered draw command. Later commands paint over earlier ones.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Saves drawing state and restricts drawing to the rectangle.
    PushClip(PlotRect),
    /// Restores the state saved by the matching `PushClip`.
    PopClip,
    Line(LinePrimitive),
    Rect(RectPrimitive),
    Circle(CirclePrimitive),
    Path(PathPrimitive),
    Text(TextPrimitive),
}

/// Backend-agnostic scene for one chart draw pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub commands: Vec<DrawCommand>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            commands: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_command(mut self, command: DrawCommand) -> Self {
        self.commands.push(command);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.viewport.validate()?;

        let mut clip_depth = 0usize;
        for command in &self.commands {
            match command {
                DrawCommand::PushClip(rect) => {
                    if ![rect.left, rect.top, rect.width, rect.height]
                        .iter()
                        .all(|v| v.is_finite())
                    {
                        return Err(ChartError::InvalidData(
                            "clip rectangle must be finite".to_owned(),
                        ));
                    }
                    clip_depth += 1;
                }
                DrawCommand::PopClip => {
                    clip_depth = clip_depth.checked_sub(1).ok_or_else(|| {
                        ChartError::InvalidData("clip pop without matching push".to_owned())
                    })?;
                }
                DrawCommand::Line(line) => line.validate()?,
                DrawCommand::Rect(rect) => rect.validate()?,
                DrawCommand::Circle(circle) => circle.validate()?,
                DrawCommand::Path(path) => path.validate()?,
                DrawCommand::Text(text) => text.validate()?,
            }
        }
        if clip_depth != 0 {
            return Err(ChartError::InvalidData(format!(
                "{clip_depth} clip scope(s) left open"
            )));
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &LinePrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Line(line) => Some(line),
            _ => None,
        })
    }

    pub fn paths(&self) -> impl Iterator<Item = &PathPrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Path(path) => Some(path),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextPrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text(text) => Some(text),
            _ => None,
        })
    }

    pub fn rects(&self) -> impl Iterator<Item = &RectPrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Rect(rect) => Some(rect),
            _ => None,
        })
    }

    pub fn circles(&self) -> impl Iterator<Item = &CirclePrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Circle(circle) => Some(circle),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{DrawCommand, RenderFrame};
    use crate::core::{PlotRect, Viewport};

    #[test]
    fn unbalanced_clip_scopes_fail_validation() {
        let open = RenderFrame::new(Viewport::new(10, 10))
            .with_command(DrawCommand::PushClip(PlotRect::new(0.0, 0.0, 5.0, 5.0)));
        assert!(open.validate().is_err());

        let stray = RenderFrame::new(Viewport::new(10, 10)).with_command(DrawCommand::PopClip);
        assert!(stray.validate().is_err());

        let balanced = RenderFrame::new(Viewport::new(10, 10))
            .with_command(DrawCommand::PushClip(PlotRect::new(0.0, 0.0, 5.0, 5.0)))
            .with_command(DrawCommand::PopClip);
        assert!(balanced.validate().is_ok());
    }
}
