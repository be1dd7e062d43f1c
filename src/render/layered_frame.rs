use crate::core::{PlotRect, Viewport};

use super::{DrawCommand, FrameLayer, RenderFrame};

/// Commands collected for one pipeline step.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerCommands {
    pub layer: FrameLayer,
    pub commands: Vec<DrawCommand>,
}

/// Frame under construction, bucketed by pipeline step.
///
/// Builders may emit layers in any order; `flatten` always yields the
/// canonical paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct LayeredRenderFrame {
    pub viewport: Viewport,
    layers: Vec<LayerCommands>,
}

impl LayeredRenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            layers: FrameLayer::ORDER
                .iter()
                .map(|layer| LayerCommands {
                    layer: *layer,
                    commands: Vec::new(),
                })
                .collect(),
        }
    }

    pub fn push(&mut self, layer: FrameLayer, command: DrawCommand) {
        self.layers[layer.index()].commands.push(command);
    }

    pub fn extend(&mut self, layer: FrameLayer, commands: impl IntoIterator<Item = DrawCommand>) {
        self.layers[layer.index()].commands.extend(commands);
    }

    /// Emits `commands` inside a save/clip/restore scope. Empty input emits nothing.
    pub fn push_clipped(&mut self, layer: FrameLayer, clip: PlotRect, commands: Vec<DrawCommand>) {
        if commands.is_empty() {
            return;
        }
        let bucket = &mut self.layers[layer.index()].commands;
        bucket.push(DrawCommand::PushClip(clip));
        bucket.extend(commands);
        bucket.push(DrawCommand::PopClip);
    }

    #[must_use]
    pub fn layer(&self, layer: FrameLayer) -> &[DrawCommand] {
        &self.layers[layer.index()].commands
    }

    #[must_use]
    pub fn flatten(self) -> RenderFrame {
        let mut frame = RenderFrame::new(self.viewport);
        for layer in self.layers {
            frame.commands.extend(layer.commands);
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::LayeredRenderFrame;
    use crate::core::{PlotRect, Viewport};
    use crate::render::{Color, DrawCommand, FrameLayer, LinePrimitive, Stroke};

    fn line(y: f64) -> DrawCommand {
        DrawCommand::Line(LinePrimitive::new(
            0.0,
            y,
            5.0,
            y,
            Stroke::solid(1.0, Color::rgb(0.2, 0.2, 0.2)),
        ))
    }

    #[test]
    fn flatten_uses_canonical_order_regardless_of_push_order() {
        let mut layered = LayeredRenderFrame::new(Viewport::new(100, 50));
        layered.push(FrameLayer::Crosshair, line(3.0));
        layered.push(FrameLayer::Events, line(2.0));
        layered.push(FrameLayer::Grid, line(1.0));

        let frame = layered.flatten();
        let ys: Vec<f64> = frame.lines().map(|l| l.y1).collect();
        assert_eq!(ys, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn push_clipped_wraps_commands_in_a_scope() {
        let mut layered = LayeredRenderFrame::new(Viewport::new(100, 50));
        let clip = PlotRect::new(0.0, 0.0, 10.0, 10.0);
        layered.push_clipped(FrameLayer::Lines, clip, vec![line(1.0)]);
        layered.push_clipped(FrameLayer::Lines, clip, Vec::new());
        let commands = layered.layer(FrameLayer::Lines);
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0], DrawCommand::PushClip(clip));
        assert_eq!(commands[2], DrawCommand::PopClip);
    }
}
