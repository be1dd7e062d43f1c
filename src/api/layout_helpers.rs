use crate::core::{PlotRect, Viewport};
use crate::render::{
    Color, DrawCommand, RectPrimitive, Stroke, TextBaseline, TextHAlign, TextPrimitive,
    estimate_text_width_px, line_height_px,
};

pub(super) const TOOLTIP_PADDING_PX: f64 = 6.0;
pub(super) const TOOLTIP_OFFSET_PX: f64 = 12.0;
pub(super) const READOUT_PADDING_X_PX: f64 = 4.0;
pub(super) const READOUT_PADDING_Y_PX: f64 = 2.0;

/// Colors shared by tooltip boxes and crosshair readouts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct BoxStyle {
    pub(super) background: Color,
    pub(super) border: Color,
    pub(super) text: Color,
    pub(super) font_size_px: f64,
}

/// Text label, `None` when there is nothing to draw.
pub(super) fn label(
    text: String,
    x: f64,
    y: f64,
    font_size_px: f64,
    color: Color,
    align: TextHAlign,
) -> Option<TextPrimitive> {
    (!text.is_empty()).then(|| TextPrimitive::new(text, x, y, font_size_px, color, align))
}

/// Places a multi-line tooltip next to `anchor`.
///
/// The box prefers the upper right of the anchor and flips to the other side
/// of any viewport edge it would cross, then clamps into the viewport.
pub(super) fn tooltip_rect(
    lines: &[String],
    anchor: (f64, f64),
    font_size_px: f64,
    viewport: Viewport,
) -> PlotRect {
    let text_width = lines
        .iter()
        .map(|line| estimate_text_width_px(line, font_size_px))
        .fold(0.0, f64::max);
    let width = text_width + 2.0 * TOOLTIP_PADDING_PX;
    let height = line_height_px(font_size_px) * lines.len() as f64 + 2.0 * TOOLTIP_PADDING_PX;
    let (vw, vh) = (f64::from(viewport.width), f64::from(viewport.height));

    let mut left = anchor.0 + TOOLTIP_OFFSET_PX;
    if left + width > vw {
        left = anchor.0 - TOOLTIP_OFFSET_PX - width;
    }
    let mut top = anchor.1 - TOOLTIP_OFFSET_PX - height;
    if top < 0.0 {
        top = anchor.1 + TOOLTIP_OFFSET_PX;
    }
    PlotRect::new(
        left.clamp(0.0, (vw - width).max(0.0)),
        top.clamp(0.0, (vh - height).max(0.0)),
        width,
        height,
    )
}

/// Background box plus one text row per line.
pub(super) fn tooltip_commands(
    lines: &[String],
    rect: PlotRect,
    style: BoxStyle,
) -> Vec<DrawCommand> {
    let row = line_height_px(style.font_size_px);
    let mut commands = Vec::with_capacity(lines.len() + 1);
    commands.push(DrawCommand::Rect(
        RectPrimitive::filled(rect.left, rect.top, rect.width, rect.height, style.background)
            .with_border(Stroke::solid(1.0, style.border))
            .with_corner_radius(3.0),
    ));
    for (index, line) in lines.iter().enumerate() {
        let y = rect.top + TOOLTIP_PADDING_PX + row * index as f64;
        commands.extend(
            label(
                line.clone(),
                rect.left + TOOLTIP_PADDING_PX,
                y,
                style.font_size_px,
                style.text,
                TextHAlign::Left,
            )
            .map(|text| DrawCommand::Text(text.with_baseline(TextBaseline::Top))),
        );
    }
    commands
}

/// Small boxed value readout centered vertically on `y`.
///
/// `align` picks which side of the box `x` refers to.
pub(super) fn readout_commands(
    text: String,
    x: f64,
    y: f64,
    align: TextHAlign,
    style: BoxStyle,
) -> Vec<DrawCommand> {
    if text.is_empty() {
        return Vec::new();
    }
    let width = estimate_text_width_px(&text, style.font_size_px) + 2.0 * READOUT_PADDING_X_PX;
    let height = style.font_size_px + 2.0 * READOUT_PADDING_Y_PX;
    let left = match align {
        TextHAlign::Left => x,
        TextHAlign::Center => x - width / 2.0,
        TextHAlign::Right => x - width,
    };
    vec![
        DrawCommand::Rect(
            RectPrimitive::filled(left, y - height / 2.0, width, height, style.background)
                .with_border(Stroke::solid(1.0, style.border)),
        ),
        DrawCommand::Text(TextPrimitive::new(
            text,
            left + width / 2.0,
            y,
            style.font_size_px,
            style.text,
            TextHAlign::Center,
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::{TOOLTIP_OFFSET_PX, tooltip_rect};
    use crate::core::Viewport;

    #[test]
    fn tooltip_flips_left_near_the_right_edge() {
        let lines = vec!["2024-01-02".to_owned(), "Close: 10.00".to_owned()];
        let viewport = Viewport::new(400, 300);
        let rect = tooltip_rect(&lines, (100.0, 150.0), 12.0, viewport);
        assert!(rect.left > 100.0);

        let rect = tooltip_rect(&lines, (395.0, 150.0), 12.0, viewport);
        assert!(rect.right() <= 395.0 - TOOLTIP_OFFSET_PX + 1e-9);
    }

    #[test]
    fn tooltip_drops_below_the_anchor_near_the_top() {
        let lines = vec!["label".to_owned()];
        let rect = tooltip_rect(&lines, (100.0, 5.0), 12.0, Viewport::new(400, 300));
        assert!(rect.top > 5.0);
        assert!(rect.bottom() <= 300.0);
    }
}
