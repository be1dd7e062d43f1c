use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{PanelProjection, PathCommand, PlotRect, catmull_rom_commands, polyline_commands};
use crate::render::{
    CirclePrimitive, Color, DrawCommand, FrameLayer, LayeredRenderFrame, LinePrimitive,
    PathPrimitive, RectPrimitive, Stroke, TextBaseline, TextHAlign, TextPrimitive,
    estimate_text_width_px, line_height_px,
};

use super::{EventMarker, EventShape, MarkerKind, VertexGlyph};

/// Owner of an event list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventSource {
    Ticker(String),
    /// `CommonEvents::per_chart_events` entries.
    CommonChart,
    /// `CommonEvents::x_axis_events`; identified with an empty chart key
    /// because one marker spans every panel.
    CommonXAxis,
}

/// Stable identity of one drawn event (or one vertex of a multi-point event).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId {
    pub source: EventSource,
    pub chart_key: String,
    pub index: usize,
    pub vertex: Option<usize>,
}

impl EventId {
    #[must_use]
    pub fn new(source: EventSource, chart_key: impl Into<String>, index: usize) -> Self {
        Self {
            source,
            chart_key: chart_key.into(),
            index,
            vertex: None,
        }
    }

    #[must_use]
    pub fn with_vertex(mut self, vertex: usize) -> Self {
        self.vertex = Some(vertex);
        self
    }

    /// Same marker, ignoring the vertex.
    #[must_use]
    pub fn same_marker(&self, other: &Self) -> bool {
        self.source == other.source && self.chart_key == other.chart_key && self.index == other.index
    }
}

/// Draw and hit-test priority; later variants paint on top and win hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventPriority {
    Range,
    MultiPoint,
    VerticalLine,
    HorizontalLine,
    Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventStyle {
    pub font_size_px: f64,
    pub text_color: Color,
    pub default_color: Color,
    pub line_width_px: f64,
    pub range_fill_alpha: f64,
    pub marker_size_px: f64,
    pub label_offset_px: f64,
}

impl Default for EventStyle {
    fn default() -> Self {
        Self {
            font_size_px: 11.0,
            text_color: Color::rgb(0.15, 0.15, 0.18),
            default_color: Color::rgb(0.55, 0.27, 0.68),
            line_width_px: 1.0,
            range_fill_alpha: 0.15,
            marker_size_px: 10.0,
            label_offset_px: 4.0,
        }
    }
}

/// Where one event list is placed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventPlacementContext {
    /// Projection of the owning panel, using the owner's raw value range.
    pub projection: PanelProjection,
    /// Union of all visible panels.
    pub plot_area: PlotRect,
    /// Whether the owning panel is the topmost one.
    pub first_panel: bool,
}

impl EventPlacementContext {
    fn panel(&self) -> PlotRect {
        self.projection.rect
    }

    fn clamped_y(&self, value: f64) -> f64 {
        self.projection.y(self.projection.range.clamp(value))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventGeometry {
    VerticalLine {
        x: f64,
        top: f64,
        bottom: f64,
        label: Option<(f64, f64)>,
    },
    HorizontalLine {
        y: f64,
        left: f64,
        right: f64,
        label: (f64, f64),
    },
    Marker {
        x: f64,
        y: f64,
        kind: MarkerKind,
        glyph: char,
        /// Marker body sits below the point and points up at it.
        points_up: bool,
        hit_box: PlotRect,
    },
    Range {
        rect: PlotRect,
        clip: PlotRect,
        label: (f64, f64),
        baseline: TextBaseline,
    },
    MultiPoint {
        vertices: Vec<(f64, f64, VertexGlyph)>,
        filled: bool,
        smooth: bool,
        clip: PlotRect,
        label_box: PlotRect,
    },
}

/// Event resolved to pixel geometry for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedEvent {
    pub id: EventId,
    pub label: String,
    pub color: Color,
    pub geometry: EventGeometry,
}

impl PlacedEvent {
    #[must_use]
    pub fn priority(&self) -> EventPriority {
        match self.geometry {
            EventGeometry::Range { .. } => EventPriority::Range,
            EventGeometry::MultiPoint { .. } => EventPriority::MultiPoint,
            EventGeometry::VerticalLine { .. } => EventPriority::VerticalLine,
            EventGeometry::HorizontalLine { .. } => EventPriority::HorizontalLine,
            EventGeometry::Marker { .. } => EventPriority::Point,
        }
    }

    /// Pixel position tooltips attach to. For multi-point shapes `vertex`
    /// selects a vertex; otherwise the label box center is used.
    #[must_use]
    pub fn anchor(&self, vertex: Option<usize>) -> (f64, f64) {
        match &self.geometry {
            EventGeometry::VerticalLine { x, top, bottom, .. } => (*x, (top + bottom) / 2.0),
            EventGeometry::HorizontalLine { y, left, right, .. } => ((left + right) / 2.0, *y),
            EventGeometry::Marker { x, y, .. } => (*x, *y),
            EventGeometry::Range { rect, clip, .. } => {
                let left = rect.left.min(rect.right()).max(clip.left);
                let right = rect.left.max(rect.right()).min(clip.right());
                ((left + right) / 2.0, rect.top.max(clip.top))
            }
            EventGeometry::MultiPoint {
                vertices,
                label_box,
                ..
            } => vertex
                .and_then(|index| vertices.get(index))
                .map_or((label_box.center_x(), label_box.center_y()), |(x, y, _)| {
                    (*x, *y)
                }),
        }
    }
}

/// Resolves one marker to pixel geometry. Returns `None` when the marker lies
/// entirely outside the visible time window.
#[must_use]
pub fn place_event(
    marker: &EventMarker,
    id: EventId,
    ctx: &EventPlacementContext,
    style: &EventStyle,
) -> Option<PlacedEvent> {
    let window = ctx.projection.window;
    if let Some((start, end)) = marker.time_span() {
        if end < window.min || start > window.max {
            return None;
        }
    }

    let panel = ctx.panel();
    let offset = style.label_offset_px;
    let geometry = match &marker.shape {
        EventShape::XPoint { time, common } => {
            let x = ctx.projection.x(*time);
            let (top, bottom) = if *common {
                (ctx.plot_area.top, ctx.plot_area.bottom())
            } else {
                (panel.top, panel.bottom())
            };
            let label = (!*common || ctx.first_panel).then_some((x + offset, panel.top + offset));
            EventGeometry::VerticalLine {
                x,
                top,
                bottom,
                label,
            }
        }
        EventShape::YPoint { value } => {
            let y = ctx.clamped_y(*value);
            EventGeometry::HorizontalLine {
                y,
                left: panel.left,
                right: panel.right(),
                label: (panel.left + offset, y - offset),
            }
        }
        EventShape::XyPoint {
            time,
            value,
            kind,
            glyph,
        } => {
            let x = ctx.projection.x(*time);
            let y = ctx.clamped_y(*value);
            let points_up = y < panel.center_y();
            let hit_box = marker_hit_box(x, y, *kind, points_up, &marker.label, style);
            EventGeometry::Marker {
                x,
                y,
                kind: *kind,
                glyph: *glyph,
                points_up,
                hit_box,
            }
        }
        EventShape::XRange {
            start_time,
            end_time,
        } => {
            let left = ctx.projection.x(*start_time);
            let right = ctx.projection.x(*end_time);
            EventGeometry::Range {
                rect: PlotRect::new(
                    left,
                    ctx.plot_area.top,
                    right - left,
                    ctx.plot_area.height,
                ),
                clip: ctx.plot_area,
                label: (left.max(panel.left) + offset, panel.top + offset),
                baseline: TextBaseline::Top,
            }
        }
        EventShape::YRange {
            start_value,
            end_value,
        } => value_range_geometry(
            ctx,
            panel.left,
            panel.right(),
            *start_value,
            *end_value,
            offset,
        ),
        EventShape::XyRange {
            start_time,
            end_time,
            start_value,
            end_value,
        } => value_range_geometry(
            ctx,
            ctx.projection.x(*start_time),
            ctx.projection.x(*end_time),
            *start_value,
            *end_value,
            offset,
        ),
        EventShape::MultiPoint {
            vertices,
            filled,
            smooth,
        } => {
            let projected: Vec<(f64, f64, VertexGlyph)> = vertices
                .iter()
                .map(|vertex| {
                    (
                        ctx.projection.x(vertex.time),
                        ctx.projection.y(vertex.value),
                        vertex.glyph,
                    )
                })
                .collect();
            let count = projected.len() as f64;
            let cx = projected.iter().map(|(x, _, _)| x).sum::<f64>() / count;
            let cy = projected.iter().map(|(_, y, _)| y).sum::<f64>() / count;
            let width = estimate_text_width_px(&marker.label, style.font_size_px);
            let height = line_height_px(style.font_size_px);
            EventGeometry::MultiPoint {
                vertices: projected,
                filled: *filled,
                smooth: *smooth,
                clip: panel,
                label_box: PlotRect::new(cx - width / 2.0, cy - height / 2.0, width, height),
            }
        }
    };

    Some(PlacedEvent {
        id,
        label: marker.label.clone(),
        color: marker.color.unwrap_or(style.default_color),
        geometry,
    })
}

fn value_range_geometry(
    ctx: &EventPlacementContext,
    left: f64,
    right: f64,
    start_value: f64,
    end_value: f64,
    offset: f64,
) -> EventGeometry {
    let panel = ctx.panel();
    let start_y = ctx.clamped_y(start_value);
    let end_y = ctx.clamped_y(end_value);
    let top = start_y.min(end_y);
    let bottom = start_y.max(end_y);
    // Label hugs the start boundary on the side facing the panel interior.
    let near_top = start_y - panel.top <= panel.bottom() - start_y;
    let (label_y, baseline) = if near_top {
        (start_y + offset, TextBaseline::Top)
    } else {
        (start_y - offset, TextBaseline::Bottom)
    };
    EventGeometry::Range {
        rect: PlotRect::new(left, top, right - left, bottom - top),
        clip: panel,
        label: (left.max(panel.left) + offset, label_y),
        baseline,
    }
}

fn marker_hit_box(
    x: f64,
    y: f64,
    kind: MarkerKind,
    points_up: bool,
    label: &str,
    style: &EventStyle,
) -> PlotRect {
    let size = style.marker_size_px;
    match kind {
        MarkerKind::Dot => {
            let label_width = estimate_text_width_px(label, style.font_size_px);
            PlotRect::new(x - size / 2.0, y - size / 2.0, size + label_width, size)
        }
        MarkerKind::Arrow | MarkerKind::Tag => {
            let depth = if kind == MarkerKind::Tag {
                size * 2.4
            } else {
                size
            };
            let top = if points_up { y } else { y - depth };
            PlotRect::new(x - size / 2.0, top, size, depth)
        }
    }
}

fn sorted_by_priority(events: &[PlacedEvent]) -> Vec<&PlacedEvent> {
    let mut ordered: Vec<&PlacedEvent> = events.iter().collect();
    ordered.sort_by_key(|event| event.priority());
    ordered
}

/// Emits every placed event into the events layer in priority order.
pub fn draw_events(
    frame: &mut LayeredRenderFrame,
    events: &[PlacedEvent],
    style: &EventStyle,
    active: Option<&EventId>,
) {
    for event in sorted_by_priority(events) {
        let highlighted = active.is_some_and(|id| id.same_marker(&event.id));
        let width = if highlighted {
            style.line_width_px * 2.0
        } else {
            style.line_width_px
        };
        let stroke = Stroke::solid(width, event.color);
        match &event.geometry {
            EventGeometry::Range {
                rect,
                clip,
                label,
                baseline,
            } => {
                let fill = event.color.with_alpha(style.range_fill_alpha);
                let commands = vec![
                    DrawCommand::Rect(
                        RectPrimitive::filled(rect.left, rect.top, rect.width, rect.height, fill)
                            .with_border(stroke),
                    ),
                    DrawCommand::Text(
                        TextPrimitive::new(
                            event.label.clone(),
                            label.0,
                            label.1,
                            style.font_size_px,
                            style.text_color,
                            TextHAlign::Left,
                        )
                        .with_baseline(*baseline),
                    ),
                ];
                frame.push_clipped(FrameLayer::Events, *clip, without_empty_text(commands));
            }
            EventGeometry::MultiPoint {
                vertices,
                filled,
                smooth,
                clip,
                label_box,
            } => {
                let commands =
                    multi_point_commands(event, vertices, *filled, *smooth, *label_box, stroke, style);
                frame.push_clipped(FrameLayer::Events, *clip, commands);
            }
            EventGeometry::VerticalLine {
                x,
                top,
                bottom,
                label,
            } => {
                frame.push(
                    FrameLayer::Events,
                    DrawCommand::Line(LinePrimitive::new(*x, *top, *x, *bottom, stroke)),
                );
                if let Some((lx, ly)) = label {
                    push_label(frame, &event.label, *lx, *ly, TextBaseline::Top, style);
                }
            }
            EventGeometry::HorizontalLine {
                y,
                left,
                right,
                label,
            } => {
                frame.push(
                    FrameLayer::Events,
                    DrawCommand::Line(LinePrimitive::new(*left, *y, *right, *y, stroke)),
                );
                push_label(frame, &event.label, label.0, label.1, TextBaseline::Bottom, style);
            }
            EventGeometry::Marker {
                x,
                y,
                kind,
                glyph,
                points_up,
                ..
            } => {
                let commands =
                    marker_commands(event, *x, *y, *kind, *glyph, *points_up, highlighted, style);
                frame.extend(FrameLayer::Events, commands);
            }
        }
    }
    trace!(count = events.len(), "event layer drawn");
}

fn without_empty_text(commands: Vec<DrawCommand>) -> Vec<DrawCommand> {
    commands
        .into_iter()
        .filter(|command| !matches!(command, DrawCommand::Text(text) if text.text.is_empty()))
        .collect()
}

fn push_label(
    frame: &mut LayeredRenderFrame,
    text: &str,
    x: f64,
    y: f64,
    baseline: TextBaseline,
    style: &EventStyle,
) {
    if text.is_empty() {
        return;
    }
    frame.push(
        FrameLayer::Events,
        DrawCommand::Text(
            TextPrimitive::new(
                text,
                x,
                y,
                style.font_size_px,
                style.text_color,
                TextHAlign::Left,
            )
            .with_baseline(baseline),
        ),
    );
}

fn multi_point_commands(
    event: &PlacedEvent,
    vertices: &[(f64, f64, VertexGlyph)],
    filled: bool,
    smooth: bool,
    label_box: PlotRect,
    stroke: Stroke,
    style: &EventStyle,
) -> Vec<DrawCommand> {
    let points: Vec<(f64, f64)> = vertices.iter().map(|(x, y, _)| (*x, *y)).collect();
    let path_commands = if smooth {
        catmull_rom_commands(&points, filled)
    } else {
        polyline_commands(&points, filled)
    };
    let mut commands = Vec::new();
    if !path_commands.is_empty() {
        let mut path = PathPrimitive::stroked(path_commands, stroke);
        if filled {
            path = path.with_fill(event.color.with_alpha(style.range_fill_alpha));
        }
        commands.push(DrawCommand::Path(path));
    }

    let size = style.marker_size_px;
    for (index, (x, y, glyph)) in vertices.iter().enumerate() {
        if glyph.has_dot() {
            commands.push(DrawCommand::Circle(CirclePrimitive::filled(
                *x,
                *y,
                size * 0.3,
                event.color,
            )));
        }
        if glyph.has_arrow() {
            // Direction of travel: towards the next vertex, or away from the previous one.
            let (dx, dy) = match (vertices.get(index + 1), index.checked_sub(1).map(|i| vertices[i])) {
                (Some(next), _) => (next.0 - x, next.1 - y),
                (None, Some(previous)) => (x - previous.0, y - previous.1),
                (None, None) => (1.0, 0.0),
            };
            if let Some(chevron) = chevron_commands(*x, *y, dx, dy, size * 0.6) {
                commands.push(DrawCommand::Path(PathPrimitive::stroked(chevron, stroke)));
            }
        }
    }

    if !event.label.is_empty() {
        commands.push(DrawCommand::Text(
            TextPrimitive::new(
                event.label.clone(),
                label_box.center_x(),
                label_box.center_y(),
                style.font_size_px,
                style.text_color,
                TextHAlign::Center,
            )
            .with_baseline(TextBaseline::Middle),
        ));
    }
    commands
}

fn chevron_commands(x: f64, y: f64, dx: f64, dy: f64, size: f64) -> Option<Vec<PathCommand>> {
    let length = dx.hypot(dy);
    if length <= f64::EPSILON {
        return None;
    }
    let (ux, uy) = (dx / length, dy / length);
    let (px, py) = (-uy, ux);
    let back_x = x - ux * size;
    let back_y = y - uy * size;
    Some(vec![
        PathCommand::MoveTo {
            x: back_x + px * size * 0.5,
            y: back_y + py * size * 0.5,
        },
        PathCommand::LineTo { x, y },
        PathCommand::LineTo {
            x: back_x - px * size * 0.5,
            y: back_y - py * size * 0.5,
        },
    ])
}

#[allow(clippy::too_many_arguments)]
fn marker_commands(
    event: &PlacedEvent,
    x: f64,
    y: f64,
    kind: MarkerKind,
    glyph: char,
    points_up: bool,
    highlighted: bool,
    style: &EventStyle,
) -> Vec<DrawCommand> {
    let size = style.marker_size_px;
    let direction = if points_up { 1.0 } else { -1.0 };
    let border = Stroke::solid(
        if highlighted { 2.0 } else { 1.0 },
        Color::rgb(1.0, 1.0, 1.0),
    );
    let triangle = |base_y: f64| {
        vec![
            PathCommand::MoveTo { x, y },
            PathCommand::LineTo {
                x: x + size / 2.0,
                y: base_y,
            },
            PathCommand::LineTo {
                x: x - size / 2.0,
                y: base_y,
            },
            PathCommand::Close,
        ]
    };

    let mut commands = Vec::new();
    match kind {
        MarkerKind::Dot => {
            commands.push(DrawCommand::Circle(
                CirclePrimitive::filled(x, y, size / 2.0, event.color).with_border(border),
            ));
            if !event.label.is_empty() {
                commands.push(DrawCommand::Text(TextPrimitive::new(
                    event.label.clone(),
                    x + size / 2.0 + style.label_offset_px,
                    y,
                    style.font_size_px,
                    style.text_color,
                    TextHAlign::Left,
                )));
            }
        }
        MarkerKind::Arrow => {
            let base_y = y + direction * size;
            commands.push(DrawCommand::Path(PathPrimitive {
                commands: triangle(base_y),
                stroke: Some(border),
                fill_color: Some(event.color),
            }));
        }
        MarkerKind::Tag => {
            let base_y = y + direction * size;
            commands.push(DrawCommand::Path(PathPrimitive {
                commands: triangle(base_y),
                stroke: None,
                fill_color: Some(event.color),
            }));
            let flag_height = size * 1.4;
            let flag_top = if points_up { base_y } else { base_y - flag_height };
            commands.push(DrawCommand::Rect(
                RectPrimitive::filled(x - size / 2.0, flag_top, size, flag_height, event.color)
                    .with_border(border)
                    .with_corner_radius(2.0),
            ));
            commands.push(DrawCommand::Text(TextPrimitive::new(
                glyph.to_string(),
                x,
                flag_top + flag_height / 2.0,
                style.font_size_px * 0.9,
                Color::rgb(1.0, 1.0, 1.0),
                TextHAlign::Center,
            )));
        }
    }
    commands
}

/// Finds the topmost event under the pointer.
///
/// Points win over horizontal lines, which win over vertical lines, then
/// multi-point shapes, then ranges. Within one class the last drawn wins.
#[must_use]
pub fn hit_test_events(events: &[PlacedEvent], x: f64, y: f64, radius_px: f64) -> Option<EventId> {
    sorted_by_priority(events)
        .into_iter()
        .rev()
        .find_map(|event| hit_test_event(event, x, y, radius_px))
}

fn hit_test_event(event: &PlacedEvent, x: f64, y: f64, radius: f64) -> Option<EventId> {
    match &event.geometry {
        EventGeometry::VerticalLine {
            x: line_x,
            top,
            bottom,
            ..
        } => ((x - line_x).abs() <= radius && y >= *top && y <= *bottom)
            .then(|| event.id.clone()),
        EventGeometry::HorizontalLine {
            y: line_y,
            left,
            right,
            ..
        } => ((y - line_y).abs() <= radius && x >= *left && x <= *right)
            .then(|| event.id.clone()),
        EventGeometry::Marker {
            x: mx,
            y: my,
            hit_box,
            ..
        } => (hit_box.contains(x, y) || (x - mx).hypot(y - my) <= radius)
            .then(|| event.id.clone()),
        EventGeometry::Range { rect, clip, .. } => {
            let normalized = PlotRect::new(
                rect.left.min(rect.right()),
                rect.top,
                rect.width.abs(),
                rect.height,
            );
            (normalized.contains(x, y) && clip.contains(x, y)).then(|| event.id.clone())
        }
        EventGeometry::MultiPoint {
            vertices,
            filled,
            label_box,
            clip,
            ..
        } => {
            if !clip.contains(x, y) {
                return None;
            }
            if *filled {
                return label_box.contains(x, y).then(|| event.id.clone());
            }
            vertices
                .iter()
                .enumerate()
                .filter(|(_, (vx, vy, _))| (x - vx).hypot(y - vy) <= radius)
                .min_by(|(_, a), (_, b)| {
                    let da = (x - a.0).hypot(y - a.1);
                    let db = (x - b.0).hypot(y - b.1);
                    da.total_cmp(&db)
                })
                .map(|(index, _)| event.id.clone().with_vertex(index))
        }
    }
}
