use super::{EventMarker, EventShape};

/// Formatting hooks used when composing event tooltips.
pub struct TooltipFormat<'a> {
    pub time: &'a dyn Fn(i64) -> String,
    pub value: &'a dyn Fn(f64) -> String,
    /// Suppresses every value line.
    pub hide_values: bool,
}

/// Tooltip lines for a marker, or for one vertex of a multi-point marker.
///
/// The first line is always the label (when non-empty); the remaining lines
/// come from the marker's own coordinates, never from clamped placement.
#[must_use]
pub fn compose_event_tooltip(
    marker: &EventMarker,
    vertex: Option<usize>,
    format: &TooltipFormat<'_>,
) -> Vec<String> {
    let mut lines = Vec::new();
    if !marker.label.is_empty() {
        lines.push(marker.label.clone());
    }
    let time = |t: i64| (format.time)(t);
    let value = |v: f64| (format.value)(v);
    let show_values = !format.hide_values;

    match &marker.shape {
        EventShape::XPoint { time: t, .. } => lines.push(time(*t)),
        EventShape::YPoint { value: v } => {
            if show_values {
                lines.push(value(*v));
            }
        }
        EventShape::XyPoint {
            time: t, value: v, ..
        } => {
            lines.push(time(*t));
            if show_values {
                lines.push(value(*v));
            }
        }
        EventShape::XRange {
            start_time,
            end_time,
        } => lines.push(format!("{} - {}", time(*start_time), time(*end_time))),
        EventShape::YRange {
            start_value,
            end_value,
        } => {
            if show_values {
                lines.push(format!("{} - {}", value(*start_value), value(*end_value)));
            }
        }
        EventShape::XyRange {
            start_time,
            end_time,
            start_value,
            end_value,
        } => {
            lines.push(format!("{} - {}", time(*start_time), time(*end_time)));
            if show_values {
                lines.push(format!("{} - {}", value(*start_value), value(*end_value)));
            }
        }
        EventShape::MultiPoint { vertices, .. } => match vertex.and_then(|i| vertices.get(i)) {
            Some(point) => {
                lines.push(time(point.time));
                if show_values {
                    lines.push(value(point.value));
                }
            }
            None => {
                if let (Some(first), Some(last)) = (vertices.first(), vertices.last()) {
                    lines.push(format!("{} - {}", time(first.time), time(last.time)));
                }
                lines.push(format!("{} points", vertices.len()));
            }
        },
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::{TooltipFormat, compose_event_tooltip};
    use crate::extensions::{EventMarker, EventShape, MultiPointVertex, VertexGlyph};

    fn fmt(hide_values: bool) -> (impl Fn(i64) -> String, impl Fn(f64) -> String, bool) {
        (|t: i64| format!("t{t}"), |v: f64| format!("{v:.1}"), hide_values)
    }

    #[test]
    fn tooltips_use_true_values_and_callbacks() {
        let (time, value, hide) = fmt(false);
        let format = TooltipFormat {
            time: &time,
            value: &value,
            hide_values: hide,
        };
        let marker = EventMarker::new(
            "buy",
            EventShape::XyPoint {
                time: 7,
                value: 1_234.5,
                kind: Default::default(),
                glyph: 'B',
            },
        );
        assert_eq!(compose_event_tooltip(&marker, None, &format), ["buy", "t7", "1234.5"]);
    }

    #[test]
    fn hide_values_drops_value_lines() {
        let (time, value, hide) = fmt(true);
        let format = TooltipFormat {
            time: &time,
            value: &value,
            hide_values: hide,
        };
        let marker = EventMarker::new(
            "box",
            EventShape::XyRange {
                start_time: 1,
                end_time: 2,
                start_value: 3.0,
                end_value: 4.0,
            },
        );
        assert_eq!(compose_event_tooltip(&marker, None, &format), ["box", "t1 - t2"]);
    }

    #[test]
    fn multi_point_vertex_tooltip_describes_that_vertex() {
        let (time, value, hide) = fmt(false);
        let format = TooltipFormat {
            time: &time,
            value: &value,
            hide_values: hide,
        };
        let marker = EventMarker::new(
            "path",
            EventShape::MultiPoint {
                vertices: vec![
                    MultiPointVertex { time: 1, value: 1.0, glyph: VertexGlyph::None },
                    MultiPointVertex { time: 5, value: 2.0, glyph: VertexGlyph::None },
                ],
                filled: false,
                smooth: false,
            },
        );
        assert_eq!(compose_event_tooltip(&marker, Some(1), &format), ["path", "t5", "2.0"]);
        assert_eq!(
            compose_event_tooltip(&marker, None, &format),
            ["path", "t1 - t5", "2 points"]
        );
    }
}
