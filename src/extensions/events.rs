use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// Marker drawn for an XY point event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Dot,
    Arrow,
    #[default]
    Tag,
}

/// Optional glyph drawn at a multi-point vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VertexGlyph {
    #[default]
    None,
    Dot,
    /// Chevron pointing along the path towards the next vertex.
    Arrow,
    DotArrow,
}

impl VertexGlyph {
    #[must_use]
    pub fn has_dot(self) -> bool {
        matches!(self, Self::Dot | Self::DotArrow)
    }

    #[must_use]
    pub fn has_arrow(self) -> bool {
        matches!(self, Self::Arrow | Self::DotArrow)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiPointVertex {
    pub time: i64,
    pub value: f64,
    #[serde(default)]
    pub glyph: VertexGlyph,
}

/// Wire shape of an event marker. Every coordinate field is optional; the
/// shape is decided once by `EventMarker::try_from`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEventMarker {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<MultiPointVertex>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker_kind: Option<MarkerKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glyph: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smooth: Option<bool>,
}

/// Classified event geometry. Exactly one shape per marker.
#[derive(Debug, Clone, PartialEq)]
pub enum EventShape {
    XPoint {
        time: i64,
        /// Spans every visible panel; the label is drawn on the first one.
        common: bool,
    },
    YPoint {
        value: f64,
    },
    XyPoint {
        time: i64,
        value: f64,
        kind: MarkerKind,
        glyph: char,
    },
    XRange {
        start_time: i64,
        end_time: i64,
    },
    YRange {
        start_value: f64,
        end_value: f64,
    },
    XyRange {
        start_time: i64,
        end_time: i64,
        start_value: f64,
        end_value: f64,
    },
    MultiPoint {
        vertices: Vec<MultiPointVertex>,
        filled: bool,
        smooth: bool,
    },
}

impl EventShape {
    #[must_use]
    pub fn is_range(&self) -> bool {
        matches!(
            self,
            Self::XRange { .. } | Self::YRange { .. } | Self::XyRange { .. }
        )
    }
}

pub const DEFAULT_TAG_GLYPH: char = 'E';

/// Validated annotation attached to a ticker series or to the whole chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEventMarker", into = "RawEventMarker")]
pub struct EventMarker {
    pub label: String,
    pub color: Option<Color>,
    pub shape: EventShape,
}

impl EventMarker {
    #[must_use]
    pub fn new(label: impl Into<String>, shape: EventShape) -> Self {
        Self {
            label: label.into(),
            color: None,
            shape,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn is_common_x(&self) -> bool {
        matches!(self.shape, EventShape::XPoint { common: true, .. })
    }

    /// Time span covered by the marker, used for window culling.
    #[must_use]
    pub fn time_span(&self) -> Option<(i64, i64)> {
        match &self.shape {
            EventShape::XPoint { time, .. } | EventShape::XyPoint { time, .. } => {
                Some((*time, *time))
            }
            EventShape::XRange {
                start_time,
                end_time,
            }
            | EventShape::XyRange {
                start_time,
                end_time,
                ..
            } => Some((*start_time, *end_time)),
            EventShape::MultiPoint { vertices, .. } => {
                let min = vertices.iter().map(|v| v.time).min()?;
                let max = vertices.iter().map(|v| v.time).max()?;
                Some((min, max))
            }
            EventShape::YPoint { .. } | EventShape::YRange { .. } => None,
        }
    }

    /// Values the marker contributes to its panel, used for tooltips and
    /// placement clamping. Not used for autoscaling.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        match &self.shape {
            EventShape::YPoint { value } | EventShape::XyPoint { value, .. } => vec![*value],
            EventShape::YRange {
                start_value,
                end_value,
            }
            | EventShape::XyRange {
                start_value,
                end_value,
                ..
            } => vec![*start_value, *end_value],
            EventShape::MultiPoint { vertices, .. } => vertices.iter().map(|v| v.value).collect(),
            EventShape::XPoint { .. } | EventShape::XRange { .. } => Vec::new(),
        }
    }

    /// Marks an XPoint as spanning every panel. Other shapes are rejected.
    pub fn into_common(mut self) -> ChartResult<Self> {
        match &mut self.shape {
            EventShape::XPoint { common, .. } => {
                *common = true;
                Ok(self)
            }
            _ => Err(ChartError::invalid_event(
                &self.label,
                "only x-point events can be common",
            )),
        }
    }
}

fn finite(label: &str, field: &str, value: Option<f64>) -> ChartResult<Option<f64>> {
    match value {
        Some(v) if !v.is_finite() => Err(ChartError::invalid_event(
            label,
            format!("`{field}` must be finite"),
        )),
        other => Ok(other),
    }
}

fn ordered<T: PartialOrd + Copy>(label: &str, what: &str, start: T, end: T) -> ChartResult<()> {
    if start > end {
        return Err(ChartError::invalid_event(
            label,
            format!("{what} range start is after its end"),
        ));
    }
    Ok(())
}

impl TryFrom<RawEventMarker> for EventMarker {
    type Error = ChartError;

    fn try_from(raw: RawEventMarker) -> ChartResult<Self> {
        let label = raw.label.as_str();
        let color = raw
            .color
            .as_deref()
            .map(Color::from_hex)
            .transpose()
            .map_err(|_| ChartError::invalid_event(label, "color is not a valid hex color"))?;

        let value = finite(label, "value", raw.value)?;
        let start_value = finite(label, "startValue", raw.start_value)?;
        let end_value = finite(label, "endValue", raw.end_value)?;

        let has_point = raw.time.is_some() || value.is_some();
        let time_pair = match (raw.start_time, raw.end_time) {
            (Some(start), Some(end)) => Some((start, end)),
            (None, None) => None,
            _ => {
                return Err(ChartError::invalid_event(
                    label,
                    "startTime and endTime must be given together",
                ));
            }
        };
        let value_pair = match (start_value, end_value) {
            (Some(start), Some(end)) => Some((start, end)),
            (None, None) => None,
            _ => {
                return Err(ChartError::invalid_event(
                    label,
                    "startValue and endValue must be given together",
                ));
            }
        };
        let has_range = time_pair.is_some() || value_pair.is_some();

        if has_point && has_range {
            return Err(ChartError::invalid_event(
                label,
                "point and range fields cannot be mixed",
            ));
        }
        if raw.points.is_some() && (has_point || has_range) {
            return Err(ChartError::invalid_event(
                label,
                "points cannot be combined with other coordinates",
            ));
        }

        let shape = if let Some(points) = raw.points {
            if points.len() < 2 {
                return Err(ChartError::invalid_event(
                    label,
                    "multi-point events need at least two vertices",
                ));
            }
            if points.iter().any(|vertex| !vertex.value.is_finite()) {
                return Err(ChartError::invalid_event(
                    label,
                    "multi-point values must be finite",
                ));
            }
            EventShape::MultiPoint {
                vertices: points,
                filled: raw.filled.unwrap_or(false),
                smooth: raw.smooth.unwrap_or(false),
            }
        } else {
            match (raw.time, value, time_pair, value_pair) {
                (None, None, Some((start_time, end_time)), Some((start_value, end_value))) => {
                    ordered(label, "time", start_time, end_time)?;
                    ordered(label, "value", start_value, end_value)?;
                    EventShape::XyRange {
                        start_time,
                        end_time,
                        start_value,
                        end_value,
                    }
                }
                (None, None, Some((start_time, end_time)), None) => {
                    ordered(label, "time", start_time, end_time)?;
                    EventShape::XRange {
                        start_time,
                        end_time,
                    }
                }
                (None, None, None, Some((start_value, end_value))) => {
                    ordered(label, "value", start_value, end_value)?;
                    EventShape::YRange {
                        start_value,
                        end_value,
                    }
                }
                (Some(time), Some(value), None, None) => {
                    let glyph = match raw.glyph.as_deref() {
                        None => DEFAULT_TAG_GLYPH,
                        Some(text) => {
                            let mut chars = text.chars();
                            match (chars.next(), chars.next()) {
                                (Some(ch), None) => ch,
                                _ => {
                                    return Err(ChartError::invalid_event(
                                        label,
                                        "glyph must be exactly one character",
                                    ));
                                }
                            }
                        }
                    };
                    EventShape::XyPoint {
                        time,
                        value,
                        kind: raw.marker_kind.unwrap_or_default(),
                        glyph,
                    }
                }
                (Some(time), None, None, None) => EventShape::XPoint {
                    time,
                    common: raw.common.unwrap_or(false),
                },
                (None, Some(value), None, None) => EventShape::YPoint { value },
                _ => {
                    return Err(ChartError::invalid_event(label, "event has no coordinates"));
                }
            }
        };

        let is_xy_point = matches!(shape, EventShape::XyPoint { .. });
        if !is_xy_point && (raw.marker_kind.is_some() || raw.glyph.is_some()) {
            return Err(ChartError::invalid_event(
                label,
                "markerKind and glyph only apply to xy-point events",
            ));
        }
        if !matches!(shape, EventShape::XPoint { .. }) && raw.common.is_some() {
            return Err(ChartError::invalid_event(
                label,
                "common only applies to x-point events",
            ));
        }
        if !matches!(shape, EventShape::MultiPoint { .. })
            && (raw.filled.is_some() || raw.smooth.is_some())
        {
            return Err(ChartError::invalid_event(
                label,
                "filled and smooth only apply to multi-point events",
            ));
        }

        Ok(Self {
            label: raw.label,
            color,
            shape,
        })
    }
}

impl From<EventMarker> for RawEventMarker {
    fn from(marker: EventMarker) -> Self {
        let mut raw = RawEventMarker {
            label: marker.label,
            color: marker.color.map(Color::to_hex),
            ..RawEventMarker::default()
        };
        match marker.shape {
            EventShape::XPoint { time, common } => {
                raw.time = Some(time);
                raw.common = common.then_some(true);
            }
            EventShape::YPoint { value } => raw.value = Some(value),
            EventShape::XyPoint {
                time,
                value,
                kind,
                glyph,
            } => {
                raw.time = Some(time);
                raw.value = Some(value);
                raw.marker_kind = Some(kind);
                raw.glyph = Some(glyph.to_string());
            }
            EventShape::XRange {
                start_time,
                end_time,
            } => {
                raw.start_time = Some(start_time);
                raw.end_time = Some(end_time);
            }
            EventShape::YRange {
                start_value,
                end_value,
            } => {
                raw.start_value = Some(start_value);
                raw.end_value = Some(end_value);
            }
            EventShape::XyRange {
                start_time,
                end_time,
                start_value,
                end_value,
            } => {
                raw.start_time = Some(start_time);
                raw.end_time = Some(end_time);
                raw.start_value = Some(start_value);
                raw.end_value = Some(end_value);
            }
            EventShape::MultiPoint {
                vertices,
                filled,
                smooth,
            } => {
                raw.points = Some(vertices);
                raw.filled = Some(filled);
                raw.smooth = Some(smooth);
            }
        }
        raw
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCommonEvents {
    #[serde(default)]
    x_axis_events: Vec<EventMarker>,
    #[serde(default)]
    per_chart_events: IndexMap<String, Vec<EventMarker>>,
}

/// Events applied across all tickers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawCommonEvents")]
pub struct CommonEvents {
    /// Vertical markers drawn across every visible panel.
    pub x_axis_events: Vec<EventMarker>,
    /// Extra markers per chart key, placed on the shared raw value range.
    pub per_chart_events: IndexMap<String, Vec<EventMarker>>,
}

impl CommonEvents {
    pub fn new(
        x_axis_events: Vec<EventMarker>,
        per_chart_events: IndexMap<String, Vec<EventMarker>>,
    ) -> ChartResult<Self> {
        let x_axis_events = x_axis_events
            .into_iter()
            .map(EventMarker::into_common)
            .collect::<ChartResult<Vec<_>>>()?;
        Ok(Self {
            x_axis_events,
            per_chart_events,
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x_axis_events.is_empty() && self.per_chart_events.values().all(Vec::is_empty)
    }
}

impl TryFrom<RawCommonEvents> for CommonEvents {
    type Error = ChartError;

    fn try_from(raw: RawCommonEvents) -> ChartResult<Self> {
        Self::new(raw.x_axis_events, raw.per_chart_events)
    }
}

#[cfg(test)]
mod tests {
    use super::{CommonEvents, EventMarker, EventShape, MarkerKind, RawEventMarker};
    use crate::error::ChartError;

    fn parse(json: &str) -> Result<EventMarker, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn shapes_are_assigned_structurally() {
        let x = parse(r#"{"label":"split","time":10}"#).expect("x point");
        assert_eq!(x.shape, EventShape::XPoint { time: 10, common: false });

        let xy = parse(r##"{"label":"buy","time":10,"value":2.5,"color":"#00ff00"}"##).expect("xy");
        assert!(matches!(
            xy.shape,
            EventShape::XyPoint { kind: MarkerKind::Tag, glyph: 'E', .. }
        ));
        assert!(xy.color.is_some());

        let xr = parse(r#"{"label":"q1","startTime":1,"endTime":5}"#).expect("x range");
        assert!(matches!(xr.shape, EventShape::XRange { .. }));

        let xyr = parse(
            r#"{"label":"box","startTime":1,"endTime":5,"startValue":1.0,"endValue":2.0}"#,
        )
        .expect("xy range");
        assert!(matches!(xyr.shape, EventShape::XyRange { .. }));

        let multi = parse(
            r#"{"label":"tri","points":[{"time":1,"value":1.0},{"time":2,"value":3.0,"glyph":"arrow"}],"filled":true}"#,
        )
        .expect("multi");
        assert!(matches!(multi.shape, EventShape::MultiPoint { filled: true, .. }));
    }

    #[test]
    fn ambiguous_or_partial_shapes_are_rejected() {
        let cases = [
            r#"{"label":"a","time":1,"startTime":1,"endTime":2}"#,
            r#"{"label":"b","startTime":1}"#,
            r#"{"label":"c","startTime":5,"endTime":1}"#,
            r#"{"label":"d","time":1,"common":true,"value":2.0}"#,
            r#"{"label":"e","startTime":1,"endTime":2,"common":true}"#,
            r#"{"label":"f"}"#,
            r#"{"label":"g","time":1,"markerKind":"dot"}"#,
            r#"{"label":"h","points":[{"time":1,"value":1.0}]}"#,
            r#"{"label":"i","points":[{"time":1,"value":1.0},{"time":2,"value":1.0}],"time":3}"#,
            r#"{"label":"j","time":1,"value":2.0,"glyph":"ab"}"#,
            r#"{"label":"k","value":1.0,"smooth":true}"#,
        ];
        for case in cases {
            assert!(parse(case).is_err(), "accepted {case}");
        }
    }

    #[test]
    fn rejection_names_the_event() {
        let raw = RawEventMarker {
            label: "earnings".to_owned(),
            start_time: Some(3),
            ..RawEventMarker::default()
        };
        let err = EventMarker::try_from(raw).expect_err("half pair");
        assert!(matches!(err, ChartError::InvalidEvent { ref label, .. } if label == "earnings"));
    }

    #[test]
    fn common_events_require_x_points() {
        let events: CommonEvents = serde_json::from_str(
            r#"{"xAxisEvents":[{"label":"fomc","time":100}],"perChartEvents":{"price":[{"label":"cap","value":10.0}]}}"#,
        )
        .expect("common events");
        assert!(events.x_axis_events[0].is_common_x());
        assert_eq!(events.per_chart_events["price"].len(), 1);

        let bad = serde_json::from_str::<CommonEvents>(
            r#"{"xAxisEvents":[{"label":"cap","value":10.0}]}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn markers_serialize_back_to_their_wire_shape() {
        let marker = parse(r#"{"label":"buy","time":10,"value":2.5,"markerKind":"arrow"}"#)
            .expect("marker");
        let json = serde_json::to_string(&marker).expect("serialize");
        assert_eq!(parse(&json).expect("reparse"), marker);
    }
}
