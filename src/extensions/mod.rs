//! Event annotations layered over the chart panels.
//!
//! Events are classified once at ingestion (`events`), resolved to pixel
//! geometry per frame (`event_layer`) and described by tooltips
//! (`event_tooltip`). Nothing here holds chart state.

pub mod event_layer;
pub mod event_tooltip;
pub mod events;

pub use event_layer::{
    EventGeometry, EventId, EventPlacementContext, EventPriority, EventSource, EventStyle,
    PlacedEvent, draw_events, hit_test_events, place_event,
};
pub use event_tooltip::{TooltipFormat, compose_event_tooltip};
pub use events::{
    CommonEvents, DEFAULT_TAG_GLYPH, EventMarker, EventShape, MarkerKind, MultiPointVertex,
    RawEventMarker, VertexGlyph,
};
