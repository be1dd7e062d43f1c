use serde::{Deserialize, Serialize};

/// Pipeline steps of one frame in paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FrameLayer {
    Background,
    Grid,
    ValueAxis,
    Candles,
    Lines,
    Averages,
    Legend,
    Dividers,
    TimeAxis,
    Points,
    Events,
    PointTooltip,
    EventTooltip,
    ZoomControls,
    Selection,
    Crosshair,
}

impl FrameLayer {
    /// Canonical bottom-to-top order.
    pub const ORDER: [Self; 16] = [
        Self::Background,
        Self::Grid,
        Self::ValueAxis,
        Self::Candles,
        Self::Lines,
        Self::Averages,
        Self::Legend,
        Self::Dividers,
        Self::TimeAxis,
        Self::Points,
        Self::Events,
        Self::PointTooltip,
        Self::EventTooltip,
        Self::ZoomControls,
        Self::Selection,
        Self::Crosshair,
    ];

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::FrameLayer;

    #[test]
    fn order_matches_discriminants() {
        for (index, layer) in FrameLayer::ORDER.iter().enumerate() {
            assert_eq!(layer.index(), index);
        }
        assert!(FrameLayer::Events > FrameLayer::Points);
        assert!(FrameLayer::Crosshair > FrameLayer::Selection);
    }
}
