use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid event `{label}`: {reason}")]
    InvalidEvent { label: String, reason: String },

    #[error("no drawable surface is available")]
    SurfaceUnavailable,

    #[error("chart has been destroyed")]
    Destroyed,
}

impl ChartError {
    pub(crate) fn invalid_event(label: &str, reason: impl Into<String>) -> Self {
        Self::InvalidEvent {
            label: label.to_owned(),
            reason: reason.into(),
        }
    }
}
