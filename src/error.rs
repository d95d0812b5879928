//! Error taxonomy for the capture pipeline.

/// Failures surfaced by [`CaptureSession`](crate::CaptureSession) and the geometry engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScanError {
    /// Bad call-site input; a caller bug.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Focus box violates the viewport geometry.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Operation not valid in the current session state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("media acquisition failed: {0}")]
    MediaAcquisition(String),

    #[error("Web camera streaming not supported by the platform.")]
    UnsupportedPlatform,

    /// Image asset could not be read or decoded into pixels.
    #[error("failed to load image: {0}")]
    ResourceLoad(String),

    /// No QR symbol found, or found but unparsable.
    #[error("{0}")]
    Decode(String),

    #[error("device enumeration failed: {0}")]
    Enumeration(String),
}

pub type Result<T, E = ScanError> = std::result::Result<T, E>;

/// Error reported by the platform media collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{name} : {message}")]
pub struct MediaError {
    pub name: String,
    pub message: String,
}

impl MediaError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Error reported by the decode collaborator when a buffer holds no readable symbol.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct DecodeFailure(pub String);

impl DecodeFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
