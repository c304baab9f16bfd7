//! Error types for playback management

use thiserror::Error;

/// Playback errors
///
/// None of these are fatal: the sequencer logs them and leaves transport
/// state where it was.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No playback device could be opened
    #[error("Playback device unavailable: {0}")]
    DeviceUnavailable(String),

    /// The device could not load a source
    #[error("Failed to load {source_uri}: {reason}")]
    Load { source_uri: String, reason: String },

    /// The device refused to start playback
    #[error("Playback rejected: {0}")]
    PlayRejected(String),

    /// Any other device failure
    #[error("Device error: {0}")]
    Device(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

impl From<PlaybackError> for cadence_core::CadenceError {
    fn from(err: PlaybackError) -> Self {
        cadence_core::CadenceError::playback(err.to_string())
    }
}
