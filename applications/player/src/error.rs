/// Player error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlayerError>;

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(#[from] cadence_storage::StorageError),

    #[error("Playback error: {0}")]
    Playback(#[from] cadence_playback::PlaybackError),

    #[error(transparent)]
    Core(#[from] cadence_core::CadenceError),
}

impl PlayerError {
    pub fn track_not_found(id: impl std::fmt::Display) -> Self {
        cadence_core::CadenceError::not_found("Track", id.to_string()).into()
    }

    pub fn playlist_not_found(id: impl std::fmt::Display) -> Self {
        cadence_core::CadenceError::not_found("Playlist", id.to_string()).into()
    }
}

impl From<config::ConfigError> for PlayerError {
    fn from(err: config::ConfigError) -> Self {
        PlayerError::Config(err.to_string())
    }
}
