//! Core types for playback sequencing

use cadence_core::Track;
use serde::{Deserialize, Serialize};

/// Transport state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No track has been started
    Idle,

    /// Currently playing
    Playing,

    /// Paused mid-track (or playback was rejected by the device)
    Paused,

    /// The active list ran out under repeat-off; the last track stays current
    Ended,
}

/// Repeat policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when the active list ends
    #[default]
    #[serde(rename = "none")]
    Off,

    /// Loop the current track
    One,

    /// Loop the whole active list
    All,
}

impl RepeatMode {
    /// Next mode in the fixed cycle Off → One → All → Off
    pub fn cycled(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::One,
            RepeatMode::One => RepeatMode::All,
            RepeatMode::All => RepeatMode::Off,
        }
    }
}

/// Direction for [`crate::Sequencer::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Forward; honors repeat policy
    Next,

    /// Backward; always wraps
    Previous,
}

/// Initial transport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial volume (0.0-1.0, default: 1.0)
    pub volume: f32,

    /// Start muted (default: false)
    pub muted: bool,

    /// Start with shuffle on (default: false)
    pub shuffled: bool,

    /// Initial repeat policy (default: Off)
    pub repeat: RepeatMode,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: 1.0,
            muted: false,
            shuffled: false,
            repeat: RepeatMode::Off,
        }
    }
}

/// Point-in-time copy of the transport for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct TransportSnapshot {
    pub state: PlaybackState,
    pub current_track: Option<Track>,
    pub current_index: Option<usize>,
    pub position: f64,
    pub volume: f32,
    pub muted: bool,
    pub shuffled: bool,
    pub repeat: RepeatMode,
}

impl TransportSnapshot {
    /// Whether audio is (supposed to be) coming out
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }
}
