//! Playback Events
//!
//! The sequencer queues an event at every observable transition. Hosts
//! drain the queue after each call (or each device pump) and push the
//! changes to whatever renders the transport.

use crate::types::{PlaybackState, RepeatMode};
use serde::{Deserialize, Serialize};

/// Events emitted by the sequencer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Transport state changed
    StateChanged {
        /// The new state
        state: PlaybackState,
    },

    /// A track was loaded into the device
    ///
    /// Emitted on every load, including a repeat-one restart of the same
    /// track.
    TrackChanged {
        /// ID of the new (current) track
        track_id: String,
        /// ID of the previous track (if any)
        previous_track_id: Option<String>,
    },

    /// Position reported by the device
    PositionUpdate {
        /// Current playback position
        position_secs: f64,
        /// Total track duration
        duration_secs: u32,
    },

    /// Volume or mute changed
    VolumeChanged {
        /// Volume level (0.0-1.0)
        volume: f32,
        /// Whether audio is muted
        muted: bool,
    },

    /// Shuffle flag flipped
    ShuffleChanged { shuffled: bool },

    /// Repeat policy changed
    RepeatChanged { mode: RepeatMode },

    /// Advancing past the last track with repeat off; playback stopped
    ListExhausted,

    /// A device call failed; transport was left as it was
    Error {
        /// Error message
        message: String,
    },
}
