//! Storage key constants
//!
//! Every value the player persists lives under one of these keys.

/// Track library (`Vec<Track>`)
pub const MUSIC_LIBRARY: &str = "musicLibrary";

/// User playlists (`Vec<Playlist>`)
pub const PLAYLISTS: &str = "playlists";

/// Output volume (`f32`, 0.0-1.0)
pub const VOLUME: &str = "volume";

/// Mute flag (`bool`)
pub const MUTED: &str = "muted";
