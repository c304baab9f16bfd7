/// Playlist domain type
use crate::types::{PlaylistId, Track, TrackId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named, user-curated ordered collection of tracks
///
/// A playlist never holds two tracks with the same id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    /// Unique playlist identifier
    pub id: PlaylistId,

    /// Display name
    pub name: String,

    /// Ordered tracks
    #[serde(rename = "songs")]
    tracks: Vec<Track>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Playlist {
    /// Create a new empty playlist
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(PlaylistId::generate(), name, Utc::now())
    }

    /// Create a playlist with a specific ID (for loading and fixtures)
    pub fn with_id(id: PlaylistId, name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            tracks: Vec::new(),
            created_at,
        }
    }

    /// Tracks in playlist order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the playlist has no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Whether a track with `id` is present
    pub fn contains(&self, id: &TrackId) -> bool {
        self.tracks.iter().any(|t| t.is(id))
    }

    /// Append a track
    ///
    /// Returns `false` without changing anything when a track with the same
    /// id is already present.
    pub fn push(&mut self, track: Track) -> bool {
        if self.contains(&track.id) {
            return false;
        }
        self.tracks.push(track);
        true
    }

    /// Remove the track with `id`, returning whether anything was removed
    pub fn remove(&mut self, id: &TrackId) -> bool {
        let before = self.tracks.len();
        self.tracks.retain(|t| !t.is(id));
        self.tracks.len() != before
    }

    /// Remove every track
    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Change the display name
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}
