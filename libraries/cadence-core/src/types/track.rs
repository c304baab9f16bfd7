/// Track domain type
use crate::types::TrackId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A single playable audio item
///
/// Tracks are immutable once created. Equality and membership checks across
/// the library, playlists and the sequencer go through [`Track::id`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Album name
    pub album: String,

    /// Duration in whole seconds
    pub duration: u32,

    /// Playable source locator (URI handed to the playback device)
    #[serde(rename = "url")]
    pub source: String,

    /// Cover image locator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
}

impl Track {
    /// Create a track with no cover image
    pub fn new(
        id: TrackId,
        title: impl Into<String>,
        artist: impl Into<String>,
        album: impl Into<String>,
        duration: u32,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            artist: artist.into(),
            album: album.into(),
            duration,
            source: source.into(),
            cover: None,
        }
    }

    /// Attach a cover image locator
    pub fn with_cover(mut self, cover: impl Into<String>) -> Self {
        self.cover = Some(cover.into());
        self
    }

    /// Track duration as a `Duration`
    pub fn duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.duration))
    }

    /// Whether this track has the given id
    pub fn is(&self, id: &TrackId) -> bool {
        &self.id == id
    }

    /// Case-insensitive substring match on title, artist or album
    ///
    /// `term` must already be lowercased.
    pub fn matches_lowercase(&self, term: &str) -> bool {
        self.title.to_lowercase().contains(term)
            || self.artist.to_lowercase().contains(term)
            || self.album.to_lowercase().contains(term)
    }
}

/// Position of the track with `id` inside `tracks`
pub fn position_of(tracks: &[Track], id: &TrackId) -> Option<usize> {
    tracks.iter().position(|t| t.is(id))
}
