//! Persisted track library
//!
//! The library is stored under [`keys::MUSIC_LIBRARY`](crate::keys::MUSIC_LIBRARY)
//! and starts from the built-in sample tracks when nothing is stored.

use crate::keys;
use crate::store::{Persisted, PersistentStore};
use cadence_core::{filter_tracks, sample_library, Track, TrackId};

/// The user's track library
#[derive(Debug)]
pub struct Library {
    tracks: Persisted<Vec<Track>>,
}

impl Library {
    /// Load the library, defaulting to the sample tracks
    pub fn load(store: PersistentStore) -> Self {
        Self::load_or(store, sample_library())
    }

    /// Load the library with an explicit default
    pub fn load_or(store: PersistentStore, default: Vec<Track>) -> Self {
        let tracks = Persisted::load(store, keys::MUSIC_LIBRARY, default);
        tracing::debug!(count = tracks.get().len(), "library loaded");
        Self { tracks }
    }

    /// All tracks in library order
    pub fn tracks(&self) -> &[Track] {
        self.tracks.get()
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.get().len()
    }

    /// Whether the library is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.get().is_empty()
    }

    /// Look up a track by id
    pub fn get(&self, id: &TrackId) -> Option<&Track> {
        self.tracks.get().iter().find(|t| t.is(id))
    }

    /// Append a track
    ///
    /// Returns `false` when a track with the same id is already in the
    /// library; nothing is written in that case.
    pub fn add(&mut self, track: Track) -> bool {
        let added = self.tracks.update(|tracks| {
            if tracks.iter().any(|t| t.is(&track.id)) {
                return false;
            }
            tracks.push(track);
            true
        });
        if !added {
            tracing::debug!("track already in library");
        }
        added
    }

    /// Tracks matching `term` on title, artist or album
    pub fn filter(&self, term: &str) -> Vec<&Track> {
        filter_tracks(self.tracks.get(), term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str) -> Track {
        Track::new(TrackId::new(id), "New Song", "New Artist", "New Album", 100, "uri")
    }

    #[test]
    fn defaults_to_sample_library() {
        let library = Library::load(PersistentStore::in_memory());
        assert_eq!(library.len(), 5);
        assert!(library.get(&TrackId::new("1")).is_some());
    }

    #[test]
    fn add_persists_and_rejects_duplicates() {
        let store = PersistentStore::in_memory();
        let mut library = Library::load_or(store.clone(), Vec::new());

        assert!(library.add(track("a")));
        assert!(!library.add(track("a")));
        assert_eq!(library.len(), 1);

        let reloaded = Library::load_or(store, Vec::new());
        assert_eq!(reloaded.tracks(), library.tracks());
    }

    #[test]
    fn filter_uses_library_text_fields() {
        let library = Library::load(PersistentStore::in_memory());
        let hits = library.filter("ocean");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Ocean Breeze");
    }
}
