//! Persisted playlist management
//!
//! All playlists live in one list under
//! [`keys::PLAYLISTS`](crate::keys::PLAYLISTS). Each mutation that changes
//! something rewrites that list; operations that change nothing (unknown
//! playlist id, duplicate track, missing track) write nothing and return
//! `false`.

use crate::keys;
use crate::store::{Persisted, PersistentStore};
use cadence_core::{Playlist, PlaylistId, Track, TrackId};

/// Playlist manager
#[derive(Debug)]
pub struct PlaylistManager {
    playlists: Persisted<Vec<Playlist>>,
}

impl PlaylistManager {
    /// Load playlists from `store` (empty when nothing is stored)
    pub fn load(store: PersistentStore) -> Self {
        let playlists = Persisted::load(store, keys::PLAYLISTS, Vec::new());
        tracing::debug!(count = playlists.get().len(), "playlists loaded");
        Self { playlists }
    }

    /// All playlists in creation order
    pub fn all(&self) -> &[Playlist] {
        self.playlists.get()
    }

    /// Look up a playlist
    pub fn get(&self, id: &PlaylistId) -> Option<&Playlist> {
        self.playlists.get().iter().find(|p| &p.id == id)
    }

    /// Create a new empty playlist and persist it
    pub fn create(&mut self, name: impl Into<String>) -> Playlist {
        let playlist = Playlist::new(name);
        let created = playlist.clone();
        self.playlists.update(|playlists| {
            playlists.push(playlist);
            true
        });
        tracing::info!(id = %created.id, name = %created.name, "playlist created");
        created
    }

    /// Delete a playlist
    pub fn delete(&mut self, id: &PlaylistId) -> bool {
        self.playlists.update(|playlists| {
            let before = playlists.len();
            playlists.retain(|p| &p.id != id);
            playlists.len() != before
        })
    }

    /// Append a track to a playlist
    ///
    /// A track whose id is already in the playlist is ignored.
    pub fn add_track(&mut self, id: &PlaylistId, track: Track) -> bool {
        let added = self.modify(id, |playlist| playlist.push(track));
        if !added {
            tracing::debug!(playlist = %id, "track not added (duplicate or unknown playlist)");
        }
        added
    }

    /// Remove a track from a playlist
    pub fn remove_track(&mut self, id: &PlaylistId, track_id: &TrackId) -> bool {
        self.modify(id, |playlist| playlist.remove(track_id))
    }

    /// Remove every track from a playlist
    pub fn clear(&mut self, id: &PlaylistId) -> bool {
        self.modify(id, |playlist| {
            let had_tracks = !playlist.is_empty();
            playlist.clear();
            had_tracks
        })
    }

    /// Rename a playlist
    pub fn rename(&mut self, id: &PlaylistId, name: impl Into<String>) -> bool {
        let name = name.into();
        self.modify(id, |playlist| {
            if playlist.name == name {
                return false;
            }
            playlist.rename(name);
            true
        })
    }

    fn modify(&mut self, id: &PlaylistId, f: impl FnOnce(&mut Playlist) -> bool) -> bool {
        self.playlists.update(|playlists| {
            playlists
                .iter_mut()
                .find(|p| &p.id == id)
                .is_some_and(f)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str) -> Track {
        Track::new(TrackId::new(id), "Title", "Artist", "Album", 120, "uri")
    }

    #[test]
    fn create_starts_empty() {
        let mut manager = PlaylistManager::load(PersistentStore::in_memory());
        let playlist = manager.create("Chill Vibes");
        assert!(playlist.is_empty());
        assert_eq!(manager.all().len(), 1);
        assert_eq!(manager.get(&playlist.id).unwrap().name, "Chill Vibes");
    }

    #[test]
    fn unknown_playlist_operations_are_noops() {
        let mut manager = PlaylistManager::load(PersistentStore::in_memory());
        let missing = PlaylistId::new("missing");

        assert!(!manager.add_track(&missing, track("1")));
        assert!(!manager.remove_track(&missing, &TrackId::new("1")));
        assert!(!manager.clear(&missing));
        assert!(!manager.rename(&missing, "x"));
        assert!(!manager.delete(&missing));
    }

    #[test]
    fn clear_on_empty_reports_no_change() {
        let mut manager = PlaylistManager::load(PersistentStore::in_memory());
        let id = manager.create("Empty").id;
        assert!(!manager.clear(&id));
    }
}
