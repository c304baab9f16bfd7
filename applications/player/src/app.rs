//! Player composition root
//!
//! Wires the persisted library and playlists, the sequencer and the
//! persisted audio settings together. Every mutation is written through to
//! storage as it happens.

use crate::error::{PlayerError, Result};
use crate::feedback::RecentlyAdded;
use cadence_core::{Playlist, PlaylistId, Track, TrackId};
use cadence_playback::{PlaybackEvent, Sequencer, TransportSnapshot};
use cadence_storage::{keys, Library, Persisted, PersistentStore, PlaylistManager};
use std::time::Duration;

pub struct PlayerApp {
    library: Library,
    playlists: PlaylistManager,
    sequencer: Sequencer,
    volume: Persisted<f32>,
    muted: Persisted<bool>,
    recently_added: RecentlyAdded,
}

impl PlayerApp {
    /// Load persisted state from `store` and restore audio settings
    pub fn new(store: PersistentStore, sequencer: Sequencer, added_ttl: Duration) -> Self {
        let mut app = Self {
            library: Library::load(store.clone()),
            playlists: PlaylistManager::load(store.clone()),
            sequencer,
            volume: Persisted::load(store.clone(), keys::VOLUME, 1.0),
            muted: Persisted::load(store, keys::MUTED, false),
            recently_added: RecentlyAdded::new(added_ttl),
        };
        app.restore_audio_settings();
        app
    }

    /// Apply the stored volume, then the stored mute flag
    ///
    /// Nothing is written back; stored values only change when the user
    /// changes them.
    pub fn restore_audio_settings(&mut self) {
        let volume = *self.volume.get();
        let muted = *self.muted.get();

        self.sequencer.set_volume(volume);
        if self.sequencer.is_muted() != muted {
            self.sequencer.toggle_mute();
        }
        tracing::debug!(volume, muted, "audio settings restored");
    }

    // ===== Transport =====

    /// Play `track` with `context` as the active list
    pub fn play(&mut self, track: &Track, context: &[Track]) {
        self.sequencer.start(track, context);
    }

    /// Play a library track, making the whole library the active list
    pub fn play_from_library(&mut self, id: &TrackId) -> Result<()> {
        let track = self
            .library
            .get(id)
            .cloned()
            .ok_or_else(|| PlayerError::track_not_found(id))?;
        self.sequencer.start(&track, self.library.tracks());
        Ok(())
    }

    /// Play a playlist track, making the playlist the active list
    pub fn play_from_playlist(&mut self, playlist_id: &PlaylistId, id: &TrackId) -> Result<()> {
        let playlist = self
            .playlists
            .get(playlist_id)
            .ok_or_else(|| PlayerError::playlist_not_found(playlist_id))?;
        let track = playlist
            .tracks()
            .iter()
            .find(|t| t.is(id))
            .cloned()
            .ok_or_else(|| PlayerError::track_not_found(id))?;
        self.sequencer.start(&track, playlist.tracks());
        Ok(())
    }

    pub fn toggle_play_pause(&mut self) {
        self.sequencer.toggle_play_pause();
    }

    pub fn next(&mut self) {
        self.sequencer.next();
    }

    pub fn previous(&mut self) {
        self.sequencer.previous();
    }

    pub fn seek(&mut self, secs: f64) {
        self.sequencer.seek(secs);
    }

    pub fn toggle_shuffle(&mut self) {
        self.sequencer.toggle_shuffle();
    }

    pub fn cycle_repeat_mode(&mut self) {
        self.sequencer.cycle_repeat_mode();
    }

    /// Set volume and persist the audio settings
    pub fn set_volume(&mut self, level: f32) {
        self.sequencer.set_volume(level);
        self.persist_audio_settings();
    }

    /// Flip mute and persist the audio settings
    pub fn toggle_mute(&mut self) {
        self.sequencer.toggle_mute();
        self.persist_audio_settings();
    }

    /// Apply queued device notifications
    pub fn pump(&mut self) -> usize {
        self.sequencer.pump_device_events()
    }

    /// Block up to `timeout` for the next device notification, then apply
    /// everything queued
    pub fn pump_blocking(&mut self, timeout: Duration) -> usize {
        match self.sequencer.device_events().recv_timeout(timeout) {
            Ok(message) => {
                let first = usize::from(self.sequencer.handle_device_message(message));
                first + self.sequencer.pump_device_events()
            }
            Err(_) => 0,
        }
    }

    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        self.sequencer.drain_events()
    }

    pub fn transport(&self) -> TransportSnapshot {
        self.sequencer.transport()
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    // ===== Library =====

    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Add `track` to the library and flag it as recently added
    ///
    /// The marker is set even when the track was already present. Returns
    /// whether the library changed.
    pub fn add_to_library(&mut self, track: Track) -> bool {
        let id = track.id.clone();
        let added = self.library.add(track);
        self.recently_added.mark(id);
        added
    }

    pub fn is_recently_added(&self, id: &TrackId) -> bool {
        self.recently_added.is_marked(id)
    }

    pub fn recently_added(&self) -> &RecentlyAdded {
        &self.recently_added
    }

    // ===== Playlists =====

    pub fn playlists(&self) -> &[Playlist] {
        self.playlists.all()
    }

    pub fn playlist(&self, id: &PlaylistId) -> Option<&Playlist> {
        self.playlists.get(id)
    }

    pub fn create_playlist(&mut self, name: impl Into<String>) -> Playlist {
        self.playlists.create(name)
    }

    pub fn delete_playlist(&mut self, id: &PlaylistId) -> bool {
        self.playlists.delete(id)
    }

    pub fn add_to_playlist(&mut self, id: &PlaylistId, track: Track) -> bool {
        self.playlists.add_track(id, track)
    }

    pub fn remove_from_playlist(&mut self, id: &PlaylistId, track_id: &TrackId) -> bool {
        self.playlists.remove_track(id, track_id)
    }

    pub fn clear_playlist(&mut self, id: &PlaylistId) -> bool {
        self.playlists.clear(id)
    }

    pub fn rename_playlist(&mut self, id: &PlaylistId, name: impl Into<String>) -> bool {
        self.playlists.rename(id, name)
    }

    fn persist_audio_settings(&mut self) {
        self.volume.set(self.sequencer.volume());
        self.muted.set(self.sequencer.is_muted());
    }
}

impl std::fmt::Debug for PlayerApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerApp")
            .field("library_len", &self.library.len())
            .field("playlists", &self.playlists.all().len())
            .field("sequencer", &self.sequencer)
            .finish_non_exhaustive()
    }
}
