//! Shared fixtures for player integration tests

#![allow(dead_code)]

use cadence_core::{Track, TrackId};
use cadence_playback::{NullDevice, PlaybackConfig, Sequencer};
use cadence_player::PlayerApp;
use cadence_storage::PersistentStore;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

pub const TEST_TTL: Duration = Duration::from_secs(60);

/// Temp-dir redb file that is removed on drop
pub struct TestStore {
    pub path: PathBuf,
    _temp_dir: TempDir,
}

impl TestStore {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("cadence.redb");
        Self {
            path,
            _temp_dir: temp_dir,
        }
    }

    pub fn open(&self) -> PersistentStore {
        PersistentStore::open(&self.path).expect("Failed to open store")
    }
}

/// App over `store` with a device that accepts everything
pub fn app_with_store(store: PersistentStore) -> PlayerApp {
    let sequencer = Sequencer::new(PlaybackConfig::default(), NullDevice::factory());
    PlayerApp::new(store, sequencer, TEST_TTL)
}

/// App over a fresh in-memory store, returning the store for reopening
pub fn test_app() -> (PlayerApp, PersistentStore) {
    let store = PersistentStore::in_memory();
    (app_with_store(store.clone()), store)
}

pub fn create_test_track(id: &str, duration: u32) -> Track {
    Track::new(
        TrackId::new(id),
        format!("Track {id}"),
        "Test Artist",
        "Test Album",
        duration,
        format!("https://example.test/{id}.mp3"),
    )
}
