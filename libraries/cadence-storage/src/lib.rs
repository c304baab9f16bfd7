//! Cadence Player Storage
//!
//! Persistent Store Adapter: keeps named, JSON-serializable values in sync
//! with durable key-value storage.
//!
//! # Architecture
//!
//! - **Backends**: [`KeyValueBackend`] maps keys to JSON strings
//!   ([`MemoryBackend`] for tests, [`RedbBackend`] for a single-file store)
//! - **Typed access**: [`PersistentStore`] loads with a default and saves
//!   synchronously; [`Persisted`] binds one value to one key
//! - **Vertical Slicing**: the library and playlists each own their key and
//!   mutation rules
//!
//! # Example
//!
//! ```rust
//! use cadence_storage::{keys, PersistentStore, PlaylistManager};
//!
//! let store = PersistentStore::in_memory();
//!
//! // Absent values fall back without being written
//! assert_eq!(store.load(keys::VOLUME, 1.0_f32), 1.0);
//!
//! store.save(keys::VOLUME, &0.4_f32);
//! assert_eq!(store.load(keys::VOLUME, 1.0_f32), 0.4);
//!
//! let mut playlists = PlaylistManager::load(store);
//! let favourites = playlists.create("Favourites");
//! assert!(playlists.get(&favourites.id).is_some());
//! ```

mod backend;
mod error;
pub mod keys;
mod store;

// Vertical slices
pub mod library;
pub mod playlists;

pub use backend::{KeyValueBackend, MemoryBackend, RedbBackend};
pub use error::{Result, StorageError};
pub use library::Library;
pub use playlists::PlaylistManager;
pub use store::{Persisted, PersistentStore};
