//! Typed persistence over a key-value backend
//!
//! Values are stored as JSON strings. Reads never write: a missing or
//! malformed value yields the caller's default and leaves storage untouched
//! until the first explicit save.
//!
//! Storage failures are not recoverable mid-session. [`PersistentStore::load`]
//! and [`PersistentStore::save`] log them and carry on, leaving the in-memory
//! value authoritative. Use the `try_` variants to observe the error.

use crate::backend::{KeyValueBackend, MemoryBackend, RedbBackend};
use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Shared handle to durable key-value storage
#[derive(Clone)]
pub struct PersistentStore {
    backend: Arc<dyn KeyValueBackend>,
}

impl PersistentStore {
    /// Wrap a backend
    pub fn new(backend: impl KeyValueBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Store that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Open a durable redb-backed store at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(RedbBackend::open(path)?))
    }

    /// Read and deserialize `key`
    ///
    /// Returns `Ok(None)` when nothing is stored.
    pub fn try_load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.backend.read(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Read `key`, falling back to `default` when absent or unreadable
    ///
    /// The default is never written back.
    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.try_load(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                tracing::warn!(key, error = %e, "stored value unreadable, using default");
                default
            }
        }
    }

    /// Serialize and write `value` under `key`
    pub fn try_save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.backend.write(key, &raw)
    }

    /// Serialize and write `value`, logging failures
    ///
    /// Returns whether the write succeeded.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        match self.try_save(key, value) {
            Ok(()) => {
                tracing::trace!(key, "saved");
                true
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to persist value, keeping in-memory copy");
                false
            }
        }
    }

    /// Delete `key`
    pub fn remove(&self, key: &str) -> Result<()> {
        self.backend.remove(key)
    }
}

impl fmt::Debug for PersistentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentStore").finish_non_exhaustive()
    }
}

/// A value mirrored to one storage key
///
/// Loaded once on creation; every change made through [`Persisted::set`] or
/// [`Persisted::update`] is written through immediately.
#[derive(Debug)]
pub struct Persisted<T> {
    store: PersistentStore,
    key: String,
    value: T,
}

impl<T> Persisted<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Load `key` from `store`, or start from `default`
    pub fn load(store: PersistentStore, key: impl Into<String>, default: T) -> Self {
        let key = key.into();
        let value = store.load(&key, default);
        Self { store, key, value }
    }

    /// Storage key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current in-memory value
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replace the value and persist it
    pub fn set(&mut self, value: T) -> bool {
        self.value = value;
        self.store.save(&self.key, &self.value)
    }

    /// Mutate in place; persists only when `f` reports a change
    ///
    /// Returns what `f` returned.
    pub fn update(&mut self, f: impl FnOnce(&mut T) -> bool) -> bool {
        let changed = f(&mut self.value);
        if changed {
            self.store.save(&self.key, &self.value);
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default_without_writing() {
        let store = PersistentStore::in_memory();
        assert_eq!(store.load("volume", 1.0_f64), 1.0);
        assert_eq!(store.try_load::<f64>("volume").unwrap(), None);
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = PersistentStore::in_memory();
        assert!(store.save("muted", &true));
        assert!(store.load("muted", false));
    }

    #[test]
    fn malformed_value_falls_back() {
        let store = PersistentStore::new(MemoryBackend::with_values([("volume", "not json")]));
        assert_eq!(store.load("volume", 0.3_f64), 0.3);
        assert!(store.try_load::<f64>("volume").is_err());
    }

    #[test]
    fn persisted_update_only_saves_changes() {
        let store = PersistentStore::in_memory();
        let mut counter = Persisted::load(store.clone(), "counter", 0_u32);

        assert!(!counter.update(|_| false));
        assert_eq!(store.try_load::<u32>("counter").unwrap(), None);

        assert!(counter.update(|c| {
            *c += 1;
            true
        }));
        assert_eq!(store.try_load::<u32>("counter").unwrap(), Some(1));
        assert_eq!(*counter.get(), 1);
    }

    #[test]
    fn persisted_reads_existing_value() {
        let store = PersistentStore::in_memory();
        store.save("name", "stored");
        let name = Persisted::load(store, "name", String::from("default"));
        assert_eq!(name.get(), "stored");
        assert_eq!(name.key(), "name");
    }
}
