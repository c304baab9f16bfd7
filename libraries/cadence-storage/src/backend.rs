//! Durable key-value backends
//!
//! A backend maps string keys to JSON strings. It knows nothing about the
//! values it holds; typing and fallback rules live in [`crate::PersistentStore`].

use crate::error::{Result, StorageError};
use redb::{Database, TableDefinition};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

/// Key → JSON-string storage
///
/// Writes are synchronous: when `write` returns `Ok`, the value is durable
/// as far as the backend can guarantee.
pub trait KeyValueBackend: Send + Sync {
    /// Read the raw value stored under `key`
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any prior value
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key` if present
    fn remove(&self, key: &str) -> Result<()>;
}

/// Process-local backend
///
/// Nothing survives the process; used for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend pre-seeded with raw values
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: Mutex::new(
                values
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl KeyValueBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.lock().map_err(|_| StorageError::LockPoisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self.values.lock().map_err(|_| StorageError::LockPoisoned)?;
        values.remove(key);
        Ok(())
    }
}

const VALUES: TableDefinition<&str, &str> = TableDefinition::new("values");

/// Single-file durable backend built on redb
pub struct RedbBackend {
    db: Database,
}

impl RedbBackend {
    /// Open (or create) the database file at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let db = Database::create(path).map_err(redb::Error::from)?;
        Self::ensure_table(&db)?;

        tracing::debug!(path = %path.display(), "opened redb store");
        Ok(Self { db })
    }

    fn ensure_table(db: &Database) -> std::result::Result<(), redb::Error> {
        let txn = db.begin_write()?;
        txn.open_table(VALUES)?;
        txn.commit()?;
        Ok(())
    }

    fn read_value(&self, key: &str) -> std::result::Result<Option<String>, redb::Error> {
        let txn = self.db.begin_read()?;
        let table = match txn.open_table(VALUES) {
            Ok(table) => table,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let value = table.get(key)?.map(|guard| guard.value().to_string());
        Ok(value)
    }

    fn write_value(&self, key: &str, value: &str) -> std::result::Result<(), redb::Error> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(VALUES)?;
            table.insert(key, value)?;
        }
        txn.commit()?;
        Ok(())
    }

    fn remove_value(&self, key: &str) -> std::result::Result<(), redb::Error> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(VALUES)?;
            table.remove(key)?;
        }
        txn.commit()?;
        Ok(())
    }
}

impl KeyValueBackend for RedbBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_value(key)?)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        Ok(self.write_value(key, value)?)
    }

    fn remove(&self, key: &str) -> Result<()> {
        Ok(self.remove_value(key)?)
    }
}
