/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Durable backend failure (open, transaction, commit)
    #[error("Backend error: {0}")]
    Backend(#[from] redb::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// In-memory backend lock was poisoned by a panicking writer
    #[error("Storage lock poisoned")]
    LockPoisoned,

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<StorageError> for cadence_core::CadenceError {
    fn from(err: StorageError) -> Self {
        cadence_core::CadenceError::storage(err.to_string())
    }
}
