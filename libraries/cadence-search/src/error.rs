//! Error types for catalog search

use thiserror::Error;

/// Search errors
#[derive(Debug, Error)]
pub enum SearchError {
    /// The catalog could not be reached
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

/// Result type for search operations
pub type Result<T> = std::result::Result<T, SearchError>;

impl From<SearchError> for cadence_core::CadenceError {
    fn from(err: SearchError) -> Self {
        cadence_core::CadenceError::search(err.to_string())
    }
}
