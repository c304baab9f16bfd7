//! Cadence Player - Online Search
//!
//! A catalog abstraction ([`SearchService`]), an offline [`MockCatalog`]
//! that fabricates results around the query, and [`DebouncedSearch`], which
//! waits for typing to settle and only ever publishes the newest results.
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_search::{DebouncedSearch, MockCatalog};
//! use std::sync::Arc;
//!
//! # async fn demo() {
//! let mut search = DebouncedSearch::new(Arc::new(MockCatalog::new()));
//! let mut results = search.subscribe();
//!
//! search.set_query("jaz");
//! search.set_query("jazz"); // restarts the quiet period
//!
//! results.changed().await.ok();
//! println!("{:?}", results.borrow().tracks);
//! # }
//! ```

pub mod catalog;
pub mod debounce;
pub mod error;

pub use catalog::{MockCatalog, SearchService, DEFAULT_LATENCY};
pub use debounce::{DebouncedSearch, SearchSnapshot, DEFAULT_DEBOUNCE};
pub use error::{Result, SearchError};
