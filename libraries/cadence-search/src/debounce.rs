//! Debounced, latest-wins search
//!
//! Each query change restarts a quiet-period timer. When the timer fires the
//! query is sent to the catalog. Every issued query carries a generation
//! number; a response is published only if its generation is still the
//! newest when it lands. Requests already in flight are never aborted, only
//! ignored.

use crate::catalog::SearchService;
use cadence_core::Track;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Default quiet period before a query is issued
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// What the search view should show
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchSnapshot {
    /// Latest query typed
    pub query: String,

    /// Results for the newest completed search
    pub tracks: Vec<Track>,

    /// A request is in flight
    pub searching: bool,

    /// Query generation the results belong to
    pub generation: u64,
}

/// Debouncing front for a [`SearchService`]
///
/// Must be driven from inside a Tokio runtime.
pub struct DebouncedSearch {
    service: Arc<dyn SearchService>,
    delay: Duration,
    generation: Arc<AtomicU64>,
    pending: Option<JoinHandle<()>>,
    snapshot: Arc<watch::Sender<SearchSnapshot>>,
}

impl DebouncedSearch {
    /// Debounce `service` with the default quiet period
    pub fn new(service: Arc<dyn SearchService>) -> Self {
        Self::with_delay(service, DEFAULT_DEBOUNCE)
    }

    pub fn with_delay(service: Arc<dyn SearchService>, delay: Duration) -> Self {
        let (tx, _rx) = watch::channel(SearchSnapshot::default());
        Self {
            service,
            delay,
            generation: Arc::new(AtomicU64::new(0)),
            pending: None,
            snapshot: Arc::new(tx),
        }
    }

    /// Record a query change
    ///
    /// Cancels the pending timer and starts a new one. A blank query clears
    /// the results immediately and issues nothing.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();

        if let Some(pending) = self.pending.take() {
            pending.abort();
        }

        // generation only changes under the watch lock
        let mut generation = 0;
        if query.trim().is_empty() {
            self.snapshot.send_modify(|s| {
                generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
                *s = SearchSnapshot {
                    query: query.clone(),
                    tracks: Vec::new(),
                    searching: false,
                    generation,
                };
            });
            return;
        }

        self.snapshot.send_modify(|s| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            s.query.clone_from(&query);
        });

        let delay = self.delay;
        let service = Arc::clone(&self.service);
        let current = Arc::clone(&self.generation);
        let snapshot = Arc::clone(&self.snapshot);
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // detached so a later abort of the timer cannot cancel the request
            let _ = tokio::spawn(run_search(service, query, generation, current, snapshot));
        }));
    }

    /// Watch the published results
    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.snapshot.subscribe()
    }

    /// Current published results
    pub fn snapshot(&self) -> SearchSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Generation of the newest query
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Wait until results for the newest query are published
    ///
    /// Failed searches settle with empty results.
    pub async fn settled(&self) -> SearchSnapshot {
        let target = self.generation();
        let mut rx = self.subscribe();
        let snapshot = match rx.wait_for(|s| s.generation >= target).await {
            Ok(snapshot) => snapshot.clone(),
            Err(_) => self.snapshot(),
        };
        snapshot
    }
}

impl Drop for DebouncedSearch {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

impl std::fmt::Debug for DebouncedSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebouncedSearch")
            .field("delay", &self.delay)
            .field("generation", &self.generation())
            .finish_non_exhaustive()
    }
}

async fn run_search(
    service: Arc<dyn SearchService>,
    query: String,
    generation: u64,
    current: Arc<AtomicU64>,
    snapshot: Arc<watch::Sender<SearchSnapshot>>,
) {
    // checked under the watch lock, where set_query bumps the generation
    let is_current = || current.load(Ordering::SeqCst) == generation;
    let started = snapshot.send_if_modified(|s| {
        if !is_current() {
            return false;
        }
        s.searching = true;
        true
    });
    if !started {
        return;
    }

    let outcome = service.search(&query).await;
    let tracks = outcome.unwrap_or_else(|e| {
        tracing::warn!(query = %query, error = %e, "search failed");
        Vec::new()
    });
    let count = tracks.len();

    let published = snapshot.send_if_modified(|s| {
        if !is_current() {
            return false;
        }
        *s = SearchSnapshot {
            query: query.clone(),
            tracks,
            searching: false,
            generation,
        };
        true
    });

    if published {
        tracing::debug!(query = %query, count, "search results published");
    } else {
        tracing::debug!(query = %query, generation, "discarding stale search results");
    }
}
