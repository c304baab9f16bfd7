//! Debounce and stale-result tests
//!
//! Timing tests run on a paused clock. The race tests at the bottom run on a
//! multi-threaded runtime so publishing and query changes really overlap.

use async_trait::async_trait;
use cadence_core::{Track, TrackId};
use cadence_search::{DebouncedSearch, MockCatalog, SearchError, SearchService};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{Notify, Semaphore};

/// Catalog whose latency depends on the query, recording every request
#[derive(Default)]
struct RecordingCatalog {
    calls: Mutex<Vec<String>>,
    failures: AtomicUsize,
}

impl RecordingCatalog {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchService for RecordingCatalog {
    async fn search(&self, query: &str) -> cadence_search::Result<Vec<Track>> {
        self.calls.lock().unwrap().push(query.to_string());

        let latency = if query.starts_with("slow") { 2_000 } else { 100 };
        tokio::time::sleep(Duration::from_millis(latency)).await;

        if query == "boom" {
            self.failures.fetch_add(1, Ordering::SeqCst);
            return Err(SearchError::Unavailable("connection reset".into()));
        }

        Ok(vec![Track::new(
            TrackId::new(format!("{query}-1")),
            format!("{query} result"),
            "Artist",
            "Album",
            100,
            "https://example.test/a.mp3",
        )])
    }
}

fn debounced(catalog: &Arc<RecordingCatalog>) -> DebouncedSearch {
    let service: Arc<dyn SearchService> = catalog.clone();
    DebouncedSearch::with_delay(service, Duration::from_millis(500))
}

async fn settle() {
    tokio::time::sleep(Duration::from_secs(5)).await;
}

#[tokio::test(start_paused = true)]
async fn rapid_typing_issues_one_request() {
    let catalog = Arc::new(RecordingCatalog::default());
    let mut search = debounced(&catalog);

    search.set_query("r");
    tokio::time::sleep(Duration::from_millis(100)).await;
    search.set_query("ro");
    tokio::time::sleep(Duration::from_millis(100)).await;
    search.set_query("rock");
    settle().await;

    assert_eq!(catalog.calls(), vec!["rock".to_string()]);
    let snapshot = search.snapshot();
    assert_eq!(snapshot.query, "rock");
    assert_eq!(snapshot.tracks.len(), 1);
    assert_eq!(snapshot.tracks[0].title, "rock result");
    assert!(!snapshot.searching);
}

#[tokio::test(start_paused = true)]
async fn nothing_issued_before_quiet_period() {
    let catalog = Arc::new(RecordingCatalog::default());
    let mut search = debounced(&catalog);

    search.set_query("pop");
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(catalog.calls().is_empty());
    assert!(search.snapshot().tracks.is_empty());

    settle().await;
    assert_eq!(catalog.calls(), vec!["pop".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn slow_stale_response_is_discarded() {
    let catalog = Arc::new(RecordingCatalog::default());
    let mut search = debounced(&catalog);

    search.set_query("slow query");
    // debounce fired, slow request in flight
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert!(search.snapshot().searching);

    search.set_query("fast");
    settle().await;

    // both requests ran to completion, only the newest was applied
    assert_eq!(
        catalog.calls(),
        vec!["slow query".to_string(), "fast".to_string()]
    );
    let snapshot = search.snapshot();
    assert_eq!(snapshot.query, "fast");
    assert_eq!(snapshot.tracks[0].id, TrackId::new("fast-1"));
}

#[tokio::test(start_paused = true)]
async fn blank_query_clears_immediately() {
    let catalog = Arc::new(RecordingCatalog::default());
    let mut search = debounced(&catalog);

    search.set_query("jazz");
    settle().await;
    assert_eq!(search.snapshot().tracks.len(), 1);

    search.set_query("   ");
    let snapshot = search.snapshot();
    assert!(snapshot.tracks.is_empty());
    assert!(!snapshot.searching);

    settle().await;
    assert_eq!(catalog.calls(), vec!["jazz".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn blank_query_discards_in_flight_results() {
    let catalog = Arc::new(RecordingCatalog::default());
    let mut search = debounced(&catalog);

    search.set_query("slow jazz");
    tokio::time::sleep(Duration::from_millis(600)).await;
    search.set_query("");
    settle().await;

    assert!(search.snapshot().tracks.is_empty());
    assert_eq!(catalog.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn failure_yields_empty_results() {
    let catalog = Arc::new(RecordingCatalog::default());
    let mut search = debounced(&catalog);

    search.set_query("jazz");
    settle().await;
    assert_eq!(search.snapshot().tracks.len(), 1);

    search.set_query("boom");
    settle().await;
    let snapshot = search.snapshot();
    assert!(snapshot.tracks.is_empty());
    assert!(!snapshot.searching);
    assert_eq!(catalog.failures.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn subscribers_see_published_results() {
    let mut search = DebouncedSearch::new(Arc::new(MockCatalog::new()));
    let mut rx = search.subscribe();

    search.set_query("Lofi");
    loop {
        rx.changed().await.unwrap();
        let snapshot = rx.borrow_and_update().clone();
        if !snapshot.searching && !snapshot.tracks.is_empty() {
            assert_eq!(snapshot.tracks.len(), 3);
            assert!(snapshot.tracks.iter().all(|t| t.title.starts_with("Lofi - ")));
            break;
        }
    }
}

#[tokio::test(start_paused = true)]
async fn generation_counts_every_change() {
    let catalog = Arc::new(RecordingCatalog::default());
    let mut search = debounced(&catalog);
    assert_eq!(search.generation(), 0);

    search.set_query("a");
    search.set_query("");
    search.set_query("b");
    assert_eq!(search.generation(), 3);
}

#[tokio::test(start_paused = true)]
async fn settled_waits_for_newest_results() {
    let catalog = Arc::new(RecordingCatalog::default());
    let mut search = debounced(&catalog);

    search.set_query("slow first");
    tokio::time::sleep(Duration::from_millis(600)).await;
    search.set_query("second");

    let snapshot = search.settled().await;
    assert_eq!(snapshot.query, "second");
    assert_eq!(snapshot.generation, 2);
    assert_eq!(snapshot.tracks[0].id, TrackId::new("second-1"));
}

#[tokio::test(start_paused = true)]
async fn settled_returns_immediately_for_blank_query() {
    let catalog = Arc::new(RecordingCatalog::default());
    let mut search = debounced(&catalog);

    search.set_query("  ");
    let snapshot = search.settled().await;
    assert!(snapshot.tracks.is_empty());
    assert!(catalog.calls().is_empty());
}

// ===== Races on a multi-threaded runtime =====

/// Catalog that holds every request until the test releases it
struct GatedCatalog {
    entered: Notify,
    release: Semaphore,
}

impl GatedCatalog {
    fn new() -> Self {
        Self {
            entered: Notify::new(),
            release: Semaphore::new(0),
        }
    }

    /// Wait for a request to arrive, then let it complete
    async fn let_one_through(&self) {
        tokio::time::timeout(Duration::from_secs(5), self.entered.notified())
            .await
            .expect("request never reached the catalog");
        self.release.add_permits(1);
    }
}

#[async_trait]
impl SearchService for GatedCatalog {
    async fn search(&self, query: &str) -> cadence_search::Result<Vec<Track>> {
        self.entered.notify_one();
        self.release
            .acquire()
            .await
            .expect("semaphore closed")
            .forget();

        Ok(vec![Track::new(
            TrackId::new(format!("{query}-1")),
            query,
            "Artist",
            "Album",
            100,
            "https://example.test/gated.mp3",
        )])
    }
}

fn gated(catalog: &Arc<GatedCatalog>) -> DebouncedSearch {
    let service: Arc<dyn SearchService> = catalog.clone();
    DebouncedSearch::with_delay(service, Duration::ZERO)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn blank_query_wins_over_results_landing_concurrently() {
    for _ in 0..200 {
        let catalog = Arc::new(GatedCatalog::new());
        let mut search = gated(&catalog);

        search.set_query("jazz");
        catalog.let_one_through().await;
        search.set_query("");

        let snapshot = search.snapshot();
        assert_eq!(snapshot.generation, 2);
        assert!(snapshot.tracks.is_empty());

        tokio::time::sleep(Duration::from_millis(2)).await;
        let snapshot = search.snapshot();
        assert_eq!(snapshot.query, "");
        assert_eq!(snapshot.generation, 2);
        assert!(snapshot.tracks.is_empty());
        assert!(!snapshot.searching);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn newer_query_wins_over_results_landing_concurrently() {
    for _ in 0..200 {
        let catalog = Arc::new(GatedCatalog::new());
        let mut search = gated(&catalog);

        search.set_query("jazz");
        catalog.let_one_through().await;
        search.set_query("rock");
        catalog.let_one_through().await;

        let snapshot = tokio::time::timeout(Duration::from_secs(5), search.settled())
            .await
            .expect("newest query never settled");
        assert_eq!(snapshot.generation, 2);
        assert_eq!(snapshot.query, "rock");
        assert_eq!(snapshot.tracks.len(), 1);
        assert_eq!(snapshot.tracks[0].id, TrackId::new("rock-1"));

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(search.snapshot().tracks[0].id, TrackId::new("rock-1"));
    }
}
