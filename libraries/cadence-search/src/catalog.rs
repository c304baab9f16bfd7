//! Catalog search collaborators

use crate::error::Result;
use async_trait::async_trait;
use cadence_core::{Track, TrackId};
use rand::Rng;
use std::time::Duration;

/// Default simulated round trip for [`MockCatalog`]
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(500);

const COVER_QUERY: &str = "?auto=compress&cs=tinysrgb&w=300";

/// Online track catalog
///
/// Results come back in catalog order. Implementations decide their own
/// latency; callers that want debouncing wrap them in
/// [`DebouncedSearch`](crate::DebouncedSearch).
#[async_trait]
pub trait SearchService: Send + Sync {
    /// Search the catalog for `query`
    async fn search(&self, query: &str) -> Result<Vec<Track>>;
}

/// Offline stand-in for an online catalog
///
/// Every query yields up to three generated tracks built around the query
/// text, each with a fresh id and a randomized duration.
#[derive(Debug, Clone)]
pub struct MockCatalog {
    latency: Duration,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::with_latency(DEFAULT_LATENCY)
    }

    /// Catalog answering after `latency`
    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    fn generate(query: &str) -> Vec<Track> {
        let mut rng = rand::thread_rng();
        [
            ("Electronic Mix", "Various Artists", "Online Collection", 180, 120, 1, 1_540_406),
            ("Acoustic Version", "Indie Artists", "Acoustic Sessions", 200, 100, 2, 164_745),
            ("Remix", "DJ Collective", "Remix Album", 220, 80, 3, 1_105_666),
        ]
        .into_iter()
        .map(|(suffix, artist, album, base, spread, song, photo)| {
            Track::new(
                TrackId::generate(),
                format!("{query} - {suffix}"),
                artist,
                album,
                base + rng.gen_range(0..spread),
                format!("https://www.soundhelix.com/examples/mp3/SoundHelix-Song-{song}.mp3"),
            )
            .with_cover(format!(
                "https://images.pexels.com/photos/{photo}/pexels-photo-{photo}.jpeg{COVER_QUERY}"
            ))
        })
        .collect()
    }
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchService for MockCatalog {
    async fn search(&self, query: &str) -> Result<Vec<Track>> {
        tokio::time::sleep(self.latency).await;

        let needle = query.to_lowercase();
        let results: Vec<Track> = Self::generate(query)
            .into_iter()
            .filter(|t| {
                t.title.to_lowercase().contains(&needle) || t.artist.to_lowercase().contains(&needle)
            })
            .collect();

        tracing::debug!(query, count = results.len(), "mock catalog search");
        Ok(results)
    }
}
