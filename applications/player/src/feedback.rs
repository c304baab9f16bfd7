//! Transient "recently added" markers
//!
//! Adding a track to the library flashes an "Added!" confirmation next to
//! it for a short while. Views ask [`RecentlyAdded::is_marked`] instead of
//! holding their own timers.

use cadence_core::TrackId;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Default marker lifetime
pub const DEFAULT_ADDED_TTL: Duration = Duration::from_secs(2);

/// Tracks added recently, keyed by track id
#[derive(Debug, Clone)]
pub struct RecentlyAdded {
    ttl: Duration,
    marked: HashMap<TrackId, Instant>,
}

impl RecentlyAdded {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            marked: HashMap::new(),
        }
    }

    /// Mark `id` as added now, restarting its lifetime if already marked
    pub fn mark(&mut self, id: TrackId) {
        self.mark_at(id, Instant::now());
    }

    pub fn mark_at(&mut self, id: TrackId, now: Instant) {
        self.prune(now);
        self.marked.insert(id, now);
    }

    pub fn is_marked(&self, id: &TrackId) -> bool {
        self.is_marked_at(id, Instant::now())
    }

    pub fn is_marked_at(&self, id: &TrackId, now: Instant) -> bool {
        self.marked
            .get(id)
            .is_some_and(|at| now.saturating_duration_since(*at) < self.ttl)
    }

    /// Drop expired markers
    pub fn prune(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.marked
            .retain(|_, at| now.saturating_duration_since(*at) < ttl);
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl Default for RecentlyAdded {
    fn default() -> Self {
        Self::new(DEFAULT_ADDED_TTL)
    }
}
