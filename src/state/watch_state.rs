use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::config::REFRESH_WINDOW_SECS;
use crate::types::FavoriteMap;

// ---------------------------------------------------------------------------
// SentSet
// ---------------------------------------------------------------------------

/// Fixture ids that already produced an alert. Only ever grows; a process
/// restart is the only thing that clears it.
#[derive(Debug, Default)]
pub struct SentSet(HashSet<u64>);

impl SentSet {
    pub fn contains(&self, fixture_id: u64) -> bool {
        self.0.contains(&fixture_id)
    }

    /// Returns false if the fixture was already marked.
    pub fn mark(&mut self, fixture_id: u64) -> bool {
        self.0.insert(fixture_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

// ---------------------------------------------------------------------------
// WatchState — everything the polling loop mutates
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct WatchState {
    pub favorites: FavoriteMap,
    pub sent: SentSet,
    last_refresh: Option<Instant>,
}

impl WatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Due before the first successful refresh and once the window has elapsed since the last.
    pub fn refresh_due(&self, now: Instant) -> bool {
        match self.last_refresh {
            None => true,
            Some(at) => now.saturating_duration_since(at) >= Duration::from_secs(REFRESH_WINDOW_SECS),
        }
    }

    /// Swap in a freshly built map. The previous map is dropped whole; the sent
    /// set is untouched.
    pub fn replace_favorites(&mut self, favorites: FavoriteMap, now: Instant) {
        self.favorites = favorites;
        self.last_refresh = Some(now);
    }
}
