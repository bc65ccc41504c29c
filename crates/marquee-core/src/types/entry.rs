//! Cache entry type

use std::time::Duration;
use tokio::time::Instant;

use super::state::FetchStatus;
use crate::Error;

/// One query cache slot with its fetch bookkeeping
///
/// `generation` is bumped whenever the slot is invalidated; a fetch only
/// settles the entry if it was started under the current generation.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// Canonical key
    pub key: String,
    /// Query family the key belongs to
    pub family: Option<String>,
    /// Last successful value
    pub value: Option<V>,
    /// Settled status, or `Loading` while the first fetch runs
    pub status: FetchStatus,
    /// When `value` was last written
    pub updated_at: Option<Instant>,
    /// Last fetch error
    pub error: Option<Error>,
    /// When `error` was recorded
    pub error_at: Option<Instant>,
    /// A fetch for this slot is in flight
    pub fetching: bool,
    /// Invalidation counter
    pub generation: u64,
    /// Number of fetches started for this slot
    pub fetch_count: u64,
}

impl<V> CacheEntry<V> {
    /// Create an idle entry
    pub fn new(key: impl Into<String>, family: Option<String>) -> Self {
        Self {
            key: key.into(),
            family,
            value: None,
            status: FetchStatus::Idle,
            updated_at: None,
            error: None,
            error_at: None,
            fetching: false,
            generation: 0,
            fetch_count: 0,
        }
    }

    /// Holds a value younger than `stale_time`
    pub fn is_fresh(&self, stale_time: Duration) -> bool {
        self.value.is_some()
            && self
                .updated_at
                .is_some_and(|at| at.elapsed() < stale_time)
    }

    /// Holds a value that is past `stale_time` (or was invalidated)
    pub fn is_stale(&self, stale_time: Duration) -> bool {
        self.value.is_some() && !self.is_fresh(stale_time)
    }

    /// Last fetch failed less than `error_ttl` ago
    pub fn has_fresh_error(&self, error_ttl: Duration) -> bool {
        self.status == FetchStatus::Error
            && self.error_at.is_some_and(|at| at.elapsed() < error_ttl)
    }

    /// Mark a fetch as started and return the generation it belongs to
    pub fn begin_fetch(&mut self) -> u64 {
        if !self.fetching {
            self.fetching = true;
            self.fetch_count += 1;
            if self.value.is_none() {
                self.status = FetchStatus::Loading;
            }
        }
        self.generation
    }

    /// Apply a successful fetch; returns false if `generation` is outdated
    pub fn record_success(&mut self, generation: u64, value: V) -> bool {
        if generation != self.generation {
            return false;
        }
        self.value = Some(value);
        self.status = FetchStatus::Success;
        self.updated_at = Some(Instant::now());
        self.error = None;
        self.error_at = None;
        self.fetching = false;
        true
    }

    /// Apply a failed fetch; returns false if `generation` is outdated
    pub fn record_error(&mut self, generation: u64, error: Error) -> bool {
        if generation != self.generation {
            return false;
        }
        self.status = FetchStatus::Error;
        self.error = Some(error);
        self.error_at = Some(Instant::now());
        self.fetching = false;
        true
    }

    /// Drop freshness and orphan any in-flight fetch
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.fetching = false;
        self.updated_at = None;
        self.error = None;
        self.error_at = None;
        self.status = if self.value.is_some() {
            FetchStatus::Success
        } else {
            FetchStatus::Idle
        };
    }

    /// Age of the current value
    pub fn age(&self) -> Option<Duration> {
        self.updated_at.map(|at| at.elapsed())
    }
}
