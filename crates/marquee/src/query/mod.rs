//! Keyed cache of async query results
//!
//! Every key owns one [`CacheEntry`]. A fetch for a key is started at most
//! once at a time; concurrent callers join it. Results are applied only if
//! the entry's generation is unchanged since the fetch began, so responses
//! for invalidated, removed or recreated keys are dropped.

use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;

use dashmap::DashMap;
use marquee_core::{
    CacheEntry, CacheKey, CacheMetrics, CacheOperation, DiscardReason, Error, FetchStatus,
    NoopMetrics, QueryOptions, QueryState, QueryStats, Result,
};

mod coalescer;
use coalescer::Coalescer;

mod read_through;
pub use read_through::{Loader, QueryCacheReadThroughExt, ReadThroughCache};

/// Configuration for QueryCache
#[derive(Debug, Clone)]
pub struct QueryCacheConfig {
    /// Staleness window for calls without an explicit one
    pub default_stale_time: Duration,
    /// How long a failed fetch is reported before it may run again
    pub error_ttl: Duration,
    /// Namespace prefix for all keys
    pub namespace: Option<String>,
}

impl Default for QueryCacheConfig {
    fn default() -> Self {
        Self {
            default_stale_time: Duration::from_secs(300),
            error_ttl: Duration::from_secs(30),
            namespace: None,
        }
    }
}

impl QueryCacheConfig {
    /// Create config with a specific default staleness window
    pub fn with_stale_time(stale_time: Duration) -> Self {
        Self {
            default_stale_time: stale_time,
            ..Default::default()
        }
    }

    /// Create config with namespace
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            ..Default::default()
        }
    }

    /// Set the error retention window
    pub fn error_ttl(mut self, error_ttl: Duration) -> Self {
        self.error_ttl = error_ttl;
        self
    }
}

/// Latest requested key of a query family and its last applied success
#[derive(Debug, Clone)]
struct FamilyCursor {
    current: String,
    last_settled: Option<String>,
}

/// What a fetch call decided while holding the entry lock
enum Plan<V> {
    Hit(V),
    Stale { value: V, refresh: Option<u64> },
    CachedError(Error),
    Fetch(u64),
}

/// Keyed async result cache with staleness and in-flight deduplication
///
/// Entries live until they are removed or the cache is cleared; settled
/// entries for keys that are no longer requested are not evicted.
///
/// Generic over:
/// - `V`: The cached value
/// - `M`: The metrics collector
pub struct QueryCache<V, M = NoopMetrics>
where
    M: CacheMetrics,
{
    entries: Arc<DashMap<String, CacheEntry<V>>>,
    families: Arc<DashMap<String, FamilyCursor>>,
    coalescer: Coalescer<V>,
    metrics: Arc<M>,
    stats: Arc<Mutex<QueryStats>>,
    incarnations: Arc<AtomicU64>,
    config: QueryCacheConfig,
}

impl<V, M: CacheMetrics> Clone for QueryCache<V, M> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            families: self.families.clone(),
            coalescer: self.coalescer.clone(),
            metrics: self.metrics.clone(),
            stats: self.stats.clone(),
            incarnations: self.incarnations.clone(),
            config: self.config.clone(),
        }
    }
}

// Constructors for default metrics
impl<V: Clone + Send + Sync + 'static> QueryCache<V, NoopMetrics> {
    /// Create a cache with default config and no metrics
    pub fn new() -> Self {
        Self::with_config(QueryCacheConfig::default())
    }

    /// Create with custom config
    pub fn with_config(config: QueryCacheConfig) -> Self {
        Self::with_metrics(config, NoopMetrics)
    }
}

impl<V: Clone + Send + Sync + 'static> Default for QueryCache<V, NoopMetrics> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, M> QueryCache<V, M>
where
    V: Clone + Send + Sync + 'static,
    M: CacheMetrics,
{
    /// Create a cache with a custom metrics collector
    pub fn with_metrics(config: QueryCacheConfig, metrics: M) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            families: Arc::new(DashMap::new()),
            coalescer: Coalescer::new(),
            metrics: Arc::new(metrics),
            stats: Arc::new(Mutex::new(QueryStats::default())),
            incarnations: Arc::new(AtomicU64::new(0)),
            config,
        }
    }

    /// Get the cache configuration
    pub fn config(&self) -> &QueryCacheConfig {
        &self.config
    }

    /// Get the full key with namespace prefix
    fn full_key(&self, key: &str) -> String {
        match &self.config.namespace {
            Some(ns) => format!("{}:{}", ns, key),
            None => key.to_string(),
        }
    }

    fn stale_time(&self, options: &QueryOptions) -> Duration {
        options.stale_time.unwrap_or(self.config.default_stale_time)
    }

    fn error_ttl(&self, options: &QueryOptions) -> Duration {
        options.error_ttl.unwrap_or(self.config.error_ttl)
    }

    /// Fresh entry whose generations can never match a fetch started for an
    /// earlier incarnation of the same key
    fn new_entry(&self, key: &str, family: Option<String>) -> CacheEntry<V> {
        let mut entry = CacheEntry::new(key, family);
        entry.generation = self.incarnations.fetch_add(1, Ordering::Relaxed) << 32;
        entry
    }

    /// Record `key` as shown, if it is still the family's current key
    fn mark_settled(&self, family: &str, key: &str) {
        if let Some(mut cursor) = self.families.get_mut(family) {
            if cursor.current == key {
                cursor.last_settled = Some(key.to_string());
            }
        }
    }

    fn mark_current(&self, family: &str, key: &str) {
        self.families
            .entry(family.to_string())
            .and_modify(|cursor| cursor.current = key.to_string())
            .or_insert_with(|| FamilyCursor {
                current: key.to_string(),
                last_settled: None,
            });
    }

    /// Fetch a value through the cache
    ///
    /// - fresh value: returned without calling `fetcher`
    /// - stale value: returned immediately, one background refresh is started
    /// - recent error: returned without calling `fetcher`
    /// - otherwise: `fetcher` runs (or an in-flight run is joined)
    ///
    /// Disabled options yield [`QueryState::idle`] and never fetch.
    pub async fn fetch<K, F, Fut>(&self, key: &K, fetcher: F, options: &QueryOptions) -> QueryState<V>
    where
        K: CacheKey + ?Sized,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        let full_key = self.full_key(&key.cache_key());
        let family = key.family();

        if !options.enabled {
            // A disabled key still becomes the family's current key, so the
            // previous key's data is not reported as current
            if let Some(family) = &family {
                self.mark_current(family, &full_key);
            }
            return QueryState::idle();
        }

        let stale_time = self.stale_time(options);
        let error_ttl = self.error_ttl(options);

        if let Some(family) = &family {
            self.mark_current(family, &full_key);
        }

        let plan = {
            let mut entry = self
                .entries
                .entry(full_key.clone())
                .or_insert_with(|| self.new_entry(&full_key, family.clone()));

            match entry.value.clone() {
                Some(value) if entry.is_fresh(stale_time) => Plan::Hit(value),
                Some(value) => {
                    let refresh = if entry.fetching || entry.has_fresh_error(error_ttl) {
                        None
                    } else {
                        Some(entry.begin_fetch())
                    };
                    Plan::Stale { value, refresh }
                }
                None if entry.has_fresh_error(error_ttl) => Plan::CachedError(
                    entry
                        .error
                        .clone()
                        .unwrap_or_else(|| Error::Internal("missing cached error".to_string())),
                ),
                None => Plan::Fetch(entry.begin_fetch()),
            }
        };

        match plan {
            Plan::Hit(value) => {
                self.stats.lock().hits += 1;
                self.metrics.record_hit(&full_key);
                if let Some(family) = &family {
                    self.mark_settled(family, &full_key);
                }
                QueryState::success(value)
            }
            Plan::CachedError(error) => {
                self.stats.lock().hits += 1;
                self.metrics.record_hit(&full_key);
                QueryState::failed(error)
            }
            Plan::Stale { value, refresh } => {
                self.stats.lock().stale_hits += 1;
                self.metrics.record_stale_hit(&full_key);
                if let Some(family) = &family {
                    self.mark_settled(family, &full_key);
                }
                if let Some(generation) = refresh {
                    let cache = self.clone();
                    tokio::spawn(async move {
                        let _ = cache
                            .run(full_key, generation, family, CacheOperation::Refresh, fetcher)
                            .await;
                    });
                }
                QueryState::stale(value)
            }
            Plan::Fetch(generation) => {
                self.stats.lock().misses += 1;
                self.metrics.record_miss(&full_key);
                match self
                    .run(full_key, generation, family, CacheOperation::Fetch, fetcher)
                    .await
                {
                    Ok(value) => QueryState::success(value),
                    Err(error) => QueryState::failed(error),
                }
            }
        }
    }

    /// Run (or join) the fetch for one generation of a key
    async fn run<F, Fut>(
        &self,
        key: String,
        generation: u64,
        family: Option<String>,
        operation: CacheOperation,
        fetcher: F,
    ) -> Result<V>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        let token = format!("{}@{}", key, generation);
        let cache = self.clone();

        self.coalescer
            .do_request(&token, move || async move {
                // An orphaned fetch of an older generation still owns the key
                cache.coalescer.wait_for_older(&key, generation).await;
                let start = Instant::now();
                cache.stats.lock().fetches += 1;
                let result = fetcher().await;
                cache.metrics.record_latency(operation, start.elapsed());
                cache.settle(&key, generation, family.as_deref(), &result);
                result
            })
            .await
    }

    /// Apply a fetch result if its generation is still current
    fn settle(&self, key: &str, generation: u64, family: Option<&str>, result: &Result<V>) {
        if let Err(error) = result {
            self.stats.lock().errors += 1;
            self.metrics.record_error(key);
            tracing::warn!(target: "marquee", key = %key, error = %error, "query fetch failed");
        }

        let applied = match self.entries.get_mut(key) {
            None => Err(DiscardReason::Removed),
            Some(mut entry) => {
                let applied = match result {
                    Ok(value) => entry.record_success(generation, value.clone()),
                    Err(error) => entry.record_error(generation, error.clone()),
                };
                if applied {
                    Ok(())
                } else {
                    Err(DiscardReason::Invalidated)
                }
            }
        };

        match applied {
            Ok(()) => {
                if let (Some(family), Ok(_)) = (family, result) {
                    self.mark_settled(family, key);
                }
                self.metrics.record_size(self.entries.len());
            }
            Err(reason) => {
                self.stats.lock().discarded += 1;
                self.metrics.record_discard(key, reason);
                tracing::debug!(
                    target: "marquee",
                    key = %key,
                    generation,
                    reason = reason.as_str(),
                    "discarded outdated fetch result"
                );
            }
        }
    }

    /// Synchronous view of a key without triggering a fetch
    pub fn snapshot<K: CacheKey + ?Sized>(&self, key: &K, options: &QueryOptions) -> QueryState<V> {
        if !options.enabled {
            return QueryState::idle();
        }
        let full_key = self.full_key(&key.cache_key());
        self.state_of(&full_key, key.family().as_deref(), options)
    }

    /// State of the most recently requested key of a query family
    pub fn current(&self, family: &str, options: &QueryOptions) -> QueryState<V> {
        if !options.enabled {
            return QueryState::idle();
        }
        let current = self
            .families
            .get(family)
            .map(|cursor| cursor.current.clone());
        match current {
            Some(key) => self.state_of(&key, Some(family), options),
            None => QueryState::idle(),
        }
    }

    fn state_of(&self, full_key: &str, family: Option<&str>, options: &QueryOptions) -> QueryState<V> {
        let stale_time = self.stale_time(options);

        // Copy out before touching any other entry of the same map
        let (value, status, error, fresh) = match self.entries.get(full_key) {
            Some(entry) => (
                entry.value.clone(),
                entry.status,
                entry.error.clone(),
                entry.is_fresh(stale_time),
            ),
            None => return QueryState::idle(),
        };

        match (value, status) {
            (Some(value), _) if fresh => QueryState::success(value),
            (Some(value), _) => QueryState {
                error,
                ..QueryState::stale(value)
            },
            (None, FetchStatus::Loading) => {
                let placeholder = if options.keep_previous {
                    family.and_then(|family| self.previous_success(family, full_key))
                } else {
                    None
                };
                QueryState::loading(placeholder)
            }
            (None, FetchStatus::Error) => QueryState::failed(
                error.unwrap_or_else(|| Error::Internal("missing cached error".to_string())),
            ),
            (None, _) => QueryState::idle(),
        }
    }

    fn previous_success(&self, family: &str, exclude: &str) -> Option<V> {
        let settled = self.families.get(family)?.last_settled.clone()?;
        if settled == exclude {
            return None;
        }
        self.entries.get(&settled)?.value.clone()
    }

    /// Mark a key stale and orphan its in-flight fetch
    ///
    /// Returns `true` if the key was cached.
    pub fn invalidate<K: CacheKey + ?Sized>(&self, key: &K) -> bool {
        let start = Instant::now();
        let full_key = self.full_key(&key.cache_key());
        let found = match self.entries.get_mut(&full_key) {
            Some(mut entry) => {
                entry.invalidate();
                true
            }
            None => false,
        };
        self.metrics
            .record_latency(CacheOperation::Invalidate, start.elapsed());
        found
    }

    /// Invalidate every key of a query family
    pub fn invalidate_family(&self, family: &str) -> usize {
        let mut count = 0;
        for mut entry in self.entries.iter_mut() {
            if entry.family.as_deref() == Some(family) {
                entry.invalidate();
                count += 1;
            }
        }
        count
    }

    /// Drop a key entirely
    pub fn remove<K: CacheKey + ?Sized>(&self, key: &K) -> bool {
        let full_key = self.full_key(&key.cache_key());
        let removed = self.entries.remove(&full_key).is_some();
        self.metrics.record_size(self.entries.len());
        removed
    }

    /// Drop every entry and family cursor
    pub fn clear(&self) {
        self.entries.clear();
        self.families.clear();
        self.metrics.record_size(0);
    }

    /// Get cache statistics
    pub fn stats(&self) -> QueryStats {
        let mut stats = self.stats.lock().clone();
        stats.size = self.entries.len();
        stats
    }

    /// Fetches currently running
    pub fn in_flight(&self) -> usize {
        self.coalescer.in_flight()
    }

    /// Number of cached keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
