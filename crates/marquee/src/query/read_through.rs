use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::Arc;

use marquee_core::{CacheKey, CacheMetrics, QueryOptions, QueryState, Result};

use super::QueryCache;

/// Trait for automatic data loading on cache miss
#[async_trait]
pub trait Loader<K, V>: Send + Sync + 'static {
    /// Load data for the given key
    async fn load(&self, key: &K) -> Result<V>;
}

/// A cache wrapper that loads data on miss with fixed options
pub struct ReadThroughCache<K, V, L, M>
where
    M: CacheMetrics,
{
    cache: QueryCache<V, M>,
    loader: Arc<L>,
    options: QueryOptions,
    _phantom: PhantomData<fn(K)>,
}

impl<K, V, L, M> ReadThroughCache<K, V, L, M>
where
    K: CacheKey + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    L: Loader<K, V>,
    M: CacheMetrics,
{
    /// Create a new ReadThroughCache
    pub fn new(cache: QueryCache<V, M>, loader: L, options: QueryOptions) -> Self {
        Self {
            cache,
            loader: Arc::new(loader),
            options,
            _phantom: PhantomData,
        }
    }

    /// Get the value, loading it if missing or stale
    pub async fn get(&self, key: K) -> QueryState<V> {
        let loader = self.loader.clone();
        let load_key = key.clone();
        self.cache
            .fetch(
                &key,
                move || async move { loader.load(&load_key).await },
                &self.options,
            )
            .await
    }

    /// Current state without loading
    pub fn peek(&self, key: &K) -> QueryState<V> {
        self.cache.snapshot(key, &self.options)
    }

    /// Mark a key stale so the next `get` reloads it
    pub fn invalidate(&self, key: &K) -> bool {
        self.cache.invalidate(key)
    }

    /// The wrapped cache
    pub fn cache(&self) -> &QueryCache<V, M> {
        &self.cache
    }

    /// The loader
    pub fn loader(&self) -> &L {
        &self.loader
    }
}

// Extension trait for QueryCache convenience
pub trait QueryCacheReadThroughExt<V, M: CacheMetrics> {
    fn read_through<K, L>(self, loader: L, options: QueryOptions) -> ReadThroughCache<K, V, L, M>
    where
        K: CacheKey + Clone + Send + Sync + 'static,
        L: Loader<K, V>;
}

impl<V, M> QueryCacheReadThroughExt<V, M> for QueryCache<V, M>
where
    V: Clone + Send + Sync + 'static,
    M: CacheMetrics,
{
    fn read_through<K, L>(self, loader: L, options: QueryOptions) -> ReadThroughCache<K, V, L, M>
    where
        K: CacheKey + Clone + Send + Sync + 'static,
        L: Loader<K, V>,
    {
        ReadThroughCache::new(self, loader, options)
    }
}
