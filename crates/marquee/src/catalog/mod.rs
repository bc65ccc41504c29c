//! Catalog data adapter
//!
//! Turns (page, query, language) requests into cached, normalized results.
//! List queries keep the previous page visible while the next one loads.

use std::sync::Arc;

use marquee_core::{
    CacheMetrics, NoopMetrics, QueryOptions, QueryOpts, QueryState, QueryStats, Result,
};

mod client;
mod keys;
mod model;
mod normalize;
mod source;

pub use client::TmdbClient;
pub use keys::{CatalogKey, DETAIL_FAMILY, POPULAR_FAMILY, SEARCH_FAMILY};
pub use model::{
    CastMember, Category, Movie, PaginatedResult, RawGenre, RawMovie, RawMovieDetail, RawMoviePage,
};
pub use normalize::{
    BACKDROP_PLACEHOLDER, DEFAULT_BACKDROP_BASE_URL, DEFAULT_IMAGE_BASE_URL, MAX_TOTAL_PAGES,
    Normalizer, POSTER_PLACEHOLDER, clamp_total_pages, match_score, release_year,
};
pub use source::CatalogSource;

use crate::config::CatalogConfig;
use crate::context::Language;
use crate::query::{QueryCache, QueryCacheConfig};

/// Cached access to popular, search and detail queries
pub struct Catalog<C, M = NoopMetrics>
where
    C: CatalogSource,
    M: CacheMetrics,
{
    source: Arc<C>,
    normalizer: Normalizer,
    lists: QueryCache<PaginatedResult, M>,
    details: QueryCache<Movie, M>,
    list_options: QueryOptions,
    detail_options: QueryOptions,
}

impl Catalog<TmdbClient, NoopMetrics> {
    /// Catalog backed by the HTTP client
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        Ok(Self::new(TmdbClient::new(config)?, config))
    }
}

impl<C: CatalogSource> Catalog<C, NoopMetrics> {
    pub fn new(source: C, config: &CatalogConfig) -> Self {
        Self::with_metrics(source, config, NoopMetrics)
    }
}

impl<C, M> Catalog<C, M>
where
    C: CatalogSource,
    M: CacheMetrics + Clone,
{
    /// Create a catalog reporting cache events to `metrics`
    pub fn with_metrics(source: C, config: &CatalogConfig, metrics: M) -> Self {
        let cache_config = QueryCacheConfig::with_stale_time(config.stale_time);
        Self {
            source: Arc::new(source),
            normalizer: Normalizer::new(&config.image_base_url, &config.backdrop_base_url),
            lists: QueryCache::with_metrics(cache_config.clone(), metrics.clone()),
            details: QueryCache::with_metrics(cache_config, metrics),
            list_options: QueryOpts::new()
                .stale_time(config.stale_time)
                .keep_previous()
                .build(),
            detail_options: QueryOpts::new().stale_time(config.stale_time).build(),
        }
    }
}

impl<C, M> Catalog<C, M>
where
    C: CatalogSource,
    M: CacheMetrics,
{
    /// Popular movies, one page
    pub async fn popular(&self, page: u32, language: Language) -> QueryState<PaginatedResult> {
        let page = page.max(1);
        let key = CatalogKey::Popular { page, language };
        let source = self.source.clone();
        let normalizer = self.normalizer.clone();

        self.lists
            .fetch(
                &key,
                move || async move {
                    let raw = source.popular(page, language).await?;
                    Ok(normalizer.page(&raw))
                },
                &self.list_options,
            )
            .await
    }

    /// Title search; a blank query stays idle and never reaches the remote
    pub async fn search(&self, query: &str, page: u32, language: Language) -> QueryState<PaginatedResult> {
        let key = CatalogKey::Search {
            query: query.to_string(),
            page: page.max(1),
            language,
        };
        let options = self.search_options(query);
        let source = self.source.clone();
        let normalizer = self.normalizer.clone();
        let query = query.to_string();
        let page = page.max(1);

        self.lists
            .fetch(
                &key,
                move || async move {
                    let raw = source.search(&query, page, language).await?;
                    Ok(normalizer.page(&raw))
                },
                &options,
            )
            .await
    }

    /// One movie; an empty id stays idle, a missing movie is `NotFound`
    pub async fn detail(&self, id: &str, language: Language) -> QueryState<Movie> {
        let key = CatalogKey::Detail {
            id: id.to_string(),
            language,
        };
        let options = self.detail_options_for(id);
        let source = self.source.clone();
        let normalizer = self.normalizer.clone();
        let id = id.to_string();

        self.details
            .fetch(
                &key,
                move || async move {
                    let raw = source.detail(&id, language).await?;
                    Ok(normalizer.detail(&raw))
                },
                &options,
            )
            .await
    }

    fn search_options(&self, query: &str) -> QueryOptions {
        QueryOptions {
            enabled: !query.trim().is_empty(),
            ..self.list_options.clone()
        }
    }

    fn detail_options_for(&self, id: &str) -> QueryOptions {
        QueryOptions {
            enabled: !id.trim().is_empty(),
            ..self.detail_options.clone()
        }
    }

    /// Synchronous view of a list query
    pub fn list_snapshot(&self, key: &CatalogKey) -> QueryState<PaginatedResult> {
        match key {
            CatalogKey::Search { query, .. } => self.lists.snapshot(key, &self.search_options(query)),
            _ => self.lists.snapshot(key, &self.list_options),
        }
    }

    /// Synchronous view of a detail query
    pub fn detail_snapshot(&self, id: &str, language: Language) -> QueryState<Movie> {
        let key = CatalogKey::Detail {
            id: id.to_string(),
            language,
        };
        self.details.snapshot(&key, &self.detail_options_for(id))
    }

    /// Latest requested popular page, with the previous page as placeholder
    pub fn current_popular(&self) -> QueryState<PaginatedResult> {
        self.lists.current(POPULAR_FAMILY, &self.list_options)
    }

    /// Latest requested search page, with the previous page as placeholder
    pub fn current_search(&self) -> QueryState<PaginatedResult> {
        self.lists.current(SEARCH_FAMILY, &self.list_options)
    }

    /// Mark one query stale
    pub fn invalidate(&self, key: &CatalogKey) -> bool {
        match key {
            CatalogKey::Detail { .. } => self.details.invalidate(key),
            _ => self.lists.invalidate(key),
        }
    }

    /// Drop every cached catalog result
    pub fn clear(&self) {
        self.lists.clear();
        self.details.clear();
    }

    /// Statistics of the list and detail caches
    pub fn stats(&self) -> (QueryStats, QueryStats) {
        (self.lists.stats(), self.details.stats())
    }

    pub fn source(&self) -> &C {
        &self.source
    }
}
