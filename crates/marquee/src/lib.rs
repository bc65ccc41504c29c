//! marquee: data layer of a movie catalog browser
//!
//! # Features
//!
//! - **Query cache** with staleness windows, in-flight deduplication and
//!   generation-checked results
//! - **Catalog adapter** for popular, search and detail queries of a
//!   TMDB-style API, normalized into [`Movie`](catalog::Movie)
//! - **Engagement counters** with a like/dislike state machine
//! - **Comment feed** merging persisted local comments with a cached remote
//!   batch
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use marquee::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let catalog = Catalog::from_config(&CatalogConfig::from_env()?)?;
//!
//!     let state = catalog.popular(1, Language::En).await;
//!     if let Some(page) = state.data() {
//!         for movie in &page.results {
//!             println!("{} ({}) {}%", movie.title, movie.year, movie.match_score);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod browse;
pub mod catalog;
pub mod comments;
pub mod config;
pub mod context;
pub mod engagement;
pub mod query;
mod transport;

// Re-export core
pub use marquee_core::*;

// Re-export storage
pub use marquee_storage::{DEFAULT_PREFIX, TypedStore};

#[cfg(feature = "memory")]
pub use marquee_storage::MemoryStore;

#[cfg(feature = "file")]
pub use marquee_storage::FileStore;

pub use browse::{BrowseState, PageItem, PaginationWindow};
pub use catalog::{Catalog, CatalogKey, CatalogSource, Movie, PaginatedResult, TmdbClient};
pub use comments::{Comment, CommentAggregator, CommentClient, CommentOrigin, CommentSource};
pub use config::{CatalogConfig, CommentConfig};
pub use context::{AppContext, Language, Session};
pub use engagement::{DetailMount, EngagementRecord, EngagementStore, Reaction};
pub use query::{QueryCache, QueryCacheConfig};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        AppContext, BrowseState, CacheKey, Catalog, CatalogConfig, Comment, CommentAggregator,
        CommentConfig, EngagementStore, Error, FetchStatus, Language, Movie, PaginatedResult,
        PaginationWindow, QueryCache, QueryOptions, QueryOpts, QueryState, Reaction, Result,
        TypedStore,
    };

    #[cfg(feature = "memory")]
    pub use crate::MemoryStore;

    #[cfg(feature = "file")]
    pub use crate::FileStore;
}

#[cfg(test)]
mod tests;
