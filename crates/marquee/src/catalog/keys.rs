//! Cache keys of catalog queries

use marquee_core::{CacheKey, canonical};

use crate::context::Language;

pub const POPULAR_FAMILY: &str = "movies:popular";
pub const SEARCH_FAMILY: &str = "movies:search";
pub const DETAIL_FAMILY: &str = "movie:detail";

/// Parameters of one catalog query
///
/// Keys serialize as JSON arrays, e.g. `["movies","popular",2,"en"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CatalogKey {
    Popular {
        page: u32,
        language: Language,
    },
    Search {
        query: String,
        page: u32,
        language: Language,
    },
    Detail {
        id: String,
        language: Language,
    },
}

impl CacheKey for CatalogKey {
    fn cache_key(&self) -> String {
        match self {
            CatalogKey::Popular { page, language } => canonical(&("movies", "popular", page, language)),
            CatalogKey::Search {
                query,
                page,
                language,
            } => canonical(&("movies", "search", query, page, language)),
            CatalogKey::Detail { id, language } => canonical(&("movie", "detail", id, language)),
        }
    }

    fn family(&self) -> Option<String> {
        let family = match self {
            CatalogKey::Popular { .. } => POPULAR_FAMILY,
            CatalogKey::Search { .. } => SEARCH_FAMILY,
            CatalogKey::Detail { .. } => DETAIL_FAMILY,
        };
        Some(family.to_string())
    }
}
