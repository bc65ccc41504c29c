//! Runtime configuration for the remote services

use std::time::Duration;

use marquee_core::{Error, Result};

use crate::catalog::{DEFAULT_BACKDROP_BASE_URL, DEFAULT_IMAGE_BASE_URL};

pub const DEFAULT_CATALOG_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_COMMENTS_URL: &str = "https://dummyjson.com/comments";

/// Remote catalog settings
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub api_key: String,
    /// Optional bearer token sent alongside the API key
    pub access_token: Option<String>,
    pub base_url: String,
    pub image_base_url: String,
    pub backdrop_base_url: String,
    pub request_timeout: Duration,
    /// Staleness window for catalog queries
    pub stale_time: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            access_token: None,
            base_url: DEFAULT_CATALOG_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            backdrop_base_url: DEFAULT_BACKDROP_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            stale_time: Duration::from_secs(300),
        }
    }
}

impl CatalogConfig {
    /// Config for an API key with every other setting at its default
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Point at another catalog host (tests, proxies)
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let api_key = lookup("MARQUEE_TMDB_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::Config("MARQUEE_TMDB_API_KEY is not set".to_string()))?;

        Ok(Self {
            api_key,
            access_token: lookup("MARQUEE_TMDB_ACCESS_TOKEN").filter(|t| !t.trim().is_empty()),
            base_url: lookup("MARQUEE_TMDB_BASE_URL").unwrap_or(defaults.base_url),
            image_base_url: lookup("MARQUEE_TMDB_IMAGE_URL").unwrap_or(defaults.image_base_url),
            backdrop_base_url: defaults.backdrop_base_url,
            request_timeout: lookup("MARQUEE_REQUEST_TIMEOUT")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            stale_time: defaults.stale_time,
        })
    }
}

/// Remote comment feed settings
#[derive(Debug, Clone)]
pub struct CommentConfig {
    pub base_url: String,
    /// Comments fetched per movie
    pub batch_limit: u32,
    /// Staleness window of the remote batch cache
    pub stale_time: Duration,
    pub request_timeout: Duration,
}

impl Default for CommentConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_COMMENTS_URL.to_string(),
            batch_limit: 5,
            stale_time: Duration::from_secs(3600),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl CommentConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            base_url: lookup("MARQUEE_COMMENTS_URL").unwrap_or(defaults.base_url),
            request_timeout: lookup("MARQUEE_REQUEST_TIMEOUT")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            ..defaults
        }
    }
}
