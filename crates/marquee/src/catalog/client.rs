//! HTTP client for the TMDB-style catalog API

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use marquee_core::{Error, Result};

use super::model::{RawMovieDetail, RawMoviePage};
use super::source::CatalogSource;
use crate::config::CatalogConfig;
use crate::context::Language;
use crate::transport;

/// Catalog client sending the API key and language on every request
#[derive(Clone)]
pub struct TmdbClient {
    http: Client,
    base_url: String,
    api_key: String,
    access_token: Option<String>,
}

impl TmdbClient {
    /// Create a client from config
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let http = transport::build_client(config.request_timeout)?;
        Self::with_client(http, config)
    }

    /// Create a client around an existing reqwest client
    pub fn with_client(http: Client, config: &CatalogConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::Config("catalog API key is empty".to_string()));
        }
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .map_err(|e| Error::Config(format!("invalid catalog URL {base_url}: {e}")))?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
            access_token: config.access_token.clone(),
        })
    }

    /// Build `{base}{path}?api_key&language&params`, skipping empty params
    fn endpoint(&self, path: &str, language: Language, params: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| Error::Config(format!("invalid catalog endpoint {path}: {e}")))?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("api_key", &self.api_key)
                .append_pair("language", language.as_tag());
            for (name, value) in params.iter().filter(|(_, v)| !v.is_empty()) {
                query.append_pair(name, value);
            }
        }
        Ok(url)
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T> {
        // The query carries the API key, so only the path is logged
        tracing::debug!(target: "marquee", path = url.path(), "catalog request");
        let what = format!("catalog {}", url.path());

        let mut request = self.http.get(url);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }
        transport::get_json(request, &what).await
    }
}

#[async_trait]
impl CatalogSource for TmdbClient {
    async fn popular(&self, page: u32, language: Language) -> Result<RawMoviePage> {
        let page = page.to_string();
        let url = self.endpoint("/movie/popular", language, &[("page", &page)])?;
        self.get(url).await
    }

    async fn search(&self, query: &str, page: u32, language: Language) -> Result<RawMoviePage> {
        let page = page.to_string();
        let url = self.endpoint(
            "/search/movie",
            language,
            &[("query", query), ("page", &page)],
        )?;
        self.get(url).await
    }

    async fn detail(&self, id: &str, language: Language) -> Result<RawMovieDetail> {
        let mut url = self.endpoint("/movie", language, &[])?;
        url.path_segments_mut()
            .map_err(|_| Error::Config("catalog URL cannot take a path".to_string()))?
            .push(id);

        self.get(url).await.map_err(|err| match err.status() {
            Some(404) => Error::NotFound(format!("movie {id}")),
            _ => err,
        })
    }
}
