//! HTTP client for the remote comment service

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use url::Url;

use marquee_core::{Error, Result};

use super::model::CommentBatch;
use crate::config::CommentConfig;
use crate::transport;

/// Source of generic comment batches
#[async_trait]
pub trait CommentSource: Send + Sync + 'static {
    async fn batch(&self, skip: u32, limit: u32) -> Result<CommentBatch>;
}

#[async_trait]
impl<S: CommentSource + ?Sized> CommentSource for Arc<S> {
    async fn batch(&self, skip: u32, limit: u32) -> Result<CommentBatch> {
        (**self).batch(skip, limit).await
    }
}

/// `GET {base}?limit&skip` client
#[derive(Clone)]
pub struct CommentClient {
    http: Client,
    base_url: Url,
}

impl CommentClient {
    pub fn new(config: &CommentConfig) -> Result<Self> {
        let http = transport::build_client(config.request_timeout)?;
        Self::with_client(http, config)
    }

    pub fn with_client(http: Client, config: &CommentConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| Error::Config(format!("invalid comments URL {}: {e}", config.base_url)))?;
        Ok(Self { http, base_url })
    }
}

#[async_trait]
impl CommentSource for CommentClient {
    async fn batch(&self, skip: u32, limit: u32) -> Result<CommentBatch> {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("skip", &skip.to_string());

        tracing::debug!(target: "marquee", skip, limit, "comment batch request");
        transport::get_json(self.http.get(url), "comments").await
    }
}
