use async_trait::async_trait;
use std::sync::Arc;

use marquee_core::Result;

use super::model::{RawMovieDetail, RawMoviePage};
use crate::context::Language;

/// Remote catalog operations
///
/// `detail` reports a missing movie as [`marquee_core::Error::NotFound`].
#[async_trait]
pub trait CatalogSource: Send + Sync + 'static {
    async fn popular(&self, page: u32, language: Language) -> Result<RawMoviePage>;

    async fn search(&self, query: &str, page: u32, language: Language) -> Result<RawMoviePage>;

    async fn detail(&self, id: &str, language: Language) -> Result<RawMovieDetail>;
}

#[async_trait]
impl<S: CatalogSource + ?Sized> CatalogSource for Arc<S> {
    async fn popular(&self, page: u32, language: Language) -> Result<RawMoviePage> {
        (**self).popular(page, language).await
    }

    async fn search(&self, query: &str, page: u32, language: Language) -> Result<RawMoviePage> {
        (**self).search(query, page, language).await
    }

    async fn detail(&self, id: &str, language: Language) -> Result<RawMovieDetail> {
        (**self).detail(id, language).await
    }
}
