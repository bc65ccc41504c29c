//! Comment feed per movie
//!
//! Local comments are persisted under `comments` as a map of movie id to
//! newest-first lists. Remote comments come from a generic service that
//! knows nothing about movies; each movie is mapped onto a fixed window of
//! it and that window is cached for an hour.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use rand::Rng;
use std::collections::BTreeMap;
use std::sync::Arc;

use marquee_core::{
    CacheMetrics, DurableStore, Error, NoopMetrics, QueryOpts, Result,
};
use marquee_storage::TypedStore;

mod client;
mod model;

pub use client::{CommentClient, CommentSource};
pub use model::{Comment, CommentBatch, CommentOrigin, RemoteComment, RemoteFeed, RemoteUser};

use crate::config::CommentConfig;
use crate::context::AppContext;
use crate::query::{Loader, QueryCache, QueryCacheConfig, ReadThroughCache};

pub(crate) const COMMENTS_KEY: &str = "comments";

/// Size of the remote window space the movie ids are spread over
const SKIP_WINDOW: u32 = 300;
const SKIP_STRIDE: u32 = 5;

type LocalComments = BTreeMap<String, Vec<Comment>>;

/// Cache key of one remote window: ("comments", skip, limit)
pub type FeedKey = (&'static str, u32, u32);

/// Remote offset for a movie: `(id * 5) mod 300`
///
/// The id is read like a lenient integer parse: leading digits only, and
/// anything without them counts as 0. Works on arbitrarily long ids.
pub fn skip_for_movie(movie_id: &str) -> u32 {
    let modulus = SKIP_WINDOW / SKIP_STRIDE;
    let residue = movie_id
        .trim_start()
        .trim_start_matches('+')
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u32, |acc, digit| (acc * 10 + u32::from(digit - b'0')) % modulus);
    residue * SKIP_STRIDE
}

/// Loads one remote window and stamps it with the fetch time
pub struct FeedLoader<R> {
    source: R,
}

#[async_trait]
impl<R: CommentSource> Loader<FeedKey, RemoteFeed> for FeedLoader<R> {
    async fn load(&self, key: &FeedKey) -> Result<RemoteFeed> {
        let (_, skip, limit) = *key;
        let batch = self.source.batch(skip, limit).await?;
        Ok(RemoteFeed {
            comments: batch.comments,
            fetched_at: Utc::now(),
        })
    }
}

/// Merges local and remote comments and accepts new local ones
pub struct CommentAggregator<S, R, M = NoopMetrics>
where
    S: DurableStore,
    R: CommentSource,
    M: CacheMetrics,
{
    store: TypedStore<S>,
    context: Arc<AppContext<S>>,
    remote: ReadThroughCache<FeedKey, RemoteFeed, FeedLoader<R>, M>,
    batch_limit: u32,
}

impl<S: DurableStore> CommentAggregator<S, CommentClient, NoopMetrics> {
    /// Aggregator backed by the HTTP client
    pub fn from_config(context: Arc<AppContext<S>>, config: &CommentConfig) -> Result<Self> {
        Ok(Self::new(context, CommentClient::new(config)?, config))
    }
}

impl<S: DurableStore, R: CommentSource> CommentAggregator<S, R, NoopMetrics> {
    pub fn new(context: Arc<AppContext<S>>, source: R, config: &CommentConfig) -> Self {
        Self::with_metrics(context, source, config, NoopMetrics)
    }
}

impl<S, R, M> CommentAggregator<S, R, M>
where
    S: DurableStore,
    R: CommentSource,
    M: CacheMetrics,
{
    /// Create an aggregator whose remote cache reports to `metrics`
    pub fn with_metrics(context: Arc<AppContext<S>>, source: R, config: &CommentConfig, metrics: M) -> Self {
        let cache = QueryCache::with_metrics(
            QueryCacheConfig::with_stale_time(config.stale_time),
            metrics,
        );
        let options = QueryOpts::new().stale_time(config.stale_time).build();

        Self {
            store: context.store().clone(),
            context,
            remote: ReadThroughCache::new(cache, FeedLoader { source }, options),
            batch_limit: config.batch_limit,
        }
    }

    /// Persisted comments of a movie, newest first
    pub fn local(&self, movie_id: &str) -> Result<Vec<Comment>> {
        let mut comments = self
            .store
            .load::<LocalComments>(COMMENTS_KEY)?
            .and_then(|mut all| all.remove(movie_id))
            .unwrap_or_default();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments)
    }

    /// Remote comments for a movie, empty when the service is unavailable
    pub async fn remote(&self, movie_id: &str) -> Vec<Comment> {
        let key: FeedKey = (COMMENTS_KEY, skip_for_movie(movie_id), self.batch_limit);

        match self.remote.get(key).await.into_result() {
            Ok(Some(feed)) => feed
                .comments
                .into_iter()
                .enumerate()
                .map(|(index, remote)| Comment {
                    id: format!("api-{}", remote.id),
                    username: remote.user.username,
                    text: remote.body,
                    created_at: feed.fetched_at - ChronoDuration::days(index as i64 + 1),
                    origin: CommentOrigin::Remote,
                })
                .collect(),
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!(target: "marquee", movie_id, error = %err, "remote comments unavailable");
                Vec::new()
            }
        }
    }

    /// Local comments newest first, then remote comments in remote order
    pub async fn feed(&self, movie_id: &str) -> Result<Vec<Comment>> {
        let mut feed = self.local(movie_id)?;
        feed.extend(self.remote(movie_id).await);
        Ok(feed)
    }

    /// Add a comment by the signed-in user
    ///
    /// Nothing is written when the body is blank or nobody is signed in.
    pub fn post(&self, movie_id: &str, body: &str) -> Result<Comment> {
        let movie_id = movie_id.trim();
        let text = body.trim();
        if movie_id.is_empty() {
            return Err(Error::Validation("movie id is required".to_string()));
        }
        if text.is_empty() {
            return Err(Error::Validation("comment is empty".to_string()));
        }
        let session = self
            .context
            .session()
            .ok_or_else(|| Error::Validation("sign in to comment".to_string()))?;

        let now = Utc::now();
        let comment = Comment {
            id: format!(
                "local-{}-{:06x}",
                now.timestamp_millis(),
                rand::rng().random_range(0..0x100_0000u32)
            ),
            username: session.username,
            text: text.to_string(),
            created_at: now,
            origin: CommentOrigin::Local,
        };

        self.store.update(COMMENTS_KEY, LocalComments::new, |all| {
            all.entry(movie_id.to_string())
                .or_default()
                .insert(0, comment.clone());
        })?;
        tracing::info!(target: "marquee", movie_id, comment = %comment.id, "comment posted");
        Ok(comment)
    }

    /// Cache of remote windows
    pub fn remote_cache(&self) -> &QueryCache<RemoteFeed, M> {
        self.remote.cache()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_storage::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeComments {
        calls: AtomicUsize,
        fail: bool,
    }

    impl FakeComments {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl CommentSource for FakeComments {
        async fn batch(&self, skip: u32, limit: u32) -> Result<CommentBatch> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Error::transport("connection refused"));
            }
            let comments = (0..limit.min(3))
                .map(|i| RemoteComment {
                    id: (skip + i + 1) as u64,
                    body: format!("remote {}", skip + i),
                    user: RemoteUser {
                        username: format!("user{i}"),
                        ..Default::default()
                    },
                    ..Default::default()
                })
                .collect();
            Ok(CommentBatch {
                comments,
                total: 340,
                skip,
                limit,
            })
        }
    }

    fn setup(
        source: FakeComments,
    ) -> (MemoryStore, Arc<AppContext<MemoryStore>>, CommentAggregator<MemoryStore, FakeComments>) {
        let raw = MemoryStore::new();
        let context = Arc::new(AppContext::hydrate(TypedStore::new(raw.clone())));
        let aggregator = CommentAggregator::new(context.clone(), source, &CommentConfig::default());
        (raw, context, aggregator)
    }

    #[test]
    fn test_skip_for_movie() {
        assert_eq!(skip_for_movie("0"), 0);
        assert_eq!(skip_for_movie("1"), 5);
        assert_eq!(skip_for_movie("60"), 0);
        assert_eq!(skip_for_movie("550"), 250);
        assert_eq!(skip_for_movie("27205"), (27205 * 5) % 300);
        assert_eq!(skip_for_movie("12abc"), 60);
        assert_eq!(skip_for_movie("abc"), 0);
        assert_eq!(skip_for_movie(""), 0);
        assert_eq!(skip_for_movie("99999999999999999999999"), 195);
    }

    #[tokio::test]
    async fn test_feed_orders_local_before_remote() {
        let (_, context, aggregator) = setup(FakeComments::new());
        context.login("ripley", "ripley@nostromo.space").unwrap();

        let first = aggregator.post("348", "Still holds up").unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = aggregator.post("348", "  The chestburster scene!  ").unwrap();

        let feed = aggregator.feed("348").await.unwrap();
        assert_eq!(feed.len(), 5);
        assert_eq!(feed[0].id, second.id);
        assert_eq!(feed[0].text, "The chestburster scene!");
        assert_eq!(feed[1].id, first.id);
        assert!(feed[2..].iter().all(|c| c.origin == CommentOrigin::Remote));
        assert!(feed[2].id.starts_with("api-"));
        assert!(feed[2].created_at > feed[3].created_at);
    }

    #[tokio::test]
    async fn test_remote_dates_stable_and_cached() {
        let (_, _, aggregator) = setup(FakeComments::new());

        let first = aggregator.feed("7").await.unwrap();
        let second = aggregator.feed("7").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(aggregator.remote.loader().source.calls.load(Ordering::SeqCst), 1);

        let fetched_at = aggregator
            .remote_cache()
            .snapshot(&(COMMENTS_KEY, 35u32, 5u32), &Default::default())
            .value()
            .unwrap()
            .fetched_at;
        assert_eq!(first[0].created_at, fetched_at - ChronoDuration::days(1));
        assert_eq!(first[2].created_at, fetched_at - ChronoDuration::days(3));
    }

    #[tokio::test]
    async fn test_remote_failure_degrades_to_local() {
        let (_, context, aggregator) = setup(FakeComments::failing());
        context.login("dallas", "dallas@nostromo.space").unwrap();
        aggregator.post("1", "Only me").unwrap();

        let feed = aggregator.feed("1").await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].origin, CommentOrigin::Local);
    }

    #[tokio::test]
    async fn test_blank_comment_rejected_without_write() {
        let (raw, context, aggregator) = setup(FakeComments::new());
        context.login("kane", "kane@nostromo.space").unwrap();
        let before = raw.get("marquee_comments").unwrap();

        let err = aggregator.post("348", "   \n").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(raw.get("marquee_comments").unwrap(), before);
    }

    #[test]
    fn test_post_requires_session() {
        let (raw, _, aggregator) = setup(FakeComments::new());
        assert!(aggregator.post("348", "hello").unwrap_err().is_validation());
        assert!(raw.get("marquee_comments").unwrap().is_none());
    }

    #[test]
    fn test_comments_persist_per_movie() {
        let (raw, context, aggregator) = setup(FakeComments::new());
        context.login("ash", "ash@weyland.corp").unwrap();
        aggregator.post("1", "one").unwrap();
        aggregator.post("2", "two").unwrap();

        let stored: LocalComments =
            serde_json::from_str(&raw.get("marquee_comments").unwrap().unwrap()).unwrap();
        assert_eq!(stored["1"][0].text, "one");
        assert_eq!(stored["2"][0].username, "ash");
        assert!(stored["1"][0].id.starts_with("local-"));
        assert_eq!(aggregator.local("3").unwrap(), Vec::new());
    }

    #[test]
    fn test_corrupt_comment_store_is_reset() {
        let (raw, context, aggregator) = setup(FakeComments::new());
        raw.set("marquee_comments", "[oops").unwrap();

        assert!(aggregator.local("1").unwrap().is_empty());
        context.login("parker", "parker@nostromo.space").unwrap();
        aggregator.post("1", "fixed").unwrap();
        assert_eq!(aggregator.local("1").unwrap().len(), 1);
    }
}
