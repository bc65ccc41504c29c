use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::broadcast;

use marquee_core::{Error, Result};

type Inflight<V> = Arc<DashMap<String, broadcast::Sender<Result<V>>>>;

/// Joins concurrent requests for one token onto a single spawned task
///
/// The work runs detached from the caller, so a request whose caller went
/// away still completes and settles its entry.
pub(crate) struct Coalescer<V> {
    // Token -> broadcast sender carrying the shared result
    inflight: Inflight<V>,
}

impl<V> Clone for Coalescer<V> {
    fn clone(&self) -> Self {
        Self {
            inflight: self.inflight.clone(),
        }
    }
}

impl<V> Default for Coalescer<V> {
    fn default() -> Self {
        Self {
            inflight: Arc::new(DashMap::new()),
        }
    }
}

/// Removes the in-flight slot even if the work panics
struct InflightGuard<V> {
    inflight: Inflight<V>,
    token: String,
}

impl<V> Drop for InflightGuard<V> {
    fn drop(&mut self) {
        self.inflight.remove(&self.token);
    }
}

impl<V: Clone + Send + 'static> Coalescer<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute a request with coalescing for the given token.
    /// If a request for this token is already running, wait for its result.
    /// Otherwise, spawn the request and broadcast its result.
    pub async fn do_request<F, Fut>(&self, token: &str, f: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        // The entry lock is released at the end of this statement
        let action = match self.inflight.entry(token.to_string()) {
            Entry::Occupied(o) => Ok(o.get().subscribe()),
            Entry::Vacant(v) => {
                let (tx, rx) = broadcast::channel(1);
                v.insert(tx.clone());
                Err((tx, rx))
            }
        };

        let mut rx = match action {
            Ok(rx) => rx,
            Err((tx, rx)) => {
                let guard = InflightGuard {
                    inflight: self.inflight.clone(),
                    token: token.to_string(),
                };
                let work = f();
                tokio::spawn(async move {
                    let result = work.await;
                    // Late joiners must become leaders, not wait on a spent channel
                    drop(guard);
                    let _ = tx.send(result);
                });
                rx
            }
        };

        rx.recv()
            .await
            .map_err(|_| Error::Internal("in-flight request failed".to_string()))?
    }

    /// Wait until no older generation of `key` is running
    ///
    /// Tokens are `{key}@{generation}`; only strictly older generations are
    /// awaited, so two generations never wait on each other.
    pub async fn wait_for_older(&self, key: &str, generation: u64) {
        loop {
            let pending: Vec<_> = self
                .inflight
                .iter()
                .filter(|slot| match slot.key().rsplit_once('@') {
                    Some((owner, older)) => {
                        owner == key && older.parse::<u64>().is_ok_and(|older| older < generation)
                    }
                    None => false,
                })
                .map(|slot| slot.value().subscribe())
                .collect();
            if pending.is_empty() {
                return;
            }
            for mut rx in pending {
                let _ = rx.recv().await;
            }
        }
    }

    /// Number of requests currently running
    pub fn in_flight(&self) -> usize {
        self.inflight.len()
    }
}
