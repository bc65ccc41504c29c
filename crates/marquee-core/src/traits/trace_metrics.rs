use crate::{CacheMetrics, CacheOperation, DiscardReason};
use std::time::Duration;
use tracing::{debug, trace};

/// Metrics adapter that logs events via `tracing`
#[derive(Debug, Clone, Default)]
pub struct TracingMetrics {
    /// Cache name (optional), e.g. "catalog" or "comments"
    cache_name: Option<String>,
}

impl TracingMetrics {
    /// Create new tracing metrics adapter
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with cache name label
    pub fn with_cache_name(mut self, name: impl Into<String>) -> Self {
        self.cache_name = Some(name.into());
        self
    }
}

impl CacheMetrics for TracingMetrics {
    fn record_hit(&self, key: &str) {
        debug!(
            target: "marquee",
            event = "hit",
            key = %key,
            cache = ?self.cache_name,
            "Cache Hit"
        );
    }

    fn record_miss(&self, key: &str) {
        debug!(
            target: "marquee",
            event = "miss",
            key = %key,
            cache = ?self.cache_name,
            "Cache Miss"
        );
    }

    fn record_stale_hit(&self, key: &str) {
        debug!(
            target: "marquee",
            event = "stale_hit",
            key = %key,
            cache = ?self.cache_name,
            "Cache Stale Hit"
        );
    }

    fn record_error(&self, key: &str) {
        debug!(
            target: "marquee",
            event = "fetch_error",
            key = %key,
            cache = ?self.cache_name,
            "Cache Fetch Failed"
        );
    }

    fn record_latency(&self, operation: CacheOperation, duration: Duration) {
        trace!(
            target: "marquee",
            event = "latency",
            operation = operation.as_str(),
            duration_ms = duration.as_millis(),
            cache = ?self.cache_name,
            "Cache Operation Latency"
        );
    }

    fn record_discard(&self, key: &str, reason: DiscardReason) {
        debug!(
            target: "marquee",
            event = "discard",
            key = %key,
            reason = reason.as_str(),
            cache = ?self.cache_name,
            "Cache Result Discarded"
        );
    }

    fn record_size(&self, size: usize) {
        trace!(
            target: "marquee",
            event = "size",
            size = size,
            cache = ?self.cache_name,
            "Cache Size Update"
        );
    }
}
