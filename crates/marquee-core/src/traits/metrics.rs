//! Metrics trait for cache observability

use std::time::Duration;

/// Cache operation for latency tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheOperation {
    /// Foreground fetch on a miss
    Fetch,
    /// Background refresh of a stale value
    Refresh,
    Invalidate,
}

impl CacheOperation {
    /// Get operation as string label
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheOperation::Fetch => "fetch",
            CacheOperation::Refresh => "refresh",
            CacheOperation::Invalidate => "invalidate",
        }
    }
}

/// Why a fetch result was not applied to its entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscardReason {
    /// The entry was invalidated while the fetch ran
    Invalidated,
    /// The entry was removed while the fetch ran
    Removed,
}

impl DiscardReason {
    /// Get reason as string label
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscardReason::Invalidated => "invalidated",
            DiscardReason::Removed => "removed",
        }
    }
}

/// Trait for cache metrics/observability
///
/// Implement this to integrate with your metrics system (Prometheus, StatsD, etc.)
pub trait CacheMetrics: Send + Sync + 'static {
    /// Record a fresh cache hit
    fn record_hit(&self, key: &str);

    /// Record a cache miss
    fn record_miss(&self, key: &str);

    /// Record a stale hit (served stale while revalidating)
    fn record_stale_hit(&self, key: &str);

    /// Record a failed fetch
    fn record_error(&self, key: &str);

    /// Record operation latency
    fn record_latency(&self, operation: CacheOperation, duration: Duration);

    /// Record a discarded fetch result
    fn record_discard(&self, key: &str, reason: DiscardReason);

    /// Record cache size
    fn record_size(&self, size: usize);
}

/// No-op metrics implementation (default)
///
/// Zero overhead when metrics are not needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl CacheMetrics for NoopMetrics {
    #[inline]
    fn record_hit(&self, _key: &str) {}

    #[inline]
    fn record_miss(&self, _key: &str) {}

    #[inline]
    fn record_stale_hit(&self, _key: &str) {}

    #[inline]
    fn record_error(&self, _key: &str) {}

    #[inline]
    fn record_latency(&self, _operation: CacheOperation, _duration: Duration) {}

    #[inline]
    fn record_discard(&self, _key: &str, _reason: DiscardReason) {}

    #[inline]
    fn record_size(&self, _size: usize) {}
}

/// Metrics adapter using the `metrics` crate
///
/// Integrates with Prometheus, StatsD, and other exporters via the `metrics` ecosystem.
///
/// # Example
/// ```ignore
/// use marquee_core::MetricsCrateAdapter;
///
/// let metrics = MetricsCrateAdapter::new("marquee");
/// // Emits: marquee_hits_total, marquee_misses_total, etc.
/// ```
#[cfg(feature = "metrics")]
#[derive(Debug, Clone)]
pub struct MetricsCrateAdapter {
    prefix: String,
}

#[cfg(feature = "metrics")]
impl MetricsCrateAdapter {
    /// Create a new adapter with the given metric name prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn metric_name(&self, name: &str) -> String {
        format!("{}_{}", self.prefix, name)
    }
}

#[cfg(feature = "metrics")]
impl CacheMetrics for MetricsCrateAdapter {
    fn record_hit(&self, _key: &str) {
        metrics::counter!(self.metric_name("hits_total")).increment(1);
    }

    fn record_miss(&self, _key: &str) {
        metrics::counter!(self.metric_name("misses_total")).increment(1);
    }

    fn record_stale_hit(&self, _key: &str) {
        metrics::counter!(self.metric_name("stale_hits_total")).increment(1);
    }

    fn record_error(&self, _key: &str) {
        metrics::counter!(self.metric_name("fetch_errors_total")).increment(1);
    }

    fn record_latency(&self, operation: CacheOperation, duration: Duration) {
        metrics::histogram!(
            self.metric_name("operation_duration_seconds"),
            "operation" => operation.as_str()
        )
        .record(duration.as_secs_f64());
    }

    fn record_discard(&self, _key: &str, reason: DiscardReason) {
        metrics::counter!(
            self.metric_name("discarded_total"),
            "reason" => reason.as_str()
        )
        .increment(1);
    }

    fn record_size(&self, size: usize) {
        metrics::gauge!(self.metric_name("entries")).set(size as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_as_str() {
        assert_eq!(CacheOperation::Fetch.as_str(), "fetch");
        assert_eq!(CacheOperation::Refresh.as_str(), "refresh");
    }

    #[test]
    fn test_discard_reason_as_str() {
        assert_eq!(DiscardReason::Invalidated.as_str(), "invalidated");
        assert_eq!(DiscardReason::Removed.as_str(), "removed");
    }

    #[test]
    fn test_noop_metrics() {
        let metrics = NoopMetrics;
        // Just verify these don't panic
        metrics.record_hit("key");
        metrics.record_miss("key");
        metrics.record_latency(CacheOperation::Fetch, Duration::from_millis(1));
        metrics.record_discard("key", DiscardReason::Removed);
    }
}
