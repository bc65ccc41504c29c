//! Core traits for cache and storage operations

mod key;
mod metrics;
mod serializer;
mod store;
mod trace_metrics;

pub use key::{CacheKey, CompositeKey, canonical};
pub use self::metrics::{CacheMetrics, CacheOperation, DiscardReason, NoopMetrics};
pub use serializer::{JsonSerializer, Serializer};
pub use store::DurableStore;
pub use trace_metrics::TracingMetrics;

#[cfg(feature = "metrics")]
pub use self::metrics::MetricsCrateAdapter;
