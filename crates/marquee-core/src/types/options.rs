//! Query options and builder

use std::time::Duration;

/// Per-call options for a query cache fetch
///
/// `None` durations fall back to the cache's configured defaults.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    /// How long a successful value is served without a network call
    pub stale_time: Option<Duration>,
    /// How long a failed fetch is reported before the next attempt
    pub error_ttl: Option<Duration>,
    /// Show the family's previous value while a new key loads
    pub keep_previous: bool,
    /// Disabled queries stay idle and never fetch
    pub enabled: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            stale_time: None,
            error_ttl: None,
            keep_previous: false,
            enabled: true,
        }
    }
}

/// Builder for QueryOptions with fluent API
#[derive(Debug, Clone, Default)]
pub struct QueryOpts(QueryOptions);

impl QueryOpts {
    /// Create new options builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set staleness window
    pub fn stale_time(mut self, duration: Duration) -> Self {
        self.0.stale_time = Some(duration);
        self
    }

    /// Set staleness window in seconds
    pub fn stale_secs(self, seconds: u64) -> Self {
        self.stale_time(Duration::from_secs(seconds))
    }

    /// Set staleness window in minutes
    pub fn stale_mins(self, minutes: u64) -> Self {
        self.stale_time(Duration::from_secs(minutes * 60))
    }

    /// Set error retention window
    pub fn error_ttl(mut self, duration: Duration) -> Self {
        self.0.error_ttl = Some(duration);
        self
    }

    /// Keep the previous value of the family while loading
    pub fn keep_previous(mut self) -> Self {
        self.0.keep_previous = true;
        self
    }

    /// Enable or disable the query
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.0.enabled = enabled;
        self
    }

    /// Build the options
    pub fn build(self) -> QueryOptions {
        self.0
    }
}

impl From<QueryOpts> for QueryOptions {
    fn from(opts: QueryOpts) -> Self {
        opts.0
    }
}

impl From<Duration> for QueryOptions {
    fn from(stale_time: Duration) -> Self {
        QueryOptions {
            stale_time: Some(stale_time),
            ..Default::default()
        }
    }
}
