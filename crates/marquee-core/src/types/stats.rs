//! Query cache statistics

/// Statistics for query cache operations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryStats {
    /// Served fresh from cache
    pub hits: u64,
    /// Required a fetch
    pub misses: u64,
    /// Served stale while a background refresh ran
    pub stale_hits: u64,
    /// Fetches that reached the remote source
    pub fetches: u64,
    /// Fetches that failed
    pub errors: u64,
    /// Results dropped because their generation was outdated
    pub discarded: u64,
    /// Current number of entries
    pub size: usize,
}

impl QueryStats {
    /// Calculate hit ratio (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            0.0
        } else {
            (self.hits + self.stale_hits) as f64 / total as f64
        }
    }

    /// Total requests (hits + stale hits + misses)
    pub fn total_requests(&self) -> u64 {
        self.hits + self.stale_hits + self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stats() {
        let stats = QueryStats::default();
        assert_eq!(stats.total_requests(), 0);
        assert_eq!(stats.hit_ratio(), 0.0);
    }

    #[test]
    fn test_hit_ratio_counts_stale_hits() {
        let stats = QueryStats {
            hits: 6,
            stale_hits: 2,
            misses: 2,
            ..Default::default()
        };
        assert_eq!(stats.total_requests(), 10);
        assert!((stats.hit_ratio() - 0.8).abs() < f64::EPSILON);
    }
}
