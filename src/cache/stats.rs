//! Cache Statistics Module
//!
//! Tracks how often the cache had to go upstream.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

// == Cache Counters ==
/// Counters updated concurrently by request tasks.
#[derive(Debug, Default)]
pub struct CacheCounters {
    upstream_fetches: AtomicU64,
    cache_hits: AtomicU64,
    degraded_reads: AtomicU64,
    cleanups: AtomicU64,
}

impl CacheCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// One upstream record query was issued.
    pub fn record_fetch(&self) {
        self.upstream_fetches.fetch_add(1, Ordering::Relaxed);
    }

    /// A window was served without any upstream query.
    pub fn record_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// A retrieval failed and was answered with an empty result.
    pub fn record_degraded(&self) {
        self.degraded_reads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cleanup(&self) {
        self.cleanups.fetch_add(1, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Combines the counters with the current store figures.
    pub fn snapshot(
        &self,
        identities: usize,
        cached_records: usize,
        last_clean_at: DateTime<Utc>,
    ) -> CacheStats {
        CacheStats {
            identities,
            cached_records,
            upstream_fetches: self.upstream_fetches.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            degraded_reads: self.degraded_reads.load(Ordering::Relaxed),
            cleanups: self.cleanups.load(Ordering::Relaxed),
            last_clean_at,
        }
    }
}

// == Cache Stats ==
/// Point-in-time view of the cache.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub identities: usize,
    pub cached_records: usize,
    pub upstream_fetches: u64,
    pub cache_hits: u64,
    pub degraded_reads: u64,
    pub cleanups: u64,
    pub last_clean_at: DateTime<Utc>,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the share of served windows that needed no upstream call.
    ///
    /// Returns hits / (hits + fetches), or 0.0 if nothing was served yet.
    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.upstream_fetches;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_new() {
        let counters = CacheCounters::new();
        let stats = counters.snapshot(0, 0, Utc::now());
        assert_eq!(stats.upstream_fetches, 0);
        assert_eq!(stats.cache_hits, 0);
        assert_eq!(stats.degraded_reads, 0);
        assert_eq!(stats.cleanups, 0);
    }

    #[test]
    fn test_counters_record() {
        let counters = CacheCounters::new();
        counters.record_fetch();
        counters.record_fetch();
        counters.record_hit();
        counters.record_degraded();
        counters.record_cleanup();

        let stats = counters.snapshot(2, 13, Utc::now());
        assert_eq!(stats.upstream_fetches, 2);
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.degraded_reads, 1);
        assert_eq!(stats.cleanups, 1);
        assert_eq!(stats.identities, 2);
        assert_eq!(stats.cached_records, 13);
    }

    #[test]
    fn test_hit_rate() {
        let counters = CacheCounters::new();
        assert_eq!(counters.snapshot(0, 0, Utc::now()).hit_rate(), 0.0);

        counters.record_fetch();
        counters.record_hit();
        assert_eq!(counters.snapshot(0, 0, Utc::now()).hit_rate(), 0.5);
    }
}
