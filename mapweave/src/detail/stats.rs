//! Detail cache statistics.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters updated by the detail cache.
#[derive(Debug, Default)]
pub struct CacheStats {
    /// Requests answered from a live cache entry.
    pub hits: AtomicU64,
    /// Requests that found no live entry.
    pub misses: AtomicU64,
    /// Misses that joined an in-flight fetch.
    pub coalesced: AtomicU64,
    /// Fetches issued to the fetcher.
    pub fetches: AtomicU64,
    /// Fetches that failed.
    pub failures: AtomicU64,
    /// Entries evicted for being past their TTL.
    pub expirations: AtomicU64,
}

impl CacheStats {
    pub(crate) fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of current statistics.
    pub fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
            fetches: self.fetches.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of detail cache statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub coalesced: u64,
    pub fetches: u64,
    pub failures: u64,
    pub expirations: u64,
}

impl CacheStatsSnapshot {
    /// Fraction of requests served from cache (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Fraction of misses that joined an existing fetch (0.0 to 1.0).
    pub fn coalescing_ratio(&self) -> f64 {
        if self.misses == 0 {
            0.0
        } else {
            self.coalesced as f64 / self.misses as f64
        }
    }
}
