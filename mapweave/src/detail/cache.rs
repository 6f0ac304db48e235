//! TTL cache with per-key request coalescing.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::fetcher::DetailFetcher;
use super::stats::{CacheStats, CacheStatsSnapshot};
use super::types::{CacheTtls, DataClass, DetailError, DetailPayload};

type SharedResult = Result<Arc<DetailPayload>, DetailError>;

/// A cached payload and its freshness window.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub payload: Arc<DetailPayload>,
    pub stored_at: Instant,
    pub ttl: Duration,
}

impl CacheEntry {
    /// An entry is expired once strictly more than `ttl` has elapsed.
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) > self.ttl
    }
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    /// In-flight fetches: key -> broadcast sender for the result.
    pending: HashMap<String, broadcast::Sender<SharedResult>>,
}

enum Lookup {
    Hit(Arc<DetailPayload>),
    Join(broadcast::Receiver<SharedResult>),
    Lead(broadcast::Sender<SharedResult>),
}

/// Per-entity detail cache.
///
/// At most one fetch per key is in flight. Concurrent callers for the same
/// key wait on the leader's result. Only successful results are stored.
pub struct DetailCache {
    fetcher: Arc<dyn DetailFetcher>,
    ttls: CacheTtls,
    state: Mutex<CacheState>,
    stats: CacheStats,
}

impl DetailCache {
    pub fn new(fetcher: Arc<dyn DetailFetcher>, ttls: CacheTtls) -> Self {
        Self {
            fetcher,
            ttls,
            state: Mutex::new(CacheState::default()),
            stats: CacheStats::default(),
        }
    }

    pub fn ttls(&self) -> &CacheTtls {
        &self.ttls
    }

    /// Returns the payload for `key`, fetching it if no live entry exists.
    pub async fn get_or_fetch(&self, key: &str, class: DataClass) -> SharedResult {
        let lookup = self.lookup(key);

        match lookup {
            Lookup::Hit(payload) => Ok(payload),
            Lookup::Join(mut rx) => match rx.recv().await {
                Ok(result) => result,
                Err(_) => Err(DetailError::Abandoned {
                    key: key.to_string(),
                }),
            },
            Lookup::Lead(tx) => {
                let guard = PendingGuard {
                    state: &self.state,
                    key,
                };
                CacheStats::incr(&self.stats.fetches);

                let result = match self.fetcher.fetch(key).await {
                    Ok(payload) => Ok(Arc::new(payload)),
                    Err(source) => {
                        CacheStats::incr(&self.stats.failures);
                        Err(DetailError::Fetch {
                            key: key.to_string(),
                            source,
                        })
                    }
                };

                {
                    let mut state = self.state.lock();
                    if let Ok(payload) = &result {
                        state.entries.insert(
                            key.to_string(),
                            CacheEntry {
                                payload: Arc::clone(payload),
                                stored_at: Instant::now(),
                                ttl: self.ttls.ttl_for(class),
                            },
                        );
                    }
                    state.pending.remove(key);
                }
                guard.disarm();

                let waiters = tx.receiver_count();
                let _ = tx.send(result.clone());
                if waiters > 0 {
                    debug!(key, waiters, "Broadcast detail to coalesced waiters");
                }
                result
            }
        }
    }

    /// Like [`Self::get_or_fetch`] but degrades failures to a placeholder.
    pub async fn get_or_placeholder(&self, key: &str, class: DataClass) -> Arc<DetailPayload> {
        match self.get_or_fetch(key, class).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(key, error = %e, "Detail unavailable, using placeholder");
                Arc::new(DetailPayload::unavailable(key))
            }
        }
    }

    fn lookup(&self, key: &str) -> Lookup {
        let mut state = self.state.lock();

        if let Some(entry) = state.entries.get(key) {
            if !entry.is_expired(Instant::now()) {
                CacheStats::incr(&self.stats.hits);
                return Lookup::Hit(Arc::clone(&entry.payload));
            }
            state.entries.remove(key);
            CacheStats::incr(&self.stats.expirations);
            debug!(key, "Evicted expired detail entry");
        }

        CacheStats::incr(&self.stats.misses);
        if let Some(tx) = state.pending.get(key) {
            CacheStats::incr(&self.stats.coalesced);
            debug!(key, "Joining in-flight detail fetch");
            return Lookup::Join(tx.subscribe());
        }

        let (tx, _rx) = broadcast::channel(1);
        state.pending.insert(key.to_string(), tx.clone());
        Lookup::Lead(tx)
    }

    /// Removes every expired entry. Returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let mut state = self.state.lock();
        let before = state.entries.len();
        state.entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before - state.entries.len();
        if removed > 0 {
            self.stats
                .expirations
                .fetch_add(removed as u64, std::sync::atomic::Ordering::Relaxed);
            debug!(removed, "Swept expired detail entries");
        }
        removed
    }

    /// Runs [`Self::sweep_expired`] every `interval` until `token` is cancelled.
    pub fn spawn_sweeper(
        self: &Arc<Self>,
        interval: Duration,
        token: CancellationToken,
    ) -> tokio::task::JoinHandle<()> {
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        cache.sweep_expired();
                    }
                }
            }
            debug!("Detail cache sweeper stopped");
        })
    }

    pub fn invalidate(&self, key: &str) -> bool {
        self.state.lock().entries.remove(key).is_some()
    }

    pub fn clear(&self) {
        self.state.lock().entries.clear();
    }

    /// True if a live entry exists for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.state
            .lock()
            .entries
            .get(key)
            .is_some_and(|e| !e.is_expired(Instant::now()))
    }

    pub fn entry_count(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Number of fetches currently in flight.
    pub fn pending_count(&self) -> usize {
        self.state.lock().pending.len()
    }

    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }

    /// Logs current statistics.
    pub fn log_stats(&self) {
        let stats = self.stats();
        info!(
            hits = stats.hits,
            misses = stats.misses,
            coalesced = stats.coalesced,
            fetches = stats.fetches,
            failures = stats.failures,
            entries = self.entry_count(),
            hit_rate = format!("{:.1}%", stats.hit_rate() * 100.0),
            "Detail cache statistics"
        );
    }
}

/// Removes the pending entry if the leading request is dropped mid-fetch.
struct PendingGuard<'a> {
    state: &'a Mutex<CacheState>,
    key: &'a str,
}

impl PendingGuard<'_> {
    fn disarm(self) {
        std::mem::forget(self);
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.state.lock().pending.remove(self.key);
    }
}
