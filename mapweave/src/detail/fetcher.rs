//! Detail fetch collaborators.

use parking_lot::Mutex;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, trace, warn};

use super::types::{DetailPayload, FetchError};
use crate::timer::BoxFuture;

/// Default HTTP timeout for detail requests.
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of detail payloads.
///
/// Implementations perform the actual I/O. The cache guarantees at most one
/// call per key is in flight at a time.
pub trait DetailFetcher: Send + Sync {
    fn fetch<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<DetailPayload, FetchError>>;
}

/// Response wrapper used by the subscription backend.
#[derive(Deserialize)]
struct DetailEnvelope {
    #[serde(default)]
    success: bool,
    data: Option<DetailPayload>,
}

/// Fetches details from the subscription backend over HTTP.
pub struct HttpDetailFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDetailFetcher {
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| FetchError::Http(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// URL of the per-entity JSON document.
    pub fn url_for(&self, key: &str) -> String {
        format!("{}/api/applyhome/json/{}_{}_1", self.base_url, key, key)
    }

    async fn get(&self, key: &str) -> Result<DetailPayload, FetchError> {
        let url = self.url_for(key);
        trace!(url = %url, "Detail request starting");

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(url = %url, error = %e, is_timeout = e.is_timeout(), "Detail request failed");
            FetchError::Http(e.to_string())
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(key.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))?;

        let envelope: DetailEnvelope =
            serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))?;
        let mut payload = match envelope {
            DetailEnvelope {
                success: true,
                data: Some(payload),
            } => payload,
            _ => return Err(FetchError::NotFound(key.to_string())),
        };
        if payload.entity_key.is_empty() {
            payload.entity_key = key.to_string();
        }

        debug!(key, bytes = bytes.len(), "Detail fetched");
        Ok(payload)
    }
}

impl DetailFetcher for HttpDetailFetcher {
    fn fetch<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<DetailPayload, FetchError>> {
        Box::pin(self.get(key))
    }
}

/// In-memory fetcher backed by a fixed set of payloads.
///
/// Counts calls per key and can be told to fail or delay, which makes it the
/// fetcher of choice for offline simulation and tests.
#[derive(Default)]
pub struct StaticDetailFetcher {
    payloads: HashMap<String, DetailPayload>,
    failing: Mutex<HashSet<String>>,
    delay: Duration,
    calls: Mutex<HashMap<String, u64>>,
    total_calls: AtomicU64,
}

impl StaticDetailFetcher {
    pub fn new(payloads: impl IntoIterator<Item = DetailPayload>) -> Self {
        Self {
            payloads: payloads
                .into_iter()
                .map(|p| (p.entity_key.clone(), p))
                .collect(),
            ..Default::default()
        }
    }

    /// Delays every response by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Makes fetches for `key` fail until [`Self::recover`] is called.
    pub fn fail_for(&self, key: &str) {
        self.failing.lock().insert(key.to_string());
    }

    pub fn recover(&self, key: &str) {
        self.failing.lock().remove(key);
    }

    /// Number of fetches issued for `key`.
    pub fn calls_for(&self, key: &str) -> u64 {
        self.calls.lock().get(key).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> u64 {
        self.total_calls.load(Ordering::Relaxed)
    }

    async fn lookup(&self, key: &str) -> Result<DetailPayload, FetchError> {
        *self.calls.lock().entry(key.to_string()).or_insert(0) += 1;
        self.total_calls.fetch_add(1, Ordering::Relaxed);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if self.failing.lock().contains(key) {
            return Err(FetchError::Http("injected failure".to_string()));
        }
        self.payloads
            .get(key)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(key.to_string()))
    }
}

impl DetailFetcher for StaticDetailFetcher {
    fn fetch<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<DetailPayload, FetchError>> {
        Box::pin(self.lookup(key))
    }
}
