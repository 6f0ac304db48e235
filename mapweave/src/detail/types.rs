//! Detail payloads, data classes and errors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Default TTL for aggregate summaries (30 minutes).
pub const DEFAULT_SUMMARY_TTL: Duration = Duration::from_secs(30 * 60);

/// Default TTL for real-time snapshots (5 minutes).
pub const DEFAULT_SNAPSHOT_TTL: Duration = Duration::from_secs(5 * 60);

/// Default TTL for individual entity details (60 minutes).
pub const DEFAULT_DETAIL_TTL: Duration = Duration::from_secs(60 * 60);

/// Freshness class of a cached payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataClass {
    /// Aggregate data that changes slowly.
    Summary,
    /// Live listing data.
    Snapshot,
    /// Per-entity detail.
    Detail,
}

/// Time-to-live per data class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    pub summary: Duration,
    pub snapshot: Duration,
    pub detail: Duration,
}

impl CacheTtls {
    pub fn ttl_for(&self, class: DataClass) -> Duration {
        match class {
            DataClass::Summary => self.summary,
            DataClass::Snapshot => self.snapshot,
            DataClass::Detail => self.detail,
        }
    }
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            summary: DEFAULT_SUMMARY_TTL,
            snapshot: DEFAULT_SNAPSHOT_TTL,
            detail: DEFAULT_DETAIL_TTL,
        }
    }
}

/// Detail record shown in a hover preview.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailPayload {
    #[serde(default, alias = "houseManageNo")]
    pub entity_key: String,
    #[serde(default)]
    pub house_name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, alias = "houseSecdNm")]
    pub house_type: Option<String>,
    /// Application start date, `YYYY-MM-DD` or `YYYYMMDD`.
    #[serde(default, alias = "rceptBgnde")]
    pub receipt_start: Option<String>,
    /// Extra labelled values (unit types, prices) shown in the body.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Set on placeholders produced after a failed fetch.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unavailable: bool,
}

impl DetailPayload {
    /// Placeholder returned when the real payload could not be fetched.
    pub fn unavailable(entity_key: impl Into<String>) -> Self {
        Self {
            entity_key: entity_key.into(),
            unavailable: true,
            ..Default::default()
        }
    }
}

/// Errors raised by a [`super::DetailFetcher`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// Transport-level failure.
    #[error("Request failed: {0}")]
    Http(String),

    /// The server answered with a non-success status.
    #[error("Server returned status {0}")]
    Status(u16),

    /// The body could not be decoded.
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// No record exists for the key.
    #[error("No detail for '{0}'")]
    NotFound(String),
}

/// Errors returned by [`super::DetailCache`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetailError {
    /// The fetch for this key failed.
    #[error("Fetching detail for '{key}' failed: {source}")]
    Fetch { key: String, source: FetchError },

    /// The leading request was dropped before it settled.
    #[error("Fetch for '{key}' was abandoned")]
    Abandoned { key: String },
}

impl DetailError {
    pub fn key(&self) -> &str {
        match self {
            DetailError::Fetch { key, .. } | DetailError::Abandoned { key } => key,
        }
    }
}
