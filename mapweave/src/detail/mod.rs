//! Detail cache and request coalescing.
//!
//! Hovering a marker needs the entity's detail payload. Fetches are expensive,
//! so results are cached per entity with a time-to-live that depends on the
//! data class, and concurrent requests for the same entity share a single
//! fetch:
//!
//! ```text
//! hover A ─┐
//!          │                         DetailFetcher
//! hover B ─┼──► DetailCache ───────► (one fetch)
//!          │      │    ▲                  │
//! hover C ─┘      │    └── populate on ───┘
//!                 ▼        success only
//!          [A, B, C receive the same result]
//! ```
//!
//! Failures are never cached; the next request for the key fetches again.

mod cache;
mod fetcher;
mod stats;
mod types;

pub use cache::{CacheEntry, DetailCache};
pub use fetcher::{DetailFetcher, HttpDetailFetcher, StaticDetailFetcher};
pub use stats::{CacheStats, CacheStatsSnapshot};
pub use types::{
    CacheTtls, DataClass, DetailError, DetailPayload, FetchError, DEFAULT_DETAIL_TTL,
    DEFAULT_SNAPSHOT_TTL, DEFAULT_SUMMARY_TTL,
};
