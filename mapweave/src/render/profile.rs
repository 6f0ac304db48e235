//! Batch sizing profiles.

use std::time::Duration;

use crate::layer::LayerKey;

/// Layers with more overlays than this are attached in batches even without
/// a dedicated profile.
pub const DEFAULT_SYNC_ATTACH_LIMIT: usize = 200;

/// Chunk size and pause between chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProfile {
    pub chunk_size: usize,
    /// Zero means yield to the scheduler without sleeping.
    pub yield_interval: Duration,
}

impl BatchProfile {
    pub const fn new(chunk_size: usize, yield_interval: Duration) -> Self {
        Self {
            chunk_size,
            yield_interval,
        }
    }

    /// Small chunks, short pauses. Used for live data.
    pub const fn low_latency() -> Self {
        Self::new(20, Duration::from_millis(2))
    }

    /// Large chunks. Used for the dense building layer.
    pub const fn high_throughput() -> Self {
        Self::new(100, Duration::from_millis(5))
    }

    /// Number of chunks needed for `count` items.
    pub fn chunk_count(&self, count: usize) -> usize {
        count.div_ceil(self.chunk_size.max(1))
    }
}

impl Default for BatchProfile {
    fn default() -> Self {
        Self::new(50, Duration::from_millis(10))
    }
}

/// Batch settings for every layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    pub realtime: BatchProfile,
    pub buildings: BatchProfile,
    /// Profile for any other layer above the sync attach limit.
    pub fallback: BatchProfile,
    pub sync_attach_limit: usize,
}

impl RenderConfig {
    /// Profile to use when showing `count` overlays of `layer`, or `None`
    /// to attach synchronously.
    pub fn plan(&self, layer: LayerKey, count: usize) -> Option<BatchProfile> {
        match layer {
            LayerKey::Realtime => Some(self.realtime),
            LayerKey::BuildingMarkers => Some(self.buildings),
            _ if count > self.sync_attach_limit => Some(self.fallback),
            _ => None,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            realtime: BatchProfile::low_latency(),
            buildings: BatchProfile::high_throughput(),
            fallback: BatchProfile::default(),
            sync_attach_limit: DEFAULT_SYNC_ATTACH_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_count() {
        assert_eq!(BatchProfile::default().chunk_count(237), 5);
        assert_eq!(BatchProfile::high_throughput().chunk_count(900), 9);
        assert_eq!(BatchProfile::low_latency().chunk_count(0), 0);
        assert_eq!(BatchProfile::new(0, Duration::ZERO).chunk_count(3), 3);
    }

    #[test]
    fn test_plan() {
        let config = RenderConfig::default();
        assert_eq!(
            config.plan(LayerKey::Realtime, 3),
            Some(BatchProfile::low_latency())
        );
        assert_eq!(
            config.plan(LayerKey::BuildingMarkers, 10),
            Some(BatchProfile::high_throughput())
        );
        assert_eq!(config.plan(LayerKey::FineRegion, 200), None);
        assert_eq!(
            config.plan(LayerKey::FineRegion, 201),
            Some(BatchProfile::default())
        );
    }
}
