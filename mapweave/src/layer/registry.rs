//! Layer registry: static layer metadata plus the active thresholds.

use super::key::{DataMode, LayerKey, LayerSet};
use super::policy::{visible_layers, ZoomBand, ZoomThresholds};

/// Description of one layer as seen by the rest of the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerInfo {
    pub key: LayerKey,
    /// Zoom band in historical mode; `None` for the real-time layer.
    pub band: Option<ZoomBand>,
    /// The mode under which the layer can be visible.
    pub mode: DataMode,
    /// Incremented every time the layer's backing dataset is replaced.
    pub data_version: u64,
}

/// Evaluates viewport state against the configured thresholds.
///
/// The registry is immutable after construction; `data_version` values are
/// owned by the overlay manager and passed in when describing a layer.
#[derive(Debug, Clone, Default)]
pub struct LayerRegistry {
    thresholds: ZoomThresholds,
}

impl LayerRegistry {
    pub fn new(thresholds: ZoomThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ZoomThresholds {
        &self.thresholds
    }

    /// Visible layers for the given camera state.
    pub fn visible(&self, zoom: u32, mode: DataMode) -> LayerSet {
        visible_layers(zoom, mode, &self.thresholds)
    }

    /// Describes `key` with the supplied data version.
    pub fn describe(&self, key: LayerKey, data_version: u64) -> LayerInfo {
        LayerInfo {
            key,
            band: ZoomBand::of_layer(key),
            mode: key.mode(),
            data_version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_delegates_to_policy() {
        let registry = LayerRegistry::default();
        assert_eq!(
            registry.visible(12, DataMode::Historical),
            LayerSet::from([LayerKey::CoarseRegion, LayerKey::CoarsePrice])
        );
    }

    #[test]
    fn test_describe_building_layer() {
        let registry = LayerRegistry::default();
        let info = registry.describe(LayerKey::BuildingMarkers, 3);
        assert_eq!(info.band, Some(ZoomBand::Building));
        assert_eq!(info.mode, DataMode::Historical);
        assert_eq!(info.data_version, 3);
    }

    #[test]
    fn test_describe_realtime_layer_has_no_band() {
        let info = LayerRegistry::default().describe(LayerKey::Realtime, 0);
        assert_eq!(info.band, None);
        assert_eq!(info.mode, DataMode::RealTime);
    }
}
