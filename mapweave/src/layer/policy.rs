//! Pure zoom-tier visibility policy.

use super::key::{DataMode, LayerKey, LayerSet};
use thiserror::Error;

/// Default threshold above which coarse regions are shown.
pub const DEFAULT_THRESHOLD_HIGH: u32 = 10;
/// Default threshold above which fine regions are shown.
pub const DEFAULT_THRESHOLD_LOW: u32 = 8;
/// Default threshold at or below which per-building markers are shown.
pub const DEFAULT_THRESHOLD_INDIVIDUAL: u32 = 6;
/// Largest accepted threshold. Map zoom levels never come close.
pub const MAX_ZOOM_THRESHOLD: u32 = 64;

/// Errors raised while building the layer policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayerError {
    /// Thresholds must be strictly decreasing.
    #[error("Zoom thresholds must satisfy high > low > individual (got {high}, {low}, {individual})")]
    InvalidThresholds { high: u32, low: u32, individual: u32 },

    /// A threshold exceeds [`MAX_ZOOM_THRESHOLD`].
    #[error("Zoom threshold {value} exceeds the maximum of {max}")]
    ThresholdTooHigh { value: u32, max: u32 },
}

/// The three zoom thresholds that partition the historical zoom axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomThresholds {
    high: u32,
    low: u32,
    individual: u32,
}

impl ZoomThresholds {
    /// Creates thresholds, requiring `high > low > individual` and
    /// `high <= MAX_ZOOM_THRESHOLD`.
    pub fn new(high: u32, low: u32, individual: u32) -> Result<Self, LayerError> {
        if high > MAX_ZOOM_THRESHOLD {
            return Err(LayerError::ThresholdTooHigh {
                value: high,
                max: MAX_ZOOM_THRESHOLD,
            });
        }
        if high > low && low > individual {
            Ok(Self {
                high,
                low,
                individual,
            })
        } else {
            Err(LayerError::InvalidThresholds {
                high,
                low,
                individual,
            })
        }
    }

    pub fn high(&self) -> u32 {
        self.high
    }

    pub fn low(&self) -> u32 {
        self.low
    }

    pub fn individual(&self) -> u32 {
        self.individual
    }
}

impl Default for ZoomThresholds {
    fn default() -> Self {
        Self {
            high: DEFAULT_THRESHOLD_HIGH,
            low: DEFAULT_THRESHOLD_LOW,
            individual: DEFAULT_THRESHOLD_INDIVIDUAL,
        }
    }
}

/// One contiguous range of zoom levels in historical mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoomBand {
    /// `zoom > high`
    Coarse,
    /// `low < zoom <= high`
    Fine,
    /// `individual < zoom <= low`
    Listing,
    /// `zoom <= individual`
    Building,
}

impl ZoomBand {
    /// The band containing `zoom`. Every zoom level maps to exactly one band.
    pub fn for_zoom(zoom: u32, thresholds: &ZoomThresholds) -> Self {
        if zoom > thresholds.high {
            ZoomBand::Coarse
        } else if zoom > thresholds.low {
            ZoomBand::Fine
        } else if zoom > thresholds.individual {
            ZoomBand::Listing
        } else {
            ZoomBand::Building
        }
    }

    /// Layers shown while the camera is inside this band.
    pub fn layers(&self) -> &'static [LayerKey] {
        match self {
            ZoomBand::Coarse => &[LayerKey::CoarseRegion, LayerKey::CoarsePrice],
            ZoomBand::Fine => &[LayerKey::FineRegion, LayerKey::AreaPrice],
            ZoomBand::Listing => &[LayerKey::ListingDetail],
            ZoomBand::Building => &[LayerKey::BuildingMarkers],
        }
    }

    /// The band a historical layer belongs to; `None` for the real-time layer.
    pub fn of_layer(layer: LayerKey) -> Option<Self> {
        [
            ZoomBand::Coarse,
            ZoomBand::Fine,
            ZoomBand::Listing,
            ZoomBand::Building,
        ]
        .into_iter()
        .find(|band| band.layers().contains(&layer))
    }

    /// Inclusive zoom range covered by the band. `None` means unbounded.
    pub fn range(&self, thresholds: &ZoomThresholds) -> (Option<u32>, Option<u32>) {
        match self {
            ZoomBand::Coarse => (Some(thresholds.high + 1), None),
            ZoomBand::Fine => (Some(thresholds.low + 1), Some(thresholds.high)),
            ZoomBand::Listing => (Some(thresholds.individual + 1), Some(thresholds.low)),
            ZoomBand::Building => (None, Some(thresholds.individual)),
        }
    }
}

/// Computes the set of visible layers for a camera state.
///
/// Pure: no side effects, same output for the same input.
pub fn visible_layers(zoom: u32, mode: DataMode, thresholds: &ZoomThresholds) -> LayerSet {
    match mode {
        DataMode::RealTime => LayerSet::from([LayerKey::Realtime]),
        DataMode::Historical => ZoomBand::for_zoom(zoom, thresholds)
            .layers()
            .iter()
            .copied()
            .collect(),
    }
}
