//! Layer identifiers and data modes.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Identifies one visual layer of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LayerKey {
    /// Province-level administrative boundaries.
    CoarseRegion,
    /// District-level administrative boundaries.
    FineRegion,
    /// Average price markers, one per province.
    CoarsePrice,
    /// Average price markers, one per district.
    AreaPrice,
    /// Per-listing detail overlays.
    ListingDetail,
    /// Per-building markers (highest cardinality).
    BuildingMarkers,
    /// Live subscription markers.
    Realtime,
}

/// Set of layers, ordered by declaration for stable iteration and logging.
pub type LayerSet = BTreeSet<LayerKey>;

impl LayerKey {
    /// Every layer, in declaration order.
    pub const ALL: [LayerKey; 7] = [
        LayerKey::CoarseRegion,
        LayerKey::FineRegion,
        LayerKey::CoarsePrice,
        LayerKey::AreaPrice,
        LayerKey::ListingDetail,
        LayerKey::BuildingMarkers,
        LayerKey::Realtime,
    ];

    /// Stable short name used in logs and config.
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKey::CoarseRegion => "coarse_region",
            LayerKey::FineRegion => "fine_region",
            LayerKey::CoarsePrice => "coarse_price",
            LayerKey::AreaPrice => "area_price",
            LayerKey::ListingDetail => "listing_detail",
            LayerKey::BuildingMarkers => "building_markers",
            LayerKey::Realtime => "realtime",
        }
    }

    /// Returns true for layers made of region shapes rather than point overlays.
    pub fn is_region(&self) -> bool {
        matches!(self, LayerKey::CoarseRegion | LayerKey::FineRegion)
    }

    /// The data mode under which this layer can ever be visible.
    pub fn mode(&self) -> DataMode {
        match self {
            LayerKey::Realtime => DataMode::RealTime,
            _ => DataMode::Historical,
        }
    }
}

impl fmt::Display for LayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayerKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LayerKey::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| format!("unknown layer '{}'", s))
    }
}

/// Which family of data the map is displaying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataMode {
    /// Past transaction data, organised by zoom band.
    #[default]
    Historical,
    /// Live subscription listings, independent of zoom.
    RealTime,
}

impl fmt::Display for DataMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataMode::Historical => f.write_str("historical"),
            DataMode::RealTime => f.write_str("realtime"),
        }
    }
}
