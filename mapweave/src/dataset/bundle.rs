//! Directory-backed dataset bundle.
//!
//! A bundle is a directory holding one JSON file per feed. Missing files are
//! treated as empty feeds; unreadable or unparsable files are errors. Point
//! feeds are decoded record by record and bad records are skipped.

use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{debug, info, warn};

use super::error::DatasetError;
use super::records::{
    AreaPriceMarker, BuildingMarker, LayerItem, ListingMarker, PriceMarker, RealtimeMarker,
};
use super::region::{RegionCollection, RegionGranularity};
use crate::detail::DetailPayload;
use crate::geo::DEFAULT_SMOOTHING_FACTOR;
use crate::layer::LayerKey;

pub const COARSE_REGIONS_FILE: &str = "coarse_regions.json";
pub const FINE_REGIONS_FILE: &str = "fine_regions.json";
pub const COARSE_PRICES_FILE: &str = "coarse_prices.json";
pub const AREA_PRICES_FILE: &str = "area_prices.json";
pub const LISTINGS_FILE: &str = "listings.json";
pub const BUILDINGS_FILE: &str = "buildings.json";
pub const REALTIME_FILE: &str = "realtime.json";
pub const DETAILS_FILE: &str = "details.json";

/// Files recognised in a bundle directory.
pub const DATASET_FILES: [&str; 8] = [
    COARSE_REGIONS_FILE,
    FINE_REGIONS_FILE,
    COARSE_PRICES_FILE,
    AREA_PRICES_FILE,
    LISTINGS_FILE,
    BUILDINGS_FILE,
    REALTIME_FILE,
    DETAILS_FILE,
];

/// Every feed the engine can render, plus optional detail payloads.
#[derive(Debug, Clone)]
pub struct DatasetBundle {
    pub coarse_regions: RegionCollection,
    pub fine_regions: RegionCollection,
    pub coarse_prices: Vec<PriceMarker>,
    pub area_prices: Vec<AreaPriceMarker>,
    pub listings: Vec<ListingMarker>,
    pub buildings: Vec<BuildingMarker>,
    pub realtime: Vec<RealtimeMarker>,
    /// Detail payloads keyed by entity, used to seed an offline fetcher.
    pub details: Vec<DetailPayload>,
    pub smoothing: f64,
}

impl Default for DatasetBundle {
    fn default() -> Self {
        Self {
            coarse_regions: RegionCollection::default(),
            fine_regions: RegionCollection::default(),
            coarse_prices: Vec::new(),
            area_prices: Vec::new(),
            listings: Vec::new(),
            buildings: Vec::new(),
            realtime: Vec::new(),
            details: Vec::new(),
            smoothing: DEFAULT_SMOOTHING_FACTOR,
        }
    }
}

impl DatasetBundle {
    /// Creates an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every recognised file from `dir`.
    pub fn load_dir(dir: &Path) -> Result<Self, DatasetError> {
        let bundle = Self {
            coarse_regions: read_or_default(&dir.join(COARSE_REGIONS_FILE))?,
            fine_regions: read_or_default(&dir.join(FINE_REGIONS_FILE))?,
            coarse_prices: read_records(&dir.join(COARSE_PRICES_FILE))?,
            area_prices: read_records(&dir.join(AREA_PRICES_FILE))?,
            listings: read_records(&dir.join(LISTINGS_FILE))?,
            buildings: read_records(&dir.join(BUILDINGS_FILE))?,
            realtime: read_records(&dir.join(REALTIME_FILE))?,
            details: read_records(&dir.join(DETAILS_FILE))?,
            smoothing: DEFAULT_SMOOTHING_FACTOR,
        };

        info!(
            dir = %dir.display(),
            coarse_regions = bundle.coarse_regions.features.len(),
            fine_regions = bundle.fine_regions.features.len(),
            buildings = bundle.buildings.len(),
            realtime = bundle.realtime.len(),
            "Dataset bundle loaded"
        );
        Ok(bundle)
    }

    /// Builds the overlay items for one layer.
    ///
    /// Region records with bad geometry are skipped.
    pub fn items_for(&self, layer: LayerKey) -> Vec<LayerItem> {
        match layer {
            LayerKey::CoarseRegion => self
                .coarse_regions
                .to_items(RegionGranularity::Coarse, self.smoothing),
            LayerKey::FineRegion => self
                .fine_regions
                .to_items(RegionGranularity::Fine, self.smoothing),
            LayerKey::CoarsePrice => self
                .coarse_prices
                .iter()
                .cloned()
                .map(LayerItem::CoarsePrice)
                .collect(),
            LayerKey::AreaPrice => self
                .area_prices
                .iter()
                .cloned()
                .map(LayerItem::AreaPrice)
                .collect(),
            LayerKey::ListingDetail => self
                .listings
                .iter()
                .cloned()
                .map(LayerItem::Listing)
                .collect(),
            LayerKey::BuildingMarkers => self
                .buildings
                .iter()
                .cloned()
                .map(LayerItem::Building)
                .collect(),
            LayerKey::Realtime => self
                .realtime
                .iter()
                .cloned()
                .map(LayerItem::Realtime)
                .collect(),
        }
    }
}

fn read_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T, DatasetError> {
    if !path.exists() {
        debug!(path = %path.display(), "Dataset file absent, using empty feed");
        return Ok(T::default());
    }
    let bytes = std::fs::read(path).map_err(|source| DatasetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| DatasetError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a JSON array, keeping every element that decodes as `T`.
fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DatasetError> {
    let values: Vec<serde_json::Value> = read_or_default(path)?;
    let total = values.len();

    let records: Vec<T> = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(path = %path.display(), index, error = %e, "Skipping dataset record");
                None
            }
        })
        .collect();

    if records.len() < total {
        warn!(
            path = %path.display(),
            skipped = total - records.len(),
            kept = records.len(),
            "Dataset file had invalid records"
        );
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_directory_files_yield_empty_bundle() {
        let dir = TempDir::new().unwrap();
        let bundle = DatasetBundle::load_dir(dir.path()).unwrap();
        for layer in LayerKey::ALL {
            assert!(bundle.items_for(layer).is_empty());
        }
    }

    #[test]
    fn test_loads_point_feeds() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(BUILDINGS_FILE),
            r#"[{"houseManageNo":"1","houseName":"A","avgPrice":52000,"x":127.0,"y":37.5},
                {"houseManageNo":"2","houseName":"B","x":127.1,"y":37.6}]"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join(AREA_PRICES_FILE),
            r#"[{"sigungu":"Suwon","avgPrice":41000,"complexCount":3,"lat":37.26,"lng":127.02}]"#,
        )
        .unwrap();

        let bundle = DatasetBundle::load_dir(dir.path()).unwrap();
        let buildings = bundle.items_for(LayerKey::BuildingMarkers);
        assert_eq!(buildings.len(), 2);
        assert_eq!(buildings[1].entity_key(), "2");
        assert_eq!(bundle.items_for(LayerKey::AreaPrice).len(), 1);
    }

    #[test]
    fn test_bad_point_record_is_skipped() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(BUILDINGS_FILE),
            r#"[{"houseManageNo":"1","houseName":"A","x":127.0,"y":37.5},
                {"houseManageNo":"2","houseName":"B","x":null,"y":37.6},
                {"houseManageNo":"3","houseName":"C","y":37.7},
                {"houseManageNo":"4","houseName":"D","x":127.2,"y":37.8}]"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join(LISTINGS_FILE),
            r#"[{"id":"L1","price":"3억","lat":37.5,"lng":127.0}]"#,
        )
        .unwrap();

        let bundle = DatasetBundle::load_dir(dir.path()).unwrap();
        let keys: Vec<String> = bundle
            .items_for(LayerKey::BuildingMarkers)
            .iter()
            .map(|item| item.entity_key().to_string())
            .collect();
        assert_eq!(keys, vec!["1", "4"]);
        assert_eq!(bundle.items_for(LayerKey::ListingDetail).len(), 1);
    }

    #[test]
    fn test_non_array_feed_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(BUILDINGS_FILE), r#"{"houseManageNo":"1"}"#).unwrap();
        let err = DatasetBundle::load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, DatasetError::Parse { .. }));
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(LISTINGS_FILE), "{not json").unwrap();
        let err = DatasetBundle::load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, DatasetError::Parse { .. }));
        assert!(err.to_string().contains(LISTINGS_FILE));
    }
}
