//! Dataset records consumed by the overlay engine.
//!
//! Feeds arrive as JSON arrays of plain records (or a GeoJSON-like feature
//! collection for region boundaries). Each record carries an identifying key,
//! coordinates and display fields. [`LayerItem`] wraps a record together with
//! the layer it belongs to so the overlay manager can build handles without
//! knowing where the data came from.

mod bundle;
mod error;
mod records;
mod region;

pub use bundle::{DatasetBundle, DATASET_FILES};
pub use error::DatasetError;
pub use records::{
    AreaPriceMarker, BuildingMarker, LayerItem, ListingMarker, PriceMarker, RealtimeMarker,
};
pub use region::{RegionCollection, RegionFeature, RegionGranularity, RegionShape};
