//! Layer registry and zoom-tier visibility policy.
//!
//! A layer is a named collection of same-kind overlays. Which layers are
//! visible is a pure function of the camera zoom level and the data mode:
//!
//! ```text
//! zoom (larger = further out)
//!  ...  12  11 │ 10   9 │  8   7 │  6   5  ...
//!  coarse      │ fine   │ listing│ building
//!  region+price│ region+│ detail │ markers
//!              │ area   │        │
//!           T_high    T_low   T_individual
//! ```
//!
//! In real-time mode the zoom level is ignored and only the real-time layer
//! is visible.
//!
//! # Example
//!
//! ```
//! use mapweave::layer::{visible_layers, DataMode, LayerKey, ZoomThresholds};
//!
//! let thresholds = ZoomThresholds::default();
//! let visible = visible_layers(9, DataMode::Historical, &thresholds);
//! assert!(visible.contains(&LayerKey::FineRegion));
//! assert!(visible.contains(&LayerKey::AreaPrice));
//! ```

mod key;
mod policy;
mod registry;

pub use key::{DataMode, LayerKey, LayerSet};
pub use policy::{
    visible_layers, LayerError, ZoomBand, ZoomThresholds, DEFAULT_THRESHOLD_HIGH,
    DEFAULT_THRESHOLD_INDIVIDUAL, DEFAULT_THRESHOLD_LOW, MAX_ZOOM_THRESHOLD,
};
pub use registry::{LayerInfo, LayerRegistry};
