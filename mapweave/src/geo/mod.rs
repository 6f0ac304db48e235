//! Geometry primitives shared by the overlay engine.
//!
//! The engine never projects coordinates itself; the rendering surface owns
//! projection and camera physics. These types only carry positions between
//! datasets, the content builder and the surface:
//!
//! - [`LatLng`]: a geographic position (WGS84 degrees)
//! - [`ScreenRect`] / [`ScreenSize`]: on-screen pixel bounds reported by the surface
//! - [`smooth_ring`]: region outline smoothing applied before shape creation

mod path;
mod types;

pub use path::{ring_centroid, smooth_ring, DEFAULT_SMOOTHING_FACTOR};
pub use types::{GeoError, LatLng, ScreenRect, ScreenSize};
