//! Region outline helpers.

use super::types::{GeoError, LatLng};

/// Interpolation factor used when smoothing administrative boundaries.
pub const DEFAULT_SMOOTHING_FACTOR: f64 = 0.2;

/// Smooths a closed ring by inserting one interpolated vertex after each
/// vertex except the last.
///
/// The inserted vertex lies `factor` of the way towards the next vertex, so a
/// ring of `n` vertices yields `2n - 1` vertices.
pub fn smooth_ring(points: &[LatLng], factor: f64) -> Vec<LatLng> {
    if points.len() < 2 {
        return points.to_vec();
    }

    let mut smoothed = Vec::with_capacity(points.len() * 2 - 1);
    for (i, current) in points.iter().enumerate() {
        smoothed.push(*current);
        if let Some(next) = points.get(i + 1) {
            smoothed.push(LatLng::new(
                current.lat + (next.lat - current.lat) * factor,
                current.lng + (next.lng - current.lng) * factor,
            ));
        }
    }
    smoothed
}

/// Arithmetic mean of the ring's vertices.
///
/// Good enough as a label anchor for administrative regions; not an
/// area-weighted centroid.
pub fn ring_centroid(points: &[LatLng]) -> Result<LatLng, GeoError> {
    if points.len() < 3 {
        return Err(GeoError::DegenerateRing(points.len()));
    }
    let n = points.len() as f64;
    let (lat, lng) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lng), p| (lat + p.lat, lng + p.lng));
    LatLng::checked(lat / n, lng / n)
}
