//! Coordinate and screen-space type definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Valid latitude range in degrees.
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range in degrees.
pub const MIN_LNG: f64 = -180.0;
pub const MAX_LNG: f64 = 180.0;

/// Errors raised while validating geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// Coordinate outside the valid WGS84 range or not finite.
    #[error("Invalid coordinate: lat={lat}, lng={lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },

    /// A ring needs at least three vertices to enclose an area.
    #[error("Ring has {0} vertices, need at least 3")]
    DegenerateRing(usize),
}

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a position without validation.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Creates a position, rejecting non-finite or out-of-range values.
    pub fn checked(lat: f64, lng: f64) -> Result<Self, GeoError> {
        let point = Self { lat, lng };
        if point.is_valid() {
            Ok(point)
        } else {
            Err(GeoError::InvalidCoordinate { lat, lng })
        }
    }

    /// Returns true if both components are finite and inside the WGS84 range.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (MIN_LAT..=MAX_LAT).contains(&self.lat)
            && (MIN_LNG..=MAX_LNG).contains(&self.lng)
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lng)
    }
}

/// Visible area of the map in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenSize {
    pub width: f64,
    pub height: f64,
}

impl ScreenSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A zero-sized rectangle at the centre of the viewport.
    ///
    /// Used when the surface cannot report bounds for a marker.
    pub fn center_rect(&self) -> ScreenRect {
        let x = self.width / 2.0;
        let y = self.height / 2.0;
        ScreenRect::new(x, y, x, y)
    }
}

/// Axis-aligned on-screen bounds of a rendered overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl ScreenRect {
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center_x(&self) -> f64 {
        (self.left + self.right) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_accepts_seoul() {
        let p = LatLng::checked(37.5665, 126.978).unwrap();
        assert_eq!(p.lat, 37.5665);
        assert_eq!(p.lng, 126.978);
    }

    #[test]
    fn test_checked_rejects_out_of_range() {
        assert!(matches!(
            LatLng::checked(91.0, 0.0),
            Err(GeoError::InvalidCoordinate { .. })
        ));
        assert!(LatLng::checked(0.0, -180.5).is_err());
        assert!(LatLng::checked(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_center_rect() {
        let rect = ScreenSize::new(800.0, 600.0).center_rect();
        assert_eq!(rect.center_x(), 400.0);
        assert_eq!(rect.top, 300.0);
        assert_eq!(rect.width(), 0.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(LatLng::new(37.4, 127.1).to_string(), "(37.40000, 127.10000)");
    }
}
