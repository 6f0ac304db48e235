//! Region boundary records.
//!
//! Boundaries arrive as a GeoJSON-like feature collection. Only the outer ring
//! of the first polygon is rendered, matching how the administrative boundary
//! files are produced. Each feature is converted independently so one bad
//! record never prevents the rest of the layer from being built.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::error::DatasetError;
use super::records::LayerItem;
use crate::geo::{ring_centroid, smooth_ring, LatLng};
use crate::layer::LayerKey;

/// Administrative level of a boundary dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionGranularity {
    /// Provinces and metropolitan cities.
    Coarse,
    /// Districts.
    Fine,
}

impl RegionGranularity {
    pub fn layer(&self) -> LayerKey {
        match self {
            RegionGranularity::Coarse => LayerKey::CoarseRegion,
            RegionGranularity::Fine => LayerKey::FineRegion,
        }
    }
}

/// Feature collection as stored on disk.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegionCollection {
    #[serde(default)]
    pub features: Vec<RegionFeature>,
}

/// One boundary feature, geometry still unvalidated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegionFeature {
    #[serde(default)]
    pub properties: RegionProperties,
    #[serde(default)]
    pub geometry: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegionProperties {
    #[serde(default)]
    pub name: String,
}

/// A validated region outline ready for shape creation.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionShape {
    pub name: String,
    /// Smoothed outer ring.
    pub ring: Vec<LatLng>,
    /// Where the region's label and highlight are anchored.
    pub label_position: LatLng,
}

impl RegionFeature {
    pub fn name(&self) -> &str {
        &self.properties.name
    }

    /// Validates the geometry and produces a smoothed outline.
    pub fn to_shape(&self, smoothing: f64) -> Result<RegionShape, DatasetError> {
        let name = self.name().to_string();
        let geometry = self
            .geometry
            .as_ref()
            .ok_or_else(|| DatasetError::MissingGeometry(name.clone()))?;

        let kind = geometry
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let coordinates = geometry
            .get("coordinates")
            .cloned()
            .ok_or_else(|| DatasetError::MissingGeometry(name.clone()))?;

        let malformed = || DatasetError::MalformedGeometry {
            name: name.clone(),
            kind: kind.clone(),
        };

        let outer: Vec<Vec<f64>> = match kind.as_str() {
            "Polygon" => serde_json::from_value::<Vec<Vec<Vec<f64>>>>(coordinates)
                .map_err(|_| malformed())?
                .into_iter()
                .next()
                .ok_or_else(malformed)?,
            "MultiPolygon" => serde_json::from_value::<Vec<Vec<Vec<Vec<f64>>>>>(coordinates)
                .map_err(|_| malformed())?
                .into_iter()
                .next()
                .and_then(|polygon| polygon.into_iter().next())
                .ok_or_else(malformed)?,
            _ => {
                return Err(DatasetError::UnsupportedGeometry {
                    name,
                    kind,
                })
            }
        };

        let ring = outer
            .iter()
            .map(|pair| match pair.as_slice() {
                [lng, lat, ..] => LatLng::checked(*lat, *lng).map_err(|source| {
                    DatasetError::InvalidCoordinates {
                        name: name.clone(),
                        source,
                    }
                }),
                _ => Err(malformed()),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let label_position =
            ring_centroid(&ring).map_err(|source| DatasetError::InvalidCoordinates {
                name: name.clone(),
                source,
            })?;

        Ok(RegionShape {
            name,
            ring: smooth_ring(&ring, smoothing),
            label_position,
        })
    }
}

impl RegionCollection {
    /// Converts every valid feature into a layer item.
    ///
    /// Invalid features are skipped with a warning.
    pub fn to_items(&self, granularity: RegionGranularity, smoothing: f64) -> Vec<LayerItem> {
        let layer = granularity.layer();
        self.features
            .iter()
            .filter_map(|feature| match feature.to_shape(smoothing) {
                Ok(shape) => Some(LayerItem::Region { layer, shape }),
                Err(e) => {
                    warn!(layer = %layer, region = feature.name(), error = %e, "Skipping region record");
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::DEFAULT_SMOOTHING_FACTOR;

    fn collection(json: &str) -> RegionCollection {
        serde_json::from_str(json).unwrap()
    }

    const VALID_POLYGON: &str = r#"{
        "properties": {"name": "Jongno-gu"},
        "geometry": {"type": "Polygon", "coordinates": [[[126.9, 37.5], [127.0, 37.5], [127.0, 37.6], [126.9, 37.6]]]}
    }"#;

    #[test]
    fn test_polygon_feature_becomes_shape() {
        let feature: RegionFeature = serde_json::from_str(VALID_POLYGON).unwrap();
        let shape = feature.to_shape(DEFAULT_SMOOTHING_FACTOR).unwrap();
        assert_eq!(shape.name, "Jongno-gu");
        assert_eq!(shape.ring.len(), 7);
        // GeoJSON order is [lng, lat]
        assert_eq!(shape.ring[0], LatLng::new(37.5, 126.9));
        assert!((shape.label_position.lat - 37.55).abs() < 1e-9);
    }

    #[test]
    fn test_multipolygon_uses_first_outer_ring() {
        let feature: RegionFeature = serde_json::from_str(
            r#"{
            "properties": {"name": "Ongjin-gun"},
            "geometry": {"type": "MultiPolygon", "coordinates": [
                [[[126.0, 37.0], [126.1, 37.0], [126.1, 37.1]]],
                [[[125.0, 36.0], [125.1, 36.0], [125.1, 36.1]]]
            ]}
        }"#,
        )
        .unwrap();
        let shape = feature.to_shape(0.0).unwrap();
        assert_eq!(shape.ring[0], LatLng::new(37.0, 126.0));
    }

    #[test]
    fn test_bad_records_are_skipped_individually() {
        let json = format!(
            r#"{{"features": [
                {VALID_POLYGON},
                {{"properties": {{"name": "NoGeometry"}}}},
                {{"properties": {{"name": "Broken"}}, "geometry": {{"type": "Polygon", "coordinates": [[["a", "b"]]]}}}},
                {{"properties": {{"name": "Point"}}, "geometry": {{"type": "Point", "coordinates": [127.0, 37.0]}}}},
                {{"properties": {{"name": "Empty"}}, "geometry": {{"type": "Polygon", "coordinates": []}}}}
            ]}}"#
        );
        let items = collection(&json).to_items(RegionGranularity::Fine, 0.2);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].layer(), LayerKey::FineRegion);
        assert_eq!(items[0].entity_key(), "Jongno-gu");
    }

    #[test]
    fn test_error_variants() {
        let missing = RegionFeature {
            properties: RegionProperties {
                name: "X".into(),
            },
            geometry: None,
        };
        assert!(matches!(
            missing.to_shape(0.2),
            Err(DatasetError::MissingGeometry(_))
        ));

        let out_of_range: RegionFeature = serde_json::from_str(
            r#"{"properties": {"name": "Y"}, "geometry": {"type": "Polygon", "coordinates": [[[200.0, 37.0], [127.0, 37.0], [127.0, 38.0]]]}}"#,
        )
        .unwrap();
        assert!(matches!(
            out_of_range.to_shape(0.2),
            Err(DatasetError::InvalidCoordinates { .. })
        ));
    }
}
