//! Point-marker records for each dataset feed.

use serde::{Deserialize, Serialize};

use super::region::RegionShape;
use crate::geo::LatLng;
use crate::layer::LayerKey;

/// Province-level average price marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceMarker {
    pub region: String,
    /// Pre-formatted price label supplied by the backend.
    pub average_price: String,
    pub lat: f64,
    pub lng: f64,
}

/// District-level average price marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaPriceMarker {
    pub sigungu: String,
    /// Average sale price in units of 10,000 KRW.
    pub avg_price: f64,
    #[serde(default)]
    pub complex_count: u32,
    pub lat: f64,
    pub lng: f64,
}

/// One historical listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingMarker {
    pub id: String,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub address: String,
    pub price: String,
    pub lat: f64,
    pub lng: f64,
}

impl ListingMarker {
    /// District label, falling back to the last word of the address.
    pub fn district_label(&self) -> &str {
        match self.district.as_deref() {
            Some(d) if !d.trim().is_empty() => d,
            _ => self.address.split_whitespace().last().unwrap_or(""),
        }
    }
}

/// One apartment building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingMarker {
    pub house_manage_no: String,
    pub house_name: String,
    /// Average price in units of 10,000 KRW, when known.
    #[serde(default)]
    pub avg_price: Option<f64>,
    /// Longitude.
    pub x: f64,
    /// Latitude.
    pub y: f64,
}

/// One live subscription listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeMarker {
    #[serde(alias = "house_manage_no", alias = "manageNo")]
    pub house_manage_no: String,
    #[serde(alias = "house_name", alias = "name")]
    pub house_name: String,
    #[serde(default, alias = "supplyAddress", alias = "supply_address")]
    pub address: Option<String>,
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lng", alias = "lon")]
    pub longitude: f64,
}

/// A dataset record tagged with the layer it renders into.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerItem {
    Region {
        layer: LayerKey,
        shape: RegionShape,
    },
    CoarsePrice(PriceMarker),
    AreaPrice(AreaPriceMarker),
    Listing(ListingMarker),
    Building(BuildingMarker),
    Realtime(RealtimeMarker),
}

impl LayerItem {
    /// The layer this item belongs to.
    pub fn layer(&self) -> LayerKey {
        match self {
            LayerItem::Region { layer, .. } => *layer,
            LayerItem::CoarsePrice(_) => LayerKey::CoarsePrice,
            LayerItem::AreaPrice(_) => LayerKey::AreaPrice,
            LayerItem::Listing(_) => LayerKey::ListingDetail,
            LayerItem::Building(_) => LayerKey::BuildingMarkers,
            LayerItem::Realtime(_) => LayerKey::Realtime,
        }
    }

    /// Anchor position of the overlay.
    pub fn position(&self) -> LatLng {
        match self {
            LayerItem::Region { shape, .. } => shape.label_position,
            LayerItem::CoarsePrice(m) => LatLng::new(m.lat, m.lng),
            LayerItem::AreaPrice(m) => LatLng::new(m.lat, m.lng),
            LayerItem::Listing(m) => LatLng::new(m.lat, m.lng),
            LayerItem::Building(m) => LatLng::new(m.y, m.x),
            LayerItem::Realtime(m) => LatLng::new(m.latitude, m.longitude),
        }
    }

    /// Identifying key of the underlying entity.
    pub fn entity_key(&self) -> &str {
        match self {
            LayerItem::Region { shape, .. } => &shape.name,
            LayerItem::CoarsePrice(m) => &m.region,
            LayerItem::AreaPrice(m) => &m.sigungu,
            LayerItem::Listing(m) => &m.id,
            LayerItem::Building(m) => &m.house_manage_no,
            LayerItem::Realtime(m) => &m.house_manage_no,
        }
    }

    /// Detail-cache key for markers that show a hover preview.
    pub fn detail_key(&self) -> Option<&str> {
        match self {
            LayerItem::Building(m) => Some(&m.house_manage_no),
            LayerItem::Realtime(m) => Some(&m.house_manage_no),
            _ => None,
        }
    }
}
