//! Overlay descriptions built from dataset records.

use super::format::{format_area_price, format_price_eok, truncate_name, MARKER_NAME_CHARS};
use crate::dataset::LayerItem;
use crate::geo::LatLng;
use crate::layer::LayerKey;

/// Z-order applied to a marker while the pointer is over it.
pub const HOVER_Z_INDEX: i32 = 999_999;

const COARSE_REGION_Z: i32 = 50;
const FINE_REGION_Z: i32 = 100;
const AREA_PRICE_Z: i32 = 800;
const COARSE_PRICE_Z: i32 = 1_000;
const LISTING_Z: i32 = 0;
const BUILDING_Z: i32 = 5_000;
const REALTIME_Z: i32 = 10_000;

/// Visual category of an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    RegionShape,
    RegionPriceLabel,
    AreaPriceLabel,
    ListingLabel,
    BuildingMarker,
    RealtimeMarker,
}

/// Fractional anchor of the overlay box relative to its position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
}

impl Anchor {
    pub const CENTER: Anchor = Anchor { x: 0.5, y: 0.5 };
    pub const BOTTOM: Anchor = Anchor { x: 0.5, y: 1.0 };
}

/// Stroke and fill of a region polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeStyle {
    pub stroke_weight: f64,
    pub stroke_color: String,
    pub stroke_opacity: f64,
    pub fill_color: String,
    pub fill_opacity: f64,
}

impl ShapeStyle {
    pub fn coarse_region() -> Self {
        Self {
            stroke_weight: 2.5,
            stroke_color: "#1e40af".to_string(),
            stroke_opacity: 0.8,
            fill_color: "#3b82f6".to_string(),
            fill_opacity: 0.15,
        }
    }

    pub fn fine_region() -> Self {
        Self {
            stroke_weight: 1.5,
            stroke_color: "#2563eb".to_string(),
            stroke_opacity: 0.7,
            fill_color: "#3b82f6".to_string(),
            fill_opacity: 0.1,
        }
    }

    /// Style of a region under the pointer.
    pub fn highlighted(&self) -> Self {
        Self {
            stroke_weight: self.stroke_weight + 1.0,
            stroke_color: self.stroke_color.clone(),
            stroke_opacity: 0.9,
            fill_color: "#10b981".to_string(),
            fill_opacity: 0.35,
        }
    }
}

/// Surface-independent description of what an overlay shows.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayContent {
    pub kind: OverlayKind,
    pub title: String,
    pub subtitle: Option<String>,
    pub badge: Option<String>,
    pub z_index: i32,
    pub anchor: Anchor,
    /// Whether a click on this overlay selects something.
    pub clickable: bool,
    /// Whether hovering this overlay opens a detail preview.
    pub previewable: bool,
}

/// Everything the surface needs to construct one overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySpec {
    pub layer: LayerKey,
    pub position: LatLng,
    /// Polygon outline for region shapes.
    pub path: Option<Vec<LatLng>>,
    pub style: Option<ShapeStyle>,
    pub content: OverlayContent,
}

/// Builds the overlay description for one dataset item.
pub fn build_overlay(item: &LayerItem) -> OverlaySpec {
    let layer = item.layer();
    let position = item.position();

    let (content, path, style) = match item {
        LayerItem::Region { layer, shape } => {
            let (style, z_index, clickable) = match layer {
                LayerKey::FineRegion => (ShapeStyle::fine_region(), FINE_REGION_Z, true),
                _ => (ShapeStyle::coarse_region(), COARSE_REGION_Z, false),
            };
            let content = OverlayContent {
                kind: OverlayKind::RegionShape,
                title: shape.name.clone(),
                subtitle: None,
                badge: None,
                z_index,
                anchor: Anchor::CENTER,
                clickable,
                previewable: false,
            };
            (content, Some(shape.ring.clone()), Some(style))
        }
        LayerItem::CoarsePrice(m) => (
            OverlayContent {
                kind: OverlayKind::RegionPriceLabel,
                title: m.region.clone(),
                subtitle: Some(m.average_price.clone()),
                badge: None,
                z_index: COARSE_PRICE_Z,
                anchor: Anchor::CENTER,
                clickable: true,
                previewable: false,
            },
            None,
            None,
        ),
        LayerItem::AreaPrice(m) => (
            OverlayContent {
                kind: OverlayKind::AreaPriceLabel,
                title: m.sigungu.clone(),
                subtitle: Some(format_area_price(m.avg_price)),
                badge: Some(format!("{}개 단지", m.complex_count)),
                z_index: AREA_PRICE_Z,
                anchor: Anchor::CENTER,
                clickable: true,
                previewable: false,
            },
            None,
            None,
        ),
        LayerItem::Listing(m) => (
            OverlayContent {
                kind: OverlayKind::ListingLabel,
                title: m.district_label().to_string(),
                subtitle: Some(m.price.clone()),
                badge: None,
                z_index: LISTING_Z,
                anchor: Anchor::BOTTOM,
                clickable: true,
                previewable: false,
            },
            None,
            None,
        ),
        LayerItem::Building(m) => (
            OverlayContent {
                kind: OverlayKind::BuildingMarker,
                title: truncate_name(&m.house_name, MARKER_NAME_CHARS),
                subtitle: Some(format_price_eok(m.avg_price)),
                badge: None,
                z_index: BUILDING_Z,
                anchor: Anchor::BOTTOM,
                clickable: true,
                previewable: true,
            },
            None,
            None,
        ),
        LayerItem::Realtime(m) => (
            OverlayContent {
                kind: OverlayKind::RealtimeMarker,
                title: if m.house_name.is_empty() {
                    "매물".to_string()
                } else {
                    m.house_name.clone()
                },
                subtitle: m.address.clone(),
                badge: None,
                z_index: REALTIME_Z,
                anchor: Anchor { x: 0.15, y: 0.9 },
                clickable: true,
                previewable: true,
            },
            None,
            None,
        ),
    };

    OverlaySpec {
        layer,
        position,
        path,
        style,
        content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{AreaPriceMarker, BuildingMarker, PriceMarker, RegionShape};

    fn region(layer: LayerKey) -> LayerItem {
        LayerItem::Region {
            layer,
            shape: RegionShape {
                name: "Mapo-gu".into(),
                ring: vec![
                    LatLng::new(37.5, 126.9),
                    LatLng::new(37.5, 127.0),
                    LatLng::new(37.6, 127.0),
                ],
                label_position: LatLng::new(37.53, 126.97),
            },
        }
    }

    #[test]
    fn test_z_order_by_layer() {
        let coarse = build_overlay(&region(LayerKey::CoarseRegion));
        let fine = build_overlay(&region(LayerKey::FineRegion));
        let area = build_overlay(&LayerItem::AreaPrice(AreaPriceMarker {
            sigungu: "Mapo-gu".into(),
            avg_price: 98_000.0,
            complex_count: 7,
            lat: 37.55,
            lng: 126.9,
        }));
        let price = build_overlay(&LayerItem::CoarsePrice(PriceMarker {
            region: "Seoul".into(),
            average_price: "11.2억".into(),
            lat: 37.56,
            lng: 126.97,
        }));

        assert!(coarse.content.z_index < fine.content.z_index);
        assert!(fine.content.z_index < area.content.z_index);
        assert!(area.content.z_index < price.content.z_index);
        assert_eq!(area.content.subtitle.as_deref(), Some("9.8억원"));
        assert_eq!(area.content.badge.as_deref(), Some("7개 단지"));
    }

    #[test]
    fn test_only_fine_regions_are_clickable() {
        assert!(!build_overlay(&region(LayerKey::CoarseRegion)).content.clickable);
        let fine = build_overlay(&region(LayerKey::FineRegion));
        assert!(fine.content.clickable);
        assert_eq!(fine.path.as_ref().map(Vec::len), Some(3));
        assert_eq!(fine.position, LatLng::new(37.53, 126.97));
    }

    #[test]
    fn test_building_marker_label() {
        let spec = build_overlay(&LayerItem::Building(BuildingMarker {
            house_manage_no: "1".into(),
            house_name: "Riverside Park Tower".into(),
            avg_price: None,
            x: 127.0,
            y: 37.5,
        }));
        assert_eq!(spec.content.title, "Rivers");
        assert_eq!(spec.content.subtitle.as_deref(), Some("정보없음"));
        assert!(spec.content.previewable);
        assert_eq!(spec.content.anchor, Anchor::BOTTOM);
    }

    #[test]
    fn test_highlight_style() {
        let base = ShapeStyle::fine_region();
        let hot = base.highlighted();
        assert_eq!(hot.stroke_weight, 2.5);
        assert_eq!(hot.fill_color, "#10b981");
        assert_eq!(hot.stroke_color, base.stroke_color);
    }
}
