//! Click selection callbacks.

use std::sync::Arc;
use tracing::info;

use super::handlers::SelectionHandler;
use crate::dataset::{AreaPriceMarker, BuildingMarker, LayerItem, ListingMarker, RealtimeMarker};
use crate::layer::LayerKey;

/// An individually selectable entity.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectedEntity {
    Listing(ListingMarker),
    Building(BuildingMarker),
    Realtime(RealtimeMarker),
}

impl SelectedEntity {
    pub fn key(&self) -> &str {
        match self {
            SelectedEntity::Listing(m) => &m.id,
            SelectedEntity::Building(m) => &m.house_manage_no,
            SelectedEntity::Realtime(m) => &m.house_manage_no,
        }
    }
}

/// Receives confirmed (click) selections. Never called on hover.
pub trait SelectionListener: Send + Sync {
    fn on_marker_selected(&self, entity: &SelectedEntity);

    fn on_region_selected(&self, region: &str);

    fn on_aggregate_marker_selected(&self, marker: &AreaPriceMarker);
}

/// Listener that only logs selections.
#[derive(Debug, Default)]
pub struct TracingSelectionListener;

impl SelectionListener for TracingSelectionListener {
    fn on_marker_selected(&self, entity: &SelectedEntity) {
        info!(entity = entity.key(), "Marker selected");
    }

    fn on_region_selected(&self, region: &str) {
        info!(region, "Region selected");
    }

    fn on_aggregate_marker_selected(&self, marker: &AreaPriceMarker) {
        info!(region = %marker.sigungu, "Aggregate marker selected");
    }
}

/// Builds the click handler for an item, or `None` if clicks on it select
/// nothing.
pub fn handler_for(
    item: &LayerItem,
    listener: &Arc<dyn SelectionListener>,
) -> Option<SelectionHandler> {
    let listener = Arc::clone(listener);
    let handler: SelectionHandler = match item {
        LayerItem::Region { layer, shape } => {
            if *layer != LayerKey::FineRegion {
                return None;
            }
            let name = shape.name.clone();
            Arc::new(move || listener.on_region_selected(&name))
        }
        LayerItem::CoarsePrice(m) => {
            let region = m.region.clone();
            Arc::new(move || listener.on_region_selected(&region))
        }
        LayerItem::AreaPrice(m) => {
            let marker = m.clone();
            Arc::new(move || listener.on_aggregate_marker_selected(&marker))
        }
        LayerItem::Listing(m) => {
            let entity = SelectedEntity::Listing(m.clone());
            Arc::new(move || listener.on_marker_selected(&entity))
        }
        LayerItem::Building(m) => {
            let entity = SelectedEntity::Building(m.clone());
            Arc::new(move || listener.on_marker_selected(&entity))
        }
        LayerItem::Realtime(m) => {
            let entity = SelectedEntity::Realtime(m.clone());
            Arc::new(move || listener.on_marker_selected(&entity))
        }
    };
    Some(handler)
}
