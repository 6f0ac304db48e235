//! Overlay handles.

use std::fmt;
use std::sync::Arc;

use super::handlers::Subscription;
use crate::content::OverlayContent;
use crate::dataset::LayerItem;
use crate::geo::LatLng;
use crate::layer::LayerKey;
use crate::surface::SurfaceId;

/// Engine-side identifier of an overlay. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(pub u64);

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "o{}", self.0)
    }
}

/// One rendered primitive.
///
/// Dropping the handle releases its click subscription.
#[derive(Debug)]
pub struct OverlayHandle {
    pub id: OverlayId,
    pub layer: LayerKey,
    pub position: LatLng,
    pub content: OverlayContent,
    pub attached: bool,
    pub surface_id: SurfaceId,
    pub item: Arc<LayerItem>,
    pub(crate) subscription: Option<Subscription>,
}

impl OverlayHandle {
    pub fn view(&self) -> OverlayView {
        OverlayView {
            id: self.id,
            layer: self.layer,
            position: self.position,
            content: self.content.clone(),
            attached: self.attached,
            surface_id: self.surface_id,
            item: Arc::clone(&self.item),
        }
    }
}

/// Read-only copy of a handle's state.
#[derive(Debug, Clone)]
pub struct OverlayView {
    pub id: OverlayId,
    pub layer: LayerKey,
    pub position: LatLng,
    pub content: OverlayContent,
    pub attached: bool,
    pub surface_id: SurfaceId,
    pub item: Arc<LayerItem>,
}
