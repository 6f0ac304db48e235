//! Region hover highlight with clear hysteresis.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::trace;

use super::handle::OverlayId;
use crate::geo::LatLng;
use crate::surface::{RenderSurface, SurfaceId};
use crate::timer::DebounceTimer;

#[derive(Default)]
struct HighlightState {
    active: Option<(OverlayId, SurfaceId)>,
    clear_timer: Option<DebounceTimer>,
    /// Bumped on every enter so a late timer cannot clear a newer highlight.
    seq: u64,
}

/// The single region highlight.
///
/// Leaving a region clears the highlight only after a short delay, so moving
/// straight into a neighbouring region never shows an unhighlighted frame.
#[derive(Clone)]
pub struct RegionHighlight {
    state: Arc<Mutex<HighlightState>>,
    surface: Arc<dyn RenderSurface>,
    hysteresis: Duration,
}

impl RegionHighlight {
    pub fn new(surface: Arc<dyn RenderSurface>, hysteresis: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(HighlightState::default())),
            surface,
            hysteresis,
        }
    }

    /// Highlights `id`, replacing any other highlight and cancelling a
    /// pending clear.
    pub fn enter(&self, id: OverlayId, surface_id: SurfaceId, label: &str, at: LatLng) {
        let mut state = self.state.lock();
        if let Some(mut timer) = state.clear_timer.take() {
            timer.cancel();
        }
        state.seq += 1;
        state.active = Some((id, surface_id));
        self.surface.set_highlight(surface_id, label, at);
        trace!(overlay = %id, label, "Region highlighted");
    }

    /// Schedules the highlight of `id` to clear after the hysteresis delay.
    ///
    /// Ignored if `id` is not the highlighted region.
    pub fn leave(&self, id: OverlayId) {
        let mut state = self.state.lock();
        if state.active.map(|(active, _)| active) != Some(id) {
            return;
        }

        let seq = state.seq;
        let weak: Weak<Mutex<HighlightState>> = Arc::downgrade(&self.state);
        let surface = Arc::clone(&self.surface);
        state.clear_timer = Some(DebounceTimer::start(self.hysteresis, move || {
            let Some(state) = weak.upgrade() else {
                return;
            };
            let mut state = state.lock();
            if state.seq == seq && state.active.map(|(active, _)| active) == Some(id) {
                state.active = None;
                state.clear_timer = None;
                surface.clear_highlight();
                trace!(overlay = %id, "Region highlight cleared");
            }
        }));
    }

    /// Clears immediately.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        if let Some(mut timer) = state.clear_timer.take() {
            timer.cancel();
        }
        state.seq += 1;
        if state.active.take().is_some() {
            self.surface.clear_highlight();
        }
    }

    pub fn current(&self) -> Option<OverlayId> {
        self.state.lock().active.map(|(id, _)| id)
    }

    pub fn is_clear_pending(&self) -> bool {
        self.state
            .lock()
            .clear_timer
            .as_ref()
            .is_some_and(DebounceTimer::is_armed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::build_overlay;
    use crate::dataset::{LayerItem, RegionShape};
    use crate::layer::LayerKey;
    use crate::surface::MemorySurface;

    fn setup() -> (Arc<MemorySurface>, RegionHighlight, SurfaceId, SurfaceId) {
        let surface = Arc::new(MemorySurface::new());
        let mut ids = Vec::new();
        for name in ["Mapo-gu", "Yongsan-gu"] {
            let spec = build_overlay(&LayerItem::Region {
                layer: LayerKey::FineRegion,
                shape: RegionShape {
                    name: name.into(),
                    ring: vec![],
                    label_position: LatLng::new(37.5, 127.0),
                },
            });
            ids.push(surface.create(&spec).unwrap());
        }
        let highlight = RegionHighlight::new(surface.clone(), Duration::from_millis(50));
        (surface, highlight, ids[0], ids[1])
    }

    #[tokio::test(start_paused = true)]
    async fn test_crossing_between_regions_never_clears() {
        let (surface, highlight, a, b) = setup();
        let at = LatLng::new(37.5, 127.0);

        highlight.enter(OverlayId(1), a, "Mapo-gu", at);
        highlight.leave(OverlayId(1));
        tokio::time::sleep(Duration::from_millis(10)).await;
        highlight.enter(OverlayId(2), b, "Yongsan-gu", at);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(highlight.current(), Some(OverlayId(2)));
        assert_eq!(surface.highlight().map(|(id, _)| id), Some(b));
    }

    #[tokio::test(start_paused = true)]
    async fn test_leave_clears_after_hysteresis() {
        let (surface, highlight, a, _) = setup();
        highlight.enter(OverlayId(1), a, "Mapo-gu", LatLng::new(37.5, 127.0));
        highlight.leave(OverlayId(1));
        assert!(highlight.is_clear_pending());

        tokio::time::sleep(Duration::from_millis(49)).await;
        assert!(surface.highlight().is_some());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(surface.highlight().is_none());
        assert_eq!(highlight.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reenter_same_region_cancels_clear() {
        let (surface, highlight, a, _) = setup();
        let at = LatLng::new(37.5, 127.0);
        highlight.enter(OverlayId(1), a, "Mapo-gu", at);
        highlight.leave(OverlayId(1));
        highlight.enter(OverlayId(1), a, "Mapo-gu", at);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(surface.highlight().map(|(id, _)| id), Some(a));
    }

    #[tokio::test]
    async fn test_leave_of_other_region_is_ignored() {
        let (_surface, highlight, a, _) = setup();
        highlight.enter(OverlayId(1), a, "Mapo-gu", LatLng::new(37.5, 127.0));
        highlight.leave(OverlayId(7));
        assert!(!highlight.is_clear_pending());
        highlight.reset();
        assert_eq!(highlight.current(), None);
    }
}
