//! Hover preview coordinator.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{debug, trace, warn};

use super::placement::{place_popup, PopupSize};
use super::session::{HoverSession, HoverState, HoverTarget};
use crate::content::popup_body;
use crate::detail::{DetailCache, DetailPayload};
use crate::overlay::OverlayId;
use crate::surface::{PopupSpec, RenderSurface};
use crate::timer::DebounceTimer;

/// Default delay before hiding a popup after the pointer leaves its marker.
pub const DEFAULT_HIDE_DEBOUNCE: Duration = Duration::from_millis(400);

/// Default delay before hiding a popup after the pointer leaves the popup.
pub const DEFAULT_POPUP_HIDE_DEBOUNCE: Duration = Duration::from_millis(300);

/// Default delay before clearing a region highlight.
pub const DEFAULT_HIGHLIGHT_HYSTERESIS: Duration = Duration::from_millis(50);

/// Hover timing and popup geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverConfig {
    pub hide_debounce: Duration,
    pub popup_hide_debounce: Duration,
    pub highlight_hysteresis: Duration,
    pub popup_size: PopupSize,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            hide_debounce: DEFAULT_HIDE_DEBOUNCE,
            popup_hide_debounce: DEFAULT_POPUP_HIDE_DEBOUNCE,
            highlight_hysteresis: DEFAULT_HIGHLIGHT_HYSTERESIS,
            popup_size: PopupSize::default(),
        }
    }
}

struct Inner {
    sessions: Mutex<HashMap<OverlayId, HoverSession>>,
    cache: Arc<DetailCache>,
    surface: Arc<dyn RenderSurface>,
    config: HoverConfig,
    seq: AtomicU64,
}

/// Drives hover sessions for previewable markers.
#[derive(Clone)]
pub struct HoverCoordinator {
    inner: Arc<Inner>,
}

impl HoverCoordinator {
    pub fn new(
        cache: Arc<DetailCache>,
        surface: Arc<dyn RenderSurface>,
        config: HoverConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                sessions: Mutex::new(HashMap::new()),
                cache,
                surface,
                config,
                seq: AtomicU64::new(1),
            }),
        }
    }

    pub fn config(&self) -> &HoverConfig {
        &self.inner.config
    }

    /// Pointer entered a marker.
    ///
    /// Starts a session and fetches the marker's detail, or cancels a pending
    /// hide if the marker's popup is still open.
    pub fn pointer_enter(&self, target: HoverTarget) {
        let marker = target.marker;
        let mut sessions = self.inner.sessions.lock();

        if let Some(session) = sessions.get_mut(&marker) {
            if session.state == HoverState::PendingHide {
                session.cancel_timer();
                session.state = HoverState::Shown;
                trace!(marker = %marker, "Pending hide cancelled by re-entry");
            }
            return;
        }

        let seq = self.inner.next_seq();
        let key = target.detail_key.clone();
        let class = target.class;
        sessions.insert(marker, HoverSession::new(target, seq));
        drop(sessions);

        debug!(marker = %marker, key = %key, "Hover preview requested");
        let weak = Arc::downgrade(&self.inner);
        let cache = Arc::clone(&self.inner.cache);
        tokio::spawn(async move {
            let payload = cache.get_or_placeholder(&key, class).await;
            if let Some(inner) = weak.upgrade() {
                inner.resolve(marker, seq, &payload);
            }
        });
    }

    /// Pointer left a marker.
    pub fn pointer_leave(&self, marker: OverlayId) {
        let delay = self.inner.config.hide_debounce;
        self.inner.leave(marker, delay);
    }

    /// Pointer entered the popup of `marker`.
    pub fn popup_enter(&self, marker: OverlayId) {
        let mut sessions = self.inner.sessions.lock();
        if let Some(session) = sessions.get_mut(&marker) {
            if session.state == HoverState::PendingHide {
                session.cancel_timer();
                session.state = HoverState::Shown;
            }
        }
    }

    /// Pointer left the popup of `marker`.
    pub fn popup_leave(&self, marker: OverlayId) {
        let delay = self.inner.config.popup_hide_debounce;
        self.inner.leave(marker, delay);
    }

    /// Closes the popup of `marker` immediately.
    pub fn dismiss(&self, marker: OverlayId) {
        let mut sessions = self.inner.sessions.lock();
        if let Some(session) = sessions.remove(&marker) {
            self.inner.close(session);
        }
    }

    /// Ends every session.
    pub fn close_all(&self) {
        let mut sessions = self.inner.sessions.lock();
        for (_, session) in sessions.drain() {
            self.inner.close(session);
        }
    }

    pub fn state(&self, marker: OverlayId) -> HoverState {
        self.inner
            .sessions
            .lock()
            .get(&marker)
            .map_or(HoverState::Idle, |s| s.state)
    }

    /// Marker whose popup is currently open.
    pub fn shown_popup(&self) -> Option<OverlayId> {
        self.inner
            .sessions
            .lock()
            .values()
            .find(|s| s.has_popup())
            .map(|s| s.target.marker)
    }

    pub fn open_popup_count(&self) -> usize {
        self.inner
            .sessions
            .lock()
            .values()
            .filter(|s| s.has_popup())
            .count()
    }

    pub fn session_count(&self) -> usize {
        self.inner.sessions.lock().len()
    }
}

impl Inner {
    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }

    /// Opens the popup once the detail arrives, if the session still wants it.
    fn resolve(self: &Arc<Self>, marker: OverlayId, seq: u64, payload: &DetailPayload) {
        let mut sessions = self.sessions.lock();
        match sessions.get(&marker) {
            Some(s) if s.seq == seq && s.state == HoverState::PendingShow => {}
            _ => {
                trace!(marker = %marker, "Discarding stale hover resolution");
                return;
            }
        }

        let others: Vec<OverlayId> = sessions
            .iter()
            .filter(|(id, s)| **id != marker && s.has_popup())
            .map(|(id, _)| *id)
            .collect();
        for id in others {
            if let Some(session) = sessions.remove(&id) {
                debug!(marker = %id, "Force-closing popup for newer preview");
                self.close(session);
            }
        }

        let Some(session) = sessions.get_mut(&marker) else {
            return;
        };
        let viewport = self.surface.viewport_size();
        let anchor = self
            .surface
            .screen_bounds(session.target.surface_id)
            .unwrap_or_else(|| viewport.center_rect());
        let spec = PopupSpec {
            key: session.target.detail_key.clone(),
            placement: place_popup(anchor, viewport, &self.config.popup_size),
            body: popup_body(&session.target.title, payload),
        };

        match self.surface.open_popup(&spec) {
            Ok(popup) => {
                session.popup = Some(popup);
                session.state = HoverState::Shown;
                debug!(
                    marker = %marker,
                    placeholder = spec.body.is_unavailable(),
                    "Hover popup shown"
                );
            }
            Err(e) => {
                warn!(marker = %marker, error = %e, "Failed to open hover popup");
                sessions.remove(&marker);
            }
        }
    }

    fn leave(self: &Arc<Self>, marker: OverlayId, delay: Duration) {
        let mut sessions = self.sessions.lock();
        let Some(session) = sessions.get_mut(&marker) else {
            return;
        };

        match session.state {
            HoverState::PendingShow => {
                // Left before the detail arrived: nothing to show.
                sessions.remove(&marker);
                trace!(marker = %marker, "Hover abandoned before show");
            }
            HoverState::Shown => {
                let seq = self.next_seq();
                session.seq = seq;
                session.state = HoverState::PendingHide;
                let weak: Weak<Inner> = Arc::downgrade(self);
                session.timer = Some(DebounceTimer::start(delay, move || {
                    if let Some(inner) = weak.upgrade() {
                        inner.expire(marker, seq);
                    }
                }));
            }
            HoverState::PendingHide | HoverState::Idle => {}
        }
    }

    /// Hide debounce elapsed.
    fn expire(&self, marker: OverlayId, seq: u64) {
        let mut sessions = self.sessions.lock();
        let current = sessions
            .get(&marker)
            .is_some_and(|s| s.seq == seq && s.state == HoverState::PendingHide);
        if current {
            if let Some(session) = sessions.remove(&marker) {
                self.close(session);
                trace!(marker = %marker, "Hover popup hidden");
            }
        }
    }

    fn close(&self, mut session: HoverSession) {
        session.cancel_timer();
        if let Some(popup) = session.popup.take() {
            self.surface.close_popup(popup);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detail::{CacheTtls, DataClass, StaticDetailFetcher};
    use crate::geo::ScreenRect;
    use crate::hover::Placement;
    use crate::surface::{MemorySurface, SurfaceId};

    const FETCH_DELAY: Duration = Duration::from_millis(20);

    struct Fixture {
        surface: Arc<MemorySurface>,
        fetcher: Arc<StaticDetailFetcher>,
        hover: HoverCoordinator,
    }

    fn fixture() -> Fixture {
        let surface = Arc::new(MemorySurface::new());
        let fetcher = Arc::new(
            StaticDetailFetcher::new(["a", "b"].map(|k| DetailPayload {
                entity_key: k.to_string(),
                house_name: format!("House {}", k),
                ..Default::default()
            }))
            .with_delay(FETCH_DELAY),
        );
        let cache = Arc::new(DetailCache::new(fetcher.clone(), CacheTtls::default()));
        let hover = HoverCoordinator::new(cache, surface.clone(), HoverConfig::default());
        Fixture {
            surface,
            fetcher,
            hover,
        }
    }

    fn target(marker: u64, key: &str) -> HoverTarget {
        HoverTarget {
            marker: OverlayId(marker),
            surface_id: SurfaceId(marker),
            detail_key: key.to_string(),
            title: format!("Marker {}", marker),
            class: DataClass::Detail,
        }
    }

    async fn settle() {
        tokio::time::sleep(FETCH_DELAY + Duration::from_millis(1)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_shows_popup_after_fetch() {
        let f = fixture();
        f.hover.pointer_enter(target(1, "a"));
        assert_eq!(f.hover.state(OverlayId(1)), HoverState::PendingShow);
        assert_eq!(f.surface.popup_count(), 0);

        settle().await;
        assert_eq!(f.hover.state(OverlayId(1)), HoverState::Shown);
        assert_eq!(f.hover.shown_popup(), Some(OverlayId(1)));
        let popups = f.surface.open_popups();
        assert_eq!(popups.len(), 1);
        assert_eq!(popups[0].key, "a");
        assert_eq!(popups[0].body.title(), "House a");
    }

    #[tokio::test(start_paused = true)]
    async fn test_reenter_within_debounce_never_hides() {
        let f = fixture();
        f.hover.pointer_enter(target(1, "a"));
        settle().await;

        f.hover.pointer_leave(OverlayId(1));
        assert_eq!(f.hover.state(OverlayId(1)), HoverState::PendingHide);
        tokio::time::sleep(Duration::from_millis(200)).await;
        f.hover.pointer_enter(target(1, "a"));
        assert_eq!(f.hover.state(OverlayId(1)), HoverState::Shown);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(f.hover.state(OverlayId(1)), HoverState::Shown);
        assert_eq!(f.surface.popups_opened(), 1);
        assert_eq!(f.fetcher.calls_for("a"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hide_after_debounce() {
        let f = fixture();
        f.hover.pointer_enter(target(1, "a"));
        settle().await;

        f.hover.pointer_leave(OverlayId(1));
        tokio::time::sleep(Duration::from_millis(399)).await;
        assert_eq!(f.hover.state(OverlayId(1)), HoverState::PendingHide);
        assert_eq!(f.surface.popup_count(), 1);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(f.hover.state(OverlayId(1)), HoverState::Idle);
        assert_eq!(f.surface.popup_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_moving_onto_popup_keeps_it_open() {
        let f = fixture();
        f.hover.pointer_enter(target(1, "a"));
        settle().await;

        f.hover.pointer_leave(OverlayId(1));
        tokio::time::sleep(Duration::from_millis(100)).await;
        f.hover.popup_enter(OverlayId(1));
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(f.hover.state(OverlayId(1)), HoverState::Shown);

        f.hover.popup_leave(OverlayId(1));
        tokio::time::sleep(Duration::from_millis(301)).await;
        assert_eq!(f.hover.state(OverlayId(1)), HoverState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_marker_closes_first_popup() {
        let f = fixture();
        f.hover.pointer_enter(target(1, "a"));
        settle().await;
        f.hover.pointer_leave(OverlayId(1));

        f.hover.pointer_enter(target(2, "b"));
        settle().await;

        assert_eq!(f.surface.popup_count(), 1);
        assert_eq!(f.surface.open_popups()[0].key, "b");
        assert_eq!(f.hover.state(OverlayId(1)), HoverState::Idle);
        assert_eq!(f.hover.state(OverlayId(2)), HoverState::Shown);
        assert_eq!(f.hover.open_popup_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_leave_before_fetch_shows_nothing() {
        let f = fixture();
        f.hover.pointer_enter(target(1, "a"));
        f.hover.pointer_leave(OverlayId(1));
        assert_eq!(f.hover.state(OverlayId(1)), HoverState::Idle);

        settle().await;
        assert_eq!(f.surface.popups_opened(), 0);
        // The fetch still completed and warmed the cache.
        assert_eq!(f.fetcher.calls_for("a"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_fetch_shows_placeholder() {
        let f = fixture();
        f.hover.pointer_enter(target(3, "missing"));
        settle().await;

        let popups = f.surface.open_popups();
        assert_eq!(popups.len(), 1);
        assert!(popups[0].body.is_unavailable());
        assert_eq!(popups[0].body.title(), "Marker 3");
    }

    #[tokio::test(start_paused = true)]
    async fn test_popup_positioned_from_marker_bounds() {
        let f = fixture();
        f.surface
            .set_bounds(SurfaceId(1), ScreenRect::new(620.0, 60.0, 660.0, 100.0));
        f.hover.pointer_enter(target(1, "a"));
        settle().await;

        let placement = f.surface.open_popups()[0].placement;
        assert_eq!(placement.placement, Placement::Below);
        assert_eq!(placement.left, 480.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_and_close_all() {
        let f = fixture();
        f.hover.pointer_enter(target(1, "a"));
        settle().await;
        f.hover.dismiss(OverlayId(1));
        assert_eq!(f.surface.popup_count(), 0);

        f.hover.pointer_enter(target(2, "b"));
        settle().await;
        f.hover.close_all();
        assert_eq!(f.hover.session_count(), 0);
        assert_eq!(f.surface.popup_count(), 0);
    }
}
