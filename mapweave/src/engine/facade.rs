//! The map engine.

use parking_lot::Mutex;
use std::path::Path;
use std::sync::{Arc, Weak};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use super::config::EngineConfig;
use super::error::EngineError;
use super::events::{LayerUpdate, PointerEvent, PopupEvent, VisibilityChange};
use crate::content::HOVER_Z_INDEX;
use crate::dataset::{DatasetBundle, LayerItem};
use crate::detail::{DataClass, DetailCache, DetailFetcher};
use crate::hover::{HoverCoordinator, HoverTarget};
use crate::layer::{DataMode, LayerKey, LayerRegistry, LayerSet};
use crate::overlay::{
    OverlayId, OverlayManager, OverlayView, RegionHighlight, SelectionListener, ShowOutcome,
};
use crate::surface::RenderSurface;
use crate::viewport::{Camera, TransitionController, ZoomDebouncer};

#[derive(Debug, Default)]
struct ViewState {
    zoom: Option<u32>,
    mode: DataMode,
    panel_open: bool,
    /// Layers the last recompute decided should be visible.
    visible: LayerSet,
}

struct EngineInner {
    config: EngineConfig,
    registry: LayerRegistry,
    overlays: OverlayManager,
    cache: Arc<DetailCache>,
    hover: HoverCoordinator,
    view: Mutex<ViewState>,
    zoom_debouncer: ZoomDebouncer,
    transition: Mutex<Option<Arc<TransitionController>>>,
    shutdown: CancellationToken,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for EngineInner {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Viewport-adaptive overlay engine.
///
/// Cheap to clone; clones share the same engine.
#[derive(Clone)]
pub struct MapEngine {
    inner: Arc<EngineInner>,
}

impl MapEngine {
    /// Builds an engine drawing on `surface` and fetching details through
    /// `fetcher`.
    ///
    /// The cache sweeper is started only when a tokio runtime is available.
    pub fn new(
        config: EngineConfig,
        surface: Arc<dyn RenderSurface>,
        fetcher: Arc<dyn DetailFetcher>,
        listener: Arc<dyn SelectionListener>,
    ) -> Self {
        let cache = Arc::new(DetailCache::new(fetcher, config.ttls));
        let highlight =
            RegionHighlight::new(Arc::clone(&surface), config.hover.highlight_hysteresis);
        let overlays = OverlayManager::new(
            Arc::clone(&surface),
            config.render.clone(),
            highlight,
            listener,
        );
        let hover = HoverCoordinator::new(Arc::clone(&cache), surface, config.hover);

        let inner = Arc::new_cyclic(|weak: &Weak<EngineInner>| {
            let weak = weak.clone();
            let zoom_debouncer = ZoomDebouncer::new(
                config.zoom_debounce,
                Arc::new(move |zoom| {
                    if let Some(inner) = weak.upgrade() {
                        MapEngine { inner }.recompute(zoom);
                    }
                }),
            );
            EngineInner {
                registry: LayerRegistry::new(config.thresholds),
                overlays,
                cache,
                hover,
                view: Mutex::new(ViewState::default()),
                zoom_debouncer,
                transition: Mutex::new(None),
                shutdown: CancellationToken::new(),
                sweeper: Mutex::new(None),
                config,
            }
        });

        let engine = Self { inner };
        engine.start_sweeper();
        engine
    }

    fn start_sweeper(&self) {
        let Some(interval) = self.inner.config.sweep_interval else {
            return;
        };
        if tokio::runtime::Handle::try_current().is_err() {
            warn!("No async runtime, detail cache sweeper not started");
            return;
        }
        let handle = self
            .inner
            .cache
            .spawn_sweeper(interval, self.inner.shutdown.child_token());
        *self.inner.sweeper.lock() = Some(handle);
        debug!(interval_secs = interval.as_secs(), "Detail cache sweeper started");
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    pub fn registry(&self) -> &LayerRegistry {
        &self.inner.registry
    }

    pub fn overlays(&self) -> &OverlayManager {
        &self.inner.overlays
    }

    pub fn cache(&self) -> &Arc<DetailCache> {
        &self.inner.cache
    }

    pub fn hover(&self) -> &HoverCoordinator {
        &self.inner.hover
    }

    /// Replaces every layer's data from a loaded bundle.
    pub fn load_bundle(&self, bundle: &DatasetBundle) -> Vec<LayerUpdate> {
        LayerKey::ALL
            .into_iter()
            .map(|layer| self.set_layer_data(layer, bundle.items_for(layer)))
            .collect()
    }

    /// Loads a dataset directory and replaces every layer's data.
    pub fn load_dir(&self, dir: &Path) -> Result<Vec<LayerUpdate>, EngineError> {
        let bundle = DatasetBundle::load_dir(dir)?;
        Ok(self.load_bundle(&bundle))
    }

    /// Replaces one layer's data, re-showing it if it is currently visible.
    pub fn set_layer_data(&self, layer: LayerKey, items: Vec<LayerItem>) -> LayerUpdate {
        let view = self.inner.view.lock();
        if is_previewable(layer) {
            self.inner.hover.close_all();
        }
        let report = self.inner.overlays.set_layer_data(layer, items);
        let show = view
            .visible
            .contains(&layer)
            .then(|| self.inner.overlays.show(layer));
        LayerUpdate { report, show }
    }

    /// Recomputes which layers are visible for the given camera state.
    ///
    /// Only layers entering or leaving the visible set are touched, so
    /// repeating a call with the same state does nothing.
    pub fn apply_viewport(&self, zoom: u32, mode: DataMode) -> VisibilityChange {
        let inner = &self.inner;
        let mut view = inner.view.lock();

        let mut visible = inner.registry.visible(zoom, mode);
        if view.panel_open && view.visible.contains(&LayerKey::Realtime) {
            visible.insert(LayerKey::Realtime);
        }
        let hidden: LayerSet = view.visible.difference(&visible).copied().collect();
        let shown: LayerSet = visible.difference(&view.visible).copied().collect();

        for layer in &hidden {
            inner.overlays.hide(*layer);
        }
        if hidden.iter().copied().any(is_previewable) {
            inner.hover.close_all();
        }

        let mut batches = Vec::new();
        for layer in &shown {
            if let ShowOutcome::Batched(ticket) = inner.overlays.show(*layer) {
                batches.push(ticket);
            }
        }

        view.zoom = Some(zoom);
        view.mode = mode;
        view.visible = visible.clone();

        if shown.is_empty() && hidden.is_empty() {
            trace!(zoom, mode = %mode, "Visibility unchanged");
        } else {
            info!(
                zoom,
                mode = %mode,
                shown = ?shown,
                hidden = ?hidden,
                "Layer visibility changed"
            );
        }

        VisibilityChange {
            zoom,
            mode,
            visible,
            shown,
            hidden,
            batches,
        }
    }

    /// Switches data mode, recomputing visibility if the zoom is known.
    pub fn set_mode(&self, mode: DataMode) -> Option<VisibilityChange> {
        let zoom = {
            let mut view = self.inner.view.lock();
            view.mode = mode;
            view.zoom
        };
        zoom.map(|zoom| self.apply_viewport(zoom, mode))
    }

    /// Opens or closes the side panel.
    ///
    /// While it is open the real-time layer stays attached across
    /// recomputes. Closing it recomputes visibility so the pin is released.
    pub fn set_panel_open(&self, open: bool) -> Option<VisibilityChange> {
        let (zoom, mode) = {
            let mut view = self.inner.view.lock();
            view.panel_open = open;
            (view.zoom, view.mode)
        };
        debug!(open, "Side panel toggled");
        if open {
            return None;
        }
        zoom.map(|zoom| self.apply_viewport(zoom, mode))
    }

    pub fn zoom(&self) -> Option<u32> {
        self.inner.view.lock().zoom
    }

    pub fn mode(&self) -> DataMode {
        self.inner.view.lock().mode
    }

    pub fn is_panel_open(&self) -> bool {
        self.inner.view.lock().panel_open
    }

    /// Layers the engine currently keeps visible.
    pub fn visible_layers(&self) -> LayerSet {
        self.inner.view.lock().visible.clone()
    }

    /// Routes pointer activity over an overlay.
    ///
    /// Region shapes drive the highlight, previewable markers drive hover
    /// previews, and clicks fire the overlay's selection handler.
    pub fn pointer_event(&self, id: OverlayId, event: PointerEvent) -> Result<(), EngineError> {
        let inner = &self.inner;
        let view = inner.overlays.lookup(id)?;

        match event {
            PointerEvent::Click => {
                let handled = inner.overlays.dispatch_click(id);
                trace!(overlay = %id, handled, "Click dispatched");
            }
            PointerEvent::Enter if view.layer.is_region() => {
                inner.overlays.highlight().enter(
                    id,
                    view.surface_id,
                    &view.content.title,
                    view.position,
                );
            }
            PointerEvent::Leave if view.layer.is_region() => {
                inner.overlays.highlight().leave(id);
            }
            PointerEvent::Enter if view.content.previewable => {
                self.raise(&view, HOVER_Z_INDEX);
                if let Some(target) = hover_target(&view) {
                    inner.hover.pointer_enter(target);
                }
            }
            PointerEvent::Leave if view.content.previewable => {
                self.raise(&view, view.content.z_index);
                inner.hover.pointer_leave(id);
            }
            PointerEvent::Enter | PointerEvent::Leave => {}
        }
        Ok(())
    }

    fn raise(&self, view: &OverlayView, z_index: i32) {
        if let Err(e) = self.inner.overlays.set_z_index(view.id, z_index) {
            warn!(overlay = %view.id, z_index, error = %e, "Failed to change z-order");
        }
    }

    /// Routes pointer activity over the popup opened for `marker`.
    pub fn popup_event(&self, marker: OverlayId, event: PopupEvent) {
        let hover = &self.inner.hover;
        match event {
            PopupEvent::Enter => hover.popup_enter(marker),
            PopupEvent::Leave => hover.popup_leave(marker),
            PopupEvent::Close => hover.dismiss(marker),
        }
    }

    /// Binds the map camera and returns the controller for programmatic
    /// moves. Each settled transition recomputes visibility once.
    pub fn attach_camera(&self, camera: Arc<dyn Camera>) -> Arc<TransitionController> {
        let weak = Arc::downgrade(&self.inner);
        let controller = Arc::new(TransitionController::new(
            camera,
            self.inner.config.transition,
            Arc::new(move |zoom| {
                if let Some(inner) = weak.upgrade() {
                    MapEngine { inner }.recompute(zoom);
                }
            }),
        ));
        if let Some(previous) = self
            .inner
            .transition
            .lock()
            .replace(Arc::clone(&controller))
        {
            previous.cancel();
        }
        controller
    }

    /// Reports a zoom change made by the user on the map.
    ///
    /// Ignored while a programmatic transition is running; that transition
    /// recomputes once when it settles.
    pub fn camera_zoom_changed(&self, zoom: u32) {
        let transitioning = self
            .inner
            .transition
            .lock()
            .as_ref()
            .is_some_and(|t| t.is_transitioning());
        if transitioning {
            trace!(zoom, "Zoom change during transition ignored");
            return;
        }
        self.inner.zoom_debouncer.zoom_changed(zoom);
    }

    fn recompute(&self, zoom: u32) {
        let mode = self.mode();
        self.apply_viewport(zoom, mode);
    }

    /// Stops background work and disposes every overlay.
    pub fn teardown(&self) -> usize {
        let inner = &self.inner;
        inner.shutdown.cancel();
        if let Some(handle) = inner.sweeper.lock().take() {
            handle.abort();
        }
        inner.zoom_debouncer.cancel();
        if let Some(controller) = inner.transition.lock().take() {
            controller.cancel();
        }
        inner.hover.close_all();

        let mut view = inner.view.lock();
        let disposed = inner.overlays.teardown_all();
        view.visible.clear();
        inner.cache.log_stats();
        info!(disposed, "Engine torn down");
        disposed
    }
}

fn is_previewable(layer: LayerKey) -> bool {
    matches!(layer, LayerKey::BuildingMarkers | LayerKey::Realtime)
}

fn hover_target(view: &OverlayView) -> Option<HoverTarget> {
    let key = view.item.detail_key()?;
    let class = match view.layer {
        LayerKey::Realtime => DataClass::Snapshot,
        _ => DataClass::Detail,
    };
    Some(HoverTarget {
        marker: view.id,
        surface_id: view.surface_id,
        detail_key: key.to_string(),
        title: view.content.title.clone(),
        class,
    })
}
