//! Overlay lifecycle manager.

use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::error::OverlayError;
use super::handle::{OverlayHandle, OverlayId, OverlayView};
use super::handlers::HandlerRegistry;
use super::highlight::RegionHighlight;
use super::selection::{handler_for, SelectionListener};
use crate::content::build_overlay;
use crate::dataset::LayerItem;
use crate::layer::{LayerKey, LayerSet};
use crate::render::{BatchScheduler, BatchSink, BatchTicket, RenderConfig, RenderProgress};
use crate::surface::{RenderSurface, SurfaceError};

#[derive(Default)]
struct LayerSlot {
    /// Ordered by id, which is creation order.
    handles: BTreeMap<OverlayId, OverlayHandle>,
    data_version: u64,
    shown: bool,
}

#[derive(Default)]
struct OverlayStore {
    layers: HashMap<LayerKey, LayerSlot>,
    index: HashMap<OverlayId, LayerKey>,
}

impl OverlayStore {
    fn handle_mut(&mut self, id: OverlayId) -> Option<(&mut OverlayHandle, bool)> {
        let layer = *self.index.get(&id)?;
        let slot = self.layers.get_mut(&layer)?;
        let shown = slot.shown;
        slot.handles.get_mut(&id).map(|h| (h, shown))
    }
}

/// Result of replacing a layer's dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerDataReport {
    pub layer: LayerKey,
    pub disposed: usize,
    pub created: usize,
    /// Items whose overlay could not be constructed.
    pub skipped: usize,
    pub data_version: u64,
}

/// How a `show` was carried out.
#[derive(Debug)]
pub enum ShowOutcome {
    /// Attached synchronously.
    Attached { attached: usize, failed: usize },
    /// Handed to the batch scheduler.
    Batched(BatchTicket),
}

impl ShowOutcome {
    /// Waits for a batched show to finish. Synchronous shows return at once.
    pub async fn wait(self) {
        if let ShowOutcome::Batched(ticket) = self {
            ticket.wait().await;
        }
    }
}

/// Owns every overlay handle, grouped by layer.
pub struct OverlayManager {
    surface: Arc<dyn RenderSurface>,
    scheduler: Arc<BatchScheduler>,
    render: RenderConfig,
    handlers: HandlerRegistry,
    listener: Arc<dyn SelectionListener>,
    highlight: RegionHighlight,
    store: Arc<Mutex<OverlayStore>>,
    next_id: AtomicU64,
}

impl OverlayManager {
    pub fn new(
        surface: Arc<dyn RenderSurface>,
        render: RenderConfig,
        highlight: RegionHighlight,
        listener: Arc<dyn SelectionListener>,
    ) -> Self {
        Self {
            surface,
            scheduler: Arc::new(BatchScheduler::new()),
            render,
            handlers: HandlerRegistry::new(),
            listener,
            highlight,
            store: Arc::new(Mutex::new(OverlayStore::default())),
            next_id: AtomicU64::new(1),
        }
    }

    /// Replaces the dataset of `layer`.
    ///
    /// Cancels the layer's batch, disposes its overlays and builds one
    /// detached handle per item.
    pub fn set_layer_data(&self, layer: LayerKey, items: Vec<LayerItem>) -> LayerDataReport {
        let mut store = self.store.lock();
        self.scheduler.reset(layer);

        let disposed = self.dispose_layer(&mut store, layer);

        let mut created = 0;
        let mut skipped = 0;
        let mut handles = BTreeMap::new();
        for item in items {
            if item.layer() != layer {
                warn!(layer = %layer, item_layer = %item.layer(), "Item does not belong to layer, skipping");
                skipped += 1;
                continue;
            }

            let spec = build_overlay(&item);
            let surface_id = match self.surface.create(&spec) {
                Ok(id) => id,
                Err(e) => {
                    warn!(layer = %layer, entity = item.entity_key(), error = %e, "Overlay construction failed, skipping");
                    skipped += 1;
                    continue;
                }
            };

            let id = OverlayId(self.next_id.fetch_add(1, Ordering::Relaxed));
            let subscription = handler_for(&item, &self.listener)
                .map(|handler| self.handlers.register(id, handler));

            handles.insert(
                id,
                OverlayHandle {
                    id,
                    layer,
                    position: spec.position,
                    content: spec.content,
                    attached: false,
                    surface_id,
                    item: Arc::new(item),
                    subscription,
                },
            );
            created += 1;
        }

        for id in handles.keys() {
            store.index.insert(*id, layer);
        }
        let slot = store.layers.entry(layer).or_default();
        slot.handles = handles;
        slot.shown = false;
        slot.data_version += 1;

        let report = LayerDataReport {
            layer,
            disposed,
            created,
            skipped,
            data_version: slot.data_version,
        };
        debug!(
            layer = %layer,
            created,
            skipped,
            disposed,
            data_version = report.data_version,
            "Layer data replaced"
        );
        report
    }

    /// Detaches and destroys every handle of `layer`. Caller holds the store.
    fn dispose_layer(&self, store: &mut OverlayStore, layer: LayerKey) -> usize {
        let Some(slot) = store.layers.get_mut(&layer) else {
            return 0;
        };
        let handles = std::mem::take(&mut slot.handles);
        slot.shown = false;

        let disposed = handles.len();
        for (id, handle) in handles {
            if handle.attached {
                if let Err(e) = self.surface.detach(handle.surface_id) {
                    warn!(overlay = %id, error = %e, "Detach during disposal failed");
                }
            }
            self.surface.destroy(handle.surface_id);
            store.index.remove(&id);
            if self.highlight.current() == Some(id) {
                self.highlight.reset();
            }
        }
        disposed
    }

    /// Attaches every handle of `layer`.
    ///
    /// Layers with a batch profile, or larger than the sync attach limit, are
    /// attached by the batch scheduler; the newest show wins.
    pub fn show(&self, layer: LayerKey) -> ShowOutcome {
        let mut store = self.store.lock();
        let Some(slot) = store.layers.get_mut(&layer) else {
            return ShowOutcome::Attached {
                attached: 0,
                failed: 0,
            };
        };
        slot.shown = true;

        let pending: Vec<OverlayId> = slot
            .handles
            .values()
            .filter(|h| !h.attached)
            .map(|h| h.id)
            .collect();
        let already_attached = slot.handles.len() - pending.len();

        match self.render.plan(layer, slot.handles.len()) {
            Some(profile) => {
                let sink = Arc::new(StoreSink {
                    store: Arc::clone(&self.store),
                    surface: Arc::clone(&self.surface),
                });
                ShowOutcome::Batched(self.scheduler.schedule(
                    layer,
                    pending,
                    already_attached,
                    profile,
                    sink,
                ))
            }
            None => {
                let mut attached = 0;
                let mut failed = 0;
                for id in pending {
                    let Some(handle) = slot.handles.get_mut(&id) else {
                        continue;
                    };
                    match self.surface.attach(handle.surface_id) {
                        Ok(()) => {
                            handle.attached = true;
                            attached += 1;
                        }
                        Err(e) => {
                            failed += 1;
                            warn!(layer = %layer, overlay = %id, error = %e, "Attach failed");
                        }
                    }
                }
                info!(layer = %layer, attached, "Layer shown");
                ShowOutcome::Attached { attached, failed }
            }
        }
    }

    /// Detaches every handle of `layer` without disposing it.
    ///
    /// Any running batch for the layer is cancelled first. Returns the number
    /// of handles detached.
    pub fn hide(&self, layer: LayerKey) -> usize {
        let mut store = self.store.lock();
        self.scheduler.reset(layer);

        let Some(slot) = store.layers.get_mut(&layer) else {
            return 0;
        };
        slot.shown = false;

        let mut detached = 0;
        for handle in slot.handles.values_mut().filter(|h| h.attached) {
            if let Err(e) = self.surface.detach(handle.surface_id) {
                warn!(layer = %layer, overlay = %handle.id, error = %e, "Detach failed");
            }
            handle.attached = false;
            detached += 1;
        }
        if layer.is_region() {
            self.highlight.reset();
        }
        info!(layer = %layer, detached, "Layer hidden");
        detached
    }

    /// Disposes every handle of every layer.
    pub fn teardown_all(&self) -> usize {
        let mut store = self.store.lock();
        self.scheduler.cancel_all();
        self.highlight.reset();

        let layers: Vec<LayerKey> = store.layers.keys().copied().collect();
        let disposed: usize = layers
            .into_iter()
            .map(|layer| self.dispose_layer(&mut store, layer))
            .sum();
        info!(disposed, "All overlays torn down");
        disposed
    }

    /// Fires the click handler of `id`. Returns false if it has none.
    pub fn dispatch_click(&self, id: OverlayId) -> bool {
        self.handlers.dispatch(id)
    }

    pub fn lookup(&self, id: OverlayId) -> Result<OverlayView, OverlayError> {
        let store = self.store.lock();
        store
            .index
            .get(&id)
            .and_then(|layer| store.layers.get(layer))
            .and_then(|slot| slot.handles.get(&id))
            .map(OverlayHandle::view)
            .ok_or(OverlayError::UnknownOverlay(id))
    }

    /// Views of every handle of `layer`, in creation order.
    pub fn handles(&self, layer: LayerKey) -> Vec<OverlayView> {
        self.store
            .lock()
            .layers
            .get(&layer)
            .map(|slot| slot.handles.values().map(OverlayHandle::view).collect())
            .unwrap_or_default()
    }

    pub fn handle_count(&self, layer: LayerKey) -> usize {
        self.store
            .lock()
            .layers
            .get(&layer)
            .map_or(0, |slot| slot.handles.len())
    }

    pub fn attached_count(&self, layer: LayerKey) -> usize {
        self.store
            .lock()
            .layers
            .get(&layer)
            .map_or(0, |slot| slot.handles.values().filter(|h| h.attached).count())
    }

    pub fn is_shown(&self, layer: LayerKey) -> bool {
        self.store
            .lock()
            .layers
            .get(&layer)
            .is_some_and(|slot| slot.shown)
    }

    /// Layers currently marked shown.
    pub fn shown_layers(&self) -> LayerSet {
        self.store
            .lock()
            .layers
            .iter()
            .filter(|(_, slot)| slot.shown)
            .map(|(layer, _)| *layer)
            .collect()
    }

    pub fn data_version(&self, layer: LayerKey) -> u64 {
        self.store
            .lock()
            .layers
            .get(&layer)
            .map_or(0, |slot| slot.data_version)
    }

    pub fn progress(&self, layer: LayerKey) -> RenderProgress {
        self.scheduler.progress(layer)
    }

    pub fn highlight(&self) -> &RegionHighlight {
        &self.highlight
    }

    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// Raises or restores the z-order of one overlay.
    pub fn set_z_index(&self, id: OverlayId, z_index: i32) -> Result<(), OverlayError> {
        let view = self.lookup(id)?;
        self.surface.set_z_index(view.surface_id, z_index)?;
        Ok(())
    }
}

/// Batch sink that attaches through the manager's store.
struct StoreSink {
    store: Arc<Mutex<OverlayStore>>,
    surface: Arc<dyn RenderSurface>,
}

impl BatchSink for StoreSink {
    fn attach(
        &self,
        _layer: LayerKey,
        id: OverlayId,
        cancel: &CancellationToken,
    ) -> Result<bool, SurfaceError> {
        let mut store = self.store.lock();
        if cancel.is_cancelled() {
            return Ok(false);
        }
        let Some((handle, shown)) = store.handle_mut(id) else {
            return Ok(false);
        };
        if !shown {
            return Ok(false);
        }
        if !handle.attached {
            self.surface.attach(handle.surface_id)?;
            handle.attached = true;
        }
        Ok(true)
    }
}
