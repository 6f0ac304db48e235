//! In-memory recording surface.

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

use super::{PopupId, PopupSpec, RenderSurface, SurfaceError, SurfaceId};
use crate::content::OverlaySpec;
use crate::geo::{LatLng, ScreenRect, ScreenSize};
use crate::layer::LayerKey;

const DEFAULT_VIEWPORT: ScreenSize = ScreenSize::new(1280.0, 800.0);

/// An overlay as recorded by [`MemorySurface`].
#[derive(Debug, Clone)]
pub struct MemoryOverlay {
    pub spec: OverlaySpec,
    pub attached: bool,
    pub z_index: i32,
}

#[derive(Default)]
struct MemoryState {
    next_overlay: u64,
    next_popup: u64,
    overlays: HashMap<SurfaceId, MemoryOverlay>,
    popups: HashMap<PopupId, PopupSpec>,
    highlight: Option<(SurfaceId, String, LatLng)>,
    bounds: HashMap<SurfaceId, ScreenRect>,
    fail_create: HashSet<String>,
    fail_attach: HashSet<String>,
    attach_calls: u64,
    detach_calls: u64,
    destroyed: u64,
    popups_opened: u64,
}

/// Records every surface call so tests and the simulator can inspect them.
pub struct MemorySurface {
    viewport: ScreenSize,
    state: Mutex<MemoryState>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::with_viewport(DEFAULT_VIEWPORT)
    }

    pub fn with_viewport(viewport: ScreenSize) -> Self {
        Self {
            viewport,
            state: Mutex::new(MemoryState::default()),
        }
    }

    /// Makes `create` fail for overlays titled `title`.
    pub fn fail_creation_for(&self, title: &str) {
        self.state.lock().fail_create.insert(title.to_string());
    }

    /// Makes `attach` fail for overlays titled `title`.
    pub fn fail_attach_for(&self, title: &str) {
        self.state.lock().fail_attach.insert(title.to_string());
    }

    /// Sets the bounds reported for an overlay.
    pub fn set_bounds(&self, id: SurfaceId, rect: ScreenRect) {
        self.state.lock().bounds.insert(id, rect);
    }

    pub fn overlay(&self, id: SurfaceId) -> Option<MemoryOverlay> {
        self.state.lock().overlays.get(&id).cloned()
    }

    /// Number of live (created, not destroyed) overlays.
    pub fn overlay_count(&self) -> usize {
        self.state.lock().overlays.len()
    }

    pub fn attached_count(&self) -> usize {
        self.state
            .lock()
            .overlays
            .values()
            .filter(|o| o.attached)
            .count()
    }

    pub fn attached_in_layer(&self, layer: LayerKey) -> usize {
        self.state
            .lock()
            .overlays
            .values()
            .filter(|o| o.attached && o.spec.layer == layer)
            .count()
    }

    pub fn is_attached(&self, id: SurfaceId) -> bool {
        self.state
            .lock()
            .overlays
            .get(&id)
            .is_some_and(|o| o.attached)
    }

    pub fn open_popups(&self) -> Vec<PopupSpec> {
        self.state.lock().popups.values().cloned().collect()
    }

    pub fn popup_count(&self) -> usize {
        self.state.lock().popups.len()
    }

    /// Total popups ever opened.
    pub fn popups_opened(&self) -> u64 {
        self.state.lock().popups_opened
    }

    /// Currently highlighted region and its label.
    pub fn highlight(&self) -> Option<(SurfaceId, String)> {
        self.state
            .lock()
            .highlight
            .as_ref()
            .map(|(id, label, _)| (*id, label.clone()))
    }

    pub fn attach_calls(&self) -> u64 {
        self.state.lock().attach_calls
    }

    pub fn detach_calls(&self) -> u64 {
        self.state.lock().detach_calls
    }

    pub fn destroyed(&self) -> u64 {
        self.state.lock().destroyed
    }
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSurface for MemorySurface {
    fn create(&self, spec: &OverlaySpec) -> Result<SurfaceId, SurfaceError> {
        let mut state = self.state.lock();
        if state.fail_create.contains(&spec.content.title) {
            return Err(SurfaceError::CreateFailed {
                title: spec.content.title.clone(),
                reason: "injected failure".to_string(),
            });
        }
        state.next_overlay += 1;
        let id = SurfaceId(state.next_overlay);
        state.overlays.insert(
            id,
            MemoryOverlay {
                spec: spec.clone(),
                attached: false,
                z_index: spec.content.z_index,
            },
        );
        Ok(id)
    }

    fn attach(&self, id: SurfaceId) -> Result<(), SurfaceError> {
        let mut state = self.state.lock();
        state.attach_calls += 1;
        let failing = match state.overlays.get(&id) {
            Some(overlay) => state.fail_attach.contains(&overlay.spec.content.title),
            None => return Err(SurfaceError::UnknownOverlay(id)),
        };
        if failing {
            return Err(SurfaceError::AttachFailed {
                id,
                reason: "injected failure".to_string(),
            });
        }
        if let Some(overlay) = state.overlays.get_mut(&id) {
            overlay.attached = true;
        }
        Ok(())
    }

    fn detach(&self, id: SurfaceId) -> Result<(), SurfaceError> {
        let mut state = self.state.lock();
        state.detach_calls += 1;
        let overlay = state
            .overlays
            .get_mut(&id)
            .ok_or(SurfaceError::UnknownOverlay(id))?;
        overlay.attached = false;
        Ok(())
    }

    fn destroy(&self, id: SurfaceId) {
        let mut state = self.state.lock();
        if state.overlays.remove(&id).is_some() {
            state.destroyed += 1;
        }
        state.bounds.remove(&id);
        if state.highlight.as_ref().is_some_and(|(h, _, _)| *h == id) {
            state.highlight = None;
        }
    }

    fn set_z_index(&self, id: SurfaceId, z_index: i32) -> Result<(), SurfaceError> {
        let mut state = self.state.lock();
        let overlay = state
            .overlays
            .get_mut(&id)
            .ok_or(SurfaceError::UnknownOverlay(id))?;
        overlay.z_index = z_index;
        Ok(())
    }

    fn screen_bounds(&self, id: SurfaceId) -> Option<ScreenRect> {
        self.state.lock().bounds.get(&id).copied()
    }

    fn viewport_size(&self) -> ScreenSize {
        self.viewport
    }

    fn open_popup(&self, spec: &PopupSpec) -> Result<PopupId, SurfaceError> {
        let mut state = self.state.lock();
        state.next_popup += 1;
        state.popups_opened += 1;
        let id = PopupId(state.next_popup);
        state.popups.insert(id, spec.clone());
        Ok(id)
    }

    fn close_popup(&self, id: PopupId) {
        self.state.lock().popups.remove(&id);
    }

    fn set_highlight(&self, id: SurfaceId, label: &str, at: LatLng) {
        self.state.lock().highlight = Some((id, label.to_string(), at));
    }

    fn clear_highlight(&self) {
        self.state.lock().highlight = None;
    }
}
