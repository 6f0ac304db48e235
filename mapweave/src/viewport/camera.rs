//! Camera seam.

use parking_lot::Mutex;

use crate::geo::LatLng;

/// Camera controls provided by the map SDK.
pub trait Camera: Send + Sync {
    fn zoom_level(&self) -> u32;

    fn set_zoom_level(&self, level: u32);

    fn pan_to(&self, center: LatLng);
}

#[derive(Debug)]
struct CameraState {
    zoom: u32,
    center: LatLng,
    zoom_history: Vec<u32>,
}

/// Camera that records every movement.
#[derive(Debug)]
pub struct MemoryCamera {
    state: Mutex<CameraState>,
}

impl MemoryCamera {
    pub fn new(zoom: u32, center: LatLng) -> Self {
        Self {
            state: Mutex::new(CameraState {
                zoom,
                center,
                zoom_history: Vec::new(),
            }),
        }
    }

    pub fn center(&self) -> LatLng {
        self.state.lock().center
    }

    /// Every zoom level set so far, in order.
    pub fn zoom_history(&self) -> Vec<u32> {
        self.state.lock().zoom_history.clone()
    }
}

impl Camera for MemoryCamera {
    fn zoom_level(&self) -> u32 {
        self.state.lock().zoom
    }

    fn set_zoom_level(&self, level: u32) {
        let mut state = self.state.lock();
        state.zoom = level;
        state.zoom_history.push(level);
    }

    fn pan_to(&self, center: LatLng) {
        self.state.lock().center = center;
    }
}
