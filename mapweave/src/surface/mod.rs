//! Rendering surface seam.
//!
//! The map SDK owns projection, drawing and input. The engine only asks it to
//! create, attach, detach and destroy overlays, to report where an overlay
//! landed on screen, and to show popups and the region highlight.
//! [`MemorySurface`] records every call and is used by the CLI simulation and
//! the tests.

mod memory;

pub use memory::{MemoryOverlay, MemorySurface};

use std::fmt;
use thiserror::Error;

use crate::content::{OverlaySpec, PopupBody};
use crate::geo::{LatLng, ScreenRect, ScreenSize};
use crate::hover::PopupPlacement;

/// Identifier assigned by the surface to a created overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u64);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// Identifier of an open popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PopupId(pub u64);

/// Errors reported by a rendering surface.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurfaceError {
    #[error("Failed to create overlay '{title}': {reason}")]
    CreateFailed { title: String, reason: String },

    #[error("Failed to attach overlay {id}: {reason}")]
    AttachFailed { id: SurfaceId, reason: String },

    #[error("Unknown overlay {0}")]
    UnknownOverlay(SurfaceId),

    #[error("Failed to open popup '{key}': {reason}")]
    PopupFailed { key: String, reason: String },
}

/// A positioned hover preview.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupSpec {
    /// Detail key of the marker the popup belongs to.
    pub key: String,
    pub placement: PopupPlacement,
    pub body: PopupBody,
}

/// Rendering primitives required by the engine.
pub trait RenderSurface: Send + Sync {
    /// Constructs an overlay without showing it.
    fn create(&self, spec: &OverlaySpec) -> Result<SurfaceId, SurfaceError>;

    fn attach(&self, id: SurfaceId) -> Result<(), SurfaceError>;

    fn detach(&self, id: SurfaceId) -> Result<(), SurfaceError>;

    /// Releases the overlay. Unknown ids are ignored.
    fn destroy(&self, id: SurfaceId);

    fn set_z_index(&self, id: SurfaceId, z_index: i32) -> Result<(), SurfaceError>;

    /// On-screen bounds of an attached overlay, if known.
    fn screen_bounds(&self, id: SurfaceId) -> Option<ScreenRect>;

    fn viewport_size(&self) -> ScreenSize;

    fn open_popup(&self, spec: &PopupSpec) -> Result<PopupId, SurfaceError>;

    /// Closes a popup. Unknown ids are ignored.
    fn close_popup(&self, id: PopupId);

    /// Highlights a region shape and shows its label at `at`.
    fn set_highlight(&self, id: SurfaceId, label: &str, at: LatLng);

    fn clear_highlight(&self);
}
