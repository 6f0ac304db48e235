//! Overlay manager errors.

use thiserror::Error;

use super::handle::OverlayId;
use crate::surface::SurfaceError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OverlayError {
    #[error("Unknown overlay {0}")]
    UnknownOverlay(OverlayId),

    #[error(transparent)]
    Surface(#[from] SurfaceError),
}
