//! Engine errors.

use thiserror::Error;

use crate::dataset::DatasetError;
use crate::overlay::OverlayError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Overlay(#[from] OverlayError),

    #[error("Failed to load datasets: {0}")]
    Dataset(#[from] DatasetError),
}
