//! Dataset error types.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::geo::GeoError;

/// Errors raised while loading or validating dataset records.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Failed to read a dataset file.
    #[error("Failed to read dataset {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    /// A dataset file is not valid JSON for its record type.
    #[error("Failed to parse dataset {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A region record has no geometry at all.
    #[error("Region '{0}' has no geometry")]
    MissingGeometry(String),

    /// A region record's geometry does not have the expected nesting.
    #[error("Region '{name}' has malformed {kind} coordinates")]
    MalformedGeometry { name: String, kind: String },

    /// Unsupported GeoJSON geometry type.
    #[error("Region '{name}' has unsupported geometry type '{kind}'")]
    UnsupportedGeometry { name: String, kind: String },

    /// Coordinates failed validation.
    #[error("Region '{name}': {source}")]
    InvalidCoordinates { name: String, source: GeoError },
}
