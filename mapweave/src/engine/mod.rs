//! Engine facade.
//!
//! [`MapEngine`] wires the layer policy, overlay manager, detail cache,
//! hover coordinator and camera transitions behind one handle that the
//! map integration drives with viewport changes and pointer events.
//!
//! # Example
//!
//! ```ignore
//! use mapweave::engine::{EngineConfig, MapEngine};
//! use mapweave::layer::DataMode;
//!
//! let engine = MapEngine::new(EngineConfig::default(), surface, fetcher, listener);
//! engine.load_bundle(&bundle);
//! let change = engine.apply_viewport(9, DataMode::Historical);
//! change.wait().await;
//! ```

mod config;
mod error;
mod events;
mod facade;

pub use config::{EngineConfig, DEFAULT_SWEEP_INTERVAL};
pub use error::EngineError;
pub use events::{LayerUpdate, PointerEvent, PopupEvent, VisibilityChange};
pub use facade::MapEngine;
