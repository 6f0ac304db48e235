//! mapweave - viewport-adaptive overlay rendering for interactive maps
//!
//! This library decides which overlay layers of a real-estate map are
//! visible at the current zoom, attaches and detaches hundreds of overlays
//! without stalling the UI, and previews entity details on hover through a
//! coalescing cache.
//!
//! # High-Level API
//!
//! The [`engine`] module wires every component behind one facade:
//!
//! ```ignore
//! use mapweave::engine::{EngineConfig, MapEngine};
//! use mapweave::layer::DataMode;
//!
//! let engine = MapEngine::new(EngineConfig::default(), surface, fetcher, listener);
//! engine.load_dir(Path::new("data"))?;
//! engine.apply_viewport(9, DataMode::Historical).wait().await;
//! ```
//!
//! The map SDK stays outside the crate, behind [`surface::RenderSurface`]
//! and [`viewport::Camera`].

pub mod config;
pub mod content;
pub mod dataset;
pub mod detail;
pub mod engine;
pub mod geo;
pub mod hover;
pub mod layer;
pub mod logging;
pub mod overlay;
pub mod render;
pub mod surface;
pub mod timer;
pub mod viewport;

/// Version of the mapweave library and CLI.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
