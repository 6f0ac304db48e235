//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (init, path, show, get, set)
//! - [`layers`] - Layer visibility for a zoom level
//! - [`simulate`] - Offline engine run against a dataset directory

pub mod config;
pub mod layers;
pub mod simulate;
