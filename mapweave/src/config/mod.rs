//! User configuration stored in `~/.mapweave/config.ini`.
//!
//! The file is split into one section per engine concern:
//!
//! - `[zoom]`: zoom-tier thresholds
//! - `[render]`: batch chunk sizes and yields
//! - `[cache]`: detail TTLs and the background sweep
//! - `[detail]`: detail API endpoint
//! - `[hover]`: popup debounce and size
//! - `[transition]`: camera transition timing
//! - `[logging]`: log file location
//!
//! # Example
//!
//! ```no_run
//! use mapweave::config::ConfigFile;
//!
//! let config = ConfigFile::load()?;
//! let engine_config = config.to_engine_config()?;
//! assert!(engine_config.thresholds.high() > engine_config.thresholds.low());
//! # Ok::<(), mapweave::config::ConfigFileError>(())
//! ```

mod defaults;
mod file;
mod keys;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use keys::{ConfigKey, ConfigKeyError};
pub use settings::{
    CacheSettings, ConfigFile, DetailSettings, HoverSettings, LoggingSettings, RenderSettings,
    TransitionSettings, ZoomSettings,
};
