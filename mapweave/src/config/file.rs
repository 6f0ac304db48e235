//! Configuration file handling for ~/.mapweave/config.ini.
//!
//! Loads and saves user configuration with sensible defaults.
//! Settings structs live in [`super::settings`], constants in [`super::defaults`],
//! parsing in [`super::parser`], and serialization in [`super::writer`].

use ini::Ini;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub use super::settings::*;

use crate::detail::CacheTtls;
use crate::engine::EngineConfig;
use crate::hover::{HoverConfig, PopupSize};
use crate::layer::ZoomThresholds;
use crate::render::{BatchProfile, RenderConfig};
use crate::viewport::TransitionConfig;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFile {
    /// Load configuration from the default path (~/.mapweave/config.ini).
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load() -> Result<Self, ConfigFileError> {
        let path = config_file_path();
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Save configuration to the default path (~/.mapweave/config.ini).
    pub fn save(&self) -> Result<(), ConfigFileError> {
        let path = config_file_path();
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let content = super::writer::to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Create the default config file if it doesn't exist.
    ///
    /// Returns the path to the config file.
    pub fn ensure_exists() -> Result<PathBuf, ConfigFileError> {
        let path = config_file_path();
        if !path.exists() {
            let config = Self::default();
            config.save_to(&path)?;
        }
        Ok(path)
    }

    /// Converts the file settings into the engine's runtime configuration.
    ///
    /// Fails if the zoom thresholds are out of order, which can happen after
    /// individual keys were changed with `config set`.
    pub fn to_engine_config(&self) -> Result<EngineConfig, ConfigFileError> {
        let thresholds = ZoomThresholds::new(
            self.zoom.threshold_high,
            self.zoom.threshold_low,
            self.zoom.threshold_individual,
        )
        .map_err(|e| ConfigFileError::InvalidValue {
            section: "zoom".to_string(),
            key: "threshold_high".to_string(),
            value: self.zoom.threshold_high.to_string(),
            reason: e.to_string(),
        })?;

        let render = RenderConfig {
            realtime: BatchProfile::new(
                self.render.realtime_chunk_size,
                Duration::from_millis(self.render.realtime_yield_ms),
            ),
            buildings: BatchProfile::new(
                self.render.building_chunk_size,
                Duration::from_millis(self.render.building_yield_ms),
            ),
            fallback: BatchProfile::new(
                self.render.default_chunk_size,
                Duration::from_millis(self.render.default_yield_ms),
            ),
            sync_attach_limit: self.render.sync_attach_limit,
        };

        let ttls = CacheTtls {
            summary: Duration::from_secs(self.cache.summary_ttl_secs),
            snapshot: Duration::from_secs(self.cache.snapshot_ttl_secs),
            detail: Duration::from_secs(self.cache.detail_ttl_secs),
        };

        let hover = HoverConfig {
            hide_debounce: Duration::from_millis(self.hover.hide_debounce_ms),
            popup_hide_debounce: Duration::from_millis(self.hover.popup_hide_debounce_ms),
            highlight_hysteresis: Duration::from_millis(self.hover.highlight_hysteresis_ms),
            popup_size: PopupSize {
                width: self.hover.popup_width,
                height: self.hover.popup_height,
                ..PopupSize::default()
            },
        };

        let transition = TransitionConfig {
            pan_settle: Duration::from_millis(self.transition.pan_settle_ms),
            step_interval: Duration::from_millis(self.transition.step_interval_ms),
            final_settle: Duration::from_millis(self.transition.final_settle_ms),
            no_zoom_settle: Duration::from_millis(self.transition.no_zoom_settle_ms),
        };

        let sweep_interval = match self.cache.sweep_interval_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        Ok(EngineConfig {
            thresholds,
            render,
            ttls,
            hover,
            transition,
            zoom_debounce: Duration::from_millis(self.transition.zoom_debounce_ms),
            sweep_interval,
        })
    }
}

/// Get the path to the config directory (~/.mapweave).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".mapweave")
}

/// Get the path to the config file (~/.mapweave/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();

        assert_eq!(config.zoom.threshold_high, 10);
        assert_eq!(config.zoom.threshold_low, 8);
        assert_eq!(config.zoom.threshold_individual, 6);
        assert_eq!(config.cache.detail_ttl_secs, DEFAULT_DETAIL_TTL_SECS);
        assert!(config.detail.base_url.is_none());
        assert!(config.logging.file.ends_with("mapweave.log"));
    }

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.ini");

        let config = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_default_file_matches_default_engine_config() {
        let engine = ConfigFile::default().to_engine_config().unwrap();
        assert_eq!(engine, EngineConfig::default());
    }

    #[test]
    fn test_zero_sweep_interval_disables_sweeper() {
        let mut config = ConfigFile::default();
        config.cache.sweep_interval_secs = 0;
        assert_eq!(config.to_engine_config().unwrap().sweep_interval, None);
    }

    #[test]
    fn test_out_of_order_thresholds_rejected_at_conversion() {
        let mut config = ConfigFile::default();
        config.zoom.threshold_low = 12;
        assert!(matches!(
            config.to_engine_config(),
            Err(ConfigFileError::InvalidValue { .. })
        ));
    }
}
