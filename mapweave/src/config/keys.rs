//! Configuration key access and validation.
//!
//! This module provides a type-safe interface for getting and setting
//! configuration values by key name, with validation via the Specification Pattern.

use std::str::FromStr;
use thiserror::Error;

use super::file::ConfigFile;
use super::parser::expand_tilde;
use super::writer::path_to_string;

/// Errors that can occur when getting or setting configuration values.
#[derive(Debug, Error)]
pub enum ConfigKeyError {
    /// Unknown configuration key.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    /// Validation failed for the value.
    #[error("Invalid value for {key}: {reason}")]
    ValidationFailed { key: String, reason: String },
}

/// Supported configuration keys.
///
/// Each key maps to a specific field in [`ConfigFile`] and knows how to
/// get and set its value with proper validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    // Zoom settings
    ZoomThresholdHigh,
    ZoomThresholdLow,
    ZoomThresholdIndividual,

    // Render settings
    RenderSyncAttachLimit,
    RenderRealtimeChunkSize,
    RenderRealtimeYieldMs,
    RenderBuildingChunkSize,
    RenderBuildingYieldMs,
    RenderDefaultChunkSize,
    RenderDefaultYieldMs,

    // Cache settings
    CacheSummaryTtlSecs,
    CacheSnapshotTtlSecs,
    CacheDetailTtlSecs,
    CacheSweepIntervalSecs,

    // Detail settings
    DetailBaseUrl,

    // Hover settings
    HoverHideDebounceMs,
    HoverPopupHideDebounceMs,
    HoverHighlightHysteresisMs,
    HoverPopupWidth,
    HoverPopupHeight,

    // Transition settings
    TransitionPanSettleMs,
    TransitionStepIntervalMs,
    TransitionFinalSettleMs,
    TransitionNoZoomSettleMs,
    TransitionZoomDebounceMs,

    // Logging settings
    LoggingFile,
}

impl FromStr for ConfigKey {
    type Err = ConfigKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigKeyError::UnknownKey(s.to_string()))
    }
}

impl ConfigKey {
    /// Get the canonical key name (e.g., "render.building_chunk_size").
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::ZoomThresholdHigh => "zoom.threshold_high",
            ConfigKey::ZoomThresholdLow => "zoom.threshold_low",
            ConfigKey::ZoomThresholdIndividual => "zoom.threshold_individual",
            ConfigKey::RenderSyncAttachLimit => "render.sync_attach_limit",
            ConfigKey::RenderRealtimeChunkSize => "render.realtime_chunk_size",
            ConfigKey::RenderRealtimeYieldMs => "render.realtime_yield_ms",
            ConfigKey::RenderBuildingChunkSize => "render.building_chunk_size",
            ConfigKey::RenderBuildingYieldMs => "render.building_yield_ms",
            ConfigKey::RenderDefaultChunkSize => "render.default_chunk_size",
            ConfigKey::RenderDefaultYieldMs => "render.default_yield_ms",
            ConfigKey::CacheSummaryTtlSecs => "cache.summary_ttl_secs",
            ConfigKey::CacheSnapshotTtlSecs => "cache.snapshot_ttl_secs",
            ConfigKey::CacheDetailTtlSecs => "cache.detail_ttl_secs",
            ConfigKey::CacheSweepIntervalSecs => "cache.sweep_interval_secs",
            ConfigKey::DetailBaseUrl => "detail.base_url",
            ConfigKey::HoverHideDebounceMs => "hover.hide_debounce_ms",
            ConfigKey::HoverPopupHideDebounceMs => "hover.popup_hide_debounce_ms",
            ConfigKey::HoverHighlightHysteresisMs => "hover.highlight_hysteresis_ms",
            ConfigKey::HoverPopupWidth => "hover.popup_width",
            ConfigKey::HoverPopupHeight => "hover.popup_height",
            ConfigKey::TransitionPanSettleMs => "transition.pan_settle_ms",
            ConfigKey::TransitionStepIntervalMs => "transition.step_interval_ms",
            ConfigKey::TransitionFinalSettleMs => "transition.final_settle_ms",
            ConfigKey::TransitionNoZoomSettleMs => "transition.no_zoom_settle_ms",
            ConfigKey::TransitionZoomDebounceMs => "transition.zoom_debounce_ms",
            ConfigKey::LoggingFile => "logging.file",
        }
    }

    /// Get the section name (e.g., "render").
    pub fn section(&self) -> &'static str {
        self.name().split('.').next().unwrap_or("")
    }

    /// Get the key name within the section (e.g., "building_chunk_size").
    pub fn key_name(&self) -> &'static str {
        self.name().split('.').nth(1).unwrap_or(self.name())
    }

    /// Get the value from a config file as a string.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::ZoomThresholdHigh => config.zoom.threshold_high.to_string(),
            ConfigKey::ZoomThresholdLow => config.zoom.threshold_low.to_string(),
            ConfigKey::ZoomThresholdIndividual => config.zoom.threshold_individual.to_string(),
            ConfigKey::RenderSyncAttachLimit => config.render.sync_attach_limit.to_string(),
            ConfigKey::RenderRealtimeChunkSize => config.render.realtime_chunk_size.to_string(),
            ConfigKey::RenderRealtimeYieldMs => config.render.realtime_yield_ms.to_string(),
            ConfigKey::RenderBuildingChunkSize => config.render.building_chunk_size.to_string(),
            ConfigKey::RenderBuildingYieldMs => config.render.building_yield_ms.to_string(),
            ConfigKey::RenderDefaultChunkSize => config.render.default_chunk_size.to_string(),
            ConfigKey::RenderDefaultYieldMs => config.render.default_yield_ms.to_string(),
            ConfigKey::CacheSummaryTtlSecs => config.cache.summary_ttl_secs.to_string(),
            ConfigKey::CacheSnapshotTtlSecs => config.cache.snapshot_ttl_secs.to_string(),
            ConfigKey::CacheDetailTtlSecs => config.cache.detail_ttl_secs.to_string(),
            ConfigKey::CacheSweepIntervalSecs => config.cache.sweep_interval_secs.to_string(),
            ConfigKey::DetailBaseUrl => config.detail.base_url.clone().unwrap_or_default(),
            ConfigKey::HoverHideDebounceMs => config.hover.hide_debounce_ms.to_string(),
            ConfigKey::HoverPopupHideDebounceMs => config.hover.popup_hide_debounce_ms.to_string(),
            ConfigKey::HoverHighlightHysteresisMs => {
                config.hover.highlight_hysteresis_ms.to_string()
            }
            ConfigKey::HoverPopupWidth => config.hover.popup_width.to_string(),
            ConfigKey::HoverPopupHeight => config.hover.popup_height.to_string(),
            ConfigKey::TransitionPanSettleMs => config.transition.pan_settle_ms.to_string(),
            ConfigKey::TransitionStepIntervalMs => config.transition.step_interval_ms.to_string(),
            ConfigKey::TransitionFinalSettleMs => config.transition.final_settle_ms.to_string(),
            ConfigKey::TransitionNoZoomSettleMs => {
                config.transition.no_zoom_settle_ms.to_string()
            }
            ConfigKey::TransitionZoomDebounceMs => config.transition.zoom_debounce_ms.to_string(),
            ConfigKey::LoggingFile => path_to_string(&config.logging.file),
        }
    }

    /// Set the value in a config file.
    ///
    /// Validates the value according to the key's specification before setting.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigKeyError> {
        self.validate(value)?;
        let value = value.trim();
        match self {
            ConfigKey::ZoomThresholdHigh => config.zoom.threshold_high = self.parse(value)?,
            ConfigKey::ZoomThresholdLow => config.zoom.threshold_low = self.parse(value)?,
            ConfigKey::ZoomThresholdIndividual => {
                config.zoom.threshold_individual = self.parse(value)?
            }
            ConfigKey::RenderSyncAttachLimit => config.render.sync_attach_limit = self.parse(value)?,
            ConfigKey::RenderRealtimeChunkSize => {
                config.render.realtime_chunk_size = self.parse(value)?
            }
            ConfigKey::RenderRealtimeYieldMs => config.render.realtime_yield_ms = self.parse(value)?,
            ConfigKey::RenderBuildingChunkSize => {
                config.render.building_chunk_size = self.parse(value)?
            }
            ConfigKey::RenderBuildingYieldMs => config.render.building_yield_ms = self.parse(value)?,
            ConfigKey::RenderDefaultChunkSize => {
                config.render.default_chunk_size = self.parse(value)?
            }
            ConfigKey::RenderDefaultYieldMs => config.render.default_yield_ms = self.parse(value)?,
            ConfigKey::CacheSummaryTtlSecs => config.cache.summary_ttl_secs = self.parse(value)?,
            ConfigKey::CacheSnapshotTtlSecs => config.cache.snapshot_ttl_secs = self.parse(value)?,
            ConfigKey::CacheDetailTtlSecs => config.cache.detail_ttl_secs = self.parse(value)?,
            ConfigKey::CacheSweepIntervalSecs => {
                config.cache.sweep_interval_secs = self.parse(value)?
            }
            ConfigKey::DetailBaseUrl => {
                config.detail.base_url = if value.is_empty() {
                    None
                } else {
                    Some(value.trim_end_matches('/').to_string())
                };
            }
            ConfigKey::HoverHideDebounceMs => config.hover.hide_debounce_ms = self.parse(value)?,
            ConfigKey::HoverPopupHideDebounceMs => {
                config.hover.popup_hide_debounce_ms = self.parse(value)?
            }
            ConfigKey::HoverHighlightHysteresisMs => {
                config.hover.highlight_hysteresis_ms = self.parse(value)?
            }
            ConfigKey::HoverPopupWidth => config.hover.popup_width = self.parse(value)?,
            ConfigKey::HoverPopupHeight => config.hover.popup_height = self.parse(value)?,
            ConfigKey::TransitionPanSettleMs => {
                config.transition.pan_settle_ms = self.parse(value)?
            }
            ConfigKey::TransitionStepIntervalMs => {
                config.transition.step_interval_ms = self.parse(value)?
            }
            ConfigKey::TransitionFinalSettleMs => {
                config.transition.final_settle_ms = self.parse(value)?
            }
            ConfigKey::TransitionNoZoomSettleMs => {
                config.transition.no_zoom_settle_ms = self.parse(value)?
            }
            ConfigKey::TransitionZoomDebounceMs => {
                config.transition.zoom_debounce_ms = self.parse(value)?
            }
            ConfigKey::LoggingFile => config.logging.file = expand_tilde(value),
        }
        Ok(())
    }

    fn parse<T: FromStr>(&self, value: &str) -> Result<T, ConfigKeyError> {
        value.parse().map_err(|_| ConfigKeyError::ValidationFailed {
            key: self.name().to_string(),
            reason: format!("cannot parse '{}'", value),
        })
    }

    /// Validate a value according to this key's specification.
    pub fn validate(&self, value: &str) -> Result<(), ConfigKeyError> {
        self.specification()
            .is_satisfied_by(value.trim())
            .map_err(|reason| ConfigKeyError::ValidationFailed {
                key: self.name().to_string(),
                reason,
            })
    }

    /// Get the validation specification for this key.
    fn specification(&self) -> Box<dyn ValueSpecification> {
        match self {
            ConfigKey::ZoomThresholdHigh
            | ConfigKey::ZoomThresholdLow
            | ConfigKey::ZoomThresholdIndividual
            | ConfigKey::RenderSyncAttachLimit => Box::new(PositiveIntegerSpec),
            ConfigKey::RenderRealtimeChunkSize
            | ConfigKey::RenderBuildingChunkSize
            | ConfigKey::RenderDefaultChunkSize => Box::new(NonZeroIntegerSpec),
            ConfigKey::RenderRealtimeYieldMs
            | ConfigKey::RenderBuildingYieldMs
            | ConfigKey::RenderDefaultYieldMs
            | ConfigKey::CacheSummaryTtlSecs
            | ConfigKey::CacheSnapshotTtlSecs
            | ConfigKey::CacheDetailTtlSecs
            | ConfigKey::CacheSweepIntervalSecs
            | ConfigKey::HoverHideDebounceMs
            | ConfigKey::HoverPopupHideDebounceMs
            | ConfigKey::HoverHighlightHysteresisMs
            | ConfigKey::TransitionPanSettleMs
            | ConfigKey::TransitionStepIntervalMs
            | ConfigKey::TransitionFinalSettleMs
            | ConfigKey::TransitionNoZoomSettleMs
            | ConfigKey::TransitionZoomDebounceMs => Box::new(PositiveIntegerSpec),
            ConfigKey::HoverPopupWidth | ConfigKey::HoverPopupHeight => {
                Box::new(PositiveNumberSpec)
            }
            ConfigKey::DetailBaseUrl => Box::new(OptionalUrlSpec),
            ConfigKey::LoggingFile => Box::new(PathSpec),
        }
    }

    /// Get all supported configuration keys.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::ZoomThresholdHigh,
            ConfigKey::ZoomThresholdLow,
            ConfigKey::ZoomThresholdIndividual,
            ConfigKey::RenderSyncAttachLimit,
            ConfigKey::RenderRealtimeChunkSize,
            ConfigKey::RenderRealtimeYieldMs,
            ConfigKey::RenderBuildingChunkSize,
            ConfigKey::RenderBuildingYieldMs,
            ConfigKey::RenderDefaultChunkSize,
            ConfigKey::RenderDefaultYieldMs,
            ConfigKey::CacheSummaryTtlSecs,
            ConfigKey::CacheSnapshotTtlSecs,
            ConfigKey::CacheDetailTtlSecs,
            ConfigKey::CacheSweepIntervalSecs,
            ConfigKey::DetailBaseUrl,
            ConfigKey::HoverHideDebounceMs,
            ConfigKey::HoverPopupHideDebounceMs,
            ConfigKey::HoverHighlightHysteresisMs,
            ConfigKey::HoverPopupWidth,
            ConfigKey::HoverPopupHeight,
            ConfigKey::TransitionPanSettleMs,
            ConfigKey::TransitionStepIntervalMs,
            ConfigKey::TransitionFinalSettleMs,
            ConfigKey::TransitionNoZoomSettleMs,
            ConfigKey::TransitionZoomDebounceMs,
            ConfigKey::LoggingFile,
        ]
    }
}

// ============================================================================
// Value Specifications (Specification Pattern)
// ============================================================================

/// Trait for value validation specifications.
trait ValueSpecification {
    /// Check if the value satisfies this specification.
    /// Returns Ok(()) if valid, Err(reason) if invalid.
    fn is_satisfied_by(&self, value: &str) -> Result<(), String>;
}

/// Specification for non-negative integer values.
struct PositiveIntegerSpec;

impl ValueSpecification for PositiveIntegerSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        value
            .parse::<u64>()
            .map(|_| ())
            .map_err(|_| "must be a positive integer".to_string())
    }
}

/// Specification for integers of at least 1.
struct NonZeroIntegerSpec;

impl ValueSpecification for NonZeroIntegerSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        match value.parse::<u64>() {
            Ok(n) if n > 0 => Ok(()),
            _ => Err("must be an integer of at least 1".to_string()),
        }
    }
}

/// Specification for positive floating-point number values.
struct PositiveNumberSpec;

impl ValueSpecification for PositiveNumberSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        value
            .parse::<f64>()
            .map_err(|_| "must be a positive number".to_string())
            .and_then(|n| {
                if n.is_finite() && n > 0.0 {
                    Ok(())
                } else {
                    Err("must be a positive number".to_string())
                }
            })
    }
}

/// Specification for path values (non-empty).
struct PathSpec;

impl ValueSpecification for PathSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        if value.is_empty() {
            Err("must be a valid path".to_string())
        } else {
            Ok(())
        }
    }
}

/// Specification for optional URL values.
struct OptionalUrlSpec;

impl ValueSpecification for OptionalUrlSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        if value.is_empty() {
            return Ok(());
        }
        if value.starts_with("http://") || value.starts_with("https://") {
            Ok(())
        } else {
            Err("must be a URL starting with 'http://' or 'https://'".to_string())
        }
    }
}
