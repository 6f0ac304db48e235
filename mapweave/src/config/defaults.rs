//! Default values and constants for all configuration settings.
//!
//! Contains all `DEFAULT_*` constants and the `ConfigFile::default()`
//! implementation.

use super::file::config_directory;
use super::settings::*;
use crate::layer::{DEFAULT_THRESHOLD_HIGH, DEFAULT_THRESHOLD_INDIVIDUAL, DEFAULT_THRESHOLD_LOW};
use crate::render::DEFAULT_SYNC_ATTACH_LIMIT;

// =============================================================================
// Render
// =============================================================================

pub const DEFAULT_REALTIME_CHUNK_SIZE: usize = 20;
pub const DEFAULT_REALTIME_YIELD_MS: u64 = 2;
pub const DEFAULT_BUILDING_CHUNK_SIZE: usize = 100;
pub const DEFAULT_BUILDING_YIELD_MS: u64 = 5;
pub const DEFAULT_CHUNK_SIZE: usize = 50;
pub const DEFAULT_YIELD_MS: u64 = 10;

// =============================================================================
// Cache
// =============================================================================

/// Aggregate summaries: 30 minutes.
pub const DEFAULT_SUMMARY_TTL_SECS: u64 = 30 * 60;
/// Real-time snapshots: 5 minutes.
pub const DEFAULT_SNAPSHOT_TTL_SECS: u64 = 5 * 60;
/// Entity details: 60 minutes.
pub const DEFAULT_DETAIL_TTL_SECS: u64 = 60 * 60;
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

// =============================================================================
// Hover
// =============================================================================

pub const DEFAULT_HIDE_DEBOUNCE_MS: u64 = 400;
pub const DEFAULT_POPUP_HIDE_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_HIGHLIGHT_HYSTERESIS_MS: u64 = 50;
pub const DEFAULT_POPUP_WIDTH: f64 = 320.0;
pub const DEFAULT_POPUP_HEIGHT: f64 = 110.0;

// =============================================================================
// Transition
// =============================================================================

pub const DEFAULT_PAN_SETTLE_MS: u64 = 400;
pub const DEFAULT_STEP_INTERVAL_MS: u64 = 150;
pub const DEFAULT_FINAL_SETTLE_MS: u64 = 150;
pub const DEFAULT_NO_ZOOM_SETTLE_MS: u64 = 500;
pub const DEFAULT_ZOOM_DEBOUNCE_MS: u64 = 100;

// =============================================================================
// Logging
// =============================================================================

pub const DEFAULT_LOG_FILE_NAME: &str = "mapweave.log";

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            zoom: ZoomSettings {
                threshold_high: DEFAULT_THRESHOLD_HIGH,
                threshold_low: DEFAULT_THRESHOLD_LOW,
                threshold_individual: DEFAULT_THRESHOLD_INDIVIDUAL,
            },
            render: RenderSettings {
                sync_attach_limit: DEFAULT_SYNC_ATTACH_LIMIT,
                realtime_chunk_size: DEFAULT_REALTIME_CHUNK_SIZE,
                realtime_yield_ms: DEFAULT_REALTIME_YIELD_MS,
                building_chunk_size: DEFAULT_BUILDING_CHUNK_SIZE,
                building_yield_ms: DEFAULT_BUILDING_YIELD_MS,
                default_chunk_size: DEFAULT_CHUNK_SIZE,
                default_yield_ms: DEFAULT_YIELD_MS,
            },
            cache: CacheSettings {
                summary_ttl_secs: DEFAULT_SUMMARY_TTL_SECS,
                snapshot_ttl_secs: DEFAULT_SNAPSHOT_TTL_SECS,
                detail_ttl_secs: DEFAULT_DETAIL_TTL_SECS,
                sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            },
            detail: DetailSettings::default(),
            hover: HoverSettings {
                hide_debounce_ms: DEFAULT_HIDE_DEBOUNCE_MS,
                popup_hide_debounce_ms: DEFAULT_POPUP_HIDE_DEBOUNCE_MS,
                highlight_hysteresis_ms: DEFAULT_HIGHLIGHT_HYSTERESIS_MS,
                popup_width: DEFAULT_POPUP_WIDTH,
                popup_height: DEFAULT_POPUP_HEIGHT,
            },
            transition: TransitionSettings {
                pan_settle_ms: DEFAULT_PAN_SETTLE_MS,
                step_interval_ms: DEFAULT_STEP_INTERVAL_MS,
                final_settle_ms: DEFAULT_FINAL_SETTLE_MS,
                no_zoom_settle_ms: DEFAULT_NO_ZOOM_SETTLE_MS,
                zoom_debounce_ms: DEFAULT_ZOOM_DEBOUNCE_MS,
            },
            logging: LoggingSettings {
                file: config_directory().join(DEFAULT_LOG_FILE_NAME),
            },
        }
    }
}
