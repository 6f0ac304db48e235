//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Zoom-tier thresholds
    pub zoom: ZoomSettings,
    /// Batch rendering profiles
    pub render: RenderSettings,
    /// Detail cache TTLs and sweep
    pub cache: CacheSettings,
    /// Detail endpoint
    pub detail: DetailSettings,
    /// Hover debounce and popup geometry
    pub hover: HoverSettings,
    /// Camera transition timing
    pub transition: TransitionSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Zoom thresholds. Must satisfy `high > low > individual`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomSettings {
    pub threshold_high: u32,
    pub threshold_low: u32,
    pub threshold_individual: u32,
}

/// Chunk sizes and yields of the batch scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    /// Layers above this many overlays are attached in batches
    pub sync_attach_limit: usize,
    pub realtime_chunk_size: usize,
    pub realtime_yield_ms: u64,
    pub building_chunk_size: usize,
    pub building_yield_ms: u64,
    pub default_chunk_size: usize,
    pub default_yield_ms: u64,
}

/// Detail cache configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    pub summary_ttl_secs: u64,
    pub snapshot_ttl_secs: u64,
    pub detail_ttl_secs: u64,
    /// Background sweep interval; 0 disables the sweeper
    pub sweep_interval_secs: u64,
}

/// Detail endpoint configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DetailSettings {
    /// Base URL of the detail API; `None` serves details from the dataset
    pub base_url: Option<String>,
}

/// Hover preview timing and popup size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverSettings {
    pub hide_debounce_ms: u64,
    pub popup_hide_debounce_ms: u64,
    pub highlight_hysteresis_ms: u64,
    pub popup_width: f64,
    pub popup_height: f64,
}

/// Camera transition timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionSettings {
    pub pan_settle_ms: u64,
    pub step_interval_ms: u64,
    pub final_settle_ms: u64,
    pub no_zoom_settle_ms: u64,
    pub zoom_debounce_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
