//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let base_url = config.detail.base_url.as_deref().unwrap_or("");

    format!(
        r#"[zoom]
; Camera zoom thresholds (larger zoom = further out). Must satisfy high > low > individual.
;   zoom >  high              - province outlines and average prices
;   low < zoom <= high        - district outlines and district prices
;   individual < zoom <= low  - individual listings
;   zoom <= individual        - building markers
threshold_high = {}
threshold_low = {}
threshold_individual = {}

[render]
; Layers with more overlays than this are attached in batches (default: 200)
sync_attach_limit = {}
; Real-time markers: small chunks, short pauses (default: 20 / 2ms)
realtime_chunk_size = {}
realtime_yield_ms = {}
; Building markers: large chunks (default: 100 / 5ms)
building_chunk_size = {}
building_yield_ms = {}
; Any other layer above the sync limit (default: 50 / 10ms)
; A yield of 0 hands control back to the runtime without sleeping
default_chunk_size = {}
default_yield_ms = {}

[cache]
; Detail cache time-to-live per data class, in seconds
; Aggregate summaries (default: 1800 = 30 minutes)
summary_ttl_secs = {}
; Real-time snapshots (default: 300 = 5 minutes)
snapshot_ttl_secs = {}
; Per-building details (default: 3600 = 60 minutes)
detail_ttl_secs = {}
; Interval of the background sweep of expired entries; 0 disables it (default: 60)
sweep_interval_secs = {}

[detail]
; Base URL of the detail API. If empty, details are served from the dataset directory.
; Example: base_url = https://api.example.com
base_url = {}

[hover]
; Delay before hiding a popup after the pointer leaves its marker (default: 400)
hide_debounce_ms = {}
; Delay before hiding a popup after the pointer leaves the popup (default: 300)
popup_hide_debounce_ms = {}
; Delay before clearing a region highlight (default: 50)
highlight_hysteresis_ms = {}
; Popup size in pixels (default: 320 x 110)
popup_width = {}
popup_height = {}

[transition]
; Programmatic camera moves pan first, then step one zoom level at a time
; Wait after panning before the first zoom step (default: 400)
pan_settle_ms = {}
; Interval between zoom steps (default: 150)
step_interval_ms = {}
; Wait after the last step before layers are recomputed (default: 150)
final_settle_ms = {}
; Wait after a pan that needs no zoom change (default: 500)
no_zoom_settle_ms = {}
; Quiet period before a user zoom recomputes layers (default: 100)
zoom_debounce_ms = {}

[logging]
; Log file path (default: ~/.mapweave/mapweave.log)
file = {}
"#,
        config.zoom.threshold_high,
        config.zoom.threshold_low,
        config.zoom.threshold_individual,
        config.render.sync_attach_limit,
        config.render.realtime_chunk_size,
        config.render.realtime_yield_ms,
        config.render.building_chunk_size,
        config.render.building_yield_ms,
        config.render.default_chunk_size,
        config.render.default_yield_ms,
        config.cache.summary_ttl_secs,
        config.cache.snapshot_ttl_secs,
        config.cache.detail_ttl_secs,
        config.cache.sweep_interval_secs,
        base_url,
        config.hover.hide_debounce_ms,
        config.hover.popup_hide_debounce_ms,
        config.hover.highlight_hysteresis_ms,
        config.hover.popup_width,
        config.hover.popup_height,
        config.transition.pan_settle_ms,
        config.transition.step_interval_ms,
        config.transition.final_settle_ms,
        config.transition.no_zoom_settle_ms,
        config.transition.zoom_debounce_ms,
        path_to_string(&config.logging.file),
    )
}

/// Convert path to string, collapsing home dir to ~.
pub(super) fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_written_config_reloads_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");

        let mut config = ConfigFile::default();
        config.zoom.threshold_high = 12;
        config.render.building_chunk_size = 250;
        config.detail.base_url = Some("https://api.example.com".to_string());
        config.hover.popup_width = 300.0;
        config.save_to(&config_path).unwrap();

        let loaded = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_written_config_is_commented() {
        let content = to_config_string(&ConfigFile::default());
        assert!(content.contains("[transition]"));
        assert!(content.contains("; Wait after panning"));
        assert!(content.contains("threshold_high = 10"));
    }
}
