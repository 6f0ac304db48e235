//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::{Ini, Properties};
use std::path::PathBuf;
use std::str::FromStr;

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::layer::ZoomThresholds;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [zoom] section
    if let Some(section) = ini.section(Some("zoom")) {
        let zoom = &mut config.zoom;
        read(section, "zoom", "threshold_high", INTEGER, &mut zoom.threshold_high)?;
        read(section, "zoom", "threshold_low", INTEGER, &mut zoom.threshold_low)?;
        read(
            section,
            "zoom",
            "threshold_individual",
            INTEGER,
            &mut zoom.threshold_individual,
        )?;

        if let Err(e) = ZoomThresholds::new(
            zoom.threshold_high,
            zoom.threshold_low,
            zoom.threshold_individual,
        ) {
            return Err(ConfigFileError::InvalidValue {
                section: "zoom".to_string(),
                key: "threshold_high".to_string(),
                value: zoom.threshold_high.to_string(),
                reason: e.to_string(),
            });
        }
    }

    // [render] section
    if let Some(section) = ini.section(Some("render")) {
        let render = &mut config.render;
        read(section, "render", "sync_attach_limit", INTEGER, &mut render.sync_attach_limit)?;
        read_chunk(section, "realtime_chunk_size", &mut render.realtime_chunk_size)?;
        read(section, "render", "realtime_yield_ms", MILLIS, &mut render.realtime_yield_ms)?;
        read_chunk(section, "building_chunk_size", &mut render.building_chunk_size)?;
        read(section, "render", "building_yield_ms", MILLIS, &mut render.building_yield_ms)?;
        read_chunk(section, "default_chunk_size", &mut render.default_chunk_size)?;
        read(section, "render", "default_yield_ms", MILLIS, &mut render.default_yield_ms)?;
    }

    // [cache] section
    if let Some(section) = ini.section(Some("cache")) {
        let cache = &mut config.cache;
        read(section, "cache", "summary_ttl_secs", SECONDS, &mut cache.summary_ttl_secs)?;
        read(section, "cache", "snapshot_ttl_secs", SECONDS, &mut cache.snapshot_ttl_secs)?;
        read(section, "cache", "detail_ttl_secs", SECONDS, &mut cache.detail_ttl_secs)?;
        read(
            section,
            "cache",
            "sweep_interval_secs",
            SECONDS,
            &mut cache.sweep_interval_secs,
        )?;
    }

    // [detail] section
    if let Some(section) = ini.section(Some("detail")) {
        if let Some(v) = section.get("base_url") {
            let v = v.trim();
            if !v.is_empty() {
                if !(v.starts_with("http://") || v.starts_with("https://")) {
                    return Err(ConfigFileError::InvalidValue {
                        section: "detail".to_string(),
                        key: "base_url".to_string(),
                        value: v.to_string(),
                        reason: "must be a URL starting with 'http://' or 'https://'".to_string(),
                    });
                }
                config.detail.base_url = Some(v.trim_end_matches('/').to_string());
            }
        }
    }

    // [hover] section
    if let Some(section) = ini.section(Some("hover")) {
        let hover = &mut config.hover;
        read(section, "hover", "hide_debounce_ms", MILLIS, &mut hover.hide_debounce_ms)?;
        read(
            section,
            "hover",
            "popup_hide_debounce_ms",
            MILLIS,
            &mut hover.popup_hide_debounce_ms,
        )?;
        read(
            section,
            "hover",
            "highlight_hysteresis_ms",
            MILLIS,
            &mut hover.highlight_hysteresis_ms,
        )?;
        read(section, "hover", "popup_width", PIXELS, &mut hover.popup_width)?;
        read(section, "hover", "popup_height", PIXELS, &mut hover.popup_height)?;
        for (key, value) in [
            ("popup_width", hover.popup_width),
            ("popup_height", hover.popup_height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigFileError::InvalidValue {
                    section: "hover".to_string(),
                    key: key.to_string(),
                    value: value.to_string(),
                    reason: PIXELS.to_string(),
                });
            }
        }
    }

    // [transition] section
    if let Some(section) = ini.section(Some("transition")) {
        let transition = &mut config.transition;
        read(section, "transition", "pan_settle_ms", MILLIS, &mut transition.pan_settle_ms)?;
        read(
            section,
            "transition",
            "step_interval_ms",
            MILLIS,
            &mut transition.step_interval_ms,
        )?;
        read(
            section,
            "transition",
            "final_settle_ms",
            MILLIS,
            &mut transition.final_settle_ms,
        )?;
        read(
            section,
            "transition",
            "no_zoom_settle_ms",
            MILLIS,
            &mut transition.no_zoom_settle_ms,
        )?;
        read(
            section,
            "transition",
            "zoom_debounce_ms",
            MILLIS,
            &mut transition.zoom_debounce_ms,
        )?;
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

const INTEGER: &str = "must be a positive integer";
const MILLIS: &str = "must be a positive integer (milliseconds)";
const SECONDS: &str = "must be a positive integer (seconds)";
const PIXELS: &str = "must be a positive number of pixels";

/// Overwrites `target` with the parsed value of `key`, if present.
fn read<T: FromStr>(
    section: &Properties,
    section_name: &str,
    key: &str,
    reason: &str,
    target: &mut T,
) -> Result<(), ConfigFileError> {
    if let Some(v) = section.get(key) {
        *target = v.trim().parse().map_err(|_| ConfigFileError::InvalidValue {
            section: section_name.to_string(),
            key: key.to_string(),
            value: v.to_string(),
            reason: reason.to_string(),
        })?;
    }
    Ok(())
}

/// Like [`read`] for `[render]` chunk sizes, which must be non-zero.
fn read_chunk(section: &Properties, key: &str, target: &mut usize) -> Result<(), ConfigFileError> {
    let mut value = *target;
    read(section, "render", key, INTEGER, &mut value)?;
    if value == 0 {
        return Err(ConfigFileError::InvalidValue {
            section: "render".to_string(),
            key: key.to_string(),
            value: "0".to_string(),
            reason: "chunk size must be at least 1".to_string(),
        });
    }
    *target = value;
    Ok(())
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;
    use tempfile::TempDir;

    fn load(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, content).unwrap();
        ConfigFile::load_from(&config_path)
    }

    #[test]
    fn test_partial_config() {
        // Only specify some settings, rest should use defaults
        let config = load(
            r#"
[zoom]
threshold_high = 11

[cache]
detail_ttl_secs = 120
"#,
        )
        .unwrap();

        assert_eq!(config.zoom.threshold_high, 11);
        assert_eq!(config.cache.detail_ttl_secs, 120);

        assert_eq!(config.zoom.threshold_low, 8);
        assert_eq!(config.cache.summary_ttl_secs, DEFAULT_SUMMARY_TTL_SECS);
        assert_eq!(config.render.building_chunk_size, DEFAULT_BUILDING_CHUNK_SIZE);
    }

    #[test]
    fn test_thresholds_out_of_order_rejected() {
        let err = load(
            r#"
[zoom]
threshold_high = 8
threshold_low = 8
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("zoom.threshold_high"));
    }

    #[test]
    fn test_oversized_threshold_rejected() {
        let err = load(
            r#"
[zoom]
threshold_high = 4294967295
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("exceeds the maximum"));
    }

    #[test]
    fn test_invalid_integer() {
        let err = load(
            r#"
[hover]
hide_debounce_ms = soon
"#,
        )
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("hide_debounce_ms"));
        assert!(message.contains("milliseconds"));
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let err = load(
            r#"
[render]
building_chunk_size = 0
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("at least 1"));
    }

    #[test]
    fn test_detail_base_url() {
        let config = load(
            r#"
[detail]
base_url = https://api.example.com/
"#,
        )
        .unwrap();
        assert_eq!(
            config.detail.base_url.as_deref(),
            Some("https://api.example.com")
        );

        assert!(load("[detail]\nbase_url = ftp://example.com\n").is_err());
    }

    #[test]
    fn test_negative_popup_size_rejected() {
        assert!(load("[hover]\npopup_width = -5\n").is_err());
    }

    #[test]
    fn test_expand_tilde() {
        let path = expand_tilde("~/test/path");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(path, home.join("test/path"));
        }

        // Non-tilde paths should be unchanged
        let path = expand_tilde("/absolute/path");
        assert_eq!(path, PathBuf::from("/absolute/path"));
    }
}
