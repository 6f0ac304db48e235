//! Layer visibility for a zoom level.

use mapweave::config::ConfigFile;
use mapweave::layer::{DataMode, LayerKey, LayerRegistry, ZoomBand};

use crate::error::CliError;

/// Print which layers are visible at `zoom`, using the configured thresholds.
pub fn run(zoom: u32, realtime: bool) -> Result<(), CliError> {
    let config = ConfigFile::load()?;
    let engine_config = config.to_engine_config()?;
    let registry = LayerRegistry::new(engine_config.thresholds);
    let mode = mode_for(realtime);

    let visible = registry.visible(zoom, mode);
    let thresholds = registry.thresholds();

    println!("Zoom {} ({} mode)", zoom, mode);
    println!(
        "Thresholds: high={} low={} individual={}",
        thresholds.high(),
        thresholds.low(),
        thresholds.individual()
    );
    if mode == DataMode::Historical {
        println!("Band: {:?}", ZoomBand::for_zoom(zoom, thresholds));
    }
    println!();

    for key in LayerKey::ALL {
        let marker = if visible.contains(&key) { "*" } else { " " };
        println!("  [{}] {}", marker, key);
    }

    Ok(())
}

pub(crate) fn mode_for(realtime: bool) -> DataMode {
    if realtime {
        DataMode::RealTime
    } else {
        DataMode::Historical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_for_flag() {
        assert_eq!(mode_for(false), DataMode::Historical);
        assert_eq!(mode_for(true), DataMode::RealTime);
    }
}
