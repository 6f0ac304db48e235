//! Runtime engine configuration.

use std::time::Duration;

use crate::detail::CacheTtls;
use crate::hover::HoverConfig;
use crate::layer::ZoomThresholds;
use crate::render::RenderConfig;
use crate::viewport::{TransitionConfig, DEFAULT_ZOOM_DEBOUNCE};

/// Default interval of the background cache sweep.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Every tunable of the engine.
///
/// Built from the config file with `ConfigFile::to_engine_config`, or
/// assembled directly in tests.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub thresholds: ZoomThresholds,
    pub render: RenderConfig,
    pub ttls: CacheTtls,
    pub hover: HoverConfig,
    pub transition: TransitionConfig,
    /// Quiet period before a free camera zoom recomputes visibility.
    pub zoom_debounce: Duration,
    /// Background sweep of expired cache entries; `None` disables it.
    pub sweep_interval: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            thresholds: ZoomThresholds::default(),
            render: RenderConfig::default(),
            ttls: CacheTtls::default(),
            hover: HoverConfig::default(),
            transition: TransitionConfig::default(),
            zoom_debounce: DEFAULT_ZOOM_DEBOUNCE,
            sweep_interval: Some(DEFAULT_SWEEP_INTERVAL),
        }
    }
}
