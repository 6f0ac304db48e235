//! Offline engine simulation.
//!
//! Loads a dataset directory into a [`MapEngine`] drawing on an in-memory
//! surface, applies one viewport, optionally hovers a marker, and prints what
//! the engine did.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use tracing::{info, warn};

use mapweave::config::ConfigFile;
use mapweave::dataset::DatasetBundle;
use mapweave::detail::{DetailFetcher, HttpDetailFetcher, StaticDetailFetcher};
use mapweave::engine::{MapEngine, PointerEvent};
use mapweave::hover::HoverState;
use mapweave::layer::LayerKey;
use mapweave::logging::{init_logging, split_log_path, LoggingGuard};
use mapweave::overlay::{OverlayView, TracingSelectionListener};
use mapweave::surface::MemorySurface;

use super::layers::mode_for;
use crate::error::CliError;

/// How long to wait for a hover preview before giving up.
const HOVER_TIMEOUT: Duration = Duration::from_secs(10);
const HOVER_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Arguments for `mapweave simulate`.
#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Directory holding the dataset JSON files
    #[arg(long)]
    pub data: PathBuf,

    /// Zoom level to apply
    #[arg(long)]
    pub zoom: u32,

    /// Show real-time markers instead of historical layers
    #[arg(long)]
    pub realtime: bool,

    /// Entity key of a marker to hover after rendering
    #[arg(long)]
    pub hover: Option<String>,
}

/// Run the simulation.
pub fn run(args: SimulateArgs) -> Result<(), CliError> {
    let config = ConfigFile::load()?;
    let engine_config = config.to_engine_config()?;
    let _logging = start_logging(&config)?;

    info!("mapweave v{}", mapweave::VERSION);
    info!(data = %args.data.display(), zoom = args.zoom, "Simulation starting");

    if !has_dataset(&args.data) {
        warn!(data = %args.data.display(), "No dataset files found");
        println!("No dataset files in {}, rendering an empty map", args.data.display());
    }

    let bundle = DatasetBundle::load_dir(&args.data).map_err(|error| CliError::Dataset {
        dir: args.data.clone(),
        error,
    })?;

    let fetcher = detail_fetcher(&config, &bundle)?;
    let surface = Arc::new(MemorySurface::new());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;

    runtime.block_on(async {
        let engine = MapEngine::new(
            engine_config,
            surface.clone(),
            fetcher,
            Arc::new(TracingSelectionListener),
        );

        for update in engine.load_bundle(&bundle) {
            let report = update.report;
            println!(
                "Loaded {:<16} {:>5} overlays ({} skipped)",
                report.layer.as_str(),
                report.created,
                report.skipped
            );
        }
        println!();

        let change = engine.apply_viewport(args.zoom, mode_for(args.realtime));
        println!("Zoom {} ({} mode)", change.zoom, change.mode);
        change.wait().await;

        print_layers(&engine, &surface);

        if let Some(key) = args.hover.as_deref() {
            hover(&engine, &surface, key).await?;
        }

        let stats = engine.cache().stats();
        println!();
        println!("Detail cache");
        println!("  Entries:   {}", engine.cache().entry_count());
        println!("  Fetches:   {}", stats.fetches);
        println!("  Hits:      {} ({:.0}%)", stats.hits, stats.hit_rate() * 100.0);
        println!("  Coalesced: {}", stats.coalesced);
        println!("  Failures:  {}", stats.failures);

        let released = engine.teardown();
        info!(released, "Simulation finished");
        Ok::<(), CliError>(())
    })
}

fn start_logging(config: &ConfigFile) -> Result<LoggingGuard, CliError> {
    let (dir, file) = split_log_path(&config.logging.file);
    init_logging(&dir, &file).map_err(|e| CliError::LoggingInit(e.to_string()))
}

/// HTTP fetcher when an endpoint is configured, otherwise the dataset's own
/// detail records.
fn detail_fetcher(
    config: &ConfigFile,
    bundle: &DatasetBundle,
) -> Result<Arc<dyn DetailFetcher>, CliError> {
    match config.detail.base_url.as_deref() {
        Some(url) => {
            info!(url, "Using HTTP detail fetcher");
            let fetcher = HttpDetailFetcher::new(url).map_err(CliError::Fetcher)?;
            Ok(Arc::new(fetcher))
        }
        None => Ok(Arc::new(StaticDetailFetcher::new(bundle.details.clone()))),
    }
}

fn print_layers(engine: &MapEngine, surface: &MemorySurface) {
    let visible = engine.visible_layers();
    for key in LayerKey::ALL {
        let marker = if visible.contains(&key) { "*" } else { " " };
        println!(
            "  [{}] {:<16} {:>5} attached / {:>5} built",
            marker,
            key.as_str(),
            surface.attached_in_layer(key),
            engine.overlays().handle_count(key)
        );
    }
}

fn find_visible(engine: &MapEngine, entity_key: &str) -> Option<OverlayView> {
    engine
        .visible_layers()
        .into_iter()
        .flat_map(|layer| engine.overlays().handles(layer))
        .find(|view| view.item.entity_key() == entity_key)
}

async fn hover(engine: &MapEngine, surface: &MemorySurface, key: &str) -> Result<(), CliError> {
    let view = find_visible(engine, key).ok_or_else(|| CliError::HoverTarget(key.to_string()))?;

    println!();
    println!("Hovering {} '{}'", view.layer.as_str(), view.content.title);
    engine.pointer_event(view.id, PointerEvent::Enter)?;

    if !view.content.previewable {
        println!("  (no preview for this layer)");
        return engine
            .pointer_event(view.id, PointerEvent::Leave)
            .map_err(CliError::from);
    }

    let shown = tokio::time::timeout(HOVER_TIMEOUT, async {
        while engine.hover().state(view.id) != HoverState::Shown {
            tokio::time::sleep(HOVER_POLL_INTERVAL).await;
        }
    })
    .await
    .is_ok();

    if shown {
        for popup in surface.open_popups() {
            println!(
                "  Popup '{}' at ({:.0}, {:.0}) {:?}",
                popup.body.title(),
                popup.placement.left,
                popup.placement.top,
                popup.placement.placement
            );
            if popup.body.is_unavailable() {
                println!("  (detail unavailable)");
            }
        }
    } else {
        println!("  No preview after {}s", HOVER_TIMEOUT.as_secs());
    }

    engine.pointer_event(view.id, PointerEvent::Leave)?;
    let settle = engine.hover().config().hide_debounce + HOVER_POLL_INTERVAL;
    tokio::time::sleep(settle).await;
    println!("  After leave: {} popup(s) open", surface.popup_count());

    Ok(())
}

/// True if `dir` contains at least one known dataset file.
fn has_dataset(dir: &Path) -> bool {
    mapweave::dataset::DATASET_FILES
        .iter()
        .any(|file| dir.join(file).exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_has_dataset() {
        let dir = TempDir::new().unwrap();
        assert!(!has_dataset(dir.path()));

        std::fs::write(dir.path().join("listings.json"), "[]").unwrap();
        assert!(has_dataset(dir.path()));
    }
}
