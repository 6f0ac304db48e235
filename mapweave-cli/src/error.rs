//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;

use mapweave::config::ConfigFileError;
use mapweave::dataset::DatasetError;
use mapweave::detail::FetchError;
use mapweave::engine::EngineError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to load the dataset directory
    Dataset { dir: PathBuf, error: DatasetError },
    /// Failed to build the detail fetcher
    Fetcher(FetchError),
    /// Engine operation failed
    Engine(EngineError),
    /// Failed to start the async runtime
    Runtime(std::io::Error),
    /// No overlay matched the requested hover target
    HoverTarget(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Dataset { dir, .. } => {
                eprintln!();
                eprintln!("A dataset directory may contain any of:");
                for file in mapweave::dataset::DATASET_FILES {
                    eprintln!("  {}", dir.join(file).display());
                }
            }
            CliError::HoverTarget(_) => {
                eprintln!();
                eprintln!("Only overlays in a visible layer can be hovered.");
                eprintln!("Check the zoom level, or pass --realtime for real-time markers.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Dataset { dir, error } => {
                write!(f, "Failed to load dataset '{}': {}", dir.display(), error)
            }
            CliError::Fetcher(e) => write!(f, "Failed to create detail fetcher: {}", e),
            CliError::Engine(e) => write!(f, "Engine error: {}", e),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::HoverTarget(key) => write!(f, "No visible overlay for '{}'", key),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Dataset { error, .. } => Some(error),
            CliError::Fetcher(e) => Some(e),
            CliError::Engine(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<EngineError> for CliError {
    fn from(e: EngineError) -> Self {
        CliError::Engine(e)
    }
}
