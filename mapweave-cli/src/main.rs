//! mapweave CLI - Command-line interface
//!
//! This binary provides configuration management and an offline simulation
//! driver for the mapweave overlay engine.

mod commands;
mod error;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::simulate::SimulateArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "mapweave")]
#[command(version, about = "Viewport-adaptive map overlay engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show which layers are visible at a zoom level
    Layers {
        /// Zoom level to evaluate
        #[arg(long)]
        zoom: u32,

        /// Evaluate real-time mode instead of historical
        #[arg(long)]
        realtime: bool,
    },

    /// Load a dataset and run the engine against an in-memory map
    Simulate(SimulateArgs),

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result: Result<(), CliError> = match cli.command {
        Commands::Layers { zoom, realtime } => commands::layers::run(zoom, realtime),
        Commands::Simulate(args) => commands::simulate::run(args),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_simulate() {
        let cli = Cli::try_parse_from([
            "mapweave", "simulate", "--data", "data", "--zoom", "16", "--hover", "B-1",
        ])
        .unwrap();

        match cli.command {
            Commands::Simulate(args) => {
                assert_eq!(args.zoom, 16);
                assert!(!args.realtime);
                assert_eq!(args.hover.as_deref(), Some("B-1"));
            }
            _ => panic!("expected simulate"),
        }
    }

    #[test]
    fn test_parse_config_set() {
        let cli = Cli::try_parse_from(["mapweave", "config", "set", "zoom.threshold_high", "11"])
            .unwrap();

        match cli.command {
            Commands::Config {
                command: ConfigCommands::Set { key, value },
            } => {
                assert_eq!(key, "zoom.threshold_high");
                assert_eq!(value, "11");
            }
            _ => panic!("expected config set"),
        }
    }
}
