//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `identify`: run the photo -> album pipeline
//! - `setup`: config file and secret checks

mod identify;
mod setup;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::config;

pub use identify::cmd_identify;
pub use setup::{cmd_check_config, cmd_init_config};

/// Snap & Play CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: OS config dir/snap-and-play/config.toml)
    #[arg(long, global = true, env = "SNAP_AND_PLAY_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Identify an album from a photo of its cover and find it on Spotify
    Identify {
        /// Photo of the album cover
        #[arg(required_unless_present = "request", conflicts_with = "request")]
        image: Option<PathBuf>,
        /// Read a `{"image": "<base64>"}` request from a file ("-" for stdin)
        #[arg(long)]
        request: Option<PathBuf>,
        /// Print the result (or error) as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show which secrets resolve and where the config lives
    CheckConfig,
    /// Write a default config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run the parsed CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let config_path = cli.config.clone().or_else(config::config_path);

    match &cli.command {
        Commands::Identify {
            image,
            request,
            json,
        } => {
            let config = load_config(config_path.as_ref());
            let rt = Runtime::new()?;
            cmd_identify(&rt, &config, image.as_deref(), request.as_deref(), *json)
        }
        Commands::CheckConfig => {
            let config = load_config(config_path.as_ref());
            cmd_check_config(config_path.as_deref(), &config)
        }
        Commands::InitConfig { force } => cmd_init_config(config_path.as_deref(), *force),
    }
}

fn load_config(path: Option<&PathBuf>) -> config::Config {
    match path {
        Some(path) => config::load_from(path),
        None => config::load(),
    }
}
