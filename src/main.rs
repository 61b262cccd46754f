//! Snap & Play - identify an album from a photo of its cover.
//!
//! A vision model reads the title and artist off the cover, then the Spotify
//! catalog resolves that guess to a canonical album record.

pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod recognition;
pub mod secrets;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Logs go to stderr so `--json` output on stdout stays parseable
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("snap_and_play=info".parse()?))
        .init();

    cli::run_command(&args)
}
