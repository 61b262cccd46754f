//! Command-line interface for snap-and-play.
//!
//! The CLI plays the camera client's role: it turns a photo into a capture
//! request, runs the pipeline, and renders progress and the outcome.

mod commands;

pub use commands::{Cli, Commands, run_command};
