//! CLI interface for gyrotone

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Motion sensors as synthesis controllers
#[derive(Parser)]
#[command(name = "gyrotone")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a live session through the audio device
    Run {
        /// Configuration file path
        #[arg(short, long, default_value = "gyrotone.yaml")]
        config: PathBuf,

        /// Stop after this many seconds (default: run until Ctrl-C)
        #[arg(short, long)]
        duration: Option<u64>,

        /// Record the parameter trajectory to this JSON file
        #[arg(short, long)]
        record: Option<PathBuf>,
    },

    /// Render a session offline to a WAV file
    Render {
        /// Configuration file path
        #[arg(short, long, default_value = "gyrotone.yaml")]
        config: PathBuf,

        /// Output WAV path
        #[arg(short, long)]
        output: PathBuf,

        /// Duration in seconds
        #[arg(short, long, default_value = "30")]
        duration: u64,

        /// Record the parameter trajectory to this JSON file
        #[arg(short, long)]
        record: Option<PathBuf>,
    },

    /// Play back a recorded trajectory
    Replay {
        /// Configuration file path
        #[arg(short, long, default_value = "gyrotone.yaml")]
        config: PathBuf,

        /// Trajectory JSON written by `run --record` or `render --record`
        trajectory: PathBuf,

        /// Render to this WAV file instead of the audio device
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List available audio output devices
    Devices,

    /// Validate a configuration file
    Check {
        /// Configuration file path
        #[arg(short, long, default_value = "gyrotone.yaml")]
        config: PathBuf,
    },

    /// Generate an example configuration file
    Init,
}
