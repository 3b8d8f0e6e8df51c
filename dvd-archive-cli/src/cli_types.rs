//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dvd-archive")]
#[command(about = "Import the navigation structure of DVD-Video discs", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Read a disc and write its navigation structure as JSON
    Info {
        /// VIDEO_TS directory, a directory containing one, or an ISO image
        path: PathBuf,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write JSON without indentation
        #[arg(long)]
        compact: bool,
    },

    /// Read a disc and report problems found along the way
    Check {
        /// VIDEO_TS directory, a directory containing one, or an ISO image
        path: PathBuf,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the settings and where the worker is found
    Show,

    /// Print the settings file path
    Path,

    /// Set the worker executable (or clear it with --clear)
    Worker {
        /// Path to dvd-archive-worker
        #[arg(required_unless_present = "clear")]
        path: Option<PathBuf>,

        /// Remove the configured worker path
        #[arg(long, conflicts_with = "path")]
        clear: bool,
    },
}
