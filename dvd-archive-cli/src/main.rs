//! dvd-archive CLI
//!
//! Command-line interface for importing DVD-Video navigation structures.

mod cli_types;
mod commands;
mod error;
mod progress;

use std::io::Write;

use clap::Parser;

use cli_types::{Cli, Commands, ConfigAction};
use commands::check::run_check;
use commands::config::{run_config_path, run_config_show, run_config_worker};
use commands::info::run_info;
pub(crate) use error::CliError;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let result = match cli.command {
        Commands::Info {
            path,
            output,
            compact,
        } => run_info(&path, output.as_deref(), compact, cli.quiet),
        Commands::Check { path } => run_check(&path, cli.quiet),
        Commands::Config { action } => match action {
            ConfigAction::Show => run_config_show(),
            ConfigAction::Path => run_config_path(),
            ConfigAction::Worker { path, clear } => {
                run_config_worker(if clear { None } else { path.as_deref() })
            }
        },
    };

    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}

/// Plain messages on stderr. `--quiet` keeps warnings and errors only.
fn init_logging(quiet: bool, verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else if quiet {
        log::LevelFilter::Warn
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format(|buf, record| match record.level() {
            log::Level::Info => writeln!(buf, "{}", record.args()),
            level => writeln!(buf, "{}: {}", level.as_str().to_lowercase(), record.args()),
        })
        .init();
}

pub(crate) fn log_blank() {
    log::info!("");
}
