use std::path::Path;

use dvd_archive_lib::settings::{
    self, WORKER_ENV, load_settings_string, load_worker_settings, resolve_worker_path,
    save_worker_path, settings_path,
};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;

/// Show the settings file and how the worker will be found.
pub(crate) fn run_config_show() -> Result<(), CliError> {
    let path = settings_path();
    let worker = load_worker_settings(&path);

    log::info!(
        "{}",
        "dvd-archive Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    let source = if std::env::var_os(WORKER_ENV).is_some_and(|v| !v.is_empty()) {
        format!("env: {WORKER_ENV}")
    } else if worker.path.is_some() {
        "settings file".to_string()
    } else {
        "default".to_string()
    };
    log::info!(
        "  Worker:        {} {}",
        resolve_worker_path(&worker).display(),
        format!("({source})").if_supports_color(Stdout, |t| t.dimmed()),
    );
    match worker.idle_timeout {
        Some(timeout) => log::info!("  Idle timeout:  {}s", timeout.as_secs()),
        None => log::info!(
            "  Idle timeout:  {} {}",
            settings::DEFAULT_IDLE_TIMEOUT_SECS,
            "(worker default)".if_supports_color(Stdout, |t| t.dimmed()),
        ),
    }

    if let Some(contents) = load_settings_string(&path) {
        crate::log_blank();
        for line in contents.lines() {
            log::info!("  {line}");
        }
    }
    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    println!("{}", settings_path().display());
    Ok(())
}

/// Set the worker executable, or clear it when `worker` is `None`.
pub(crate) fn run_config_worker(worker: Option<&Path>) -> Result<(), CliError> {
    let path = settings_path();
    if let Some(missing) = worker.filter(|w| !w.is_file()) {
        log::warn!("{} does not exist yet", missing.display());
    }
    save_worker_path(&path, worker)?;

    match worker {
        Some(worker) => log::info!(
            "{} worker to {}",
            "Set".if_supports_color(Stdout, |t| t.green()),
            worker.display().if_supports_color(Stdout, |t| t.cyan()),
        ),
        None => log::info!(
            "{} worker path",
            "Cleared".if_supports_color(Stdout, |t| t.green()),
        ),
    }
    Ok(())
}
