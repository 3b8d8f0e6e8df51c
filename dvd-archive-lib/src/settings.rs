//! User settings for the importer: `~/.config/dvd-archive/settings.toml`.
//!
//! ```toml
//! [worker]
//! path = "/usr/local/bin/dvd-archive-worker"
//! idle_timeout_secs = 60
//! ```

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::connection::WorkerConfig;

/// Environment variable naming the worker executable.
pub const WORKER_ENV: &str = "DVD_ARCHIVE_WORKER";

/// File name of the worker executable.
pub const WORKER_NAME: &str = if cfg!(windows) {
    "dvd-archive-worker.exe"
} else {
    "dvd-archive-worker"
};

/// Idle timeout the worker uses when none is configured.
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 300;

/// Canonical path to the settings file.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("dvd-archive").join("settings.toml")
}

/// The `[worker]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerSettings {
    pub path: Option<PathBuf>,
    pub idle_timeout: Option<Duration>,
}

/// Read `[worker]` from `settings`. Missing or unreadable files give defaults.
pub fn load_worker_settings(settings: &Path) -> WorkerSettings {
    let Some(doc) = std::fs::read_to_string(settings)
        .ok()
        .and_then(|contents| contents.parse::<toml::Value>().ok())
    else {
        return WorkerSettings::default();
    };
    let Some(worker) = doc.get("worker") else {
        return WorkerSettings::default();
    };

    let path = worker
        .get("path")
        .and_then(toml::Value::as_str)
        .filter(|path| !path.is_empty())
        .map(PathBuf::from);
    let idle_timeout = worker
        .get("idle_timeout_secs")
        .and_then(toml::Value::as_integer)
        .and_then(|secs| u64::try_from(secs).ok())
        .map(Duration::from_secs);
    WorkerSettings { path, idle_timeout }
}

/// Save (or clear) `worker.path`, keeping everything else in the file.
pub fn save_worker_path(settings: &Path, worker: Option<&Path>) -> io::Result<()> {
    let mut doc: toml::Value = match std::fs::read_to_string(settings) {
        Ok(contents) => contents
            .parse()
            .unwrap_or_else(|_| toml::Value::Table(Default::default())),
        Err(_) => toml::Value::Table(Default::default()),
    };

    let table = doc
        .as_table_mut()
        .ok_or_else(|| io::Error::other("settings.toml root is not a table"))?;
    let worker_table = table
        .entry("worker")
        .or_insert_with(|| toml::Value::Table(Default::default()))
        .as_table_mut()
        .ok_or_else(|| io::Error::other("[worker] is not a table"))?;
    match worker {
        Some(path) => {
            worker_table.insert(
                "path".to_string(),
                toml::Value::String(path.to_string_lossy().into_owned()),
            );
        }
        None => {
            worker_table.remove("path");
        }
    }

    if let Some(parent) = settings.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let serialized = toml::to_string_pretty(&doc).map_err(io::Error::other)?;
    let tmp = settings.with_extension("toml.tmp");
    std::fs::write(&tmp, serialized)?;
    std::fs::rename(&tmp, settings)
}

/// The settings file as pretty-printed TOML, if it exists and parses.
pub fn load_settings_string(settings: &Path) -> Option<String> {
    let contents = std::fs::read_to_string(settings).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    toml::to_string_pretty(&doc).ok()
}

/// Find the worker executable.
///
/// 1. `DVD_ARCHIVE_WORKER`
/// 2. `worker.path` in the settings
/// 3. Next to the running executable
/// 4. Bare name, found through `PATH`
pub fn resolve_worker_path(settings: &WorkerSettings) -> PathBuf {
    let sibling = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(WORKER_NAME)));
    worker_path_from(std::env::var_os(WORKER_ENV), settings, sibling)
}

fn worker_path_from(
    env: Option<OsString>,
    settings: &WorkerSettings,
    sibling: Option<PathBuf>,
) -> PathBuf {
    if let Some(path) = env.filter(|path| !path.is_empty()) {
        return PathBuf::from(path);
    }
    if let Some(path) = &settings.path {
        return path.clone();
    }
    match sibling {
        Some(path) if path.is_file() => path,
        _ => PathBuf::from(WORKER_NAME),
    }
}

/// Worker configuration from the user's settings file.
pub fn worker_config() -> WorkerConfig {
    let settings = load_worker_settings(&settings_path());
    WorkerConfig {
        program: resolve_worker_path(&settings),
        idle_timeout: settings.idle_timeout,
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
