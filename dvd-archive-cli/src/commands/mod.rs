pub(crate) mod check;
pub(crate) mod config;
pub(crate) mod info;

use std::path::Path;

use dvd_archive_lib::{
    DiscInfo, ImportStatus, Importer, Severity, WorkerConfig, run_with_events, settings,
};
use tokio::sync::mpsc;

use crate::CliError;
use crate::progress::ImportProgress;

/// A finished import and the messages reported while it ran.
pub(crate) struct Imported {
    pub info: DiscInfo,
    pub messages: Vec<(Severity, String)>,
}

impl Imported {
    /// Warnings and errors reported by the reader.
    pub(crate) fn problems(&self) -> impl Iterator<Item = &(Severity, String)> {
        self.messages
            .iter()
            .filter(|(severity, _)| *severity >= Severity::Warning)
    }
}

/// Import `path` through the configured worker, showing progress unless
/// `quiet`. Messages are logged as they arrive.
pub(crate) fn import_disc(path: &Path, quiet: bool) -> Result<Imported, CliError> {
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::runtime(format!("Failed to create async runtime: {e}")))?;
    let worker = settings::worker_config();
    log::debug!("Using worker {}", worker.program.display());

    rt.block_on(import_with(path, &worker, quiet))
}

async fn import_with(
    path: &Path,
    worker: &WorkerConfig,
    quiet: bool,
) -> Result<Imported, CliError> {
    let mut importer = Importer::open(path, worker).await?;
    let progress = ImportProgress::new(quiet);
    let mut messages = Vec::new();

    let (tx, rx) = mpsc::unbounded_channel();
    let result = run_with_events(importer.generate(tx), rx, |status| match status {
        ImportStatus::Progress(update) => progress.update(&update),
        ImportStatus::Message { severity, text } => {
            progress.suspend(|| log_message(severity, &text));
            messages.push((severity, text));
        }
    })
    .await;
    progress.finish();

    Ok(Imported {
        info: result?,
        messages,
    })
}

fn log_message(severity: Severity, text: &str) {
    match severity {
        Severity::Error => log::error!("{text}"),
        Severity::Warning => log::warn!("{text}"),
        Severity::Info => log::info!("{text}"),
        Severity::Debug => log::debug!("{text}"),
    }
}
