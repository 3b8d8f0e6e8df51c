//! Importing a disc into a [`DiscInfo`].
//!
//! [`Importer`] picks the import mechanism for a source by trying each one in
//! turn. Only DVD-Video sources are known today.

use std::path::{Path, PathBuf};

use dvd_archive_core::{ConverterError, DiscInfo, ProgressUpdate, ReaderOutput, Severity};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::connection::{Connect, Notification, Notifications};
use crate::reader::DvdReader;

#[derive(Debug, Error)]
pub enum ImportError {
    /// No import mechanism accepts the source.
    #[error("Source not supported: {}", .0.display())]
    SourceNotSupported(PathBuf),

    #[error(transparent)]
    Converter(#[from] ConverterError),
}

/// Status reported while an import runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportStatus {
    Message { severity: Severity, text: String },
    Progress(ProgressUpdate),
}

impl From<ReaderOutput> for ImportStatus {
    fn from(output: ReaderOutput) -> Self {
        match output {
            ReaderOutput::Message { severity, text } => Self::Message { severity, text },
            ReaderOutput::Progress(update) => Self::Progress(update),
        }
    }
}

/// An import from one source.
#[derive(Debug)]
pub struct Importer {
    source: PathBuf,
    dvd: DvdImport,
}

impl Importer {
    /// Detect the kind of `source` and prepare its import.
    pub async fn open(source: &Path, connect: &impl Connect) -> Result<Self, ImportError> {
        match DvdImport::open(source, connect).await {
            Ok(dvd) => {
                log::info!("Importing {} as DVD-Video", source.display());
                Ok(Self {
                    source: source.to_path_buf(),
                    dvd,
                })
            }
            Err(ConverterError::SourceNotSupported) => {
                log::debug!("{} is not a DVD", source.display());
                Err(ImportError::SourceNotSupported(source.to_path_buf()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Run the import, reporting status on `status` until it finishes.
    pub async fn generate(
        &mut self,
        status: mpsc::UnboundedSender<ImportStatus>,
    ) -> Result<DiscInfo, ImportError> {
        Ok(self.dvd.generate(&status).await?)
    }
}

/// DVD-Video import through a worker.
#[derive(Debug)]
struct DvdImport {
    reader: DvdReader,
    notifications: Notifications,
}

impl DvdImport {
    async fn open(source: &Path, connect: &impl Connect) -> Result<Self, ConverterError> {
        let (connection, notifications) = connect.connect();
        let reader = DvdReader::open(connection, source).await?;
        Ok(Self {
            reader,
            notifications,
        })
    }

    async fn generate(
        &mut self,
        status: &mpsc::UnboundedSender<ImportStatus>,
    ) -> Result<DiscInfo, ConverterError> {
        let info = self.reader.info();
        tokio::pin!(info);

        // The worker writes a read's output before its response, so taking
        // notifications first forwards all of them before the result.
        let result = loop {
            tokio::select! {
                biased;
                Some(notification) = self.notifications.recv() => {
                    forward(notification, status);
                }
                result = &mut info => break result,
            }
        };
        while let Ok(notification) = self.notifications.try_recv() {
            forward(notification, status);
        }
        result
    }
}

fn forward(notification: Notification, status: &mpsc::UnboundedSender<ImportStatus>) {
    match notification {
        Notification::Output(output) => {
            let _ = status.send(output.into());
        }
        // The failed call reports the same error.
        Notification::Failed(e) => log::debug!("Connection failure during import: {e}"),
    }
}

#[cfg(test)]
#[path = "tests/import_tests.rs"]
mod tests;
