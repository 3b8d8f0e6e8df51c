//! High-level client for reading a disc through a worker.

use std::path::{Path, PathBuf};

use dvd_archive_core::protocol::{Request, Response, SessionId};
use dvd_archive_core::{ConverterError, DiscInfo};

use crate::connection::Connection;

/// An open disc inside a worker.
///
/// The worker session is closed when the reader is dropped.
#[derive(Debug)]
pub struct DvdReader {
    connection: Connection,
    session: SessionId,
    path: PathBuf,
}

impl DvdReader {
    /// Ask the worker behind `connection` to open `path`.
    pub async fn open(connection: Connection, path: &Path) -> Result<Self, ConverterError> {
        let request = Request::Open {
            path: path.to_path_buf(),
        };
        match connection.call(request).await? {
            Response::Opened {
                session: Some(session),
            } => {
                log::debug!("{} opened as {session}", path.display());
                Ok(Self {
                    connection,
                    session,
                    path: path.to_path_buf(),
                })
            }
            Response::Opened { session: None } => Err(ConverterError::SourceNotSupported),
            other => {
                log::error!("Worker answered open with {other:?}");
                Err(ConverterError::ConnectionInvalid)
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Read the disc's navigation structure.
    ///
    /// Progress and messages of the read arrive on the connection's
    /// notification channel.
    pub async fn info(&self) -> Result<DiscInfo, ConverterError> {
        let request = Request::ReadInfo {
            session: self.session,
        };
        match self.connection.call(request).await? {
            Response::Info {
                payload: Some(payload),
            } => serde_json::from_str(&payload).map_err(|e| {
                log::error!("Undecodable disc info for {}: {e}", self.path.display());
                ConverterError::SourceReadError
            }),
            Response::Info { payload: None } => Err(ConverterError::SourceReadError),
            other => {
                log::error!("Worker answered read with {other:?}");
                Err(ConverterError::ConnectionInvalid)
            }
        }
    }
}

impl Drop for DvdReader {
    fn drop(&mut self) {
        self.connection.send(Request::Close {
            session: self.session,
        });
    }
}

#[cfg(test)]
#[path = "tests/reader_tests.rs"]
mod tests;
