use dvd_archive_lib::ImportError;
use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Import failed: {0}")]
    Import(#[from] ImportError),

    #[error("Could not write JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Runtime creation or async error
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// The disc was read, but with problems.
    #[error("{0} problem(s) found")]
    Problems(usize),
}

impl CliError {
    pub(crate) fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }
}
