//! Messages exchanged with the disc reading worker.
//!
//! The worker reads one JSON [`RequestFrame`] per line from its input and
//! writes one JSON [`WorkerFrame`] per line to its output. Output frames are
//! either the response to a request (matched by `id`) or an out-of-band
//! [`ReaderOutput`] such as a log message or progress update.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Opaque handle for an open disc inside one worker process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session {}", self.0)
    }
}

/// Identifies one progress stream; updates with the same id replace each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressId(pub u64);

static NEXT_PROGRESS_ID: AtomicU64 = AtomicU64::new(1);

impl ProgressId {
    /// Allocate a fresh id, unique within this process.
    pub fn next() -> Self {
        Self(NEXT_PROGRESS_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub id: ProgressId,
    pub completed: u64,
    pub total: u64,
    pub description: String,
}

impl ProgressUpdate {
    /// Completed fraction in 0.0..=1.0; zero while the total is unknown.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.completed as f64 / self.total as f64).min(1.0)
        }
    }
}

/// Status output produced while a request is being served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReaderOutput {
    Message { severity: Severity, text: String },
    Progress(ProgressUpdate),
}

impl ReaderOutput {
    pub fn message(severity: Severity, text: impl Into<String>) -> Self {
        Self::Message {
            severity,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::message(Severity::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::message(Severity::Error, text)
    }

    pub fn progress(
        id: ProgressId,
        completed: u64,
        total: u64,
        description: impl Into<String>,
    ) -> Self {
        Self::Progress(ProgressUpdate {
            id,
            completed,
            total,
            description: description.into(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Request {
    /// Validate a disc path and allocate a session for it.
    Open { path: PathBuf },
    /// Read the full navigation structure of an open session.
    ReadInfo { session: SessionId },
    /// Release a session. Has no response.
    Close { session: SessionId },
}

impl Request {
    pub fn expects_response(&self) -> bool {
        !matches!(self, Self::Close { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Response {
    /// `None` when the path is not a supported disc.
    Opened { session: Option<SessionId> },
    /// JSON encoded `DiscInfo`, `None` when reading failed.
    Info { payload: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestFrame {
    pub id: u64,
    pub request: Request,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerFrame {
    Response { id: u64, response: Response },
    Output(ReaderOutput),
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
