//! Importing DVD-Video navigation structures.
//!
//! Disc reading happens in a separate worker process (`dvd-archive-worker`).
//! This crate starts and talks to that worker ([`connection`]), wraps it in
//! a per-disc client ([`DvdReader`]), and puts an [`Importer`] on top that
//! detects the source kind and reports status while it runs.

pub mod async_util;
pub mod connection;
pub mod import;
pub mod reader;
pub mod settings;

pub use async_util::run_with_events;
pub use connection::{Connect, Connection, Notification, Notifications, WorkerConfig};
pub use dvd_archive_core::{ConverterError, DiscInfo, ProgressUpdate, Severity};
pub use import::{ImportError, ImportStatus, Importer};
pub use reader::DvdReader;

#[cfg(test)]
#[path = "tests/in_process.rs"]
pub(crate) mod in_process;
