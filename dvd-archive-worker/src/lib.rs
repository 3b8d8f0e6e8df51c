//! Disc reading worker.
//!
//! The worker runs as a child process of the importer so a disc that trips
//! up the reader cannot take the importer down with it. It speaks the line
//! protocol of [`dvd_archive_core::protocol`] on stdin and stdout and logs to
//! stderr.

pub mod serve;
pub mod session;

pub use serve::{DEFAULT_IDLE_TIMEOUT, ServeConfig, serve};
pub use session::{KeepAlive, SessionTable};
