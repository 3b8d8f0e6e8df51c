//! Reading the navigation structure of DVD-Video discs.
//!
//! The read runs in three stages:
//!
//! 1. [`acquire`] pulls the information files and scans the navigation
//!    packets of every relevant program chain through an [`access`] backend.
//! 2. [`decode`] interprets the raw tables into a [`DiscInfo`].
//! 3. [`check`] compares the result against the counts the disc declares.
//!
//! [`DiscReader`] ties the stages together.
//!
//! [`DiscInfo`]: dvd_archive_core::DiscInfo

pub mod access;
pub mod acquire;
pub mod check;
pub mod decode;
pub mod error;
pub mod ifo;
pub mod nav;
pub mod reader;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use access::{DiscAccess, InfoFile, open_disc};
pub use error::{AccessError, IfoError, ReadError};
pub use reader::DiscReader;
