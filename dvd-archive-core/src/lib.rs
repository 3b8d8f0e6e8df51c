//! Shared types for reading the navigation structure of DVD-Video discs.
//!
//! This crate holds the data model produced by a disc read ([`model`]), the
//! typed index and reference machinery it is built on, and the message
//! types spoken between the importer and its reader worker ([`protocol`]).

pub mod bits;
pub mod error;
pub mod index;
pub mod model;
pub(crate) mod pairs;
pub mod protocol;
pub mod reference;

pub use error::ConverterError;
pub use index::{Index, IndexRange};
pub use model::DiscInfo;
pub use protocol::{ProgressId, ProgressUpdate, ReaderOutput, Severity};
pub use reference::Reference;
