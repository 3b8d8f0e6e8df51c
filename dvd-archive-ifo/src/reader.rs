use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use dvd_archive_core::{DiscInfo, ReaderOutput};

use crate::access::{self, DiscAccess, InfoFile};
use crate::acquire;
use crate::check::{self, Declared};
use crate::decode;
use crate::error::{AccessError, ReadError};

/// An opened disc, ready to be read.
pub struct DiscReader {
    path: PathBuf,
    disc: Box<dyn DiscAccess>,
}

impl std::fmt::Debug for DiscReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscReader").field("path", &self.path).finish()
    }
}

impl DiscReader {
    /// Open `path` and check that it holds a non-empty manager information file.
    pub fn open(path: &Path) -> Result<Self, ReadError> {
        let disc = access::open_disc(path).map_err(ReadError::NotSupported)?;
        Self::with_access(path, disc)
    }

    /// Wrap an already opened disc.
    pub fn with_access(path: &Path, disc: Box<dyn DiscAccess>) -> Result<Self, ReadError> {
        let size = disc
            .stat_info(InfoFile::VideoManager)
            .map_err(ReadError::NotSupported)?;
        if size == 0 {
            return Err(ReadError::NotSupported(AccessError::not_a_disc(
                "VIDEO_TS.IFO is empty",
            )));
        }
        log::debug!("Opened {} (VIDEO_TS.IFO is {size} bytes)", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            disc,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Acquire, decode and check the whole navigation structure.
    ///
    /// Progress, recoverable errors and consistency warnings go to `output`.
    /// A returned error has not been sent; reporting it is up to the caller.
    pub fn read_info(&self, output: &Sender<ReaderOutput>) -> Result<DiscInfo, ReadError> {
        let raw = acquire::acquire(self.disc.as_ref(), output)?;
        log::info!(
            "Read {}: {} title sets, {} scanned program chains",
            self.path.display(),
            raw.title_sets.len(),
            raw.nav.len()
        );

        let info = decode::disc_info(&raw)?;
        for inconsistency in check::check(&info, &Declared::from(&raw.manager)) {
            log::warn!("{}: {inconsistency}", self.path.display());
            let _ = output.send(ReaderOutput::warning(inconsistency.to_string()));
        }
        Ok(info)
    }
}

#[cfg(test)]
#[path = "tests/reader_tests.rs"]
mod tests;
