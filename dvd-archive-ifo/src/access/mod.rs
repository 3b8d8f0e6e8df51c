//! Disc access layer.
//!
//! Supplies raw bytes of information files and 2048-byte blocks of video
//! object files. Two layouts are supported: a `VIDEO_TS` directory on a
//! file system (or a directory containing one) and an ISO 9660 image file.
//! Nothing returned from here is trusted by the layers above.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::error::AccessError;

mod directory;
mod iso;

pub use directory::VideoTsDirectory;
pub use iso::IsoImage;

/// Size of a logical block on DVD.
pub const BLOCK_SIZE: usize = 2048;

/// Title sets are numbered 1 through 99.
pub const MAX_TITLE_SETS: u8 = 99;

/// One information file: the video manager or a title set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InfoFile {
    VideoManager,
    TitleSet(u8),
}

impl InfoFile {
    pub fn ifo_name(self) -> String {
        match self {
            Self::VideoManager => "VIDEO_TS.IFO".to_string(),
            Self::TitleSet(n) => format!("VTS_{n:02}_0.IFO"),
        }
    }

    /// Names of the VOB files making up one domain, in sector order.
    ///
    /// Menus live in a single file; title content is split into up to nine
    /// parts that form one contiguous sector space.
    pub fn vob_names(self, domain: VobDomain) -> Vec<String> {
        match (self, domain) {
            (Self::VideoManager, _) => vec!["VIDEO_TS.VOB".to_string()],
            (Self::TitleSet(n), VobDomain::Menus) => vec![format!("VTS_{n:02}_0.VOB")],
            (Self::TitleSet(n), VobDomain::Titles) => {
                (1..=9).map(|part| format!("VTS_{n:02}_{part}.VOB")).collect()
            }
        }
    }
}

impl std::fmt::Display for InfoFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VideoManager => f.write_str("VMG"),
            Self::TitleSet(n) => write!(f, "VTS {n}"),
        }
    }
}

/// Which video object set of an information file to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VobDomain {
    /// First play and menus.
    Menus,
    Titles,
}

/// Random block access to one video object set.
pub trait BlockReader: Send {
    /// Read `count` blocks starting at `sector` into `buf`.
    ///
    /// `buf` must hold at least `count * BLOCK_SIZE` bytes. Returns the
    /// number of blocks read.
    fn read_blocks(&mut self, sector: u32, count: usize, buf: &mut [u8])
    -> Result<usize, AccessError>;
}

/// A DVD-Video file structure.
pub trait DiscAccess: Send {
    /// Size in bytes of an information file.
    fn stat_info(&self, file: InfoFile) -> Result<u64, AccessError>;

    /// Full contents of an information file.
    fn read_info(&self, file: InfoFile) -> Result<Vec<u8>, AccessError>;

    fn open_vobs(
        &self,
        file: InfoFile,
        domain: VobDomain,
    ) -> Result<Box<dyn BlockReader>, AccessError>;

    /// A 16-byte identifier: the MD5 of the manager information file and
    /// the information files of title sets 1 to 9 that exist.
    fn disc_id(&self) -> Result<[u8; 16], AccessError> {
        let mut context = md5::Context::new();
        context.consume(self.read_info(InfoFile::VideoManager)?);
        for n in 1..=9 {
            match self.read_info(InfoFile::TitleSet(n)) {
                Ok(data) => context.consume(data),
                Err(AccessError::NotFound(_)) => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(context.compute().0)
    }
}

/// Open a disc from a directory or an ISO image, whichever `path` is.
pub fn open_disc(path: &Path) -> Result<Box<dyn DiscAccess>, AccessError> {
    let metadata = std::fs::metadata(path)?;
    if metadata.is_dir() {
        Ok(Box::new(VideoTsDirectory::open(path)?))
    } else if metadata.is_file() {
        Ok(Box::new(IsoImage::open(path)?))
    } else {
        Err(AccessError::not_a_disc(format!(
            "{} is neither a directory nor a file",
            path.display()
        )))
    }
}

// ---------------------------------------------------------------------------
// Span-based block reader shared by both layouts
// ---------------------------------------------------------------------------

/// A run of blocks stored contiguously in one host file.
#[derive(Debug, Clone)]
pub(crate) struct Span {
    pub path: PathBuf,
    /// Byte offset of the span's first block within `path`.
    pub byte_offset: u64,
    pub first_sector: u32,
    pub sector_count: u32,
}

/// Maps a VOB set's sector space onto host files.
pub(crate) struct SpanReader {
    name: String,
    spans: Vec<Span>,
    open: Option<(usize, File)>,
}

impl SpanReader {
    pub fn new(name: impl Into<String>, spans: Vec<Span>) -> Self {
        Self {
            name: name.into(),
            spans,
            open: None,
        }
    }

    fn locate(&self, sector: u32) -> Option<usize> {
        self.spans.iter().position(|span| {
            sector >= span.first_sector && sector - span.first_sector < span.sector_count
        })
    }

    fn file_for(&mut self, index: usize) -> Result<&mut File, AccessError> {
        let reopen = !matches!(&self.open, Some((open, _)) if *open == index);
        if reopen {
            let file = File::open(&self.spans[index].path)?;
            self.open = Some((index, file));
        }
        match &mut self.open {
            Some((_, file)) => Ok(file),
            None => Err(AccessError::not_found(self.name.clone())),
        }
    }
}

impl BlockReader for SpanReader {
    fn read_blocks(
        &mut self,
        sector: u32,
        count: usize,
        buf: &mut [u8],
    ) -> Result<usize, AccessError> {
        if buf.len() < count * BLOCK_SIZE {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "buffer too small for requested blocks",
            )
            .into());
        }

        for i in 0..count {
            let current = sector.saturating_add(i as u32);
            let index = self.locate(current).ok_or_else(|| AccessError::OutOfRange {
                file: self.name.clone(),
                sector: current,
            })?;
            let span = &self.spans[index];
            let offset = span.byte_offset + u64::from(current - span.first_sector) * BLOCK_SIZE as u64;

            let file = self.file_for(index)?;
            file.seek(SeekFrom::Start(offset))?;
            file.read_exact(&mut buf[i * BLOCK_SIZE..(i + 1) * BLOCK_SIZE])?;
        }
        Ok(count)
    }
}

#[cfg(test)]
#[path = "../tests/access_tests.rs"]
mod tests;
