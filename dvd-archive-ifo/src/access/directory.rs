use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{BLOCK_SIZE, BlockReader, DiscAccess, InfoFile, Span, SpanReader, VobDomain};
use crate::error::AccessError;

/// A `VIDEO_TS` directory on a regular file system.
///
/// File names are matched case-insensitively; discs copied from some
/// systems end up with lower-case names.
#[derive(Debug)]
pub struct VideoTsDirectory {
    root: PathBuf,
    /// Upper-cased file name to its actual path.
    files: HashMap<String, PathBuf>,
}

impl VideoTsDirectory {
    /// Open `path`, which is either the `VIDEO_TS` directory itself or a
    /// directory containing one.
    pub fn open(path: &Path) -> Result<Self, AccessError> {
        let root = find_video_ts(path)?;
        let mut files = HashMap::new();
        for entry in std::fs::read_dir(&root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_uppercase();
            files.insert(name, entry.path());
        }

        if !files.contains_key("VIDEO_TS.IFO") {
            return Err(AccessError::not_a_disc(format!(
                "no VIDEO_TS.IFO in {}",
                root.display()
            )));
        }
        log::debug!("Opened VIDEO_TS directory {} ({} files)", root.display(), files.len());
        Ok(Self { root, files })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, name: &str) -> Result<&PathBuf, AccessError> {
        self.files
            .get(name)
            .ok_or_else(|| AccessError::not_found(name))
    }
}

fn find_video_ts(path: &Path) -> Result<PathBuf, AccessError> {
    let is_video_ts = path
        .file_name()
        .is_some_and(|name| name.eq_ignore_ascii_case("VIDEO_TS"));
    if is_video_ts {
        return Ok(path.to_path_buf());
    }

    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() && entry.file_name().eq_ignore_ascii_case("VIDEO_TS") {
            return Ok(entry.path());
        }
    }
    Err(AccessError::not_a_disc(format!(
        "no VIDEO_TS directory in {}",
        path.display()
    )))
}

impl DiscAccess for VideoTsDirectory {
    fn stat_info(&self, file: InfoFile) -> Result<u64, AccessError> {
        let path = self.path_of(&file.ifo_name())?;
        Ok(std::fs::metadata(path)?.len())
    }

    fn read_info(&self, file: InfoFile) -> Result<Vec<u8>, AccessError> {
        let path = self.path_of(&file.ifo_name())?;
        Ok(std::fs::read(path)?)
    }

    fn open_vobs(
        &self,
        file: InfoFile,
        domain: VobDomain,
    ) -> Result<Box<dyn BlockReader>, AccessError> {
        let mut spans = Vec::new();
        let mut next_sector = 0u32;
        for name in file.vob_names(domain) {
            let Some(path) = self.files.get(&name) else {
                // Title VOBs are numbered without gaps.
                break;
            };
            let sectors = (std::fs::metadata(path)?.len() / BLOCK_SIZE as u64) as u32;
            spans.push(Span {
                path: path.clone(),
                byte_offset: 0,
                first_sector: next_sector,
                sector_count: sectors,
            });
            next_sector += sectors;
        }

        if spans.is_empty() {
            return Err(AccessError::not_found(format!("{file} VOBs")));
        }
        Ok(Box::new(SpanReader::new(format!("{file} VOBs"), spans)))
    }
}
