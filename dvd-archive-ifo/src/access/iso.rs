//! ISO 9660 images of DVD-Video discs.
//!
//! Only what is needed to reach `VIDEO_TS` is parsed: the primary volume
//! descriptor, the root directory and the `VIDEO_TS` directory. Files on a
//! DVD-Video disc are single-extent and stored contiguously, so each file
//! maps to one byte range of the image.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use super::{BLOCK_SIZE, BlockReader, DiscAccess, InfoFile, Span, SpanReader, VobDomain};
use crate::error::AccessError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// The primary volume descriptor is always at sector 16.
const PVD_SECTOR: u64 = 16;

/// Directory flag in a directory record's file flags.
const FLAG_DIRECTORY: u8 = 0x02;

// ---------------------------------------------------------------------------
// Directory records
// ---------------------------------------------------------------------------

/// A parsed ISO 9660 directory record.
#[derive(Debug, Clone)]
struct DirectoryRecord {
    extent_lba: u32,
    data_length: u32,
    file_flags: u8,
    /// Upper-cased, without the `;1` version suffix.
    name: String,
}

impl DirectoryRecord {
    fn is_directory(&self) -> bool {
        self.file_flags & FLAG_DIRECTORY != 0
    }
}

/// Parse one directory record (length byte first).
fn parse_directory_record(data: &[u8]) -> Option<DirectoryRecord> {
    let record_len = *data.first()? as usize;
    if record_len < 33 || record_len > data.len() {
        return None;
    }

    let extent_lba = u32::from_le_bytes([data[2], data[3], data[4], data[5]]);
    let data_length = u32::from_le_bytes([data[10], data[11], data[12], data[13]]);
    let file_flags = data[25];
    let id_len = data[32] as usize;
    if 33 + id_len > record_len {
        return None;
    }

    // Identifiers 0x00 and 0x01 are the "." and ".." entries.
    let id = &data[33..33 + id_len];
    let name = match id {
        [0x00] => ".".to_string(),
        [0x01] => "..".to_string(),
        _ => {
            let raw = String::from_utf8_lossy(id).to_uppercase();
            raw.split(';').next().unwrap_or(&raw).to_string()
        }
    };

    Some(DirectoryRecord {
        extent_lba,
        data_length,
        file_flags,
        name,
    })
}

/// An ISO 9660 image file containing a `VIDEO_TS` directory.
#[derive(Debug)]
pub struct IsoImage {
    path: PathBuf,
    /// Image size in bytes.
    len: u64,
    /// Files of the `VIDEO_TS` directory by upper-cased name.
    files: HashMap<String, DirectoryRecord>,
}

impl IsoImage {
    pub fn open(path: &Path) -> Result<Self, AccessError> {
        let mut image = File::open(path)?;
        let len = image.metadata()?.len();

        let pvd = read_sector(&mut image, PVD_SECTOR)?;
        if pvd[0] != 0x01 || &pvd[1..6] != b"CD001" {
            return Err(AccessError::not_a_disc(format!(
                "{} has no ISO 9660 volume descriptor",
                path.display()
            )));
        }

        // Root directory record at offset 156, 34 bytes
        let root = parse_directory_record(&pvd[156..190])
            .ok_or_else(|| AccessError::invalid_image("malformed root directory record"))?;

        let video_ts = read_directory(&mut image, &root)?
            .into_iter()
            .find(|record| record.is_directory() && record.name == "VIDEO_TS")
            .ok_or_else(|| {
                AccessError::not_a_disc(format!("no VIDEO_TS directory in {}", path.display()))
            })?;

        let files: HashMap<String, DirectoryRecord> = read_directory(&mut image, &video_ts)?
            .into_iter()
            .filter(|record| !record.is_directory())
            .map(|record| (record.name.clone(), record))
            .collect();

        if !files.contains_key("VIDEO_TS.IFO") {
            return Err(AccessError::not_a_disc(format!(
                "no VIDEO_TS.IFO in {}",
                path.display()
            )));
        }
        log::debug!("Opened ISO image {} ({} files in VIDEO_TS)", path.display(), files.len());

        Ok(Self {
            path: path.to_path_buf(),
            len,
            files,
        })
    }

    /// The record of `name`, whose extent must lie within the image.
    fn record(&self, name: &str) -> Result<&DirectoryRecord, AccessError> {
        let record = self
            .files
            .get(name)
            .ok_or_else(|| AccessError::not_found(name))?;
        let end = u64::from(record.extent_lba) * BLOCK_SIZE as u64 + u64::from(record.data_length);
        if end > self.len {
            return Err(AccessError::invalid_image(format!(
                "{name} extends to byte {end}, beyond the {} byte image",
                self.len
            )));
        }
        Ok(record)
    }
}

fn read_sector(image: &mut File, sector: u64) -> Result<[u8; BLOCK_SIZE], AccessError> {
    image.seek(SeekFrom::Start(sector * BLOCK_SIZE as u64))?;
    let mut data = [0u8; BLOCK_SIZE];
    image.read_exact(&mut data).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            AccessError::invalid_image(format!("sector {sector} is beyond end of image"))
        } else {
            AccessError::Io(e)
        }
    })?;
    Ok(data)
}

/// All records of a directory extent, excluding "." and "..".
fn read_directory(
    image: &mut File,
    directory: &DirectoryRecord,
) -> Result<Vec<DirectoryRecord>, AccessError> {
    let mut records = Vec::new();
    let sectors = u64::from(directory.data_length).div_ceil(BLOCK_SIZE as u64);

    for offset in 0..sectors {
        let sector = read_sector(image, u64::from(directory.extent_lba) + offset)?;
        let mut pos = 0;
        while pos < BLOCK_SIZE {
            let record_len = sector[pos] as usize;
            // Records never span sectors; a zero length pads to the next one.
            if record_len == 0 || pos + record_len > BLOCK_SIZE {
                break;
            }
            if let Some(record) = parse_directory_record(&sector[pos..pos + record_len])
                && record.name != "."
                && record.name != ".."
            {
                records.push(record);
            }
            pos += record_len;
        }
    }
    Ok(records)
}

impl DiscAccess for IsoImage {
    fn stat_info(&self, file: InfoFile) -> Result<u64, AccessError> {
        Ok(u64::from(self.record(&file.ifo_name())?.data_length))
    }

    fn read_info(&self, file: InfoFile) -> Result<Vec<u8>, AccessError> {
        let record = self.record(&file.ifo_name())?;
        let mut image = File::open(&self.path)?;
        image.seek(SeekFrom::Start(u64::from(record.extent_lba) * BLOCK_SIZE as u64))?;
        let mut data = vec![0u8; record.data_length as usize];
        image.read_exact(&mut data)?;
        Ok(data)
    }

    fn open_vobs(
        &self,
        file: InfoFile,
        domain: VobDomain,
    ) -> Result<Box<dyn BlockReader>, AccessError> {
        let mut spans = Vec::new();
        let mut next_sector = 0u32;
        for name in file.vob_names(domain) {
            let Some(record) = self.files.get(&name) else {
                break;
            };
            let sectors = record.data_length / BLOCK_SIZE as u32;
            spans.push(Span {
                path: self.path.clone(),
                byte_offset: u64::from(record.extent_lba) * BLOCK_SIZE as u64,
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
