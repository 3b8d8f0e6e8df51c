//! Raw layout of the information files.
//!
//! `VIDEO_TS.IFO` (video manager) and `VTS_nn_0.IFO` (title sets) are parsed
//! into plain structs that mirror the on-disc tables. All multi-byte fields
//! are big-endian. Table pointers in the management tables are sector
//! numbers relative to the start of the file; a zero pointer means the
//! table is absent. Interpreting the values is left to [`crate::decode`].

use dvd_archive_core::bits::{be_u16, be_u32, be_u64};

use crate::error::IfoError;

mod pgc;
pub(crate) mod tables;

pub use pgc::{CommandTable, RawCell, RawProgramChain};
pub use tables::{MenuUnit, PartEntry, ProgramChainEntry, TitleEntry};

const SECTOR: usize = 2048;

const VMG_MAGIC: &[u8; 12] = b"DVDVIDEO-VMG";
const VTS_MAGIC: &[u8; 12] = b"DVDVIDEO-VTS";

/// Most streams a title set may declare.
pub const MAX_AUDIO_STREAMS: usize = 8;
pub const MAX_SUBPICTURE_STREAMS: usize = 32;

// ---------------------------------------------------------------------------
// Bounds-checked access
// ---------------------------------------------------------------------------

/// A window onto one table of an information file.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Record<'a> {
    table: &'static str,
    data: &'a [u8],
}

impl<'a> Record<'a> {
    pub fn new(table: &'static str, data: &'a [u8]) -> Self {
        Self { table, data }
    }

    fn truncated(&self, offset: usize, needed: usize) -> IfoError {
        IfoError::Truncated {
            table: self.table,
            offset,
            needed,
            available: self.data.len(),
        }
    }

    pub fn u8(&self, offset: usize) -> Result<u8, IfoError> {
        self.data
            .get(offset)
            .copied()
            .ok_or_else(|| self.truncated(offset, 1))
    }

    pub fn u16(&self, offset: usize) -> Result<u16, IfoError> {
        be_u16(self.data, offset).ok_or_else(|| self.truncated(offset, 2))
    }

    pub fn u32(&self, offset: usize) -> Result<u32, IfoError> {
        be_u32(self.data, offset).ok_or_else(|| self.truncated(offset, 4))
    }

    pub fn u64(&self, offset: usize) -> Result<u64, IfoError> {
        be_u64(self.data, offset).ok_or_else(|| self.truncated(offset, 8))
    }

    pub fn bytes(&self, offset: usize, len: usize) -> Result<&'a [u8], IfoError> {
        offset
            .checked_add(len)
            .and_then(|end| self.data.get(offset..end))
            .ok_or_else(|| self.truncated(offset, len))
    }

    pub fn array<const N: usize>(&self, offset: usize) -> Result<[u8; N], IfoError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.bytes(offset, N)?);
        Ok(out)
    }

    /// The sub-table starting at `offset` and running to the end of this one.
    pub fn at(&self, table: &'static str, offset: usize) -> Result<Record<'a>, IfoError> {
        match self.data.get(offset..) {
            Some(rest) if !rest.is_empty() => Ok(Record::new(table, rest)),
            _ => Err(IfoError::OffsetOutOfRange { table, offset }),
        }
    }

    /// Follow a sector pointer stored at `pointer_offset`; `None` if zero.
    fn table_at_sector(
        &self,
        table: &'static str,
        pointer_offset: usize,
    ) -> Result<Option<Record<'a>>, IfoError> {
        let sector = self.u32(pointer_offset)? as usize;
        if sector == 0 {
            return Ok(None);
        }
        let offset = sector
            .checked_mul(SECTOR)
            .ok_or(IfoError::OffsetOutOfRange { table, offset: usize::MAX })?;
        self.at(table, offset).map(Some)
    }
}

// ---------------------------------------------------------------------------
// Stream attributes
// ---------------------------------------------------------------------------

/// Undecoded attribute records of one domain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAttributes {
    pub video: [u8; 2],
    pub audio: Vec<[u8; 8]>,
    pub subpicture: Vec<[u8; 6]>,
}

impl RawAttributes {
    /// Read a block laid out as: video at `base`, audio count at `base + 3`,
    /// audio records at `base + 4`, subpicture count at `base + 0x55` and
    /// subpicture records at `base + 0x56`.
    fn parse(
        mat: &Record<'_>,
        base: usize,
        max_audio: usize,
        max_subpicture: usize,
    ) -> Result<Self, IfoError> {
        let video = mat.array::<2>(base)?;

        let audio_count = (mat.u8(base + 0x03)? as usize).min(max_audio);
        let audio = (0..audio_count)
            .map(|i| mat.array::<8>(base + 0x04 + i * 8))
            .collect::<Result<_, _>>()?;

        let subpicture_count = (mat.u8(base + 0x55)? as usize).min(max_subpicture);
        let subpicture = (0..subpicture_count)
            .map(|i| mat.array::<6>(base + 0x56 + i * 6))
            .collect::<Result<_, _>>()?;

        Ok(Self {
            video,
            audio,
            subpicture,
        })
    }
}

// ---------------------------------------------------------------------------
// Video manager information (VIDEO_TS.IFO)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerInfo {
    /// Packed major/minor version.
    pub specification: u8,
    pub category: u32,
    pub volume_count: u16,
    pub volume_index: u16,
    pub disc_side: u8,
    pub title_set_count: u16,
    pub provider: String,
    pub pos_code: u64,

    pub first_play: Option<RawProgramChain>,
    /// Title search pointers (`TT_SRPT`), one per title on the disc.
    pub titles: Vec<TitleEntry>,
    /// Menu program chains by language unit (`VMGM_PGCI_UT`).
    pub menus: Vec<MenuUnit>,
    pub menu_attributes: RawAttributes,
}

pub fn parse_manager(data: &[u8]) -> Result<ManagerInfo, IfoError> {
    let mat = Record::new("VMGI_MAT", data);
    if mat.bytes(0, 12)? != VMG_MAGIC {
        return Err(IfoError::BadMagic {
            file: "VIDEO_TS.IFO".to_string(),
            expected: "DVDVIDEO-VMG",
        });
    }

    let provider = String::from_utf8_lossy(mat.bytes(64, 32)?)
        .trim_end_matches(['\0', ' '])
        .to_string();

    let first_play_offset = mat.u32(0x84)? as usize;
    let first_play = if first_play_offset == 0 {
        None
    } else {
        Some(RawProgramChain::parse(mat.at("first play PGC", first_play_offset)?)?)
    };

    let titles = match mat.table_at_sector("TT_SRPT", 0xC4)? {
        Some(table) => tables::parse_title_table(table)?,
        None => Vec::new(),
    };
    let menus = match mat.table_at_sector("VMGM_PGCI_UT", 0xC8)? {
        Some(table) => tables::parse_menu_units(table)?,
        None => Vec::new(),
    };

    Ok(ManagerInfo {
        specification: mat.u8(33)?,
        category: mat.u32(34)?,
        volume_count: mat.u16(38)?,
        volume_index: mat.u16(40)?,
        disc_side: mat.u8(42)?,
        title_set_count: mat.u16(62)?,
        provider,
        pos_code: mat.u64(96)?,
        first_play,
        titles,
        menus,
        menu_attributes: RawAttributes::parse(&mat, 0x100, 1, 1)?,
    })
}

// ---------------------------------------------------------------------------
// Video title set information (VTS_nn_0.IFO)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleSetInfo {
    pub specification: u8,
    pub category: u32,

    /// Part search pointers (`VTS_PTT_SRPT`): parts of each title, in order.
    pub parts: Vec<Vec<PartEntry>>,
    /// Title program chains (`VTS_PGCIT`).
    pub program_chains: Vec<ProgramChainEntry>,
    /// Menu program chains by language unit (`VTSM_PGCI_UT`).
    pub menus: Vec<MenuUnit>,

    pub menu_attributes: RawAttributes,
    pub title_attributes: RawAttributes,
}

pub fn parse_title_set(data: &[u8], title_set: u8) -> Result<TitleSetInfo, IfoError> {
    let mat = Record::new("VTSI_MAT", data);
    if mat.bytes(0, 12)? != VTS_MAGIC {
        return Err(IfoError::BadMagic {
            file: format!("VTS_{title_set:02}_0.IFO"),
            expected: "DVDVIDEO-VTS",
        });
    }

    let parts = match mat.table_at_sector("VTS_PTT_SRPT", 0xC8)? {
        Some(table) => tables::parse_part_table(table)?,
        None => Vec::new(),
    };
    let program_chains = match mat.table_at_sector("VTS_PGCIT", 0xCC)? {
        Some(table) => tables::parse_program_chain_table(table)?,
        None => Vec::new(),
    };
    let menus = match mat.table_at_sector("VTSM_PGCI_UT", 0xD0)? {
        Some(table) => tables::parse_menu_units(table)?,
        None => Vec::new(),
    };

    Ok(TitleSetInfo {
        specification: mat.u8(33)?,
        category: mat.u32(34)?,
        parts,
        program_chains,
        menus,
        menu_attributes: RawAttributes::parse(&mat, 0x100, 1, 1)?,
        title_attributes: RawAttributes::parse(
            &mat,
            0x200,
            MAX_AUDIO_STREAMS,
            MAX_SUBPICTURE_STREAMS,
        )?,
    })
}

#[cfg(test)]
#[path = "../tests/ifo_tests.rs"]
mod tests;
