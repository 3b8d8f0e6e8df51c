use super::{RawProgramChain, Record};
use crate::error::IfoError;

/// Every search table starts with an entry count, two reserved bytes and
/// the offset of its last byte.
const TABLE_HEADER: usize = 8;

/// One row of the title search pointer table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleEntry {
    /// Playback type bit field.
    pub playback_type: u8,
    pub angle_count: u8,
    pub part_count: u16,
    pub parental_id: u16,
    pub title_set: u8,
    /// Title number within its title set.
    pub title_set_title: u8,
    pub start_sector: u32,
}

/// Where a part (chapter) starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartEntry {
    pub program_chain: u16,
    pub program: u16,
}

/// One program chain search pointer together with the chain it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramChainEntry {
    /// Entry flag in bit 7; title number or menu type in the low bits.
    pub entry_id: u8,
    pub parental_mask: u16,
    /// Byte offset of the chain relative to its table; identifies the chain.
    pub offset: u32,
    pub program_chain: RawProgramChain,
}

/// A menu language unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuUnit {
    /// ISO 639 code, for example `"en"`.
    pub language: String,
    pub exists: u8,
    /// Byte offset of the unit relative to its table; identifies the unit.
    pub offset: u32,
    pub program_chains: Vec<ProgramChainEntry>,
}

pub(super) fn parse_title_table(table: Record<'_>) -> Result<Vec<TitleEntry>, IfoError> {
    let count = table.u16(0)? as usize;
    (0..count)
        .map(|i| {
            let base = TABLE_HEADER + i * 12;
            Ok(TitleEntry {
                playback_type: table.u8(base)?,
                angle_count: table.u8(base + 1)?,
                part_count: table.u16(base + 2)?,
                parental_id: table.u16(base + 4)?,
                title_set: table.u8(base + 6)?,
                title_set_title: table.u8(base + 7)?,
                start_sector: table.u32(base + 8)?,
            })
        })
        .collect()
}

/// Parts per title.
///
/// The table holds one offset per title; a title's part list runs until
/// the next title's offset, the last one until the end of the table.
pub(super) fn parse_part_table(table: Record<'_>) -> Result<Vec<Vec<PartEntry>>, IfoError> {
    let count = table.u16(0)? as usize;
    let end = table.u32(4)? as usize + 1;

    let offsets = (0..count)
        .map(|i| table.u32(TABLE_HEADER + i * 4).map(|o| o as usize))
        .collect::<Result<Vec<_>, _>>()?;

    offsets
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let stop = offsets.get(i + 1).copied().unwrap_or(end);
            let parts = stop.saturating_sub(start) / 4;
            (0..parts)
                .map(|p| {
                    let base = start + p * 4;
                    Ok(PartEntry {
                        program_chain: table.u16(base)?,
                        program: table.u16(base + 2)?,
                    })
                })
                .collect()
        })
        .collect()
}

pub(super) fn parse_program_chain_table(
    table: Record<'_>,
) -> Result<Vec<ProgramChainEntry>, IfoError> {
    let count = table.u16(0)? as usize;
    (0..count)
        .map(|i| {
            let base = TABLE_HEADER + i * 8;
            let offset = table.u32(base + 4)?;
            let chain = table.at("PGC", offset as usize)?;
            Ok(ProgramChainEntry {
                entry_id: table.u8(base)?,
                parental_mask: table.u16(base + 2)?,
                offset,
                program_chain: RawProgramChain::parse(chain)?,
            })
        })
        .collect()
}

pub(super) fn parse_menu_units(table: Record<'_>) -> Result<Vec<MenuUnit>, IfoError> {
    let count = table.u16(0)? as usize;
    (0..count)
        .map(|i| {
            let base = TABLE_HEADER + i * 8;
            let offset = table.u32(base + 4)?;
            let unit = table.at("PGCI_LU", offset as usize)?;
            Ok(MenuUnit {
                language: language_code(table.array::<2>(base)?),
                exists: table.u8(base + 3)?,
                offset,
                program_chains: parse_program_chain_table(unit)?,
            })
        })
        .collect()
}

/// Two ASCII letters; empty when unset.
pub(crate) fn language_code(raw: [u8; 2]) -> String {
    raw.iter()
        .filter(|b| b.is_ascii_alphabetic())
        .map(|&b| char::from(b).to_ascii_lowercase())
        .collect()
}
