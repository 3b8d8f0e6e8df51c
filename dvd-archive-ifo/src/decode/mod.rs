//! Interpretation of raw disc data into the [`DiscInfo`] model.
//!
//! Decoding never fails on unexpected field values: those become the
//! `Unexpected` variants of the model. Only structural contradictions
//! between tables are reported as [`ReadError::MalformedRecord`].

use std::collections::BTreeMap;

use dvd_archive_core::bits::Bits;
use dvd_archive_core::model::{
    CommandPresence, Descriptor, DiscInfo, Domain, MenuType, Part, Program, ProgramChain,
    ProgramChainId, ProgramChains, Restrictions, Title, TitleSet, Version,
};
use dvd_archive_core::reference::Reference;
use dvd_archive_core::Index;

use crate::access::InfoFile;
use crate::acquire::{RawDisc, ScanTarget};
use crate::error::ReadError;
use crate::ifo::{MenuUnit, ProgramChainEntry, RawAttributes, TitleEntry, TitleSetInfo};

pub mod attributes;
pub mod command;
pub mod interaction;
pub mod program_chain;

pub use program_chain::program_chain;

/// Build the disc model from everything acquired.
pub fn disc_info(raw: &RawDisc) -> Result<DiscInfo, ReadError> {
    let manager = &raw.manager;
    let vmg = InfoFile::VideoManager;

    let start = manager
        .first_play
        .as_ref()
        .map(|pgc| program_chain(pgc, raw.nav.cells(vmg, ScanTarget::FirstPlay)));

    let title_sets = raw
        .title_sets
        .iter()
        .map(|(&n, info)| {
            let title_set = title_set(raw, n, info)?;
            Ok((Index::from(n), title_set))
        })
        .collect::<Result<_, ReadError>>()?;

    Ok(DiscInfo {
        specification: Version::from_packed(manager.specification),
        category: manager.category,
        disc_id: raw.disc_id,
        provider: manager.provider.clone(),
        pos_code: manager.pos_code,
        total_volume_count: manager.volume_count,
        volume_index: manager.volume_index,
        disc_side: manager.disc_side,
        start,
        top_level_menus: menu_domain(raw, vmg, &manager.menus, &manager.menu_attributes),
        title_sets,
    })
}

fn title_set(raw: &RawDisc, n: u8, info: &TitleSetInfo) -> Result<TitleSet, ReadError> {
    let file = InfoFile::TitleSet(n);
    Ok(TitleSet {
        titles: titles(n, info, &raw.manager.titles)?,
        menus: menu_domain(raw, file, &info.menus, &info.menu_attributes),
        content: title_domain(raw, file, &info.program_chains, &info.title_attributes),
        specification: Version::from_packed(info.specification),
        category: info.category,
    })
}

/// Titles of title set `n`, from the disc-wide title table.
fn titles(
    n: u8,
    info: &TitleSetInfo,
    entries: &[TitleEntry],
) -> Result<BTreeMap<Index<Title>, Title>, ReadError> {
    let mut titles = BTreeMap::new();
    for (i, entry) in entries.iter().enumerate().filter(|(_, e)| e.title_set == n) {
        if entry.title_set_title == 0 {
            return Err(ReadError::malformed_record(format!(
                "title {} has no title number within VTS {n}",
                i + 1
            )));
        }

        let parts = info
            .parts
            .get(usize::from(entry.title_set_title) - 1)
            .map(|parts| {
                parts
                    .iter()
                    .enumerate()
                    .map(|(p, part)| {
                        let start = Reference::<TitleSet, Program>::new(
                            Index::from(part.program_chain),
                            Index::from(part.program),
                        );
                        (Index::new(p as u32 + 1), Part { start })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let mut jump_commands = CommandPresence::empty();
        jump_commands.set(CommandPresence::FEATURES, entry.playback_type.bit(2));
        jump_commands.set(CommandPresence::BUTTONS, entry.playback_type.bit(3));
        jump_commands.set(CommandPresence::PRE_POST, entry.playback_type.bit(4));
        jump_commands.set(CommandPresence::CELLS, entry.playback_type.bit(5));

        let mut restrictions = Restrictions::empty();
        restrictions.set(Restrictions::NO_JUMP_INTO_TITLE, entry.playback_type.bit(0));
        restrictions.set(Restrictions::NO_JUMP_TO_PART, entry.playback_type.bit(1));

        let title = Title {
            global_index: Index::new(i as u32 + 1),
            parts,
            viewing_angle_count: entry.angle_count,
            jump_commands,
            linear_playback: !entry.playback_type.bit(6),
            restrictions,
        };
        if titles.insert(Index::from(entry.title_set_title), title).is_some() {
            return Err(ReadError::malformed_record(format!(
                "title {} of VTS {n} listed twice",
                entry.title_set_title
            )));
        }
    }
    Ok(titles)
}

fn menu_domain(
    raw: &RawDisc,
    file: InfoFile,
    units: &[MenuUnit],
    attributes: &RawAttributes,
) -> Domain {
    let mut mapping = BTreeMap::new();
    let mut storage = BTreeMap::new();

    for unit in units {
        for (i, entry) in unit.program_chains.iter().enumerate() {
            let id = ProgramChainId {
                language_id: Some(unit.offset),
                program_chain_id: entry.offset,
            };
            let entry_point = entry.entry_id.bit(7);
            let descriptor = Descriptor::Menu {
                language: unit.language.clone(),
                index: Index::new(i as u32 + 1),
                entry_point,
                menu_type: entry_point.then(|| MenuType::from_id(entry.entry_id.bits(0..=3))),
            };
            mapping.insert(descriptor, id);
            store(raw, file, id, entry, &mut storage);
        }
    }

    domain(ProgramChains::new(mapping, storage), attributes)
}

fn title_domain(
    raw: &RawDisc,
    file: InfoFile,
    entries: &[ProgramChainEntry],
    attributes: &RawAttributes,
) -> Domain {
    let mut mapping = BTreeMap::new();
    let mut storage = BTreeMap::new();

    for (i, entry) in entries.iter().enumerate() {
        let id = ProgramChainId {
            language_id: None,
            program_chain_id: entry.offset,
        };
        let descriptor = Descriptor::Title {
            index: Index::new(i as u32 + 1),
            entry_point: entry.entry_id.bit(7),
            title: Index::from(entry.entry_id.bits(0..=6)),
        };
        mapping.insert(descriptor, id);
        store(raw, file, id, entry, &mut storage);
    }

    domain(ProgramChains::new(mapping, storage), attributes)
}

/// Decode a chain once per id; later descriptors of the same record share it.
fn store(
    raw: &RawDisc,
    file: InfoFile,
    id: ProgramChainId,
    entry: &ProgramChainEntry,
    storage: &mut BTreeMap<ProgramChainId, ProgramChain>,
) {
    storage.entry(id).or_insert_with(|| {
        let packets = raw.nav.cells(file, ScanTarget::ProgramChain(id));
        program_chain(&entry.program_chain, packets)
    });
}

fn domain(program_chains: ProgramChains, raw: &RawAttributes) -> Domain {
    Domain {
        program_chains,
        video: attributes::video(raw.video),
        audio: raw
            .audio
            .iter()
            .enumerate()
            .map(|(i, &record)| (Index::new(i as u32), attributes::audio(record)))
            .collect(),
        subpicture: raw
            .subpicture
            .iter()
            .enumerate()
            .map(|(i, &record)| (Index::new(i as u32), attributes::subpicture(record)))
            .collect(),
    }
}

#[cfg(test)]
#[path = "../tests/decode_tests.rs"]
mod tests;
