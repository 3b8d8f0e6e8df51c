use std::collections::BTreeMap;

use dvd_archive_core::bits::Bits;
use dvd_archive_core::index::IndexRange;
use dvd_archive_core::model::{
    AngleInfo, Cell, CellPlayback, Color, Command, Domain, EndingMode, KaraokeInfo, PlaybackMode,
    Program, ProgramChain, Restrictions, SubpictureDescriptor, Time,
};
use dvd_archive_core::reference::Reference;
use dvd_archive_core::Index;

use super::{command, interaction};
use crate::ifo::{RawCell, RawProgramChain};
use crate::nav::NavPacket;

/// Decode a program chain; `packets` holds the navigation packets scanned
/// for each cell, in cell order, when the chain was scanned.
pub fn program_chain(raw: &RawProgramChain, packets: Option<&[Vec<NavPacket>]>) -> ProgramChain {
    let programs = raw
        .program_map
        .iter()
        .enumerate()
        .map(|(i, &entry_cell)| {
            let start = Reference::<ProgramChain, Cell>::new(Index::from(entry_cell));
            (Index::new(i as u32 + 1), Program { start })
        })
        .collect();

    let cells = raw
        .cells
        .iter()
        .enumerate()
        .map(|(i, cell_info)| {
            let cell_packets = packets.and_then(|p| p.get(i)).map(Vec::as_slice).unwrap_or(&[]);
            (Index::new(i as u32 + 1), cell(cell_info, cell_packets))
        })
        .collect();

    let playback = match raw.playback_mode {
        0 => PlaybackMode::Sequential,
        mode if mode.bit(7) => PlaybackMode::Shuffle {
            program_count: mode.bits(0..=6) + 1,
        },
        mode => PlaybackMode::Random {
            program_count: mode.bits(0..=6) + 1,
        },
    };

    let map_audio = raw
        .audio_control
        .iter()
        .enumerate()
        .filter(|(_, control)| control.bit(15))
        .map(|(i, control)| (Index::new(i as u32), Index::from(control.bits(8..=10))))
        .collect();

    let map_subpicture = raw
        .subpicture_control
        .iter()
        .enumerate()
        .filter(|(_, control)| control.bit(31))
        .map(|(i, control)| {
            let streams = [
                (SubpictureDescriptor::Classic, control.bits(24..=28)),
                (SubpictureDescriptor::Wide, control.bits(16..=20)),
                (SubpictureDescriptor::Letterbox, control.bits(8..=12)),
                (SubpictureDescriptor::PanScan, control.bits(0..=4)),
            ]
            .into_iter()
            .map(|(descriptor, stream)| (descriptor, Index::new(stream)))
            .collect();
            (Index::new(i as u32), streams)
        })
        .collect();

    let sibling = |n: u16| (n != 0).then(|| Reference::<Domain, ProgramChain>::new(Index::from(n)));

    let button_palette = raw
        .palette
        .iter()
        .enumerate()
        .map(|(i, &[_, y, cr, cb])| (Index::new(i as u32), Color { y, cb, cr }))
        .collect();

    ProgramChain {
        programs,
        cells,
        duration: Time::decode(raw.playback_time),
        playback,
        ending: EndingMode::from_still_time(raw.still_time),
        map_audio,
        map_subpicture,
        next: sibling(raw.next),
        previous: sibling(raw.previous),
        up: sibling(raw.up),
        pre: commands(&raw.commands.pre),
        post: commands(&raw.commands.post),
        cell_post: commands(&raw.commands.cell),
        button_palette,
        restrictions: Restrictions::from_bits_truncate(raw.prohibited_ops),
    }
}

fn commands(raw: &[u64]) -> BTreeMap<Index<Command>, Command> {
    raw.iter()
        .enumerate()
        .map(|(i, &word)| (Index::new(i as u32 + 1), command::decode(word)))
        .collect()
}

fn cell(raw: &RawCell, packets: &[NavPacket]) -> Cell {
    let duration = Time::decode(raw.playback_time);

    let mut playback = CellPlayback::empty();
    playback.set(CellPlayback::SEAMLESS, raw.category.bit(3));
    playback.set(CellPlayback::INTERLEAVED, raw.category.bit(2));
    playback.set(CellPlayback::TIME_DISCONTINUITY, raw.category.bit(1));
    playback.set(CellPlayback::SEAMLESS_ANGLE, raw.category.bit(0));
    playback.set(CellPlayback::ALL_STILL_FRAMES, raw.attributes.bit(6));
    playback.set(CellPlayback::STOP_FAST_FORWARD, raw.attributes.bit(5));

    let block_mode = raw.category.bits(6..=7);
    let block_type = raw.category.bits(4..=5);
    let angle = match (block_type, block_mode) {
        (0, 0) => None,
        (1, 0) => Some(AngleInfo::ExternalCell),
        (1, 1) => Some(AngleInfo::FirstCellInBlock),
        (1, 2) => Some(AngleInfo::InnerCellInBlock),
        (1, 3) => Some(AngleInfo::LastCellInBlock),
        (block_type, block_mode) => Some(AngleInfo::Unexpected((block_type << 2) | block_mode)),
    };

    let karaoke = match raw.attributes.bits(0..=4) {
        0 => None,
        1 => Some(KaraokeInfo::TitlePicture),
        2 => Some(KaraokeInfo::Introduction),
        3 => Some(KaraokeInfo::Bridge),
        4 => Some(KaraokeInfo::FirstClimax),
        5 => Some(KaraokeInfo::SecondClimax),
        6 => Some(KaraokeInfo::MaleVocal),
        7 => Some(KaraokeInfo::FemaleVocal),
        8 => Some(KaraokeInfo::MixedVocal),
        9 => Some(KaraokeInfo::InterludeFadeIn),
        10 => Some(KaraokeInfo::Interlude),
        11 => Some(KaraokeInfo::InterludeFadeOut),
        12 => Some(KaraokeInfo::FirstEnding),
        13 => Some(KaraokeInfo::SecondEnding),
        other => Some(KaraokeInfo::Unexpected(other)),
    };

    Cell {
        duration,
        playback,
        ending: EndingMode::from_still_time(raw.still_time),
        angle,
        karaoke,
        interactions: interaction::interactions(packets, duration.rate),
        post: (raw.command != 0)
            .then(|| Reference::<ProgramChain, Command>::new(Index::from(raw.command))),
        sectors: IndexRange::new(Index::new(raw.first_sector), Index::new(raw.last_sector)),
    }
}

#[cfg(test)]
#[path = "../tests/program_chain_tests.rs"]
mod tests;
