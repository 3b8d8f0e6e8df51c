use super::*;
use crate::fixtures::{FixtureUnit, jump_title, nav_pack, ntsc_time, pal_time};
use crate::ifo::CommandTable;
use crate::nav::parse_nav_pack;
use dvd_archive_core::model::{FrameRate, Target};

// -- Test helpers --

fn raw_cell(first_sector: u32, last_sector: u32) -> RawCell {
    RawCell {
        category: 0,
        attributes: 0,
        still_time: 0,
        command: 0,
        playback_time: ntsc_time(0, 0, 2, 0),
        first_sector,
        last_sector,
    }
}

fn raw_chain() -> RawProgramChain {
    let mut palette = [[0u8; 4]; 16];
    palette[5] = [0, 0x10, 0x20, 0x30];
    RawProgramChain {
        playback_time: ntsc_time(0, 0, 4, 0),
        prohibited_ops: 0,
        audio_control: [0; 8],
        subpicture_control: [0; 32],
        next: 0,
        previous: 0,
        up: 0,
        playback_mode: 0,
        still_time: 0,
        palette,
        commands: CommandTable::default(),
        program_map: vec![1, 3],
        cells: vec![raw_cell(0, 9), raw_cell(10, 19), raw_cell(20, 29)],
    }
}

fn menu_packets() -> Vec<NavPacket> {
    let (pci, dsi) =
        parse_nav_pack(&nav_pack(0, 0, &FixtureUnit::with_buttons(1, 90_000, 1), None)).unwrap();
    vec![NavPacket {
        pci,
        dsi,
        timestamp: Some(0),
    }]
}

// -- Program chains --

#[test]
fn test_programs_point_at_entry_cells() {
    let chain = program_chain(&raw_chain(), None);

    assert_eq!(chain.programs.len(), 2);
    assert_eq!(chain.cells.len(), 3);
    let second = &chain.programs[&Index::new(2)];
    let cell = chain.resolve_cell(&second.start).unwrap();
    assert_eq!(cell.sectors, IndexRange::new(Index::new(20), Index::new(29)));
}

#[test]
fn test_duration_and_ending() {
    let mut raw = raw_chain();
    raw.still_time = 10;
    let chain = program_chain(&raw, None);
    assert_eq!(chain.duration.seconds, 4);
    assert_eq!(chain.duration.rate, FrameRate::Fps2997);
    assert_eq!(chain.ending, EndingMode::HoldLastFrame { seconds: 10 });
}

#[test]
fn test_playback_modes() {
    let mode = |byte: u8| {
        let mut raw = raw_chain();
        raw.playback_mode = byte;
        program_chain(&raw, None).playback
    };
    assert_eq!(mode(0), PlaybackMode::Sequential);
    assert_eq!(mode(0x83), PlaybackMode::Shuffle { program_count: 4 });
    assert_eq!(mode(0x03), PlaybackMode::Random { program_count: 4 });
}

#[test]
fn test_stream_maps() {
    let mut raw = raw_chain();
    raw.audio_control[0] = 0x8000;
    raw.audio_control[2] = 0x8300;
    raw.audio_control[3] = 0x0500;
    raw.subpicture_control[1] = 0x8000_0000 | (1 << 24) | (2 << 16) | (3 << 8) | 4;
    let chain = program_chain(&raw, None);

    let audio: Vec<(u32, u32)> = chain
        .map_audio
        .iter()
        .map(|(logical, vob)| (logical.get(), vob.get()))
        .collect();
    assert_eq!(audio, vec![(0, 0), (2, 3)]);

    assert_eq!(chain.map_subpicture.len(), 1);
    let streams = &chain.map_subpicture[&Index::new(1)];
    assert_eq!(streams[&SubpictureDescriptor::Classic], Index::new(1));
    assert_eq!(streams[&SubpictureDescriptor::Wide], Index::new(2));
    assert_eq!(streams[&SubpictureDescriptor::Letterbox], Index::new(3));
    assert_eq!(streams[&SubpictureDescriptor::PanScan], Index::new(4));
}

#[test]
fn test_sibling_links() {
    let mut raw = raw_chain();
    raw.next = 2;
    raw.up = 1;
    let chain = program_chain(&raw, None);
    assert_eq!(
        chain.next,
        Some(Reference::<Domain, ProgramChain>::new(Index::new(2)))
    );
    assert_eq!(chain.previous, None);
    assert_eq!(
        chain.up,
        Some(Reference::<Domain, ProgramChain>::new(Index::new(1)))
    );
}

#[test]
fn test_commands_are_numbered_from_one() {
    let mut raw = raw_chain();
    raw.commands = CommandTable {
        pre: vec![0, jump_title(2)],
        post: vec![jump_title(1)],
        cell: vec![0x2001_0000_0000_0006],
    };
    let chain = program_chain(&raw, None);

    assert_eq!(chain.pre.len(), 2);
    assert_eq!(chain.pre[&Index::new(1)], Command::Nop);
    assert_eq!(
        chain.pre[&Index::new(2)],
        Command::Jump {
            target: Target::Title(Index::new(2))
        }
    );
    assert_eq!(chain.post.len(), 1);
    assert_eq!(
        chain.cell_post[&Index::new(1)],
        Command::Jump {
            target: Target::NextProgram(None)
        }
    );
}

#[test]
fn test_palette_is_stored_as_ycbcr() {
    let chain = program_chain(&raw_chain(), None);
    assert_eq!(chain.button_palette.len(), 16);

    let reference = Reference::<ProgramChain, Color>::new(Index::new(5));
    assert_eq!(
        chain.resolve_color(&reference),
        Some(&Color {
            y: 0x10,
            cb: 0x30,
            cr: 0x20
        })
    );
}

#[test]
fn test_restrictions() {
    let mut raw = raw_chain();
    raw.prohibited_ops = Restrictions::NO_PAUSE.bits() | 0x8000_0000;
    let chain = program_chain(&raw, None);
    assert_eq!(chain.restrictions, Restrictions::NO_PAUSE);
}

// -- Cells --

#[test]
fn test_cell_flags() {
    let mut raw = raw_chain();
    raw.cells[0] = RawCell {
        category: 0x5C,
        attributes: 0x43,
        still_time: 0xFF,
        command: 1,
        ..raw_cell(0, 9)
    };
    raw.commands.cell = vec![0];
    let chain = program_chain(&raw, None);
    let cell = &chain.cells[&Index::new(1)];

    assert_eq!(
        cell.playback,
        CellPlayback::SEAMLESS | CellPlayback::INTERLEAVED | CellPlayback::ALL_STILL_FRAMES
    );
    assert_eq!(cell.angle, Some(AngleInfo::FirstCellInBlock));
    assert_eq!(cell.karaoke, Some(KaraokeInfo::Bridge));
    assert_eq!(cell.ending, EndingMode::HoldLastFrameIndefinitely);

    let post = cell.post.unwrap();
    assert_eq!(chain.resolve_cell_command(&post), Some(&Command::Nop));
}

#[test]
fn test_cell_angle_and_karaoke_fallbacks() {
    let mut raw = raw_chain();
    raw.cells[0].category = 0x10;
    raw.cells[1].category = 0x20;
    raw.cells[2].attributes = 0x1F;
    let chain = program_chain(&raw, None);

    assert_eq!(
        chain.cells[&Index::new(1)].angle,
        Some(AngleInfo::ExternalCell)
    );
    assert_eq!(
        chain.cells[&Index::new(2)].angle,
        Some(AngleInfo::Unexpected(0x08))
    );
    assert_eq!(chain.cells[&Index::new(3)].angle, None);
    assert_eq!(
        chain.cells[&Index::new(3)].karaoke,
        Some(KaraokeInfo::Unexpected(0x1F))
    );
}

#[test]
fn test_cell_interactions_use_scanned_packets() {
    let mut raw = raw_chain();
    raw.cells[0].playback_time = pal_time(0, 0, 2, 0);
    let packets = vec![menu_packets()];
    let chain = program_chain(&raw, Some(packets.as_slice()));

    let first = &chain.cells[&Index::new(1)];
    assert_eq!(first.interactions.len(), 1);
    let timestamp = first.interactions[0].linear_playback_timestamp.unwrap();
    assert_eq!(timestamp.rate, FrameRate::Fps25);

    // Cells past the scanned ones have no interactions.
    assert!(chain.cells[&Index::new(2)].interactions.is_empty());
}

#[test]
fn test_unscanned_chain_has_no_interactions() {
    let chain = program_chain(&raw_chain(), None);
    assert!(chain.cells.values().all(|cell| cell.interactions.is_empty()));
}
