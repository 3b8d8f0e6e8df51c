use super::*;
use crate::fixtures::{jump_title, manager_ifo, ntsc_time, sample_disc, title_set_ifo};
use crate::ifo::tables::language_code;

// -- Test helpers --

fn put_u32(data: &mut [u8], offset: usize, value: u32) {
    data[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}

// -- Video manager --

#[test]
fn test_parse_manager_header() {
    let data = manager_ifo(&sample_disc());
    let manager = parse_manager(&data).unwrap();

    assert_eq!(manager.specification, 0x11);
    assert_eq!(manager.volume_count, 1);
    assert_eq!(manager.volume_index, 1);
    assert_eq!(manager.title_set_count, 1);
    assert_eq!(manager.provider, "DVD-ARCHIVE-FIXTURE");
}

#[test]
fn test_parse_manager_titles() {
    let manager = parse_manager(&manager_ifo(&sample_disc())).unwrap();

    assert_eq!(manager.titles.len(), 2);
    let first = manager.titles[0];
    assert_eq!(first.title_set, 1);
    assert_eq!(first.title_set_title, 1);
    assert_eq!(first.part_count, 2);
    assert_eq!(first.playback_type, 0x08);
    assert_eq!(manager.titles[1].title_set_title, 2);
}

#[test]
fn test_parse_manager_first_play_and_menus() {
    let manager = parse_manager(&manager_ifo(&sample_disc())).unwrap();

    let first_play = manager.first_play.as_ref().unwrap();
    assert_eq!(first_play.commands.pre, vec![jump_title(1)]);
    assert_eq!(first_play.cells.len(), 1);
    assert_eq!(first_play.playback_time, ntsc_time(0, 0, 1, 0));

    assert_eq!(manager.menus.len(), 1);
    let unit = &manager.menus[0];
    assert_eq!(unit.language, "en");
    assert_eq!(unit.offset, 16);
    assert_eq!(unit.program_chains.len(), 1);
    // Header plus one search pointer precede the chain.
    assert_eq!(unit.program_chains[0].offset, 16);
    assert_eq!(unit.program_chains[0].entry_id, 0x82);

    assert_eq!(manager.menu_attributes.video, [0x40, 0x00]);
    assert_eq!(manager.menu_attributes.audio.len(), 1);
    assert_eq!(manager.menu_attributes.subpicture.len(), 1);
}

#[test]
fn test_manager_without_first_play() {
    let mut disc = sample_disc();
    disc.first_play = None;
    let manager = parse_manager(&manager_ifo(&disc)).unwrap();
    assert!(manager.first_play.is_none());
}

#[test]
fn test_manager_bad_magic() {
    let mut data = manager_ifo(&sample_disc());
    data[0] = b'X';
    assert!(matches!(
        parse_manager(&data),
        Err(IfoError::BadMagic { expected: "DVDVIDEO-VMG", .. })
    ));
}

#[test]
fn test_manager_truncated() {
    let data = manager_ifo(&sample_disc());
    assert!(matches!(
        parse_manager(&data[..100]),
        Err(IfoError::Truncated { table: "VMGI_MAT", .. })
    ));
}

#[test]
fn test_manager_table_pointer_out_of_range() {
    let mut data = manager_ifo(&sample_disc());
    put_u32(&mut data, 0xC4, 500);
    assert!(matches!(
        parse_manager(&data),
        Err(IfoError::OffsetOutOfRange { table: "TT_SRPT", .. })
    ));
}

// -- Title sets --

#[test]
fn test_parse_title_set_parts() {
    let disc = sample_disc();
    let title_set = parse_title_set(&title_set_ifo(&disc.title_sets[0]), 1).unwrap();

    let parts: Vec<Vec<(u16, u16)>> = title_set
        .parts
        .iter()
        .map(|title| title.iter().map(|p| (p.program_chain, p.program)).collect())
        .collect();
    assert_eq!(parts, vec![vec![(1, 1), (1, 2)], vec![(2, 1)]]);
}

#[test]
fn test_parse_title_set_program_chains() {
    let disc = sample_disc();
    let title_set = parse_title_set(&title_set_ifo(&disc.title_sets[0]), 1).unwrap();

    assert_eq!(title_set.program_chains.len(), 2);
    let first = &title_set.program_chains[0];
    assert_eq!(first.entry_id, 0x81);
    assert_eq!(first.offset, 24);

    let chain = &first.program_chain;
    assert_eq!(chain.program_map, vec![1, 2]);
    assert_eq!(chain.cells.len(), 2);
    assert_eq!((chain.cells[0].first_sector, chain.cells[0].last_sector), (0, 2));
    assert_eq!((chain.cells[1].first_sector, chain.cells[1].last_sector), (3, 3));
    assert_eq!(chain.audio_control[0], 0x8000);
    assert_eq!(chain.palette[3], [0, 0x13, 0x80, 0x80]);
    assert!(chain.commands.pre.is_empty());
}

#[test]
fn test_parse_title_set_attributes() {
    let disc = sample_disc();
    let title_set = parse_title_set(&title_set_ifo(&disc.title_sets[0]), 1).unwrap();

    assert_eq!(title_set.title_attributes.audio.len(), 2);
    assert_eq!(title_set.title_attributes.subpicture.len(), 1);
    assert_eq!(title_set.menu_attributes.audio.len(), 1);
    assert_eq!(title_set.menus.len(), 1);
    assert_eq!(title_set.menus[0].program_chains[0].entry_id, 0x83);
}

#[test]
fn test_title_set_rejects_manager_file() {
    let data = manager_ifo(&sample_disc());
    match parse_title_set(&data, 3) {
        Err(IfoError::BadMagic { file, .. }) => assert_eq!(file, "VTS_03_0.IFO"),
        other => panic!("expected bad magic, got {other:?}"),
    }
}

#[test]
fn test_attribute_counts_are_clamped() {
    let disc = sample_disc();
    let mut data = title_set_ifo(&disc.title_sets[0]);
    // Menu domain declares more audio streams than it can have.
    data[0x103] = 5;
    let title_set = parse_title_set(&data, 1).unwrap();
    assert_eq!(title_set.menu_attributes.audio.len(), 1);
}

// -- Helpers --

#[test]
fn test_language_code() {
    assert_eq!(language_code(*b"en"), "en");
    assert_eq!(language_code(*b"DE"), "de");
    assert_eq!(language_code([0, 0]), "");
    assert_eq!(language_code([0xFF, b'x']), "x");
}
