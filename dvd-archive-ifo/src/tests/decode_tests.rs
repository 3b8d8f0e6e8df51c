use super::*;
use crate::acquire::NavData;
use crate::fixtures::{FixtureDisc, FixtureUnit, manager_ifo, nav_pack, sample_disc, title_set_ifo};
use crate::ifo::{parse_manager, parse_title_set};
use crate::nav::{NavPacket, parse_nav_pack};
use dvd_archive_core::model::{Command, FrameRate, Target};

// -- Test helpers --

fn raw_disc(disc: &FixtureDisc) -> RawDisc {
    let title_sets = disc
        .title_sets
        .iter()
        .enumerate()
        .map(|(i, title_set)| {
            let n = i as u8 + 1;
            (n, parse_title_set(&title_set_ifo(title_set), n).unwrap())
        })
        .collect();
    RawDisc {
        manager: parse_manager(&manager_ifo(disc)).unwrap(),
        title_sets,
        nav: NavData::default(),
        disc_id: [7; 16],
    }
}

fn sample() -> RawDisc {
    raw_disc(&sample_disc())
}

fn button_packet() -> NavPacket {
    let unit = FixtureUnit::with_buttons(1, 90_000, 1);
    let (pci, dsi) = parse_nav_pack(&nav_pack(0, 0, &unit, None)).unwrap();
    NavPacket {
        pci,
        dsi,
        timestamp: Some(0),
    }
}

fn title_set_one(info: &DiscInfo) -> &TitleSet {
    &info.title_sets[&Index::new(1)]
}

// -- Disc level --

#[test]
fn test_disc_header_fields() {
    let info = disc_info(&sample()).unwrap();
    assert_eq!(info.specification, Version { major: 1, minor: 1 });
    assert_eq!(info.provider, "DVD-ARCHIVE-FIXTURE");
    assert_eq!(info.total_volume_count, 1);
    assert_eq!(info.volume_index, 1);
    assert_eq!(info.disc_id, [7; 16]);
    assert_eq!(info.title_sets.len(), 1);
}

#[test]
fn test_first_play_chain() {
    let info = disc_info(&sample()).unwrap();
    let start = info.start.as_ref().unwrap();
    assert_eq!(
        start.pre[&Index::new(1)],
        Command::Jump {
            target: Target::Title(Index::new(1))
        }
    );
    assert_eq!(start.cells.len(), 1);
    assert_eq!(start.duration.rate, FrameRate::Fps2997);
}

#[test]
fn test_top_level_menu_descriptor() {
    let info = disc_info(&sample()).unwrap();
    let menus = &info.top_level_menus.program_chains;

    let descriptors: Vec<&Descriptor> = menus.descriptors().collect();
    assert_eq!(
        descriptors,
        vec![&Descriptor::Menu {
            language: "en".to_string(),
            index: Index::new(1),
            entry_point: true,
            menu_type: Some(MenuType::Titles),
        }]
    );
    let id = ProgramChainId {
        language_id: Some(16),
        program_chain_id: 16,
    };
    assert!(menus.by_id(&id).is_some());
    assert!(menus.get(Index::new(1), Some("en")).is_some());
    assert!(menus.get(Index::new(1), Some("fr")).is_none());
}

#[test]
fn test_domain_attributes() {
    let info = disc_info(&sample()).unwrap();
    let title_set = title_set_one(&info);

    assert_eq!(info.top_level_menus.audio.len(), 1);
    assert_eq!(title_set.menus.audio.len(), 1);
    assert_eq!(title_set.content.audio.len(), 2);
    assert!(title_set.content.audio.contains_key(&Index::new(0)));
    assert!(title_set.content.audio.contains_key(&Index::new(1)));
    assert_eq!(title_set.content.subpicture.len(), 1);
    assert_eq!(
        title_set.content.subpicture[&Index::new(0)].language.as_deref(),
        Some("en")
    );
}

// -- Title sets --

#[test]
fn test_titles_of_title_set() {
    let info = disc_info(&sample()).unwrap();
    let title_set = title_set_one(&info);
    assert_eq!(title_set.titles.len(), 2);

    let first = &title_set.titles[&Index::new(1)];
    assert_eq!(first.global_index, Index::new(1));
    assert_eq!(first.parts.len(), 2);
    assert_eq!(first.jump_commands, CommandPresence::BUTTONS);
    assert!(first.linear_playback);
    assert_eq!(first.restrictions, Restrictions::empty());
    assert_eq!(first.viewing_angle_count, 1);

    let second = &title_set.titles[&Index::new(2)];
    assert_eq!(second.global_index, Index::new(2));
    assert_eq!(second.parts.len(), 1);
    assert!(second.jump_commands.is_empty());
}

#[test]
fn test_part_resolves_to_program() {
    let info = disc_info(&sample()).unwrap();
    let title_set = title_set_one(&info);

    let part = &title_set.titles[&Index::new(1)].parts[&Index::new(2)];
    assert_eq!(
        part.start,
        Reference::<TitleSet, Program>::new(Index::new(1), Index::new(2))
    );
    let program = title_set.resolve_program(&part.start).unwrap();
    let chain = title_set.content.program_chains.get(Index::new(1), None).unwrap();
    let cell = chain.resolve_cell(&program.start).unwrap();
    assert_eq!(cell.sectors.start, Index::new(3));
}

#[test]
fn test_title_domain_descriptors() {
    let info = disc_info(&sample()).unwrap();
    let content = &title_set_one(&info).content.program_chains;

    assert_eq!(content.len(), 2);
    let descriptors: Vec<&Descriptor> = content.descriptors().collect();
    assert_eq!(
        descriptors,
        vec![
            &Descriptor::Title {
                index: Index::new(1),
                entry_point: true,
                title: Index::new(1),
            },
            &Descriptor::Title {
                index: Index::new(2),
                entry_point: true,
                title: Index::new(2),
            },
        ]
    );
    let id = ProgramChainId {
        language_id: None,
        program_chain_id: 24,
    };
    assert!(content.by_id(&id).is_some());
}

#[test]
fn test_playback_type_flags() {
    let mut raw = sample();
    raw.manager.titles[0].playback_type = 0x73;
    let info = disc_info(&raw).unwrap();
    let title = &title_set_one(&info).titles[&Index::new(1)];

    assert_eq!(
        title.jump_commands,
        CommandPresence::PRE_POST | CommandPresence::CELLS
    );
    assert_eq!(
        title.restrictions,
        Restrictions::NO_JUMP_INTO_TITLE | Restrictions::NO_JUMP_TO_PART
    );
    assert!(!title.linear_playback);
}

#[test]
fn test_title_without_part_table_entry() {
    let mut raw = sample();
    raw.manager.titles[1].title_set_title = 3;
    let info = disc_info(&raw).unwrap();
    let title = &title_set_one(&info).titles[&Index::new(3)];
    assert!(title.parts.is_empty());
}

#[test]
fn test_shared_program_chain_is_stored_once() {
    let mut raw = sample();
    let unit = &mut raw.manager.menus[0];
    let mut alias = unit.program_chains[0].clone();
    alias.entry_id = 0x00;
    unit.program_chains.push(alias);

    let info = disc_info(&raw).unwrap();
    let menus = &info.top_level_menus.program_chains;
    assert_eq!(menus.descriptors().count(), 2);
    assert_eq!(menus.len(), 1);
    assert_eq!(menus.get(Index::new(1), None), menus.get(Index::new(2), None));
}

#[test]
fn test_scanned_packets_become_interactions() {
    let mut raw = sample();
    raw.nav.insert(
        InfoFile::VideoManager,
        ScanTarget::FirstPlay,
        vec![vec![button_packet()]],
    );
    let info = disc_info(&raw).unwrap();
    let cell = &info.start.as_ref().unwrap().cells[&Index::new(1)];
    assert_eq!(cell.interactions.len(), 1);

    // Nothing was scanned for the menu.
    let menu = info.top_level_menus.program_chains.get(Index::new(1), None).unwrap();
    assert!(menu.cells.values().all(|cell| cell.interactions.is_empty()));
}

#[test]
fn test_missing_title_set_is_left_out() {
    let mut raw = sample();
    raw.title_sets.clear();
    let info = disc_info(&raw).unwrap();
    assert!(info.title_sets.is_empty());
    assert!(info.titles_by_global_index().is_empty());
}

// -- Structural errors --

#[test]
fn test_title_without_title_number() {
    let mut raw = sample();
    raw.manager.titles[0].title_set_title = 0;
    assert!(matches!(
        disc_info(&raw),
        Err(ReadError::MalformedRecord(msg)) if msg.contains("no title number")
    ));
}

#[test]
fn test_title_listed_twice() {
    let mut raw = sample();
    raw.manager.titles[1].title_set_title = 1;
    let err = disc_info(&raw).unwrap_err();
    assert!(matches!(err, ReadError::MalformedRecord(_)));
    assert_eq!(err.to_string(), "DVD data not understood");
}
