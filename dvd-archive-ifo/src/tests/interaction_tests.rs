use super::*;
use crate::fixtures::{FixtureUnit, jump_title, nav_pack};
use crate::nav::parse_nav_pack;
use dvd_archive_core::model::{Command, Target};

// -- Test helpers --

fn packet(unit: FixtureUnit, timestamp: Option<u64>) -> NavPacket {
    let (pci, dsi) = parse_nav_pack(&nav_pack(10, 0, &unit, None)).unwrap();
    NavPacket {
        pci,
        dsi,
        timestamp,
    }
}

fn menu_packet(buttons: u8) -> NavPacket {
    packet(FixtureUnit::with_buttons(1, 90_000, buttons), Some(0))
}

fn button_ref(n: u32) -> Option<Reference<Interaction, Button>> {
    Some(Reference::<Interaction, Button>::new(Index::new(n)))
}

// -- Interactions --

#[test]
fn test_only_packets_with_buttons_become_interactions() {
    let packets = vec![
        packet(FixtureUnit::plain(1, 90_000), Some(0)),
        menu_packet(2),
        packet(FixtureUnit::plain(1, 90_000), Some(90_000)),
    ];
    let found = interactions(&packets, FrameRate::Fps2997);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].buttons.len(), 2);
}

#[test]
fn test_interaction_fields() {
    let mut menu = menu_packet(2);
    menu.pci.prohibited_ops = 0x0000_0003;
    menu.pci.highlight.forced_select = 2;
    let interaction = &interactions(&[menu], FrameRate::Fps2997)[0];

    assert_eq!(interaction.sector, Index::new(10));
    assert_eq!(
        interaction.linear_playback_timestamp,
        Some(Time::zero(FrameRate::Fps2997))
    );
    assert!(!interaction.only_commands_changed);
    assert_eq!(
        interaction.buttons_selectable,
        TickRange {
            start: 0,
            end: 90_000
        }
    );
    assert_eq!(interaction.buttons_visible, interaction.buttons_selectable);
    assert_eq!(interaction.forced_select, Some(Index::new(2)));
    assert_eq!(interaction.forced_action, None);
    assert_eq!(
        interaction.restrictions,
        Restrictions::NO_JUMP_INTO_TITLE | Restrictions::NO_JUMP_TO_PART
    );
}

#[test]
fn test_highlight_status_filter() {
    let mut same = menu_packet(1);
    same.pci.highlight.status = 2;
    let mut commands = menu_packet(1);
    commands.pci.highlight.status = 3;
    let mut empty = menu_packet(1);
    empty.pci.highlight.button_count = 0;

    let found = interactions(&[same, commands, empty], FrameRate::Fps25);
    assert_eq!(found.len(), 1);
    assert!(found[0].only_commands_changed);
}

#[test]
fn test_unchanged_highlight_repeats_previous_buttons() {
    let menu = menu_packet(2);
    let mut same = packet(FixtureUnit::plain(1, 90_000), Some(90_000));
    same.pci.lbn = 11;
    same.pci.highlight.status = 2;
    let mut ended = packet(FixtureUnit::plain(1, 90_000), Some(180_000));
    ended.pci.lbn = 12;
    ended.pci.highlight.status = 0;
    let mut stale = ended.clone();
    stale.pci.lbn = 13;
    stale.pci.highlight.status = 2;

    let found = interactions(&[menu, same, ended, stale], FrameRate::Fps25);
    assert_eq!(found.len(), 2);

    let repeated = &found[1];
    assert_eq!(repeated.sector, Index::new(11));
    assert_eq!(
        repeated.linear_playback_timestamp,
        Some(Time::from_ticks(90_000, FrameRate::Fps25))
    );
    assert!(!repeated.only_commands_changed);
    assert_eq!(repeated.buttons, found[0].buttons);
    assert_eq!(repeated.buttons_visible, found[0].buttons_visible);
}

#[test]
fn test_timestamp_follows_frame_rate() {
    let menu = packet(FixtureUnit::with_buttons(1, 90_000, 1), Some(93_600));
    let interaction = &interactions(&[menu], FrameRate::Fps25)[0];
    let time = interaction.linear_playback_timestamp.unwrap();
    assert_eq!((time.seconds, time.frames), (1, 1));
    assert_eq!(time.rate, FrameRate::Fps25);

    let detached = packet(FixtureUnit::with_buttons(1, 90_000, 1), None);
    let interaction = &interactions(&[detached], FrameRate::Fps25)[0];
    assert_eq!(interaction.linear_playback_timestamp, None);
}

// -- Buttons --

#[test]
fn test_button_geometry_neighbours_and_action() {
    let interaction = &interactions(&[menu_packet(2)], FrameRate::Fps2997)[0];
    let first = &interaction.buttons[&Index::new(1)][&ButtonDescriptor::CLASSIC];

    assert_eq!(
        first.mask,
        Rectangle {
            x_start: 40,
            x_end: 140,
            y_start: 400,
            y_end: 450
        }
    );
    assert_eq!(first.left, None);
    assert_eq!(first.right, button_ref(2));
    assert_eq!(first.up, None);
    assert_eq!(
        first.action,
        Command::Jump {
            target: Target::Title(Index::new(1))
        }
    );
    assert!(!first.auto_action_on_select);

    let second = &interaction.buttons[&Index::new(2)][&ButtonDescriptor::CLASSIC];
    assert_eq!(second.left, button_ref(1));
    assert_eq!(second.right, None);
    assert_eq!(second.action, command::decode(jump_title(2)));
}

#[test]
fn test_button_color_group() {
    let mut menu = menu_packet(2);
    menu.pci.highlight.buttons[1].color_group = 0;
    let interaction = &interactions(&[menu], FrameRate::Fps2997)[0];

    let first = &interaction.buttons[&Index::new(1)][&ButtonDescriptor::CLASSIC];
    assert_eq!(first.selection_colors, Some(button_colors(0x4321_F0F0)));
    assert_eq!(first.action_colors, Some(button_colors(0x8765_FFFF)));

    let second = &interaction.buttons[&Index::new(2)][&ButtonDescriptor::CLASSIC];
    assert_eq!(second.selection_colors, None);
    assert_eq!(second.action_colors, None);
}

#[test]
fn test_button_groups_per_display_mode() {
    let mut menu = menu_packet(1);
    // Two groups: wide, then pan-scan.
    menu.pci.highlight.button_mode = 0x2000 | 0x0100 | 0x0040;
    menu.pci.highlight.buttons[18] = RawButton {
        x_start: 7,
        ..menu.pci.highlight.buttons[0]
    };
    let interaction = &interactions(&[menu], FrameRate::Fps2997)[0];

    let variants = &interaction.buttons[&Index::new(1)];
    assert_eq!(variants.len(), 2);
    assert_eq!(variants[&ButtonDescriptor::WIDE].mask.x_start, 40);
    assert_eq!(variants[&ButtonDescriptor::PAN_SCAN].mask.x_start, 7);

    let reference = Reference::<Interaction, Button>::new(Index::new(1));
    let pan_scan = interaction
        .resolve_button(&reference, ButtonDescriptor::PAN_SCAN)
        .unwrap();
    assert_eq!(pan_scan.mask.x_start, 7);
}

#[test]
fn test_button_count_is_limited_to_group_size() {
    let mut menu = menu_packet(1);
    menu.pci.highlight.button_mode = 0x2000;
    menu.pci.highlight.button_count = 20;
    let interaction = &interactions(&[menu], FrameRate::Fps2997)[0];
    assert_eq!(interaction.buttons.len(), BUTTON_SLOTS / 2);
}

#[test]
fn test_button_colors() {
    let colors = button_colors(0x4321_F0F0);
    let indices: Vec<Option<Index<Color>>> = colors.iter().map(|c| c.color.color).collect();
    assert_eq!(
        indices,
        vec![
            Some(Index::new(1)),
            Some(Index::new(2)),
            Some(Index::new(3)),
            Some(Index::new(4))
        ]
    );
    let alphas: Vec<f64> = colors.iter().map(|c| c.alpha).collect();
    assert_eq!(alphas, vec![0.0, 1.0, 0.0, 1.0]);
}
