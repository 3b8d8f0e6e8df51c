//! Menu button highlights from navigation packets.

use std::collections::BTreeMap;

use dvd_archive_core::Index;
use dvd_archive_core::bits::Bits;
use dvd_archive_core::model::{
    Button, ButtonColor, ButtonDescriptor, Color, FrameRate, Interaction, ProgramChain, Rectangle,
    Restrictions, TickRange, Time,
};
use dvd_archive_core::reference::Reference;

use super::command;
use crate::nav::{BUTTON_SLOTS, Highlight, NavPacket, RawButton};

/// Highlight status of a packet without active buttons.
const STATUS_NONE: u8 = 0;
/// Highlight status of a packet that introduces buttons.
const STATUS_NEW: u8 = 1;
/// Highlight status of a packet whose buttons are those of the previous one.
const STATUS_SAME: u8 = 2;
/// Highlight status of a packet that only replaces button commands.
const STATUS_COMMANDS_ONLY: u8 = 3;

/// One interaction per packet with active buttons.
///
/// A packet that keeps the previous highlight repeats the previous buttons
/// at its own sector and timestamp. Nothing is carried past a packet that
/// ends the highlight.
pub fn interactions(packets: &[NavPacket], rate: FrameRate) -> Vec<Interaction> {
    let mut found = Vec::new();
    let mut current: Option<&Highlight> = None;
    for packet in packets {
        let highlight = &packet.pci.highlight;
        match highlight.status {
            STATUS_NEW | STATUS_COMMANDS_ONLY => {
                current = (highlight.button_count > 0).then_some(highlight);
            }
            STATUS_SAME => {}
            STATUS_NONE => current = None,
            other => {
                log::debug!("Unknown highlight status {other} at sector {}", packet.pci.lbn);
                current = None;
            }
        }
        if let Some(active) = current {
            found.push(interaction(packet, active, rate));
        }
    }
    found
}

fn interaction(packet: &NavPacket, highlight: &Highlight, rate: FrameRate) -> Interaction {
    let button_index = |n: u8| (n != 0).then(|| Index::new(u32::from(n)));

    Interaction {
        sector: Index::new(packet.pci.lbn),
        linear_playback_timestamp: packet.timestamp.map(|ticks| Time::from_ticks(ticks, rate)),
        only_commands_changed: packet.pci.highlight.status == STATUS_COMMANDS_ONLY,
        buttons: buttons(highlight),
        buttons_selectable: TickRange {
            start: highlight.start_ptm,
            end: highlight.select_end_ptm,
        },
        buttons_visible: TickRange {
            start: highlight.start_ptm,
            end: highlight.end_ptm,
        },
        forced_select: button_index(highlight.forced_select),
        forced_action: button_index(highlight.forced_action),
        restrictions: Restrictions::from_bits_truncate(packet.pci.prohibited_ops),
    }
}

/// Buttons grouped by number, one variant per display-mode group.
///
/// The button mode word holds the group count in bits 12-13 and a 3-bit
/// display type per group. Slots are split evenly between the groups.
fn buttons(highlight: &Highlight) -> BTreeMap<Index<Button>, BTreeMap<ButtonDescriptor, Button>> {
    let groups = usize::from(highlight.button_mode.bits(12..=13)).max(1);
    let per_group = BUTTON_SLOTS / groups;
    let count = usize::from(highlight.button_count).min(per_group);

    let mut buttons: BTreeMap<Index<Button>, BTreeMap<ButtonDescriptor, Button>> = BTreeMap::new();
    for group in 0..groups {
        let display_type = match group {
            0 => highlight.button_mode.bits(8..=10),
            1 => highlight.button_mode.bits(4..=6),
            _ => highlight.button_mode.bits(0..=2),
        };
        let descriptor = ButtonDescriptor::from_bits_truncate(display_type as u8);

        let slots = highlight.buttons.iter().skip(group * per_group).take(count);
        for (i, raw) in slots.enumerate() {
            buttons
                .entry(Index::new(i as u32 + 1))
                .or_default()
                .insert(descriptor, button(raw, highlight));
        }
    }
    buttons
}

fn button(raw: &RawButton, highlight: &Highlight) -> Button {
    let neighbour = |n: u8| {
        (n != 0).then(|| Reference::<Interaction, Button>::new(Index::new(u32::from(n))))
    };
    let colors = match raw.color_group {
        group @ 1..=3 => Some(highlight.colors[usize::from(group) - 1]),
        _ => None,
    };

    Button {
        mask: Rectangle {
            x_start: raw.x_start,
            x_end: raw.x_end,
            y_start: raw.y_start,
            y_end: raw.y_end,
        },
        up: neighbour(raw.up),
        down: neighbour(raw.down),
        left: neighbour(raw.left),
        right: neighbour(raw.right),
        selection_colors: colors.map(|(selection, _)| button_colors(selection)),
        action_colors: colors.map(|(_, action)| button_colors(action)),
        action: command::decode(raw.command),
        auto_action_on_select: raw.auto_action != 0,
    }
}

/// Color overrides for background, pattern, emphasis 1 and emphasis 2.
///
/// Palette indices sit in the upper 16 bits, contrast values in the lower
/// 16, one nibble per pixel type starting at the low end.
pub fn button_colors(word: u32) -> Vec<ButtonColor> {
    (0..4)
        .map(|k| {
            let color = word.bits(16 + 4 * k..=19 + 4 * k);
            let contrast = word.bits(4 * k..=3 + 4 * k);
            ButtonColor {
                color: Reference::<ProgramChain, Color>::new(Index::new(color)),
                alpha: f64::from(contrast) / 15.0,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../tests/interaction_tests.rs"]
mod tests;
