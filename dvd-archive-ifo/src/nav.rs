//! Navigation packets.
//!
//! Every video object unit (VOBU) starts with a navigation pack: an MPEG
//! program stream pack carrying two private-stream-2 packets, the
//! presentation control information (PCI, substream 0) with the button
//! highlights, and the data search information (DSI, substream 1) with the
//! distance to the next unit.

use dvd_archive_core::bits::{Bits, be_u16, be_u32, be_u64};

/// Number of button slots in a PCI packet.
pub const BUTTON_SLOTS: usize = 36;

/// DSI `next_vobu` value marking the last unit of a cell.
pub const END_OF_CELL: u32 = 0x3FFF_FFFF;

const PACK_START: u8 = 0xBA;
const SYSTEM_HEADER: u8 = 0xBB;
const PRIVATE_STREAM_2: [u8; 4] = [0x00, 0x00, 0x01, 0xBF];

/// One parsed navigation pack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavPacket {
    pub pci: Pci,
    pub dsi: Dsi,
    /// 90 kHz ticks since the start of the cell; `None` outside linear playback.
    pub timestamp: Option<u64>,
}

/// Presentation control information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pci {
    /// Logical block number of the pack.
    pub lbn: u32,
    pub prohibited_ops: u32,
    pub start_ptm: u32,
    pub end_ptm: u32,
    pub highlight: Highlight,
}

/// Highlight information: the menu buttons active during this unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    /// 0 none, 1 new, 2 same as previous, 3 only commands changed.
    pub status: u8,
    pub start_ptm: u32,
    pub end_ptm: u32,
    pub select_end_ptm: u32,
    pub button_mode: u16,
    pub button_offset: u8,
    pub button_count: u8,
    pub numeric_select_count: u8,
    pub forced_select: u8,
    pub forced_action: u8,
    /// `(selection, action)` color words of the three color groups.
    pub colors: [(u32, u32); 3],
    pub buttons: Vec<RawButton>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawButton {
    /// Color group 1-3, zero for none.
    pub color_group: u8,
    pub x_start: u16,
    pub x_end: u16,
    pub auto_action: u8,
    pub y_start: u16,
    pub y_end: u16,
    pub up: u8,
    pub down: u8,
    pub left: u8,
    pub right: u8,
    pub command: u64,
}

/// Data search information, the fields the scan needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dsi {
    /// Last sector of the unit, relative to its first.
    pub vobu_ea: u32,
    /// Seamless playback category; bit 14 marks non-linear playback.
    pub category: u16,
    /// Relative sector of the next unit, with flags in bits 30-31.
    pub next_vobu: u32,
}

impl Dsi {
    pub fn is_linear(&self) -> bool {
        !self.category.bit(14)
    }

    /// Distance to the next unit, `None` at the end of the cell.
    pub fn next_unit(&self) -> Option<u32> {
        let next = self.next_vobu.bits(0..=29);
        (next != END_OF_CELL).then_some(next)
    }
}

/// Parse the navigation pack in the first block of a VOBU.
///
/// Returns `None` when the block is not a navigation pack.
pub fn parse_nav_pack(block: &[u8]) -> Option<(Pci, Dsi)> {
    let packet_length =
        |position: usize| be_u16(block, position + 4).map(|length| length as usize);

    let mut position = 0;
    if *block.get(position + 3)? == PACK_START {
        if block.get(position + 4)?.bit(6) {
            // MPEG-2 pack header with stuffing
            position += 14 + block.get(position + 13)?.bits(0..=2) as usize;
        } else {
            position += 12;
        }
    }
    if *block.get(position + 3)? == SYSTEM_HEADER {
        position += 6 + packet_length(position)?;
    }

    if block.get(position..position + 4)? != PRIVATE_STREAM_2 {
        return None;
    }
    let pci_length = packet_length(position)?;
    position += 6;
    if *block.get(position)? != 0 {
        return None;
    }
    let pci = parse_pci(block.get(position + 1..)?)?;

    position += pci_length;
    if block.get(position..position + 4)? != PRIVATE_STREAM_2 {
        return None;
    }
    position += 6;
    if *block.get(position)? != 1 {
        return None;
    }
    let dsi = parse_dsi(block.get(position + 1..)?)?;

    Some((pci, dsi))
}

fn parse_pci(data: &[u8]) -> Option<Pci> {
    let colors = [0, 1, 2].map(|group| {
        let base = 0x76 + group * 8;
        (be_u32(data, base), be_u32(data, base + 4))
    });
    let colors = [
        (colors[0].0?, colors[0].1?),
        (colors[1].0?, colors[1].1?),
        (colors[2].0?, colors[2].1?),
    ];

    let buttons = (0..BUTTON_SLOTS)
        .map(|slot| parse_button(data.get(0x8E + slot * 18..0x8E + (slot + 1) * 18)?))
        .collect::<Option<Vec<_>>>()?;

    let highlight = Highlight {
        status: be_u16(data, 0x60)?.bits(0..=1) as u8,
        start_ptm: be_u32(data, 0x62)?,
        end_ptm: be_u32(data, 0x66)?,
        select_end_ptm: be_u32(data, 0x6A)?,
        button_mode: be_u16(data, 0x6E)?,
        button_offset: data.get(0x70)?.bits(0..=5),
        button_count: data.get(0x71)?.bits(0..=5),
        numeric_select_count: data.get(0x72)?.bits(0..=5),
        forced_select: data.get(0x74)?.bits(0..=5),
        forced_action: data.get(0x75)?.bits(0..=5),
        colors,
        buttons,
    };

    Some(Pci {
        lbn: be_u32(data, 0)?,
        prohibited_ops: be_u32(data, 8)?,
        start_ptm: be_u32(data, 12)?,
        end_ptm: be_u32(data, 16)?,
        highlight,
    })
}

fn parse_button(raw: &[u8]) -> Option<RawButton> {
    let x = u32::from_be_bytes([0, raw[0], raw[1], raw[2]]);
    let y = u32::from_be_bytes([0, raw[3], raw[4], raw[5]]);
    Some(RawButton {
        color_group: x.bits(22..=23) as u8,
        x_start: x.bits(12..=21) as u16,
        x_end: x.bits(0..=9) as u16,
        auto_action: y.bits(22..=23) as u8,
        y_start: y.bits(12..=21) as u16,
        y_end: y.bits(0..=9) as u16,
        up: raw[6].bits(0..=5),
        down: raw[7].bits(0..=5),
        left: raw[8].bits(0..=5),
        right: raw[9].bits(0..=5),
        command: be_u64(raw, 10)?,
    })
}

fn parse_dsi(data: &[u8]) -> Option<Dsi> {
    Some(Dsi {
        vobu_ea: be_u32(data, 8)?,
        category: be_u16(data, 0x20)?,
        next_vobu: be_u32(data, 0x13A)?,
    })
}

#[cfg(test)]
#[path = "tests/nav_tests.rs"]
mod tests;
