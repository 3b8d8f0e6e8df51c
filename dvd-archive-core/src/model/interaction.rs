use std::collections::BTreeMap;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::index::{Index, Sector};
use crate::model::Restrictions;
use crate::model::command::Command;
use crate::model::program_chain::{Color, ProgramChain};
use crate::model::time::Time;
use crate::reference::Reference;

/// Menu button state introduced by one navigation packet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub sector: Index<Sector>,
    /// Position within the cell, unknown once playback left a linear region.
    pub linear_playback_timestamp: Option<Time>,
    /// The packet only replaces button commands, not geometry or colors.
    pub only_commands_changed: bool,

    /// Buttons by number, each with one variant per display mode group.
    pub buttons: BTreeMap<Index<Button>, BTreeMap<ButtonDescriptor, Button>>,
    pub buttons_selectable: TickRange,
    pub buttons_visible: TickRange,
    pub forced_select: Option<Index<Button>>,
    pub forced_action: Option<Index<Button>>,

    pub restrictions: Restrictions,
}

/// A window of 90 kHz presentation time stamps, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickRange {
    pub start: u32,
    pub end: u32,
}

bitflags! {
    /// Display modes a button group applies to. The empty set is plain 4:3.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
    pub struct ButtonDescriptor: u8 {
        const WIDE = 1 << 0;
        const LETTERBOX = 1 << 1;
        const PAN_SCAN = 1 << 2;
    }
}

impl ButtonDescriptor {
    pub const CLASSIC: Self = Self::empty();
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Button {
    pub mask: Rectangle,
    pub up: Option<Reference<Interaction, Button>>,
    pub down: Option<Reference<Interaction, Button>>,
    pub left: Option<Reference<Interaction, Button>>,
    pub right: Option<Reference<Interaction, Button>>,

    /// Color overrides for the four subpicture pixel types.
    pub selection_colors: Option<Vec<ButtonColor>>,
    pub action_colors: Option<Vec<ButtonColor>>,

    pub action: Command,
    pub auto_action_on_select: bool,
}

/// Screen area of a button, inclusive pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rectangle {
    pub x_start: u16,
    pub x_end: u16,
    pub y_start: u16,
    pub y_end: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ButtonColor {
    pub color: Reference<ProgramChain, Color>,
    /// Opacity in 0.0..=1.0.
    pub alpha: f64,
}
