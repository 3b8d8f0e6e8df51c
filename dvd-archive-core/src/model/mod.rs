//! Navigational and playback structure of a DVD.
//!
//! The whole tree is produced in one pass when a disc is read and is not
//! modified afterwards. Entities refer to each other through [`Index`] and
//! [`Reference`] values rather than through ownership, so the structure
//! serializes without cycles.

use std::collections::BTreeMap;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::bits::Bits;
use crate::index::{AllTitles, Index};
use crate::reference::Reference;

pub mod command;
pub mod domain;
pub mod interaction;
pub mod program_chain;
pub mod time;

pub use command::{Command, Condition, Operand, Operation, SystemRegister, Target};
pub use domain::{
    AudioAttributes, Descriptor, Domain, MenuType, ProgramChainId, ProgramChains,
    SubpictureAttributes, VideoAttributes,
};
pub use interaction::{Button, ButtonColor, ButtonDescriptor, Interaction, Rectangle, TickRange};
pub use program_chain::{
    AngleInfo, Cell, CellPlayback, Color, EndingMode, KaraokeInfo, PlaybackMode, Program,
    ProgramChain, SubpictureDescriptor,
};
pub use time::{FrameRate, Time};

/// Static information about the navigational and playback structure of a DVD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscInfo {
    pub specification: Version,
    pub category: u32,
    pub disc_id: [u8; 16],

    pub provider: String,
    pub pos_code: u64,
    pub total_volume_count: u16,
    pub volume_index: u16,
    pub disc_side: u8,

    /// First-play program chain, run when the disc is inserted.
    pub start: Option<ProgramChain>,
    pub top_level_menus: Domain,
    pub title_sets: BTreeMap<Index<TitleSet>, TitleSet>,
}

impl DiscInfo {
    /// Hex rendering of the disc id.
    pub fn disc_id_hex(&self) -> String {
        self.disc_id.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Every title of every title set, in global title order.
    pub fn titles_by_global_index(&self) -> Vec<&Title> {
        let mut titles: Vec<&Title> = self
            .title_sets
            .values()
            .flat_map(|ts| ts.titles.values())
            .collect();
        titles.sort_by_key(|t| t.global_index);
        titles
    }
}

/// DVD-Video specification version the disc was authored against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
}

impl Version {
    /// Split the packed version byte (major in the high nibble).
    pub fn from_packed(byte: u8) -> Self {
        Self {
            major: byte.bits(4..=7),
            minor: byte.bits(0..=3),
        }
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// A group of titles sharing one menu domain and one content domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleSet {
    pub titles: BTreeMap<Index<Title>, Title>,
    pub menus: Domain,
    pub content: Domain,

    /// Stored again per title set; expected to match the disc-level values.
    pub specification: Version,
    pub category: u32,
}

/// One playable item as presented to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
    pub global_index: Index<AllTitles>,

    pub parts: BTreeMap<Index<Part>, Part>,
    pub viewing_angle_count: u8,

    pub jump_commands: CommandPresence,
    pub linear_playback: bool,
    pub restrictions: Restrictions,
}

/// A chapter: points at the program where it starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub start: Reference<TitleSet, Program>,
}

bitflags! {
    /// Where jump, link or call commands occur within a title.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct CommandPresence: u8 {
        const FEATURES = 1 << 0;
        const PRE_POST = 1 << 1;
        const CELLS = 1 << 2;
        const BUTTONS = 1 << 3;
    }
}

bitflags! {
    /// User operations prohibited during playback (the `UOP` mask).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Restrictions: u32 {
        const NO_JUMP_INTO_TITLE = 1 << 0;
        const NO_JUMP_TO_PART = 1 << 1;
        const NO_JUMP_TO_TITLE = 1 << 2;
        const NO_STOP = 1 << 3;
        const NO_JUMP_UP = 1 << 4;
        const NO_JUMP_INTO_PART = 1 << 5;
        const NO_PROGRAM_BACKWARD = 1 << 6;
        const NO_PROGRAM_FORWARD = 1 << 7;
        const NO_SEEK_FORWARD = 1 << 8;
        const NO_SEEK_BACKWARD = 1 << 9;
        const NO_JUMP_TO_TOP_LEVEL_MENU = 1 << 10;
        const NO_JUMP_TO_PER_TITLE_MENU = 1 << 11;
        const NO_JUMP_TO_SUBPICTURE_MENU = 1 << 12;
        const NO_JUMP_TO_AUDIO_MENU = 1 << 13;
        const NO_JUMP_TO_VIEWING_ANGLE_MENU = 1 << 14;
        const NO_JUMP_TO_CHAPTER_MENU = 1 << 15;
        const NO_RESUME_FROM_MENU = 1 << 16;
        const NO_MENU_INTERACTIONS = 1 << 17;
        const NO_STILL_SKIP = 1 << 18;
        const NO_PAUSE = 1 << 19;
        const NO_CHANGE_AUDIO_STREAM = 1 << 20;
        const NO_CHANGE_SUBPICTURE_STREAM = 1 << 21;
        const NO_CHANGE_VIEWING_ANGLE = 1 << 22;
        const NO_CHANGE_KARAOKE_MODE = 1 << 23;
        const NO_CHANGE_VIDEO_MODE = 1 << 24;
    }
}
