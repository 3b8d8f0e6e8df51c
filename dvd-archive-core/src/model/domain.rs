use std::collections::BTreeMap;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::index::{Index, LogicalAudioStream, LogicalSubpictureStream};
use crate::model::Title;
use crate::model::program_chain::ProgramChain;

/// A group of program chains with common stream attributes.
///
/// A disc has one top-level menu domain (VMGM); every title set has a menu
/// domain (VTSM) and a content domain (VTS).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub program_chains: ProgramChains,

    pub video: VideoAttributes,
    pub audio: BTreeMap<Index<LogicalAudioStream>, AudioAttributes>,
    pub subpicture: BTreeMap<Index<LogicalSubpictureStream>, SubpictureAttributes>,
}

/// Program chains of a domain, addressed by descriptor.
///
/// The same program chain can be reachable through several descriptors (for
/// example as an entry point of more than one menu), so descriptors map to an
/// [`ProgramChainId`] and the chains themselves are stored once per id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramChains {
    #[serde(with = "crate::pairs")]
    mapping: BTreeMap<Descriptor, ProgramChainId>,
    #[serde(with = "crate::pairs")]
    storage: BTreeMap<ProgramChainId, ProgramChain>,
}

impl ProgramChains {
    pub fn new(
        mapping: BTreeMap<Descriptor, ProgramChainId>,
        storage: BTreeMap<ProgramChainId, ProgramChain>,
    ) -> Self {
        Self { mapping, storage }
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &Descriptor> {
        self.mapping.keys()
    }

    /// All distinct program chains of the domain.
    pub fn all(&self) -> impl Iterator<Item = &ProgramChain> {
        self.storage.values()
    }

    pub fn by_id(&self, id: &ProgramChainId) -> Option<&ProgramChain> {
        self.storage.get(id)
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// The first program chain whose descriptor matches `predicate`.
    pub fn find(&self, predicate: impl Fn(&Descriptor) -> bool) -> Option<&ProgramChain> {
        self.mapping
            .iter()
            .find(|(descriptor, _)| predicate(descriptor))
            .and_then(|(_, id)| self.storage.get(id))
    }

    /// Look up a program chain by its number within the domain.
    ///
    /// Menu program chains are numbered per language unit, so `language`
    /// selects the unit; it is ignored for title program chains.
    pub fn get(&self, index: Index<ProgramChain>, language: Option<&str>) -> Option<&ProgramChain> {
        self.find(|descriptor| match descriptor {
            Descriptor::Menu {
                language: lang,
                index: i,
                ..
            } => *i == index && language.is_none_or(|l| l == lang.as_str()),
            Descriptor::Title { index: i, .. } => *i == index,
        })
    }
}

/// How a program chain is addressed within its domain.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Descriptor {
    Menu {
        language: String,
        index: Index<ProgramChain>,
        entry_point: bool,
        menu_type: Option<MenuType>,
    },
    Title {
        index: Index<ProgramChain>,
        entry_point: bool,
        title: Index<Title>,
    },
}

/// Kind of an entry-point menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MenuType {
    Titles,
    RootWithinTitle,
    Subpicture,
    Audio,
    ViewingAngle,
    Chapter,
    Unexpected(u8),
}

impl MenuType {
    /// Decode the 4-bit menu id used by PGCI entries and jump commands.
    pub fn from_id(id: u8) -> Self {
        match id {
            2 => Self::Titles,
            3 => Self::RootWithinTitle,
            4 => Self::Subpicture,
            5 => Self::Audio,
            6 => Self::ViewingAngle,
            7 => Self::Chapter,
            other => Self::Unexpected(other),
        }
    }
}

/// Identity of a stored program chain.
///
/// Built from the byte offsets of the language unit (menus only) and the
/// program chain record, so two descriptors pointing at the same record
/// resolve to the same chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProgramChainId {
    pub language_id: Option<u32>,
    pub program_chain_id: u32,
}

// ---------------------------------------------------------------------------
// Stream attributes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoAttributes {
    pub coding: VideoCoding,
    pub standard: VideoStandard,
    pub coded_picture: Resolution,
    pub display_aspect: AspectRatio,
    pub allowed_display: DisplayModification,
    pub line21cc: Line21ClosedCaption,
    pub content: VideoContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoCoding {
    Mpeg1,
    Mpeg2,
    Unexpected(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoStandard {
    Ntsc,
    Pal,
    Unexpected(u8),
}

/// Coded picture size; a dimension is `None` when it cannot be derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: Option<u16>,
    pub height: Option<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    Classic { letterboxed: bool },
    Wide,
    Unexpected(u8),
}

bitflags! {
    /// Display adaptations the player may apply to wide content.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct DisplayModification: u8 {
        const LETTERBOX = 1 << 0;
        const PAN_SCAN = 1 << 1;
    }
}

bitflags! {
    /// Fields of the video signal carrying line 21 closed captions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Line21ClosedCaption: u8 {
        const FIRST_FIELD = 1 << 0;
        const SECOND_FIELD = 1 << 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoContent {
    Video,
    Film,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioAttributes {
    pub coding: AudioCoding,
    pub sample_frequency: SampleFrequency,
    pub channel_count: u8,
    pub rendering: RenderingIntent,
    pub language: Option<String>,
    pub content: AudioContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioCoding {
    Ac3,
    Dts,
    Mpeg1 { dynamic_range_compression: bool },
    Mpeg2 { dynamic_range_compression: bool },
    Lpcm { bits_per_sample: u8 },
    /// Raw format and quantization fields.
    Unexpected(u8, u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleFrequency {
    Hz48000,
    Hz96000,
    Unexpected(u8),
}

impl SampleFrequency {
    pub fn hertz(self) -> Option<u32> {
        match self {
            Self::Hz48000 => Some(48_000),
            Self::Hz96000 => Some(96_000),
            Self::Unexpected(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderingIntent {
    Normal,
    Surround {
        dolby_matrix_encoded: bool,
    },
    Karaoke {
        version: u8,
        mode: KaraokeMode,
        channels: Vec<KaraokeChannel>,
        multi_channel_intro: bool,
    },
    /// Raw application mode and application info byte.
    Unexpected { mode: u8, info: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KaraokeMode {
    Solo,
    Duet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KaraokeChannel {
    Left,
    Right,
    Center,
    Surround,
    GuideMelody(Option<String>),
    GuideVocal(Option<String>),
    Effect(Option<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioContent {
    SourceAudio,
    AudioDescription,
    Commentary,
    AlternateCommentary,
    Unspecified,
    Unexpected(u8),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubpictureAttributes {
    pub coding: SubpictureCoding,
    pub language: Option<String>,
    pub content: SubpictureContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubpictureCoding {
    Rle,
    Extended,
    Unexpected(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubpictureContent {
    Subtitles { font_size: FontSize, for_children: bool },
    ClosedCaptions { font_size: FontSize, for_children: bool },
    Commentary { font_size: FontSize, for_children: bool },
    Forced,
    Unspecified,
    Unexpected(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontSize {
    Normal,
    Large,
}
