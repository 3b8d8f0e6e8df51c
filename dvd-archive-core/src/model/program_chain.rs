use std::collections::BTreeMap;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::index::{
    Index, IndexRange, LogicalAudioStream, LogicalSubpictureStream, Sector, VobAudioStream,
    VobSubpictureStream,
};
use crate::model::command::Command;
use crate::model::domain::Domain;
use crate::model::interaction::Interaction;
use crate::model::time::Time;
use crate::model::Restrictions;
use crate::reference::Reference;

/// The playback unit of a DVD.
///
/// A program chain plays its cells in order (unless the playback mode says
/// otherwise). Commands run before the chain, after it and after individual
/// cells. `next`, `previous` and `up` link to sibling chains of the same domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramChain {
    pub programs: BTreeMap<Index<Program>, Program>,
    pub cells: BTreeMap<Index<Cell>, Cell>,

    pub duration: Time,
    pub playback: PlaybackMode,
    pub ending: EndingMode,
    pub map_audio: BTreeMap<Index<LogicalAudioStream>, Index<VobAudioStream>>,
    pub map_subpicture: BTreeMap<
        Index<LogicalSubpictureStream>,
        BTreeMap<SubpictureDescriptor, Index<VobSubpictureStream>>,
    >,

    pub next: Option<Reference<Domain, ProgramChain>>,
    pub previous: Option<Reference<Domain, ProgramChain>>,
    pub up: Option<Reference<Domain, ProgramChain>>,

    pub pre: BTreeMap<Index<Command>, Command>,
    pub post: BTreeMap<Index<Command>, Command>,
    pub cell_post: BTreeMap<Index<Command>, Command>,
    pub button_palette: BTreeMap<Index<Color>, Color>,
    pub restrictions: Restrictions,
}

/// Skip target for next/previous navigation; starts at a cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub start: Reference<ProgramChain, Cell>,
}

/// A contiguous run of sectors within a program chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub duration: Time,
    pub playback: CellPlayback,
    pub ending: EndingMode,
    pub angle: Option<AngleInfo>,
    pub karaoke: Option<KaraokeInfo>,

    /// One entry per navigation packet that introduces button highlights.
    pub interactions: Vec<Interaction>,
    pub post: Option<Reference<ProgramChain, Command>>,
    pub sectors: IndexRange<Sector>,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct CellPlayback: u8 {
        const SEAMLESS = 1 << 0;
        const SEAMLESS_ANGLE = 1 << 1;
        const INTERLEAVED = 1 << 2;
        const TIME_DISCONTINUITY = 1 << 3;
        const ALL_STILL_FRAMES = 1 << 4;
        const STOP_FAST_FORWARD = 1 << 5;
    }
}

/// Position of a cell within a multi-angle block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AngleInfo {
    FirstCellInBlock,
    InnerCellInBlock,
    LastCellInBlock,
    ExternalCell,
    /// Raw block type (high two bits) and block mode (low two bits).
    Unexpected(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KaraokeInfo {
    TitlePicture,
    Introduction,
    Bridge,
    FirstClimax,
    SecondClimax,
    MaleVocal,
    FemaleVocal,
    MixedVocal,
    InterludeFadeIn,
    Interlude,
    InterludeFadeOut,
    FirstEnding,
    SecondEnding,
    Unexpected(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackMode {
    Sequential,
    Random { program_count: u8 },
    Shuffle { program_count: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndingMode {
    Immediate,
    HoldLastFrame { seconds: u8 },
    HoldLastFrameIndefinitely,
}

impl EndingMode {
    /// Decode a still-time byte.
    pub fn from_still_time(still: u8) -> Self {
        match still {
            0 => Self::Immediate,
            0xFF => Self::HoldLastFrameIndefinitely,
            seconds => Self::HoldLastFrame { seconds },
        }
    }
}

/// Display variant a subpicture stream is authored for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SubpictureDescriptor {
    Classic,
    Wide,
    Letterbox,
    PanScan,
}

/// A palette entry in YCbCr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub y: u8,
    pub cb: u8,
    pub cr: u8,
}
