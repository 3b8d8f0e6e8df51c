use serde::{Deserialize, Serialize};

use crate::index::{AllTitles, GeneralRegister, Index};
use crate::model::domain::MenuType;
use crate::model::interaction::Button;
use crate::model::program_chain::{Cell, Program, ProgramChain};
use crate::model::{Part, Title, TitleSet};

/// An instruction of the DVD virtual machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Register arithmetic.
    Compute(Operation),
    /// Transition playback to a different position.
    Jump { target: Target },
    /// Transition playback, remembering the cell to resume at.
    Call { target: Target, resume: Index<Cell> },
    Condition {
        condition: Condition,
        then: Box<Command>,
    },
    /// Two instructions packed into one command word.
    Compound(Box<Command>, Box<Command>),
    SetSystemRegisters(Vec<(SystemRegister, Operand)>),
    SetGeneralRegister {
        register: Index<GeneralRegister>,
        counter: bool,
        value: Operand,
    },
    SetParentalLevelAndGoto {
        level: u8,
        line: Index<Command>,
    },
    Goto { line: Index<Command> },
    Break,
    Exit,
    Nop,
    /// Raw command word the decoder does not understand.
    Unparsed(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Assign(Operand, Operand),
    Swap(Operand, Operand),
    Add(Operand, Operand),
    Subtract(Operand, Operand),
    Multiply(Operand, Operand),
    Divide(Operand, Operand),
    Modulus(Operand, Operand),
    Random(Operand, Operand),
    BitwiseAnd(Operand, Operand),
    BitwiseOr(Operand, Operand),
    BitwiseXor(Operand, Operand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    /// The first-play program chain.
    Start,
    TopLevelMenu(MenuType),
    TopLevelProgramChain(Index<ProgramChain>),
    TitleMenu(Index<TitleSet>, Index<Title>, MenuType),
    Title(Index<AllTitles>),
    TitleWithinTitleSet(Index<Title>),
    PartWithinTitleSet(Index<Title>, Index<Part>),
    Menu(MenuType),
    ProgramChain(Index<ProgramChain>),
    Part(Index<Part>, Option<Index<Button>>),
    Program(Index<Program>, Option<Index<Button>>),
    Cell(Index<Cell>, Option<Index<Button>>),
    StartOfProgramChain(Option<Index<Button>>),
    NextProgramChain(Option<Index<Button>>),
    PreviousProgramChain(Option<Index<Button>>),
    UpProgramChain(Option<Index<Button>>),
    EndOfProgramChain(Option<Index<Button>>),
    StartOfProgram(Option<Index<Button>>),
    NextProgram(Option<Index<Button>>),
    PreviousProgram(Option<Index<Button>>),
    StartOfCell(Option<Index<Button>>),
    NextCell(Option<Index<Button>>),
    PreviousCell(Option<Index<Button>>),
    Resume(Option<Index<Button>>),
    /// Stay, optionally highlighting a button.
    None(Option<Index<Button>>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    BitwiseAndNotZero(Operand, Operand),
    Equal(Operand, Operand),
    NotEqual(Operand, Operand),
    GreaterThanOrEqual(Operand, Operand),
    GreaterThan(Operand, Operand),
    LessThanOrEqual(Operand, Operand),
    LessThan(Operand, Operand),
}

/// A command operand, tagged with the kind of storage it reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operand {
    Immediate(u16),
    GeneralRegister(Index<GeneralRegister>),
    GeneralRegisterCounterMode(Index<GeneralRegister>),
    SystemRegister(SystemRegister),
}

/// Player state registers (SPRM).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemRegister {
    PreferredMenuLanguage,
    AudioStreamIndex,
    SubpictureStreamIndex,
    ViewingAngleIndex,
    GlobalTitleIndex,
    TitleIndex,
    ProgramChainIndex,
    PartIndex,
    SelectedButtonIndex,
    NavigationTimer,
    ProgramChainForTimer,
    KaraokeMode,
    ParentalCountry,
    ParentalLevel,
    VideoMode,
    PlayerAudioCapabilities,
    PreferredAudioLanguage,
    PreferredAudioContent,
    PreferredSubpictureLanguage,
    PreferredSubpictureContent,
    PlayerRegionMask,
    Reserved(u8),
    Unexpected(u8),
}

impl SystemRegister {
    pub fn from_number(number: u8) -> Self {
        match number {
            0 => Self::PreferredMenuLanguage,
            1 => Self::AudioStreamIndex,
            2 => Self::SubpictureStreamIndex,
            3 => Self::ViewingAngleIndex,
            4 => Self::GlobalTitleIndex,
            5 => Self::TitleIndex,
            6 => Self::ProgramChainIndex,
            7 => Self::PartIndex,
            8 => Self::SelectedButtonIndex,
            9 => Self::NavigationTimer,
            10 => Self::ProgramChainForTimer,
            11 => Self::KaraokeMode,
            12 => Self::ParentalCountry,
            13 => Self::ParentalLevel,
            14 => Self::VideoMode,
            15 => Self::PlayerAudioCapabilities,
            16 => Self::PreferredAudioLanguage,
            17 => Self::PreferredAudioContent,
            18 => Self::PreferredSubpictureLanguage,
            19 => Self::PreferredSubpictureContent,
            20 => Self::PlayerRegionMask,
            21..=23 => Self::Reserved(number),
            other => Self::Unexpected(other),
        }
    }
}
