//! DVD virtual machine command words.
//!
//! A command is a 64-bit big-endian word. Bits are numbered from the least
//! significant (bit 0) to the most significant (bit 63); the group in bits
//! 61-63 selects the layout. Groups 0-3 are decoded here, anything else is
//! kept as [`Command::Unparsed`].

use dvd_archive_core::Index;
use dvd_archive_core::bits::Bits;
use dvd_archive_core::model::{Command, Condition, MenuType, Operand, Operation, SystemRegister, Target};

#[derive(Clone, Copy)]
struct Word(u64);

impl Word {
    /// `count` bits ending at bit `high`.
    fn get(self, high: u32, count: u32) -> u64 {
        self.0.bits(high + 1 - count..=high)
    }

    fn flag(self, bit: u32) -> bool {
        self.0.bit(bit)
    }

    fn index<T>(self, high: u32, count: u32) -> Index<T> {
        Index::new(self.get(high, count) as u32)
    }
}

pub fn decode(raw: u64) -> Command {
    let word = Word(raw);
    let decoded = match word.get(63, 3) {
        0 => special(word),
        1 if word.flag(60) => jump(word),
        1 => link(word),
        2 => system_set(word),
        3 => set(word),
        _ => None,
    };
    decoded.unwrap_or(Command::Unparsed(raw))
}

// ---------------------------------------------------------------------------
// Instruction groups
// ---------------------------------------------------------------------------

fn special(word: Word) -> Option<Command> {
    let command = match word.get(51, 4) {
        0 => Command::Nop,
        1 => Command::Goto {
            line: word.index(7, 8),
        },
        2 => Command::Break,
        3 => Command::SetParentalLevelAndGoto {
            level: word.get(11, 4) as u8,
            line: word.index(7, 8),
        },
        _ => return None,
    };
    Some(conditional(compare_register_with_operand(word), command))
}

fn jump(word: Word) -> Option<Command> {
    let command = match word.get(51, 4) {
        1 => Command::Exit,
        2 => Command::Jump {
            target: Target::Title(word.index(22, 7)),
        },
        3 => Command::Jump {
            target: Target::TitleWithinTitleSet(word.index(22, 7)),
        },
        5 => Command::Jump {
            target: Target::PartWithinTitleSet(word.index(22, 7), word.index(41, 10)),
        },
        6 => Command::Jump {
            target: system_space(word, false),
        },
        8 => Command::Call {
            target: system_space(word, true),
            resume: word.index(31, 8),
        },
        _ => return None,
    };
    Some(conditional(compare_registers(word), command))
}

/// Targets outside the current domain, shared by jumps and calls.
fn system_space(word: Word, call: bool) -> Target {
    let menu = MenuType::from_id(word.get(19, 4) as u8);
    match word.get(23, 2) {
        0 => Target::Start,
        1 => Target::TopLevelMenu(menu),
        2 if call => Target::Menu(menu),
        2 => Target::TitleMenu(word.index(30, 7), word.index(38, 7), menu),
        _ => Target::TopLevelProgramChain(word.index(46, 15)),
    }
}

fn link(word: Word) -> Option<Command> {
    let command = match word.get(51, 4) {
        0 => Command::Nop,
        op => Command::Jump {
            target: link_target(word, op)?,
        },
    };
    Some(conditional(compare_register_with_operand(word), command))
}

fn link_target(word: Word, op: u64) -> Option<Target> {
    let button = match word.get(15, 6) {
        0 => None,
        n => Some(Index::new(n as u32)),
    };
    let target = match op {
        1 => match word.get(4, 5) {
            0 => Target::None(button),
            1 => Target::StartOfCell(button),
            2 => Target::NextCell(button),
            3 => Target::PreviousCell(button),
            5 => Target::StartOfProgram(button),
            6 => Target::NextProgram(button),
            7 => Target::PreviousProgram(button),
            9 => Target::StartOfProgramChain(button),
            10 => Target::NextProgramChain(button),
            11 => Target::PreviousProgramChain(button),
            12 => Target::UpProgramChain(button),
            13 => Target::EndOfProgramChain(button),
            16 => Target::Resume(button),
            _ => return None,
        },
        4 => Target::ProgramChain(word.index(14, 15)),
        5 => Target::Part(word.index(9, 10), button),
        6 => Target::Program(word.index(6, 7), button),
        7 => Target::Cell(word.index(7, 8), button),
        _ => return None,
    };
    Some(target)
}

/// The optional link packed into the low half of a set instruction.
fn trailing_link(word: Word) -> Option<Option<Command>> {
    match word.get(51, 4) {
        0 => Some(None),
        op => link_target(word, op).map(|target| Some(Command::Jump { target })),
    }
}

fn system_set(word: Word) -> Option<Command> {
    let immediate = word.flag(60);
    let set = match word.get(59, 4) {
        0 => None,
        1 => {
            let streams = [
                (1, SystemRegister::AudioStreamIndex),
                (2, SystemRegister::SubpictureStreamIndex),
                (3, SystemRegister::ViewingAngleIndex),
            ];
            let assignments = streams
                .into_iter()
                .filter_map(|(i, register)| {
                    let flag = 47 - 8 * i;
                    word.flag(flag).then(|| {
                        let value = if immediate {
                            Operand::Immediate(word.get(flag - 1, 7) as u16)
                        } else {
                            Operand::GeneralRegister(word.index(flag - 4, 4))
                        };
                        (register, value)
                    })
                })
                .collect();
            Some(Command::SetSystemRegisters(assignments))
        }
        2 => Some(Command::SetSystemRegisters(vec![
            (SystemRegister::NavigationTimer, register_or_data(word, immediate, 47)),
            (
                SystemRegister::ProgramChainForTimer,
                Operand::Immediate(word.get(15, 16) as u16),
            ),
        ])),
        3 => Some(Command::SetGeneralRegister {
            register: word.index(19, 4),
            counter: word.flag(23),
            value: register_or_data(word, immediate, 47),
        }),
        6 => Some(Command::SetSystemRegisters(vec![(
            SystemRegister::SelectedButtonIndex,
            register_or_data(word, immediate, 31),
        )])),
        _ => return None,
    };
    let command = combine(set, trailing_link(word)?);
    Some(conditional(compare_registers(word), command))
}

fn set(word: Word) -> Option<Command> {
    let register = Operand::GeneralRegister(word.index(35, 4));
    let value = register_or_data(word, word.flag(60), 31);
    let operation = match word.get(59, 4) {
        0 => None,
        1 => Some(Operation::Assign(register, value)),
        2 => Some(Operation::Swap(
            register,
            Operand::GeneralRegister(word.index(19, 4)),
        )),
        3 => Some(Operation::Add(register, value)),
        4 => Some(Operation::Subtract(register, value)),
        5 => Some(Operation::Multiply(register, value)),
        6 => Some(Operation::Divide(register, value)),
        7 => Some(Operation::Modulus(register, value)),
        8 => Some(Operation::Random(register, value)),
        9 => Some(Operation::BitwiseAnd(register, value)),
        10 => Some(Operation::BitwiseOr(register, value)),
        11 => Some(Operation::BitwiseXor(register, value)),
        _ => return None,
    };
    let command = combine(operation.map(Command::Compute), trailing_link(word)?);
    Some(conditional(compare_general_register(word), command))
}

fn combine(set: Option<Command>, link: Option<Command>) -> Command {
    match (set, link) {
        (Some(set), Some(link)) => Command::Compound(Box::new(set), Box::new(link)),
        (Some(only), None) | (None, Some(only)) => only,
        (None, None) => Command::Nop,
    }
}

// ---------------------------------------------------------------------------
// Operands and conditions
// ---------------------------------------------------------------------------

/// A register byte: bit 7 selects the system registers.
fn register(byte: u64) -> Operand {
    if byte & 0x80 != 0 {
        Operand::SystemRegister(SystemRegister::from_number((byte & 0x1F) as u8))
    } else {
        Operand::GeneralRegister(Index::new((byte & 0x0F) as u32))
    }
}

/// A 16-bit immediate ending at `high`, or the register byte in its low half.
fn register_or_data(word: Word, immediate: bool, high: u32) -> Operand {
    if immediate {
        Operand::Immediate(word.get(high, 16) as u16)
    } else {
        register(word.get(high - 8, 8))
    }
}

fn compare(op: u64, lhs: Operand, rhs: Operand) -> Option<Condition> {
    match op {
        1 => Some(Condition::BitwiseAndNotZero(lhs, rhs)),
        2 => Some(Condition::Equal(lhs, rhs)),
        3 => Some(Condition::NotEqual(lhs, rhs)),
        4 => Some(Condition::GreaterThanOrEqual(lhs, rhs)),
        5 => Some(Condition::GreaterThan(lhs, rhs)),
        6 => Some(Condition::LessThanOrEqual(lhs, rhs)),
        7 => Some(Condition::LessThan(lhs, rhs)),
        _ => None,
    }
}

fn compare_register_with_operand(word: Word) -> Option<Condition> {
    compare(
        word.get(54, 3),
        register(word.get(39, 8)),
        register_or_data(word, word.flag(55), 31),
    )
}

fn compare_registers(word: Word) -> Option<Condition> {
    compare(word.get(54, 3), register(word.get(15, 8)), register(word.get(7, 8)))
}

fn compare_general_register(word: Word) -> Option<Condition> {
    compare(
        word.get(54, 3),
        register(word.get(43, 4)),
        register_or_data(word, word.flag(55), 15),
    )
}

fn conditional(condition: Option<Condition>, command: Command) -> Command {
    match condition {
        Some(condition) => Command::Condition {
            condition,
            then: Box::new(command),
        },
        None => command,
    }
}

#[cfg(test)]
#[path = "../tests/command_tests.rs"]
mod tests;
