//! Typed references between entities of the model.
//!
//! A [`Reference<Root, Value>`] names a `Value` that can be found starting
//! from a `Root`. Only the index fields needed for that pair are populated;
//! each pair has its own constructor and its own resolver method on `Root`.
//! Resolving a reference whose required field is missing is a programming
//! error and panics.
//!
//! A reference can only be resolved against the root type it was built for:
//!
//! ```compile_fail
//! use dvd_archive_core::model::{Cell, ProgramChain};
//! use dvd_archive_core::{Index, Reference};
//!
//! fn lookup(pgc: &ProgramChain) {
//!     let cell = Reference::<ProgramChain, Cell>::new(Index::new(1));
//!     let _ = pgc.resolve_color(&cell);
//! }
//! ```

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::index::Index;
use crate::model::{
    Button, ButtonDescriptor, Cell, Color, Command, Domain, Interaction, Program, ProgramChain,
    TitleSet,
};

#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Reference<Root, Value> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_chain: Option<Index<ProgramChain>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<Index<Program>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell: Option<Index<Cell>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Index<Command>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button: Option<Index<Button>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Index<Color>>,
    #[serde(skip)]
    marker: PhantomData<fn() -> (Root, Value)>,
}

impl<Root, Value> Reference<Root, Value> {
    const EMPTY: Self = Self {
        program_chain: None,
        program: None,
        cell: None,
        command: None,
        button: None,
        color: None,
        marker: PhantomData,
    };
}

impl Reference<TitleSet, Program> {
    pub fn new(program_chain: Index<ProgramChain>, program: Index<Program>) -> Self {
        Self {
            program_chain: Some(program_chain),
            program: Some(program),
            ..Self::EMPTY
        }
    }
}

impl Reference<Domain, ProgramChain> {
    pub fn new(program_chain: Index<ProgramChain>) -> Self {
        Self {
            program_chain: Some(program_chain),
            ..Self::EMPTY
        }
    }
}

impl Reference<ProgramChain, Cell> {
    pub fn new(cell: Index<Cell>) -> Self {
        Self {
            cell: Some(cell),
            ..Self::EMPTY
        }
    }
}

impl Reference<ProgramChain, Command> {
    pub fn new(command: Index<Command>) -> Self {
        Self {
            command: Some(command),
            ..Self::EMPTY
        }
    }
}

impl Reference<ProgramChain, Color> {
    pub fn new(color: Index<Color>) -> Self {
        Self {
            color: Some(color),
            ..Self::EMPTY
        }
    }
}

impl Reference<Interaction, Button> {
    pub fn new(button: Index<Button>) -> Self {
        Self {
            button: Some(button),
            ..Self::EMPTY
        }
    }
}

// ---------------------------------------------------------------------------
// Resolvers, one per (Root, Value) pair
// ---------------------------------------------------------------------------

impl TitleSet {
    /// The program a part starts at, inside the content domain.
    pub fn resolve_program(&self, reference: &Reference<TitleSet, Program>) -> Option<&Program> {
        let program_chain = reference
            .program_chain
            .expect("title set program reference without program chain");
        let program = reference
            .program
            .expect("title set program reference without program");
        self.content
            .program_chains
            .get(program_chain, None)?
            .programs
            .get(&program)
    }
}

impl Domain {
    /// A sibling program chain; `language` picks the menu language unit.
    pub fn resolve_program_chain(
        &self,
        reference: &Reference<Domain, ProgramChain>,
        language: Option<&str>,
    ) -> Option<&ProgramChain> {
        let index = reference
            .program_chain
            .expect("domain reference without program chain");
        self.program_chains.get(index, language)
    }
}

impl ProgramChain {
    pub fn resolve_cell(&self, reference: &Reference<ProgramChain, Cell>) -> Option<&Cell> {
        let cell = reference.cell.expect("cell reference without cell");
        self.cells.get(&cell)
    }

    /// Cell commands live in their own table, separate from pre and post commands.
    pub fn resolve_cell_command(
        &self,
        reference: &Reference<ProgramChain, Command>,
    ) -> Option<&Command> {
        let command = reference.command.expect("command reference without command");
        self.cell_post.get(&command)
    }

    pub fn resolve_color(&self, reference: &Reference<ProgramChain, Color>) -> Option<&Color> {
        let color = reference.color.expect("color reference without color");
        self.button_palette.get(&color)
    }
}

impl Interaction {
    /// The variant of a button matching the given display mode.
    ///
    /// A variant matches when its descriptor contains all modes of `descriptor`.
    pub fn resolve_button(
        &self,
        reference: &Reference<Interaction, Button>,
        descriptor: ButtonDescriptor,
    ) -> Option<&Button> {
        let button = reference.button.expect("button reference without button");
        self.buttons
            .get(&button)?
            .iter()
            .find(|(variant, _)| variant.contains(descriptor))
            .map(|(_, button)| button)
    }
}

// Manual impls so markers need not implement anything.

impl<Root, Value> Clone for Reference<Root, Value> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Root, Value> Copy for Reference<Root, Value> {}

impl<Root, Value> PartialEq for Reference<Root, Value> {
    fn eq(&self, other: &Self) -> bool {
        self.program_chain == other.program_chain
            && self.program == other.program
            && self.cell == other.cell
            && self.command == other.command
            && self.button == other.button
            && self.color == other.color
    }
}

impl<Root, Value> Eq for Reference<Root, Value> {}

impl<Root, Value> fmt::Debug for Reference<Root, Value> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Reference");
        let fields = [
            ("program_chain", self.program_chain.map(Index::get)),
            ("program", self.program.map(Index::get)),
            ("cell", self.cell.map(Index::get)),
            ("command", self.command.map(Index::get)),
            ("button", self.button.map(Index::get)),
            ("color", self.color.map(Index::get)),
        ];
        for (name, value) in fields {
            if let Some(value) = value {
                s.field(name, &value);
            }
        }
        s.finish()
    }
}

#[cfg(test)]
#[path = "tests/reference_tests.rs"]
mod tests;
