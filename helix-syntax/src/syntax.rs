// This file is part of helix, an interactive Unix command interpreter.
// Copyright (C) 2026 The helix developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Abstract syntax of parsed command lines.
//!
//! The types in this module are produced by the [parser](crate::parser) and
//! consumed by the executor. They carry no quoting information other than the
//! per-word [`literal`](Word::literal) flag that controls variable expansion.
//!
//! The `Display` implementations reconstruct an approximation of the original
//! source. They are meant for diagnostics and tests, not for re-parsing:
//! quoting is not reproduced.

use itertools::Itertools as _;
use std::fmt;

/// Whitespace-delimited word with its expansion attribute.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Word {
    /// Text of the word, with quotes stripped and escapes resolved
    pub text: String,

    /// Whether the word is exempt from variable expansion
    ///
    /// The lexer sets this flag when any part of the word was single-quoted.
    pub literal: bool,
}

impl Word {
    /// Creates an expandable word.
    pub fn new<T: Into<String>>(text: T) -> Self {
        Word {
            text: text.into(),
            literal: false,
        }
    }

    /// Creates a word that is exempt from expansion.
    pub fn literal<T: Into<String>>(text: T) -> Self {
        Word {
            text: text.into(),
            literal: true,
        }
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.text.fmt(f)
    }
}

/// One stage of a pipeline.
///
/// Invariants maintained by the parser: `argv` is non-empty, and at most one
/// redirection of each kind is retained (a later redirection of the same kind
/// overwrites the earlier one).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Command {
    /// Command name and arguments, in order
    pub argv: Vec<Word>,
    /// Redirection target for the standard input (`<`)
    pub stdin_file: Option<Word>,
    /// Redirection target for the standard output (`>` or `>>`)
    pub stdout_file: Option<Word>,
    /// Redirection target for the standard error (`2>` or `2>>`)
    pub stderr_file: Option<Word>,
    /// Whether the standard output redirection appends (`>>`)
    pub stdout_append: bool,
    /// Whether the standard error redirection appends (`2>>`)
    pub stderr_append: bool,
}

impl Command {
    /// Returns the command name, the first word of `argv`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.argv[0].text
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv.iter().format(" "))?;
        if let Some(file) = &self.stdin_file {
            write!(f, " < {file}")?;
        }
        if let Some(file) = &self.stdout_file {
            let op = if self.stdout_append { ">>" } else { ">" };
            write!(f, " {op} {file}")?;
        }
        if let Some(file) = &self.stderr_file {
            let op = if self.stderr_append { "2>>" } else { "2>" };
            write!(f, " {op} {file}")?;
        }
        Ok(())
    }
}

/// Sequence of commands connected by pipes, with a background marker.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pipeline {
    /// Stages of the pipeline; never empty
    pub commands: Vec<Command>,
    /// Whether the pipeline runs without the shell waiting for it
    pub background: bool,
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.commands.iter().format(" | "))?;
        if self.background {
            write!(f, " &")?;
        }
        Ok(())
    }
}
