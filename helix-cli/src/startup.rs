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

//! Command-line argument parsing for the shell itself.

use thiserror::Error;

/// How the shell was asked to run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Invocation {
    /// Read commands interactively from the standard input
    Interactive,
    /// Execute one command line and exit (`-c`)
    Command(String),
    /// Print the version and exit
    Version,
    /// Print usage and exit
    Help,
}

/// Error in the shell's own command line.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    /// `-c` was given without a command string.
    #[error("option `-c` requires an argument")]
    MissingCommandArgument,

    /// An option the shell does not know.
    #[error("unknown option `{0}`")]
    UnknownOption(String),

    /// A positional operand; helix does not run script files.
    #[error("unexpected operand `{0}`")]
    UnexpectedOperand(String),
}

/// Usage summary printed for `--help` and after an argument error.
pub const USAGE: &str = "usage: helix [-c command]\n";

/// Parses the shell's arguments, including the leading program name.
pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Invocation, Error> {
    let mut args = args.into_iter().skip(1);
    let Some(first) = args.next() else {
        return Ok(Invocation::Interactive);
    };

    let invocation = match first.as_str() {
        "-c" => match args.next() {
            Some(command) => Invocation::Command(command),
            None => return Err(Error::MissingCommandArgument),
        },
        "--version" | "-V" => Invocation::Version,
        "--help" => Invocation::Help,
        _ if first.starts_with('-') => return Err(Error::UnknownOption(first)),
        _ => return Err(Error::UnexpectedOperand(first)),
    };

    match args.next() {
        Some(operand) => Err(Error::UnexpectedOperand(operand)),
        None => Ok(invocation),
    }
}
