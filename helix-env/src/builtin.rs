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

//! Type definitions for built-in utilities.
//!
//! A built-in executes in the shell process because it mutates shell state.
//! Implementations live in the `helix-builtin` crate; the frontend registers
//! them into [`Env::builtins`](crate::Env::builtins), and the executor
//! dispatches by command name.

use crate::semantics::{Divert, ExitStatus};
use crate::Env;
use std::ops::ControlFlow::{self, Break, Continue};

/// Entry point of a built-in utility.
///
/// The arguments are the command line words after the utility name, already
/// expanded.
pub type Main = fn(&mut Env, Vec<String>) -> Result;

/// Built-in utility definition.
#[derive(Clone, Copy, Debug)]
pub struct Builtin {
    /// Function that executes the built-in
    pub execute: Main,
}

/// Result of a built-in execution.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[must_use = "the result must be applied to the environment"]
pub struct Result {
    exit_status: ExitStatus,
    divert: ControlFlow<Divert>,
}

impl Result {
    /// Creates a result with the given exit status and no divert.
    pub fn new(exit_status: ExitStatus) -> Self {
        Result {
            exit_status,
            divert: Continue(()),
        }
    }

    /// Creates a result with the given exit status and divert.
    pub fn with_exit_status_and_divert(
        exit_status: ExitStatus,
        divert: ControlFlow<Divert>,
    ) -> Self {
        Result {
            exit_status,
            divert,
        }
    }

    /// Exit status of the built-in.
    #[must_use]
    pub fn exit_status(&self) -> ExitStatus {
        self.exit_status
    }

    /// Divert requested by the built-in.
    #[must_use]
    pub fn divert(&self) -> ControlFlow<Divert> {
        self.divert
    }
}

/// The default result has a successful exit status and no divert.
impl Default for Result {
    fn default() -> Self {
        Self::new(ExitStatus::SUCCESS)
    }
}

impl From<ExitStatus> for Result {
    fn from(exit_status: ExitStatus) -> Self {
        Self::new(exit_status)
    }
}

impl Result {
    /// Shorthand for a result that exits the shell.
    pub fn exit(exit_status: Option<ExitStatus>) -> Self {
        Result {
            exit_status: exit_status.unwrap_or(ExitStatus::SUCCESS),
            divert: Break(Divert::Exit(exit_status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_result_is_success_without_divert() {
        let result = Result::default();
        assert_eq!(result.exit_status(), ExitStatus::SUCCESS);
        assert_eq!(result.divert(), Continue(()));
    }

    #[test]
    fn exit_result_carries_divert() {
        let result = Result::exit(Some(ExitStatus(3)));
        assert_eq!(
            result.divert(),
            Break(Divert::Exit(Some(ExitStatus(3))))
        );
    }
}
