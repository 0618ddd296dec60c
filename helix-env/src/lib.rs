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

//! This crate defines the shell execution environment.
//!
//! The environment consists of application-managed parts — variables,
//! history, the job table, the built-in registry — implemented in pure Rust
//! in this crate, and system-managed parts such as the working directory and
//! child processes, which are reached through the [`System`] trait. Exactly
//! one [`Env`] exists per shell instance and owns both halves.

pub mod builtin;
pub mod history;
pub mod input;
pub mod io;
pub mod job;
pub mod semantics;
pub mod signal;
pub mod system;
pub mod variable;

use self::builtin::Builtin;
use self::history::History;
use self::io::Fd;
use self::job::JobList;
use self::semantics::ExitStatus;
use self::variable::VariableSet;
use std::collections::HashMap;

#[doc(no_inline)]
pub use self::system::real::RealSystem;
#[doc(no_inline)]
pub use self::system::System;

/// Whole shell execution environment.
#[derive(Debug)]
pub struct Env {
    /// Built-in utilities available in the environment
    pub builtins: HashMap<&'static str, Builtin>,

    /// Variables defined in the environment
    pub variables: VariableSet,

    /// Ring of accepted command lines
    pub history: History,

    /// Jobs started by the environment
    ///
    /// The job list is the sole owner of [`Job`](job::Job) records. The
    /// signal router and the built-ins hold only indices into it.
    pub jobs: JobList,

    /// Exit status of the last executed command
    pub exit_status: ExitStatus,

    /// Whether the shell is attached to a controlling terminal
    ///
    /// Terminal ownership is handed around only when this is true.
    pub is_interactive: bool,

    /// Interface to the underlying system
    pub system: Box<dyn System>,
}

impl Env {
    /// Creates a new environment with the given system.
    pub fn with_system(system: Box<dyn System>) -> Env {
        Env {
            builtins: HashMap::new(),
            variables: VariableSet::new(),
            history: History::new(),
            jobs: JobList::new(),
            exit_status: ExitStatus::SUCCESS,
            is_interactive: false,
            system,
        }
    }

    /// Writes a line to the standard output.
    pub fn print(&mut self, text: &str) -> system::Result<()> {
        self.system.write_all(Fd::STDOUT, text.as_bytes())
    }

    /// Writes a message to the standard error, ignoring failures.
    ///
    /// Write errors are deliberately dropped: there is nowhere left to
    /// report them.
    pub fn print_error(&mut self, message: &str) {
        _ = self.system.write_all(Fd::STDERR, message.as_bytes());
    }
}
