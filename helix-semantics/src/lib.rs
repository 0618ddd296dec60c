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

//! This crate implements command execution for the helix shell.
//!
//! Execution of a parsed [`Pipeline`](helix_syntax::syntax::Pipeline) runs
//! through the following stages, each in its own module:
//!
//! - [`expansion`] replaces `$NAME` and `${NAME}` in words with variable
//!   values.
//! - [`search`] locates the executable file for a command name via `$PATH`.
//! - [`redir`] opens redirection targets and computes the final standard
//!   descriptors.
//! - [`pipeline`] allocates pipes, forks the stages into a common process
//!   group, and enforces the pipe-closure discipline.
//! - [`job_control`] hands the terminal around, waits for foreground jobs,
//!   and turns child status changes into job-table updates.
//! - [`command`] ties the stages together and dispatches built-ins.
//!
//! The entry point is [`command::execute`].

pub mod command;
pub mod expansion;
pub mod job_control;
pub mod pipeline;
pub mod redir;
pub mod search;

#[doc(no_inline)]
pub use command::execute;
