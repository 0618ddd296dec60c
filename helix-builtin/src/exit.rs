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

//! Exit built-in
//!
//! The **`exit`** built-in causes the shell to exit.
//!
//! # Synopsis
//!
//! ```sh
//! exit [exit_status]
//! ```
//!
//! # Description
//!
//! The shell exits with the operand as its exit status, or with the current
//! exit status (`$?`) when no operand is given.
//!
//! # Errors
//!
//! A non-numeric operand or more than one operand is an error: a message is
//! printed and the shell does **not** exit.
//!
//! # Exit status
//!
//! The operand, the current exit status, or 1 on a usage error.

use crate::common::report_failure;
use crate::Result;
use helix_env::semantics::{Divert, ExitStatus};
use helix_env::Env;
use std::ops::ControlFlow::Break;

/// Entry point of the `exit` built-in
pub fn main(env: &mut Env, args: Vec<String>) -> Result {
    match args.as_slice() {
        // Keep the current exit status; the shell exits with it.
        [] => Result::with_exit_status_and_divert(env.exit_status, Break(Divert::Exit(None))),
        [operand] => match operand.parse() {
            Ok(exit_status) => Result::exit(Some(ExitStatus(exit_status))),
            Err(_) => report_failure(
                env,
                "exit",
                format_args!("{operand}: numeric argument required"),
            ),
        },
        _ => report_failure(env, "exit", "too many operands"),
    }
}
