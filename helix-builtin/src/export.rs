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

//! Export built-in
//!
//! The **`export`** built-in assigns variables.
//!
//! # Synopsis
//!
//! ```sh
//! export [NAME=VALUE…]
//! ```
//!
//! # Description
//!
//! Each operand of the form `NAME=VALUE` assigns a variable. Every helix
//! variable is exported to child processes, so the built-in is effectively
//! an assignment. With no operands, all variables are listed as
//! `export NAME=VALUE` lines in name order.
//!
//! # Errors
//!
//! An operand without a `=` or with an invalid name is an error; remaining
//! operands are still processed.
//!
//! # Exit status
//!
//! Zero unless an error occurs.

use crate::common::{output, report_failure};
use crate::Result;
use helix_env::variable::VariableSet;
use helix_env::Env;
use itertools::Itertools as _;

/// Entry point of the `export` built-in
pub fn main(env: &mut Env, args: Vec<String>) -> Result {
    if args.is_empty() {
        let listing = env
            .variables
            .iter()
            .map(|(name, value)| format!("export {name}={value}\n"))
            .join("");
        return output(env, "export", &listing);
    }

    let mut failure = None;
    for operand in args {
        match operand.split_once('=') {
            Some((name, value)) if VariableSet::is_valid_name(name) => {
                env.variables.assign(name, value);
            }
            _ => {
                failure = Some(report_failure(
                    env,
                    "export",
                    format_args!("{operand}: usage: export NAME=VALUE"),
                ));
            }
        }
    }
    failure.unwrap_or_default()
}
