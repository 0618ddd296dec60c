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

//! Pwd built-in
//!
//! The **`pwd`** built-in prints the working directory to the standard
//! output, followed by a newline.

use crate::common::{output, report_failure};
use crate::Result;
use helix_env::Env;

/// Entry point of the `pwd` built-in
pub fn main(env: &mut Env, _args: Vec<String>) -> Result {
    match env.system.getcwd() {
        Ok(cwd) => {
            let line = format!("{}\n", cwd.display());
            output(env, "pwd", &line)
        }
        Err(errno) => report_failure(env, "pwd", errno),
    }
}
