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

//! Jobs built-in
//!
//! The **`jobs`** built-in prints every job as `[number] state command`.
//! Printing a finished job counts as the user's notification, so `Done` and
//! `Terminated` jobs are removed from the table afterwards, freeing their
//! numbers.

use crate::common::output;
use crate::Result;
use helix_env::job::Report;
use helix_env::Env;
use std::fmt::Write as _;

/// Entry point of the `jobs` built-in
pub fn main(env: &mut Env, _args: Vec<String>) -> Result {
    let mut listing = String::new();
    let mut finished = Vec::new();
    for (index, job) in env.jobs.iter_mut() {
        writeln!(listing, "{}", Report { index, job }).unwrap();
        job.state_reported = true;
        if !job.state().is_alive() {
            finished.push(index);
        }
    }
    for index in finished {
        env.jobs.remove(index);
    }

    output(env, "jobs", &listing)
}
