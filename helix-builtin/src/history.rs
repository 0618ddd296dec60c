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

//! History built-in
//!
//! The **`history`** built-in prints the command history with 1-based,
//! right-aligned indices.

use crate::common::{output, report_failure};
use crate::Result;
use helix_env::Env;
use itertools::Itertools as _;

/// Entry point of the `history` built-in
pub fn main(env: &mut Env, args: Vec<String>) -> Result {
    if !args.is_empty() {
        return report_failure(env, "history", "too many operands");
    }

    let listing = env
        .history
        .iter()
        .enumerate()
        .map(|(index, line)| format!("{:>5}  {line}\n", index + 1))
        .join("");
    output(env, "history", &listing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use helix_env::system::r#virtual::VirtualSystem;

    #[test]
    fn entries_are_numbered_from_one() {
        let system = VirtualSystem::new();
        let state = system.state.clone();
        let mut env = Env::with_system(Box::new(system));
        env.history.push("echo a");
        env.history.push("ls -l | wc");

        let result = main(&mut env, vec![]);
        assert_eq!(result, Result::default());
        assert_eq!(
            state.borrow().stdout(),
            "    1  echo a\n    2  ls -l | wc\n"
        );
    }

    #[test]
    fn empty_history_prints_nothing() {
        let system = VirtualSystem::new();
        let state = system.state.clone();
        let mut env = Env::with_system(Box::new(system));
        let result = main(&mut env, vec![]);
        assert_eq!(result, Result::default());
        assert_eq!(state.borrow().stdout(), "");
    }
}
