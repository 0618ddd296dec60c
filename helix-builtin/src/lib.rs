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

//! Implementations of the built-in utilities of the helix shell.
//!
//! Each utility lives in its own module and exposes a `main` function of the
//! [`Main`](helix_env::builtin::Main) signature. The frontend registers the
//! whole set with [`iter`].
//!
//! Built-ins execute in the shell process because their effect mutates shell
//! state; see the dispatch rules in `helix-semantics`. The only exception is
//! a built-in occurring in a multi-stage or background pipeline, which runs
//! in a forked child and thus on a copy of the state.

pub mod bg;
pub mod cd;
pub mod common;
pub mod exit;
pub mod export;
pub mod fg;
pub mod history;
pub mod jobs;
pub mod pwd;

use helix_env::builtin::Builtin;

#[doc(no_inline)]
pub use helix_env::builtin::Result;

/// Iterates the names and definitions of all built-in utilities.
///
/// ```
/// let mut env = helix_env::Env::with_system(Box::new(
///     helix_env::system::r#virtual::VirtualSystem::new(),
/// ));
/// env.builtins.extend(helix_builtin::iter());
/// assert!(env.builtins.contains_key("cd"));
/// ```
pub fn iter() -> impl Iterator<Item = (&'static str, Builtin)> {
    [
        ("bg", Builtin { execute: bg::main }),
        ("cd", Builtin { execute: cd::main }),
        ("exit", Builtin { execute: exit::main }),
        ("export", Builtin { execute: export::main }),
        ("fg", Builtin { execute: fg::main }),
        ("history", Builtin { execute: history::main }),
        ("jobs", Builtin { execute: jobs::main }),
        ("pwd", Builtin { execute: pwd::main }),
    ]
    .into_iter()
}
