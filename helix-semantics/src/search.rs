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

//! Command search.
//!
//! [`search_path`] locates the executable file to run for a command name. If
//! the name contains a slash, it is taken as a path and only checked;
//! otherwise the directories in `$PATH` are tried in order and the first one
//! containing an executable regular file of that name wins. An empty `$PATH`
//! entry names the current directory.
//!
//! The search distinguishes a name that was found but is not executable from
//! one that was not found at all, because the two map to different exit
//! statuses (126 and 127).

use helix_env::semantics::ExitStatus;
use helix_env::variable;
use helix_env::Env;
use std::ffi::{CStr, CString};
use thiserror::Error;

/// Part of the shell execution environment the command search depends on.
pub trait PathEnv {
    /// Accesses the `$PATH` variable in the environment.
    fn path(&self) -> Option<&str>;
    /// Whether there is an executable regular file at the specified path.
    fn is_executable_file(&self, path: &CStr) -> bool;
    /// Whether there is a regular file at the specified path.
    fn is_regular_file(&self, path: &CStr) -> bool;
}

impl PathEnv for Env {
    fn path(&self) -> Option<&str> {
        self.variables.get(variable::PATH)
    }
    fn is_executable_file(&self, path: &CStr) -> bool {
        self.system.is_executable_file(path)
    }
    fn is_regular_file(&self, path: &CStr) -> bool {
        self.system.is_regular_file(path)
    }
}

/// Reason a command name did not resolve to an executable.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum SearchError {
    /// No matching file exists.
    #[error("command not found")]
    NotFound,

    /// A matching file exists but is not executable.
    #[error("permission denied")]
    NotExecutable,
}

impl SearchError {
    /// Exit status a child reports for this error: 127 for a missing
    /// command, 126 for a non-executable one.
    #[must_use]
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            SearchError::NotFound => ExitStatus::NOT_FOUND,
            SearchError::NotExecutable => ExitStatus::NOEXEC,
        }
    }
}

/// Locates the executable file for a command name.
pub fn search_path<E: PathEnv>(env: &E, name: &str) -> Result<CString, SearchError> {
    if name.contains('/') {
        let path = CString::new(name).map_err(|_| SearchError::NotFound)?;
        return if env.is_executable_file(&path) {
            Ok(path)
        } else if env.is_regular_file(&path) {
            Err(SearchError::NotExecutable)
        } else {
            Err(SearchError::NotFound)
        };
    }

    let Some(dirs) = env.path() else {
        return Err(SearchError::NotFound);
    };

    let mut found_non_executable = false;
    for dir in dirs.split(':') {
        let dir = if dir.is_empty() { "." } else { dir };
        let Ok(path) = CString::new(format!("{dir}/{name}")) else {
            continue;
        };
        if env.is_executable_file(&path) {
            return Ok(path);
        }
        if env.is_regular_file(&path) {
            found_non_executable = true;
        }
    }

    if found_non_executable {
        Err(SearchError::NotExecutable)
    } else {
        Err(SearchError::NotFound)
    }
}
