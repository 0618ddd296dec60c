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

//! Shell variables.
//!
//! The [`VariableSet`] is the authoritative environment of the shell. It is
//! seeded from the process environment at startup and materialized into each
//! child's environment at exec time, so every variable behaves as exported.

use itertools::Itertools as _;
use std::collections::HashMap;
use std::ffi::CString;

/// Name of the variable holding the executable search path
pub const PATH: &str = "PATH";
/// Name of the variable holding the user's home directory
pub const HOME: &str = "HOME";
/// Name of the variable holding the current working directory
pub const PWD: &str = "PWD";
/// Name of the variable holding the previous working directory
pub const OLDPWD: &str = "OLDPWD";
/// Name of the variable holding the user name
pub const USER: &str = "USER";
/// Fallback name of the variable holding the user name
pub const LOGNAME: &str = "LOGNAME";

/// Collection of variables.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct VariableSet {
    variables: HashMap<String, String>,
}

impl VariableSet {
    /// Creates an empty variable set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Imports name-value pairs, typically from `std::env::vars()`.
    pub fn extend_env<I, K, V>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.variables
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    /// Returns the value of a variable.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// Assigns a value to a variable, creating it if necessary.
    pub fn assign<N: Into<String>, V: Into<String>>(&mut self, name: N, value: V) {
        self.variables.insert(name.into(), value.into());
    }

    /// Iterates over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .sorted()
    }

    /// Renders the variables as `NAME=VALUE` C strings for `execve`.
    ///
    /// Entries containing a nul byte cannot be passed to `execve` and are
    /// skipped.
    #[must_use]
    pub fn env_c_strings(&self) -> Vec<CString> {
        self.variables
            .iter()
            .filter_map(|(name, value)| CString::new(format!("{name}={value}")).ok())
            .collect()
    }

    /// Whether the string is a valid variable name
    /// (`[A-Za-z_][A-Za-z0-9_]*`).
    #[must_use]
    pub fn is_valid_name(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
            _ => return false,
        }
        chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}
