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

//! File descriptor type

use std::fmt;
use std::os::unix::io::RawFd;

/// File descriptor.
///
/// A thin wrapper around the raw integer value. Ownership is by convention:
/// each descriptor the shell opens belongs to exactly one scope that is
/// responsible for closing it.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Fd(pub RawFd);

impl Fd {
    /// File descriptor for the standard input
    pub const STDIN: Fd = Fd(0);
    /// File descriptor for the standard output
    pub const STDOUT: Fd = Fd(1);
    /// File descriptor for the standard error
    pub const STDERR: Fd = Fd(2);
}

/// Minimum file descriptor the shell uses for descriptors it keeps for
/// internal purposes, such as the saved copies of the standard descriptors
/// while a redirection is applied to a built-in.
///
/// Keeping internal descriptors at or above this value prevents them from
/// colliding with the standard descriptors user commands operate on.
pub const MIN_INTERNAL_FD: Fd = Fd(10);

impl fmt::Display for Fd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
