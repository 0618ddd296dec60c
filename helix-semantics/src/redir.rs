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

//! Redirection.
//!
//! A [`FileRedir`] describes one file redirection with its expanded target
//! path. Applying a redirection means opening the target with the
//! [flags](FileRedir::flags) of its operator and duplicating the resulting
//! descriptor onto the standard descriptor of the stream.
//!
//! Two application paths exist:
//!
//! - In a forked child, [`apply`] installs the redirections destructively;
//!   the process image is replaced or exits anyway.
//! - In the shell process, a [`RedirGuard`] saves the original descriptors
//!   and restores them when dropped. This is how redirections on a
//!   parent-run built-in (`history > file`) take effect without the shell
//!   losing its own descriptors.
//!
//! File redirections take priority over pipes: they are applied after the
//! pipe ends have been moved onto the standard descriptors, overwriting
//! them.

use helix_env::io::{Fd, MIN_INTERNAL_FD};
use helix_env::system::{Errno, Mode, OFlag};
use helix_env::Env;
use helix_env::System;
use std::ffi::CString;
use std::ops::{Deref, DerefMut};
use thiserror::Error;

/// Permission bits for newly created redirection targets (0644 before umask)
pub const CREATE_MODE: Mode = Mode::from_bits_truncate(0o644);

/// Standard stream a redirection applies to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stream {
    Stdin,
    Stdout,
    Stderr,
}

impl Stream {
    /// Standard descriptor of the stream.
    #[must_use]
    pub fn fd(self) -> Fd {
        match self {
            Stream::Stdin => Fd::STDIN,
            Stream::Stdout => Fd::STDOUT,
            Stream::Stderr => Fd::STDERR,
        }
    }
}

/// One file redirection with its expanded target path.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileRedir {
    /// Stream being redirected
    pub stream: Stream,
    /// Target path, already expanded
    pub path: String,
    /// Whether an output redirection appends instead of truncating
    pub append: bool,
}

impl FileRedir {
    /// Open flags for the redirection operator.
    ///
    /// - `<`: read-only
    /// - `>` and `2>`: write-only, create, truncate
    /// - `>>` and `2>>`: write-only, create, append
    #[must_use]
    pub fn flags(&self) -> OFlag {
        match self.stream {
            Stream::Stdin => OFlag::O_RDONLY,
            Stream::Stdout | Stream::Stderr => {
                let disposition = if self.append {
                    OFlag::O_APPEND
                } else {
                    OFlag::O_TRUNC
                };
                OFlag::O_WRONLY | OFlag::O_CREAT | disposition
            }
        }
    }
}

/// Error opening a redirection target.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("{path}: {errno}")]
pub struct RedirError {
    /// Target path that failed to open
    pub path: String,
    /// Cause of the failure
    pub errno: Errno,
}

/// Opens the target of a redirection.
pub fn open_target(system: &mut dyn System, redir: &FileRedir) -> Result<Fd, RedirError> {
    let path = CString::new(redir.path.as_str()).map_err(|_| RedirError {
        path: redir.path.clone(),
        errno: Errno::EINVAL,
    })?;
    system
        .open(&path, redir.flags(), CREATE_MODE)
        .map_err(|errno| RedirError {
            path: redir.path.clone(),
            errno,
        })
}

/// Installs redirections destructively, for use in a forked child.
///
/// Each target is opened and duplicated onto the standard descriptor of its
/// stream, closing the descriptor previously there (which may be a pipe
/// end).
pub fn apply(system: &mut dyn System, redirs: &[FileRedir]) -> Result<(), RedirError> {
    for redir in redirs {
        let fd = open_target(system, redir)?;
        let target = redir.stream.fd();
        if fd != target {
            system.dup2(fd, target).map_err(|errno| RedirError {
                path: redir.path.clone(),
                errno,
            })?;
            _ = system.close(fd);
        }
    }
    Ok(())
}

/// `Env` wrapper that applies redirections and restores the original
/// descriptors when dropped.
///
/// The guard saves each affected standard descriptor with a close-on-exec
/// duplicate at or above [`MIN_INTERNAL_FD`] before overwriting it.
/// Restoration happens in reverse order of application.
#[derive(Debug)]
#[must_use = "the guard restores the descriptors when dropped"]
pub struct RedirGuard<'e> {
    env: &'e mut Env,
    /// Saved descriptors: `(original slot, saved copy)`
    saved: Vec<(Fd, Fd)>,
}

impl<'e> RedirGuard<'e> {
    /// Creates a guard that has not applied any redirection yet.
    pub fn new(env: &'e mut Env) -> Self {
        RedirGuard {
            env,
            saved: Vec::new(),
        }
    }

    /// Applies redirections to the current process.
    ///
    /// On error, already-applied redirections remain in effect until the
    /// guard is dropped.
    pub fn perform(&mut self, redirs: &[FileRedir]) -> Result<(), RedirError> {
        for redir in redirs {
            let fd = open_target(&mut *self.env.system, redir)?;
            let target = redir.stream.fd();
            let error = |errno| RedirError {
                path: redir.path.clone(),
                errno,
            };
            let result = self
                .env
                .system
                .dup_cloexec(target, MIN_INTERNAL_FD)
                .and_then(|saved| {
                    self.saved.push((target, saved));
                    self.env.system.dup2(fd, target)
                });
            _ = self.env.system.close(fd);
            result.map_err(error)?;
        }
        Ok(())
    }
}

impl Drop for RedirGuard<'_> {
    fn drop(&mut self) {
        while let Some((target, saved)) = self.saved.pop() {
            _ = self.env.system.dup2(saved, target);
            _ = self.env.system.close(saved);
        }
    }
}

impl Deref for RedirGuard<'_> {
    type Target = Env;
    fn deref(&self) -> &Env {
        self.env
    }
}

impl DerefMut for RedirGuard<'_> {
    fn deref_mut(&mut self) -> &mut Env {
        self.env
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helix_env::system::r#virtual::VirtualSystem;

    fn redir(stream: Stream, path: &str, append: bool) -> FileRedir {
        FileRedir {
            stream,
            path: path.to_string(),
            append,
        }
    }

    #[test]
    fn open_flags_per_operator() {
        assert_eq!(
            redir(Stream::Stdin, "f", false).flags(),
            OFlag::O_RDONLY
        );
        assert_eq!(
            redir(Stream::Stdout, "f", false).flags(),
            OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC
        );
        assert_eq!(
            redir(Stream::Stdout, "f", true).flags(),
            OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_APPEND
        );
        assert_eq!(
            redir(Stream::Stderr, "f", false).flags(),
            OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC
        );
        assert_eq!(
            redir(Stream::Stderr, "f", true).flags(),
            OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_APPEND
        );
    }

    #[test]
    fn apply_dups_opened_target_onto_stream_and_closes_it() {
        let mut system = VirtualSystem::new();
        let state = system.state.clone();
        let redirs = [redir(Stream::Stdout, "/tmp/out", false)];
        apply(&mut system, &redirs).unwrap();

        let state = state.borrow();
        assert_eq!(state.open_calls.len(), 1);
        assert_eq!(state.open_calls[0].0, std::path::Path::new("/tmp/out"));
        // The opened descriptor (3) was moved onto stdout and closed.
        assert_eq!(state.dup2_calls, [(3, 1)]);
        assert_eq!(state.closed_fds, [3]);
    }

    #[test]
    fn guard_saves_and_restores_descriptors() {
        let system = VirtualSystem::new();
        let state = system.state.clone();
        let mut env = Env::with_system(Box::new(system));

        {
            let mut guard = RedirGuard::new(&mut env);
            guard
                .perform(&[redir(Stream::Stdout, "/tmp/out", false)])
                .unwrap();
        }

        let state = state.borrow();
        // Applied: target opened as 3, stdout saved at >= MIN_INTERNAL_FD,
        // then 3 moved onto 1; restored: the save moved back onto 1.
        assert_eq!(state.dup2_calls, [(3, 1), (MIN_INTERNAL_FD.0, 1)]);
        // Both the opened target and the save were closed.
        assert_eq!(state.closed_fds, [3, MIN_INTERNAL_FD.0]);
    }

    #[test]
    fn guard_restores_in_reverse_order() {
        let system = VirtualSystem::new();
        let state = system.state.clone();
        let mut env = Env::with_system(Box::new(system));

        {
            let mut guard = RedirGuard::new(&mut env);
            guard
                .perform(&[
                    redir(Stream::Stdout, "/tmp/out", false),
                    redir(Stream::Stderr, "/tmp/err", false),
                ])
                .unwrap();
        }

        let state = state.borrow();
        let restores = &state.dup2_calls[2..];
        assert_eq!(restores.len(), 2);
        // Stderr is restored before stdout.
        assert_eq!(restores[0].1, 2);
        assert_eq!(restores[1].1, 1);
    }

    #[test]
    fn target_with_nul_byte_fails_cleanly() {
        let mut system = VirtualSystem::new();
        let result = open_target(&mut system, &redir(Stream::Stdin, "a\0b", false));
        assert_eq!(
            result,
            Err(RedirError {
                path: "a\0b".to_string(),
                errno: Errno::EINVAL,
            })
        );
    }
}
