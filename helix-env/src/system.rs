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

//! API to the system-managed parts of the environment.
//!
//! This module defines the [`System`] trait, the interface through which the
//! shell interacts with the underlying operating system. There are two
//! implementors:
//!
//! - [`RealSystem`](real::RealSystem) performs the actual system calls.
//! - [`VirtualSystem`](r#virtual::VirtualSystem) simulates system behavior in
//!   memory for testing.

pub mod real;
pub mod r#virtual;

use crate::io::Fd;
use crate::job::{Pid, ProcessState, Signal};
use crate::semantics::ExitStatus;
use std::convert::Infallible;
use std::ffi::{CStr, CString, OsString};
use std::fmt::Debug;
use std::path::PathBuf;

#[doc(no_inline)]
pub use nix::errno::Errno;
#[doc(no_inline)]
pub use nix::fcntl::OFlag;
#[doc(no_inline)]
pub use nix::sys::stat::Mode;
#[doc(no_inline)]
pub use nix::sys::wait::WaitPidFlag;
#[doc(no_inline)]
pub use nix::unistd::ForkResult;

/// Result of a system call, failing with an error number.
pub type Result<T> = std::result::Result<T, Errno>;

/// How a signal is handled by the shell process.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Disposition {
    /// The kernel's default action
    #[default]
    Default,
    /// The signal is ignored
    Ignore,
    /// The signal is recorded by the [signal catcher](crate::signal)
    Catch,
}

/// Interface to the underlying operating system.
///
/// All methods are synchronous; the shell is a single-threaded blocking
/// program. Errors carry the raw [`Errno`].
pub trait System: Debug {
    /// Whether the path names a regular file executable by this process.
    fn is_executable_file(&self, path: &CStr) -> bool;

    /// Whether the path names a regular file.
    fn is_regular_file(&self, path: &CStr) -> bool;

    /// Creates an anonymous pipe, returning `(reader, writer)`.
    fn pipe(&mut self) -> Result<(Fd, Fd)>;

    /// Duplicates a descriptor to a value at least `to_min`, with the
    /// close-on-exec flag set.
    fn dup_cloexec(&mut self, from: Fd, to_min: Fd) -> Result<Fd>;

    /// Duplicates a descriptor onto a specific target descriptor.
    fn dup2(&mut self, from: Fd, to: Fd) -> Result<Fd>;

    /// Closes a descriptor. Closing an already-closed descriptor is not an
    /// error.
    fn close(&mut self, fd: Fd) -> Result<()>;

    /// Opens a file.
    fn open(&mut self, path: &CStr, flags: OFlag, mode: Mode) -> Result<Fd>;

    /// Reads from a descriptor.
    fn read(&mut self, fd: Fd, buffer: &mut [u8]) -> Result<usize>;

    /// Writes to a descriptor.
    fn write(&mut self, fd: Fd, buffer: &[u8]) -> Result<usize>;

    /// Writes the whole buffer to a descriptor.
    fn write_all(&mut self, fd: Fd, mut buffer: &[u8]) -> Result<()> {
        while !buffer.is_empty() {
            let count = self.write(fd, buffer)?;
            buffer = &buffer[count..];
        }
        Ok(())
    }

    /// Whether the descriptor refers to a terminal device.
    fn isatty(&self, fd: Fd) -> bool;

    /// Returns the current working directory.
    fn getcwd(&self) -> Result<PathBuf>;

    /// Changes the current working directory.
    fn chdir(&mut self, path: &CStr) -> Result<()>;

    /// Returns the process ID of this process.
    fn getpid(&self) -> Pid;

    /// Returns the process group ID of this process.
    fn getpgrp(&self) -> Pid;

    /// Moves a process into a process group.
    fn setpgid(&mut self, pid: Pid, pgid: Pid) -> Result<()>;

    /// Returns the foreground process group of the terminal.
    fn tcgetpgrp(&self, fd: Fd) -> Result<Pid>;

    /// Makes a process group the foreground process group of the terminal.
    fn tcsetpgrp(&mut self, fd: Fd, pgid: Pid) -> Result<()>;

    /// Sends a signal. A negative `target` addresses a process group; `None`
    /// for the signal performs error checking only.
    fn kill(&mut self, target: Pid, signal: Option<Signal>) -> Result<()>;

    /// Creates a child process.
    ///
    /// # Safety
    ///
    /// In a multi-threaded program, the child may only call
    /// async-signal-safe functions until it execs. The shell is
    /// single-threaded, but the caller must still ensure the child path
    /// either execs or exits.
    unsafe fn fork(&mut self) -> Result<ForkResult>;

    /// Replaces the current process image.
    fn execve(&mut self, path: &CStr, args: &[CString], envs: &[CString]) -> Result<Infallible>;

    /// Terminates the current process.
    fn exit(&mut self, exit_status: ExitStatus) -> !;

    /// Waits for a child process to change state.
    ///
    /// `target` follows the `waitpid` convention: a positive value names one
    /// process, a negative value names a process group, and `-1` means any
    /// child. Returns `None` when `WNOHANG` was given and no child has
    /// changed state.
    fn waitpid(&mut self, target: Pid, options: WaitPidFlag)
        -> Result<Option<(Pid, ProcessState)>>;

    /// Sets the disposition of a signal, returning the previous one.
    fn sigaction(&mut self, signal: Signal, disposition: Disposition) -> Result<Disposition>;

    /// Returns the host name.
    fn gethostname(&self) -> Result<OsString>;
}
