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

//! Implementation of `System` that actually interacts with the system.

use super::{Disposition, Errno, Mode, OFlag, Result, System, WaitPidFlag};
use crate::io::Fd;
use crate::job::{Pid, ProcessState, Signal};
use crate::semantics::ExitStatus;
use crate::signal::catch_signal;
use nix::libc::{S_IFMT, S_IFREG};
use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet};
use nix::sys::stat::stat;
use nix::sys::wait::WaitStatus;
use nix::unistd::{self, AccessFlags, ForkResult};
use std::convert::Infallible;
use std::ffi::{c_int, c_uint, CStr, CString, OsString};
use std::path::PathBuf;

trait ErrnoIfM1: PartialEq + Sized {
    const MINUS_1: Self;

    /// Convenience function to convert a result of -1 to an `Errno`.
    ///
    /// This function is intended to be used just after calling a C function
    /// that returns -1 on error and sets `errno` to the error number.
    fn errno_if_m1(self) -> Result<Self> {
        if self == Self::MINUS_1 {
            Err(Errno::last())
        } else {
            Ok(self)
        }
    }
}

impl ErrnoIfM1 for i32 {
    const MINUS_1: Self = -1;
}
impl ErrnoIfM1 for isize {
    const MINUS_1: Self = -1;
}

fn is_executable(path: &CStr) -> bool {
    unistd::access(path, AccessFlags::X_OK).is_ok()
}

fn is_regular_file(path: &CStr) -> bool {
    matches!(stat(path), Ok(stat) if stat.st_mode & S_IFMT == S_IFREG)
}

/// Implementation of `System` that actually interacts with the system.
///
/// `RealSystem` is an empty `struct` because the underlying operating system
/// manages the system's internal state.
#[derive(Debug)]
pub struct RealSystem(());

impl RealSystem {
    /// Returns an instance of `RealSystem`.
    ///
    /// # Safety
    ///
    /// This function is marked `unsafe` because improper use of `RealSystem`
    /// may lead to undefined behavior. Most operations on the system are not
    /// thread-safe, and forking makes the instance shared between processes.
    /// It is your responsibility to use only one instance of `RealSystem` in
    /// a single-threaded process.
    pub unsafe fn new() -> Self {
        RealSystem(())
    }
}

impl System for RealSystem {
    fn is_executable_file(&self, path: &CStr) -> bool {
        is_regular_file(path) && is_executable(path)
    }

    fn is_regular_file(&self, path: &CStr) -> bool {
        is_regular_file(path)
    }

    fn pipe(&mut self) -> Result<(Fd, Fd)> {
        let mut fds = [0 as c_int; 2];
        unsafe { nix::libc::pipe(fds.as_mut_ptr()) }.errno_if_m1()?;
        Ok((Fd(fds[0]), Fd(fds[1])))
    }

    fn dup_cloexec(&mut self, from: Fd, to_min: Fd) -> Result<Fd> {
        unsafe { nix::libc::fcntl(from.0, nix::libc::F_DUPFD_CLOEXEC, to_min.0) }
            .errno_if_m1()
            .map(Fd)
    }

    fn dup2(&mut self, from: Fd, to: Fd) -> Result<Fd> {
        loop {
            match unsafe { nix::libc::dup2(from.0, to.0) }.errno_if_m1() {
                Err(Errno::EINTR) => (),
                result => return result.map(Fd),
            }
        }
    }

    fn close(&mut self, fd: Fd) -> Result<()> {
        match unsafe { nix::libc::close(fd.0) }.errno_if_m1() {
            Err(Errno::EBADF) => Ok(()),
            result => result.map(drop),
        }
    }

    fn open(&mut self, path: &CStr, flags: OFlag, mode: Mode) -> Result<Fd> {
        unsafe { nix::libc::open(path.as_ptr(), flags.bits(), mode.bits() as c_uint) }
            .errno_if_m1()
            .map(Fd)
    }

    fn read(&mut self, fd: Fd, buffer: &mut [u8]) -> Result<usize> {
        loop {
            let count = unsafe {
                nix::libc::read(fd.0, buffer.as_mut_ptr().cast(), buffer.len())
            };
            match count.errno_if_m1() {
                Err(Errno::EINTR) => (),
                result => return result.map(|count| count as usize),
            }
        }
    }

    fn write(&mut self, fd: Fd, buffer: &[u8]) -> Result<usize> {
        loop {
            let count =
                unsafe { nix::libc::write(fd.0, buffer.as_ptr().cast(), buffer.len()) };
            match count.errno_if_m1() {
                Err(Errno::EINTR) => (),
                result => return result.map(|count| count as usize),
            }
        }
    }

    fn isatty(&self, fd: Fd) -> bool {
        (unsafe { nix::libc::isatty(fd.0) }) == 1
    }

    fn getcwd(&self) -> Result<PathBuf> {
        Ok(unistd::getcwd()?)
    }

    fn chdir(&mut self, path: &CStr) -> Result<()> {
        Ok(unistd::chdir(path)?)
    }

    fn getpid(&self) -> Pid {
        unistd::getpid()
    }

    fn getpgrp(&self) -> Pid {
        unistd::getpgrp()
    }

    fn setpgid(&mut self, pid: Pid, pgid: Pid) -> Result<()> {
        Ok(unistd::setpgid(pid, pgid)?)
    }

    fn tcgetpgrp(&self, fd: Fd) -> Result<Pid> {
        unsafe { nix::libc::tcgetpgrp(fd.0) }
            .errno_if_m1()
            .map(Pid::from_raw)
    }

    fn tcsetpgrp(&mut self, fd: Fd, pgid: Pid) -> Result<()> {
        unsafe { nix::libc::tcsetpgrp(fd.0, pgid.as_raw()) }
            .errno_if_m1()
            .map(drop)
    }

    fn kill(&mut self, target: Pid, signal: Option<Signal>) -> Result<()> {
        nix::sys::signal::kill(target, signal)
    }

    /// Creates a child process.
    ///
    /// This implementation calls the `fork` system call and returns in both
    /// the parent and the child.
    unsafe fn fork(&mut self) -> Result<ForkResult> {
        unistd::fork()
    }

    fn execve(&mut self, path: &CStr, args: &[CString], envs: &[CString]) -> Result<Infallible> {
        loop {
            let result = unistd::execve(path, args, envs);
            if result != Err(Errno::EINTR) {
                return result;
            }
        }
    }

    fn exit(&mut self, exit_status: ExitStatus) -> ! {
        std::process::exit(exit_status.0)
    }

    fn waitpid(
        &mut self,
        target: Pid,
        options: WaitPidFlag,
    ) -> Result<Option<(Pid, ProcessState)>> {
        use WaitStatus::*;
        match nix::sys::wait::waitpid(target, Some(options))? {
            StillAlive => Ok(None),
            Exited(pid, exit_status) => {
                Ok(Some((pid, ProcessState::Exited(ExitStatus(exit_status)))))
            }
            Signaled(pid, signal, _core_dump) => Ok(Some((pid, ProcessState::Signaled(signal)))),
            Stopped(pid, signal) => Ok(Some((pid, ProcessState::Stopped(signal)))),
            Continued(pid) => Ok(Some((pid, ProcessState::Running))),
            #[allow(unreachable_patterns)]
            _ => Ok(None),
        }
    }

    fn sigaction(&mut self, signal: Signal, disposition: Disposition) -> Result<Disposition> {
        let handler = match disposition {
            Disposition::Default => SigHandler::SigDfl,
            Disposition::Ignore => SigHandler::SigIgn,
            Disposition::Catch => SigHandler::Handler(catch_signal),
        };
        let action = SigAction::new(handler, SaFlags::SA_RESTART, SigSet::empty());
        // SAFETY: catch_signal only performs async-signal-safe operations.
        let old_action = unsafe { nix::sys::signal::sigaction(signal, &action) }?;
        Ok(match old_action.handler() {
            SigHandler::SigDfl => Disposition::Default,
            SigHandler::SigIgn => Disposition::Ignore,
            _ => Disposition::Catch,
        })
    }

    fn gethostname(&self) -> Result<OsString> {
        Ok(unistd::gethostname()?)
    }
}
