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

//! System simulated in memory.
//!
//! [`VirtualSystem`] implements [`System`] without touching the underlying
//! operating system, so tests can exercise code that spawns processes, opens
//! files, and hands the terminal around, deterministically and without side
//! effects.
//!
//! The simulation is intentionally shallow. File and process behavior is
//! scripted: tests preload [`fork_results`](SystemState::fork_results) and
//! [`wait_results`](SystemState::wait_results) and inspect the recorded
//! calls afterwards. `fork` always returns in the parent; a child path is
//! never simulated, so code that would run in a forked child must be tested
//! through its pure planning core.
//!
//! All clones of a `VirtualSystem` share the same [`SystemState`], which
//! tests keep a reference to:
//!
//! ```
//! use helix_env::system::r#virtual::VirtualSystem;
//! use helix_env::system::System as _;
//!
//! let mut system = VirtualSystem::new();
//! let state = system.state.clone();
//! system.write_all(helix_env::io::Fd::STDOUT, b"hi").unwrap();
//! assert_eq!(state.borrow().stdout(), "hi");
//! ```

use super::{Disposition, Errno, Mode, OFlag, Result, System, WaitPidFlag};
use crate::io::Fd;
use crate::job::{Pid, ProcessState, Signal};
use crate::semantics::ExitStatus;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::convert::Infallible;
use std::ffi::{CStr, CString, OsString};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::io::RawFd;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// State shared by all clones of a [`VirtualSystem`].
#[derive(Clone, Debug)]
pub struct SystemState {
    /// Paths treated as executable regular files
    pub executable_files: HashSet<PathBuf>,
    /// Paths treated as regular but non-executable files
    pub regular_files: HashSet<PathBuf>,
    /// Descriptors that count as terminal devices
    pub ttys: HashSet<RawFd>,
    /// Bytes served to reads, regardless of descriptor
    pub input: VecDeque<u8>,
    /// Bytes written, per descriptor
    pub written: HashMap<RawFd, Vec<u8>>,

    /// Current working directory
    pub cwd: PathBuf,
    /// Error to fail the next `chdir` with
    pub chdir_error: Option<Errno>,
    /// `chdir` targets, in call order
    pub chdir_calls: Vec<PathBuf>,

    /// `open` calls, in order
    pub open_calls: Vec<(PathBuf, OFlag, Mode)>,
    /// Descriptors currently open (created by `pipe`, `open`, or dup)
    pub open_fds: HashSet<RawFd>,
    /// Descriptors that were created by `pipe`
    pub pipe_fds: HashSet<RawFd>,
    /// `dup2` calls `(from, to)`, in order
    pub dup2_calls: Vec<(RawFd, RawFd)>,
    /// `close` calls, in order
    pub closed_fds: Vec<RawFd>,

    /// Process ID reported for the current process
    pub pid: Pid,
    /// Process group ID reported for the current process
    pub pgid: Pid,
    /// PIDs handed out by successive `fork` calls
    pub fork_results: VecDeque<Pid>,
    /// Events served by successive `waitpid` calls
    pub wait_results: VecDeque<(Pid, ProcessState)>,
    /// `waitpid` targets, in call order
    pub wait_targets: Vec<Pid>,
    /// `setpgid` calls `(pid, pgid)`, in order
    pub setpgid_calls: Vec<(Pid, Pid)>,
    /// `kill` calls, in order
    pub kill_calls: Vec<(Pid, Option<Signal>)>,
    /// `execve` calls, in order
    pub exec_calls: Vec<(CString, Vec<CString>, Vec<CString>)>,

    /// Foreground process group of the simulated terminal
    pub foreground: Option<Pid>,
    /// `tcsetpgrp` calls, in order
    pub tcsetpgrp_calls: Vec<(RawFd, Pid)>,

    /// Signal dispositions, keyed by signal number
    pub dispositions: HashMap<i32, Disposition>,

    /// Host name
    pub hostname: OsString,

    next_fd: RawFd,
}

impl Default for SystemState {
    fn default() -> Self {
        SystemState {
            executable_files: HashSet::new(),
            regular_files: HashSet::new(),
            ttys: HashSet::new(),
            input: VecDeque::new(),
            written: HashMap::new(),
            cwd: PathBuf::from("/"),
            chdir_error: None,
            chdir_calls: Vec::new(),
            open_calls: Vec::new(),
            open_fds: HashSet::new(),
            pipe_fds: HashSet::new(),
            dup2_calls: Vec::new(),
            closed_fds: Vec::new(),
            pid: Pid::from_raw(2),
            pgid: Pid::from_raw(2),
            fork_results: VecDeque::new(),
            wait_results: VecDeque::new(),
            wait_targets: Vec::new(),
            setpgid_calls: Vec::new(),
            kill_calls: Vec::new(),
            exec_calls: Vec::new(),
            foreground: None,
            tcsetpgrp_calls: Vec::new(),
            dispositions: HashMap::new(),
            hostname: OsString::from("virtual"),
            next_fd: 3,
        }
    }
}

impl SystemState {
    /// Bytes written to the standard output, as a lossy string.
    #[must_use]
    pub fn stdout(&self) -> String {
        self.stream(Fd::STDOUT)
    }

    /// Bytes written to the standard error, as a lossy string.
    #[must_use]
    pub fn stderr(&self) -> String {
        self.stream(Fd::STDERR)
    }

    fn stream(&self, fd: Fd) -> String {
        let bytes = self.written.get(&fd.0).map_or(&[] as &[u8], Vec::as_slice);
        String::from_utf8_lossy(bytes).into_owned()
    }

    /// Whether any pipe descriptor is still open.
    #[must_use]
    pub fn open_pipe_fds(&self) -> Vec<RawFd> {
        let mut fds: Vec<RawFd> = self.open_fds.intersection(&self.pipe_fds).copied().collect();
        fds.sort_unstable();
        fds
    }

    fn allocate_fd(&mut self) -> Fd {
        let fd = self.next_fd;
        self.next_fd += 1;
        self.open_fds.insert(fd);
        Fd(fd)
    }
}

fn to_path(path: &CStr) -> PathBuf {
    PathBuf::from(std::ffi::OsStr::from_bytes(path.to_bytes()))
}

/// Implementation of `System` backed by an in-memory [`SystemState`].
#[derive(Clone, Debug, Default)]
pub struct VirtualSystem {
    /// State of the simulation, shared among clones
    pub state: Rc<RefCell<SystemState>>,
}

impl VirtualSystem {
    /// Creates a virtual system with a default state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl System for VirtualSystem {
    fn is_executable_file(&self, path: &CStr) -> bool {
        self.state.borrow().executable_files.contains(&to_path(path))
    }

    fn is_regular_file(&self, path: &CStr) -> bool {
        let path = to_path(path);
        let state = self.state.borrow();
        state.regular_files.contains(&path) || state.executable_files.contains(&path)
    }

    fn pipe(&mut self) -> Result<(Fd, Fd)> {
        let mut state = self.state.borrow_mut();
        let reader = state.allocate_fd();
        let writer = state.allocate_fd();
        state.pipe_fds.insert(reader.0);
        state.pipe_fds.insert(writer.0);
        Ok((reader, writer))
    }

    fn dup_cloexec(&mut self, _from: Fd, to_min: Fd) -> Result<Fd> {
        let mut state = self.state.borrow_mut();
        state.next_fd = state.next_fd.max(to_min.0);
        Ok(state.allocate_fd())
    }

    fn dup2(&mut self, from: Fd, to: Fd) -> Result<Fd> {
        let mut state = self.state.borrow_mut();
        state.dup2_calls.push((from.0, to.0));
        state.open_fds.insert(to.0);
        Ok(to)
    }

    fn close(&mut self, fd: Fd) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.open_fds.remove(&fd.0);
        state.closed_fds.push(fd.0);
        Ok(())
    }

    fn open(&mut self, path: &CStr, flags: OFlag, mode: Mode) -> Result<Fd> {
        let mut state = self.state.borrow_mut();
        state.open_calls.push((to_path(path), flags, mode));
        Ok(state.allocate_fd())
    }

    fn read(&mut self, _fd: Fd, buffer: &mut [u8]) -> Result<usize> {
        let mut state = self.state.borrow_mut();
        let mut count = 0;
        for slot in buffer {
            match state.input.pop_front() {
                Some(byte) => {
                    *slot = byte;
                    count += 1;
                }
                None => break,
            }
        }
        Ok(count)
    }

    fn write(&mut self, fd: Fd, buffer: &[u8]) -> Result<usize> {
        let mut state = self.state.borrow_mut();
        state.written.entry(fd.0).or_default().extend_from_slice(buffer);
        Ok(buffer.len())
    }

    fn isatty(&self, fd: Fd) -> bool {
        self.state.borrow().ttys.contains(&fd.0)
    }

    fn getcwd(&self) -> Result<PathBuf> {
        Ok(self.state.borrow().cwd.clone())
    }

    fn chdir(&mut self, path: &CStr) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if let Some(errno) = state.chdir_error.take() {
            return Err(errno);
        }
        let path = to_path(path);
        state.chdir_calls.push(path.clone());
        state.cwd = if path.is_absolute() {
            path
        } else {
            state.cwd.join(path)
        };
        Ok(())
    }

    fn getpid(&self) -> Pid {
        self.state.borrow().pid
    }

    fn getpgrp(&self) -> Pid {
        self.state.borrow().pgid
    }

    fn setpgid(&mut self, pid: Pid, pgid: Pid) -> Result<()> {
        self.state.borrow_mut().setpgid_calls.push((pid, pgid));
        Ok(())
    }

    fn tcgetpgrp(&self, fd: Fd) -> Result<Pid> {
        let state = self.state.borrow();
        if !state.ttys.contains(&fd.0) {
            return Err(Errno::ENOTTY);
        }
        state.foreground.ok_or(Errno::ENOTTY)
    }

    fn tcsetpgrp(&mut self, fd: Fd, pgid: Pid) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if !state.ttys.contains(&fd.0) {
            return Err(Errno::ENOTTY);
        }
        state.tcsetpgrp_calls.push((fd.0, pgid));
        state.foreground = Some(pgid);
        Ok(())
    }

    fn kill(&mut self, target: Pid, signal: Option<Signal>) -> Result<()> {
        self.state.borrow_mut().kill_calls.push((target, signal));
        Ok(())
    }

    /// Pops the next scripted PID and returns in the parent.
    ///
    /// Fails with `ENOSYS` when no more PIDs are scripted, which tests use to
    /// exercise fork-failure paths.
    unsafe fn fork(&mut self) -> Result<super::ForkResult> {
        match self.state.borrow_mut().fork_results.pop_front() {
            Some(child) => Ok(super::ForkResult::Parent { child }),
            None => Err(Errno::ENOSYS),
        }
    }

    /// Records the call and fails with `ENOSYS`; nothing can be executed in
    /// the simulation.
    fn execve(&mut self, path: &CStr, args: &[CString], envs: &[CString]) -> Result<Infallible> {
        self.state
            .borrow_mut()
            .exec_calls
            .push((path.to_owned(), args.to_vec(), envs.to_vec()));
        Err(Errno::ENOSYS)
    }

    /// Panics; no real process exists to terminate.
    fn exit(&mut self, exit_status: ExitStatus) -> ! {
        panic!("exit({exit_status})")
    }

    fn waitpid(
        &mut self,
        target: Pid,
        options: WaitPidFlag,
    ) -> Result<Option<(Pid, ProcessState)>> {
        let mut state = self.state.borrow_mut();
        state.wait_targets.push(target);
        match state.wait_results.pop_front() {
            Some(result) => Ok(Some(result)),
            None if options.contains(WaitPidFlag::WNOHANG) => Ok(None),
            None => Err(Errno::ECHILD),
        }
    }

    fn sigaction(&mut self, signal: Signal, disposition: Disposition) -> Result<Disposition> {
        let previous = self
            .state
            .borrow_mut()
            .dispositions
            .insert(signal as i32, disposition);
        Ok(previous.unwrap_or_default())
    }

    fn gethostname(&self) -> Result<OsString> {
        Ok(self.state.borrow().hostname.clone())
    }
}

/// Marks a path as an executable regular file in the simulation.
pub fn stub_executable<P: AsRef<Path>>(state: &Rc<RefCell<SystemState>>, path: P) {
    state
        .borrow_mut()
        .executable_files
        .insert(path.as_ref().to_owned());
}

/// Marks the standard descriptors as terminal devices.
pub fn stub_tty(state: &Rc<RefCell<SystemState>>) {
    let mut state = state.borrow_mut();
    state.ttys.extend([0, 1, 2]);
    let pgid = state.pgid;
    state.foreground = Some(pgid);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipes_track_open_descriptors() {
        let mut system = VirtualSystem::new();
        let (reader, writer) = system.pipe().unwrap();
        assert_eq!(system.state.borrow().open_pipe_fds(), [reader.0, writer.0]);

        system.close(reader).unwrap();
        system.close(writer).unwrap();
        assert_eq!(system.state.borrow().open_pipe_fds(), []);
    }

    #[test]
    fn scripted_forks_are_served_in_order() {
        use super::super::ForkResult;
        use assert_matches::assert_matches;

        let mut system = VirtualSystem::new();
        system
            .state
            .borrow_mut()
            .fork_results
            .extend([Pid::from_raw(100), Pid::from_raw(101)]);

        let first = unsafe { system.fork() }.unwrap();
        assert_matches!(first, ForkResult::Parent { child } if child == Pid::from_raw(100));
        let _ = unsafe { system.fork() }.unwrap();
        assert_matches!(unsafe { system.fork() }, Err(Errno::ENOSYS));
    }

    #[test]
    fn exhausted_wait_depends_on_nohang() {
        let mut system = VirtualSystem::new();
        let any = Pid::from_raw(-1);
        assert_eq!(system.waitpid(any, WaitPidFlag::WNOHANG), Ok(None));
        assert_eq!(
            system.waitpid(any, WaitPidFlag::empty()),
            Err(Errno::ECHILD)
        );
    }
}
