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

//! Pipeline orchestration.
//!
//! For a pipeline of N stages the orchestrator opens N−1 anonymous pipes,
//! forks each stage into a common process group (led by the first stage),
//! and closes every pipe end it holds. The closure discipline is carried by
//! [`PipeSet`]: between forks, [`PipeSet::shift`] closes the ends belonging
//! to the previous stage and opens the next pipe; in the child,
//! [`PipeSet::move_to_stdin_stdout`] wires the inherited ends onto the
//! standard descriptors and closes the originals.
//!
//! Invariant: once every stage has been forked (and after the final
//! `shift`), the parent holds none of the pipe descriptors. A violated
//! invariant leaves a write end open in the parent and deadlocks any stage
//! reading to end-of-file.

use crate::command::{run_in_child, ExpandedCommand};
use crate::job_control;
use helix_env::job::{Job, Pid};
use helix_env::semantics::{Divert, ExitStatus};
use helix_env::system::{Errno, ForkResult, Result};
use helix_env::Env;
use helix_env::System;
use helix_env::io::Fd;
use std::ops::ControlFlow::{Break, Continue};

/// Pipe ends connecting the stage being spawned to its neighbors.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PipeSet {
    /// Read end of the pipe from the previous stage
    read_previous: Option<Fd>,
    /// Both ends of the pipe to the next stage
    next: Option<(Fd, Fd)>,
}

impl PipeSet {
    /// Creates a pipe set with no pipes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the pipe set for the next stage.
    ///
    /// Closes the ends that are no longer needed in the parent and opens a
    /// new pipe if there is a next stage.
    pub fn shift(&mut self, system: &mut dyn System, has_next: bool) -> Result<()> {
        if let Some(fd) = self.read_previous {
            _ = system.close(fd);
        }

        if let Some((reader, writer)) = self.next {
            _ = system.close(writer);
            self.read_previous = Some(reader);
        } else {
            self.read_previous = None;
        }

        self.next = None;
        if has_next {
            self.next = Some(system.pipe()?);
        }

        Ok(())
    }

    /// Closes every descriptor still held.
    pub fn close_all(&mut self, system: &mut dyn System) {
        if let Some(fd) = self.read_previous.take() {
            _ = system.close(fd);
        }
        if let Some((reader, writer)) = self.next.take() {
            _ = system.close(reader);
            _ = system.close(writer);
        }
    }

    /// Moves the pipe ends onto the standard descriptors, in the child.
    ///
    /// The read end of the next pipe belongs to the following stage and is
    /// closed; the write end is duplicated onto the standard output and the
    /// read end of the previous pipe onto the standard input, closing the
    /// originals.
    pub fn move_to_stdin_stdout(mut self, system: &mut dyn System) -> Result<()> {
        if let Some((reader, writer)) = self.next {
            debug_assert_ne!(reader, writer);
            debug_assert_ne!(self.read_previous, Some(reader));
            debug_assert_ne!(self.read_previous, Some(writer));

            system.close(reader)?;
            if writer != Fd::STDOUT {
                if self.read_previous == Some(Fd::STDOUT) {
                    self.read_previous = Some(system.dup_cloexec(Fd::STDOUT, Fd(0))?);
                }
                system.dup2(writer, Fd::STDOUT)?;
                system.close(writer)?;
            }
        }
        if let Some(reader) = self.read_previous {
            if reader != Fd::STDIN {
                system.dup2(reader, Fd::STDIN)?;
                system.close(reader)?;
            }
        }
        Ok(())
    }
}

/// Executes a pipeline of already-expanded commands.
///
/// Every stage is forked into a single process group led by the first
/// stage's PID. Both the parent and each child perform the group join, so
/// the group exists before anyone signals it.
///
/// A foreground pipeline owns the terminal until every stage has been reaped
/// or stopped; its exit status (that of the last stage) becomes the
/// environment's. A stopped pipeline is entered into the job table. A
/// background pipeline is entered into the job table immediately and its
/// submission is announced as `[job] pgid`.
pub fn execute_pipeline(
    env: &mut Env,
    commands: &[ExpandedCommand],
    background: bool,
    name: &str,
) -> helix_env::semantics::Result {
    let mut pipes = PipeSet::new();
    let mut pids = Vec::with_capacity(commands.len());
    let mut pgid: Option<Pid> = None;

    for (index, command) in commands.iter().enumerate() {
        let has_next = index + 1 < commands.len();
        if let Err(errno) = pipes.shift(&mut *env.system, has_next) {
            return spawn_failure(env, &mut pipes, "cannot open a pipe", errno);
        }

        // SAFETY: the child path runs run_in_child, which execs or exits.
        match unsafe { env.system.fork() } {
            Err(errno) => {
                return spawn_failure(env, &mut pipes, "cannot fork", errno);
            }
            Ok(ForkResult::Parent { child }) => {
                let pgid = *pgid.get_or_insert(child);
                // The child may have exec'ed already, making this fail with
                // EACCES; the child-side setpgid has won the race then.
                _ = env.system.setpgid(child, pgid);
                pids.push(child);
            }
            Ok(ForkResult::Child) => {
                let pgid = pgid.unwrap_or_else(|| env.system.getpid());
                run_in_child(env, command, pipes, pgid);
            }
        }
    }

    // Close the read end of the last pipe; after this the parent holds no
    // pipe descriptors.
    _ = pipes.shift(&mut *env.system, false);

    let pgid = pids[0];
    let mut job = Job::new(pgid, pids, name.to_string());

    if background {
        // Creating the job counts as reporting its initial Running state;
        // only the next state change is announced at a prompt boundary.
        job.state_reported = true;
        let index = env.jobs.add(job);
        env.print_error(&format!("[{}] {}\n", index + 1, pgid));
        env.exit_status = ExitStatus::SUCCESS;
        return Continue(());
    }

    // If every stage already terminated, the group may be gone and the
    // handoff fails; the job did not need the terminal then.
    _ = job_control::give_terminal_to(env, pgid);

    let wait_result = job_control::wait_for_job(env, &mut job);

    if let Err(errno) = job_control::take_terminal_back(env) {
        // Without the terminal the shell cannot read another line.
        env.print_error(&format!(
            "helix: cannot take back the terminal: {errno}\n"
        ));
        return Break(Divert::Exit(Some(ExitStatus::ERROR)));
    }

    match wait_result {
        Err(errno) => {
            env.print_error(&format!("helix: cannot await the pipeline: {errno}\n"));
            env.exit_status = ExitStatus::FAILURE;
        }
        Ok(()) => {
            env.exit_status = job.exit_status();
            if job.state().is_stopped() {
                // The stop is announced at the next prompt boundary.
                env.jobs.add(job);
            }
        }
    }
    Continue(())
}

fn spawn_failure(
    env: &mut Env,
    pipes: &mut PipeSet,
    what: &str,
    errno: Errno,
) -> helix_env::semantics::Result {
    pipes.close_all(&mut *env.system);
    env.print_error(&format!("helix: {what}: {errno}\n"));
    env.exit_status = ExitStatus::FAILURE;
    Continue(())
}
