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

//! Terminal ownership and job state tracking.
//!
//! Every pipeline runs in its own process group whose leader is the first
//! stage. For a foreground pipeline the shell hands the terminal to that
//! group before the first blocking wait and takes it back once every stage
//! has been reaped or stopped. Signals addressed to a job always go to the
//! process group, never to individual processes, so that all stages are
//! affected atomically.
//!
//! The shell itself stays in its original process group. While a foreground
//! job owns the terminal, terminal-generated signals reach the job and not
//! the shell, so the interactive shell additionally ignores the job-control
//! signals (see [`JOB_CONTROL_SIGNALS`]) and restores the default
//! dispositions in every child before exec.
//!
//! Child status is observed in two ways: a blocking `waitpid` on the process
//! group while a foreground job runs ([`wait_for_job`]), and a non-blocking
//! sweep at every prompt boundary ([`notify_job_changes`]) that turns
//! queued `SIGCHLD` notifications into job-table updates and user-visible
//! reports.

use helix_env::io::Fd;
use helix_env::job::{Job, Pid, ProcessState, Report, Signal};
use helix_env::signal::take_caught_signals;
use helix_env::system::{Errno, Result, WaitPidFlag};
use helix_env::Env;

/// Signals an interactive shell ignores and a spawned child resets.
pub const JOB_CONTROL_SIGNALS: [Signal; 5] = [
    Signal::SIGINT,
    Signal::SIGQUIT,
    Signal::SIGTSTP,
    Signal::SIGTTIN,
    Signal::SIGTTOU,
];

/// Descriptor of the controlling terminal.
///
/// The shell performs all terminal-ownership operations on its standard
/// input.
pub const TERMINAL: Fd = Fd::STDIN;

/// Makes a process group the foreground group of the terminal.
///
/// Does nothing when the shell is not interactive.
pub fn give_terminal_to(env: &mut Env, pgid: Pid) -> Result<()> {
    if !env.is_interactive {
        return Ok(());
    }
    env.system.tcsetpgrp(TERMINAL, pgid)
}

/// Returns the terminal to the shell's own process group.
///
/// This must succeed after every foreground job; a shell that cannot
/// reacquire the terminal cannot read further input.
pub fn take_terminal_back(env: &mut Env) -> Result<()> {
    if !env.is_interactive {
        return Ok(());
    }
    let pgid = env.system.getpgrp();
    env.system.tcsetpgrp(TERMINAL, pgid)
}

/// Waits until every process of the job has stopped or terminated.
///
/// The wait addresses the job's process group. The job's members are
/// updated with the reported states; the caller reads the result off
/// [`Job::state`] and [`Job::exit_status`].
pub fn wait_for_job(env: &mut Env, job: &mut Job) -> Result<()> {
    let target = Pid::from_raw(-job.pgid.as_raw());
    while job.state() == ProcessState::Running {
        match env.system.waitpid(target, WaitPidFlag::WUNTRACED) {
            Ok(Some((pid, state))) => {
                job.update(pid, state);
            }
            Ok(None) => {}
            // No waitable children left: whatever we have not observed is
            // gone. Do not spin.
            Err(Errno::ECHILD) => break,
            Err(errno) => return Err(errno),
        }
    }
    Ok(())
}

/// Turns pending child status changes into job updates and reports them.
///
/// This is the prompt-boundary half of the signal router: the `SIGCHLD`
/// handler only queues a flag, and this function drains the queue with a
/// non-blocking `waitpid` loop, updates the job table, prints one report per
/// job whose state changed, and removes jobs the user has now seen finish.
///
/// Status changes of processes that belong to no job (e.g. an already
/// abandoned pipeline) are discarded.
pub fn notify_job_changes(env: &mut Env) {
    // Drain the signal slots; the wait loop below observes everything the
    // queued signals would tell us.
    let _ = take_caught_signals();

    let options = WaitPidFlag::WNOHANG | WaitPidFlag::WUNTRACED | WaitPidFlag::WCONTINUED;
    loop {
        match env.system.waitpid(Pid::from_raw(-1), options) {
            Ok(Some((pid, state))) => {
                let _ = env.jobs.update_process(pid, state);
            }
            Ok(None) | Err(_) => break,
        }
    }

    report_jobs(env);
}

/// Prints a report for every job whose state has not been reported yet, and
/// removes finished jobs from the table.
///
/// A job's number is free for reuse once its completion has been reported
/// here.
pub fn report_jobs(env: &mut Env) {
    let mut lines = String::new();
    let mut finished = Vec::new();
    for (index, job) in env.jobs.iter_mut() {
        let state = job.state();
        if !job.state_reported {
            lines.push_str(&Report { index, job }.to_string());
            lines.push('\n');
            job.state_reported = true;
        }
        if !state.is_alive() {
            finished.push(index);
        }
    }
    for index in finished {
        env.jobs.remove(index);
    }
    if !lines.is_empty() {
        env.print_error(&lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helix_env::semantics::ExitStatus;
    use helix_env::system::r#virtual::{stub_tty, VirtualSystem};

    fn pid(raw: i32) -> Pid {
        Pid::from_raw(raw)
    }

    fn interactive_env(system: VirtualSystem) -> Env {
        stub_tty(&system.state);
        let mut env = Env::with_system(Box::new(system));
        env.is_interactive = true;
        env
    }

    #[test]
    fn terminal_handoff_targets_the_group() {
        let system = VirtualSystem::new();
        let state = system.state.clone();
        let mut env = interactive_env(system);

        give_terminal_to(&mut env, pid(100)).unwrap();
        take_terminal_back(&mut env).unwrap();

        let state = state.borrow();
        let shell_pgid = state.pgid;
        assert_eq!(
            state.tcsetpgrp_calls,
            [(TERMINAL.0, pid(100)), (TERMINAL.0, shell_pgid)]
        );
        assert_eq!(state.foreground, Some(shell_pgid));
    }

    #[test]
    fn non_interactive_shell_leaves_the_terminal_alone() {
        let system = VirtualSystem::new();
        let state = system.state.clone();
        let mut env = Env::with_system(Box::new(system));

        give_terminal_to(&mut env, pid(100)).unwrap();
        take_terminal_back(&mut env).unwrap();
        assert_eq!(state.borrow().tcsetpgrp_calls, []);
    }

    #[test]
    fn wait_for_job_collects_every_member() {
        let system = VirtualSystem::new();
        let state = system.state.clone();
        state.borrow_mut().wait_results.extend([
            (pid(101), ProcessState::Exited(ExitStatus(1))),
            (pid(100), ProcessState::Exited(ExitStatus::SUCCESS)),
            (pid(102), ProcessState::Exited(ExitStatus(7))),
        ]);
        let mut env = Env::with_system(Box::new(system));

        let mut job = Job::new(
            pid(100),
            [pid(100), pid(101), pid(102)],
            "a | b | c".to_string(),
        );
        wait_for_job(&mut env, &mut job).unwrap();

        assert_eq!(job.state(), ProcessState::Exited(ExitStatus(7)));
        assert_eq!(job.exit_status(), ExitStatus(7));
        // The wait addressed the process group.
        assert_eq!(state.borrow().wait_targets, [pid(-100); 3]);
    }

    #[test]
    fn wait_for_job_stops_waiting_when_the_group_stops() {
        let system = VirtualSystem::new();
        system.state.borrow_mut().wait_results.extend([
            (pid(100), ProcessState::Stopped(Signal::SIGTSTP)),
            (pid(101), ProcessState::Stopped(Signal::SIGTSTP)),
        ]);
        let mut env = Env::with_system(Box::new(system));

        let mut job = Job::new(pid(100), [pid(100), pid(101)], "a | b".to_string());
        wait_for_job(&mut env, &mut job).unwrap();
        assert_eq!(job.state(), ProcessState::Stopped(Signal::SIGTSTP));
    }

    #[test]
    fn notify_reports_done_jobs_once_and_reaps_them() {
        let system = VirtualSystem::new();
        let state = system.state.clone();
        state
            .borrow_mut()
            .wait_results
            .push_back((pid(100), ProcessState::Exited(ExitStatus::SUCCESS)));
        let mut env = Env::with_system(Box::new(system));
        let index = env
            .jobs
            .add(Job::new(pid(100), [pid(100)], "sleep 0".to_string()));
        // The submission message has been shown already.
        env.jobs.get_mut(index).unwrap().state_reported = true;

        notify_job_changes(&mut env);

        assert_eq!(
            state.borrow().stderr(),
            "[1] Done         sleep 0\n"
        );
        assert!(env.jobs.is_empty());

        // A second sweep has nothing left to say.
        notify_job_changes(&mut env);
        assert_eq!(
            state.borrow().stderr(),
            "[1] Done         sleep 0\n"
        );
    }

    #[test]
    fn notify_reports_terminated_jobs() {
        let system = VirtualSystem::new();
        let state = system.state.clone();
        state
            .borrow_mut()
            .wait_results
            .push_back((pid(100), ProcessState::Signaled(Signal::SIGKILL)));
        let mut env = Env::with_system(Box::new(system));
        let index = env
            .jobs
            .add(Job::new(pid(100), [pid(100)], "sleep 100".to_string()));
        env.jobs.get_mut(index).unwrap().state_reported = true;

        notify_job_changes(&mut env);
        assert_eq!(
            state.borrow().stderr(),
            "[1] Terminated(SIGKILL) sleep 100\n"
        );
        assert!(env.jobs.is_empty());
    }

    #[test]
    fn running_jobs_are_kept_and_not_rereported() {
        let system = VirtualSystem::new();
        let state = system.state.clone();
        let mut env = Env::with_system(Box::new(system));
        env.jobs
            .add(Job::new(pid(100), [pid(100)], "sleep 100".to_string()));

        // First boundary: announce the running job (state never reported).
        notify_job_changes(&mut env);
        assert_eq!(state.borrow().stderr(), "[1] Running      sleep 100\n");
        assert_eq!(env.jobs.len(), 1);

        notify_job_changes(&mut env);
        assert_eq!(state.borrow().stderr(), "[1] Running      sleep 100\n");
    }

    #[test]
    fn unknown_children_are_discarded() {
        let system = VirtualSystem::new();
        system
            .state
            .borrow_mut()
            .wait_results
            .push_back((pid(999), ProcessState::Exited(ExitStatus::SUCCESS)));
        let mut env = Env::with_system(Box::new(system));
        notify_job_changes(&mut env);
        assert!(env.jobs.is_empty());
    }
}
