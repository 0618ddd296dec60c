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

//! Job management.
//!
//! A [`Job`] represents one process group executing a pipeline. Jobs are
//! owned by the [`JobList`], which assigns each job a number (the slab index
//! plus one). A job number is freed only when the job is removed, which
//! happens after the user has been notified of its completion, so numbers
//! are never reused for jobs the user has not yet seen finish.
//!
//! Job states are updated from two contexts: the signal router drains child
//! status changes at prompt boundaries, and the `fg`/`bg` built-ins update
//! states synchronously. Both go through [`JobList::update_process`].

use crate::semantics::ExitStatus;
use slab::Slab;
use std::ffi::c_int;
use std::fmt;

#[doc(no_inline)]
pub use nix::sys::signal::Signal;
#[doc(no_inline)]
pub use nix::unistd::Pid;

/// State of one process, as reported by `waitpid`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProcessState {
    /// The process is running (or has been continued).
    Running,
    /// The process has been stopped by a signal.
    Stopped(Signal),
    /// The process has exited with an exit status.
    Exited(ExitStatus),
    /// The process has been terminated by a signal.
    Signaled(Signal),
}

impl ProcessState {
    /// Whether the process still exists (running or stopped).
    #[must_use]
    pub fn is_alive(&self) -> bool {
        matches!(self, ProcessState::Running | ProcessState::Stopped(_))
    }

    /// Whether the process is stopped.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        matches!(self, ProcessState::Stopped(_))
    }
}

/// Converts a process state to the exit status the shell reports for it.
///
/// A signal-terminated or signal-stopped process yields 128 plus the signal
/// number.
impl From<ProcessState> for ExitStatus {
    fn from(state: ProcessState) -> ExitStatus {
        match state {
            ProcessState::Running => ExitStatus::SUCCESS,
            ProcessState::Exited(exit_status) => exit_status,
            ProcessState::Stopped(signal) | ProcessState::Signaled(signal) => {
                ExitStatus(0x80 + signal as c_int)
            }
        }
    }
}

/// Formats a process state into the word shown in job reports.
///
/// - `Running` for a live process
/// - `Stopped(SIG…)` for a stopped process
/// - `Done` for a process that exited with status 0, `Done(…)` otherwise
/// - `Terminated(SIG…)` for a signal-terminated process
impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessState::Running => "Running".fmt(f),
            ProcessState::Stopped(signal) => write!(f, "Stopped({})", signal.as_str()),
            ProcessState::Exited(ExitStatus::SUCCESS) => "Done".fmt(f),
            ProcessState::Exited(exit_status) => write!(f, "Done({exit_status})"),
            ProcessState::Signaled(signal) => write!(f, "Terminated({})", signal.as_str()),
        }
    }
}

/// Set of processes executing one pipeline.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Job {
    /// Process group ID shared by all member processes
    pub pgid: Pid,

    /// Member processes and their last observed states, in pipeline order
    members: Vec<(Pid, ProcessState)>,

    /// String representation of the pipeline, for display
    pub name: String,

    /// Whether the current state has been reported to the user
    ///
    /// The reporter at the prompt boundary prints jobs whose state changed
    /// since the last report and sets this flag; state updates that change
    /// the aggregate state clear it.
    pub state_reported: bool,

    /// Creation order, assigned by the [`JobList`]
    seq: u64,
}

impl Job {
    /// Creates a job whose members are all running.
    ///
    /// The first PID is conventionally the process group leader.
    pub fn new<I: IntoIterator<Item = Pid>>(pgid: Pid, pids: I, name: String) -> Self {
        Job {
            pgid,
            members: pids
                .into_iter()
                .map(|pid| (pid, ProcessState::Running))
                .collect(),
            name,
            state_reported: false,
            seq: 0,
        }
    }

    /// Returns the member process IDs in pipeline order.
    pub fn pids(&self) -> impl Iterator<Item = Pid> + '_ {
        self.members.iter().map(|&(pid, _)| pid)
    }

    /// Records a state change of a member process.
    ///
    /// Returns false if the PID is not a member of this job. If the update
    /// changes the [aggregate state](Self::state), the `state_reported` flag
    /// is cleared so the change is reported at the next prompt boundary.
    pub fn update(&mut self, pid: Pid, state: ProcessState) -> bool {
        let before = self.state();
        let Some(member) = self.members.iter_mut().find(|(p, _)| *p == pid) else {
            return false;
        };
        member.1 = state;
        if self.state() != before {
            self.state_reported = false;
        }
        true
    }

    /// Marks every live member as running.
    ///
    /// Used when the job is continued with `SIGCONT`.
    pub fn set_running(&mut self) {
        for (_, state) in &mut self.members {
            if state.is_stopped() {
                *state = ProcessState::Running;
            }
        }
    }

    /// Aggregate state of the job.
    ///
    /// The job is `Running` while any member runs, `Stopped` when no member
    /// runs but some member is stopped, and otherwise takes the state of the
    /// last member, whose exit status is the exit status of the pipeline.
    #[must_use]
    pub fn state(&self) -> ProcessState {
        let mut stopped = None;
        for &(_, state) in &self.members {
            match state {
                ProcessState::Running => return ProcessState::Running,
                ProcessState::Stopped(signal) => stopped = stopped.or(Some(signal)),
                _ => {}
            }
        }
        if let Some(signal) = stopped {
            return ProcessState::Stopped(signal);
        }
        let last = self.members.last();
        last.map_or(ProcessState::Exited(ExitStatus::SUCCESS), |&(_, state)| {
            state
        })
    }

    /// Exit status of the pipeline: that of the last member.
    #[must_use]
    pub fn exit_status(&self) -> ExitStatus {
        self.members
            .last()
            .map_or(ExitStatus::SUCCESS, |&(_, state)| state.into())
    }
}

/// Collection of jobs.
///
/// Jobs are stored in a slab; the job number presented to the user is the
/// slab index plus one. Removing a job frees its number for reuse.
#[derive(Clone, Debug, Default)]
pub struct JobList {
    jobs: Slab<Job>,
    next_seq: u64,
}

impl JobList {
    /// Creates an empty job list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a job and returns its index.
    ///
    /// The job number is the returned index plus one.
    pub fn add(&mut self, mut job: Job) -> usize {
        job.seq = self.next_seq;
        self.next_seq += 1;
        self.jobs.insert(job)
    }

    /// Returns the job at the index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Job> {
        self.jobs.get(index)
    }

    /// Returns the job at the index, mutably.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Job> {
        self.jobs.get_mut(index)
    }

    /// Removes and returns the job at the index, freeing its number.
    pub fn remove(&mut self, index: usize) -> Option<Job> {
        self.jobs.try_remove(index)
    }

    /// Number of jobs in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether the list contains no jobs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Iterates over `(index, job)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Job)> {
        self.jobs.iter()
    }

    /// Iterates over `(index, job)` pairs, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut Job)> {
        self.jobs.iter_mut()
    }

    /// Records a state change of a process, whichever job it belongs to.
    ///
    /// Returns the index of the updated job, or `None` if no job contains the
    /// PID (e.g. a foreground process that was never entered into the list).
    pub fn update_process(&mut self, pid: Pid, state: ProcessState) -> Option<usize> {
        for (index, job) in self.jobs.iter_mut() {
            if job.update(pid, state) {
                return Some(index);
            }
        }
        None
    }

    /// Returns the index of the default job for `fg` and `bg`.
    ///
    /// The default is the most recently created job that is still alive.
    #[must_use]
    pub fn current_job(&self) -> Option<usize> {
        self.jobs
            .iter()
            .filter(|(_, job)| job.state().is_alive())
            .max_by_key(|(_, job)| job.seq)
            .map(|(index, _)| index)
    }
}

/// Wrapper for formatting a job report line.
///
/// The report consists of the job number, the state, and the job name:
///
/// ```
/// use helix_env::job::{Job, Pid, Report};
/// let job = Job::new(Pid::from_raw(123), [Pid::from_raw(123)], "sleep 10".to_string());
/// let report = Report { index: 1, job: &job };
/// assert_eq!(report.to_string(), "[2] Running      sleep 10");
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Report<'a> {
    /// Index of the job in its [`JobList`] (the job number minus one)
    pub index: usize,
    /// Job to be reported
    pub job: &'a Job,
}

impl Report<'_> {
    /// Job number, the index plus one.
    #[must_use]
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.job.state().to_string();
        write!(f, "[{}] {:<12} {}", self.number(), state, self.job.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(raw: i32) -> Pid {
        Pid::from_raw(raw)
    }

    #[test]
    fn job_aggregate_state_prefers_running() {
        let mut job = Job::new(pid(10), [pid(10), pid(11)], "a | b".to_string());
        assert_eq!(job.state(), ProcessState::Running);

        assert!(job.update(pid(10), ProcessState::Exited(ExitStatus(1))));
        assert_eq!(job.state(), ProcessState::Running);

        assert!(job.update(pid(11), ProcessState::Stopped(Signal::SIGTSTP)));
        assert_eq!(job.state(), ProcessState::Stopped(Signal::SIGTSTP));

        assert!(job.update(pid(11), ProcessState::Exited(ExitStatus::SUCCESS)));
        assert_eq!(job.state(), ProcessState::Exited(ExitStatus::SUCCESS));
    }

    #[test]
    fn job_exit_status_is_that_of_the_last_member() {
        let mut job = Job::new(pid(10), [pid(10), pid(11)], "a | b".to_string());
        job.update(pid(10), ProcessState::Signaled(Signal::SIGKILL));
        job.update(pid(11), ProcessState::Exited(ExitStatus(3)));
        assert_eq!(job.exit_status(), ExitStatus(3));
    }

    #[test]
    fn signal_termination_maps_to_128_plus_signal() {
        let state = ProcessState::Signaled(Signal::SIGINT);
        assert_eq!(ExitStatus::from(state), ExitStatus(130));
    }

    #[test]
    fn update_from_unrelated_pid_is_rejected() {
        let mut job = Job::new(pid(10), [pid(10)], "sleep 1".to_string());
        assert!(!job.update(pid(99), ProcessState::Running));
    }

    #[test]
    fn state_change_clears_the_reported_flag() {
        let mut job = Job::new(pid(10), [pid(10)], "sleep 1".to_string());
        job.state_reported = true;

        // Not a state change: still running.
        job.update(pid(10), ProcessState::Running);
        assert!(job.state_reported);

        job.update(pid(10), ProcessState::Exited(ExitStatus::SUCCESS));
        assert!(!job.state_reported);
    }

    #[test]
    fn job_numbers_are_dense_and_freed_on_removal() {
        let mut jobs = JobList::new();
        let first = jobs.add(Job::new(pid(10), [pid(10)], "one".to_string()));
        let second = jobs.add(Job::new(pid(20), [pid(20)], "two".to_string()));
        assert_eq!((first, second), (0, 1));

        jobs.remove(first);
        let third = jobs.add(Job::new(pid(30), [pid(30)], "three".to_string()));
        assert_eq!(third, 0);
        assert_eq!(jobs.get(third).unwrap().name, "three");
    }

    #[test]
    fn update_process_finds_the_owning_job() {
        let mut jobs = JobList::new();
        let first = jobs.add(Job::new(pid(10), [pid(10), pid(11)], "a | b".to_string()));
        let _second = jobs.add(Job::new(pid(20), [pid(20)], "c".to_string()));

        let updated = jobs.update_process(pid(11), ProcessState::Exited(ExitStatus(7)));
        assert_eq!(updated, Some(first));
        assert_eq!(
            jobs.update_process(pid(99), ProcessState::Running),
            None
        );
    }

    #[test]
    fn current_job_is_the_latest_live_job() {
        let mut jobs = JobList::new();
        let first = jobs.add(Job::new(pid(10), [pid(10)], "one".to_string()));
        let second = jobs.add(Job::new(pid(20), [pid(20)], "two".to_string()));
        assert_eq!(jobs.current_job(), Some(second));

        jobs.get_mut(second)
            .unwrap()
            .update(pid(20), ProcessState::Exited(ExitStatus::SUCCESS));
        assert_eq!(jobs.current_job(), Some(first));

        jobs.get_mut(first)
            .unwrap()
            .update(pid(10), ProcessState::Signaled(Signal::SIGTERM));
        assert_eq!(jobs.current_job(), None);
    }

    #[test]
    fn report_formatting() {
        let mut job = Job::new(pid(42), [pid(42)], "cat big | wc -l".to_string());
        job.update(pid(42), ProcessState::Signaled(Signal::SIGKILL));
        let report = Report { index: 0, job: &job };
        assert_eq!(
            report.to_string(),
            "[1] Terminated(SIGKILL) cat big | wc -l"
        );
    }
}
