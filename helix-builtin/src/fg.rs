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

//! Fg built-in
//!
//! The **`fg`** built-in resumes a job in the foreground.
//!
//! # Synopsis
//!
//! ```sh
//! fg [job_id]
//! ```
//!
//! # Description
//!
//! The built-in brings the specified job to the foreground: the terminal is
//! given to the job's process group, the group is continued with `SIGCONT`
//! if it was stopped, and the shell waits for the job to finish or stop
//! again. Afterwards the terminal is returned to the shell's own process
//! group.
//!
//! If the job stops again, it stays in the job table and the stop is
//! reported at the next prompt. A finished job is removed from the table.
//!
//! # Operands
//!
//! The operand names a job by number, with or without a leading `%`. If
//! omitted, the current job (the most recently created live job) is
//! resumed.
//!
//! # Errors
//!
//! It is an error if the operand names no job or the job table is empty.
//!
//! # Exit status
//!
//! The exit status of the resumed job; non-zero on error.

use crate::common::{find_job, output, report_failure};
use crate::Result;
use helix_env::job::{Pid, Signal};
use helix_env::semantics::{Divert, ExitStatus};
use helix_env::Env;
use helix_semantics::job_control;
use std::ops::ControlFlow::Break;

/// Entry point of the `fg` built-in
pub fn main(env: &mut Env, args: Vec<String>) -> Result {
    let index = match find_job(env, &args, "fg") {
        Ok(index) => index,
        Err(result) => return result,
    };

    if !env.jobs.get(index).unwrap().state().is_alive() {
        let name = env.jobs.get(index).unwrap().name.clone();
        return report_failure(env, "fg", format_args!("job has terminated: {name}"));
    }

    // Take the job out of the table while we drive it; a stopped job is put
    // back below. Removing last keeps the number free for re-adding.
    let mut job = env.jobs.remove(index).unwrap();
    let was_stopped = job.state().is_stopped();

    let announce = output(env, "fg", &format!("{}\n", job.name));
    if announce != Result::default() {
        env.jobs.add(job);
        return announce;
    }

    if let Err(errno) = job_control::give_terminal_to(env, job.pgid) {
        env.jobs.add(job);
        return report_failure(env, "fg", format_args!("cannot use the terminal: {errno}"));
    }

    if was_stopped {
        let group = Pid::from_raw(-job.pgid.as_raw());
        if let Err(errno) = env.system.kill(group, Some(Signal::SIGCONT)) {
            _ = job_control::take_terminal_back(env);
            env.jobs.add(job);
            return report_failure(env, "fg", format_args!("cannot resume job: {errno}"));
        }
        job.set_running();
    }

    let wait_result = job_control::wait_for_job(env, &mut job);

    if let Err(errno) = job_control::take_terminal_back(env) {
        env.print_error(&format!(
            "helix: cannot take back the terminal: {errno}\n"
        ));
        return Result::with_exit_status_and_divert(
            ExitStatus::ERROR,
            Break(Divert::Exit(Some(ExitStatus::ERROR))),
        );
    }

    if let Err(errno) = wait_result {
        env.jobs.add(job);
        return report_failure(env, "fg", format_args!("cannot await job: {errno}"));
    }

    let exit_status = job.exit_status();
    if job.state().is_stopped() {
        // Announce the stop at the next prompt boundary.
        job.state_reported = false;
        env.jobs.add(job);
    }
    Result::new(exit_status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use helix_env::job::{Job, ProcessState};
    use helix_env::system::r#virtual::{stub_tty, SystemState, VirtualSystem};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn pid(raw: i32) -> Pid {
        Pid::from_raw(raw)
    }

    fn interactive_env() -> (Env, Rc<RefCell<SystemState>>) {
        let system = VirtualSystem::new();
        let state = system.state.clone();
        stub_tty(&state);
        let mut env = Env::with_system(Box::new(system));
        env.is_interactive = true;
        (env, state)
    }

    fn add_stopped_job(env: &mut Env, pgid: i32, name: &str) -> usize {
        let index = env
            .jobs
            .add(Job::new(pid(pgid), [pid(pgid)], name.to_string()));
        env.jobs
            .get_mut(index)
            .unwrap()
            .update(pid(pgid), ProcessState::Stopped(Signal::SIGTSTP));
        index
    }

    #[test]
    fn resumes_a_stopped_job_and_waits_for_it() {
        let (mut env, state) = interactive_env();
        add_stopped_job(&mut env, 100, "vi notes");
        state
            .borrow_mut()
            .wait_results
            .push_back((pid(100), ProcessState::Exited(ExitStatus(5))));

        let result = main(&mut env, vec![]);
        assert_eq!(result.exit_status(), ExitStatus(5));
        assert!(env.jobs.is_empty());

        let state = state.borrow();
        // Continue signal went to the whole group.
        assert_eq!(state.kill_calls, [(pid(-100), Some(Signal::SIGCONT))]);
        // Terminal went to the job, then back to the shell.
        let shell_pgid = state.pgid;
        assert_eq!(state.tcsetpgrp_calls, [(0, pid(100)), (0, shell_pgid)]);
        assert_eq!(state.stdout(), "vi notes\n");
    }

    #[test]
    fn job_stopping_again_stays_in_the_table() {
        let (mut env, state) = interactive_env();
        add_stopped_job(&mut env, 100, "vi notes");
        state
            .borrow_mut()
            .wait_results
            .push_back((pid(100), ProcessState::Stopped(Signal::SIGTSTP)));

        let result = main(&mut env, vec![]);
        assert_eq!(result.exit_status(), ExitStatus(128 + Signal::SIGTSTP as i32));
        assert_eq!(env.jobs.len(), 1);
        let (_, job) = env.jobs.iter().next().unwrap();
        assert!(!job.state_reported);
    }

    #[test]
    fn running_job_is_not_sent_sigcont() {
        let (mut env, state) = interactive_env();
        env.jobs
            .add(Job::new(pid(100), [pid(100)], "sleep 9 &".to_string()));
        state
            .borrow_mut()
            .wait_results
            .push_back((pid(100), ProcessState::Exited(ExitStatus::SUCCESS)));

        let result = main(&mut env, vec!["%1".to_string()]);
        assert_eq!(result.exit_status(), ExitStatus::SUCCESS);
        assert_eq!(state.borrow().kill_calls, []);
    }

    #[test]
    fn missing_job_is_an_error() {
        let (mut env, state) = interactive_env();
        let result = main(&mut env, vec![]);
        assert_eq!(result.exit_status(), ExitStatus::FAILURE);
        assert_eq!(state.borrow().stderr(), "helix: fg: no current job\n");
    }
}
