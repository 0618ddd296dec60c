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

//! Bg built-in
//!
//! The **`bg`** built-in resumes a suspended job in the background.
//!
//! # Synopsis
//!
//! ```sh
//! bg [job_id]
//! ```
//!
//! # Description
//!
//! The built-in resumes the specified job by sending `SIGCONT` to its
//! process group, prints `[number] name` to the standard output, and
//! returns without waiting. The job's state becomes Running.
//!
//! # Operands
//!
//! The operand names a job by number, with or without a leading `%`. If
//! omitted, the current job is resumed.
//!
//! # Errors
//!
//! It is an error if the operand names no job or the job has already
//! terminated.
//!
//! # Exit status
//!
//! Zero unless an error occurs.
//!
//! # Implementation notes
//!
//! The signal is sent even to a job that is already running; resuming a
//! running job is harmless. It is not sent to a terminated job, so an
//! unrelated process that happens to reuse the process group ID cannot be
//! signaled by mistake.

use crate::common::{find_job, output, report_failure};
use crate::Result;
use helix_env::job::{Pid, Signal};
use helix_env::Env;

/// Entry point of the `bg` built-in
pub fn main(env: &mut Env, args: Vec<String>) -> Result {
    let index = match find_job(env, &args, "bg") {
        Ok(index) => index,
        Err(result) => return result,
    };

    let job = env.jobs.get(index).unwrap();
    if !job.state().is_alive() {
        let name = job.name.clone();
        return report_failure(env, "bg", format_args!("job has terminated: {name}"));
    }
    let pgid = job.pgid;
    let line = format!("[{}] {}\n", index + 1, job.name);

    let group = Pid::from_raw(-pgid.as_raw());
    if let Err(errno) = env.system.kill(group, Some(Signal::SIGCONT)) {
        return report_failure(env, "bg", format_args!("cannot resume job: {errno}"));
    }

    let job = env.jobs.get_mut(index).unwrap();
    job.set_running();
    // The resumption was announced here; do not repeat it at the prompt.
    job.state_reported = true;

    output(env, "bg", &line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use helix_env::job::{Job, ProcessState};
    use helix_env::semantics::ExitStatus;
    use helix_env::system::r#virtual::VirtualSystem;

    fn pid(raw: i32) -> Pid {
        Pid::from_raw(raw)
    }

    fn env_with_stopped_job() -> (
        Env,
        std::rc::Rc<std::cell::RefCell<helix_env::system::r#virtual::SystemState>>,
        usize,
    ) {
        let system = VirtualSystem::new();
        let state = system.state.clone();
        let mut env = Env::with_system(Box::new(system));
        let index = env
            .jobs
            .add(Job::new(pid(100), [pid(100)], "sleep 100".to_string()));
        env.jobs
            .get_mut(index)
            .unwrap()
            .update(pid(100), ProcessState::Stopped(Signal::SIGTSTP));
        (env, state, index)
    }

    #[test]
    fn sends_sigcont_to_the_group_and_does_not_wait() {
        let (mut env, state, index) = env_with_stopped_job();
        let result = main(&mut env, vec![]);
        assert_eq!(result, Result::default());

        let state = state.borrow();
        assert_eq!(state.kill_calls, [(pid(-100), Some(Signal::SIGCONT))]);
        assert_eq!(state.wait_targets, []);
        assert_eq!(state.stdout(), "[1] sleep 100\n");
        assert_eq!(
            env.jobs.get(index).unwrap().state(),
            ProcessState::Running
        );
    }

    #[test]
    fn resumed_job_is_not_rereported_at_the_prompt() {
        let (mut env, _state, index) = env_with_stopped_job();
        let _ = main(&mut env, vec![]);
        assert!(env.jobs.get(index).unwrap().state_reported);
    }

    #[test]
    fn terminated_job_is_not_signaled() {
        let (mut env, state, index) = env_with_stopped_job();
        env.jobs
            .get_mut(index)
            .unwrap()
            .update(pid(100), ProcessState::Signaled(Signal::SIGKILL));

        let result = main(&mut env, vec!["1".to_string()]);
        assert_eq!(result.exit_status(), ExitStatus::FAILURE);
        assert_eq!(state.borrow().kill_calls, []);
    }

    #[test]
    fn unknown_job_id_is_an_error() {
        let (mut env, state, _index) = env_with_stopped_job();
        let result = main(&mut env, vec!["%9".to_string()]);
        assert_eq!(result.exit_status(), ExitStatus::FAILURE);
        assert!(state.borrow().stderr().contains("%9"));
    }
}
