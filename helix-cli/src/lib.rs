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

//! Command-line frontend for the helix shell.
//!
//! The entry point is [`main`], used as the `main` function of the `helix`
//! binary. It sets up the execution environment, installs the interactive
//! signal dispositions, and runs the read-eval loop: one pass per command
//! line, with pending job-status notifications delivered at every prompt
//! boundary.

pub mod prompt;
pub mod startup;

use helix_env::input::{FdReader, LineSource};
use helix_env::io::Fd;
use helix_env::job::Signal;
use helix_env::semantics::{Divert, ExitStatus};
use helix_env::system::Disposition;
use helix_env::Env;
use helix_env::RealSystem;
use helix_semantics::job_control;
use helix_syntax::lex::tokenize;
use helix_syntax::parser::parse;
use std::ops::ControlFlow::{Break, Continue};

/// Entry point of the shell.
///
/// Returns the exit status the process should report.
pub fn main() -> ExitStatus {
    // SAFETY: this is the only instance of RealSystem in the whole process.
    let system = unsafe { RealSystem::new() };
    let mut env = Env::with_system(Box::new(system));
    env.variables.extend_env(std::env::vars());
    env.builtins.extend(helix_builtin::iter());

    let invocation = match startup::parse(std::env::args()) {
        Ok(invocation) => invocation,
        Err(error) => {
            env.print_error(&format!("helix: {error}\n{}", startup::USAGE));
            return ExitStatus::ERROR;
        }
    };

    match invocation {
        startup::Invocation::Version => {
            let version = env!("CARGO_PKG_VERSION");
            _ = env.print(&format!("helix {version}\n"));
            ExitStatus::SUCCESS
        }
        startup::Invocation::Help => {
            _ = env.print(startup::USAGE);
            ExitStatus::SUCCESS
        }
        startup::Invocation::Command(line) => {
            init_dispositions(&mut env);
            match process_line(&mut env, &line) {
                Continue(()) => env.exit_status,
                Break(Divert::Exit(exit_status)) => exit_status.unwrap_or(env.exit_status),
            }
        }
        startup::Invocation::Interactive => {
            env.is_interactive = env.system.isatty(Fd::STDIN);
            init_dispositions(&mut env);
            let mut input = FdReader::stdin();
            read_eval_loop(&mut env, &mut input)
        }
    }
}

/// Installs the shell's signal dispositions.
///
/// The interactive shell ignores the terminal-generated job-control signals
/// so that only the foreground job receives them, and catches `SIGCHLD` to
/// learn about child status changes. Children restore the default
/// dispositions before exec.
fn init_dispositions(env: &mut Env) {
    if env.is_interactive {
        for signal in job_control::JOB_CONTROL_SIGNALS {
            _ = env.system.sigaction(signal, Disposition::Ignore);
        }
    }
    _ = env.system.sigaction(Signal::SIGCHLD, Disposition::Catch);
}

/// Runs the read-eval loop until end of input or an `exit`.
///
/// Each tick delivers pending job notifications, renders the prompt, reads
/// one line, and executes it.
pub fn read_eval_loop(env: &mut Env, input: &mut dyn LineSource) -> ExitStatus {
    loop {
        job_control::notify_job_changes(env);

        let prompt = if env.is_interactive {
            prompt::render_for(env)
        } else {
            String::new()
        };

        match input.read_line(env, &prompt) {
            Ok(Some(line)) => match process_line(env, &line) {
                Continue(()) => {}
                Break(Divert::Exit(exit_status)) => {
                    return exit_status.unwrap_or(env.exit_status);
                }
            },
            Ok(None) => return env.exit_status,
            Err(errno) => {
                env.print_error(&format!("helix: cannot read input: {errno}\n"));
                return ExitStatus::ERROR;
            }
        }
    }
}

/// Processes one command line: tokenize, parse, execute.
///
/// Blank lines are a no-op and do not change the exit status. Accepted
/// lines are recorded in the history before execution. A syntax error is
/// reported with exit status 2 and no child is spawned.
pub fn process_line(env: &mut Env, line: &str) -> helix_env::semantics::Result {
    if line.trim().is_empty() {
        return Continue(());
    }
    env.history.push(line);

    match parse(tokenize(line)) {
        Ok(Some(pipeline)) => helix_semantics::execute(env, &pipeline, line.trim()),
        Ok(None) => Continue(()),
        Err(error) => {
            env.print_error(&format!("helix: syntax error: {error}\n"));
            env.exit_status = ExitStatus::ERROR;
            Continue(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helix_env::job::{Job, Pid, ProcessState};
    use helix_env::system::r#virtual::{SystemState, VirtualSystem};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn env() -> (Env, Rc<RefCell<SystemState>>) {
        let system = VirtualSystem::new();
        let state = system.state.clone();
        let mut env = Env::with_system(Box::new(system));
        env.builtins.extend(helix_builtin::iter());
        (env, state)
    }

    #[test]
    fn blank_line_changes_nothing() {
        let (mut env, state) = env();
        env.exit_status = ExitStatus(42);
        assert_eq!(process_line(&mut env, "   \t "), Continue(()));
        assert_eq!(env.exit_status, ExitStatus(42));
        assert!(env.history.is_empty());
        assert_eq!(state.borrow().stderr(), "");
    }

    #[test]
    fn syntax_error_reports_status_2_and_spawns_nothing() {
        let (mut env, state) = env();
        let result = process_line(&mut env, "echo 'unterminated");
        assert_eq!(result, Continue(()));
        assert_eq!(env.exit_status, ExitStatus::ERROR);
        let state = state.borrow();
        assert!(state.stderr().starts_with("helix: syntax error:"));
        // No child was spawned: fork was never called (it would have failed
        // loudly, having no scripted results).
        assert_eq!(state.wait_targets, []);
        assert_eq!(state.setpgid_calls, []);
    }

    #[test]
    fn accepted_lines_are_recorded_in_history() {
        let (mut env, _state) = env();
        let _ = process_line(&mut env, "export A=1");
        let _ = process_line(&mut env, "export");
        let entries: Vec<_> = env.history.iter().collect();
        assert_eq!(entries, ["export A=1", "export"]);
    }

    #[test]
    fn exit_diverts_out_of_the_loop() {
        let (mut env, state) = env();
        state.borrow_mut().input.extend("exit 7\n".bytes());
        let mut input = FdReader::stdin();
        let exit_status = read_eval_loop(&mut env, &mut input);
        assert_eq!(exit_status, ExitStatus(7));
    }

    #[test]
    fn end_of_input_ends_the_loop_with_the_last_status() {
        let (mut env, state) = env();
        state.borrow_mut().input.extend("export A=1\n".bytes());
        env.exit_status = ExitStatus(3);
        let mut input = FdReader::stdin();
        let exit_status = read_eval_loop(&mut env, &mut input);
        // export succeeded, so the last status is 0.
        assert_eq!(exit_status, ExitStatus::SUCCESS);
        assert_eq!(env.variables.get("A"), Some("1"));
    }

    #[test]
    fn job_notifications_are_delivered_at_the_prompt_boundary() {
        let (mut env, state) = env();
        let index = env
            .jobs
            .add(Job::new(Pid::from_raw(50), [Pid::from_raw(50)], "sleep 0 &".into()));
        env.jobs.get_mut(index).unwrap().state_reported = true;
        state
            .borrow_mut()
            .wait_results
            .push_back((Pid::from_raw(50), ProcessState::Exited(ExitStatus::SUCCESS)));

        let mut input = FdReader::stdin();
        let _ = read_eval_loop(&mut env, &mut input);
        assert!(state.borrow().stderr().contains("Done"));
        assert!(env.jobs.is_empty());
    }

    #[test]
    fn builtin_usage_error_sets_status_1() {
        let (mut env, _state) = env();
        let _ = process_line(&mut env, "exit nope");
        assert_eq!(env.exit_status, ExitStatus::FAILURE);
    }
}
