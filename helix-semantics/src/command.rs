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

//! Command dispatch.
//!
//! [`execute`] realizes a parsed pipeline. Words are expanded first; then
//! one of two paths is taken:
//!
//! - A single-stage foreground pipeline whose command names a built-in runs
//!   the built-in in the shell process, with redirections applied through a
//!   [`RedirGuard`] so the shell's own descriptors survive.
//! - Everything else is spawned through the
//!   [pipeline orchestrator](crate::pipeline). A built-in occurring inside a
//!   multi-stage pipeline (or in the background) runs in the forked child,
//!   where its effect on the copied environment is invisible to the shell —
//!   `cd x | cat` must not move the parent.
//!
//! The child half of the spawn path lives here too: [`run_in_child`] wires
//! the pipe ends, applies file redirections over them, resolves the
//! executable, and execs, reporting failures with the conventional exit
//! statuses (1 for I/O, 126 for a non-executable command, 127 for a missing
//! one).

use crate::expansion::expand_word;
use crate::job_control::JOB_CONTROL_SIGNALS;
use crate::pipeline::{execute_pipeline, PipeSet};
use crate::redir::{apply, FileRedir, RedirGuard, Stream};
use crate::search::search_path;
use helix_env::builtin::Builtin;
use helix_env::job::{Pid, Signal};
use helix_env::semantics::ExitStatus;
use helix_env::system::{Disposition, Errno};
use helix_env::variable::VariableSet;
use helix_env::Env;
use helix_syntax::syntax;
use std::ffi::CString;
use std::ops::ControlFlow::Continue;

/// Pipeline stage after variable expansion.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExpandedCommand {
    /// Command name and arguments
    pub argv: Vec<String>,
    /// File redirections, in application order
    pub redirs: Vec<FileRedir>,
}

impl ExpandedCommand {
    /// Command name, the first element of `argv`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.argv[0]
    }
}

/// Expands the words of one pipeline stage.
#[must_use]
pub fn expand_command(variables: &VariableSet, command: &syntax::Command) -> ExpandedCommand {
    let argv = command
        .argv
        .iter()
        .map(|word| expand_word(variables, word))
        .collect();

    let mut redirs = Vec::new();
    if let Some(target) = &command.stdin_file {
        redirs.push(FileRedir {
            stream: Stream::Stdin,
            path: expand_word(variables, target),
            append: false,
        });
    }
    if let Some(target) = &command.stdout_file {
        redirs.push(FileRedir {
            stream: Stream::Stdout,
            path: expand_word(variables, target),
            append: command.stdout_append,
        });
    }
    if let Some(target) = &command.stderr_file {
        redirs.push(FileRedir {
            stream: Stream::Stderr,
            path: expand_word(variables, target),
            append: command.stderr_append,
        });
    }

    ExpandedCommand { argv, redirs }
}

/// Executes a parsed pipeline.
///
/// `name` is the original command line, used for job display.
pub fn execute(
    env: &mut Env,
    pipeline: &syntax::Pipeline,
    name: &str,
) -> helix_env::semantics::Result {
    let commands: Vec<ExpandedCommand> = pipeline
        .commands
        .iter()
        .map(|command| expand_command(&env.variables, command))
        .collect();

    if let [command] = commands.as_slice() {
        if !pipeline.background {
            if let Some(&builtin) = env.builtins.get(command.name()) {
                return execute_builtin_in_shell(env, builtin, command);
            }
        }
    }

    execute_pipeline(env, &commands, pipeline.background, name)
}

/// Runs a built-in in the shell process, redirections applied temporarily.
fn execute_builtin_in_shell(
    env: &mut Env,
    builtin: Builtin,
    command: &ExpandedCommand,
) -> helix_env::semantics::Result {
    let mut guard = RedirGuard::new(env);
    if let Err(error) = guard.perform(&command.redirs) {
        drop(guard);
        env.print_error(&format!("helix: {error}\n"));
        env.exit_status = ExitStatus::FAILURE;
        return Continue(());
    }

    let args = command.argv[1..].to_vec();
    let result = (builtin.execute)(&mut guard, args);
    drop(guard);

    env.exit_status = result.exit_status();
    result.divert()
}

/// Realizes one pipeline stage inside the forked child. Never returns.
///
/// The child joins the pipeline's process group, restores the default
/// dispositions of the signals the interactive shell ignores, wires the
/// pipe ends onto the standard descriptors, lets file redirections override
/// them, and finally runs the command: a built-in executes on the copied
/// environment and the child exits with its status; an external utility is
/// resolved and exec'ed.
pub fn run_in_child(env: &mut Env, command: &ExpandedCommand, pipes: PipeSet, pgid: Pid) -> ! {
    // Join the process group before anything observable happens. The parent
    // performs the same call; whichever runs first wins.
    _ = env.system.setpgid(Pid::from_raw(0), pgid);

    for signal in JOB_CONTROL_SIGNALS {
        _ = env.system.sigaction(signal, Disposition::Default);
    }
    _ = env.system.sigaction(Signal::SIGCHLD, Disposition::Default);
    _ = env.system.sigaction(Signal::SIGPIPE, Disposition::Default);

    if let Err(errno) = pipes.move_to_stdin_stdout(&mut *env.system) {
        env.print_error(&format!("helix: cannot connect the pipeline: {errno}\n"));
        env.system.exit(ExitStatus::FAILURE);
    }

    // File redirections override the pipe ends just installed.
    if let Err(error) = apply(&mut *env.system, &command.redirs) {
        env.print_error(&format!("helix: {error}\n"));
        env.system.exit(ExitStatus::FAILURE);
    }

    let exit_status = run_command(env, command);
    env.system.exit(exit_status)
}

/// Runs the command of a stage in the current (child) process.
fn run_command(env: &mut Env, command: &ExpandedCommand) -> ExitStatus {
    let name = command.name();

    if let Some(&builtin) = env.builtins.get(name) {
        let args = command.argv[1..].to_vec();
        return (builtin.execute)(env, args).exit_status();
    }

    let path = match search_path(env, name) {
        Ok(path) => path,
        Err(error) => {
            env.print_error(&format!("helix: {name}: {error}\n"));
            return error.exit_status();
        }
    };

    let args: Vec<CString> = match command
        .argv
        .iter()
        .map(|arg| CString::new(arg.as_str()))
        .collect()
    {
        Ok(args) => args,
        Err(_) => {
            env.print_error(&format!("helix: {name}: invalid argument\n"));
            return ExitStatus::FAILURE;
        }
    };
    let envs = env.variables.env_c_strings();

    let errno = match env.system.execve(&path, &args, &envs) {
        Err(errno) => errno,
        Ok(infallible) => match infallible {},
    };
    env.print_error(&format!("helix: {name}: {errno}\n"));
    match errno {
        Errno::EACCES => ExitStatus::NOEXEC,
        Errno::ENOENT => ExitStatus::NOT_FOUND,
        _ => ExitStatus::FAILURE,
    }
}
