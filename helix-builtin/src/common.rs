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

//! Common items for implementing built-ins.
//!
//! Every error or warning a built-in prints goes through [`report_failure`]
//! so messages carry the built-in name in a unified format:
//! `helix: <name>: <message>`.

use crate::Result;
use helix_env::job::JobList;
use helix_env::semantics::ExitStatus;
use helix_env::Env;
use std::fmt::Display;
use thiserror::Error;

/// Prints an error message and returns a failure result.
///
/// The message is written to the standard error as
/// `helix: <name>: <message>`, and the returned result carries
/// [`ExitStatus::FAILURE`] without a divert.
pub fn report_failure<M: Display>(env: &mut Env, name: &str, message: M) -> Result {
    env.print_error(&format!("helix: {name}: {message}\n"));
    Result::new(ExitStatus::FAILURE)
}

/// Prints text to the standard output.
///
/// A write failure is reported to the standard error and yields a failure
/// result.
pub fn output(env: &mut Env, name: &str, text: &str) -> Result {
    match env.print(text) {
        Ok(()) => Result::default(),
        Err(errno) => report_failure(env, name, format_args!("cannot print: {errno}")),
    }
}

/// Error selecting the job an `fg` or `bg` operand refers to.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum JobSelectionError {
    /// No operand was given and the job table has no live job.
    #[error("no current job")]
    NoCurrentJob,

    /// The operand is not a job number.
    #[error("{0}: invalid job ID")]
    InvalidJobId(String),

    /// The operand names no job in the table.
    #[error("{0}: no such job")]
    NoSuchJob(String),

    /// More than one operand was given.
    #[error("too many operands")]
    TooManyOperands,
}

/// Selects the job an `fg` or `bg` operand refers to.
///
/// With no operand, the [current job](JobList::current_job) is selected. A
/// single operand names a job by number, with or without a leading `%`.
pub fn select_job(jobs: &JobList, args: &[String]) -> std::result::Result<usize, JobSelectionError> {
    match args {
        [] => jobs.current_job().ok_or(JobSelectionError::NoCurrentJob),
        [id] => {
            let number = id.strip_prefix('%').unwrap_or(id);
            match number.parse::<usize>() {
                Ok(number) if number >= 1 => {
                    let index = number - 1;
                    if jobs.get(index).is_some() {
                        Ok(index)
                    } else {
                        Err(JobSelectionError::NoSuchJob(id.clone()))
                    }
                }
                _ => Err(JobSelectionError::InvalidJobId(id.clone())),
            }
        }
        _ => Err(JobSelectionError::TooManyOperands),
    }
}

/// [`select_job`], with the error reported through [`report_failure`].
pub fn find_job(env: &mut Env, args: &[String], name: &str) -> std::result::Result<usize, Result> {
    select_job(&env.jobs, args).map_err(|error| report_failure(env, name, error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use helix_env::job::{Job, Pid};
    use helix_env::system::r#virtual::VirtualSystem;

    fn env() -> Env {
        Env::with_system(Box::new(VirtualSystem::new()))
    }

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn find_job_accepts_plain_and_percent_numbers() {
        let mut env = env();
        let index = env
            .jobs
            .add(Job::new(Pid::from_raw(7), [Pid::from_raw(7)], "x".into()));

        assert_eq!(find_job(&mut env, &strings(&["1"]), "fg"), Ok(index));
        assert_eq!(find_job(&mut env, &strings(&["%1"]), "fg"), Ok(index));
    }

    #[test]
    fn find_job_defaults_to_the_current_job() {
        let mut env = env();
        let index = env
            .jobs
            .add(Job::new(Pid::from_raw(7), [Pid::from_raw(7)], "x".into()));
        assert_eq!(find_job(&mut env, &[], "fg"), Ok(index));
    }

    #[test]
    fn select_job_rejects_missing_and_malformed_ids() {
        use assert_matches::assert_matches;
        let env = env();
        assert_eq!(
            select_job(&env.jobs, &[]),
            Err(JobSelectionError::NoCurrentJob)
        );
        assert_matches!(
            select_job(&env.jobs, &strings(&["1"])),
            Err(JobSelectionError::NoSuchJob(_))
        );
        assert_matches!(
            select_job(&env.jobs, &strings(&["%x"])),
            Err(JobSelectionError::InvalidJobId(_))
        );
        assert_matches!(
            select_job(&env.jobs, &strings(&["0"])),
            Err(JobSelectionError::InvalidJobId(_))
        );
        assert_eq!(
            select_job(&env.jobs, &strings(&["1", "2"])),
            Err(JobSelectionError::TooManyOperands)
        );
    }
}
