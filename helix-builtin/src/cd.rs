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

//! Cd built-in
//!
//! The **`cd`** built-in changes the working directory.
//!
//! # Synopsis
//!
//! ```sh
//! cd [directory]
//! ```
//!
//! # Description
//!
//! The built-in changes the working directory to the operand. Without an
//! operand, the target is `$HOME`. The operand `-` means `$OLDPWD`, and the
//! new working directory is printed after the change.
//!
//! On success, `$PWD` is set to the new working directory and `$OLDPWD` to
//! the previous one.
//!
//! # Errors
//!
//! It is an error if the target directory cannot be entered, if more than
//! one operand is given, or if the target is `$HOME` or `$OLDPWD` and that
//! variable is unset or empty. On error the working directory and the
//! variables are left unchanged.
//!
//! # Exit status
//!
//! Zero unless an error occurs.

use crate::common::{output, report_failure};
use crate::Result;
use helix_env::variable::{HOME, OLDPWD, PWD};
use helix_env::Env;
use std::ffi::CString;

/// Entry point of the `cd` built-in
pub fn main(env: &mut Env, args: Vec<String>) -> Result {
    let target = match args.as_slice() {
        [] => match env.variables.get(HOME) {
            Some(home) if !home.is_empty() => home.to_string(),
            _ => return report_failure(env, "cd", "HOME not set"),
        },
        [operand] if operand == "-" => match env.variables.get(OLDPWD) {
            Some(oldpwd) if !oldpwd.is_empty() => oldpwd.to_string(),
            _ => return report_failure(env, "cd", "OLDPWD not set"),
        },
        [operand] => operand.clone(),
        _ => return report_failure(env, "cd", "too many operands"),
    };
    let print_new = args.first().is_some_and(|operand| operand == "-");

    let old = match env.system.getcwd() {
        Ok(cwd) => cwd.to_string_lossy().into_owned(),
        Err(_) => env.variables.get(PWD).unwrap_or_default().to_string(),
    };

    let Ok(path) = CString::new(target.as_str()) else {
        return report_failure(env, "cd", format_args!("{target}: invalid directory name"));
    };
    if let Err(errno) = env.system.chdir(&path) {
        return report_failure(env, "cd", format_args!("{target}: {errno}"));
    }

    let new = match env.system.getcwd() {
        Ok(cwd) => cwd.to_string_lossy().into_owned(),
        Err(_) => target,
    };
    env.variables.assign(OLDPWD, old);
    env.variables.assign(PWD, new.clone());

    if print_new {
        output(env, "cd", &format!("{new}\n"))
    } else {
        Result::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helix_env::semantics::ExitStatus;
    use helix_env::system::r#virtual::VirtualSystem;
    use helix_env::system::Errno;

    fn env() -> (Env, std::rc::Rc<std::cell::RefCell<helix_env::system::r#virtual::SystemState>>)
    {
        let system = VirtualSystem::new();
        let state = system.state.clone();
        (Env::with_system(Box::new(system)), state)
    }

    fn args(operands: &[&str]) -> Vec<String> {
        operands.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn operand_changes_the_directory_and_updates_variables() {
        let (mut env, state) = env();
        let result = main(&mut env, args(&["/usr/share"]));
        assert_eq!(result, Result::default());
        assert_eq!(state.borrow().cwd, std::path::Path::new("/usr/share"));
        assert_eq!(env.variables.get(PWD), Some("/usr/share"));
        assert_eq!(env.variables.get(OLDPWD), Some("/"));
    }

    #[test]
    fn no_operand_goes_home() {
        let (mut env, state) = env();
        env.variables.assign(HOME, "/home/user");
        let result = main(&mut env, vec![]);
        assert_eq!(result, Result::default());
        assert_eq!(state.borrow().cwd, std::path::Path::new("/home/user"));
    }

    #[test]
    fn no_operand_without_home_is_an_error() {
        let (mut env, state) = env();
        let result = main(&mut env, vec![]);
        assert_eq!(result.exit_status(), ExitStatus::FAILURE);
        assert_eq!(state.borrow().stderr(), "helix: cd: HOME not set\n");
        assert_eq!(state.borrow().cwd, std::path::Path::new("/"));
    }

    #[test]
    fn dash_goes_to_oldpwd_and_prints_it() {
        let (mut env, state) = env();
        env.variables.assign(OLDPWD, "/var/log");
        let result = main(&mut env, args(&["-"]));
        assert_eq!(result, Result::default());
        assert_eq!(state.borrow().cwd, std::path::Path::new("/var/log"));
        assert_eq!(state.borrow().stdout(), "/var/log\n");
        assert_eq!(env.variables.get(OLDPWD), Some("/"));
    }

    #[test]
    fn dash_without_oldpwd_is_an_error_and_changes_nothing() {
        let (mut env, state) = env();
        let result = main(&mut env, args(&["-"]));
        assert_eq!(result.exit_status(), ExitStatus::FAILURE);
        assert_eq!(state.borrow().stderr(), "helix: cd: OLDPWD not set\n");
        assert_eq!(state.borrow().cwd, std::path::Path::new("/"));
        assert_eq!(env.variables.get(OLDPWD), None);
    }

    #[test]
    fn chdir_failure_leaves_state_alone() {
        let (mut env, state) = env();
        state.borrow_mut().chdir_error = Some(Errno::ENOENT);
        let result = main(&mut env, args(&["/nope"]));
        assert_eq!(result.exit_status(), ExitStatus::FAILURE);
        assert!(state.borrow().stderr().contains("/nope"));
        assert_eq!(env.variables.get(PWD), None);
        assert_eq!(env.variables.get(OLDPWD), None);
    }

    #[test]
    fn round_trip_via_dash_returns_to_the_origin() {
        let (mut env, state) = env();
        main(&mut env, args(&["/a"]));
        main(&mut env, args(&["-"]));
        assert_eq!(state.borrow().cwd, std::path::Path::new("/"));
        main(&mut env, args(&["-"]));
        assert_eq!(state.borrow().cwd, std::path::Path::new("/a"));
    }

    #[test]
    fn too_many_operands() {
        let (mut env, _state) = env();
        let result = main(&mut env, args(&["a", "b"]));
        assert_eq!(result.exit_status(), ExitStatus::FAILURE);
    }
}
