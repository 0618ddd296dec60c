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

//! Prompt rendering.
//!
//! The prompt shows `user@host:directory$ `, with the working directory
//! shortened under `$HOME` to `~`, and the last exit status prepended in
//! brackets when it was not zero. Rendering never fails; when any piece of
//! information is unavailable, [`FALLBACK`] is used.

use helix_env::semantics::ExitStatus;
use helix_env::variable::{HOME, LOGNAME, USER};
use helix_env::Env;

/// Prompt used when the real one cannot be rendered
pub const FALLBACK: &str = "$ ";

/// Everything the prompt is derived from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PromptContext<'a> {
    pub user: &'a str,
    pub host: &'a str,
    pub cwd: &'a str,
    pub home: Option<&'a str>,
    pub exit_status: ExitStatus,
}

/// Renders a prompt string from the context.
#[must_use]
pub fn render(context: &PromptContext) -> String {
    let directory = shorten(context.cwd, context.home);
    let mut prompt = String::new();
    if !context.exit_status.is_successful() {
        prompt.push_str(&format!("[{}] ", context.exit_status));
    }
    prompt.push_str(&format!(
        "{}@{}:{}$ ",
        context.user, context.host, directory
    ));
    prompt
}

/// Replaces a leading `$HOME` with `~`.
fn shorten(cwd: &str, home: Option<&str>) -> String {
    if let Some(home) = home.filter(|home| !home.is_empty()) {
        if cwd == home {
            return "~".to_string();
        }
        if let Some(rest) = cwd.strip_prefix(home) {
            if rest.starts_with('/') {
                return format!("~{rest}");
            }
        }
    }
    cwd.to_string()
}

/// Renders the prompt for the current state of the environment.
///
/// Falls back to [`FALLBACK`] when the user, host, or working directory
/// cannot be determined.
pub fn render_for(env: &mut Env) -> String {
    let user = match env
        .variables
        .get(USER)
        .or_else(|| env.variables.get(LOGNAME))
    {
        Some(user) if !user.is_empty() => user.to_string(),
        _ => return FALLBACK.to_string(),
    };
    let Ok(host) = env.system.gethostname() else {
        return FALLBACK.to_string();
    };
    let Ok(cwd) = env.system.getcwd() else {
        return FALLBACK.to_string();
    };

    render(&PromptContext {
        user: &user,
        host: &host.to_string_lossy(),
        cwd: &cwd.to_string_lossy(),
        home: env.variables.get(HOME),
        exit_status: env.exit_status,
    })
}
