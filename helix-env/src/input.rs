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

//! Line input.
//!
//! The read-eval loop obtains command lines through the [`LineSource`]
//! trait. The default implementation, [`FdReader`], prints the prompt to the
//! standard error and reads the standard input byte-wise. A line-editing
//! frontend can supply a richer implementation without the loop knowing.

use crate::io::Fd;
use crate::system::Result;
use crate::Env;
use std::fmt::Debug;
use std::slice::from_mut;

/// Source of command lines.
pub trait LineSource: Debug {
    /// Reads the next line, displaying the prompt first.
    ///
    /// Returns `Ok(None)` at the end of input. The returned line does not
    /// contain the trailing newline.
    fn read_line(&mut self, env: &mut Env, prompt: &str) -> Result<Option<String>>;
}

/// Line source that reads from a file descriptor.
#[derive(Clone, Copy, Debug)]
#[must_use = "FdReader does nothing unless used by the read-eval loop"]
pub struct FdReader {
    /// File descriptor to read from
    fd: Fd,
}

impl FdReader {
    /// Creates a reader for the given descriptor.
    pub fn new(fd: Fd) -> Self {
        FdReader { fd }
    }

    /// Creates a reader for the standard input.
    pub fn stdin() -> Self {
        Self::new(Fd::STDIN)
    }
}

impl LineSource for FdReader {
    fn read_line(&mut self, env: &mut Env, prompt: &str) -> Result<Option<String>> {
        env.system.write_all(Fd::STDERR, prompt.as_bytes())?;

        let mut bytes = Vec::new();
        loop {
            let mut byte = 0;
            match env.system.read(self.fd, from_mut(&mut byte))? {
                0 => break,
                _ => {
                    if byte == b'\n' {
                        return Ok(Some(into_string(bytes)));
                    }
                    bytes.push(byte);
                }
            }
        }

        // End of input: a final unterminated line is still delivered.
        if bytes.is_empty() {
            Ok(None)
        } else {
            Ok(Some(into_string(bytes)))
        }
    }
}

fn into_string(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(&e.into_bytes()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::r#virtual::VirtualSystem;

    fn env_with_input(input: &str) -> Env {
        let system = VirtualSystem::new();
        system.state.borrow_mut().input.extend(input.bytes());
        Env::with_system(Box::new(system))
    }

    #[test]
    fn lines_are_delivered_without_the_newline() {
        let mut env = env_with_input("echo a\necho b\n");
        let mut reader = FdReader::stdin();
        assert_eq!(
            reader.read_line(&mut env, "$ ").unwrap(),
            Some("echo a".to_string())
        );
        assert_eq!(
            reader.read_line(&mut env, "$ ").unwrap(),
            Some("echo b".to_string())
        );
        assert_eq!(reader.read_line(&mut env, "$ ").unwrap(), None);
    }

    #[test]
    fn final_unterminated_line_is_delivered() {
        let mut env = env_with_input("exit");
        let mut reader = FdReader::stdin();
        assert_eq!(
            reader.read_line(&mut env, "$ ").unwrap(),
            Some("exit".to_string())
        );
        assert_eq!(reader.read_line(&mut env, "$ ").unwrap(), None);
    }

    #[test]
    fn prompt_goes_to_standard_error() {
        let system = VirtualSystem::new();
        let state = system.state.clone();
        let mut env = Env::with_system(Box::new(system));
        let mut reader = FdReader::stdin();
        let _ = reader.read_line(&mut env, "helix$ ");
        assert_eq!(state.borrow().stderr(), "helix$ ");
    }
}
