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

//! Variable expansion.
//!
//! [`expand`] rewrites `$NAME` and `${NAME}` occurrences in a string with
//! values from the variable set. `$NAME` takes the longest run of name
//! characters (`[A-Za-z_][A-Za-z0-9_]*`); `${NAME}` takes everything up to
//! the closing brace. Unknown names expand to the empty string. The result
//! is not expanded again, and no field splitting takes place.
//!
//! A `$` not followed by a name or an opening brace is literal, as is an
//! unterminated `${`.

use helix_env::variable::VariableSet;
use helix_syntax::syntax::Word;

/// Expands variable references in a string.
#[must_use]
pub fn expand(variables: &VariableSet, text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }
        match chars.peek() {
            Some('{') => {
                chars.next();
                let mut name = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                if !closed {
                    result.push_str("${");
                    result.push_str(&name);
                } else if let Some(value) = variables.get(&name) {
                    result.push_str(value);
                }
            }
            Some(&c) if c.is_ascii_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        name.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if let Some(value) = variables.get(&name) {
                    result.push_str(value);
                }
            }
            _ => result.push('$'),
        }
    }
    result
}

/// Expands a word, honoring its `literal` flag.
///
/// Words that contained a single-quoted region are exempt from expansion.
#[must_use]
pub fn expand_word(variables: &VariableSet, word: &Word) -> String {
    if word.literal {
        word.text.clone()
    } else {
        expand(variables, &word.text)
    }
}
