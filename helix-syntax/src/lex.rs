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

//! Lexical analysis of command lines.
//!
//! [`tokenize`] scans a raw line into a flat sequence of [`Token`]s. The
//! scanner is a three-state machine (unquoted, single-quoted, double-quoted)
//! that resolves quoting and escaping while recognizing operators.
//!
//! Operator recognition takes precedence over word continuation, so operators
//! are delimited both at word boundaries and inside words: `ls>out` scans the
//! same as `ls > out`. The `2>` and `2>>` operators are recognized only when
//! the `2` starts a new token and is immediately followed by `>`; in every
//! other position `2` is an ordinary word character.
//!
//! Tokenization never fails. An unterminated quote is recorded in the
//! resulting [`TokenStream`] and left for the parser to reject.

use crate::syntax::Word;
use std::fmt;

/// Operator token.
///
/// The variants are ordered by their spelling; recognition in the lexer is
/// longest-match (`2>>` before `2>`, `>>` before `>`).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operator {
    /// `|`
    Bar,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `>>`
    GreaterGreater,
    /// `2>`
    TwoGreater,
    /// `2>>`
    TwoGreaterGreater,
    /// `&`
    And,
    /// `;`
    Semicolon,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Operator::*;
        match self {
            Bar => f.write_str("|"),
            Less => f.write_str("<"),
            Greater => f.write_str(">"),
            GreaterGreater => f.write_str(">>"),
            TwoGreater => f.write_str("2>"),
            TwoGreaterGreater => f.write_str("2>>"),
            And => f.write_str("&"),
            Semicolon => f.write_str(";"),
        }
    }
}

/// Token produced by the lexer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Token {
    /// Word with quotes stripped and escapes resolved
    Word(Word),
    /// Operator
    Operator(Operator),
    /// Synthetic end-of-line token
    End,
}

/// Result of tokenizing one line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenStream {
    /// Tokens in source order, always ending in [`Token::End`]
    pub tokens: Vec<Token>,
    /// Whether the line ended inside a quoted region
    pub unterminated_quote: bool,
}

/// Scanner state
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    Normal,
    InSingle,
    InDouble,
}

/// Splits a raw line into tokens.
///
/// The returned stream always ends in [`Token::End`]. See the [module
/// documentation](self) for the scanning rules.
#[must_use]
pub fn tokenize(line: &str) -> TokenStream {
    let mut tokens = Vec::new();
    let mut text = String::new();
    // Distinct from `text.is_empty()`: a pair of quotes produces an empty word.
    let mut in_word = false;
    let mut literal = false;
    let mut state = State::Normal;
    let mut chars = line.chars().peekable();

    macro_rules! flush_word {
        () => {
            if in_word {
                tokens.push(Token::Word(Word {
                    text: std::mem::take(&mut text),
                    literal,
                }));
                in_word = false;
                literal = false;
            }
        };
    }

    while let Some(c) = chars.next() {
        match state {
            State::Normal => match c {
                ' ' | '\t' => flush_word!(),
                '\\' => {
                    // A trailing backslash escapes nothing and is dropped.
                    if let Some(next) = chars.next() {
                        text.push(next);
                        in_word = true;
                    }
                }
                '\'' => {
                    state = State::InSingle;
                    in_word = true;
                    literal = true;
                }
                '"' => {
                    state = State::InDouble;
                    in_word = true;
                }
                '|' => {
                    flush_word!();
                    tokens.push(Token::Operator(Operator::Bar));
                }
                '&' => {
                    flush_word!();
                    tokens.push(Token::Operator(Operator::And));
                }
                ';' => {
                    flush_word!();
                    tokens.push(Token::Operator(Operator::Semicolon));
                }
                '<' => {
                    flush_word!();
                    tokens.push(Token::Operator(Operator::Less));
                }
                '>' => {
                    flush_word!();
                    let operator = if chars.next_if_eq(&'>').is_some() {
                        Operator::GreaterGreater
                    } else {
                        Operator::Greater
                    };
                    tokens.push(Token::Operator(operator));
                }
                '2' if !in_word && chars.peek() == Some(&'>') => {
                    chars.next();
                    let operator = if chars.next_if_eq(&'>').is_some() {
                        Operator::TwoGreaterGreater
                    } else {
                        Operator::TwoGreater
                    };
                    tokens.push(Token::Operator(operator));
                }
                _ => {
                    text.push(c);
                    in_word = true;
                }
            },

            State::InSingle => match c {
                '\'' => state = State::Normal,
                _ => text.push(c),
            },

            State::InDouble => match c {
                '"' => state = State::Normal,
                '\\' => match chars.peek() {
                    Some(&next @ ('"' | '\\' | '$')) => {
                        chars.next();
                        text.push(next);
                    }
                    _ => text.push('\\'),
                },
                _ => text.push(c),
            },
        }
    }

    let unterminated_quote = state != State::Normal;
    flush_word!();
    tokens.push(Token::End);
    TokenStream {
        tokens,
        unterminated_quote,
    }
}
