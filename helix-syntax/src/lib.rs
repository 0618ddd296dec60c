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

//! Command-line syntax for the helix shell.
//!
//! This crate turns a raw command line into a [`Pipeline`] ready for
//! execution. The work is split into two stages:
//!
//! 1. The [lexer](lex) scans the line into a sequence of [tokens](lex::Token),
//!    resolving quoting and escaping and recognizing operators.
//! 2. The [parser](parser) groups the tokens into a pipeline of commands with
//!    their redirections and an optional background marker.
//!
//! Tokenization never fails; malformed input such as an unterminated quote is
//! carried through the token stream and rejected by the parser. Parsing a
//! given line always produces the same result.
//!
//! [`Pipeline`]: syntax::Pipeline

pub mod lex;
pub mod parser;
pub mod syntax;
