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

//! Syntactic analysis of token streams.
//!
//! [`parse`] implements the grammar
//!
//! ```text
//! line        := pipeline ( "&" )? ( ";" )? END
//! pipeline    := stage ( "|" stage )*
//! stage       := ( WORD | redirection )+     ; must contain at least one WORD
//! redirection := "<" WORD | ">" WORD | ">>" WORD | "2>" WORD | "2>>" WORD
//! ```
//!
//! Within a stage, words form `argv` in order and redirections are captured
//! into the stage's fields as they appear; a later redirection of the same
//! kind silently overwrites the earlier one. `;` is accepted only as the end
//! of the pipeline.

use crate::lex::{Operator, Token, TokenStream};
use crate::syntax::{Command, Pipeline};
use std::iter::Peekable;
use thiserror::Error;

/// Reason a line was rejected.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SyntaxError {
    /// The line ended inside a quoted region.
    #[error("unterminated quote")]
    UnterminatedQuote,

    /// A redirection operator was not followed by a word.
    #[error("expected a filename after `{0}`")]
    ExpectedFilenameAfterRedirection(Operator),

    /// A pipeline stage contained no words.
    #[error("missing command in pipeline stage")]
    MissingCommandInPipelineStage,

    /// Tokens followed the background marker.
    #[error("unexpected token after `&`")]
    UnexpectedTokenAfterBackground,

    /// Tokens followed the pipeline-terminating semicolon.
    #[error("unexpected token after `;`")]
    UnexpectedTokenAfterSemicolon,
}

/// Result of parsing one line.
pub type Result<T> = std::result::Result<T, SyntaxError>;

/// Parses a token stream into a pipeline.
///
/// Returns `Ok(None)` for a line with no tokens (empty or all-whitespace
/// input). Parsing is deterministic: the same stream always produces an equal
/// result.
pub fn parse(stream: TokenStream) -> Result<Option<Pipeline>> {
    if stream.unterminated_quote {
        return Err(SyntaxError::UnterminatedQuote);
    }

    let mut tokens = stream.tokens.into_iter().peekable();
    if matches!(tokens.peek(), Some(Token::End) | None) {
        return Ok(None);
    }

    let mut commands = vec![parse_stage(&mut tokens)?];
    let mut background = false;
    loop {
        match tokens.next() {
            Some(Token::Operator(Operator::Bar)) => commands.push(parse_stage(&mut tokens)?),
            Some(Token::Operator(Operator::And)) => {
                background = true;
                match tokens.next() {
                    Some(Token::Operator(Operator::Semicolon)) => {
                        expect_line_end(&mut tokens, SyntaxError::UnexpectedTokenAfterBackground)?;
                    }
                    Some(Token::End) | None => {}
                    Some(_) => return Err(SyntaxError::UnexpectedTokenAfterBackground),
                }
                break;
            }
            Some(Token::Operator(Operator::Semicolon)) => {
                expect_line_end(&mut tokens, SyntaxError::UnexpectedTokenAfterSemicolon)?;
                break;
            }
            _ => break,
        }
    }

    Ok(Some(Pipeline {
        commands,
        background,
    }))
}

/// Parses one stage: words and redirections up to the next `|`, `&`, `;`, or
/// the end of the line.
fn parse_stage<I>(tokens: &mut Peekable<I>) -> Result<Command>
where
    I: Iterator<Item = Token>,
{
    let mut command = Command::default();
    loop {
        match tokens.peek() {
            Some(Token::Word(_)) => {
                let Some(Token::Word(word)) = tokens.next() else {
                    unreachable!()
                };
                command.argv.push(word);
            }
            Some(Token::Operator(
                operator @ (Operator::Less
                | Operator::Greater
                | Operator::GreaterGreater
                | Operator::TwoGreater
                | Operator::TwoGreaterGreater),
            )) => {
                let operator = *operator;
                tokens.next();
                let Some(Token::Word(target)) = tokens.next() else {
                    return Err(SyntaxError::ExpectedFilenameAfterRedirection(operator));
                };
                match operator {
                    Operator::Less => command.stdin_file = Some(target),
                    Operator::Greater | Operator::GreaterGreater => {
                        command.stdout_file = Some(target);
                        command.stdout_append = operator == Operator::GreaterGreater;
                    }
                    Operator::TwoGreater | Operator::TwoGreaterGreater => {
                        command.stderr_file = Some(target);
                        command.stderr_append = operator == Operator::TwoGreaterGreater;
                    }
                    _ => unreachable!(),
                }
            }
            _ => break,
        }
    }

    if command.argv.is_empty() {
        return Err(SyntaxError::MissingCommandInPipelineStage);
    }
    Ok(command)
}

/// Requires the remaining tokens to be (an optional) `END`.
fn expect_line_end<I>(tokens: &mut Peekable<I>, error: SyntaxError) -> Result<()>
where
    I: Iterator<Item = Token>,
{
    match tokens.next() {
        Some(Token::End) | None => Ok(()),
        Some(_) => Err(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lex::tokenize;
    use crate::syntax::Word;
    use assert_matches::assert_matches;

    fn parse_line(line: &str) -> Result<Option<Pipeline>> {
        parse(tokenize(line))
    }

    #[test]
    fn empty_line_parses_to_none() {
        assert_eq!(parse_line(""), Ok(None));
        assert_eq!(parse_line("   \t"), Ok(None));
    }

    #[test]
    fn simple_command() {
        let pipeline = parse_line("echo hello world").unwrap().unwrap();
        assert!(!pipeline.background);
        assert_eq!(pipeline.commands.len(), 1);
        assert_eq!(
            pipeline.commands[0].argv,
            [Word::new("echo"), Word::new("hello"), Word::new("world")]
        );
    }

    #[test]
    fn pipeline_of_three_stages() {
        let pipeline = parse_line("cat f | sort | uniq -c").unwrap().unwrap();
        assert_eq!(pipeline.commands.len(), 3);
        assert_eq!(pipeline.commands[1].name(), "sort");
        assert_eq!(
            pipeline.commands[2].argv,
            [Word::new("uniq"), Word::new("-c")]
        );
    }

    #[test]
    fn long_pipeline() {
        let line = (0..64).map(|_| "cat").collect::<Vec<_>>().join(" | ");
        let pipeline = parse_line(&line).unwrap().unwrap();
        assert_eq!(pipeline.commands.len(), 64);
    }

    #[test]
    fn redirections_are_captured_in_stage_fields() {
        let pipeline = parse_line("sort < in > out 2>> log").unwrap().unwrap();
        let command = &pipeline.commands[0];
        assert_eq!(command.argv, [Word::new("sort")]);
        assert_eq!(command.stdin_file, Some(Word::new("in")));
        assert_eq!(command.stdout_file, Some(Word::new("out")));
        assert!(!command.stdout_append);
        assert_eq!(command.stderr_file, Some(Word::new("log")));
        assert!(command.stderr_append);
    }

    #[test]
    fn redirections_may_interleave_with_words() {
        let pipeline = parse_line("> out echo a b").unwrap().unwrap();
        let command = &pipeline.commands[0];
        assert_eq!(
            command.argv,
            [Word::new("echo"), Word::new("a"), Word::new("b")]
        );
        assert_eq!(command.stdout_file, Some(Word::new("out")));
    }

    #[test]
    fn later_redirection_of_same_kind_wins() {
        let pipeline = parse_line("echo x > a >> b").unwrap().unwrap();
        let command = &pipeline.commands[0];
        assert_eq!(command.stdout_file, Some(Word::new("b")));
        assert!(command.stdout_append);
    }

    #[test]
    fn background_marker() {
        let pipeline = parse_line("sleep 5 &").unwrap().unwrap();
        assert!(pipeline.background);

        let pipeline = parse_line("sleep 5 & ;").unwrap().unwrap();
        assert!(pipeline.background);
    }

    #[test]
    fn semicolon_accepted_as_line_end_only() {
        let pipeline = parse_line("echo a ;").unwrap().unwrap();
        assert!(!pipeline.background);
        assert_eq!(
            parse_line("echo a ; echo b"),
            Err(SyntaxError::UnexpectedTokenAfterSemicolon)
        );
    }

    #[test]
    fn tokens_after_background_are_rejected() {
        assert_eq!(
            parse_line("sleep 5 & echo done"),
            Err(SyntaxError::UnexpectedTokenAfterBackground)
        );
    }

    #[test]
    fn missing_filename_after_redirection() {
        assert_matches!(
            parse_line("echo a >"),
            Err(SyntaxError::ExpectedFilenameAfterRedirection(
                Operator::Greater
            ))
        );
        assert_matches!(
            parse_line("echo a > | cat"),
            Err(SyntaxError::ExpectedFilenameAfterRedirection(
                Operator::Greater
            ))
        );
    }

    #[test]
    fn stage_of_only_redirections_is_rejected() {
        assert_eq!(
            parse_line("> out"),
            Err(SyntaxError::MissingCommandInPipelineStage)
        );
    }

    #[test]
    fn empty_pipeline_stage_is_rejected() {
        assert_eq!(
            parse_line("echo a |"),
            Err(SyntaxError::MissingCommandInPipelineStage)
        );
        assert_eq!(
            parse_line("| echo a"),
            Err(SyntaxError::MissingCommandInPipelineStage)
        );
    }

    #[test]
    fn unterminated_quote_is_a_syntax_error() {
        assert_eq!(
            parse_line("echo 'oops"),
            Err(SyntaxError::UnterminatedQuote)
        );
    }

    #[test]
    fn parsing_is_deterministic() {
        let line = "cat < in | grep x >> out &";
        assert_eq!(parse_line(line), parse_line(line));
    }
}
