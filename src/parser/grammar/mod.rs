//! Grammar for Tern
//!
//! This module contains all the parsing rules organized by category:
//! - `literal`: identifiers and constants
//! - `hint`: type annotations
//! - `pattern`: `match` and parameter patterns
//! - `expression`: every expression form, binary operators included

mod expression;
mod hint;
mod literal;
mod pattern;

use crate::ast::Program;
use crate::lexer::Token;

use super::combinators::BoxedParser;
use super::state::{ParseError, ParseState, Parser};

pub use expression::{declaration, expression};
pub use hint::hint;
pub use pattern::pattern;

fn at_declaration_boundary(state: &ParseState) -> bool {
    matches!(
        state.peek(),
        None | Some(Token::DoubleSemicolon(_) | Token::Let(_) | Token::Fun(_))
    )
}

fn skip_separators(state: &mut ParseState) {
    while matches!(state.peek(), Some(Token::DoubleSemicolon(_))) {
        state.advance();
    }
}

/// Skip tokens until something that can start a new declaration. Never
/// stops at or before `start`.
fn skip_to_next_declaration(state: &mut ParseState, start: usize) {
    if state.position() <= start {
        state.advance();
    }
    while !at_declaration_boundary(state) {
        state.advance();
    }
}

/// program := (declaration ";;"?)*
///
/// With error recovery: a declaration that fails to parse reports its
/// furthest error and the parser resumes at the first `;;`, `let` or `fun`
/// after that error.
pub fn program() -> BoxedParser<Program> {
    BoxedParser::new(|state: &mut ParseState| {
        let mut declarations = Vec::new();

        loop {
            skip_separators(state);
            if !state.has_next() {
                break;
            }

            state.clear_furthest_error();
            let pos = state.position();
            match declaration().parse(state) {
                Ok(decl) => {
                    declarations.push(decl);
                    if !at_declaration_boundary(state) {
                        let err = state.error_here("unexpected token").expected("';;'");
                        state.record_error(err);
                        state.commit_furthest_error();
                        skip_to_next_declaration(state, pos);
                    }
                }
                Err(err) => {
                    if state.get_furthest_error().is_none() {
                        state.record_error(err);
                    }
                    // resume after the point of failure, so that `let` and
                    // `fun` nested in the broken declaration are skipped
                    let failed_at = state.furthest_error_index().unwrap_or(pos).max(pos);
                    state.commit_furthest_error();
                    state.restore(failed_at);
                    skip_to_next_declaration(state, pos);
                }
            }
        }

        Ok(Program::new(declarations))
    })
}

/// Parse a complete program from the token stream.
///
/// Always returns a program holding every declaration that parsed, along
/// with all collected errors.
pub fn parse(state: &mut ParseState) -> (Program, Vec<ParseError>) {
    let program = match program().parse(state) {
        Ok(program) => program,
        Err(err) => {
            state.collect_error(err);
            Program::default()
        }
    };
    (program, state.take_errors())
}
