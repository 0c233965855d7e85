mod combinators;
mod grammar;
mod state;

pub use combinators::*;
pub use grammar::*;
pub use state::{ParseError, ParseResult, ParseState, Parser};

use crate::ast::Program;
use crate::lexer::Token;

/// Parse an already lexed token stream.
pub fn parse_tokens(tokens: Vec<Token>) -> (Program, Vec<ParseError>) {
    let mut state = ParseState::new(tokens);
    parse(&mut state)
}
