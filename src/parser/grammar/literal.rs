//! Literal and identifier parsers

use lachs::Span;

use crate::ast::{Ident, Literal};
use crate::lexer::Token;

use crate::parser::combinators::{BoxedParser, expect_lparen, expect_rparen};
use crate::parser::state::{ParseError, ParseState, Parser};

/// Parse an identifier
pub fn ident() -> BoxedParser<Ident> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::Ident(id)) => {
            let ident = Ident::new(id.value.clone(), id.position.clone());
            state.advance();
            Ok(ident)
        }
        Some(tok) => {
            let err = ParseError::new("unexpected token")
                .expected("identifier")
                .found(tok.describe())
                .at(tok.pos());
            state.record_error(err.clone());
            Err(err)
        }
        None => {
            let err = ParseError::new("unexpected end of input")
                .expected("identifier")
                .at(state.last_span());
            state.record_error(err.clone());
            Err(err)
        }
    })
}

/// unit := "(" ")"
pub fn unit() -> BoxedParser<(Literal, Span)> {
    BoxedParser::new(|state: &mut ParseState| {
        let start = expect_lparen().parse(state)?.pos();
        let end = expect_rparen().parse(state)?.pos();
        Ok((Literal::Unit, start.merge(&end)))
    })
}

/// constant := integer | float | string | char | "true" | "false"
///
/// `()` is handled by [`unit`] since it shares its first token with
/// parenthesized expressions.
pub fn constant() -> BoxedParser<(Literal, Span)> {
    BoxedParser::new(|state: &mut ParseState| {
        let literal = match state.peek() {
            Some(Token::Integer(int)) => int
                .value
                .parse()
                .map(Literal::Int)
                .map_err(|_| {
                    ParseError::new("integer literal out of range").at(int.position.clone())
                }),
            Some(Token::Float(float)) => float
                .value
                .parse()
                .map(Literal::Float)
                .map_err(|_| ParseError::new("invalid float literal").at(float.position.clone())),
            Some(Token::StringLiteral(s)) => Ok(Literal::Str(unescape(&s.value[1..s.value.len() - 1]))),
            Some(Token::CharLiteral(c)) => unescape(&c.value[1..c.value.len() - 1])
                .chars()
                .next()
                .map(Literal::Char)
                .ok_or_else(|| ParseError::new("empty char literal").at(c.position.clone())),
            Some(Token::True(_)) => Ok(Literal::Bool(true)),
            Some(Token::False(_)) => Ok(Literal::Bool(false)),
            Some(tok) => Err(ParseError::new("unexpected token")
                .expected("literal")
                .found(tok.describe())
                .at(tok.pos())),
            None => Err(ParseError::new("unexpected end of input")
                .expected("literal")
                .at(state.last_span())),
        };

        match literal {
            Ok(literal) => {
                let position = state.peek().map(Token::pos).unwrap_or_default();
                state.advance();
                Ok((literal, position))
            }
            Err(err) => {
                state.record_error(err.clone());
                Err(err)
            }
        }
    })
}

/// Resolve backslash escapes in the body of a string or char literal.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
