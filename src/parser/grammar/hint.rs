//! Type hint parsers
//!
//! ```text
//! hint       := hint_tuple ("->" hint)?
//! hint_tuple := hint_atom ("*" hint_atom)*
//! hint_atom  := primitive | 'var | "_" | "(" hint ")"
//! ```

use crate::ast::TypeHint;
use crate::lexer::Token;
use crate::parser::combinators::{
    BoxedParser, expect_arrow, expect_lparen, expect_rparen, expect_star, lazy, optional,
    separated1,
};
use crate::parser::state::{ParseError, ParseState, Parser};
use crate::types::Primitive;

/// A full hint, arrows included.
pub fn hint() -> BoxedParser<TypeHint> {
    let arrow = optional(expect_arrow() * lazy(hint));
    (hint_tuple() + arrow).map(|(param, ret)| match ret {
        Some(ret) => TypeHint::func(param, ret),
        None => param,
    })
}

/// A hint without a top-level arrow. Used for `fun` return annotations,
/// where `->` introduces the body.
pub fn hint_tuple() -> BoxedParser<TypeHint> {
    separated1(hint_atom(), expect_star()).map(|mut items: Vec<TypeHint>| {
        if items.len() == 1 {
            items.remove(0)
        } else {
            TypeHint::Tuple(items)
        }
    })
}

fn hint_atom() -> BoxedParser<TypeHint> {
    let parenthesized = expect_lparen() * lazy(hint) - expect_rparen();
    let named = BoxedParser::new(|state: &mut ParseState| {
        let hint = match state.peek() {
            Some(Token::Ident(id)) => match Primitive::from_name(&id.value) {
                Some(primitive) => Ok(TypeHint::Primitive(primitive)),
                None => Err(ParseError::new(format!("unknown type `{}`", id.value))
                    .at(id.position.clone())),
            },
            Some(Token::TypeVarName(var)) => Ok(TypeHint::Var(var.value.clone())),
            Some(Token::Underscore(_)) => Ok(TypeHint::Wildcard),
            Some(tok) => Err(ParseError::new("unexpected token")
                .expected("type")
                .found(tok.describe())
                .at(tok.pos())),
            None => Err(ParseError::new("unexpected end of input")
                .expected("type")
                .at(state.last_span())),
        };
        match hint {
            Ok(hint) => {
                state.advance();
                Ok(hint)
            }
            Err(err) => {
                state.record_error(err.clone());
                Err(err)
            }
        }
    });
    parenthesized | named
}
