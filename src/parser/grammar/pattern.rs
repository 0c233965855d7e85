//! Pattern parsers
//!
//! ```text
//! pattern := "(" ")" | "(" pattern ("," pattern)* ")" | constant | "_" | ident
//! param   := "(" pattern ":" hint ")" | pattern
//! ```

use crate::ast::{LiteralPattern, Pattern, TuplePattern, TypeHint, Wildcard};
use crate::lexer::Token;
use crate::parser::combinators::{
    BoxedParser, expect_colon, expect_comma, expect_lparen, expect_rparen, expect_underscore,
    lazy, separated1,
};
use crate::parser::state::{ParseState, Parser};
use crate::types::Type;

use super::hint::hint;
use super::literal::{constant, ident, unit};

fn literal_pattern() -> BoxedParser<Pattern> {
    (unit() | constant()).map(|(value, position)| {
        Pattern::Literal(LiteralPattern {
            value,
            position,
            ty: Type::None,
        })
    })
}

fn wildcard() -> BoxedParser<Pattern> {
    expect_underscore()
        >> |tok: Token| {
            Pattern::Wildcard(Wildcard {
                position: tok.pos(),
                ty: Type::None,
            })
        }
}

/// "(" pattern ("," pattern)* ")". A single element is just grouping.
fn tuple_pattern() -> BoxedParser<Pattern> {
    BoxedParser::new(|state: &mut ParseState| {
        let start = expect_lparen().parse(state)?.pos();
        let mut items = separated1(lazy(pattern), expect_comma()).parse(state)?;
        let end = expect_rparen().parse(state)?.pos();

        if items.len() == 1 {
            return Ok(items.remove(0));
        }
        Ok(Pattern::Tuple(TuplePattern {
            items,
            position: start.merge(&end),
            ty: Type::None,
        }))
    })
}

pub fn pattern() -> BoxedParser<Pattern> {
    literal_pattern() | tuple_pattern() | wildcard() | (ident() >> Pattern::Ident)
}

/// A function parameter, optionally annotated.
pub fn param() -> BoxedParser<(Pattern, Option<TypeHint>)> {
    let annotated = (expect_lparen() * pattern() + (expect_colon() * hint()) - expect_rparen())
        .map(|(pattern, hint)| (pattern, Some(hint)));
    annotated | pattern().map(|pattern| (pattern, None))
}
