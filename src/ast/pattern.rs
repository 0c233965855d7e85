//! # Patterns
//!
//! Patterns appear in `match` arms and as `fun` parameters.
//!
//! - **Identifier** `x` binds the matched value.
//! - **Wildcard** `_` matches anything and binds nothing.
//! - **Literal** `42`, `"s"`, `true`, `()` matches one constant.
//! - **Tuple** `(p1, p2, ...)` destructures a tuple of the same arity.

use lachs::Span;

use super::expression::{Ident, Literal};
use crate::types::Type;

#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Ident(Ident),
    Wildcard(Wildcard),
    Literal(LiteralPattern),
    Tuple(TuplePattern),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Wildcard {
    pub position: Span,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralPattern {
    pub value: Literal,
    pub position: Span,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TuplePattern {
    pub items: Vec<Pattern>,
    pub position: Span,
    pub ty: Type,
}

impl Pattern {
    pub fn position(&self) -> &Span {
        match self {
            Pattern::Ident(id) => &id.position,
            Pattern::Wildcard(w) => &w.position,
            Pattern::Literal(lit) => &lit.position,
            Pattern::Tuple(tuple) => &tuple.position,
        }
    }

    pub fn ty(&self) -> &Type {
        match self {
            Pattern::Ident(id) => &id.ty,
            Pattern::Wildcard(w) => &w.ty,
            Pattern::Literal(lit) => &lit.ty,
            Pattern::Tuple(tuple) => &tuple.ty,
        }
    }

    pub fn ty_mut(&mut self) -> &mut Type {
        match self {
            Pattern::Ident(id) => &mut id.ty,
            Pattern::Wildcard(w) => &mut w.ty,
            Pattern::Literal(lit) => &mut lit.ty,
            Pattern::Tuple(tuple) => &mut tuple.ty,
        }
    }

    /// Matches every value of its type.
    pub fn is_irrefutable(&self) -> bool {
        match self {
            Pattern::Ident(_) | Pattern::Wildcard(_) => true,
            Pattern::Literal(_) => false,
            Pattern::Tuple(tuple) => tuple.items.iter().all(Pattern::is_irrefutable),
        }
    }

    /// Names bound by this pattern, left to right.
    pub fn bound_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Pattern::Ident(id) => names.push(&id.value),
            Pattern::Wildcard(_) | Pattern::Literal(_) => {}
            Pattern::Tuple(tuple) => tuple.items.iter().for_each(|item| item.collect_names(names)),
        }
    }
}
