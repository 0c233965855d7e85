//! # Abstract Syntax Tree
//!
//! The tree produced by the parser and consumed by the type checker.
//!
//! Every expression and pattern node owns a `ty` slot. The parser leaves it
//! at [`Type::None`](crate::types::Type::None); after a checking pass it
//! holds the node's fully resolved type.
//!
//! ## Structure
//!
//! ```text
//! Program
//!  └── declarations: Vec<Expression>
//!        ├── Let   { name, hint, value, body: Option }
//!        ├── Fun   { name: Option, params: Vec<Pattern>, hint, body, rest: Option }
//!        └── any other expression
//! ```
//!
//! A top-level `let` without `in` has `body == None`; the same holds for
//! `rest` on a top-level named `fun`. Nested bindings always have a body.

pub mod expression;
pub mod hint;
pub mod pattern;

pub use expression::*;
pub use hint::TypeHint;
pub use pattern::*;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub declarations: Vec<Expression>,
}

impl Program {
    pub fn new(declarations: Vec<Expression>) -> Self {
        Program { declarations }
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}
