//! # Type Error Definitions
//!
//! Errors produced by the inference driver. None of them stop a pass: the
//! driver converts each one into a [`Diagnostic`] and continues with
//! `Type::None` in place of the failed sub-term.
//!
//! ## Example Error Messages
//!
//! ```text
//! error[E0001]: unbound identifier: x
//! error[E0002]: cannot construct infinite type: 't0 = 't0 -> int
//! error[E0003]: cannot unify int with bool
//! error[E0005]: only functions can be applied, found a tuple
//! error[E0008]: `x` is bound several times in this pattern
//! ```

use lachs::Span;
use thiserror::Error;

use super::ty::{Type, TypeVar};
use super::unify::UnifyError;
use crate::diagnostics::{Category, Diagnostic};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("unbound identifier: {name}")]
    UnboundIdentifier { name: String, span: Span },

    #[error("cannot construct infinite type: {var} = {ty}")]
    OccursCheckFailed { var: TypeVar, ty: Type, span: Span },

    /// Incompatible constructors, or tuples of different arity.
    #[error("cannot unify {expected} with {found}{}", context_suffix(.context))]
    UnificationMismatch {
        expected: Type,
        found: Type,
        span: Span,
        context: Option<String>,
    },

    #[error("invalid operator `{op}`: expected a function of {arity} argument(s)")]
    InvalidOperator { op: String, arity: usize, span: Span },

    #[error("only functions can be applied, found {kind}")]
    NotApplicable { kind: &'static str, span: Span },

    #[error("type annotation mismatch: declared {declared}, inferred {inferred}")]
    AnnotationMismatch {
        declared: Type,
        inferred: Type,
        span: Span,
    },

    #[error("`{name}` is bound several times in this pattern")]
    DuplicateBinding { name: String, span: Span },
}

fn context_suffix(context: &Option<String>) -> String {
    match context {
        Some(context) => format!(" ({context})"),
        None => String::new(),
    }
}

impl TypeError {
    pub fn unbound_identifier(name: impl Into<String>, span: Span) -> Self {
        TypeError::UnboundIdentifier {
            name: name.into(),
            span,
        }
    }

    pub fn mismatch(expected: Type, found: Type, span: Span) -> Self {
        TypeError::UnificationMismatch {
            expected,
            found,
            span,
            context: None,
        }
    }

    pub fn invalid_operator(op: impl Into<String>, arity: usize, span: Span) -> Self {
        TypeError::InvalidOperator {
            op: op.into(),
            arity,
            span,
        }
    }

    pub fn not_applicable(kind: &'static str, span: Span) -> Self {
        TypeError::NotApplicable { kind, span }
    }

    pub fn duplicate_binding(name: impl Into<String>, span: Span) -> Self {
        TypeError::DuplicateBinding {
            name: name.into(),
            span,
        }
    }

    /// Attach a note describing where the mismatch arose. Only affects
    /// `UnificationMismatch`.
    pub fn with_context(mut self, note: impl Into<String>) -> Self {
        if let TypeError::UnificationMismatch { context, .. } = &mut self {
            *context = Some(note.into());
        }
        self
    }

    pub fn from_unify_error(err: UnifyError, span: Span) -> Self {
        match err {
            UnifyError::Mismatch { expected, found } | UnifyError::TupleArity { expected, found } => {
                TypeError::mismatch(expected, found, span)
            }
            UnifyError::OccursCheck { var, ty } => TypeError::OccursCheckFailed { var, ty, span },
        }
    }

    /// A unification failure against a user-written hint.
    pub fn from_annotation(declared: Type, inferred: Type, span: Span) -> Self {
        TypeError::AnnotationMismatch {
            declared,
            inferred,
            span,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            TypeError::UnboundIdentifier { span, .. }
            | TypeError::OccursCheckFailed { span, .. }
            | TypeError::UnificationMismatch { span, .. }
            | TypeError::InvalidOperator { span, .. }
            | TypeError::NotApplicable { span, .. }
            | TypeError::AnnotationMismatch { span, .. }
            | TypeError::DuplicateBinding { span, .. } => span,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            TypeError::UnboundIdentifier { .. } => Category::UnboundIdentifier,
            TypeError::OccursCheckFailed { .. } => Category::OccursCheckFailed,
            TypeError::UnificationMismatch { .. } => Category::UnificationMismatch,
            TypeError::InvalidOperator { .. } => Category::InvalidOperator,
            TypeError::NotApplicable { .. } => Category::NotApplicable,
            TypeError::AnnotationMismatch { .. } => Category::AnnotationMismatch,
            TypeError::DuplicateBinding { .. } => Category::DuplicateBinding,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::error(self.category(), self.to_string(), self.span().clone());
        match self {
            TypeError::UnboundIdentifier { name, .. } => {
                diagnostic.with_help(format!("bind `{name}` with `let` or `fun` before using it"))
            }
            TypeError::AnnotationMismatch { .. } => {
                diagnostic.with_help("fix the annotation or the annotated expression")
            }
            _ => diagnostic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_display() {
        let err = TypeError::mismatch(Type::int(), Type::string(), Span::default());
        assert_eq!(err.to_string(), "cannot unify int with string");
    }

    #[test]
    fn test_mismatch_with_context() {
        let err = TypeError::mismatch(Type::int(), Type::bool(), Span::default())
            .with_context("if condition");
        assert_eq!(err.to_string(), "cannot unify int with bool (if condition)");
    }

    #[test]
    fn test_with_context_ignores_other_variants() {
        let err = TypeError::unbound_identifier("x", Span::default()).with_context("ignored");
        assert_eq!(err.to_string(), "unbound identifier: x");
    }

    #[test]
    fn test_from_unify_error() {
        let occurs = UnifyError::OccursCheck {
            var: TypeVar(0),
            ty: Type::func(Type::Var(TypeVar(0)), Type::int()),
        };
        let err = TypeError::from_unify_error(occurs, Span::default());
        assert_eq!(err.category(), Category::OccursCheckFailed);
        assert!(err.to_string().contains("infinite type"));

        let arity = UnifyError::TupleArity {
            expected: Type::Tuple(vec![Type::int()]),
            found: Type::Tuple(vec![Type::int(), Type::int()]),
        };
        let err = TypeError::from_unify_error(arity, Span::default());
        assert_eq!(err.category(), Category::UnificationMismatch);
    }

    #[test]
    fn test_to_diagnostic() {
        let diag = TypeError::unbound_identifier("y", Span::default()).to_diagnostic();
        assert!(diag.is_error());
        assert_eq!(diag.category, Category::UnboundIdentifier);
        assert_eq!(diag.message, "unbound identifier: y");
        assert!(diag.help.is_some());
    }
}
