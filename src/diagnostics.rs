//! # Diagnostics
//!
//! Structured, append-only reporting shared by the parser and the type
//! checker. Nothing here aborts a pass: producers push a [`Diagnostic`] and
//! keep going, and the caller decides afterwards whether the run failed.
//!
//! ```text
//! error[E0003]: cannot unify int with bool
//! warning[W0001]: unreachable match arm
//! ```

use std::fmt;

use lachs::Span;

/// How severe a diagnostic is. Only errors fail a pass by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

/// What kind of problem a diagnostic describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Identifier absent from the context.
    UnboundIdentifier,
    /// A variable would have to contain itself.
    OccursCheckFailed,
    /// Incompatible constructors or tuple arities.
    UnificationMismatch,
    /// Operator missing from the root context or of the wrong arity.
    InvalidOperator,
    /// Something that is not a function was applied.
    NotApplicable,
    /// A type hint disagrees with the inferred type.
    AnnotationMismatch,
    /// One pattern binds the same name twice.
    DuplicateBinding,
    /// Lexing or parsing failed.
    Syntax,
    /// A match arm can never be reached.
    UnreachablePattern,
    /// Inferred type of a top-level binding.
    InferredType,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::UnboundIdentifier,
        Category::OccursCheckFailed,
        Category::UnificationMismatch,
        Category::InvalidOperator,
        Category::NotApplicable,
        Category::AnnotationMismatch,
        Category::DuplicateBinding,
        Category::Syntax,
        Category::UnreachablePattern,
        Category::InferredType,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Category::UnboundIdentifier => "E0001",
            Category::OccursCheckFailed => "E0002",
            Category::UnificationMismatch => "E0003",
            Category::InvalidOperator => "E0004",
            Category::NotApplicable => "E0005",
            Category::AnnotationMismatch => "E0006",
            Category::Syntax => "E0007",
            Category::DuplicateBinding => "E0008",
            Category::UnreachablePattern => "W0001",
            Category::InferredType => "I0001",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::UnboundIdentifier => "unbound_identifier",
            Category::OccursCheckFailed => "occurs_check_failed",
            Category::UnificationMismatch => "unification_mismatch",
            Category::InvalidOperator => "invalid_operator",
            Category::NotApplicable => "not_applicable",
            Category::AnnotationMismatch => "annotation_mismatch",
            Category::Syntax => "syntax",
            Category::DuplicateBinding => "duplicate_binding",
            Category::UnreachablePattern => "unreachable_pattern",
            Category::InferredType => "inferred_type",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub category: Category,
    pub message: String,
    pub position: Span,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn error(category: Category, message: impl Into<String>, position: Span) -> Self {
        Self::new(Severity::Error, category, message, position)
    }

    pub fn warning(category: Category, message: impl Into<String>, position: Span) -> Self {
        Self::new(Severity::Warning, category, message, position)
    }

    pub fn info(category: Category, message: impl Into<String>, position: Span) -> Self {
        Self::new(Severity::Info, category, message, position)
    }

    fn new(severity: Severity, category: Category, message: impl Into<String>, position: Span) -> Self {
        Diagnostic {
            severity,
            category,
            message: message.into(),
            position,
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headline = format!(
            "{}[{}]: {}",
            self.severity.as_str(),
            self.category.code(),
            self.message
        );
        if self.position.source.is_empty() {
            write!(f, "{headline}")?;
        } else {
            write!(f, "{}", self.position.to_string(&headline))?;
        }
        if let Some(help) = &self.help {
            write!(f, "\n  help: {help}")?;
        }
        Ok(())
    }
}

/// Append-only diagnostics sink.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.items.extend(diagnostics);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.items.iter().filter(|d| d.severity == severity).count()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }

    /// Remove and return everything pushed after `mark` (a previous `len()`).
    pub fn split_off(&mut self, mark: usize) -> Vec<Diagnostic> {
        self.items.split_off(mark.min(self.items.len()))
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_display_without_source() {
        let diag = Diagnostic::error(
            Category::UnificationMismatch,
            "cannot unify int with bool",
            Span::default(),
        );
        assert_eq!(diag.to_string(), "error[E0003]: cannot unify int with bool");
    }

    #[test]
    fn diagnostic_display_with_help() {
        let diag = Diagnostic::warning(Category::UnreachablePattern, "unreachable match arm", Span::default())
            .with_help("remove this arm");
        let rendered = diag.to_string();
        assert!(rendered.starts_with("warning[W0001]: unreachable match arm"));
        assert!(rendered.contains("help: remove this arm"));
    }

    #[test]
    fn sink_counts_by_severity() {
        let mut sink = Diagnostics::new();
        assert!(!sink.has_errors());

        sink.push(Diagnostic::warning(Category::UnreachablePattern, "w", Span::default()));
        sink.push(Diagnostic::info(Category::InferredType, "i", Span::default()));
        assert!(!sink.has_errors());

        sink.push(Diagnostic::error(Category::UnboundIdentifier, "e", Span::default()));
        assert!(sink.has_errors());
        assert_eq!(sink.error_count(), 1);
        assert_eq!(sink.warning_count(), 1);
        assert_eq!(sink.len(), 3);
    }

    #[test]
    fn split_off_returns_tail() {
        let mut sink = Diagnostics::new();
        sink.push(Diagnostic::error(Category::Syntax, "first", Span::default()));
        let mark = sink.len();
        sink.push(Diagnostic::error(Category::Syntax, "second", Span::default()));

        let tail = sink.split_off(mark);
        assert_eq!(tail.len(), 1);
        assert_eq!(tail[0].message, "second");
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn category_codes_are_unique() {
        let mut codes = std::collections::BTreeSet::new();
        for category in Category::ALL {
            assert!(!category.as_str().is_empty());
            assert!(codes.insert(category.code()), "duplicate code {}", category.code());
        }
    }
}
