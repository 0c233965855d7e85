//! Whole-program entry points: run the checker over a parsed program, or
//! over raw source text.

use lachs::Span;
use tracing::debug;

use super::env::TypeEnv;
use super::infer::Checker;
use super::ty::TypeScheme;
use crate::ast::Program;
use crate::config::CheckConfig;
use crate::diagnostics::{Category, Diagnostic, Diagnostics};
use crate::lexer::{Token, strip_comments};
use crate::parser::parse_tokens;

/// Outcome of a checking pass.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// The program with every annotation slot filled in. Holds only the
    /// declarations that parsed when there were syntax errors.
    pub program: Program,
    /// The root context extended with every top-level binding.
    pub env: TypeEnv,
    pub diagnostics: Diagnostics,
    pub passed: bool,
}

impl CheckResult {
    pub fn lookup(&self, name: &str) -> Option<&TypeScheme> {
        self.env.lookup(name)
    }

    /// The rendered scheme of a top-level binding.
    pub fn type_of(&self, name: &str) -> Option<String> {
        self.lookup(name).map(TypeScheme::to_string)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    fn failed(program: Program, diagnostics: Diagnostics) -> Self {
        CheckResult {
            program,
            env: Checker::new().root_env(),
            diagnostics,
            passed: false,
        }
    }
}

pub fn check_program(mut program: Program, config: &CheckConfig) -> CheckResult {
    let mut checker = Checker::with_config(*config);
    let mut env = checker.root_env();

    let passed = checker.check_program(&mut program, &mut env);
    let diagnostics = checker.take_diagnostics();
    let passed = passed && !(config.warnings_as_errors && diagnostics.warning_count() > 0);
    debug!(
        passed,
        errors = diagnostics.error_count(),
        warnings = diagnostics.warning_count(),
        "checked program"
    );

    CheckResult {
        program,
        env,
        diagnostics,
        passed,
    }
}

/// Strip comments, lex, parse and check `source`.
///
/// Type checking is skipped when the source has syntax errors.
pub fn check_source(source: &str, config: &CheckConfig) -> CheckResult {
    let source = strip_comments(source);

    let tokens = match Token::lex(&source) {
        Ok(tokens) => tokens,
        Err(err) => {
            let mut diagnostics = Diagnostics::new();
            diagnostics.push(Diagnostic::error(
                Category::Syntax,
                format!("failed to lex input: {err}"),
                Span::default(),
            ));
            return CheckResult::failed(Program::default(), diagnostics);
        }
    };

    let (program, errors) = parse_tokens(tokens);
    if !errors.is_empty() {
        debug!(count = errors.len(), "syntax errors, skipping type checking");
        let mut diagnostics = Diagnostics::new();
        diagnostics.extend(errors.iter().map(|err| err.to_diagnostic()));
        return CheckResult::failed(program, diagnostics);
    }

    check_program(program, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_source_types_bindings() {
        let result = check_source("let x = 1;; fun inc n -> n + x", &CheckConfig::default());
        assert!(result.passed);
        assert_eq!(result.type_of("inc").as_deref(), Some("int -> int"));
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_syntax_errors_skip_checking() {
        let result = check_source("let x = ;; let y = z", &CheckConfig::default());
        assert!(!result.passed);
        assert!(result.errors().all(|d| d.category == Category::Syntax));
        assert!(result.lookup("y").is_none());
    }

    #[test]
    fn test_warnings_as_errors() {
        let source = "match 1 with _ -> 0 | 1 -> 1";
        assert!(check_source(source, &CheckConfig::default()).passed);

        let strict = CheckConfig::default().with_warnings_as_errors(true);
        let result = check_source(source, &strict);
        assert!(!result.passed);
        assert_eq!(result.errors().count(), 0);
    }

    #[test]
    fn test_comments_are_ignored() {
        let result = check_source("(* a (* nested *) comment *) let x = 1", &CheckConfig::default());
        assert!(result.passed);
        assert_eq!(result.type_of("x").as_deref(), Some("int"));
    }
}
