use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::config::CheckConfig;
use crate::diagnostics::{Category, Diagnostic};
use crate::lexer::{Token, strip_comments};
use crate::parser::parse_tokens;
use crate::types::{Checker, Type, TypeEnv, TypeScheme};

const HELP: &str = "\
Commands:
  :help   :h   Show this help
  :quit   :q   Exit the REPL
  :env         List the bindings made in this session
  :reset       Forget every binding made in this session

Anything else is checked as one or more declarations, e.g.
  let id = fun x -> x
  fun fact n -> if n = 0 then 1 else n * fact (n - 1)
  (id 1, id true)";

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Result of checking one REPL input.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub diagnostics: Vec<Diagnostic>,
    /// Names bound by the input, with their generalized schemes.
    pub bindings: Vec<(String, TypeScheme)>,
    /// Type of the last declaration when it binds no name.
    pub value: Option<Type>,
    pub passed: bool,
}

impl Evaluation {
    fn failed(diagnostics: Vec<Diagnostic>) -> Self {
        Evaluation {
            diagnostics,
            bindings: Vec::new(),
            value: None,
            passed: false,
        }
    }

    /// Render the way the REPL prints it.
    pub fn render(&self) -> String {
        let mut lines: Vec<String> = self.diagnostics.iter().map(Diagnostic::to_string).collect();
        if self.passed {
            lines.extend(
                self.bindings
                    .iter()
                    .map(|(name, scheme)| format!("val {name} : {scheme}")),
            );
            if let Some(value) = &self.value {
                lines.push(format!("- : {}", value.normalized()));
            }
        }
        lines.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Output(String),
    Quit,
}

/// State carried from one input to the next.
///
/// The checker is kept for the whole session so type variables stay unique
/// across inputs. The environment only changes when an input checks
/// without errors.
pub struct ReplSession {
    checker: Checker,
    env: TypeEnv,
}

impl ReplSession {
    pub fn new() -> Self {
        let checker = Checker::with_config(CheckConfig::default());
        let env = checker.root_env();
        ReplSession { checker, env }
    }

    pub fn env(&self) -> &TypeEnv {
        &self.env
    }

    pub fn reset(&mut self) {
        self.env = self.checker.root_env();
    }

    pub fn eval(&mut self, input: &str) -> Evaluation {
        let source = strip_comments(input);
        let tokens = match Token::lex(&source) {
            Ok(tokens) => tokens,
            Err(err) => {
                return Evaluation::failed(vec![Diagnostic::error(
                    Category::Syntax,
                    format!("failed to lex input: {err}"),
                    Default::default(),
                )]);
            }
        };

        let (mut program, errors) = parse_tokens(tokens);
        if !errors.is_empty() {
            return Evaluation::failed(errors.iter().map(|err| err.to_diagnostic()).collect());
        }

        let mut env = self.env.clone();
        let mut bindings = Vec::new();
        let mut value = None;
        let mut passed = true;

        for declaration in &mut program.declarations {
            passed &= self.checker.check_declaration(declaration, &mut env);
            value = match declaration.declared_name() {
                Some(name) => {
                    if let Some(scheme) = env.lookup(&name.value) {
                        bindings.push((name.value.clone(), scheme.clone()));
                    }
                    None
                }
                None => Some(declaration.ty().clone()),
            };
        }

        let diagnostics = self.checker.take_diagnostics().into_vec();
        debug!(passed, bindings = bindings.len(), "evaluated input");
        if passed {
            self.env = env;
        }

        Evaluation {
            diagnostics,
            bindings,
            value,
            passed,
        }
    }

    /// Bindings that differ from the root context, sorted by name.
    fn user_bindings(&self) -> Vec<(String, TypeScheme)> {
        let root = self.checker.root_env();
        self.env
            .sorted()
            .into_iter()
            .filter(|(name, scheme)| root.lookup(name) != Some(*scheme))
            .map(|(name, scheme)| (name.clone(), scheme.clone()))
            .collect()
    }

    pub fn handle_line(&mut self, line: &str) -> Reply {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Reply::Output(String::new());
        }
        if !trimmed.starts_with(':') {
            return Reply::Output(self.eval(trimmed).render());
        }

        match trimmed {
            ":quit" | ":q" => Reply::Quit,
            ":help" | ":h" => Reply::Output(HELP.to_string()),
            ":reset" => {
                self.reset();
                Reply::Output("Environment reset.".to_string())
            }
            ":env" => {
                let bindings = self.user_bindings();
                if bindings.is_empty() {
                    return Reply::Output("(empty)".to_string());
                }
                Reply::Output(
                    bindings
                        .iter()
                        .map(|(name, scheme)| format!("val {name} : {scheme}"))
                        .collect::<Vec<_>>()
                        .join("\n"),
                )
            }
            other => Reply::Output(format!(
                "Unknown command: {other}. Type :help for available commands."
            )),
        }
    }
}

impl Default for ReplSession {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Main REPL loop
// ---------------------------------------------------------------------------

/// More input is needed when the line ends in something that cannot end a
/// declaration, or parentheses are still open.
fn needs_continuation(input: &str) -> bool {
    let trimmed = strip_comments(input);
    let trimmed = trimmed.trim_end();

    const OPEN_SYMBOLS: [&str; 5] = ["=", "->", "|", "(", ","];
    const OPEN_KEYWORDS: [&str; 5] = ["let", "in", "then", "else", "with"];
    if OPEN_SYMBOLS.iter().any(|symbol| trimmed.ends_with(symbol)) {
        return true;
    }
    if let Some(last) = trimmed.split_whitespace().last() {
        if OPEN_KEYWORDS.contains(&last) {
            return true;
        }
    }

    let open = trimmed.chars().filter(|&c| c == '(').count();
    let close = trimmed.chars().filter(|&c| c == ')').count();
    open > close
}

fn read_input(rl: &mut DefaultEditor) -> Option<String> {
    let mut input = match rl.readline("# ") {
        Ok(line) => line,
        Err(ReadlineError::Interrupted) => return Some(String::new()),
        Err(ReadlineError::Eof) => return None,
        Err(e) => {
            eprintln!("Error: {e}");
            return Some(String::new());
        }
    };

    while !input.trim_start().starts_with(':') && needs_continuation(&input) {
        match rl.readline("  ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    break;
                }
                input.push('\n');
                input.push_str(&line);
            }
            Err(ReadlineError::Interrupted) => return Some(String::new()),
            Err(ReadlineError::Eof) => return None,
            Err(e) => {
                eprintln!("Error: {e}");
                return Some(String::new());
            }
        }
    }

    if !input.trim().is_empty() {
        let _ = rl.add_history_entry(&input);
    }

    Some(input)
}

pub fn run() -> anyhow::Result<()> {
    println!("Tern REPL v{}", env!("CARGO_PKG_VERSION"));
    println!("Type :help for commands, :quit to exit\n");

    let mut rl = DefaultEditor::new()?;
    let mut session = ReplSession::new();

    while let Some(input) = read_input(&mut rl) {
        match session.handle_line(&input) {
            Reply::Quit => break,
            Reply::Output(output) if output.is_empty() => {}
            Reply::Output(output) => println!("{output}"),
        }
    }

    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;

    #[test]
    fn test_bindings_persist_across_inputs() {
        let mut session = ReplSession::new();
        let first = session.eval("let id = fun x -> x");
        assert!(first.passed);
        assert_eq!(first.render(), "val id : 'a -> 'a");

        let second = session.eval("(id 1, id \"s\")");
        assert!(second.passed);
        assert_eq!(second.render(), "- : int * string");
    }

    #[test]
    fn test_failed_input_leaves_env_untouched() {
        let mut session = ReplSession::new();
        session.eval("let x = 1");

        let failed = session.eval("let x = true;; let y = x + nope");
        assert!(!failed.passed);
        assert!(failed.diagnostics.iter().any(|d| d.severity == Severity::Error));

        assert_eq!(session.env().lookup("x").unwrap().to_string(), "int");
        assert!(session.env().lookup("y").is_none());
    }

    #[test]
    fn test_commands() {
        let mut session = ReplSession::new();
        assert_eq!(session.handle_line(":env"), Reply::Output("(empty)".to_string()));

        session.handle_line("let n = 42");
        assert_eq!(session.handle_line(":env"), Reply::Output("val n : int".to_string()));

        session.handle_line(":reset");
        assert!(session.env().lookup("n").is_none());
        assert!(session.env().lookup("panic").is_some());

        assert_eq!(session.handle_line(":quit"), Reply::Quit);
        assert!(matches!(session.handle_line(":bogus"), Reply::Output(out) if out.starts_with("Unknown command")));
    }

    #[test]
    fn test_syntax_error_reported() {
        let mut session = ReplSession::new();
        let evaluation = session.eval("let = 1");
        assert!(!evaluation.passed);
        assert_eq!(evaluation.diagnostics[0].category, Category::Syntax);
    }

    #[test]
    fn test_needs_continuation() {
        assert!(needs_continuation("let x ="));
        assert!(needs_continuation("fun f x ->"));
        assert!(needs_continuation("(1,"));
        assert!(needs_continuation("match x with"));
        assert!(!needs_continuation("let x = 1"));
        assert!(!needs_continuation("f (x)"));
        assert!(!needs_continuation("let y = domain"));
    }
}
