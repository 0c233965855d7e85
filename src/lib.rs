//! # Tern - type checking for a small ML-family language
//!
//! Tern is an expression language in the ML tradition: `let` and `fun`
//! bindings, curried application, tuples, `if` and `match`. This crate is
//! its front-end. It reads source text and infers a principal type for every
//! declaration with Hindley-Milner inference, reporting every error it finds
//! instead of stopping at the first one.
//!
//! ## Pipeline
//!
//! ```text
//! Source Code (String)
//!     ↓
//! [strip_comments] → Source without (* comments *)
//!     ↓
//! [Lexer] → Token Stream
//!     ↓
//! [Parser] → AST (ast::Program), every type slot empty
//!     ↓
//! [Checker] → AST with resolved types + TypeEnv + Diagnostics
//! ```
//!
//! ## Type checking
//!
//! - Unification with occurs check, one substitution per declaration
//! - Let-polymorphism: `let` and named `fun` bindings are generalized
//!   relative to the enclosing context
//! - Recursive functions through a placeholder bound before the body
//! - Optional type hints (`let x : int = ...`, `fun f (x : int) : int -> ...`)
//! - Operators resolve against a fixed root context of builtins
//!
//! Errors never abort a pass. A failing subexpression gets the error type,
//! which unifies with everything, so one mistake yields one diagnostic.
//!
//! ## Module Structure
//!
//! - [`lexer`] - Tokenization using lachs
//! - [`ast`] - Expressions, patterns and type hints
//! - [`parser`] - Combinator parser with error recovery
//! - [`types`] - Type terms, unification and inference
//! - [`diagnostics`] - Errors, warnings and notes produced by a pass
//! - [`config`] - Knobs for a checking pass
//! - [`repl`] - Interactive session
//!
//! ## Example Program
//!
//! ```text
//! let id = fun x -> x
//!
//! fun fact n -> if n = 0 then 1 else n * fact (n - 1)
//!
//! let pair = (id 1, id true)   (* int * bool *)
//! ```
//!
//! ## Getting Started
//!
//! ```no_run
//! use tern::config::CheckConfig;
//! use tern::types::check_source;
//!
//! let result = check_source("let id = fun x -> x", &CheckConfig::default());
//! for diagnostic in &result.diagnostics {
//!     eprintln!("{diagnostic}");
//! }
//! assert_eq!(result.type_of("id").as_deref(), Some("'a -> 'a"));
//! ```

pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod types;
