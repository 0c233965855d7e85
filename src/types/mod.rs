//! # Type checking
//!
//! Hindley-Milner inference for Tern.
//!
//! - [`ty`]: type terms and schemes
//! - [`subst`]: substitutions over type variables
//! - [`unify`]: the unifier, with occurs check
//! - [`env`]: the persistent typing context
//! - [`builtins`]: the root context of operators and intrinsics
//! - [`infer`]: the per-node inference rules and the declaration loop
//! - [`check`]: program and source level entry points

pub mod builtins;
pub mod check;
pub mod env;
pub mod error;
pub mod infer;
pub mod subst;
pub mod ty;
pub mod unify;

pub use builtins::root_env;
pub use check::{CheckResult, check_program, check_source};
pub use env::TypeEnv;
pub use error::TypeError;
pub use infer::Checker;
pub use subst::Substitution;
pub use ty::{Primitive, Type, TypeScheme, TypeVar};
pub use unify::{UnifyError, unify};
