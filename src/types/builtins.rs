//! The root context.
//!
//! Operators are resolved only against this table, never against user
//! bindings. The remaining entries are ordinary identifiers that user code
//! may shadow.

use super::env::TypeEnv;
use super::ty::{Type, TypeScheme, TypeVar};

fn mono(ty: Type) -> TypeScheme {
    TypeScheme::monomorphic(ty)
}

fn binary(operand: Type, result: Type) -> TypeScheme {
    mono(Type::curried(vec![operand.clone(), operand], result))
}

/// `forall a. a -> a -> bool`
fn comparison() -> TypeScheme {
    let a = TypeVar(0);
    TypeScheme::polymorphic(
        vec![a],
        Type::curried(vec![Type::Var(a), Type::Var(a)], Type::bool()),
    )
}

pub fn builtin_schemes() -> Vec<(&'static str, TypeScheme)> {
    let a = TypeVar(0);
    vec![
        ("+", binary(Type::int(), Type::int())),
        ("-", binary(Type::int(), Type::int())),
        ("*", binary(Type::int(), Type::int())),
        ("/", binary(Type::int(), Type::int())),
        ("%", binary(Type::int(), Type::int())),
        ("+.", binary(Type::float(), Type::float())),
        ("-.", binary(Type::float(), Type::float())),
        ("*.", binary(Type::float(), Type::float())),
        ("/.", binary(Type::float(), Type::float())),
        ("^", binary(Type::string(), Type::string())),
        ("=", comparison()),
        ("<>", comparison()),
        ("<", comparison()),
        (">", comparison()),
        ("<=", comparison()),
        (">=", comparison()),
        ("&&", binary(Type::bool(), Type::bool())),
        ("||", binary(Type::bool(), Type::bool())),
        ("~-", mono(Type::func(Type::int(), Type::int()))),
        ("~-.", mono(Type::func(Type::float(), Type::float()))),
        ("not", mono(Type::func(Type::bool(), Type::bool()))),
        (
            "panic",
            TypeScheme::polymorphic(vec![a], Type::func(Type::string(), Type::Var(a))),
        ),
        ("print", mono(Type::func(Type::string(), Type::unit()))),
        ("string_of_int", mono(Type::func(Type::int(), Type::string()))),
        ("float_of_int", mono(Type::func(Type::int(), Type::float()))),
    ]
}

pub fn root_env() -> TypeEnv {
    TypeEnv::with_bindings(
        builtin_schemes()
            .into_iter()
            .map(|(name, scheme)| (name.to_string(), scheme))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Substitution;

    #[test]
    fn root_env_is_closed() {
        let env = root_env();
        assert!(env.free_type_vars(&Substitution::empty()).is_empty());
    }

    #[test]
    fn operators_have_expected_arity() {
        let env = root_env();
        for op in ["+", "-.", "^", "=", "&&"] {
            assert_eq!(env.lookup(op).unwrap().ty.arity(), 2, "{op}");
        }
        for op in ["~-", "~-.", "not"] {
            assert_eq!(env.lookup(op).unwrap().ty.arity(), 1, "{op}");
        }
    }

    #[test]
    fn panic_is_polymorphic_in_its_result() {
        let scheme = root_env().lookup("panic").cloned().unwrap();
        assert_eq!(scheme.vars.len(), 1);
        assert_eq!(scheme.to_string(), "string -> 'a");
    }
}
