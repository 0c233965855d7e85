use std::fmt;

use crate::types::Primitive;

/// A user-written type annotation.
///
/// Named variables (`'a`) are scoped to one hint: every occurrence of `'a`
/// within the same hint denotes the same type. `_` stands for "infer this".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeHint {
    Primitive(Primitive),
    Var(String),
    Wildcard,
    Fun(Box<TypeHint>, Box<TypeHint>),
    Tuple(Vec<TypeHint>),
}

impl TypeHint {
    pub fn func(param: TypeHint, ret: TypeHint) -> Self {
        TypeHint::Fun(Box::new(param), Box::new(ret))
    }

    /// Compose per-parameter and return hints into one hint for the whole
    /// curried function. Returns `None` when nothing was annotated.
    pub fn for_function(params: Vec<Option<TypeHint>>, ret: Option<TypeHint>) -> Option<Self> {
        if ret.is_none() && params.iter().all(Option::is_none) {
            return None;
        }
        let ret = ret.unwrap_or(TypeHint::Wildcard);
        Some(params.into_iter().rev().fold(ret, |acc, param| {
            TypeHint::func(param.unwrap_or(TypeHint::Wildcard), acc)
        }))
    }
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TypeHint::Primitive(p) => write!(f, "{}", p.name()),
            TypeHint::Var(name) => write!(f, "{name}"),
            TypeHint::Wildcard => write!(f, "_"),
            TypeHint::Fun(param, ret) => match **param {
                TypeHint::Fun(_, _) => write!(f, "({param}) -> {ret}"),
                _ => write!(f, "{param} -> {ret}"),
            },
            TypeHint::Tuple(items) => {
                let parts: Vec<String> = items
                    .iter()
                    .map(|item| match item {
                        TypeHint::Fun(_, _) | TypeHint::Tuple(_) => format!("({item})"),
                        _ => item.to_string(),
                    })
                    .collect();
                write!(f, "{}", parts.join(" * "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_function_hint() {
        let hint = TypeHint::for_function(
            vec![Some(TypeHint::Primitive(Primitive::Int)), None],
            Some(TypeHint::Primitive(Primitive::Bool)),
        );
        assert_eq!(hint.unwrap().to_string(), "int -> _ -> bool");
    }

    #[test]
    fn no_annotations_no_hint() {
        assert_eq!(TypeHint::for_function(vec![None, None], None), None);
    }

    #[test]
    fn display_nested() {
        let hint = TypeHint::func(
            TypeHint::func(TypeHint::Var("'a".into()), TypeHint::Var("'b".into())),
            TypeHint::Tuple(vec![TypeHint::Wildcard, TypeHint::Primitive(Primitive::Str)]),
        );
        assert_eq!(hint.to_string(), "('a -> 'b) -> _ * string");
    }
}
