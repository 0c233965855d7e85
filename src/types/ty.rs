use std::collections::{HashMap, HashSet};
use std::fmt;

/// An unresolved type variable.
///
/// Ids come from the owning [`Checker`](super::Checker)'s counter and are
/// compared by value. They are only formatted for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeVar(pub u32);

impl fmt::Display for TypeVar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "'t{}", self.0)
    }
}

/// Zero-argument type constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Unit,
    Int,
    Float,
    Str,
    Char,
    Bool,
}

impl Primitive {
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Unit => "unit",
            Primitive::Int => "int",
            Primitive::Float => "float",
            Primitive::Str => "string",
            Primitive::Char => "char",
            Primitive::Bool => "bool",
        }
    }

    /// Resolve a primitive from the name used in type hints.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "unit" => Some(Primitive::Unit),
            "int" => Some(Primitive::Int),
            "float" => Some(Primitive::Float),
            "string" => Some(Primitive::Str),
            "char" => Some(Primitive::Char),
            "bool" => Some(Primitive::Bool),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Type {
    Var(TypeVar),
    /// Single-argument arrow. Multi-argument functions are curried chains.
    Fun(Box<Type>, Box<Type>),
    Tuple(Vec<Type>),
    Primitive(Primitive),
    /// The type of something that could not be typed because of an earlier
    /// error. Unifies with everything.
    #[default]
    None,
}

impl Type {
    pub fn func(param: Type, ret: Type) -> Self {
        Type::Fun(Box::new(param), Box::new(ret))
    }

    /// Build `p1 -> p2 -> ... -> ret`.
    pub fn curried(params: Vec<Type>, ret: Type) -> Self {
        params
            .into_iter()
            .rev()
            .fold(ret, |acc, param| Type::func(param, acc))
    }

    pub fn unit() -> Self {
        Type::Primitive(Primitive::Unit)
    }

    pub fn int() -> Self {
        Type::Primitive(Primitive::Int)
    }

    pub fn float() -> Self {
        Type::Primitive(Primitive::Float)
    }

    pub fn string() -> Self {
        Type::Primitive(Primitive::Str)
    }

    pub fn char() -> Self {
        Type::Primitive(Primitive::Char)
    }

    pub fn bool() -> Self {
        Type::Primitive(Primitive::Bool)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Type::None)
    }

    /// Number of arrows along the spine of this type.
    pub fn arity(&self) -> usize {
        match self {
            Type::Fun(_, ret) => 1 + ret.arity(),
            _ => 0,
        }
    }

    pub fn free_type_vars(&self) -> HashSet<TypeVar> {
        let mut set = HashSet::new();
        self.collect_vars(&mut set);
        set
    }

    fn collect_vars(&self, set: &mut HashSet<TypeVar>) {
        match self {
            Type::Var(v) => {
                set.insert(*v);
            }
            Type::Fun(param, ret) => {
                param.collect_vars(set);
                ret.collect_vars(set);
            }
            Type::Tuple(items) => items.iter().for_each(|item| item.collect_vars(set)),
            Type::Primitive(_) | Type::None => {}
        }
    }

    /// Does `var` appear anywhere inside this type?
    pub fn occurs(&self, var: TypeVar) -> bool {
        match self {
            Type::Var(v) => *v == var,
            Type::Fun(param, ret) => param.occurs(var) || ret.occurs(var),
            Type::Tuple(items) => items.iter().any(|item| item.occurs(var)),
            Type::Primitive(_) | Type::None => false,
        }
    }

    /// Render with raw variable ids (`'t3`). Used in internal diagnostics.
    pub fn pretty(&self) -> String {
        self.render(&|v| v.to_string())
    }

    /// Render with variables renamed to `'a`, `'b`, ... in order of first
    /// appearance. Two alpha-equivalent types render identically.
    pub fn normalized(&self) -> String {
        let mut order = Vec::new();
        self.vars_in_order(&mut order);
        let names: HashMap<TypeVar, String> = order
            .into_iter()
            .enumerate()
            .map(|(index, var)| (var, var_name(index)))
            .collect();
        self.render(&|v| names.get(&v).cloned().unwrap_or_else(|| v.to_string()))
    }

    fn vars_in_order(&self, order: &mut Vec<TypeVar>) {
        match self {
            Type::Var(v) => {
                if !order.contains(v) {
                    order.push(*v);
                }
            }
            Type::Fun(param, ret) => {
                param.vars_in_order(order);
                ret.vars_in_order(order);
            }
            Type::Tuple(items) => items.iter().for_each(|item| item.vars_in_order(order)),
            Type::Primitive(_) | Type::None => {}
        }
    }

    fn render(&self, var: &dyn Fn(TypeVar) -> String) -> String {
        match self {
            Type::Var(v) => var(*v),
            Type::Primitive(p) => p.name().to_string(),
            Type::None => "<error>".to_string(),
            Type::Fun(param, ret) => {
                let param_str = match **param {
                    Type::Fun(_, _) => format!("({})", param.render(var)),
                    _ => param.render(var),
                };
                format!("{} -> {}", param_str, ret.render(var))
            }
            Type::Tuple(items) if items.is_empty() => "()".to_string(),
            Type::Tuple(items) => items
                .iter()
                .map(|item| match item {
                    Type::Fun(_, _) | Type::Tuple(_) => format!("({})", item.render(var)),
                    _ => item.render(var),
                })
                .collect::<Vec<_>>()
                .join(" * "),
        }
    }
}

/// `'a`..`'z`, then `'a1`, `'b1`, ...
fn var_name(index: usize) -> String {
    let letter = (b'a' + (index % 26) as u8) as char;
    match index / 26 {
        0 => format!("'{letter}"),
        round => format!("'{letter}{round}"),
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.pretty())
    }
}

/// `forall vars. ty`. Produced by generalization, consumed by instantiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeScheme {
    pub vars: Vec<TypeVar>,
    pub ty: Type,
}

impl TypeScheme {
    pub fn monomorphic(ty: Type) -> Self {
        TypeScheme {
            vars: Vec::new(),
            ty,
        }
    }

    pub fn polymorphic(vars: Vec<TypeVar>, ty: Type) -> Self {
        TypeScheme { vars, ty }
    }

    pub fn is_monomorphic(&self) -> bool {
        self.vars.is_empty()
    }

    /// Variables of the body that are not quantified.
    pub fn free_type_vars(&self) -> HashSet<TypeVar> {
        let mut free = self.ty.free_type_vars();
        for var in &self.vars {
            free.remove(var);
        }
        free
    }
}

impl fmt::Display for TypeScheme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.ty.normalized())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_type_vars_concrete() {
        let ty = Type::func(Type::int(), Type::string());
        assert!(ty.free_type_vars().is_empty());
    }

    #[test]
    fn test_free_type_vars_tuple() {
        let ty = Type::Tuple(vec![
            Type::Var(TypeVar(0)),
            Type::func(Type::Var(TypeVar(1)), Type::bool()),
        ]);
        let free = ty.free_type_vars();
        assert_eq!(free.len(), 2);
        assert!(free.contains(&TypeVar(0)));
        assert!(free.contains(&TypeVar(1)));
    }

    #[test]
    fn test_occurs() {
        let var = TypeVar(0);
        assert!(Type::Var(var).occurs(var));
        assert!(Type::func(Type::int(), Type::Var(var)).occurs(var));
        assert!(Type::Tuple(vec![Type::int(), Type::Var(var)]).occurs(var));
        assert!(!Type::Var(TypeVar(1)).occurs(var));
        assert!(!Type::None.occurs(var));
    }

    #[test]
    fn test_curried() {
        let ty = Type::curried(vec![Type::int(), Type::bool()], Type::string());
        assert_eq!(
            ty,
            Type::func(Type::int(), Type::func(Type::bool(), Type::string()))
        );
        assert_eq!(ty.arity(), 2);
        assert_eq!(Type::curried(Vec::new(), Type::unit()), Type::unit());
    }

    #[test]
    fn test_pretty_print_simple() {
        assert_eq!(Type::int().pretty(), "int");
        assert_eq!(Type::string().pretty(), "string");
        assert_eq!(Type::unit().pretty(), "unit");
        assert_eq!(Type::None.pretty(), "<error>");
    }

    #[test]
    fn test_pretty_print_nested_function() {
        let ty = Type::func(Type::func(Type::int(), Type::int()), Type::string());
        assert_eq!(ty.pretty(), "(int -> int) -> string");
    }

    #[test]
    fn test_pretty_print_tuple() {
        let ty = Type::Tuple(vec![
            Type::int(),
            Type::Tuple(vec![Type::bool(), Type::char()]),
            Type::func(Type::int(), Type::int()),
        ]);
        assert_eq!(ty.pretty(), "int * (bool * char) * (int -> int)");
    }

    #[test]
    fn test_normalized_renames_in_order() {
        let ty = Type::func(
            Type::Var(TypeVar(7)),
            Type::func(Type::Var(TypeVar(3)), Type::Var(TypeVar(7))),
        );
        assert_eq!(ty.normalized(), "'a -> 'b -> 'a");
    }

    #[test]
    fn test_scheme_free_vars_excludes_quantified() {
        let scheme = TypeScheme::polymorphic(
            vec![TypeVar(0)],
            Type::func(Type::Var(TypeVar(0)), Type::Var(TypeVar(1))),
        );
        let free = scheme.free_type_vars();
        assert_eq!(free.len(), 1);
        assert!(free.contains(&TypeVar(1)));
    }
}
