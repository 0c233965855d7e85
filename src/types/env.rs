use std::collections::HashSet;

use im::hashmap::HashMap;

use super::subst::Substitution;
use super::ty::{TypeScheme, TypeVar};

/// The typing context: identifier name to type scheme.
///
/// Entering a scope is [`TypeEnv::extend`], which returns a new environment
/// and leaves `self` untouched; leaving the scope is dropping the copy. The
/// backing map is persistent, so extension shares structure with the parent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeEnv {
    bindings: HashMap<String, TypeScheme>,
}

impl TypeEnv {
    pub fn empty() -> Self {
        TypeEnv {
            bindings: HashMap::new(),
        }
    }

    pub fn with_bindings(bindings: Vec<(String, TypeScheme)>) -> Self {
        TypeEnv {
            bindings: bindings.into_iter().collect(),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&TypeScheme> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn extend(&self, name: String, scheme: TypeScheme) -> TypeEnv {
        TypeEnv {
            bindings: self.bindings.update(name, scheme),
        }
    }

    pub fn extend_many(&self, bindings: Vec<(String, TypeScheme)>) -> TypeEnv {
        let mut new_bindings = self.bindings.clone();
        for (name, scheme) in bindings {
            new_bindings.insert(name, scheme);
        }
        TypeEnv {
            bindings: new_bindings,
        }
    }

    /// Add a binding in place. Only used at the top level, where bindings
    /// accumulate across declarations.
    pub fn insert(&mut self, name: String, scheme: TypeScheme) {
        self.bindings.insert(name, scheme);
    }

    /// Free variables of every scheme, after resolving them through `subst`.
    ///
    /// These are the variables still live in an enclosing scope, which
    /// generalization must leave alone.
    pub fn free_type_vars(&self, subst: &Substitution) -> HashSet<TypeVar> {
        let mut free = HashSet::new();
        for scheme in self.bindings.values() {
            free.extend(subst.apply_scheme(scheme).free_type_vars());
        }
        free
    }

    /// One past the highest type variable mentioned anywhere in the
    /// environment, quantified or free.
    pub fn next_unused_var(&self) -> u32 {
        self.bindings
            .values()
            .flat_map(|scheme| {
                scheme
                    .vars
                    .iter()
                    .copied()
                    .chain(scheme.ty.free_type_vars())
                    .collect::<Vec<_>>()
            })
            .map(|TypeVar(id)| id + 1)
            .max()
            .unwrap_or(0)
    }

    /// Bindings sorted by name, for stable listings.
    pub fn sorted(&self) -> Vec<(&String, &TypeScheme)> {
        let mut entries: Vec<_> = self.bindings.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}
