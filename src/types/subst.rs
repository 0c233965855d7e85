use std::collections::HashMap;

use tracing::trace;

use super::ty::{Type, TypeScheme, TypeVar};
use super::unify::UnifyError;

/// A finite mapping from type variables to types.
///
/// Bindings are only added through [`Substitution::bind`], which keeps the
/// mapping idempotent: no bound variable appears in any value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitution(HashMap<TypeVar, Type>);

impl Substitution {
    pub fn empty() -> Self {
        Substitution(HashMap::new())
    }

    pub fn singleton(var: TypeVar, ty: Type) -> Self {
        let mut map = HashMap::new();
        map.insert(var, ty);
        Substitution(map)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, var: TypeVar) -> Option<&Type> {
        self.0.get(&var)
    }

    /// Rewrite every bound variable in `ty`.
    ///
    /// Substituted results are themselves rewritten, so chains like
    /// `'t0 := 't1, 't1 := int` resolve `'t0` to `int` in one call.
    pub fn apply(&self, ty: &Type) -> Type {
        match ty {
            Type::Var(v) => match self.0.get(v) {
                Some(bound) => self.apply(bound),
                None => ty.clone(),
            },
            Type::Fun(param, ret) => Type::func(self.apply(param), self.apply(ret)),
            Type::Tuple(items) => Type::Tuple(items.iter().map(|item| self.apply(item)).collect()),
            Type::Primitive(_) | Type::None => ty.clone(),
        }
    }

    /// Rewrite bound variables in `ty` exactly once, without following
    /// chains into the substituted results.
    ///
    /// This is what renaming wants: `'t0 := 't0` must not loop.
    pub fn rename(&self, ty: &Type) -> Type {
        match ty {
            Type::Var(v) => self.0.get(v).cloned().unwrap_or_else(|| ty.clone()),
            Type::Fun(param, ret) => Type::func(self.rename(param), self.rename(ret)),
            Type::Tuple(items) => Type::Tuple(items.iter().map(|item| self.rename(item)).collect()),
            Type::Primitive(_) | Type::None => ty.clone(),
        }
    }

    /// Apply to the free part of a scheme, leaving quantified variables alone.
    pub fn apply_scheme(&self, scheme: &TypeScheme) -> TypeScheme {
        if scheme.vars.iter().all(|var| !self.0.contains_key(var)) {
            return TypeScheme {
                vars: scheme.vars.clone(),
                ty: self.apply(&scheme.ty),
            };
        }

        let mut restricted = self.clone();
        for var in &scheme.vars {
            restricted.0.remove(var);
        }
        TypeScheme {
            vars: scheme.vars.clone(),
            ty: restricted.apply(&scheme.ty),
        }
    }

    /// `self ∘ into`: re-apply `self` to every value of `into`, then add all
    /// of `self`'s own bindings.
    ///
    /// The order matters: skipping the first step leaves values of `into`
    /// that still mention variables `self` has since resolved.
    pub fn compose(&self, into: &Substitution) -> Substitution {
        let mut result: HashMap<TypeVar, Type> = into
            .0
            .iter()
            .map(|(var, ty)| (*var, self.apply(ty)))
            .collect();

        for (var, ty) in &self.0 {
            result.insert(*var, ty.clone());
        }

        Substitution(result)
    }

    /// Record `var := ty`, running the occurs check first.
    ///
    /// Binding a variable to itself is a no-op.
    pub fn bind(&mut self, var: TypeVar, ty: &Type) -> Result<(), UnifyError> {
        let ty = self.apply(ty);
        if ty == Type::Var(var) {
            return Ok(());
        }
        if ty.occurs(var) {
            return Err(UnifyError::OccursCheck { var, ty });
        }

        trace!(%var, ty = %ty, "bind");
        *self = Substitution::singleton(var, ty).compose(self);
        Ok(())
    }
}

/// Build a substitution from raw bindings, e.g. quantified variables to
/// fresh ones. No occurs check is run.
impl FromIterator<(TypeVar, Type)> for Substitution {
    fn from_iter<I: IntoIterator<Item = (TypeVar, Type)>>(iter: I) -> Self {
        Substitution(iter.into_iter().collect())
    }
}
