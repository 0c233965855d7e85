use thiserror::Error;

use super::subst::Substitution;
use super::ty::{Type, TypeVar};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnifyError {
    #[error("cannot unify {expected} with {found}")]
    Mismatch { expected: Type, found: Type },
    #[error("cannot unify {expected} with {found}: tuples of different arity")]
    TupleArity { expected: Type, found: Type },
    #[error("occurs check: cannot construct infinite type {var} = {ty}")]
    OccursCheck { var: TypeVar, ty: Type },
}

/// Unify two types, extending `subst` so that both become equal.
///
/// Both sides are resolved against `subst` at every step, so callers may pass
/// raw types. There is no union-find; resolution is by re-application.
///
/// ```text
/// unify(int, int)                     = ok
/// unify('t0, int)                     = ['t0 := int]
/// unify('t0 -> 't1, int -> bool)      = ['t0 := int, 't1 := bool]
/// unify('t0 -> 't0, int -> 't1)       = ['t0 := int, 't1 := int]
/// unify(int * int, int)               = Mismatch
/// unify(int, int * int)               = Mismatch
/// unify(int * int, int * int * int)   = TupleArity
/// unify('t0, 't0 -> int)              = OccursCheck
/// unify(<error>, anything)            = ok
/// ```
///
/// On failure `subst` keeps whatever bindings were made before the failing
/// sub-term. Callers continue with a best-effort type.
pub fn unify(t1: &Type, t2: &Type, subst: &mut Substitution) -> Result<(), UnifyError> {
    let t1 = subst.apply(t1);
    let t2 = subst.apply(t2);

    match (&t1, &t2) {
        (Type::None, _) | (_, Type::None) => Ok(()),

        (Type::Primitive(a), Type::Primitive(b)) if a == b => Ok(()),

        (Type::Var(v), other) | (other, Type::Var(v)) => subst.bind(*v, other),

        (Type::Fun(p1, r1), Type::Fun(p2, r2)) => {
            unify(p1, p2, subst)?;
            // `unify` re-applies the grown substitution to r1/r2
            unify(r1, r2, subst)
        }

        (Type::Tuple(xs), Type::Tuple(ys)) => {
            if xs.len() != ys.len() {
                return Err(UnifyError::TupleArity {
                    expected: t1.clone(),
                    found: t2.clone(),
                });
            }
            xs.iter()
                .zip(ys.iter())
                .try_for_each(|(x, y)| unify(x, y, subst))
        }

        _ => Err(UnifyError::Mismatch {
            expected: t1.clone(),
            found: t2.clone(),
        }),
    }
}
