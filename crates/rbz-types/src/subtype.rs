//! The subtype relation.
//!
//! `is_subtype` is the plain relation; `is_subtype_under_constraint`
//! additionally records bounds on type variables in the given constraint.
//! Untyped compatibility is explicit: argument matching treats untyped as
//! compatible in both directions, code that wants the strict relation asks
//! for it.

use crate::constraint::Constraint;
use crate::ops;
use crate::store::TypeStore;
use crate::types::Type;
use rbz_common::TypeId;
use rbz_symbols::SymbolTable;

/// How untyped relates to everything else.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UntypedMode {
    /// `T.untyped` is both a subtype and a supertype of every type. This is
    /// the calling convention's view.
    AlwaysCompatible,
    /// `T.untyped` only relates to itself. Used when a precise answer
    /// matters more than gradual-typing comfort.
    AlwaysIncompatible,
}

/// Plain subtype check, no inference.
pub fn is_subtype(store: &TypeStore, symbols: &SymbolTable, a: TypeId, b: TypeId) -> bool {
    let mut constr = Constraint::empty();
    is_subtype_under_constraint(store, symbols, &mut constr, a, b, UntypedMode::AlwaysCompatible)
}

/// Subtype check that records bounds for in-domain type variables.
pub fn is_subtype_under_constraint(
    store: &TypeStore,
    symbols: &SymbolTable,
    constr: &mut Constraint,
    a: TypeId,
    b: TypeId,
    mode: UntypedMode,
) -> bool {
    if a == b {
        return true;
    }
    let ta = store.ty(a);
    let tb = store.ty(b);

    // Untyped relates per the requested mode, in both directions.
    if ta.is_untyped() || tb.is_untyped() {
        return mode == UntypedMode::AlwaysCompatible;
    }
    if matches!(ta, Type::Bottom) || matches!(tb, Type::Top) {
        return true;
    }
    if matches!(ta, Type::Top) || matches!(tb, Type::Bottom) {
        return false;
    }

    // Type variables bound by the constraint's domain.
    if let Type::TypeVar { var } = tb {
        return constr.record_lower(var, a);
    }
    if let Type::TypeVar { var } = ta {
        return constr.record_upper(var, b);
    }

    // Distribute over unions and intersections. Order matters: splitting the
    // left union (and right intersection) must happen before committing to
    // one side of the right union.
    if let Type::Or { left, right } = ta {
        return is_subtype_under_constraint(store, symbols, constr, left, b, mode)
            && is_subtype_under_constraint(store, symbols, constr, right, b, mode);
    }
    if let Type::And { left, right } = tb {
        return is_subtype_under_constraint(store, symbols, constr, a, left, mode)
            && is_subtype_under_constraint(store, symbols, constr, a, right, mode);
    }
    if let Type::Or { left, right } = tb {
        return is_subtype_under_constraint(store, symbols, constr, a, left, mode)
            || is_subtype_under_constraint(store, symbols, constr, a, right, mode);
    }
    if let Type::And { left, right } = ta {
        return is_subtype_under_constraint(store, symbols, constr, left, b, mode)
            || is_subtype_under_constraint(store, symbols, constr, right, b, mode);
    }

    // Inference artifacts compare through their bounds.
    if let Type::LambdaParam { upper, .. } = ta {
        return is_subtype_under_constraint(store, symbols, constr, upper, b, mode);
    }
    if let Type::LambdaParam { lower, .. } = tb {
        return is_subtype_under_constraint(store, symbols, constr, a, lower, mode);
    }
    // Self type params only equal themselves, which `a == b` already covered.
    if matches!(ta, Type::SelfTypeParam { .. }) || matches!(tb, Type::SelfTypeParam { .. }) {
        return false;
    }

    match (&ta, &tb) {
        (Type::Meta { wrapped: wa }, Type::Meta { wrapped: wb }) => {
            is_subtype_under_constraint(store, symbols, constr, *wa, *wb, mode)
        }
        (Type::Meta { .. }, _) | (_, Type::Meta { .. }) => false,

        (Type::Void, _) | (_, Type::Void) => false,

        // Literals: distinct values never relate; a literal relates to
        // non-literals through its underlying class.
        (Type::Literal { .. }, Type::Literal { .. }) => false,
        (Type::Literal { underlying, .. }, _) => {
            let class_type = store.class_type(*underlying);
            is_subtype_under_constraint(store, symbols, constr, class_type, b, mode)
        }
        (_, Type::Literal { .. }) => false,

        // Tuples: width-rigid, element-covariant; otherwise through the
        // underlying applied Array.
        (Type::Tuple { elems: ea }, Type::Tuple { elems: eb }) => {
            ea.len() == eb.len()
                && ea.iter().zip(eb.iter()).all(|(&x, &y)| {
                    is_subtype_under_constraint(store, symbols, constr, x, y, mode)
                })
        }
        (Type::Tuple { .. }, _) => {
            let underlying = ops::underlying(store, symbols, a);
            is_subtype_under_constraint(store, symbols, constr, underlying, b, mode)
        }
        (_, Type::Tuple { .. }) => false,

        // Shapes: exact key set, covariant values; otherwise through the
        // underlying applied Hash.
        (
            Type::Shape {
                keys: ka,
                values: va,
            },
            Type::Shape {
                keys: kb,
                values: vb,
            },
        ) => {
            ka.len() == kb.len()
                && kb.iter().enumerate().all(|(bi, key)| {
                    ka.iter().position(|k| k == key).is_some_and(|ai| {
                        is_subtype_under_constraint(store, symbols, constr, va[ai], vb[bi], mode)
                    })
                })
        }
        (Type::Shape { .. }, _) => {
            let underlying = ops::underlying(store, symbols, a);
            is_subtype_under_constraint(store, symbols, constr, underlying, b, mode)
        }
        (_, Type::Shape { .. }) => false,

        // Nominal core.
        (Type::Class(ca), Type::Class(cb)) => symbols.derives_from(*ca, *cb),
        (Type::Applied { class: ca, .. }, Type::Class(cb)) => symbols.derives_from(*ca, *cb),
        (Type::Class(ca), Type::Applied { class: cb, targs }) => {
            // A bare class only fits an applied target whose arguments ask
            // for nothing.
            symbols.derives_from(*ca, *cb)
                && targs
                    .iter()
                    .all(|&t| t == TypeId::TOP || store.is_untyped(t))
        }
        (
            Type::Applied {
                class: ca,
                targs: aargs,
            },
            Type::Applied {
                class: cb,
                targs: bargs,
            },
        ) => {
            if ca == cb {
                aargs.len() == bargs.len()
                    && aargs.iter().zip(bargs.iter()).all(|(&x, &y)| {
                        is_subtype_under_constraint(store, symbols, constr, x, y, mode)
                    })
            } else {
                // Cross-class applied comparison approximates nominally; the
                // argument correspondence between unrelated generics is not
                // modeled.
                symbols.derives_from(*ca, *cb)
            }
        }

        _ => false,
    }
}

/// Whether `ty`'s underlying class derives from `class`.
pub fn derives_from_class(
    store: &TypeStore,
    symbols: &SymbolTable,
    ty: TypeId,
    class: rbz_common::ClassId,
) -> bool {
    match ops::underlying_class(store, symbols, ty) {
        Some(c) => symbols.derives_from(c, class),
        None => false,
    }
}

/// Whether nil inhabits `ty`.
pub fn is_nilable(store: &TypeStore, symbols: &SymbolTable, ty: TypeId) -> bool {
    is_subtype(store, symbols, TypeId::NIL, ty)
}

#[cfg(test)]
#[path = "tests/subtype_tests.rs"]
mod tests;
