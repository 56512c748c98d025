//! Union and intersection construction.
//!
//! `any` and `all` are the lattice joins the dispatcher merges results with;
//! `glb` is the coarse meet used by static `===` evaluation and
//! `get_call_arguments`. All three normalize: components are flattened,
//! deduplicated, and subsumed sides are dropped, so no `Or` node ever has an
//! `Or` child with the same partners.

use crate::ops;
use crate::store::TypeStore;
use crate::subtype::is_subtype;
use crate::types::Type;
use rbz_common::TypeId;
use rbz_symbols::SymbolTable;
use smallvec::SmallVec;

type Components = SmallVec<[TypeId; 8]>;

/// Least upper bound (union) of `a` and `b`.
pub fn any(store: &TypeStore, symbols: &SymbolTable, a: TypeId, b: TypeId) -> TypeId {
    if a == b {
        return a;
    }
    // Untyped absorbs unions.
    if store.is_untyped(a) || store.is_untyped(b) {
        return TypeId::UNTYPED;
    }
    if a == TypeId::BOTTOM {
        return b;
    }
    if b == TypeId::BOTTOM {
        return a;
    }

    let mut components = Components::new();
    collect_or_components(store, a, &mut components);
    collect_or_components(store, b, &mut components);
    let normalized = drop_subsumed(store, symbols, components);
    build_or(store, normalized)
}

/// Greatest lower bound (intersection) of `a` and `b`. Untyped is the
/// identity here: intersecting with it keeps the typed side.
pub fn all(store: &TypeStore, symbols: &SymbolTable, a: TypeId, b: TypeId) -> TypeId {
    if a == b {
        return a;
    }
    if store.is_untyped(a) {
        return b;
    }
    if store.is_untyped(b) {
        return a;
    }
    if a == TypeId::BOTTOM || b == TypeId::BOTTOM {
        return TypeId::BOTTOM;
    }
    if a == TypeId::TOP {
        return b;
    }
    if b == TypeId::TOP {
        return a;
    }
    if is_subtype(store, symbols, a, b) {
        return a;
    }
    if is_subtype(store, symbols, b, a) {
        return b;
    }

    let mut components = Components::new();
    collect_and_components(store, a, &mut components);
    collect_and_components(store, b, &mut components);
    let mut deduped = Components::new();
    for c in components {
        if !deduped.contains(&c) {
            deduped.push(c);
        }
    }
    build_and(store, deduped)
}

/// Coarse meet. Unlike `all`, provably-disjoint nominal types collapse to
/// bottom, which is what static `===` evaluation needs.
pub fn glb(store: &TypeStore, symbols: &SymbolTable, a: TypeId, b: TypeId) -> TypeId {
    if is_subtype(store, symbols, a, b) {
        return a;
    }
    if is_subtype(store, symbols, b, a) {
        return b;
    }
    if let Type::Or { left, right } = store.ty(a) {
        let l = glb(store, symbols, left, b);
        let r = glb(store, symbols, right, b);
        return any(store, symbols, l, r);
    }
    if let Type::Or { left, right } = store.ty(b) {
        let l = glb(store, symbols, a, left);
        let r = glb(store, symbols, a, right);
        return any(store, symbols, l, r);
    }
    let ca = ops::underlying_class(store, symbols, a);
    let cb = ops::underlying_class(store, symbols, b);
    if let (Some(ca), Some(cb)) = (ca, cb) {
        // Two unrelated proper classes have no common instances. Modules can
        // be mixed in anywhere, so they never prove disjointness.
        if !symbols.is_module(ca)
            && !symbols.is_module(cb)
            && !symbols.derives_from(ca, cb)
            && !symbols.derives_from(cb, ca)
        {
            return TypeId::BOTTOM;
        }
    }
    all(store, symbols, a, b)
}

fn collect_or_components(store: &TypeStore, t: TypeId, out: &mut Components) {
    match store.ty(t) {
        Type::Or { left, right } => {
            collect_or_components(store, left, out);
            collect_or_components(store, right, out);
        }
        _ => out.push(t),
    }
}

fn collect_and_components(store: &TypeStore, t: TypeId, out: &mut Components) {
    match store.ty(t) {
        Type::And { left, right } => {
            collect_and_components(store, left, out);
            collect_and_components(store, right, out);
        }
        _ => out.push(t),
    }
}

/// Drop any component that is a subtype of another component.
fn drop_subsumed(store: &TypeStore, symbols: &SymbolTable, components: Components) -> Components {
    let mut kept = Components::new();
    for c in components {
        if kept.contains(&c) {
            continue;
        }
        if kept.iter().any(|&k| is_subtype(store, symbols, c, k)) {
            continue;
        }
        kept.retain(|k| !is_subtype(store, symbols, *k, c));
        kept.push(c);
    }
    kept
}

fn build_or(store: &TypeStore, components: Components) -> TypeId {
    let mut iter = components.into_iter();
    let first = iter.next().unwrap_or(TypeId::BOTTOM);
    iter.fold(first, |acc, next| {
        store.intern(Type::Or {
            left: acc,
            right: next,
        })
    })
}

fn build_and(store: &TypeStore, components: Components) -> TypeId {
    let mut iter = components.into_iter();
    let first = iter.next().unwrap_or(TypeId::TOP);
    iter.fold(first, |acc, next| {
        store.intern(Type::And {
            left: acc,
            right: next,
        })
    })
}

#[cfg(test)]
#[path = "tests/lattice_tests.rs"]
mod tests;
