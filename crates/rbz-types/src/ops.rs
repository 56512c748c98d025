//! Type operations consumed by the dispatcher.

use crate::constraint::Constraint;
use crate::lattice;
use crate::store::TypeStore;
use crate::types::Type;
use rbz_common::{ClassId, TypeId};
use rbz_symbols::{SymbolTable, core_classes};

/// Structure-preserving rewrite. `f` runs pre-order on every node; returning
/// `Some` replaces the node wholesale, `None` recurses into children.
pub fn transform(store: &TypeStore, t: TypeId, f: &mut dyn FnMut(&Type) -> Option<TypeId>) -> TypeId {
    let node = store.ty(t);
    if let Some(replaced) = f(&node) {
        return replaced;
    }
    match node {
        Type::Applied { class, targs } => {
            let new_targs: Vec<TypeId> = targs.iter().map(|&a| transform(store, a, f)).collect();
            store.applied(class, new_targs)
        }
        Type::Shape { keys, values } => {
            let new_values: Vec<TypeId> = values.iter().map(|&v| transform(store, v, f)).collect();
            store.shape(keys, new_values)
        }
        Type::Tuple { elems } => {
            let new_elems: Vec<TypeId> = elems.iter().map(|&e| transform(store, e, f)).collect();
            store.tuple(new_elems)
        }
        Type::Or { left, right } => {
            let l = transform(store, left, f);
            let r = transform(store, right, f);
            store.intern(Type::Or { left: l, right: r })
        }
        Type::And { left, right } => {
            let l = transform(store, left, f);
            let r = transform(store, right, f);
            store.intern(Type::And { left: l, right: r })
        }
        Type::Meta { wrapped } => {
            let w = transform(store, wrapped, f);
            store.meta(w)
        }
        _ => t,
    }
}

/// The class a value of `t` is an instance of, when that is a single nominal
/// class. Unions, intersections, and non-value types have none.
pub fn underlying_class(store: &TypeStore, _symbols: &SymbolTable, t: TypeId) -> Option<ClassId> {
    match store.ty(t) {
        Type::Class(c) => Some(c),
        Type::Applied { class, .. } => Some(class),
        Type::Literal { underlying, .. } => Some(underlying),
        Type::Shape { .. } => Some(core_classes::SHAPE),
        Type::Tuple { .. } => Some(core_classes::TUPLE),
        _ => None,
    }
}

/// The proxy projection: literals to their class, tuples to an applied
/// Array, shapes to an applied Hash. Non-proxies project to themselves.
pub fn underlying(store: &TypeStore, symbols: &SymbolTable, t: TypeId) -> TypeId {
    match store.ty(t) {
        Type::Literal { underlying, .. } => store.class_type(underlying),
        Type::Tuple { elems } => {
            let elem = elems
                .iter()
                .copied()
                .reduce(|a, b| lattice::any(store, symbols, a, b))
                .unwrap_or(TypeId::BOTTOM);
            store.array_of(elem)
        }
        Type::Shape { keys, values } => {
            if keys.is_empty() {
                return store.hash_of_untyped();
            }
            let key = keys
                .iter()
                .map(|&k| drop_literal(store, k))
                .reduce(|a, b| lattice::any(store, symbols, a, b))
                .unwrap_or(TypeId::UNTYPED);
            let value = values
                .iter()
                .copied()
                .reduce(|a, b| lattice::any(store, symbols, a, b))
                .unwrap_or(TypeId::UNTYPED);
            store.hash_of(key, value)
        }
        _ => t,
    }
}

/// Remove nil from a type. Returns the input unchanged when nil does not
/// inhabit it; `T.nilable(X)` becomes `X`; plain nil becomes bottom.
pub fn drop_nil(store: &TypeStore, symbols: &SymbolTable, t: TypeId) -> TypeId {
    if t == TypeId::NIL {
        return TypeId::BOTTOM;
    }
    match store.ty(t) {
        Type::Or { left, right } => {
            let l = drop_nil(store, symbols, left);
            let r = drop_nil(store, symbols, right);
            if l == left && r == right {
                t
            } else {
                lattice::any(store, symbols, l, r)
            }
        }
        _ => t,
    }
}

/// A literal type's class; other types unchanged.
pub fn drop_literal(store: &TypeStore, t: TypeId) -> TypeId {
    match store.ty(t) {
        Type::Literal { underlying, .. } => store.class_type(underlying),
        _ => t,
    }
}

/// Recursively forget literal-ness: `[Integer(1), String("x")]` widens to
/// `[Integer, String]`.
pub fn widen(store: &TypeStore, symbols: &SymbolTable, t: TypeId) -> TypeId {
    match store.ty(t) {
        Type::Literal { underlying, .. } => store.class_type(underlying),
        Type::Or { left, right } => {
            let l = widen(store, symbols, left);
            let r = widen(store, symbols, right);
            lattice::any(store, symbols, l, r)
        }
        Type::And { left, right } => {
            let l = widen(store, symbols, left);
            let r = widen(store, symbols, right);
            lattice::all(store, symbols, l, r)
        }
        Type::Tuple { elems } => {
            let widened = elems.iter().map(|&e| widen(store, symbols, e)).collect();
            store.tuple(widened)
        }
        Type::Shape { keys, values } => {
            let widened = values.iter().map(|&v| widen(store, symbols, v)).collect();
            store.shape(keys, widened)
        }
        _ => t,
    }
}

/// Erase unsolved inference state: type variables become their best current
/// approximation under `constr`.
pub fn approximate(
    store: &TypeStore,
    symbols: &SymbolTable,
    t: TypeId,
    constr: &Constraint,
) -> TypeId {
    transform(store, t, &mut |node| match node {
        Type::TypeVar { var } => Some(constr.approximation(store, symbols, *var)),
        _ => None,
    })
}

/// Substitute the self type (and attached-class markers) with `receiver`.
pub fn replace_self_type(store: &TypeStore, t: TypeId, receiver: TypeId) -> TypeId {
    transform(store, t, &mut |node| match node {
        Type::SelfTypeParam { .. } => Some(receiver),
        _ => None,
    })
}

/// View a declared type from a concrete receiver: the generic owner's type
/// members are replaced by the receiver's type arguments (or their fixed or
/// upper bounds when no argument is available).
pub fn result_type_as_seen_from(
    store: &TypeStore,
    symbols: &SymbolTable,
    t: TypeId,
    receiver_class: ClassId,
    targs: &[TypeId],
) -> TypeId {
    transform(store, t, &mut |node| match node {
        Type::LambdaParam {
            class,
            index,
            upper,
            ..
        } => {
            if !symbols.derives_from(receiver_class, *class) {
                return None;
            }
            let idx = *index as usize;
            if let Some(&arg) = targs.get(idx) {
                return Some(arg);
            }
            let member = symbols.class(*class).type_members.get(idx);
            Some(member.and_then(|m| m.fixed).unwrap_or(*upper))
        }
        _ => None,
    })
}

/// The canonical instance type of a class: plain for simple classes, applied
/// over fixed-or-untyped arguments for generic ones.
pub fn external_type(store: &TypeStore, symbols: &SymbolTable, class: ClassId) -> TypeId {
    let def = symbols.class(class);
    if def.type_members.is_empty() {
        store.class_type(class)
    } else {
        let targs = def
            .type_members
            .iter()
            .map(|m| m.fixed.unwrap_or(TypeId::UNTYPED))
            .collect();
        store.applied(class, targs)
    }
}

/// For a value used in type position (`Integer === x`, `Foo.new`): the class
/// the value represents, if it is a class object.
pub fn represented_class(store: &TypeStore, symbols: &SymbolTable, t: TypeId) -> Option<ClassId> {
    match store.ty(t) {
        Type::Class(c) | Type::Applied { class: c, .. } if symbols.is_singleton_class(c) => {
            symbols.attached_class(c)
        }
        Type::Meta { wrapped } => underlying_class(store, symbols, wrapped),
        _ => None,
    }
}

/// Return-type projection of a proc type. Bare `Proc` yields untyped;
/// non-procs yield nothing.
pub fn get_proc_return_type(store: &TypeStore, symbols: &SymbolTable, t: TypeId) -> Option<TypeId> {
    match store.ty(t) {
        Type::Applied { class, targs } if class == core_classes::PROC => targs.first().copied(),
        Type::Class(c) if c == core_classes::PROC => Some(TypeId::UNTYPED),
        Type::Untyped { .. } => Some(TypeId::UNTYPED),
        Type::Or { left, right } => {
            let l = get_proc_return_type(store, symbols, left)?;
            let r = get_proc_return_type(store, symbols, right)?;
            Some(lattice::any(store, symbols, l, r))
        }
        _ => None,
    }
}

/// Declared arity of a proc type; `None` when unknown (bare `Proc`, untyped,
/// non-proc).
pub fn get_proc_arity(store: &TypeStore, t: TypeId) -> Option<usize> {
    match store.ty(t) {
        Type::Applied { class, targs } if class == core_classes::PROC => Some(targs.len() - 1),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/ops_tests.rs"]
mod tests;
