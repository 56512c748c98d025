//! Array element refinement: `flatten`, `product`, `zip`, `compact`.
//!
//! These fire on the underlying applied Array, so tuple receivers arrive
//! here already projected through `underlying()` with their element union.

use crate::args::DispatchArgs;
use crate::ctx::DispatchCtx;
use crate::dispatcher::dispatch;
use crate::result::DispatchResult;
use rbz_common::TypeId;
use rbz_symbols::{core_classes, well_known_names};
use rbz_types::{LiteralValue, Type, lattice, ops};

/// The receiver's element type, when it is array-like.
fn receiver_elem(ctx: &DispatchCtx, args: &DispatchArgs) -> Option<TypeId> {
    element_of(ctx, args.this_type)
}

fn element_of(ctx: &DispatchCtx, ty: TypeId) -> Option<TypeId> {
    match ctx.types.ty(ty) {
        Type::Applied { class, targs } if class == core_classes::ARRAY && !targs.is_empty() => {
            Some(targs[0])
        }
        Type::Tuple { elems } => Some(
            elems
                .iter()
                .copied()
                .reduce(|a, b| lattice::any(ctx.types, ctx.symbols, a, b))
                .unwrap_or(TypeId::BOTTOM),
        ),
        Type::Class(class) if class == core_classes::ARRAY => Some(TypeId::UNTYPED),
        _ => None,
    }
}

/// `array.flatten(depth = infinite)`: descend through nested arrays and
/// tuples, consulting a synthetic `to_ary` before recursing, then rewrap.
pub(super) fn flatten(ctx: &DispatchCtx, args: &DispatchArgs, result: &mut DispatchResult) {
    let Some(elem) = receiver_elem(ctx, args) else {
        return;
    };
    // A negative literal depth flattens all the way down; so does no depth.
    let depth = match args.pos_args().first().map(|a| ctx.types.ty(a.ty)) {
        Some(Type::Literal {
            value: LiteralValue::Integer(d),
            ..
        }) => {
            if d < 0 {
                i64::MAX
            } else {
                d
            }
        }
        Some(_) => return, // dynamic depth: fall back to the declared type
        None => i64::MAX,
    };
    let flattened = flatten_element(ctx, args, elem, depth);
    result.return_type = ctx.types.array_of(flattened);
}

fn flatten_element(ctx: &DispatchCtx, args: &DispatchArgs, ty: TypeId, depth: i64) -> TypeId {
    if depth <= 0 {
        return ty;
    }
    match ctx.types.ty(ty) {
        Type::Tuple { elems } => elems
            .iter()
            .map(|&e| flatten_element(ctx, args, e, depth - 1))
            .reduce(|a, b| lattice::any(ctx.types, ctx.symbols, a, b))
            .unwrap_or(TypeId::BOTTOM),
        Type::Applied { class, targs } if class == core_classes::ARRAY && !targs.is_empty() => {
            flatten_element(ctx, args, targs[0], depth - 1)
        }
        Type::Or { left, right } => {
            let l = flatten_element(ctx, args, left, depth);
            let r = flatten_element(ctx, args, right, depth);
            lattice::any(ctx.types, ctx.symbols, l, r)
        }
        _ => {
            // Not visibly an array: ask the element itself via `to_ary`.
            let mut inner_args = args.with_this_type(ty);
            inner_args.name = well_known_names::TO_ARY;
            inner_args.self_type = ty;
            inner_args.full_type = ty;
            inner_args.num_pos_args = 0;
            inner_args.args = Vec::new();
            inner_args.block = None;
            inner_args.suppress_errors = true;
            let inner = dispatch(ctx, ty, &inner_args);
            if inner.main.method.is_some() && !ctx.types.is_untyped(inner.return_type) {
                flatten_element(ctx, args, inner.return_type, depth - 1)
            } else {
                ty
            }
        }
    }
}

/// `array.product(others...)`: an array of tuples, one component per input.
pub(super) fn product(ctx: &DispatchCtx, args: &DispatchArgs, result: &mut DispatchResult) {
    let Some(elem) = receiver_elem(ctx, args) else {
        return;
    };
    let mut components = vec![elem];
    for arg in args.pos_args() {
        let Some(other) = element_of(ctx, arg.ty) else {
            return; // a non-array argument: leave the declared type
        };
        components.push(other);
    }
    result.return_type = ctx.types.array_of(ctx.types.tuple(components));
}

/// `array.zip(others...)`: like `product`, but the companions run out and
/// contribute nil.
pub(super) fn zip(ctx: &DispatchCtx, args: &DispatchArgs, result: &mut DispatchResult) {
    let Some(elem) = receiver_elem(ctx, args) else {
        return;
    };
    let mut components = vec![elem];
    for arg in args.pos_args() {
        let Some(other) = element_of(ctx, arg.ty) else {
            return;
        };
        components.push(lattice::any(ctx.types, ctx.symbols, other, TypeId::NIL));
    }
    result.return_type = ctx.types.array_of(ctx.types.tuple(components));
}

/// `array.compact`: the element type without nil.
pub(super) fn compact(ctx: &DispatchCtx, args: &DispatchArgs, result: &mut DispatchResult) {
    let Some(elem) = receiver_elem(ctx, args) else {
        return;
    };
    result.return_type = ctx
        .types
        .array_of(ops::drop_nil(ctx.types, ctx.symbols, elem));
}
