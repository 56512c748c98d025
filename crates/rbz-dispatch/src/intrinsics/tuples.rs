//! Tuple operations: `[]`, `first`, `last`, `min`, `max`, `to_a`, `concat`.

use crate::args::DispatchArgs;
use crate::ctx::DispatchCtx;
use crate::result::DispatchResult;
use rbz_common::TypeId;
use rbz_types::{LiteralValue, Type, lattice, ops};

fn receiver_elems(ctx: &DispatchCtx, args: &DispatchArgs) -> Option<Vec<TypeId>> {
    match ctx.types.ty(args.this_type) {
        Type::Tuple { elems } => Some(elems),
        _ => None,
    }
}

fn fold_any(ctx: &DispatchCtx, elems: &[TypeId]) -> TypeId {
    elems
        .iter()
        .copied()
        .reduce(|a, b| lattice::any(ctx.types, ctx.symbols, a, b))
        .unwrap_or(TypeId::NIL)
}

/// `tuple[i]`: exact element for an integer literal (negative wraps,
/// out-of-bounds is nil); otherwise any element or nil.
pub(super) fn square_brackets(ctx: &DispatchCtx, args: &DispatchArgs, result: &mut DispatchResult) {
    let Some(elems) = receiver_elems(ctx, args) else {
        return;
    };
    let Some(index_arg) = args.pos_args().first() else {
        return;
    };
    let literal_index = match ctx.types.ty(index_arg.ty) {
        Type::Literal {
            value: LiteralValue::Integer(i),
            ..
        } => Some(i),
        _ => None,
    };
    let Some(mut index) = literal_index else {
        let anything = fold_any(ctx, &elems);
        result.return_type = lattice::any(ctx.types, ctx.symbols, anything, TypeId::NIL);
        return;
    };
    if index < 0 {
        index += elems.len() as i64;
    }
    result.return_type = if index >= 0 && (index as usize) < elems.len() {
        elems[index as usize]
    } else {
        TypeId::NIL
    };
}

pub(super) fn first(ctx: &DispatchCtx, args: &DispatchArgs, result: &mut DispatchResult) {
    if let Some(elems) = receiver_elems(ctx, args) {
        result.return_type = elems.first().copied().unwrap_or(TypeId::NIL);
    }
}

pub(super) fn last(ctx: &DispatchCtx, args: &DispatchArgs, result: &mut DispatchResult) {
    if let Some(elems) = receiver_elems(ctx, args) {
        result.return_type = elems.last().copied().unwrap_or(TypeId::NIL);
    }
}

/// `min`/`max` on a known tuple: some element (or nil when empty). Which one
/// is a runtime question; the union of elements is the static answer.
pub(super) fn min_max(ctx: &DispatchCtx, args: &DispatchArgs, result: &mut DispatchResult) {
    if let Some(elems) = receiver_elems(ctx, args) {
        result.return_type = if elems.is_empty() {
            TypeId::NIL
        } else {
            fold_any(ctx, &elems)
        };
    }
}

pub(super) fn to_a(_ctx: &DispatchCtx, args: &DispatchArgs, result: &mut DispatchResult) {
    result.return_type = args.this_type;
}

/// `tuple.concat(...)`: a longer tuple when every argument is a tuple,
/// otherwise an array of everything.
pub(super) fn concat(ctx: &DispatchCtx, args: &DispatchArgs, result: &mut DispatchResult) {
    let Some(mut elems) = receiver_elems(ctx, args) else {
        return;
    };
    for arg in args.pos_args() {
        match ctx.types.ty(arg.ty) {
            Type::Tuple { elems: more } => elems.extend(more),
            _ => {
                let mut union = fold_any(ctx, &elems);
                for other in args.pos_args() {
                    let elem = match ctx.types.ty(other.ty) {
                        Type::Tuple { elems: more } => fold_any(ctx, &more),
                        Type::Applied { class, targs }
                            if class == rbz_symbols::core_classes::ARRAY && !targs.is_empty() =>
                        {
                            targs[0]
                        }
                        _ => TypeId::UNTYPED,
                    };
                    union = lattice::any(ctx.types, ctx.symbols, union, elem);
                }
                result.return_type = ctx
                    .types
                    .array_of(ops::widen(ctx.types, ctx.symbols, union));
                return;
            }
        }
    }
    result.return_type = ctx.types.tuple(elems);
}
