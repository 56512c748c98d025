//! Formal-parameter types without a full dispatch.
//!
//! Control-flow analysis calls this to learn what a method would accept,
//! e.g. to type the assignment in `x.foo = value` before dispatching it.

use crate::ctx::DispatchCtx;
use rbz_common::{NameId, TypeId};
use rbz_types::{Type, glb, lattice, ops};

/// The tuple of non-block formal-parameter types `name` accepts on `ty`, or
/// `None` when the method cannot be resolved. Union receivers meet their
/// sides, intersections join them, untyped absorbs.
pub fn get_call_arguments(ctx: &DispatchCtx, ty: TypeId, name: NameId) -> Option<TypeId> {
    match ctx.types.ty(ty) {
        Type::Untyped { .. } => Some(TypeId::UNTYPED),
        Type::Or { left, right } => {
            let l = get_call_arguments(ctx, left, name)?;
            let r = get_call_arguments(ctx, right, name)?;
            Some(glb(ctx.types, ctx.symbols, l, r))
        }
        Type::And { left, right } => {
            match (
                get_call_arguments(ctx, left, name),
                get_call_arguments(ctx, right, name),
            ) {
                (Some(l), Some(r)) => Some(lattice::any(ctx.types, ctx.symbols, l, r)),
                (Some(l), None) => Some(l),
                (None, Some(r)) => Some(r),
                (None, None) => None,
            }
        }
        Type::Class(class) => arguments_for_class(ctx, class, &[], name),
        Type::Applied { class, targs } => arguments_for_class(ctx, class, &targs, name),
        Type::Literal { .. } | Type::Shape { .. } | Type::Tuple { .. } => {
            let underlying = ops::underlying(ctx.types, ctx.symbols, ty);
            get_call_arguments(ctx, underlying, name)
        }
        _ => None,
    }
}

fn arguments_for_class(
    ctx: &DispatchCtx,
    class: rbz_common::ClassId,
    targs: &[TypeId],
    name: NameId,
) -> Option<TypeId> {
    let method_id = ctx.symbols.find_member_transitive(class, name)?;
    let method = ctx.symbols.method(method_id);
    let elems: Vec<TypeId> = method
        .formals()
        .iter()
        .map(|formal| {
            let seen =
                ops::result_type_as_seen_from(ctx.types, ctx.symbols, formal.ty, class, targs);
            if formal.is_repeated() && !formal.is_keyword() {
                ctx.types.array_of(seen)
            } else {
                seen
            }
        })
        .collect();
    Some(ctx.types.tuple(elems))
}
