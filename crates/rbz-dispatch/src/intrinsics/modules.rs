//! `Module#===`: statically decidable case equality.

use crate::args::DispatchArgs;
use crate::ctx::DispatchCtx;
use crate::result::DispatchResult;
use rbz_common::TypeId;
use rbz_types::{glb, is_subtype, ops};

/// `Klass === value` is `true` when the value's type is a subtype of the
/// represented class, `false` when the two are provably disjoint, and a
/// plain boolean otherwise.
pub(super) fn triple_eq(ctx: &DispatchCtx, args: &DispatchArgs, result: &mut DispatchResult) {
    let Some(represented) = ops::represented_class(ctx.types, ctx.symbols, args.this_type) else {
        result.return_type = ctx.types.boolean();
        return;
    };
    let Some(value) = args.pos_args().first() else {
        result.return_type = ctx.types.boolean();
        return;
    };
    if ctx.types.is_untyped(value.ty) {
        result.return_type = ctx.types.boolean();
        return;
    }

    let class_type = ops::external_type(ctx.types, ctx.symbols, represented);
    if is_subtype(ctx.types, ctx.symbols, value.ty, class_type) {
        result.return_type = ctx.types.literal_boolean(true);
    } else if glb(ctx.types, ctx.symbols, value.ty, class_type) == TypeId::BOTTOM {
        result.return_type = ctx.types.literal_boolean(false);
    } else {
        result.return_type = ctx.types.boolean();
    }
}
