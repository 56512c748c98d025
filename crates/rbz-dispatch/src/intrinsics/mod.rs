//! Intrinsic handlers.
//!
//! Each handler is a pure function over `(ctx, args, &mut result)`; it may
//! set the result's return type, queue errors on the main component, and
//! replace the constraint. A handler that leaves the return type unset falls
//! back to the ordinary declared-return path.
//!
//! The `(owner, instance|singleton, name) -> tag` registry itself lives in
//! the symbol crate and is applied at core-load time; here the tags fan out
//! to handlers.

mod arrays;
mod classes;
mod magic;
mod modules;
mod shapes;
mod tuples;
mod type_syntax;

use crate::args::DispatchArgs;
use crate::ctx::DispatchCtx;
use crate::result::DispatchResult;
use rbz_symbols::Intrinsic;
use rbz_types::Constraint;
use tracing::trace;

pub(crate) fn call_intrinsic(
    intrinsic: Intrinsic,
    ctx: &DispatchCtx,
    args: &DispatchArgs,
    result: &mut DispatchResult,
    constr: &mut Constraint,
) {
    trace!(?intrinsic, "intrinsic");
    match intrinsic {
        Intrinsic::TUntyped => type_syntax::t_untyped(ctx, args, result),
        Intrinsic::TNoreturn => type_syntax::t_noreturn(ctx, args, result),
        Intrinsic::TNilable => type_syntax::t_nilable(ctx, args, result),
        Intrinsic::TAny => type_syntax::t_any(ctx, args, result),
        Intrinsic::TAll => type_syntax::t_all(ctx, args, result),
        Intrinsic::TMust => type_syntax::t_must(ctx, args, result),
        Intrinsic::TRevealType => type_syntax::t_reveal_type(ctx, args, result),
        Intrinsic::TProc => type_syntax::t_proc(ctx, args, result),

        Intrinsic::GenericSquareBrackets => classes::generic_square_brackets(ctx, args, result),
        Intrinsic::ObjectClass => classes::object_class(ctx, args, result),
        Intrinsic::ObjectSingletonClass => classes::object_singleton_class(ctx, args, result),
        Intrinsic::ClassNew => classes::class_new(ctx, args, result, constr),

        Intrinsic::MagicBuildHash => magic::build_hash(ctx, args, result),
        Intrinsic::MagicBuildArray => magic::build_array(ctx, args, result),
        Intrinsic::MagicBuildRange => magic::build_range(ctx, args, result),
        Intrinsic::MagicExpandSplat => magic::expand_splat(ctx, args, result),
        Intrinsic::MagicCallWithSplat => magic::call_with_splat(ctx, args, result, constr),
        Intrinsic::MagicCallWithBlock => magic::call_with_block(ctx, args, result, constr),
        Intrinsic::MagicCallWithSplatAndBlock => {
            magic::call_with_splat_and_block(ctx, args, result, constr)
        }
        Intrinsic::MagicSplat => magic::splat(ctx, args, result),
        Intrinsic::MagicSelfNew => magic::self_new(ctx, args, result, constr),
        Intrinsic::MagicSuggestType => magic::suggest_type(ctx, args, result),

        Intrinsic::ShapeSquareBrackets => shapes::square_brackets(ctx, args, result),
        Intrinsic::ShapeSquareBracketsEq => shapes::square_brackets_eq(ctx, args, result),
        Intrinsic::ShapeMerge => shapes::merge(ctx, args, result),
        Intrinsic::ShapeToHash => shapes::to_hash(ctx, args, result),

        Intrinsic::TupleSquareBrackets => tuples::square_brackets(ctx, args, result),
        Intrinsic::TupleFirst => tuples::first(ctx, args, result),
        Intrinsic::TupleLast => tuples::last(ctx, args, result),
        Intrinsic::TupleMin => tuples::min_max(ctx, args, result),
        Intrinsic::TupleMax => tuples::min_max(ctx, args, result),
        Intrinsic::TupleToA => tuples::to_a(ctx, args, result),
        Intrinsic::TupleConcat => tuples::concat(ctx, args, result),

        Intrinsic::ArrayFlatten => arrays::flatten(ctx, args, result),
        Intrinsic::ArrayProduct => arrays::product(ctx, args, result),
        Intrinsic::ArrayZip => arrays::zip(ctx, args, result),
        Intrinsic::ArrayCompact => arrays::compact(ctx, args, result),

        Intrinsic::ModuleTripleEq => modules::triple_eq(ctx, args, result),
    }
}
