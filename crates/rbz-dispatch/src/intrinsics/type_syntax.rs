//! The `T` type constructors.
//!
//! These run on the `T` module's singleton and produce metatypes (types as
//! values) for the signature layer, except `T.must` and `T.reveal_type`,
//! which operate on ordinary values.

use crate::args::DispatchArgs;
use crate::ctx::DispatchCtx;
use crate::result::DispatchResult;
use crate::unwrap::unwrap_type;
use rbz_common::{ErrorBuilder, TypeId, diagnostic_codes};
use rbz_symbols::core_classes;
use rbz_types::{lattice, ops, show};

pub(super) fn t_untyped(_ctx: &DispatchCtx, _args: &DispatchArgs, result: &mut DispatchResult) {
    result.return_type = TypeId::UNTYPED;
}

pub(super) fn t_noreturn(ctx: &DispatchCtx, _args: &DispatchArgs, result: &mut DispatchResult) {
    result.return_type = ctx.types.meta(TypeId::BOTTOM);
}

pub(super) fn t_nilable(ctx: &DispatchCtx, args: &DispatchArgs, result: &mut DispatchResult) {
    let Some(arg) = args.pos_args().first() else {
        result.return_type = TypeId::UNTYPED;
        return;
    };
    let enabled = !args.suppress_errors;
    let inner = unwrap_type(ctx, args.locs.arg_loc(0), arg.ty, enabled, &mut result.main.errors);
    let nilable = lattice::any(ctx.types, ctx.symbols, inner, TypeId::NIL);
    result.return_type = ctx.types.meta(nilable);
}

pub(super) fn t_any(ctx: &DispatchCtx, args: &DispatchArgs, result: &mut DispatchResult) {
    combine(ctx, args, result, lattice::any);
}

pub(super) fn t_all(ctx: &DispatchCtx, args: &DispatchArgs, result: &mut DispatchResult) {
    combine(ctx, args, result, lattice::all);
}

fn combine(
    ctx: &DispatchCtx,
    args: &DispatchArgs,
    result: &mut DispatchResult,
    join: fn(&rbz_types::TypeStore, &rbz_symbols::SymbolTable, TypeId, TypeId) -> TypeId,
) {
    if args.pos_args().len() < 2 {
        result.return_type = TypeId::UNTYPED;
        return;
    }
    let enabled = !args.suppress_errors;
    let mut combined: Option<TypeId> = None;
    for (i, arg) in args.pos_args().iter().enumerate() {
        let inner = unwrap_type(
            ctx,
            args.locs.arg_loc(i),
            arg.ty,
            enabled,
            &mut result.main.errors,
        );
        combined = Some(match combined {
            Some(acc) => join(ctx.types, ctx.symbols, acc, inner),
            None => inner,
        });
    }
    result.return_type = ctx.types.meta(combined.unwrap_or(TypeId::UNTYPED));
}

/// `T.must(x)`: strip nil; diagnose when there was nothing to strip.
pub(super) fn t_must(ctx: &DispatchCtx, args: &DispatchArgs, result: &mut DispatchResult) {
    let Some(arg) = args.pos_args().first() else {
        result.return_type = TypeId::UNTYPED;
        return;
    };
    let enabled = !args.suppress_errors;
    if ctx.types.is_untyped(arg.ty) {
        result.return_type = TypeId::UNTYPED;
        return;
    }
    if arg.ty == TypeId::NIL {
        let builder = ErrorBuilder::new(
            enabled,
            args.locs.arg_loc(0),
            diagnostic_codes::INVALID_CAST,
            format!(
                "`{}` called on `NilClass`, which is always `nil`",
                ctx.options.nil_wrap_helper
            ),
        );
        result.main.errors.extend(builder.build());
        result.return_type = TypeId::UNTYPED;
        return;
    }
    let stripped = ops::drop_nil(ctx.types, ctx.symbols, arg.ty);
    if stripped == arg.ty {
        let builder = ErrorBuilder::new(
            enabled,
            args.locs.arg_loc(0),
            diagnostic_codes::INVALID_CAST,
            format!(
                "`{}` called on `{}`, which is never `nil`",
                ctx.options.nil_wrap_helper,
                show(ctx.types, ctx.symbols, arg.ty)
            ),
        );
        result.main.errors.extend(builder.build());
        result.return_type = arg.ty;
        return;
    }
    result.return_type = stripped;
}

/// `T.reveal_type(x)`: an informational diagnostic carrying the type; the
/// value passes through.
pub(super) fn t_reveal_type(ctx: &DispatchCtx, args: &DispatchArgs, result: &mut DispatchResult) {
    let Some(arg) = args.pos_args().first() else {
        result.return_type = TypeId::UNTYPED;
        return;
    };
    let enabled = !args.suppress_errors;
    let mut builder = ErrorBuilder::new(
        enabled,
        args.locs.arg_loc(0),
        diagnostic_codes::REVEAL_TYPE,
        format!("Revealed type: `{}`", show(ctx.types, ctx.symbols, arg.ty)),
    );
    if let Some(&origin) = arg.origins.first() {
        builder.section("Originating from:".to_string(), vec![(origin, String::new())]);
    }
    result.main.errors.extend(builder.build());
    result.return_type = arg.ty;
}

/// `T.proc`: the proc-builder entry point; type syntax past this point is
/// resolved elsewhere, so the value is a bare Proc metatype.
pub(super) fn t_proc(ctx: &DispatchCtx, _args: &DispatchArgs, result: &mut DispatchResult) {
    result.return_type = ctx.types.meta(ctx.types.class_type(core_classes::PROC));
}
