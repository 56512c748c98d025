//! Block matching.
//!
//! When a block is attached, the method's block formal is extracted and
//! approximated under the current constraint: `block_pre_type` is what the
//! block must accept, `block_return_type` its proc-return projection with
//! nil stripped. Blocks of unknown arity passed where the formal declares
//! one are checked against a synthesized same-arity untyped proc.

use crate::args::DispatchArgs;
use crate::ctx::DispatchCtx;
use crate::errors::method_ref;
use crate::result::{BlockSpec, DispatchComponent};
use rbz_common::{ClassId, ErrorBuilder, MethodId, Strictness, TypeId, diagnostic_codes};
use rbz_symbols::core_classes;
use rbz_types::{Constraint, UntypedMode, derives_from_class, is_subtype_under_constraint, ops, show};

pub(crate) fn match_block(
    ctx: &DispatchCtx,
    class: ClassId,
    targs: &[TypeId],
    method_id: MethodId,
    args: &DispatchArgs,
    constr: &mut Constraint,
    component: &mut DispatchComponent,
) {
    let Some(block) = &args.block else {
        return;
    };
    let enabled = !args.suppress_errors;
    let method = ctx.symbols.method(method_id);
    let block_formal = method.block_arg().clone();

    let formal_type = ops::result_type_as_seen_from(
        ctx.types,
        ctx.symbols,
        block_formal.ty,
        class,
        targs,
    );
    let formal_type = ops::replace_self_type(ctx.types, formal_type, args.self_type);
    let pre_type = ops::approximate(ctx.types, ctx.symbols, formal_type, constr);

    component.block_pre_type = Some(pre_type);
    component.block_return_type = ops::get_proc_return_type(ctx.types, ctx.symbols, pre_type)
        .map(|ret| ops::drop_nil(ctx.types, ctx.symbols, ret));
    component.block_spec = Some(BlockSpec {
        method: method_id,
        formal: block_formal.clone(),
    });

    // A block passed to a method that never declared one.
    if block_formal.is_synthetic() && method.has_sig() {
        let builder = ErrorBuilder::new(
            enabled,
            args.locs.call_loc(),
            diagnostic_codes::TAKES_NO_BLOCK,
            format!("`{}` does not take a block", method_ref(ctx, method_id)),
        );
        component.errors.extend(builder.build());
        return;
    }
    if block_formal.is_synthetic() || ctx.types.is_untyped(formal_type) {
        return;
    }

    // A type (or generic) in block position has no call shape to check.
    if matches!(ctx.types.ty(block.ty.ty), rbz_types::Type::Meta { .. }) {
        let builder = ErrorBuilder::new(
            enabled,
            args.locs.call_loc(),
            diagnostic_codes::GENERIC_PASSED_AS_BLOCK,
            "Passing a generic as a block argument is not supported".to_string(),
        );
        component.errors.extend(builder.build());
        return;
    }

    let expected = ops::drop_nil(ctx.types, ctx.symbols, formal_type);

    // A bare proc of unknown arity against an arity-carrying formal: check a
    // synthesized untyped proc of the declared arity instead.
    let mut passed = block.ty.ty;
    if ops::get_proc_arity(ctx.types, passed).is_none()
        && derives_from_class(ctx.types, ctx.symbols, passed, core_classes::PROC)
        && let Some(want_arity) = ops::get_proc_arity(ctx.types, expected)
    {
        if ctx.symbols.strictness(args.locs.file) == Strictness::Strict {
            let builder = ErrorBuilder::new(
                enabled,
                args.locs.call_loc(),
                diagnostic_codes::PROC_ARITY_UNKNOWN,
                "Cannot determine the arity of this proc; its parameters are checked as untyped"
                    .to_string(),
            );
            component.errors.extend(builder.build());
        }
        passed = ctx
            .types
            .proc_of(TypeId::UNTYPED, vec![TypeId::UNTYPED; want_arity]);
    }

    if !is_subtype_under_constraint(
        ctx.types,
        ctx.symbols,
        constr,
        passed,
        expected,
        UntypedMode::AlwaysCompatible,
    ) {
        let builder = ErrorBuilder::new(
            enabled,
            args.locs.call_loc(),
            diagnostic_codes::METHOD_ARGUMENT_MISMATCH,
            format!(
                "Expected `{}` but found `{}` for block argument",
                show(ctx.types, ctx.symbols, expected),
                show(ctx.types, ctx.symbols, block.ty.ty)
            ),
        );
        component.errors.extend(builder.build());
    }
}
