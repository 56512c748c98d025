//! Variant dispatch on the receiver type.
//!
//! The top-level entry point cases on the receiver's lattice variant and
//! delegates: the nominal path goes to `call::dispatch_class`, compound
//! receivers recurse on their components and merge, proxies try their
//! variant-specific intrinsics before falling through to their underlying
//! class, and metatypes redirect construction onto the wrapped type.

use crate::args::DispatchArgs;
use crate::call;
use crate::ctx::DispatchCtx;
use crate::intrinsics;
use crate::result::{Combinator, DispatchComponent, DispatchResult};
use rbz_common::{ErrorBuilder, TypeId, diagnostic_codes};
use rbz_symbols::{core_classes, well_known_names};
use rbz_types::{Type, any, ops, show};
use tracing::{trace, warn};

/// Resolve one call. The receiver is usually `args.this_type`; compound
/// receivers re-enter here once per component with `this_type` narrowed.
pub fn dispatch(ctx: &DispatchCtx, receiver: TypeId, args: &DispatchArgs) -> DispatchResult {
    trace!(receiver = receiver.0, name = args.name.0, "dispatch");
    match ctx.types.ty(receiver) {
        // The untyped fixpoint: untyped receiver, untyped result, no method,
        // no errors.
        Type::Untyped { .. } => {
            let mut result = DispatchResult::untyped(receiver);
            result.return_type = receiver;
            result
        }

        // Dead code absorbs like untyped but stays bottom-typed.
        Type::Bottom => {
            let mut result = DispatchResult::untyped(receiver);
            result.return_type = TypeId::BOTTOM;
            result
        }

        // T.anything exposes nothing beyond BasicObject.
        Type::Top => call::dispatch_class(ctx, receiver, core_classes::BASIC_OBJECT, &[], args),

        Type::Void => {
            let mut result = DispatchResult::untyped(receiver);
            let builder = ErrorBuilder::new(
                !args.suppress_errors,
                args.locs.call_loc(),
                diagnostic_codes::CALL_ON_VOID,
                format!(
                    "Cannot call method `{}` on void type",
                    ctx.symbols.name(args.name)
                ),
            );
            result.main.errors.extend(builder.build());
            result
        }

        Type::Class(class) => call::dispatch_class(ctx, receiver, class, &[], args),
        Type::Applied { class, targs } => call::dispatch_class(ctx, receiver, class, &targs, args),

        Type::Or { left, right } => {
            let left_result = dispatch(ctx, left, &args.with_this_type(left));
            let right_result = dispatch(ctx, right, &args.with_this_type(right));
            let return_type = any(
                ctx.types,
                ctx.symbols,
                left_result.return_type,
                right_result.return_type,
            );
            left_result.merge(right_result, Combinator::Or, return_type)
        }

        Type::And { left, right } => dispatch_intersection(ctx, left, right, args),

        Type::Literal { .. } | Type::Shape { .. } | Type::Tuple { .. } => {
            dispatch_proxy(ctx, receiver, args)
        }

        Type::Meta { wrapped } => dispatch_meta(ctx, receiver, wrapped, args),

        // Inference artifacts should have been substituted before dispatch;
        // recover rather than guess.
        Type::TypeVar { .. } | Type::SelfTypeParam { .. } => {
            warn!(receiver = receiver.0, "dispatch on unsubstituted inference artifact");
            DispatchResult::untyped(receiver)
        }

        // A type member stands for anything within its bounds; dispatch on
        // the upper bound.
        Type::LambdaParam { upper, .. } => dispatch(ctx, upper, &args.with_this_type(upper)),
    }
}

/// Intersection receivers: probe both sides quietly. When exactly one side
/// resolves the method, re-dispatch that side alone with errors enabled and
/// adopt it; otherwise surface both sides merged under AND.
fn dispatch_intersection(
    ctx: &DispatchCtx,
    left: TypeId,
    right: TypeId,
    args: &DispatchArgs,
) -> DispatchResult {
    let quiet = args.with_errors_suppressed();
    let left_probe = dispatch(ctx, left, &quiet.with_this_type(left));
    let right_probe = dispatch(ctx, right, &quiet.with_this_type(right));
    let left_ok = left_probe.all_components_present();
    let right_ok = right_probe.all_components_present();

    match (left_ok, right_ok) {
        (true, false) => dispatch(ctx, left, &args.with_this_type(left)),
        (false, true) => dispatch(ctx, right, &args.with_this_type(right)),
        _ => {
            let left_result = dispatch(ctx, left, &args.with_this_type(left));
            let right_result = dispatch(ctx, right, &args.with_this_type(right));
            let return_type = rbz_types::all(
                ctx.types,
                ctx.symbols,
                left_result.return_type,
                right_result.return_type,
            );
            left_result.merge(right_result, Combinator::And, return_type)
        }
    }
}

/// Literal, shape, and tuple receivers: try the variant-specific intrinsic
/// first; if it produced a return type that is the answer, otherwise fall
/// through to the underlying class.
fn dispatch_proxy(ctx: &DispatchCtx, receiver: TypeId, args: &DispatchArgs) -> DispatchResult {
    let proxy_owner = match ctx.types.ty(receiver) {
        Type::Shape { .. } => Some(core_classes::SHAPE),
        Type::Tuple { .. } => Some(core_classes::TUPLE),
        _ => None,
    };

    if let Some(owner) = proxy_owner
        && let Some(method_id) = ctx.symbols.find_member(owner, args.name)
        && let Some(intrinsic) = ctx.symbols.method(method_id).intrinsic
    {
        let mut component = DispatchComponent::unresolved(receiver);
        component.method = Some(method_id);
        let mut result = DispatchResult::new(TypeId::NONE, component);
        let mut constr = rbz_types::Constraint::empty();
        intrinsics::call_intrinsic(intrinsic, ctx, args, &mut result, &mut constr);
        if !result.return_type.is_none() {
            result.main.send_type = result.return_type;
            result.main.constr = constr;
            return result;
        }
    }

    let underlying = ops::underlying(ctx.types, ctx.symbols, receiver);
    dispatch(ctx, underlying, &args.with_this_type(underlying))
}

/// Metatype receivers: `new` constructs the wrapped type; anything else
/// mistakes a type for a value.
fn dispatch_meta(
    ctx: &DispatchCtx,
    receiver: TypeId,
    wrapped: TypeId,
    args: &DispatchArgs,
) -> DispatchResult {
    if args.name == well_known_names::NEW {
        let mut inner_args = args.with_this_type(wrapped);
        inner_args.name = well_known_names::INITIALIZE;
        inner_args.self_type = wrapped;
        inner_args.full_type = wrapped;
        let mut result = dispatch(ctx, wrapped, &inner_args);
        result.return_type = wrapped;
        result.main.send_type = wrapped;
        return result;
    }

    let mut builder = ErrorBuilder::new(
        !args.suppress_errors,
        args.locs.call_loc(),
        diagnostic_codes::META_TYPE_DISPATCH_CALL,
        format!(
            "Call to method `{}` on `{}` mistakes a type for a value",
            ctx.symbols.name(args.name),
            show(ctx.types, ctx.symbols, wrapped)
        ),
    );
    builder.note("If you want to pattern-match on the class of a value, use `===` on the concrete class");
    // The runtime surface of a type used as a value is Module.
    let module_type = ctx.types.class_type(core_classes::MODULE);
    let mut result = dispatch(ctx, module_type, &args.with_this_type(module_type));
    let mut errors: Vec<_> = builder.build().into_iter().collect();
    errors.append(&mut result.main.errors);
    result.main.errors = errors;
    result.main.receiver = receiver;
    result
}
