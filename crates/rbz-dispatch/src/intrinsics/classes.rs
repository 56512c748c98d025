//! Class primitives: `Object#class`, `Object#singleton_class`, `Class#new`,
//! and generic instantiation via `[]` on generic singletons.

use crate::args::DispatchArgs;
use crate::ctx::DispatchCtx;
use crate::dispatcher::dispatch;
use crate::result::DispatchResult;
use crate::unwrap::unwrap_type;
use rbz_common::{Edit, ErrorBuilder, Loc, Span, TypeId, diagnostic_codes};
use rbz_symbols::{core_classes, well_known_names};
use rbz_types::{Constraint, is_subtype, ops, show};

/// `Object#class`: the receiver's singleton class as a value.
pub(super) fn object_class(ctx: &DispatchCtx, args: &DispatchArgs, result: &mut DispatchResult) {
    result.return_type = singleton_of(ctx, args.this_type);
}

/// `Object#singleton_class` resolves the same way; the distinction only
/// matters at runtime.
pub(super) fn object_singleton_class(
    ctx: &DispatchCtx,
    args: &DispatchArgs,
    result: &mut DispatchResult,
) {
    result.return_type = singleton_of(ctx, args.this_type);
}

fn singleton_of(ctx: &DispatchCtx, receiver: TypeId) -> TypeId {
    match ops::underlying_class(ctx.types, ctx.symbols, receiver) {
        Some(class) => match ctx.symbols.lookup_singleton_class(class) {
            Some(singleton) => ctx.types.class_type(singleton),
            None => ctx.types.class_type(core_classes::CLASS),
        },
        None => ctx.types.class_type(core_classes::CLASS),
    }
}

/// `Class#new`: dispatch `initialize` on the attached instance type; the
/// call's type is the instance. `Class#new` itself remains the resolved
/// method when the class defines no custom initializer.
pub(super) fn class_new(
    ctx: &DispatchCtx,
    args: &DispatchArgs,
    result: &mut DispatchResult,
    constr: &mut Constraint,
) {
    let Some(attached) = ops::represented_class(ctx.types, ctx.symbols, args.this_type) else {
        result.return_type = TypeId::UNTYPED;
        return;
    };
    let instance = ops::external_type(ctx.types, ctx.symbols, attached);

    let mut inner_args = args.with_this_type(instance);
    inner_args.name = well_known_names::INITIALIZE;
    inner_args.self_type = instance;
    inner_args.full_type = instance;

    let mut inner = dispatch(ctx, instance, &inner_args);
    result.main.errors.append(&mut inner.main.errors);
    if inner.main.method.is_some() {
        result.main.method = inner.main.method;
        *constr = inner.main.constr;
    }
    result.return_type = instance;
}

/// `Generic[...]`: validate arity and bounds, substitute fixed members, and
/// produce the applied metatype.
pub(super) fn generic_square_brackets(
    ctx: &DispatchCtx,
    args: &DispatchArgs,
    result: &mut DispatchResult,
) {
    let enabled = !args.suppress_errors;
    let Some(attached) = ops::represented_class(ctx.types, ctx.symbols, args.this_type) else {
        result.return_type = TypeId::UNTYPED;
        return;
    };

    // Keyword arguments are type syntax for a shape; wrap them in braces.
    if args.has_kw_args() {
        let mut builder = ErrorBuilder::new(
            enabled,
            args.locs.call_loc(),
            diagnostic_codes::GENERIC_ARGUMENT_KEYWORD_ARGS,
            format!(
                "Keyword arguments given to `{}[]`; braces are required for a shape type",
                ctx.symbols.name(ctx.symbols.class(attached).name)
            ),
        );
        if let (Some(&first), Some(&last)) = (
            args.locs.args.get(args.num_pos_args),
            args.locs.args.last(),
        ) {
            builder.autocorrect(
                "Wrap in braces",
                vec![
                    Edit {
                        loc: Loc::new(args.locs.file, Span::at(first.start)),
                        replacement: "{".to_string(),
                    },
                    Edit {
                        loc: Loc::new(args.locs.file, Span::at(last.end)),
                        replacement: "}".to_string(),
                    },
                ],
            );
        }
        result.main.errors.extend(builder.build());
    }

    let members = ctx.symbols.class(attached).type_members.clone();
    let arity = ctx.symbols.class(attached).type_arity();
    let supplied = args.num_pos_args;
    if supplied != arity {
        let builder = ErrorBuilder::new(
            enabled,
            args.locs.call_loc(),
            diagnostic_codes::GENERIC_ARGUMENT_COUNT_MISMATCH,
            format!(
                "Wrong number of type parameters for `{}`. Expected: `{}`, got: `{}`",
                ctx.symbols.name(ctx.symbols.class(attached).name),
                arity,
                supplied
            ),
        );
        result.main.errors.extend(builder.build());
    }

    let mut targs: Vec<TypeId> = Vec::with_capacity(members.len());
    let mut next_arg = 0usize;
    for member in &members {
        // Fixed members are substituted implicitly and take no argument.
        if let Some(fixed) = member.fixed {
            targs.push(fixed);
            continue;
        }
        let Some(actual) = args.pos_args().get(next_arg) else {
            targs.push(TypeId::UNTYPED);
            continue;
        };
        let loc = args.locs.arg_loc(next_arg);
        next_arg += 1;
        let unwrapped = unwrap_type(ctx, loc, actual.ty, enabled, &mut result.main.errors);
        let in_bounds = is_subtype(ctx.types, ctx.symbols, unwrapped, member.upper)
            && is_subtype(ctx.types, ctx.symbols, member.lower, unwrapped);
        if !in_bounds {
            let builder = ErrorBuilder::new(
                enabled,
                loc,
                diagnostic_codes::GENERIC_TYPE_PARAM_BOUND_MISMATCH,
                format!(
                    "`{}` is not within the bounds of type member `{}` of `{}`",
                    show(ctx.types, ctx.symbols, unwrapped),
                    ctx.symbols.name(member.name),
                    ctx.symbols.name(ctx.symbols.class(attached).name)
                ),
            );
            result.main.errors.extend(builder.build());
            targs.push(TypeId::UNTYPED);
        } else {
            targs.push(unwrapped);
        }
    }

    result.return_type = ctx.types.meta(ctx.types.applied(attached, targs));
}
