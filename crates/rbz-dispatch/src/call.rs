//! The symbol-based dispatch path.
//!
//! Member lookup, overload disambiguation, constraint preparation, argument
//! and block matching, intrinsic application, return-type computation, and
//! constraint solving, in that order.

use crate::args::DispatchArgs;
use crate::block;
use crate::ctx::DispatchCtx;
use crate::errors::method_ref;
use crate::intrinsics;
use crate::matcher;
use crate::overloads;
use crate::result::{DispatchComponent, DispatchResult};
use rbz_common::{ClassId, Edit, ErrorBuilder, Loc, Span, TypeId, diagnostic_codes};
use rbz_symbols::{core_classes, is_setter_name, well_known_names};
use rbz_types::{Constraint, is_nilable, ops, show};
use tracing::trace;

/// Names that are declaration macros when written in a class body; their
/// absence usually means the helper module was not extended.
const DECL_MACRO_HELPERS: &[(&str, &str)] = &[
    ("sig", "extend T::Sig"),
    ("prop", "include T::Props"),
    ("const", "include T::Props"),
];

/// Dispatch `args` against a nominal receiver `class` with type arguments
/// `targs`.
pub(crate) fn dispatch_class(
    ctx: &DispatchCtx,
    receiver: TypeId,
    class: ClassId,
    targs: &[TypeId],
    args: &DispatchArgs,
) -> DispatchResult {
    // 1. Member lookup, with the required-ancestors fallback.
    let mut found = ctx.symbols.find_member_transitive(class, args.name);
    if found.is_none() && ctx.options.required_ancestors {
        for required in ctx.symbols.required_ancestors_transitive(class) {
            if let Some(method_id) = ctx.symbols.find_member_transitive(required, args.name) {
                found = Some(method_id);
                break;
            }
        }
    }
    let Some(primary) = found else {
        return method_not_found(ctx, receiver, class, args);
    };

    // 2. Overload disambiguation.
    let method_id = if ctx.symbols.method(primary).is_overloaded() {
        overloads::guess_overload(ctx, primary, args)
    } else {
        primary
    };
    trace!(method = method_id.0, "resolved member");
    let method = ctx.symbols.method(method_id);

    // 3. Constraint preparation: fresh when the call can infer (generic
    // method or attached block), the shared empty one otherwise.
    let mut constr = if method.is_generic() {
        Constraint::new(&method.type_params)
    } else if args.block.is_some() {
        Constraint::new(&[])
    } else {
        Constraint::empty()
    };

    let mut component = DispatchComponent::unresolved(receiver);
    component.method = Some(method_id);

    // 4. Argument matching.
    matcher::match_args(
        ctx,
        class,
        targs,
        method_id,
        args,
        &mut constr,
        &mut component.errors,
    );

    // 5. Block matching.
    block::match_block(ctx, class, targs, method_id, args, &mut constr, &mut component);

    let mut result = DispatchResult::new(TypeId::NONE, component);

    // 6. Intrinsic application: runs after normal matching and may override
    // the return type or replace the constraint.
    if let Some(intrinsic) = method.intrinsic {
        intrinsics::call_intrinsic(intrinsic, ctx, args, &mut result, &mut constr);
    }

    // 7. Return-type computation, unless the intrinsic already answered.
    if result.return_type.is_none() {
        let mut return_type = declared_return_type(ctx, class, targs, method_id, args);

        // 8. Constraint solving. With a block attached, solving is left to
        // the caller, who processes the block body first.
        if args.block.is_none() && !constr.is_empty() {
            if constr.solve(ctx.types, ctx.symbols) {
                return_type = constr.instantiate(ctx.types, return_type);
            } else {
                let builder = ErrorBuilder::new(
                    !args.suppress_errors,
                    args.locs.call_loc(),
                    diagnostic_codes::GENERIC_METHOD_CONSTRAINT_UNSOLVED,
                    format!(
                        "Could not find valid instantiation of type parameters for `{}`",
                        method_ref(ctx, method_id)
                    ),
                );
                result.main.errors.extend(builder.build());
                return_type = TypeId::UNTYPED;
            }
        }

        return_type = ops::replace_self_type(ctx.types, return_type, args.self_type);
        result.return_type = return_type;
    } else if args.block.is_none() && !constr.is_empty() && !constr.is_solved() {
        // Intrinsic-provided return types still get their constraints
        // checked so inference failures are reported.
        if !constr.solve(ctx.types, ctx.symbols) {
            let builder = ErrorBuilder::new(
                !args.suppress_errors,
                args.locs.call_loc(),
                diagnostic_codes::GENERIC_METHOD_CONSTRAINT_UNSOLVED,
                format!(
                    "Could not find valid instantiation of type parameters for `{}`",
                    method_ref(ctx, method_id)
                ),
            );
            result.main.errors.extend(builder.build());
        }
    }

    // 9. Block-presence check: a non-nilable declared block parameter
    // requires a block.
    let block_formal = method.block_arg();
    if args.block.is_none() && !block_formal.is_synthetic() {
        let block_type = ops::result_type_as_seen_from(ctx.types, ctx.symbols, block_formal.ty, class, targs);
        if !ctx.types.is_untyped(block_type) && !is_nilable(ctx.types, ctx.symbols, block_type) {
            let builder = ErrorBuilder::new(
                !args.suppress_errors,
                args.locs.call_loc(),
                diagnostic_codes::BLOCK_NOT_PASSED,
                format!("`{}` requires a block parameter, but no block was passed", method_ref(ctx, method_id)),
            );
            result.main.errors.extend(builder.build());
        }
    }

    result.main.send_type = result.return_type;
    result.main.constr = constr;
    result
}

/// Setter-return semantics and the declared result type, viewed from the
/// receiver.
fn declared_return_type(
    ctx: &DispatchCtx,
    class: ClassId,
    targs: &[TypeId],
    method_id: rbz_common::MethodId,
    args: &DispatchArgs,
) -> TypeId {
    let method = ctx.symbols.method(method_id);
    let name = ctx.symbols.name(method.name);

    // Setters return their right-hand side; `[]=` returns its second
    // positional argument.
    if is_setter_name(name) {
        if name == "[]=" {
            if let Some(value) = args.args.get(1) {
                return value.ty;
            }
        } else if let Some(value) = args.pos_args().last() {
            return value.ty;
        }
    }

    ops::result_type_as_seen_from(ctx.types, ctx.symbols, method.result, class, targs)
}

/// Lookup failed: the `initialize`/super special cases, or an
/// `UnknownMethod` diagnostic with suggestions and autocorrects.
fn method_not_found(
    ctx: &DispatchCtx,
    receiver: TypeId,
    class: ClassId,
    args: &DispatchArgs,
) -> DispatchResult {
    let enabled = !args.suppress_errors;
    let mut result = DispatchResult::untyped(receiver);

    // Calls to the default constructor and to the super-call sentinel are
    // silent, except for a default constructor invoked with arguments.
    if args.name == well_known_names::INITIALIZE || args.name == well_known_names::SUPER {
        if args.name == well_known_names::INITIALIZE && !args.args.is_empty() {
            let builder = ErrorBuilder::new(
                enabled,
                args.locs.call_loc(),
                diagnostic_codes::METHOD_ARGUMENT_COUNT_MISMATCH,
                format!(
                    "Wrong number of arguments for constructor. Expected: `0`, got: `{}`",
                    args.args.len()
                ),
            );
            result.main.errors.extend(builder.build());
        }
        return result;
    }

    let name_str = ctx.symbols.name(args.name).to_string();
    let shown_receiver = if args.this_type != args.full_type {
        format!(
            "`{}` component of `{}`",
            show(ctx.types, ctx.symbols, args.this_type),
            show(ctx.types, ctx.symbols, args.full_type)
        )
    } else {
        format!("`{}`", show(ctx.types, ctx.symbols, args.this_type))
    };
    let mut builder = ErrorBuilder::new(
        enabled,
        args.locs.call_loc(),
        diagnostic_codes::UNKNOWN_METHOD,
        format!("Method `{name_str}` does not exist on {shown_receiver}"),
    );

    // Fuzzy suggestions from the member table.
    for suggestion in ctx.symbols.find_member_fuzzy_match(class, args.name).into_iter().take(3) {
        let suggested = ctx.symbols.method(suggestion);
        let suggested_name = ctx.symbols.name(suggested.name).to_string();
        builder.note(format!("Did you mean `{}`?", method_ref(ctx, suggestion)));
        if let Some(edit) = replace_name_edit(ctx, args, &name_str, &suggested_name) {
            builder.autocorrect(format!("Replace with `{suggested_name}`"), vec![edit]);
        }
    }

    // A same-named method on the root object that lives in a module suggests
    // a missing include.
    if let Some(module_method) = ctx.symbols.find_member_transitive(core_classes::OBJECT, args.name)
    {
        let owner = ctx.symbols.method(module_method).owner;
        if ctx.symbols.is_module(owner) {
            builder.note(format!(
                "`include {}` would make `{name_str}` visible here",
                ctx.symbols.name(ctx.symbols.class(owner).name)
            ));
        }
    }

    // Declaration macros need their helper extension.
    for &(macro_name, helper) in DECL_MACRO_HELPERS {
        if name_str == macro_name {
            builder.autocorrect(
                format!("Add `{helper}`"),
                vec![Edit {
                    loc: Loc::new(args.locs.file, Span::at(args.locs.receiver.start)),
                    replacement: format!("{helper}\n"),
                }],
            );
        }
    }

    // Nil receivers suggest stripping the nil.
    if class == core_classes::NIL_CLASS {
        let helper = &ctx.options.nil_wrap_helper;
        builder.autocorrect(
            format!("Wrap in `{helper}(...)`"),
            vec![
                Edit {
                    loc: Loc::new(args.locs.file, Span::at(args.locs.receiver.start)),
                    replacement: format!("{helper}("),
                },
                Edit {
                    loc: Loc::new(args.locs.file, Span::at(args.locs.receiver.end)),
                    replacement: ")".to_string(),
                },
            ],
        );
        // `&:sym` block-pass sugar cannot be wrapped in place; expand it to
        // an explicit block first.
        if let Some(block) = &args.block
            && let Some(shorthand) = block.symbol_shorthand
        {
            let sym = ctx.symbols.name(shorthand);
            builder.autocorrect(
                "Expand the `&:symbol` block argument",
                vec![Edit {
                    loc: Loc::new(args.locs.file, block.span),
                    replacement: format!("{{ |x| x.{sym} }}"),
                }],
            );
        }
    }

    result.main.errors.extend(builder.build());
    result
}

/// Locate the method name inside the call's source span, when the source is
/// available and the match is unique. Approximate by design.
fn replace_name_edit(
    ctx: &DispatchCtx,
    args: &DispatchArgs,
    name: &str,
    replacement: &str,
) -> Option<Edit> {
    let source = ctx.source?;
    let call_text = args.locs.call.slice(source);
    let first = call_text.find(name)?;
    if call_text[first + name.len()..].contains(name) {
        return None;
    }
    let start = args.locs.call.start + first as u32;
    Some(Edit {
        loc: Loc::new(
            args.locs.file,
            Span::new(start, start + name.len() as u32),
        ),
        replacement: replacement.to_string(),
    })
}

