//! Argument matching.
//!
//! Walks the method's formal parameters in lockstep with the actual
//! arguments: a positional phase, implicit-kwsplat promotion, keyword bundle
//! assembly, the positional-hash corner case, a keyword phase, and finally
//! arity diagnostics. Everything that can be proved about the call proceeds
//! even in the presence of errors.

use crate::args::{DispatchArgs, TypeAndOrigins};
use crate::ctx::DispatchCtx;
use crate::errors::{defined_here_section, method_ref, origins_section, pretty_arity};
use rbz_common::{ClassId, Edit, ErrorBuilder, Loc, MethodId, NameId, Span, TypeId, diagnostic_codes};
use rbz_symbols::{ArgInfo, core_classes, is_setter_name};
use rbz_types::{
    Constraint, LiteralValue, Type, UntypedMode, derives_from_class, is_subtype,
    is_subtype_under_constraint, ops, show,
};
use smallvec::smallvec;

/// One keyword argument captured from the call site.
struct KwEntry {
    name: NameId,
    value: TypeId,
    loc: Loc,
    consumed: bool,
}

/// The assembled keyword arguments.
enum KwBundle {
    /// No keyword-ish actuals at all.
    Absent,
    /// Keys were not all symbol literals; keyword processing is skipped and
    /// later mismatches catch the call shape.
    Abandoned,
    /// The kwsplat degraded to untyped; every keyword parameter is
    /// satisfied, provided the method accepts keywords at all.
    Untyped { origin: Loc },
    /// A typed, non-shape hash kwsplat. Satisfies keyword formals only under
    /// the policy knob; without keyword formals it is consumed like an
    /// untyped splat, except its real type survives.
    Hash { ty: TypeId, origin: Loc },
    /// A concrete set of keyword entries.
    Shape { entries: Vec<KwEntry> },
}

pub(crate) fn match_args(
    ctx: &DispatchCtx,
    class: ClassId,
    targs: &[TypeId],
    method_id: MethodId,
    args: &DispatchArgs,
    constr: &mut Constraint,
    errors: &mut Vec<rbz_common::Diagnostic>,
) {
    let method = ctx.symbols.method(method_id);
    let formals: Vec<ArgInfo> = method.formals().to_vec();
    let enabled = !args.suppress_errors;
    let num_pos = args.num_pos_args.min(args.args.len());
    let has_kw_formals = method.has_keyword_formals();

    let mut bundle = assemble_kw_bundle(ctx, args);

    // Positional phase.
    let mut pit = 0usize;
    let mut ait = 0usize;
    while pit < formals.len() && ait < num_pos {
        let formal = &formals[pit];
        if formal.is_keyword() {
            break;
        }
        let is_last_actual = ait + 1 == args.args.len();
        if is_last_actual
            && has_kw_formals
            && (formal.has_default() || formal.is_repeated())
            && derives_from_class(ctx.types, ctx.symbols, args.args[ait].ty, core_classes::HASH)
        {
            // The trailing hash is really the keyword arguments.
            break;
        }
        check_argument(
            ctx,
            class,
            targs,
            method_id,
            formal,
            &args.args[ait],
            args.locs.arg_loc(ait),
            args,
            constr,
            errors,
        );
        if !formal.is_repeated() {
            pit += 1;
        }
        ait += 1;
    }

    // Implicit-kwsplat promotion: a final positional hash where keyword
    // arguments are expected and none were written.
    let mut pos_supplied = num_pos;
    if ait < num_pos && has_kw_formals && matches!(bundle, KwBundle::Absent) {
        let last_index = num_pos - 1;
        let last_loc = args.locs.arg_loc(last_index);
        if let Some(promoted) = bundle_from_type(ctx, args.args[last_index].ty, last_loc) {
            bundle = promoted;
            pos_supplied -= 1;
            if ctx.options.strict_keyword_args {
                let mut builder = ErrorBuilder::new(
                    enabled,
                    last_loc,
                    diagnostic_codes::KEYWORD_ARG_HASH_WITHOUT_SPLAT,
                    format!(
                        "Passing a hash where keyword arguments are expected by `{}` is deprecated",
                        method_ref(ctx, method_id)
                    ),
                );
                builder.autocorrect(
                    "Prefix with `**`",
                    vec![Edit {
                        loc: Loc::new(args.locs.file, Span::at(last_loc.span.start)),
                        replacement: "**".to_string(),
                    }],
                );
                errors.extend(builder.build());
            }
        }
    }

    // Positional-consume-the-hash corner case: no keyword-accepting formal,
    // so the assembled bundle is really one positional hash. Splats whose
    // entries cannot be reconstructed (untyped or hash-derived) report here,
    // at the point of consumption.
    if !has_kw_formals && !matches!(bundle, KwBundle::Absent) {
        let (hash_type, origin) = bundle_as_hash(ctx, &bundle, args);
        if matches!(bundle, KwBundle::Untyped { .. } | KwBundle::Hash { .. }) {
            let builder = ErrorBuilder::new(
                enabled,
                origin,
                diagnostic_codes::UNTYPED_SPLAT,
                "Unable to reconstruct the shape of this keyword splat".to_string(),
            );
            errors.extend(builder.build());
        }
        if pit < formals.len() && !formals[pit].is_keyword() {
            let formal = formals[pit].clone();
            let actual = TypeAndOrigins {
                ty: hash_type,
                origins: smallvec![origin],
            };
            check_argument(
                ctx, class, targs, method_id, &formal, &actual, origin, args, constr, errors,
            );
            if !formal.is_repeated() {
                pit += 1;
            }
        }
        pos_supplied += 1;
        bundle = KwBundle::Absent;
    }

    // Keyword phase.
    match bundle {
        KwBundle::Abandoned | KwBundle::Untyped { .. } => {}
        // The policy knob lets a typed hash stand in for keyword arguments;
        // off (the default), the phase below reports what is missing.
        KwBundle::Hash { .. } if ctx.options.typed_splats_satisfy_kwargs => {}
        KwBundle::Absent | KwBundle::Hash { .. } | KwBundle::Shape { .. } => {
            let mut entries = match bundle {
                KwBundle::Shape { entries } => entries,
                _ => Vec::new(),
            };
            for formal in &formals[pit.min(formals.len())..] {
                if !formal.is_keyword() {
                    continue;
                }
                if formal.is_repeated() {
                    // A keyword-rest formal absorbs every remaining key.
                    let elem = kwrest_value_type(ctx, class, targs, formal);
                    for entry in entries.iter_mut().filter(|e| !e.consumed) {
                        entry.consumed = true;
                        if let Some(expected) = elem {
                            check_kw_value(
                                ctx, method_id, formal, expected, entry, args, constr, errors,
                            );
                        }
                    }
                    continue;
                }
                match entries
                    .iter_mut()
                    .find(|e| e.name == formal.name && !e.consumed)
                {
                    Some(entry) => {
                        entry.consumed = true;
                        let expected =
                            formal_type_in_context(ctx, class, targs, formal, args);
                        check_kw_value(ctx, method_id, formal, expected, entry, args, constr, errors);
                    }
                    None => {
                        if !formal.has_default() {
                            let builder = ErrorBuilder::new(
                                enabled,
                                args.locs.call_loc(),
                                diagnostic_codes::METHOD_ARGUMENT_COUNT_MISMATCH,
                                format!(
                                    "Missing required keyword argument `{}` for method `{}`",
                                    ctx.symbols.name(formal.name),
                                    method_ref(ctx, method_id)
                                ),
                            );
                            errors.extend(builder.build());
                        }
                    }
                }
            }
            for entry in entries.iter().filter(|e| !e.consumed) {
                let builder = ErrorBuilder::new(
                    enabled,
                    entry.loc,
                    diagnostic_codes::METHOD_ARGUMENT_COUNT_MISMATCH,
                    format!(
                        "Unrecognized keyword argument `{}` passed for method `{}`",
                        ctx.symbols.name(entry.name),
                        method_ref(ctx, method_id)
                    ),
                );
                errors.extend(builder.build());
            }
        }
    }

    // Arity diagnostics, after the argument errors.
    let required = formals
        .iter()
        .filter(|f| !f.is_keyword() && !f.has_default() && !f.is_repeated())
        .count();
    let has_rest = formals.iter().any(|f| !f.is_keyword() && f.is_repeated());
    let max_pos = formals.iter().filter(|f| !f.is_keyword()).count();

    if pos_supplied < required {
        let mut builder = ErrorBuilder::new(
            enabled,
            args.locs.call_loc(),
            diagnostic_codes::METHOD_ARGUMENT_COUNT_MISMATCH,
            format!(
                "Not enough arguments provided for method `{}`. Expected: `{}`, got: `{}`",
                method_ref(ctx, method_id),
                pretty_arity(method),
                pos_supplied
            ),
        );
        let defined = defined_here_section(ctx, method_id);
        builder.section(defined.header, defined.entries);
        errors.extend(builder.build());
    } else if !has_rest && pos_supplied > max_pos {
        let phrasing = if has_kw_formals {
            "Too many positional arguments"
        } else {
            "Too many arguments"
        };
        let mut builder = ErrorBuilder::new(
            enabled,
            args.locs.call_loc(),
            diagnostic_codes::METHOD_ARGUMENT_COUNT_MISMATCH,
            format!(
                "{} provided for method `{}`. Expected: `{}`, got: `{}`",
                phrasing,
                method_ref(ctx, method_id),
                pretty_arity(method),
                pos_supplied
            ),
        );
        let defined = defined_here_section(ctx, method_id);
        builder.section(defined.header, defined.entries);
        errors.extend(builder.build());
    }
}

/// A formal's declared type viewed from the receiver, with self substituted.
fn formal_type_in_context(
    ctx: &DispatchCtx,
    class: ClassId,
    targs: &[TypeId],
    formal: &ArgInfo,
    args: &DispatchArgs,
) -> TypeId {
    let seen = ops::result_type_as_seen_from(ctx.types, ctx.symbols, formal.ty, class, targs);
    ops::replace_self_type(ctx.types, seen, args.self_type)
}

/// Type-check one actual against one formal, under the call's constraint.
fn check_argument(
    ctx: &DispatchCtx,
    class: ClassId,
    targs: &[TypeId],
    method_id: MethodId,
    formal: &ArgInfo,
    actual: &TypeAndOrigins,
    arg_loc: Loc,
    args: &DispatchArgs,
    constr: &mut Constraint,
    errors: &mut Vec<rbz_common::Diagnostic>,
) {
    let expected = formal_type_in_context(ctx, class, targs, formal, args);
    if is_subtype_under_constraint(
        ctx.types,
        ctx.symbols,
        constr,
        actual.ty,
        expected,
        UntypedMode::AlwaysCompatible,
    ) {
        return;
    }

    let enabled = !args.suppress_errors;
    let method = ctx.symbols.method(method_id);
    let method_name = ctx.symbols.name(method.name);
    let expected_shown = show(ctx.types, ctx.symbols, expected);
    let actual_shown = show(ctx.types, ctx.symbols, actual.ty);
    let formal_name = ctx.symbols.name(formal.name);

    // Setters and one-argument sends read as assignments.
    let is_assignment_like =
        is_setter_name(method_name) || (args.args.len() == 1 && args.num_pos_args == 1);
    let header = if is_assignment_like {
        format!(
            "Assigning a value to `{formal_name}` that does not match expected type `{expected_shown}`"
        )
    } else {
        format!(
            "Expected `{expected_shown}` but found `{actual_shown}` for argument `{}`",
            formal.rendered_name(ctx.symbols.names())
        )
    };

    let mut builder = ErrorBuilder::new(
        enabled,
        arg_loc,
        diagnostic_codes::METHOD_ARGUMENT_MISMATCH,
        header,
    );
    builder.section(
        format!(
            "Expected `{expected_shown}` for argument `{formal_name}` of method `{}`:",
            method_ref(ctx, method_id)
        ),
        if formal.loc.exists() {
            vec![(formal.loc, String::new())]
        } else {
            Vec::new()
        },
    );
    let origins = origins_section(ctx, args, actual);
    builder.section(origins.header, origins.entries);

    // When stripping nil from the actual would satisfy the formal, offer the
    // nil-stripping helper.
    let stripped = ops::drop_nil(ctx.types, ctx.symbols, actual.ty);
    if stripped != actual.ty && is_subtype(ctx.types, ctx.symbols, stripped, expected) {
        let helper = &ctx.options.nil_wrap_helper;
        builder.autocorrect(
            format!("Wrap in `{helper}(...)`"),
            vec![
                Edit {
                    loc: Loc::new(arg_loc.file, Span::at(arg_loc.span.start)),
                    replacement: format!("{helper}("),
                },
                Edit {
                    loc: Loc::new(arg_loc.file, Span::at(arg_loc.span.end)),
                    replacement: ")".to_string(),
                },
            ],
        );
    }
    errors.extend(builder.build());
}

/// Type-check a keyword entry's value.
fn check_kw_value(
    ctx: &DispatchCtx,
    method_id: MethodId,
    formal: &ArgInfo,
    expected: TypeId,
    entry: &KwEntry,
    args: &DispatchArgs,
    constr: &mut Constraint,
    errors: &mut Vec<rbz_common::Diagnostic>,
) {
    if is_subtype_under_constraint(
        ctx.types,
        ctx.symbols,
        constr,
        entry.value,
        expected,
        UntypedMode::AlwaysCompatible,
    ) {
        return;
    }
    let enabled = !args.suppress_errors;
    let expected_shown = show(ctx.types, ctx.symbols, expected);
    let actual_shown = show(ctx.types, ctx.symbols, entry.value);
    let mut builder = ErrorBuilder::new(
        enabled,
        entry.loc,
        diagnostic_codes::METHOD_ARGUMENT_MISMATCH,
        format!(
            "Expected `{expected_shown}` but found `{actual_shown}` for keyword argument `{}`",
            ctx.symbols.name(entry.name)
        ),
    );
    builder.section(
        format!(
            "Expected `{expected_shown}` for argument `{}` of method `{}`:",
            formal.rendered_name(ctx.symbols.names()),
            method_ref(ctx, method_id)
        ),
        if formal.loc.exists() {
            vec![(formal.loc, String::new())]
        } else {
            Vec::new()
        },
    );
    errors.extend(builder.build());
}

/// Build the keyword bundle from the inline key/value pairs and the explicit
/// kwsplat, if any.
fn assemble_kw_bundle(ctx: &DispatchCtx, args: &DispatchArgs) -> KwBundle {
    let kw = args.kw_args();
    if kw.is_empty() {
        return KwBundle::Absent;
    }
    let num_pos = args.num_pos_args.min(args.args.len());
    let pair_len = kw.len() - (kw.len() % 2);
    let mut entries: Vec<KwEntry> = Vec::new();

    for (i, pair) in kw[..pair_len].chunks_exact(2).enumerate() {
        let key_type = ctx.types.ty(pair[0].ty);
        let Type::Literal {
            value: LiteralValue::Symbol(name),
            ..
        } = key_type
        else {
            return KwBundle::Abandoned;
        };
        let loc = args.locs.arg_loc(num_pos + i * 2 + 1);
        upsert_entry(&mut entries, name, pair[1].ty, loc);
    }

    if kw.len() % 2 == 1 {
        let splat = kw.last().expect("odd length implies a last element");
        let splat_loc = args.locs.arg_loc(args.args.len() - 1);
        match bundle_from_type(ctx, splat.ty, splat_loc) {
            Some(KwBundle::Shape { entries: inlined }) => {
                for entry in inlined {
                    upsert_entry(&mut entries, entry.name, entry.value, entry.loc);
                }
            }
            Some(KwBundle::Untyped { origin }) => return KwBundle::Untyped { origin },
            Some(KwBundle::Hash { ty, origin }) => return KwBundle::Hash { ty, origin },
            _ => return KwBundle::Abandoned,
        }
    }

    KwBundle::Shape { entries }
}

/// Interpret one value as a keyword bundle: shapes with symbol keys inline,
/// untyped degrades, typed hashes obey the satisfaction policy knob, and
/// anything else is not a bundle at all.
fn bundle_from_type(ctx: &DispatchCtx, ty: TypeId, origin: Loc) -> Option<KwBundle> {
    match ctx.types.ty(ty) {
        Type::Shape { keys, values } => {
            let mut entries = Vec::with_capacity(keys.len());
            for (&key, &value) in keys.iter().zip(values.iter()) {
                match ctx.types.ty(key) {
                    Type::Literal {
                        value: LiteralValue::Symbol(name),
                        ..
                    } => entries.push(KwEntry {
                        name,
                        value,
                        loc: origin,
                        consumed: false,
                    }),
                    _ => return Some(KwBundle::Abandoned),
                }
            }
            Some(KwBundle::Shape { entries })
        }
        Type::Untyped { .. } => Some(KwBundle::Untyped { origin }),
        _ if derives_from_class(ctx.types, ctx.symbols, ty, core_classes::HASH) => {
            // Whether this can satisfy keyword parameters is decided at the
            // keyword phase, where the policy knob applies.
            Some(KwBundle::Hash { ty, origin })
        }
        _ => None,
    }
}

fn upsert_entry(entries: &mut Vec<KwEntry>, name: NameId, value: TypeId, loc: Loc) {
    if let Some(existing) = entries.iter_mut().find(|e| e.name == name) {
        existing.value = value;
        existing.loc = loc;
    } else {
        entries.push(KwEntry {
            name,
            value,
            loc,
            consumed: false,
        });
    }
}

/// The bundle as a single positional hash value.
fn bundle_as_hash(ctx: &DispatchCtx, bundle: &KwBundle, args: &DispatchArgs) -> (TypeId, Loc) {
    match bundle {
        KwBundle::Untyped { origin } => (ctx.types.hash_of_untyped(), *origin),
        KwBundle::Hash { ty, origin } => (*ty, *origin),
        KwBundle::Shape { entries } => {
            let keys: Vec<TypeId> = entries
                .iter()
                .map(|e| ctx.types.literal_symbol(e.name))
                .collect();
            let values: Vec<TypeId> = entries.iter().map(|e| e.value).collect();
            let loc = entries
                .first()
                .map(|e| e.loc)
                .unwrap_or_else(|| args.locs.call_loc());
            (ctx.types.shape(keys, values), loc)
        }
        _ => (ctx.types.hash_of_untyped(), args.locs.call_loc()),
    }
}

/// The value type a keyword-rest formal accepts per key, when declared.
fn kwrest_value_type(
    ctx: &DispatchCtx,
    class: ClassId,
    targs: &[TypeId],
    formal: &ArgInfo,
) -> Option<TypeId> {
    let seen = ops::result_type_as_seen_from(ctx.types, ctx.symbols, formal.ty, class, targs);
    match ctx.types.ty(seen) {
        Type::Applied { class, targs } if class == core_classes::HASH && targs.len() == 2 => {
            Some(targs[1])
        }
        _ => None,
    }
}
