//! Shape operations: `[]`, `[]=`, `merge`, `to_hash`.

use crate::args::DispatchArgs;
use crate::ctx::DispatchCtx;
use crate::result::DispatchResult;
use rbz_common::{Edit, ErrorBuilder, Loc, Span, TypeId, diagnostic_codes};
use rbz_types::{LiteralValue, Type, is_subtype, lattice, show};

fn receiver_shape(ctx: &DispatchCtx, args: &DispatchArgs) -> Option<(Vec<TypeId>, Vec<TypeId>)> {
    match ctx.types.ty(args.this_type) {
        Type::Shape { keys, values } => Some((keys, values)),
        _ => None,
    }
}

/// `shape[key]`: the value type for a known literal key, nil for a missing
/// one.
pub(super) fn square_brackets(ctx: &DispatchCtx, args: &DispatchArgs, result: &mut DispatchResult) {
    let Some((keys, values)) = receiver_shape(ctx, args) else {
        return;
    };
    let Some(key) = args.pos_args().first() else {
        return;
    };
    if !matches!(ctx.types.ty(key.ty), Type::Literal { .. }) {
        // Unknown key: any of the values, or nil.
        let any_value = values
            .iter()
            .copied()
            .reduce(|a, b| lattice::any(ctx.types, ctx.symbols, a, b))
            .unwrap_or(TypeId::NIL);
        result.return_type = lattice::any(ctx.types, ctx.symbols, any_value, TypeId::NIL);
        return;
    }
    result.return_type = match keys.iter().position(|&k| k == key.ty) {
        Some(index) => values[index],
        None => TypeId::NIL,
    };
}

/// `shape[key] = value`: the value must match the existing key's type; the
/// fix is widening the declaration with `T.let`.
pub(super) fn square_brackets_eq(
    ctx: &DispatchCtx,
    args: &DispatchArgs,
    result: &mut DispatchResult,
) {
    let Some((keys, values)) = receiver_shape(ctx, args) else {
        return;
    };
    let (Some(key), Some(value)) = (args.pos_args().first(), args.pos_args().get(1)) else {
        return;
    };
    result.return_type = value.ty;

    if !matches!(ctx.types.ty(key.ty), Type::Literal { .. }) {
        let builder = ErrorBuilder::new(
            !args.suppress_errors,
            args.locs.arg_loc(0),
            diagnostic_codes::EXPECTED_LITERAL_TYPE,
            "Shape keys must be literals; this key cannot be checked statically".to_string(),
        );
        result.main.errors.extend(builder.build());
        return;
    }

    let Some(index) = keys.iter().position(|&k| k == key.ty) else {
        // Writing a fresh key is hash behavior, not a shape violation.
        return;
    };
    let existing = values[index];
    if is_subtype(ctx.types, ctx.symbols, value.ty, existing) {
        return;
    }

    let enabled = !args.suppress_errors;
    let existing_shown = show(ctx.types, ctx.symbols, existing);
    let value_shown = show(ctx.types, ctx.symbols, value.ty);
    let mut builder = ErrorBuilder::new(
        enabled,
        args.locs.arg_loc(1),
        diagnostic_codes::METHOD_ARGUMENT_MISMATCH,
        format!(
            "Expected `{existing_shown}` but found `{value_shown}` for key `{}`",
            show(ctx.types, ctx.symbols, key.ty)
        ),
    );

    // Offer to widen the original declaration. The scan only understands the
    // hard-coded value forms and must match uniquely; when it cannot, the
    // error simply carries no autocorrect.
    if let Some(edit) = widen_declaration_edit(ctx, args.locs.file, key.ty, existing, value.ty) {
        builder.autocorrect("Declare the key with `T.let`", vec![edit]);
    }
    result.main.errors.extend(builder.build());
}

/// Locate `key: nil|true|false` (or its hash-rocket form) in the source and
/// wrap the literal in `T.let(..., widened)`.
fn widen_declaration_edit(
    ctx: &DispatchCtx,
    file: rbz_common::FileId,
    key: TypeId,
    existing: TypeId,
    incoming: TypeId,
) -> Option<Edit> {
    let source = ctx.source?;
    let key_name = match ctx.types.ty(key) {
        Type::Literal {
            value: LiteralValue::Symbol(name),
            ..
        } => ctx.symbols.name(name).to_string(),
        _ => return None,
    };
    let literal_text = if existing == TypeId::NIL {
        "nil"
    } else {
        match ctx.types.ty(existing) {
            Type::Literal {
                value: LiteralValue::Boolean(true),
                ..
            } => "true",
            Type::Literal {
                value: LiteralValue::Boolean(false),
                ..
            } => "false",
            _ => return None,
        }
    };

    let widened = lattice::any(ctx.types, ctx.symbols, existing, incoming);
    let shown = show(ctx.types, ctx.symbols, widened);
    for pattern in [
        format!("{key_name}: {literal_text}"),
        format!(":{key_name} => {literal_text}"),
    ] {
        let first = source.find(&pattern);
        if let Some(at) = first {
            if source[at + pattern.len()..].contains(&pattern) {
                // Ambiguous; a wrong edit is worse than none.
                return None;
            }
            let value_start = (at + pattern.len() - literal_text.len()) as u32;
            let value_end = (at + pattern.len()) as u32;
            return Some(Edit {
                loc: Loc::new(file, Span::new(value_start, value_end)),
                replacement: format!("T.let({literal_text}, {shown})"),
            });
        }
    }
    None
}

/// `shape.merge(...)`: extend with inline keyword entries and shape-typed
/// arguments; anything else degrades to the underlying hash.
pub(super) fn merge(ctx: &DispatchCtx, args: &DispatchArgs, result: &mut DispatchResult) {
    let Some((mut keys, mut values)) = receiver_shape(ctx, args) else {
        return;
    };

    let mut upsert = |key: TypeId, value: TypeId| {
        if let Some(at) = keys.iter().position(|&k| k == key) {
            values[at] = value;
        } else {
            keys.push(key);
            values.push(value);
        }
    };

    // Positional arguments must themselves be shapes.
    for arg in args.pos_args() {
        match ctx.types.ty(arg.ty) {
            Type::Shape {
                keys: other_keys,
                values: other_values,
            } => {
                for (&k, &v) in other_keys.iter().zip(other_values.iter()) {
                    upsert(k, v);
                }
            }
            _ => {
                // Not statically mergeable; the result is an ordinary hash.
                result.return_type = ctx.types.hash_of_untyped();
                return;
            }
        }
    }

    // Inline keyword arguments extend the shape directly.
    let kw = args.kw_args();
    for pair in kw[..kw.len() - (kw.len() % 2)].chunks_exact(2) {
        if !matches!(ctx.types.ty(pair[0].ty), Type::Literal { .. }) {
            result.return_type = ctx.types.hash_of_untyped();
            return;
        }
        upsert(pair[0].ty, pair[1].ty);
    }
    // A trailing kwsplat shape merges too.
    if kw.len() % 2 == 1 {
        match ctx.types.ty(kw[kw.len() - 1].ty) {
            Type::Shape {
                keys: other_keys,
                values: other_values,
            } => {
                for (&k, &v) in other_keys.iter().zip(other_values.iter()) {
                    upsert(k, v);
                }
            }
            _ => {
                result.return_type = ctx.types.hash_of_untyped();
                return;
            }
        }
    }

    result.return_type = ctx.types.shape(keys, values);
}

/// `shape.to_hash` is the identity at the type level.
pub(super) fn to_hash(_ctx: &DispatchCtx, args: &DispatchArgs, result: &mut DispatchResult) {
    result.return_type = args.this_type;
}
