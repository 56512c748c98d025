//! Runtime-call shims on the hidden `Magic` owner.
//!
//! Desugaring lowers literals and dynamic call shapes onto these operations;
//! the handlers rebuild the static picture: hash and array literals become
//! shapes and tuples, splat calls re-enter the dispatcher with expanded
//! arguments, block-pass values are coerced through `to_proc`.

use crate::args::{BlockArg, DispatchArgs, TypeAndOrigins};
use crate::ctx::DispatchCtx;
use crate::dispatcher::dispatch;
use crate::result::DispatchResult;
use rbz_common::{Edit, ErrorBuilder, Loc, NameId, Span, TypeId, diagnostic_codes};
use rbz_symbols::well_known_names;
use rbz_types::{Constraint, LiteralValue, Type, is_nilable, lattice, ops, show};

/// `{k => v, ...}`: a shape when every key is a literal, a plain hash
/// otherwise.
pub(super) fn build_hash(ctx: &DispatchCtx, args: &DispatchArgs, result: &mut DispatchResult) {
    let values = &args.args;
    if values.len() % 2 != 0 {
        result.return_type = ctx.types.hash_of_untyped();
        return;
    }
    let mut keys: Vec<TypeId> = Vec::with_capacity(values.len() / 2);
    let mut vals: Vec<TypeId> = Vec::with_capacity(values.len() / 2);
    let mut all_literal = true;
    for pair in values.chunks_exact(2) {
        if !matches!(ctx.types.ty(pair[0].ty), Type::Literal { .. }) {
            all_literal = false;
        }
        keys.push(pair[0].ty);
        vals.push(pair[1].ty);
    }
    if all_literal {
        // Later duplicates win, as at runtime.
        let mut dedup_keys: Vec<TypeId> = Vec::new();
        let mut dedup_vals: Vec<TypeId> = Vec::new();
        for (k, v) in keys.iter().zip(vals.iter()) {
            if let Some(at) = dedup_keys.iter().position(|existing| existing == k) {
                dedup_vals[at] = *v;
            } else {
                dedup_keys.push(*k);
                dedup_vals.push(*v);
            }
        }
        result.return_type = ctx.types.shape(dedup_keys, dedup_vals);
    } else {
        let key = fold_any(ctx, keys.iter().map(|&k| ops::drop_literal(ctx.types, k)));
        let value = fold_any(ctx, vals.iter().copied());
        result.return_type = ctx.types.hash_of(key, value);
    }
}

/// `[a, b, c]`: a tuple of the element types.
pub(super) fn build_array(ctx: &DispatchCtx, args: &DispatchArgs, result: &mut DispatchResult) {
    let elems: Vec<TypeId> = args.args.iter().map(|a| a.ty).collect();
    result.return_type = ctx.types.tuple(elems);
}

/// `(a..b)`: a range over the union of the non-nil endpoint classes.
pub(super) fn build_range(ctx: &DispatchCtx, args: &DispatchArgs, result: &mut DispatchResult) {
    let elem = fold_any(
        ctx,
        args.args
            .iter()
            .map(|a| a.ty)
            .filter(|&t| t != TypeId::NIL)
            .map(|t| ops::drop_literal(ctx.types, t)),
    );
    result.return_type = ctx.types.range_of(elem);
}

/// `*x` in the middle of an argument list: statically expandable only for
/// tuples.
pub(super) fn expand_splat(ctx: &DispatchCtx, args: &DispatchArgs, result: &mut DispatchResult) {
    let Some(value) = args.args.first() else {
        result.return_type = TypeId::UNTYPED;
        return;
    };
    result.return_type = match ctx.types.ty(value.ty) {
        Type::Tuple { .. } => value.ty,
        _ => TypeId::UNTYPED,
    };
}

/// `*x` in receiver position of a for-loop style expansion: `to_a`.
pub(super) fn splat(ctx: &DispatchCtx, args: &DispatchArgs, result: &mut DispatchResult) {
    let Some(value) = args.args.first() else {
        result.return_type = TypeId::UNTYPED;
        return;
    };
    let mut inner_args = args.with_this_type(value.ty);
    inner_args.name = well_known_names::TO_A;
    inner_args.self_type = value.ty;
    inner_args.full_type = value.ty;
    inner_args.num_pos_args = 0;
    inner_args.args = Vec::new();
    inner_args.block = None;
    let mut inner = dispatch(ctx, value.ty, &inner_args);
    result.main.errors.append(&mut inner.main.errors);
    result.return_type = inner.return_type;
}

/// `recv.send(*args)` lowered: re-enter dispatch with the tuple expanded.
pub(super) fn call_with_splat(
    ctx: &DispatchCtx,
    args: &DispatchArgs,
    result: &mut DispatchResult,
    constr: &mut Constraint,
) {
    redispatch_splat(ctx, args, result, constr, None);
}

/// `recv.send(args..., &blk)` lowered: coerce the block value through
/// `to_proc`, then re-enter dispatch with the block attached.
pub(super) fn call_with_block(
    ctx: &DispatchCtx,
    args: &DispatchArgs,
    result: &mut DispatchResult,
    constr: &mut Constraint,
) {
    let (Some(receiver), Some(name)) = (args.args.first().cloned(), literal_method_name(ctx, args))
    else {
        result.return_type = TypeId::UNTYPED;
        return;
    };
    let Some(block_value) = args.args.get(2).cloned() else {
        result.return_type = TypeId::UNTYPED;
        return;
    };
    let block = coerce_block_value(ctx, args, &block_value, result);

    let rest: Vec<TypeAndOrigins> = args.args.iter().skip(3).cloned().collect();
    let mut inner_args = args.with_this_type(receiver.ty);
    inner_args.name = name;
    inner_args.self_type = receiver.ty;
    inner_args.full_type = receiver.ty;
    inner_args.num_pos_args = rest.len();
    inner_args.args = rest;
    inner_args.block = block;

    adopt(dispatch(ctx, receiver.ty, &inner_args), result, constr);
}

/// `recv.send(*args, &blk)` lowered.
pub(super) fn call_with_splat_and_block(
    ctx: &DispatchCtx,
    args: &DispatchArgs,
    result: &mut DispatchResult,
    constr: &mut Constraint,
) {
    let Some(block_value) = args.args.get(3).cloned() else {
        result.return_type = TypeId::UNTYPED;
        return;
    };
    let block = coerce_block_value(ctx, args, &block_value, result);
    redispatch_splat(ctx, args, result, constr, block);
}

/// `self.new` in a class body: construct, but answer with the attached
/// class so subclasses construct themselves.
pub(super) fn self_new(
    ctx: &DispatchCtx,
    args: &DispatchArgs,
    result: &mut DispatchResult,
    constr: &mut Constraint,
) {
    let Some(receiver) = args.args.first().cloned() else {
        result.return_type = TypeId::UNTYPED;
        return;
    };
    let rest: Vec<TypeAndOrigins> = args.args.iter().skip(1).cloned().collect();
    let mut inner_args = args.with_this_type(receiver.ty);
    inner_args.name = well_known_names::NEW;
    inner_args.self_type = receiver.ty;
    inner_args.full_type = receiver.ty;
    inner_args.num_pos_args = rest.len();
    inner_args.args = rest;

    let inner = dispatch(ctx, receiver.ty, &inner_args);
    let constructed = inner
        .main
        .method
        .map(|m| {
            let name = ctx.symbols.method(m).name;
            name == well_known_names::NEW || name == well_known_names::INITIALIZE
        })
        .unwrap_or(false);
    let owner = ops::represented_class(ctx.types, ctx.symbols, receiver.ty);
    adopt(inner, result, constr);
    if constructed && let Some(owner) = owner {
        result.return_type = ctx
            .types
            .self_type_param(owner, well_known_names::ATTACHED_CLASS);
    }
}

/// Constant definitions without a type annotation: report the inferred type
/// and offer the `T.let` wrapper.
pub(super) fn suggest_type(ctx: &DispatchCtx, args: &DispatchArgs, result: &mut DispatchResult) {
    let Some(value) = args.args.first() else {
        result.return_type = TypeId::UNTYPED;
        return;
    };
    let enabled = !args.suppress_errors;
    let widened = ops::widen(ctx.types, ctx.symbols, value.ty);
    let shown = show(ctx.types, ctx.symbols, widened);
    let loc = args.locs.arg_loc(0);
    let mut builder = ErrorBuilder::new(
        enabled,
        loc,
        diagnostic_codes::UNTYPED_CONSTANT_SUGGESTION,
        format!("Constant has no type annotation; inferred `{shown}`"),
    );
    builder.autocorrect(
        format!("Wrap in `T.let(..., {shown})`"),
        vec![
            Edit {
                loc: Loc::new(loc.file, Span::at(loc.span.start)),
                replacement: "T.let(".to_string(),
            },
            Edit {
                loc: Loc::new(loc.file, Span::at(loc.span.end)),
                replacement: format!(", {shown})"),
            },
        ],
    );
    result.main.errors.extend(builder.build());
    result.return_type = value.ty;
}

// =============================================================================
// Shared pieces
// =============================================================================

fn fold_any(ctx: &DispatchCtx, types: impl Iterator<Item = TypeId>) -> TypeId {
    types
        .reduce(|a, b| lattice::any(ctx.types, ctx.symbols, a, b))
        .unwrap_or(TypeId::UNTYPED)
}

/// The method name carried as a symbol literal in argument position 1.
fn literal_method_name(ctx: &DispatchCtx, args: &DispatchArgs) -> Option<NameId> {
    let arg = args.args.get(1)?;
    match ctx.types.ty(arg.ty) {
        Type::Literal {
            value: LiteralValue::Symbol(name),
            ..
        } => Some(name),
        _ => None,
    }
}

/// Common shape of the splat shims: `[receiver, name, args_tuple, ...]`.
fn redispatch_splat(
    ctx: &DispatchCtx,
    args: &DispatchArgs,
    result: &mut DispatchResult,
    constr: &mut Constraint,
    block: Option<BlockArg>,
) {
    let (Some(receiver), Some(name)) = (args.args.first().cloned(), literal_method_name(ctx, args))
    else {
        result.return_type = TypeId::UNTYPED;
        return;
    };
    let Some(splatted) = args.args.get(2).cloned() else {
        result.return_type = TypeId::UNTYPED;
        return;
    };

    let expanded: Vec<TypeAndOrigins> = match ctx.types.ty(splatted.ty) {
        Type::Tuple { elems } => elems
            .iter()
            .map(|&e| TypeAndOrigins {
                ty: e,
                origins: splatted.origins.clone(),
            })
            .collect(),
        Type::Untyped { .. } => {
            result.return_type = TypeId::UNTYPED;
            return;
        }
        _ => {
            // The element count is unknowable; give up on the call shape.
            let builder = ErrorBuilder::new(
                !args.suppress_errors,
                args.locs.arg_loc(2),
                diagnostic_codes::UNTYPED_SPLAT,
                "Unable to reconstruct the arguments of this splat call".to_string(),
            );
            result.main.errors.extend(builder.build());
            result.return_type = TypeId::UNTYPED;
            return;
        }
    };

    let mut inner_args = args.with_this_type(receiver.ty);
    inner_args.name = name;
    inner_args.self_type = receiver.ty;
    inner_args.full_type = receiver.ty;
    inner_args.num_pos_args = expanded.len();
    inner_args.args = expanded;
    inner_args.block = block.or_else(|| args.block.clone());

    adopt(dispatch(ctx, receiver.ty, &inner_args), result, constr);
}

/// Synthesize a `to_proc` dispatch to coerce a block-pass value; nil is
/// preserved by rejoining it with the dispatched type.
fn coerce_block_value(
    ctx: &DispatchCtx,
    args: &DispatchArgs,
    value: &TypeAndOrigins,
    result: &mut DispatchResult,
) -> Option<BlockArg> {
    if value.ty == TypeId::NIL {
        // An explicit nil block-pass is no block at all.
        return None;
    }
    let nilable = is_nilable(ctx.types, ctx.symbols, value.ty);
    let callee = ops::drop_nil(ctx.types, ctx.symbols, value.ty);

    // Proc values need no coercion; everything else goes through `to_proc`.
    if rbz_types::derives_from_class(ctx.types, ctx.symbols, callee, rbz_symbols::core_classes::PROC)
    {
        let mut block = BlockArg::new(
            TypeAndOrigins {
                ty: value.ty,
                origins: value.origins.clone(),
            },
            args.locs.call,
        );
        block.arity = rbz_types::get_proc_arity(ctx.types, callee);
        return Some(block);
    }

    let mut inner_args = args.with_this_type(callee);
    inner_args.name = well_known_names::TO_PROC;
    inner_args.self_type = callee;
    inner_args.full_type = callee;
    inner_args.num_pos_args = 0;
    inner_args.args = Vec::new();
    inner_args.block = None;
    let mut inner = dispatch(ctx, callee, &inner_args);
    result.main.errors.append(&mut inner.main.errors);

    let mut proc_type = inner.return_type;
    if nilable {
        proc_type = lattice::any(ctx.types, ctx.symbols, proc_type, TypeId::NIL);
    }
    let mut block = BlockArg::new(
        TypeAndOrigins {
            ty: proc_type,
            origins: value.origins.clone(),
        },
        args.locs.call,
    );
    block.symbol_shorthand = match ctx.types.ty(value.ty) {
        Type::Literal {
            value: LiteralValue::Symbol(name),
            ..
        } => Some(name),
        _ => None,
    };
    Some(block)
}

/// Take an inner dispatch's resolution as this result's.
fn adopt(mut inner: DispatchResult, result: &mut DispatchResult, constr: &mut Constraint) {
    result.main.errors.extend(inner.take_errors());
    if inner.main.method.is_some() {
        result.main.method = inner.main.method;
    }
    result.main.block_pre_type = inner.main.block_pre_type;
    result.main.block_return_type = inner.main.block_return_type;
    result.main.block_spec = inner.main.block_spec.take();
    *constr = inner.main.constr;
    result.return_type = inner.return_type;
}
