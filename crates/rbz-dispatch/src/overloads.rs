//! Overload selection.
//!
//! Candidates are the primary method plus its declared alternates. The pick
//! is stable: sort by arity (ties by symbol id), filter by positional
//! argument compatibility, filter by block presence, then take the first
//! candidate whose arity accommodates the supplied argument count, falling
//! back to the first compatibility-filtered candidate.

use crate::args::DispatchArgs;
use crate::ctx::DispatchCtx;
use rbz_common::MethodId;
use rbz_types::is_subtype;
use tracing::trace;

pub(crate) fn guess_overload(
    ctx: &DispatchCtx,
    primary: MethodId,
    args: &DispatchArgs,
) -> MethodId {
    let primary_def = ctx.symbols.method(primary);
    let mut candidates: Vec<MethodId> = std::iter::once(primary)
        .chain(primary_def.overloads.iter().copied())
        .collect();

    // 1. Stable order: arity ascending, symbol id breaking ties.
    candidates.sort_by_key(|&m| (ctx.symbols.method(m).arity(), m.0));
    let full_set = candidates.clone();

    // 2. Positional argument filter. A candidate survives when every
    // supplied positional argument fits its fully-defined formals, and, if
    // keyword arguments are present, its post-positional formal (if any)
    // accepts an untyped hash.
    let has_kwargs = args.has_kw_args();
    let filtered: Vec<MethodId> = candidates
        .iter()
        .copied()
        .filter(|&candidate| {
            let def = ctx.symbols.method(candidate);
            let formals = def.formals();
            for (i, actual) in args.pos_args().iter().enumerate() {
                let Some(formal) = formals.get(i) else {
                    break;
                };
                if formal.is_keyword() {
                    break;
                }
                if !ctx.types.is_untyped(formal.ty)
                    && !is_subtype(ctx.types, ctx.symbols, actual.ty, formal.ty)
                {
                    return false;
                }
            }
            if has_kwargs {
                if let Some(formal) = formals.get(args.num_pos_args) {
                    if !ctx.types.is_untyped(formal.ty)
                        && !is_subtype(
                            ctx.types,
                            ctx.symbols,
                            ctx.types.hash_of_untyped(),
                            formal.ty,
                        )
                    {
                        return false;
                    }
                }
            }
            true
        })
        .collect();

    // 3. An empty filter restores the full set; otherwise the first
    // survivor becomes the fallback.
    let (mut candidates, fallback) = if filtered.is_empty() {
        (full_set.clone(), full_set[0])
    } else {
        let fallback = filtered[0];
        (filtered, fallback)
    };

    // 4. Block-presence filter. Unlike step 2 this one has no empty-restore:
    // when nothing matches the call's block-arg-ness, the set stays empty
    // and the fallback governs.
    let has_block = args.block.is_some();
    candidates.retain(|&m| {
        let declares_block = !ctx.symbols.method(m).block_arg().is_synthetic();
        declares_block == has_block
    });

    // 5. Keep candidates whose arity accommodates the argument count; the
    // list is arity-sorted so this is a binary search.
    let supplied = args.args.len();
    let cut = candidates.partition_point(|&m| ctx.symbols.method(m).arity() < supplied);

    let picked = candidates[cut..].first().copied().unwrap_or(fallback);
    trace!(primary = primary.0, picked = picked.0, "overload pick");
    picked
}
