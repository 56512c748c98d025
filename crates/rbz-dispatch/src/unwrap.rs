//! Lifting values back to the types they stand for.
//!
//! Intrinsics that treat a value-level expression as a type (the `T` type
//! constructors, generic instantiation) use this to turn `class-of-X` values
//! into `X`.

use crate::ctx::DispatchCtx;
use rbz_common::{Diagnostic, ErrorBuilder, Loc, TypeId, diagnostic_codes};
use rbz_symbols::ClassFlags;
use rbz_types::{Type, ops, show};

/// Unwrap one value-position type. Literals are an error ("literal used as
/// type") and recover as untyped; unknown shapes pass through unchanged.
pub fn unwrap_type(
    ctx: &DispatchCtx,
    loc: Loc,
    ty: TypeId,
    enabled: bool,
    errors: &mut Vec<Diagnostic>,
) -> TypeId {
    match ctx.types.ty(ty) {
        Type::Meta { wrapped } => wrapped,
        Type::Class(class) if ctx.symbols.is_singleton_class(class) => {
            match ctx.symbols.attached_class(class) {
                // Enum-derived classes stand for themselves in type
                // position.
                Some(attached)
                    if ctx.symbols.class(attached).flags.contains(ClassFlags::ENUM) =>
                {
                    ty
                }
                Some(attached) => ops::external_type(ctx.types, ctx.symbols, attached),
                None => ty,
            }
        }
        Type::Applied { class, .. } if ctx.symbols.is_singleton_class(class) => {
            match ctx.symbols.attached_class(class) {
                Some(attached) => ops::external_type(ctx.types, ctx.symbols, attached),
                None => ty,
            }
        }
        Type::Shape { keys, values } => {
            let unwrapped = values
                .iter()
                .map(|&v| unwrap_type(ctx, loc, v, enabled, errors))
                .collect();
            ctx.types.shape(keys, unwrapped)
        }
        Type::Tuple { elems } => {
            let unwrapped = elems
                .iter()
                .map(|&e| unwrap_type(ctx, loc, e, enabled, errors))
                .collect();
            ctx.types.tuple(unwrapped)
        }
        Type::Literal { .. } => {
            let builder = ErrorBuilder::new(
                enabled,
                loc,
                diagnostic_codes::BARE_TYPE_USAGE,
                format!(
                    "Unsupported usage of literal `{}` in type position",
                    show(ctx.types, ctx.symbols, ty)
                ),
            );
            errors.extend(builder.build());
            TypeId::UNTYPED
        }
        _ => ty,
    }
}
