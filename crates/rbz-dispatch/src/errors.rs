//! Diagnostic construction helpers shared by the dispatch components.

use crate::args::{DispatchArgs, TypeAndOrigins};
use crate::ctx::DispatchCtx;
use rbz_common::{Loc, MethodId, Section};
use rbz_symbols::MethodDef;

/// `Owner#name` for instance methods, `Owner.name` for methods on singleton
/// classes.
pub(crate) fn method_ref(ctx: &DispatchCtx, method_id: MethodId) -> String {
    let method = ctx.symbols.method(method_id);
    let name = ctx.symbols.name(method.name);
    if let Some(attached) = ctx.symbols.attached_class(method.owner) {
        let owner = ctx.symbols.name(ctx.symbols.class(attached).name);
        format!("{owner}.{name}")
    } else {
        let owner = ctx.symbols.name(ctx.symbols.class(method.owner).name);
        format!("{owner}#{name}")
    }
}

/// Positional-arity rendering: `2`, `1..3`, or `2+`.
pub(crate) fn pretty_arity(method: &MethodDef) -> String {
    let mut required = 0usize;
    let mut optional = 0usize;
    let mut rest = false;
    for arg in method.formals() {
        if arg.is_keyword() {
            continue;
        }
        if arg.is_repeated() {
            rest = true;
        } else if arg.has_default() {
            optional += 1;
        } else {
            required += 1;
        }
    }
    if rest {
        format!("{required}+")
    } else if optional > 0 {
        format!("{required}..{}", required + optional)
    } else {
        required.to_string()
    }
}

/// "Got `X` originating from:" section built from an actual's origins, with
/// the uninitialized-local fallback.
pub(crate) fn origins_section(
    ctx: &DispatchCtx,
    args: &DispatchArgs,
    actual: &TypeAndOrigins,
) -> Section {
    let shown = rbz_types::show(ctx.types, ctx.symbols, actual.ty);
    let mut entries: Vec<(Loc, String)> = actual
        .origins
        .iter()
        .map(|&loc| (loc, String::new()))
        .collect();
    if entries.is_empty() && args.origin_for_uninitialized.exists() {
        entries.push((args.origin_for_uninitialized, String::new()));
    }
    Section {
        header: format!("Got `{shown}` originating from:"),
        entries,
    }
}

/// "Method `Owner#f` defined here:" section.
pub(crate) fn defined_here_section(ctx: &DispatchCtx, method_id: MethodId) -> Section {
    let method = ctx.symbols.method(method_id);
    Section {
        header: format!("`{}` defined here:", method_ref(ctx, method_id)),
        entries: if method.loc.exists() {
            vec![(method.loc, String::new())]
        } else {
            Vec::new()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rbz_common::TypeId;
    use rbz_symbols::{ClassFlags, SymbolTable, core_classes};

    #[test]
    fn pretty_arity_formats() {
        let mut table = SymbolTable::with_core();
        let owner = table.enter_class("Widget", core_classes::OBJECT, ClassFlags::empty());
        let two = table
            .enter_method(owner, "two")
            .arg("a", TypeId::UNTYPED)
            .arg("b", TypeId::UNTYPED)
            .define();
        assert_eq!(pretty_arity(table.method(two)), "2");

        let ranged = table
            .enter_method(owner, "ranged")
            .arg("a", TypeId::UNTYPED)
            .opt_arg("b", TypeId::UNTYPED)
            .opt_arg("c", TypeId::UNTYPED)
            .define();
        assert_eq!(pretty_arity(table.method(ranged)), "1..3");

        let rest = table
            .enter_method(owner, "rest")
            .arg("a", TypeId::UNTYPED)
            .arg("b", TypeId::UNTYPED)
            .rest_arg("xs", TypeId::UNTYPED)
            .define();
        assert_eq!(pretty_arity(table.method(rest)), "2+");

        // Keyword formals do not count toward positional arity.
        let kw = table
            .enter_method(owner, "kw")
            .arg("a", TypeId::UNTYPED)
            .kw_arg("k", TypeId::UNTYPED)
            .define();
        assert_eq!(pretty_arity(table.method(kw)), "1");
    }
}
