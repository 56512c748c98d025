//! The static intrinsic registry.
//!
//! Intrinsics model built-in operations the ordinary signature system cannot
//! express. Each entry keys a handler tag by `(owner class, instance or
//! singleton, method name)`; the core loader consults the registry when it
//! enters a method so that `MethodDef::intrinsic` is populated exactly once,
//! at load time. The handlers themselves live in the dispatch crate; this
//! crate only knows the tags.

use crate::table::core_classes;
use rbz_common::ClassId;
use serde::Serialize;

/// Handler tags, one per built-in operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Intrinsic {
    // Type constructors on the T module
    TUntyped,
    TNoreturn,
    TNilable,
    TAny,
    TAll,
    TMust,
    TRevealType,
    TProc,

    // Generic instantiation: `Array[Integer]`
    GenericSquareBrackets,

    // Class primitives
    ObjectClass,
    ObjectSingletonClass,
    ClassNew,

    // Runtime-call shims on the hidden Magic owner
    MagicBuildHash,
    MagicBuildArray,
    MagicBuildRange,
    MagicExpandSplat,
    MagicCallWithSplat,
    MagicCallWithBlock,
    MagicCallWithSplatAndBlock,
    MagicSplat,
    MagicSelfNew,
    MagicSuggestType,

    // Shape operations
    ShapeSquareBrackets,
    ShapeSquareBracketsEq,
    ShapeMerge,
    ShapeToHash,

    // Tuple operations
    TupleSquareBrackets,
    TupleFirst,
    TupleLast,
    TupleMin,
    TupleMax,
    TupleToA,
    TupleConcat,

    // Array element refinement
    ArrayFlatten,
    ArrayProduct,
    ArrayZip,
    ArrayCompact,

    // Module#=== static evaluation
    ModuleTripleEq,
}

/// One registry row. `singleton` selects the owner's singleton class.
pub struct IntrinsicEntry {
    pub owner: ClassId,
    pub singleton: bool,
    pub name: &'static str,
    pub intrinsic: Intrinsic,
}

const fn entry(
    owner: ClassId,
    singleton: bool,
    name: &'static str,
    intrinsic: Intrinsic,
) -> IntrinsicEntry {
    IntrinsicEntry {
        owner,
        singleton,
        name,
        intrinsic,
    }
}

/// Registered once; consulted by equality on the triple during loading.
pub const INTRINSIC_REGISTRY: &[IntrinsicEntry] = &[
    entry(core_classes::T_MODULE, true, "untyped", Intrinsic::TUntyped),
    entry(core_classes::T_MODULE, true, "noreturn", Intrinsic::TNoreturn),
    entry(core_classes::T_MODULE, true, "nilable", Intrinsic::TNilable),
    entry(core_classes::T_MODULE, true, "any", Intrinsic::TAny),
    entry(core_classes::T_MODULE, true, "all", Intrinsic::TAll),
    entry(core_classes::T_MODULE, true, "must", Intrinsic::TMust),
    entry(core_classes::T_MODULE, true, "reveal_type", Intrinsic::TRevealType),
    entry(core_classes::T_MODULE, true, "proc", Intrinsic::TProc),
    entry(core_classes::ARRAY, true, "[]", Intrinsic::GenericSquareBrackets),
    entry(core_classes::HASH, true, "[]", Intrinsic::GenericSquareBrackets),
    entry(core_classes::RANGE, true, "[]", Intrinsic::GenericSquareBrackets),
    entry(core_classes::OBJECT, false, "class", Intrinsic::ObjectClass),
    entry(
        core_classes::OBJECT,
        false,
        "singleton_class",
        Intrinsic::ObjectSingletonClass,
    ),
    entry(core_classes::CLASS, false, "new", Intrinsic::ClassNew),
    entry(core_classes::MAGIC, false, "<build-hash>", Intrinsic::MagicBuildHash),
    entry(core_classes::MAGIC, false, "<build-array>", Intrinsic::MagicBuildArray),
    entry(core_classes::MAGIC, false, "<build-range>", Intrinsic::MagicBuildRange),
    entry(core_classes::MAGIC, false, "<expand-splat>", Intrinsic::MagicExpandSplat),
    entry(
        core_classes::MAGIC,
        false,
        "<call-with-splat>",
        Intrinsic::MagicCallWithSplat,
    ),
    entry(
        core_classes::MAGIC,
        false,
        "<call-with-block>",
        Intrinsic::MagicCallWithBlock,
    ),
    entry(
        core_classes::MAGIC,
        false,
        "<call-with-splat-and-block>",
        Intrinsic::MagicCallWithSplatAndBlock,
    ),
    entry(core_classes::MAGIC, false, "<splat>", Intrinsic::MagicSplat),
    entry(core_classes::MAGIC, false, "<self-new>", Intrinsic::MagicSelfNew),
    entry(core_classes::MAGIC, false, "<suggest-type>", Intrinsic::MagicSuggestType),
    entry(core_classes::SHAPE, false, "[]", Intrinsic::ShapeSquareBrackets),
    entry(core_classes::SHAPE, false, "[]=", Intrinsic::ShapeSquareBracketsEq),
    entry(core_classes::SHAPE, false, "merge", Intrinsic::ShapeMerge),
    entry(core_classes::SHAPE, false, "to_hash", Intrinsic::ShapeToHash),
    entry(core_classes::TUPLE, false, "[]", Intrinsic::TupleSquareBrackets),
    entry(core_classes::TUPLE, false, "first", Intrinsic::TupleFirst),
    entry(core_classes::TUPLE, false, "last", Intrinsic::TupleLast),
    entry(core_classes::TUPLE, false, "min", Intrinsic::TupleMin),
    entry(core_classes::TUPLE, false, "max", Intrinsic::TupleMax),
    entry(core_classes::TUPLE, false, "to_a", Intrinsic::TupleToA),
    entry(core_classes::TUPLE, false, "concat", Intrinsic::TupleConcat),
    entry(core_classes::ARRAY, false, "flatten", Intrinsic::ArrayFlatten),
    entry(core_classes::ARRAY, false, "product", Intrinsic::ArrayProduct),
    entry(core_classes::ARRAY, false, "zip", Intrinsic::ArrayZip),
    entry(core_classes::ARRAY, false, "compact", Intrinsic::ArrayCompact),
    entry(core_classes::MODULE, false, "===", Intrinsic::ModuleTripleEq),
];

/// Look up the tag for `(owner, singleton, name)`, if any.
pub fn lookup_intrinsic(owner: ClassId, singleton: bool, name: &str) -> Option<Intrinsic> {
    INTRINSIC_REGISTRY
        .iter()
        .find(|e| e.owner == owner && e.singleton == singleton && e.name == name)
        .map(|e| e.intrinsic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_no_duplicate_triples() {
        for (i, a) in INTRINSIC_REGISTRY.iter().enumerate() {
            for b in &INTRINSIC_REGISTRY[i + 1..] {
                assert!(
                    !(a.owner == b.owner && a.singleton == b.singleton && a.name == b.name),
                    "duplicate intrinsic registration: {:?}/{}/{}",
                    a.owner,
                    a.singleton,
                    a.name
                );
            }
        }
    }

    #[test]
    fn lookup_finds_registered_entries() {
        assert_eq!(
            lookup_intrinsic(core_classes::T_MODULE, true, "must"),
            Some(Intrinsic::TMust)
        );
        assert_eq!(
            lookup_intrinsic(core_classes::MODULE, false, "==="),
            Some(Intrinsic::ModuleTripleEq)
        );
        assert_eq!(lookup_intrinsic(core_classes::OBJECT, true, "class"), None);
    }
}
