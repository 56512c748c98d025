//! Core type definitions for the type lattice.
//!
//! The lattice is a sealed sum; everything that walks it matches
//! exhaustively. Nodes live in a [`crate::TypeStore`] arena and reference
//! each other through `TypeId` handles, so structural sharing is free and
//! equality on handles is equality on hash-consed structure.

use rbz_common::{ClassId, MethodId, NameId, TypeId, TypeVarId};
use serde::Serialize;

/// A literal value for singleton value types.
///
/// Floats are stored as raw bits so the node stays hashable; use
/// [`LiteralValue::float`] and [`LiteralValue::as_f64`] at the edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum LiteralValue {
    Symbol(NameId),
    String(NameId),
    Integer(i64),
    Float(u64),
    Boolean(bool),
}

impl LiteralValue {
    pub fn float(value: f64) -> Self {
        LiteralValue::Float(value.to_bits())
    }

    pub fn as_f64(self) -> Option<f64> {
        match self {
            LiteralValue::Float(bits) => Some(f64::from_bits(bits)),
            _ => None,
        }
    }

    pub fn as_integer(self) -> Option<i64> {
        match self {
            LiteralValue::Integer(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_symbol(self) -> Option<NameId> {
        match self {
            LiteralValue::Symbol(name) => Some(name),
            _ => None,
        }
    }
}

/// All type variants.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Type {
    /// The untyped fixpoint. `blame` names the method that introduced the
    /// untypedness, for diagnostics only; blamed and blame-free untyped are
    /// otherwise the same type.
    Untyped { blame: Option<MethodId> },
    /// `T.noreturn`.
    Bottom,
    /// `T.anything`.
    Top,
    /// Statement positions with no value.
    Void,
    /// A nominal class or module instance type.
    Class(ClassId),
    /// A generic instantiation.
    Applied { class: ClassId, targs: Vec<TypeId> },
    /// A singleton value type. Proxy: underlies to `Class(underlying)`.
    Literal {
        underlying: ClassId,
        value: LiteralValue,
    },
    /// Record type with literal keys, in definition order. Proxy: underlies
    /// to an applied Hash. Invariant: `keys.len() == values.len()` and every
    /// key is a `Literal`.
    Shape { keys: Vec<TypeId>, values: Vec<TypeId> },
    /// Fixed-length heterogeneous sequence. Proxy: underlies to an applied
    /// Array.
    Tuple { elems: Vec<TypeId> },
    /// Union. Construction normalizes: neither side is itself an `Or` with
    /// the same partners, and subsumed components are dropped.
    Or { left: TypeId, right: TypeId },
    /// Intersection, normalized analogously.
    And { left: TypeId, right: TypeId },
    /// A type surfaced as a first-class value.
    Meta { wrapped: TypeId },
    /// A generic method's type parameter during inference.
    TypeVar { var: TypeVarId },
    /// The receiver's self type (or its attached class) as seen in
    /// signatures.
    SelfTypeParam { owner: ClassId, name: NameId },
    /// A generic class's type member used as a type, with its declared
    /// bounds.
    LambdaParam {
        class: ClassId,
        index: u32,
        upper: TypeId,
        lower: TypeId,
    },
}

impl Type {
    /// Proxy variants expose an `underlying` projection to a plain class or
    /// applied type.
    pub fn is_proxy(&self) -> bool {
        matches!(
            self,
            Type::Literal { .. } | Type::Shape { .. } | Type::Tuple { .. }
        )
    }

    pub fn is_untyped(&self) -> bool {
        matches!(self, Type::Untyped { .. })
    }
}
