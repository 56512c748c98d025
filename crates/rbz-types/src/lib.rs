//! Type lattice and subtype kernel for the rbz type checker.
//!
//! This crate provides:
//! - `TypeStore` - hash-consing arena of type nodes addressed by `TypeId`
//! - `Type` - the sealed lattice variant set
//! - `lattice::{any, all, glb}` - normalized union/intersection construction
//! - `subtype` - the subtype relation, plain and under-constraint
//! - `Constraint` - per-type-parameter bounds for generic method inference
//! - `ops` - projections and substitutions (`underlying`, `drop_nil`,
//!   `result_type_as_seen_from`, ...)
//! - `show` - diagnostic rendering

pub mod constraint;
pub mod lattice;
pub mod ops;
pub mod show;
pub mod store;
pub mod subtype;
pub mod types;

pub use constraint::Constraint;
pub use lattice::{all, any, glb};
pub use ops::{
    approximate, drop_literal, drop_nil, external_type, get_proc_arity, get_proc_return_type,
    replace_self_type, represented_class, result_type_as_seen_from, transform, underlying,
    underlying_class, widen,
};
pub use show::show;
pub use store::TypeStore;
pub use subtype::{UntypedMode, derives_from_class, is_nilable, is_subtype, is_subtype_under_constraint};
pub use types::{LiteralValue, Type};
