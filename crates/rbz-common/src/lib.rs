//! Common types and utilities for the rbz type checker.
//!
//! This crate provides foundational types used across all rbz crates:
//! - Shared id newtypes (`FileId`, `NameId`, `ClassId`, `MethodId`, `TypeId`)
//! - Source spans and locations (`Span`, `Loc`)
//! - Diagnostics as data (`Diagnostic`, `ErrorBuilder`, code constants)
//! - Checker configuration (`CheckerOptions`, `Strictness`)

// Shared id newtypes - centralized to break circular dependencies
pub mod ids;
pub use ids::{ClassId, FileId, MethodId, NameId, TypeId, TypeVarId};

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::{Loc, Span};

// Diagnostics - errors are data, never control flow
pub mod diagnostics;
pub use diagnostics::{
    Autocorrect, Diagnostic, DiagnosticCategory, Edit, ErrorBuilder, Section, diagnostic_codes,
};

// Checker configuration
pub mod options;
pub use options::{CheckerOptions, Strictness};
