//! Method dispatch core for the rbz type checker.
//!
//! Given a receiver type, a method name, argument types, and an optional
//! block, `dispatch` resolves the call against the type lattice and produces
//! an inferred return type, constraints on inferred type variables, and a
//! stream of diagnostics. The pieces:
//!
//! - `dispatcher` - variant dispatch on the receiver (unions, intersections,
//!   proxies, metatypes)
//! - `call` - the symbol-based path: lookup, overload pick, matching,
//!   return-type computation, constraint solving
//! - `matcher` - positional/keyword/splat/block calling convention
//! - `overloads` - arity-based overload selection
//! - `block` - block formal matching and `to_proc` coercion
//! - `intrinsics` - built-in operations the signature system cannot express
//! - `unwrap` - lifting class-of-X values back to the type X
//! - `arguments_query` - formal-parameter types without a full dispatch
//!
//! The core is single-threaded and recursive; the symbol table and type
//! store are read-only throughout, and every diagnostic is queued on the
//! result being built so that union/intersection callers can merge or
//! discard it.

pub mod args;
pub mod arguments_query;
mod block;
mod call;
pub mod ctx;
pub mod dispatcher;
mod errors;
mod intrinsics;
mod matcher;
mod overloads;
pub mod result;
pub mod testing;
pub mod unwrap;

pub use args::{BlockArg, CallLocs, DispatchArgs, TypeAndOrigins};
pub use arguments_query::get_call_arguments;
pub use ctx::DispatchCtx;
pub use dispatcher::dispatch;
pub use result::{BlockSpec, Combinator, DispatchComponent, DispatchResult};
pub use unwrap::unwrap_type;

#[cfg(test)]
#[path = "tests/mod.rs"]
mod tests;
