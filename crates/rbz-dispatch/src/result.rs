//! Dispatch results.
//!
//! A result is a chain: `main` plus an optional `secondary` result joined by
//! an AND (intersection receiver) or OR (union receiver) link. Each
//! component owns its errors; callers decide whether to surface or discard
//! them when merging.

use rbz_common::{Diagnostic, MethodId, TypeId};
use rbz_symbols::ArgInfo;
use rbz_types::Constraint;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Combinator {
    And,
    Or,
}

/// The resolved block formal, exposed to control-flow analysis so it can
/// type-check the block body.
#[derive(Clone, Debug)]
pub struct BlockSpec {
    pub method: MethodId,
    pub formal: ArgInfo,
}

/// One resolved (or unresolved) component of a dispatch.
#[derive(Debug)]
pub struct DispatchComponent {
    pub receiver: TypeId,
    pub method: Option<MethodId>,
    /// Bounds collected for the method's type parameters. Solved before the
    /// result is returned unless a block is attached, in which case the
    /// caller solves after processing the block body.
    pub constr: Constraint,
    /// Expected input signature of an attached block.
    pub block_pre_type: Option<TypeId>,
    /// Proc-return projection of the block formal, stripped of nil.
    pub block_return_type: Option<TypeId>,
    pub block_spec: Option<BlockSpec>,
    pub errors: Vec<Diagnostic>,
    /// The component's own view of the send's type, before merging.
    pub send_type: TypeId,
}

impl DispatchComponent {
    /// A component for a receiver on which nothing was resolved.
    pub fn unresolved(receiver: TypeId) -> Self {
        DispatchComponent {
            receiver,
            method: None,
            constr: Constraint::empty(),
            block_pre_type: None,
            block_return_type: None,
            block_spec: None,
            errors: Vec::new(),
            send_type: TypeId::UNTYPED,
        }
    }
}

#[derive(Debug)]
pub struct DispatchResult {
    pub return_type: TypeId,
    pub main: DispatchComponent,
    pub secondary: Option<Box<DispatchResult>>,
    pub secondary_kind: Option<Combinator>,
}

impl DispatchResult {
    pub fn new(return_type: TypeId, main: DispatchComponent) -> Self {
        DispatchResult {
            return_type,
            main,
            secondary: None,
            secondary_kind: None,
        }
    }

    /// The untyped recovery result: untyped return, nothing resolved, no
    /// errors.
    pub fn untyped(receiver: TypeId) -> Self {
        DispatchResult::new(TypeId::UNTYPED, DispatchComponent::unresolved(receiver))
    }

    /// Walk the chain: true iff every component resolved a method, where
    /// OR links require both sides and AND links tolerate a missing side.
    pub fn all_components_present(&self) -> bool {
        if self.main.method.is_none() {
            return false;
        }
        match (&self.secondary, self.secondary_kind) {
            (Some(secondary), Some(Combinator::Or)) => secondary.all_components_present(),
            _ => true,
        }
    }

    /// Append `other` at the end of this result's chain under `kind`, and
    /// take `return_type` as the merged return.
    pub fn merge(mut self, other: DispatchResult, kind: Combinator, return_type: TypeId) -> Self {
        self.attach(other, kind);
        self.return_type = return_type;
        self
    }

    fn attach(&mut self, other: DispatchResult, kind: Combinator) {
        match self.secondary.as_mut() {
            Some(next) => next.attach(other, kind),
            None => {
                self.secondary = Some(Box::new(other));
                self.secondary_kind = Some(kind);
            }
        }
    }

    /// Every component in the chain, main first.
    pub fn components(&self) -> Vec<&DispatchComponent> {
        let mut out = vec![&self.main];
        let mut cursor = &self.secondary;
        while let Some(result) = cursor {
            out.push(&result.main);
            cursor = &result.secondary;
        }
        out
    }

    /// Drain every diagnostic in the chain, in discovery order. This is how
    /// a caller moves a result's errors onto its global queue.
    pub fn take_errors(&mut self) -> Vec<Diagnostic> {
        let mut out = std::mem::take(&mut self.main.errors);
        let mut cursor = &mut self.secondary;
        while let Some(result) = cursor {
            out.append(&mut result.main.errors);
            cursor = &mut result.secondary;
        }
        out
    }
}
