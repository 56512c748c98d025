//! Type-parameter constraints collected during a single dispatch.
//!
//! A constraint owns upper and lower bounds for each type parameter in its
//! domain. The subtype kernel records bounds while matching arguments;
//! `solve` picks a type per parameter and verifies it against the bounds;
//! `instantiate` substitutes the solution into a type.

use crate::lattice;
use crate::ops::transform;
use crate::store::TypeStore;
use crate::types::Type;
use indexmap::IndexMap;
use rbz_common::{TypeId, TypeVarId};
use rbz_symbols::SymbolTable;
use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SolveState {
    Unsolved,
    Solved,
    Failed,
}

/// Bound maps are insertion-ordered so solving and diagnostics are
/// deterministic run to run.
#[derive(Debug)]
pub struct Constraint {
    domain: Vec<TypeVarId>,
    upper: IndexMap<TypeVarId, Vec<TypeId>>,
    lower: IndexMap<TypeVarId, Vec<TypeId>>,
    solution: IndexMap<TypeVarId, TypeId>,
    state: SolveState,
}

impl Constraint {
    /// The shared do-nothing constraint for non-generic, block-less calls.
    /// Recording on it fails, which makes stray type variables incomparable
    /// instead of silently inferred.
    pub fn empty() -> Self {
        Constraint::new(&[])
    }

    pub fn new(domain: &[TypeVarId]) -> Self {
        Constraint {
            domain: domain.to_vec(),
            upper: IndexMap::new(),
            lower: IndexMap::new(),
            solution: IndexMap::new(),
            state: SolveState::Unsolved,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.domain.is_empty()
    }

    pub fn is_solved(&self) -> bool {
        self.state == SolveState::Solved
    }

    pub fn has_failed(&self) -> bool {
        self.state == SolveState::Failed
    }

    pub fn declare(&mut self, var: TypeVarId) {
        if !self.domain.contains(&var) {
            self.domain.push(var);
        }
    }

    /// Record `var <: bound`. False when `var` is outside the domain.
    pub fn record_upper(&mut self, var: TypeVarId, bound: TypeId) -> bool {
        if !self.domain.contains(&var) {
            return false;
        }
        self.upper.entry(var).or_default().push(bound);
        true
    }

    /// Record `bound <: var`. False when `var` is outside the domain.
    pub fn record_lower(&mut self, var: TypeVarId, bound: TypeId) -> bool {
        if !self.domain.contains(&var) {
            return false;
        }
        self.lower.entry(var).or_default().push(bound);
        true
    }

    /// Pick a type for every parameter and verify it against the recorded
    /// bounds. Lower bounds win (their union); with only upper bounds their
    /// intersection is used; an unbounded parameter solves to untyped.
    pub fn solve(&mut self, store: &TypeStore, symbols: &SymbolTable) -> bool {
        if self.state != SolveState::Unsolved {
            return self.state == SolveState::Solved;
        }
        for &var in &self.domain {
            let lower = self.lower.get(&var).cloned().unwrap_or_default();
            let upper = self.upper.get(&var).cloned().unwrap_or_default();
            let solution = if !lower.is_empty() {
                lower
                    .iter()
                    .copied()
                    .reduce(|a, b| lattice::any(store, symbols, a, b))
                    .unwrap_or(TypeId::UNTYPED)
            } else if !upper.is_empty() {
                upper
                    .iter()
                    .copied()
                    .reduce(|a, b| lattice::all(store, symbols, a, b))
                    .unwrap_or(TypeId::UNTYPED)
            } else {
                TypeId::UNTYPED
            };
            for &bound in &upper {
                if !crate::subtype::is_subtype(store, symbols, solution, bound) {
                    trace!(var = var.0, "constraint solving failed");
                    self.state = SolveState::Failed;
                    return false;
                }
            }
            self.solution.insert(var, solution);
        }
        self.state = SolveState::Solved;
        true
    }

    /// The solved type for `var`, if solving succeeded.
    pub fn solution(&self, var: TypeVarId) -> Option<TypeId> {
        self.solution.get(&var).copied()
    }

    /// Best current approximation for `var` without solving: the solution if
    /// present, else the union of lower bounds, else untyped.
    pub fn approximation(&self, store: &TypeStore, symbols: &SymbolTable, var: TypeVarId) -> TypeId {
        if let Some(solution) = self.solution(var) {
            return solution;
        }
        self.lower
            .get(&var)
            .and_then(|bounds| {
                bounds
                    .iter()
                    .copied()
                    .reduce(|a, b| lattice::any(store, symbols, a, b))
            })
            .unwrap_or(TypeId::UNTYPED)
    }

    /// Substitute the solution through `ty`. Unknown variables become
    /// untyped so an unsolved hole can never leak out of a dispatch.
    pub fn instantiate(&self, store: &TypeStore, ty: TypeId) -> TypeId {
        transform(store, ty, &mut |node| match node {
            Type::TypeVar { var } => Some(self.solution(*var).unwrap_or(TypeId::UNTYPED)),
            _ => None,
        })
    }
}

#[cfg(test)]
#[path = "tests/constraint_tests.rs"]
mod tests;
