//! Module `assign` implements root level assignments, a one-level sandbox for
//! probing, and unit propagation over the occurrence index.

/// Boolean constraint propagation
mod propagate;
/// assignment management
mod stack;

pub use self::{propagate::PropagateIF, stack::AssignStack};

use crate::types::*;

/// API for var and assignment inspection.
pub trait AssignIF {
    /// return the number of vars.
    fn num_vars(&self) -> usize;
    /// return the assigned value of a var.
    fn assign(&self, vi: VarId) -> Option<bool>;
    /// return the value of a literal.
    fn assigned(&self, l: Lit) -> Option<bool>;
    /// return the decision level of a var.
    fn level(&self, vi: VarId) -> DecisionLevel;
    /// return the current decision level.
    fn decision_level(&self) -> DecisionLevel;
    /// return the assignment sequence.
    fn trail(&self) -> &[Lit];
    /// return the literal at `n` on the trail.
    fn stack(&self, n: usize) -> Lit;
    /// return the length of the trail.
    fn stack_len(&self) -> usize;
    /// return `true` if some literal in `lits` is true.
    fn satisfies(&self, lits: &[Lit]) -> bool;
    /// return `true` if a var has a flag.
    fn is(&self, vi: VarId, flag: FlagVar) -> bool;
    /// set or reset a flag of a var.
    fn set(&mut self, vi: VarId, flag: FlagVar, b: bool);
    /// return `true` if a var can be eliminated, substituted or renumbered away.
    fn is_removable(&self, vi: VarId) -> bool;
    /// return the suggested polarity of a var.
    fn phase(&self, vi: VarId) -> Option<bool>;
    /// set the suggested polarity of a var.
    fn set_phase(&mut self, vi: VarId, b: bool);
}
