//! Module `types' provides various building blocks, including
//! some common traits.

/// methods on CNF description
pub mod cnf;
/// methods on flags used in Var and Clause
pub mod flags;
/// methods on literals
pub mod lit;

pub use self::{cnf::*, flags::*, lit::*};

pub use crate::{cdb::ClauseRef, config::Config, processor::ProcessorEvent};

use std::fmt;

/// Var index; var 0 is not used.
pub type VarId = usize;

/// Decision level of an assignment; only 0 and 1 (for probing) are used.
pub type DecisionLevel = u32;

/// API for accessing internal data in a module.
/// For example, the orchestrator logs statistics of each technique,
/// which, however, should be used locally in the defining modules.
/// To avoid to make them public, we define a generic accessor or exporter here.
pub trait PropertyDereference<I, O: Sized> {
    fn derefer(&self, key: I) -> O;
}

/// API for object instantiation based on `Config` and `CNFDescription`.
///
/// # Example
///
/// ```
/// use sprep::{config::Config, types::*};
/// use sprep::{assign::AssignStack, cdb::ClauseDB};
/// let _ = ClauseDB::instantiate(&Config::default(), &CNFDescription::default());
/// let _ = AssignStack::instantiate(&Config::default(), &CNFDescription::default());
///```
pub trait Instantiate {
    /// make and return an object from `Config` and `CNFDescription`.
    fn instantiate(conf: &Config, cnf: &CNFDescription) -> Self;
    /// update by a processor event.
    fn handle(&mut self, _e: ProcessorEvent) {}
}

/// API for O(n) deletion from a list, providing `delete_unstable`.
pub trait Delete<T> {
    /// *O(n)* item deletion protocol.
    fn delete_unstable<F>(&mut self, filter: F)
    where
        F: FnMut(&T) -> bool;
}

impl<T> Delete<T> for Vec<T> {
    fn delete_unstable<F>(&mut self, filter: F)
    where
        F: FnMut(&T) -> bool,
    {
        if let Some(i) = self.iter().position(filter) {
            self.swap_remove(i);
        }
    }
}

/// Internal errors.
/// Note: the first three variants mean the formula is unsatisfiable;
/// they are not errors from the viewpoint of a caller.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum SolverError {
    /// A given CNF contains empty clauses or derives them during processing.
    #[error("an empty clause was derived")]
    EmptyClause,
    /// UNSAT with some internal context
    #[error("the formula became inconsistent")]
    Inconsistent,
    /// a root level assignment conflicts with an existing one.
    #[error("root level conflict on {0}")]
    RootLevelConflict(Lit),
    /// A clause contains a literal out of the range defined in its header.
    /// '0' is an example.
    #[error("invalid literal")]
    InvalidLiteral,
    /// a var index is out of the range of the current problem.
    #[error("var index out of range")]
    OutOfRange,
    /// a clause handle was used after compaction.
    #[error("stale clause handle {0}")]
    StaleHandle(ClauseRef),
    /// the external interrupt flag was raised.
    #[error("interrupted")]
    Interrupted,
    /// Exceptions caused by proof output
    #[error("I/O error on proof output")]
    IOError,
    /// An invariant of the engine was broken.
    #[error("internal invariant violation: {0}")]
    SolverBug(String),
}

impl SolverError {
    /// return `true` if this error is a proof of unsatisfiability.
    pub fn is_unsat(&self) -> bool {
        matches!(
            self,
            SolverError::EmptyClause | SolverError::Inconsistent | SolverError::RootLevelConflict(_)
        )
    }
}

/// A Return type used by processor functions.
pub type MaybeInconsistent = Result<(), SolverError>;

/// The outcome of a (pre|in)processing run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    /// all clauses were removed; any extension of the root assignment is a model.
    Sat,
    /// the empty clause was derived.
    Unsat,
    /// the formula was simplified but its status is open.
    Unknown,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Status::Sat => write!(f, "SATISFIABLE"),
            Status::Unsat => write!(f, "UNSATISFIABLE"),
            Status::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl From<MaybeInconsistent> for Status {
    fn from(r: MaybeInconsistent) -> Status {
        match r {
            Ok(()) => Status::Unknown,
            Err(e) if e.is_unsat() => Status::Unsat,
            Err(_) => Status::Unknown,
        }
    }
}
