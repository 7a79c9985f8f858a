//! This is a CNF preprocessor and inprocessor for CDCL SAT solvers in Rust.
//!
//! ```
//! use sprep::*;
//!
//! let mut pp = Preprocessor::try_from(vec![vec![1, 2], vec![-1, 2], vec![-2]]).expect("valid");
//! assert_eq!(pp.preprocess(), Status::Unsat);
//! ```
/// Module `assign` implements root level assignments and propagation.
pub mod assign;
/// Module `big` provides the binary implication graph.
pub mod big;
/// Module `cdb` provides the clause arena and the occurrence index.
pub mod cdb;
/// Module `config` provides the configuration.
pub mod config;
/// Module `extend` provides the model extension stack.
pub mod extend;
/// Module `preprocessor` provides the top-level API.
pub mod preprocessor;
/// Module `processor` implements the simplification techniques.
pub mod processor;
/// Module `proof` provides proof sinks.
pub mod proof;
/// Module `types` provides various building blocks, including some common traits.
pub mod types;

pub use {
    config::Config,
    preprocessor::{Preprocessor, SolverIF},
    types::{Lit, SolverError, Status},
};
