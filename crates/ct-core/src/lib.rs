//! ctree Core Library
//!
//! Empirical statistics of context-tree (variable-length Markov) sources:
//! - Context trees, their finite-Markov representation and a context classifier
//! - Discrete sampling and sequence generation
//! - Past tables, the single-pass streaming estimator and the likelihood evaluator
//! - Reports, logging and exit codes for the CLI
//!
//! The binary entry point is in `main.rs`.

pub mod exit_codes;
pub mod inference;
pub mod logging;
pub mod output;
pub mod run;
pub mod sampling;
pub mod sequence;
pub mod tree;

pub use inference::{
    estimate, log_likelihood, EmpiricalEstimate, LikelihoodOutcome, PastTable, StreamingEstimator,
};
pub use tree::{classify, to_finite_markov, ContextModel, ContextTree, FiniteMarkov};
