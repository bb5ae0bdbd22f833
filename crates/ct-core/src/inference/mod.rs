//! Inference over context-tree sources.
//!
//! This module provides:
//! - Past tables (enumeration and shift tables per depth)
//! - The single-pass streaming estimator of occurrence probabilities,
//!   transition probabilities and the entropy-rate trajectory
//! - The log-likelihood evaluator for input/response pairs

pub mod estimator;
pub mod likelihood;
pub mod past_table;

pub use estimator::{estimate, EmpiricalEstimate, StreamingEstimator};
pub use likelihood::{log_likelihood, LikelihoodOutcome, ModelMismatch};
pub use past_table::{table_cells, tables_cells, PastTable};
