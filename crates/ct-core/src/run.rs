//! Command runs: estimation, likelihood and model checks, and their reports.
//!
//! Each run returns a serializable report stamped with the schema version, a
//! run id and a generation timestamp. Rendering is left to [`crate::output`].

use crate::inference::{estimate, log_likelihood, EmpiricalEstimate, LikelihoodOutcome};
use crate::logging::{generate_run_id, Stage};
use crate::sampling::{seeded_rng, MarkovSource};
use crate::tree::{to_finite_markov, ContextModel, FiniteMarkov};
use chrono::Utc;
use ct_common::{Error, Result, SCHEMA_VERSION};
use ct_config::{ResponseAlignment, Settings};
use ct_math::shannon_entropy_bits;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// Header shared by all reports.
#[derive(Debug, Clone, Serialize)]
pub struct RunHeader {
    pub schema_version: String,
    pub run_id: String,
    /// RFC 3339 timestamp.
    pub generated_at: String,
}

impl RunHeader {
    pub fn new() -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            run_id: generate_run_id(),
            generated_at: Utc::now().to_rfc3339(),
        }
    }
}

impl Default for RunHeader {
    fn default() -> Self {
        Self::new()
    }
}

/// Shape of the model a run used.
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub alphabet: Vec<String>,
    pub height: usize,
    pub contexts: usize,
    /// Entropy rate of the source (bits), when the stationary distribution
    /// is available.
    pub theoretical_entropy_rate: Option<f64>,
}

impl ModelSummary {
    pub fn new(model: &ContextModel, markov: Option<&FiniteMarkov>) -> Self {
        let theoretical_entropy_rate = if model.height() == 0 {
            model.transitions().first().map(|row| shannon_entropy_bits(row))
        } else {
            markov.and_then(FiniteMarkov::entropy_rate_bits)
        };
        Self {
            alphabet: model.alphabet().symbols().to_vec(),
            height: model.height(),
            contexts: model.tree().len(),
            theoretical_entropy_rate,
        }
    }
}

/// Where the estimated sequence came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SequenceOrigin {
    /// Generated from the model.
    Generated { length: usize, seed: Option<u64> },
    /// Read from a sequence file.
    File { path: PathBuf },
}

/// Symbols to estimate from.
#[derive(Debug, Clone)]
pub enum SequenceInput {
    /// Generate `length` symbols from the model.
    Generate { length: usize, seed: Option<u64> },
    /// Use an already-encoded sequence read from `path`.
    Symbols { path: PathBuf, symbols: Vec<usize> },
}

/// Result of the `estimate` command.
#[derive(Debug, Clone, Serialize)]
pub struct EstimationReport {
    #[serde(flatten)]
    pub header: RunHeader,
    pub model: ModelSummary,
    pub sequence: SequenceOrigin,
    /// Stride applied to `estimate.entropy_trajectory` when rendered.
    pub trajectory_stride: usize,
    pub final_entropy_rate: Option<f64>,
    pub estimate: EmpiricalEstimate,
}

/// Result of the `likelihood` command.
#[derive(Debug, Clone, Serialize)]
pub struct LikelihoodReport {
    #[serde(flatten)]
    pub header: RunHeader,
    pub model: ModelSummary,
    pub sequence_length: usize,
    pub outcome: LikelihoodOutcome,
}

/// Result of the `check` command.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    #[serde(flatten)]
    pub header: RunHeader,
    pub model: ModelSummary,
    /// True when every past of length `height` has a context.
    pub complete: bool,
    /// First past without a context, for incomplete trees.
    pub uncovered_past: Option<String>,
    pub stationary_available: bool,
}

/// Generate or take a sequence and run the streaming estimator over it.
///
/// Generated sequences are streamed straight into the estimator.
pub fn run_estimation(
    model: &ContextModel,
    input: SequenceInput,
    settings: &Settings,
) -> Result<EstimationReport> {
    let header = RunHeader::new();
    let markov = to_finite_markov(model, settings.max_table_entries)?;
    info!(
        run_id = %header.run_id,
        stage = %Stage::Estimate,
        height = model.height(),
        alphabet_size = model.alphabet().len(),
        "starting estimation"
    );

    let (estimate, sequence) = match input {
        SequenceInput::Generate { length, seed } => {
            if length == 0 {
                return Err(Error::InvalidSequence(
                    "sequence length must be positive".to_string(),
                ));
            }
            let source = MarkovSource::new(model, Some(&markov), seeded_rng(seed))?;
            let empirical = estimate(&markov, source.take(length), settings.max_table_entries)?;
            (empirical, SequenceOrigin::Generated { length, seed })
        }
        SequenceInput::Symbols { path, symbols } => {
            let empirical = estimate(&markov, symbols, settings.max_table_entries)?;
            (empirical, SequenceOrigin::File { path })
        }
    };

    info!(
        run_id = %header.run_id,
        stage = %Stage::Estimate,
        sequence_length = estimate.sequence_length,
        final_entropy_rate = ?estimate.final_entropy_rate(),
        "estimation finished"
    );

    Ok(EstimationReport {
        model: ModelSummary::new(model, Some(&markov)),
        sequence,
        trajectory_stride: settings.trajectory_stride,
        final_entropy_rate: estimate.final_entropy_rate(),
        estimate,
        header,
    })
}

/// Evaluate the log-likelihood of `response` given `input` under `model`.
pub fn run_likelihood(
    model: &ContextModel,
    input: &[usize],
    response: &[usize],
    alignment: ResponseAlignment,
) -> Result<LikelihoodReport> {
    let header = RunHeader::new();
    let outcome = log_likelihood(
        model.tree(),
        model.alphabet().len(),
        input,
        response,
        alignment,
    )?;
    info!(
        run_id = %header.run_id,
        stage = %Stage::Likelihood,
        log_likelihood = outcome.log_likelihood,
        covered = outcome.is_covered(),
        "likelihood evaluated"
    );
    Ok(LikelihoodReport {
        header,
        model: ModelSummary::new(model, None),
        sequence_length: input.len(),
        outcome,
    })
}

/// Check completeness of `model` and whether its stationary distribution is
/// available.
///
/// An incomplete tree is reported, not returned as an error; table budget
/// failures still are.
pub fn run_check(model: &ContextModel, settings: &Settings) -> Result<CheckReport> {
    let header = RunHeader::new();
    if model.height() == 0 {
        return Ok(CheckReport {
            header,
            model: ModelSummary::new(model, None),
            complete: true,
            uncovered_past: None,
            stationary_available: true,
        });
    }

    match to_finite_markov(model, settings.max_table_entries) {
        Ok(markov) => Ok(CheckReport {
            header,
            stationary_available: markov.stationary.is_some(),
            model: ModelSummary::new(model, Some(&markov)),
            complete: true,
            uncovered_past: None,
        }),
        Err(Error::IncompleteTree { past }) => Ok(CheckReport {
            header,
            model: ModelSummary::new(model, None),
            complete: false,
            uncovered_past: Some(past),
            stationary_available: false,
        }),
        Err(e) => Err(e),
    }
}
