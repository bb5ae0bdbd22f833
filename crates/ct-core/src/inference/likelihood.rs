//! Log-likelihood of an input/response pair under a context tree.
//!
//! A position `t` of the input `X` is an occurrence when it has a response,
//! `Y[t + offset]`. Each occurrence is classified to its context `c` and its
//! response is one multinomial observation of row `c`. With `ss[c]` the
//! occurrence count of `c` and `N[c, a]` the occurrences answered by `a`,
//! the maximized log-likelihood (natural log) is
//!
//! ```text
//! log L = Σ_{c,a} N[c, a] · (ln N[c, a] − ln ss[c])
//! ```
//!
//! A memoryless tree treats the responses as i.i.d. draws:
//! `Σ_a N[a] · (ln N[a] − ln |Y|)`.
//!
//! When some occurrence window matches no context, the tree cannot explain
//! the data: the outcome is `-inf` with a populated mismatch record.

use crate::tree::{classify_until, ContextTree};
use ct_common::{Error, Result};
use ct_config::ResponseAlignment;
use ct_math::multinomial;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Input windows that no context of the tree matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMismatch {
    /// Number of unmatched positions.
    pub unmatched_positions: usize,
    /// First unmatched position (0-based).
    pub first_unmatched: usize,
}

/// Result of a likelihood evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikelihoodOutcome {
    /// Log-likelihood in nats; `-inf` when `mismatch` is set.
    pub log_likelihood: f64,
    /// Number of responses that contributed.
    pub observations: usize,
    /// Occurrences per context (`ss[c]`); a single entry for a memoryless
    /// tree.
    pub context_totals: Vec<u64>,
    /// Early positions whose context could not be decided yet.
    pub undetermined: usize,
    pub alignment: ResponseAlignment,
    /// Set when the tree does not cover the input.
    pub mismatch: Option<ModelMismatch>,
}

impl LikelihoodOutcome {
    /// True when the tree explains every position of the input.
    pub fn is_covered(&self) -> bool {
        self.mismatch.is_none()
    }
}

/// Log-likelihood of responses `response` given inputs `input` under `tree`.
///
/// Fails on empty sequences, differing lengths or symbols outside
/// `0..alphabet_size`. An uncovered input is not an error.
pub fn log_likelihood(
    tree: &ContextTree,
    alphabet_size: usize,
    input: &[usize],
    response: &[usize],
    alignment: ResponseAlignment,
) -> Result<LikelihoodOutcome> {
    if input.len() != response.len() {
        return Err(Error::LengthMismatch {
            input: input.len(),
            response: response.len(),
        });
    }
    if input.is_empty() {
        return Err(Error::InvalidSequence(
            "input and response sequences are empty".to_string(),
        ));
    }
    if tree.alphabet_size() != alphabet_size {
        return Err(Error::InvalidModel(format!(
            "tree uses {} symbols but {} were given",
            tree.alphabet_size(),
            alphabet_size
        )));
    }
    check_range(input, alphabet_size)?;
    check_range(response, alphabet_size)?;

    if tree.is_memoryless() {
        let mut counts = vec![0u64; alphabet_size];
        for &a in response {
            counts[a] += 1;
        }
        let log_likelihood = multinomial::log_likelihood(&counts);
        debug!(observations = response.len(), log_likelihood, "memoryless likelihood");
        return Ok(LikelihoodOutcome {
            log_likelihood,
            observations: response.len(),
            context_totals: vec![response.len() as u64],
            undetermined: 0,
            alignment,
            mismatch: None,
        });
    }

    let offset = alignment.offset();
    let classification = classify_until(tree, input, input.len().saturating_sub(offset));
    if let Some(&first_unmatched) = classification.unmatched.first() {
        let mismatch = ModelMismatch {
            unmatched_positions: classification.unmatched.len(),
            first_unmatched,
        };
        info!(
            unmatched = mismatch.unmatched_positions,
            first = first_unmatched,
            "input has windows outside the tree"
        );
        return Ok(LikelihoodOutcome {
            log_likelihood: f64::NEG_INFINITY,
            observations: 0,
            context_totals: vec![0; tree.len()],
            undetermined: classification.undetermined,
            alignment,
            mismatch: Some(mismatch),
        });
    }

    let mut joint = vec![0u64; tree.len() * alphabet_size];
    for (c, positions) in classification.positions.iter().enumerate() {
        let row = &mut joint[c * alphabet_size..(c + 1) * alphabet_size];
        for &t in positions {
            row[response[t + offset]] += 1;
        }
    }

    let context_totals: Vec<u64> = classification.counts.iter().map(|&n| n as u64).collect();
    let observations = classification.counts.iter().sum::<usize>();
    let rows = joint.chunks(alphabet_size).zip(context_totals.iter().copied());
    let log_likelihood = multinomial::log_likelihood_rows(rows);

    debug!(
        contexts = tree.len(),
        observations,
        undetermined = classification.undetermined,
        %alignment,
        log_likelihood,
        "context-tree likelihood"
    );

    Ok(LikelihoodOutcome {
        log_likelihood,
        observations,
        context_totals,
        undetermined: classification.undetermined,
        alignment,
        mismatch: None,
    })
}

fn check_range(symbols: &[usize], alphabet_size: usize) -> Result<()> {
    match symbols.iter().find(|&&s| s >= alphabet_size) {
        Some(&index) => Err(Error::SymbolOutOfRange {
            index,
            alphabet_size,
        }),
        None => Ok(()),
    }
}
