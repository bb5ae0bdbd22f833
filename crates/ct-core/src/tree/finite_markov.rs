//! Finite-Markov representation of a context-tree model.
//!
//! Every past of length `height` ends with exactly one context of a complete
//! tree, so the model is an ordinary Markov chain on the `m^height` pasts:
//! from past `s` the next symbol `a` is drawn from the row of `s`'s context,
//! and the chain moves to `shift(s, a)`.
//!
//! The stationary distribution over pasts is found by power iteration on the
//! lazy chain `x ← (x + xT) / 2`, which has the same fixed points as `T` but
//! also converges for periodic chains.

use super::ContextModel;
use crate::inference::PastTable;
use ct_common::{Error, Result};
use ct_math::entropy_rate_bits;
use std::sync::Arc;
use tracing::{debug, warn};

/// L1 change below which power iteration stops.
const STATIONARY_TOLERANCE: f64 = 1e-12;

/// Power iteration budget.
const STATIONARY_MAX_ITERATIONS: usize = 100_000;

/// A context-tree model expanded onto all pasts of length `height`.
#[derive(Debug, Clone)]
pub struct FiniteMarkov {
    /// Enumeration and shift table of the pasts at `height`.
    pub pasts: Arc<PastTable>,
    /// Context index of each past.
    pub context_of_past: Vec<usize>,
    /// Next-symbol distribution of each past (`m^height x m`).
    pub transition: Vec<Vec<f64>>,
    /// Stationary distribution over pasts, when power iteration converged.
    pub stationary: Option<Vec<f64>>,
}

impl FiniteMarkov {
    pub fn height(&self) -> usize {
        self.pasts.depth()
    }

    pub fn alphabet_size(&self) -> usize {
        self.pasts.alphabet_size()
    }

    /// Entropy rate of the source in bits, when the stationary distribution
    /// is known.
    pub fn entropy_rate_bits(&self) -> Option<f64> {
        self.stationary
            .as_ref()
            .map(|mu| entropy_rate_bits(mu, &self.transition))
    }
}

/// Expand `model` onto its pasts of length `height`.
///
/// Fails with `InvalidModel` for memoryless models, `IncompleteTree` when a
/// past has no matching context, and `ResourceExhausted` when `m^height`
/// exceeds `max_entries`.
pub fn to_finite_markov(model: &ContextModel, max_entries: usize) -> Result<FiniteMarkov> {
    let height = model.height();
    if height == 0 {
        return Err(Error::InvalidModel(
            "a memoryless model has no finite-Markov expansion".to_string(),
        ));
    }

    let pasts = PastTable::build(model.alphabet().len(), height, max_entries)?;

    let mut context_of_past = Vec::with_capacity(pasts.len());
    let mut transition = Vec::with_capacity(pasts.len());
    for (_, past) in pasts.iter() {
        let context = model
            .tree()
            .find_suffix(&past)
            .ok_or_else(|| Error::IncompleteTree {
                past: model.alphabet().render(&past),
            })?;
        context_of_past.push(context);
        transition.push(model.transitions()[context].clone());
    }

    let stationary = stationary_distribution(&pasts, &transition);
    if stationary.is_none() {
        warn!(
            height,
            pasts = pasts.len(),
            "stationary distribution did not converge"
        );
    }
    debug!(
        height,
        pasts = pasts.len(),
        contexts = model.tree().len(),
        "built finite-Markov representation"
    );

    Ok(FiniteMarkov {
        pasts: Arc::new(pasts),
        context_of_past,
        transition,
        stationary,
    })
}

/// Stationary distribution of the chain on pasts by lazy power iteration.
fn stationary_distribution(pasts: &PastTable, transition: &[Vec<f64>]) -> Option<Vec<f64>> {
    let n = pasts.len();
    let mut current = vec![1.0 / n as f64; n];
    let mut next = vec![0.0; n];

    for _ in 0..STATIONARY_MAX_ITERATIONS {
        next.iter_mut()
            .zip(&current)
            .for_each(|(x, &c)| *x = 0.5 * c);
        for (s, row) in transition.iter().enumerate() {
            let mass = 0.5 * current[s];
            if mass == 0.0 {
                continue;
            }
            for (a, &p) in row.iter().enumerate() {
                next[pasts.shift(s, a)] += mass * p;
            }
        }

        let change: f64 = next
            .iter()
            .zip(&current)
            .map(|(a, b)| (a - b).abs())
            .sum();
        std::mem::swap(&mut current, &mut next);
        if change < STATIONARY_TOLERANCE {
            let total: f64 = current.iter().sum();
            return Some(current.into_iter().map(|x| x / total).collect());
        }
    }
    None
}
