//! Sequence generation from a context-tree model.
//!
//! The first `height` symbols form an initial past drawn from the stationary
//! distribution over pasts (uniformly when it is unavailable). Each later
//! symbol is drawn from the row of the current past's context, and the past
//! advances through the shift table of the finite-Markov representation.
//! Memoryless models draw i.i.d. from their single row.

use super::DiscreteSampler;
use crate::tree::{ContextModel, FiniteMarkov};
use ct_common::{Error, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use tracing::{debug, warn};

/// RNG for generation: seeded when `seed` is given, OS-seeded otherwise.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

#[derive(Debug)]
enum Chain<'a> {
    Memoryless,
    Markov {
        markov: &'a FiniteMarkov,
        past: usize,
    },
}

/// Lazy, unbounded stream of symbol indices from a context-tree model.
#[derive(Debug)]
pub struct MarkovSource<'a, R> {
    samplers: Vec<DiscreteSampler>,
    chain: Chain<'a>,
    /// Initial past symbols not yet emitted.
    pending: VecDeque<usize>,
    rng: R,
}

impl<'a, R: Rng> MarkovSource<'a, R> {
    /// Start a source for `model`.
    ///
    /// Models of height at least 1 need their finite-Markov representation;
    /// memoryless models take `None`.
    pub fn new(model: &ContextModel, markov: Option<&'a FiniteMarkov>, mut rng: R) -> Result<Self> {
        let samplers = model
            .transitions()
            .iter()
            .map(|row| DiscreteSampler::new(row))
            .collect::<Result<Vec<_>>>()?;

        let height = model.height();
        if height == 0 {
            return Ok(Self {
                samplers,
                chain: Chain::Memoryless,
                pending: VecDeque::new(),
                rng,
            });
        }

        let markov = markov.ok_or_else(|| {
            Error::InvalidModel(format!(
                "a model of height {} needs its finite-Markov representation to generate",
                height
            ))
        })?;
        if markov.height() != height || markov.alphabet_size() != model.alphabet().len() {
            return Err(Error::InvalidModel(
                "finite-Markov representation does not belong to this model".to_string(),
            ));
        }

        let past = match &markov.stationary {
            Some(mu) => DiscreteSampler::new(mu)?.sample(&mut rng),
            None => {
                warn!(height, "no stationary distribution, drawing the initial past uniformly");
                rng.random_range(0..markov.pasts.len())
            }
        };
        let pending = VecDeque::from(markov.pasts.tuple(past));
        debug!(height, initial_past = past, "markov source ready");

        Ok(Self {
            samplers,
            chain: Chain::Markov { markov, past },
            pending,
            rng,
        })
    }
}

impl<R: Rng> Iterator for MarkovSource<'_, R> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if let Some(symbol) = self.pending.pop_front() {
            return Some(symbol);
        }
        match &mut self.chain {
            Chain::Memoryless => Some(self.samplers[0].sample(&mut self.rng)),
            Chain::Markov { markov, past } => {
                let context = markov.context_of_past[*past];
                let symbol = self.samplers[context].sample(&mut self.rng);
                *past = markov.pasts.shift(*past, symbol);
                Some(symbol)
            }
        }
    }
}

/// Generate `length` symbols from `model`.
pub fn generate<R: Rng>(
    model: &ContextModel,
    markov: Option<&FiniteMarkov>,
    length: usize,
    rng: R,
) -> Result<Vec<usize>> {
    if length == 0 {
        return Err(Error::InvalidSequence(
            "sequence length must be positive".to_string(),
        ));
    }
    Ok(MarkovSource::new(model, markov, rng)?.take(length).collect())
}
