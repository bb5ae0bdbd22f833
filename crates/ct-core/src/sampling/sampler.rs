//! Independent draws from a finite support.

use ct_common::{Error, Result};
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;

/// Sampler over `0..n` with fixed probabilities.
#[derive(Debug, Clone)]
pub struct DiscreteSampler {
    index: WeightedIndex<f64>,
}

impl DiscreteSampler {
    /// Build a sampler from a probability vector.
    ///
    /// The vector need not be normalized, but it must be non-empty with
    /// finite non-negative entries and positive total mass.
    pub fn new(probabilities: &[f64]) -> Result<Self> {
        if probabilities.is_empty() {
            return Err(Error::InvalidModel(
                "cannot sample from an empty distribution".to_string(),
            ));
        }
        let index = WeightedIndex::new(probabilities).map_err(|e| {
            Error::InvalidModel(format!("invalid sampling distribution: {}", e))
        })?;
        Ok(Self { index })
    }

    /// Draw one index.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        self.index.sample(rng)
    }
}
