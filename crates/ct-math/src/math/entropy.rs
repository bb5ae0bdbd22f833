//! Shannon entropy and entropy rate, in bits.
//!
//! For a stationary Markov chain with transition matrix `P` and stationary
//! distribution `mu`:
//!
//! ```text
//! H'(X) = -Σ_s mu_s Σ_a P(a|s) · log₂ P(a|s)
//! ```
//!
//! Properties used by the tests:
//! - `0 ≤ H'(X) ≤ log₂(m)` for an alphabet of size `m`
//! - `H'(X) = 0` iff every observed row is deterministic

use super::stable::xlog2x;

/// Shannon entropy of a probability vector, in bits.
///
/// Zero entries contribute nothing. The vector is not renormalized.
pub fn shannon_entropy_bits(probs: &[f64]) -> f64 {
    let h: f64 = probs.iter().map(|&p| -xlog2x(p)).sum();
    // -0.0 and tiny negative rounding both read as zero entropy
    h.max(0.0)
}

/// Entropy in bits of one row of counts, normalized by the row sum.
///
/// A row with zero mass has zero entropy.
pub fn row_entropy_bits(counts: &[u64]) -> f64 {
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    let h: f64 = counts
        .iter()
        .map(|&c| -xlog2x(c as f64 / total))
        .sum();
    h.max(0.0)
}

/// Entropy rate `Σ_s mu[s] · H(P[s, ·])` in bits.
///
/// `transition` rows that are all zero (never observed) contribute zero.
/// Returns NaN when the row counts disagree.
pub fn entropy_rate_bits(mu: &[f64], transition: &[Vec<f64>]) -> f64 {
    if mu.len() != transition.len() {
        return f64::NAN;
    }
    mu.iter()
        .zip(transition)
        .filter(|&(&w, _)| w > 0.0)
        .map(|(&w, row)| w * shannon_entropy_bits(row))
        .sum()
}

/// Upper bound `log₂(m)` for an alphabet of size `m`.
pub fn max_entropy_bits(alphabet_size: usize) -> f64 {
    if alphabet_size == 0 {
        return 0.0;
    }
    (alphabet_size as f64).log2()
}
