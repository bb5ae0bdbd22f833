//! Single-pass streaming estimator.
//!
//! For a tree of height `h` over `m` symbols, the estimator keeps the index
//! of the current past at every depth `1..=h` and advances each one with its
//! shift table as symbols arrive. Nothing is re-searched per step.
//!
//! At position `p` (1-based) the valid depths are `1..=min(p, h)`:
//! - depth 1 is the symbol itself;
//! - depths `2..p` shift their previous past by the symbol;
//! - depth `p` (warm-up only, `p <= h`) is seeded by looking up the
//!   last `p` symbols.
//!
//! Once `p > h`, the old past at depth `h` and the new symbol form a joint
//! observation for the transition counts, and the running entropy-rate
//! estimate is
//!
//! ```text
//! H_p = Σ_s mu[s] · H(row s),   mu[s] = count_h[s] / (p - h + 1)
//! ```
//!
//! The weighted sum `Σ_s count_h[s] · H(row s)` is maintained incrementally:
//! a step changes one transition row and one past count.

use crate::inference::past_table::{table_cells, tables_cells};
use crate::inference::PastTable;
use crate::tree::FiniteMarkov;
use ct_common::{Error, Result};
use ct_math::{max_entropy_bits, normalize_by, normalize_rows, row_entropy_bits, zero_rows};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;

/// Estimates produced by one pass over a sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmpiricalEstimate {
    pub alphabet_size: usize,
    pub height: usize,
    /// Number of symbols consumed.
    pub sequence_length: usize,
    /// Occurrence probabilities per depth; `occurrence[k - 1]` has `m^k`
    /// entries normalized by `N - k + 1`.
    pub occurrence: Vec<Vec<f64>>,
    /// Row-normalized transition matrix at depth `height` (`m^h x m`).
    /// Rows of pasts never followed by a symbol are all zero.
    pub transition: Vec<Vec<f64>>,
    /// Entropy-rate estimate (bits) after each position; `None` while the
    /// first `height` symbols are still filling the window.
    pub entropy_trajectory: Vec<Option<f64>>,
    /// Number of all-zero transition rows.
    pub unobserved_pasts: usize,
}

impl EmpiricalEstimate {
    /// Occurrence probabilities of the pasts of length `depth`.
    pub fn occurrence_at(&self, depth: usize) -> Option<&[f64]> {
        depth
            .checked_sub(1)
            .and_then(|i| self.occurrence.get(i))
            .map(Vec::as_slice)
    }

    /// Last entropy value of the trajectory.
    pub fn final_entropy_rate(&self) -> Option<f64> {
        self.entropy_trajectory.iter().rev().find_map(|h| *h)
    }
}

/// Running state of the single-pass estimator.
#[derive(Debug)]
pub struct StreamingEstimator {
    alphabet_size: usize,
    height: usize,
    /// Past tables for depths `1..=height`; the last one is shared with the
    /// finite-Markov representation.
    tables: Vec<Arc<PastTable>>,
    /// Current past index per depth (valid for depths `1..=min(p, h)`).
    current: Vec<usize>,
    /// Occurrence counts per depth.
    counts: Vec<Vec<u64>>,
    /// Flattened `m^h x m` joint counts of (past, next symbol).
    joint: Vec<u64>,
    /// Cached entropy (bits) of each joint-count row.
    row_entropy: Vec<f64>,
    /// `Σ_s count_h[s] · row_entropy[s]`.
    weighted_entropy: f64,
    /// Last symbols seen, kept only while warming up.
    recent: VecDeque<usize>,
    trajectory: Vec<Option<f64>>,
    position: usize,
    max_entropy: f64,
}

impl StreamingEstimator {
    /// Prepare an estimator for sequences of `markov`'s source.
    ///
    /// The height table is taken from `markov`; tables for shallower depths
    /// are built here. Fails with `ResourceExhausted`, before allocating,
    /// when all depths together need more than `max_entries` cells.
    pub fn new(markov: &FiniteMarkov, max_entries: usize) -> Result<Self> {
        let height = markov.height();
        let m = markov.alphabet_size();
        if height == 0 {
            return Err(Error::InvalidModel(
                "the estimator needs a tree of height at least 1".to_string(),
            ));
        }
        let cells = footprint(m, height, max_entries)?;

        let mut tables = Vec::with_capacity(height);
        for depth in 1..height {
            tables.push(Arc::new(PastTable::build(m, depth, max_entries)?));
        }
        tables.push(Arc::clone(&markov.pasts));

        let counts = tables.iter().map(|t| vec![0u64; t.len()]).collect();
        let height_len = markov.pasts.len();
        debug!(
            height,
            alphabet_size = m,
            height_pasts = height_len,
            cells,
            "streaming estimator ready"
        );

        Ok(Self {
            alphabet_size: m,
            height,
            tables,
            current: vec![0; height],
            counts,
            joint: vec![0; height_len * m],
            row_entropy: vec![0.0; height_len],
            weighted_entropy: 0.0,
            recent: VecDeque::with_capacity(height),
            trajectory: Vec::new(),
            position: 0,
            max_entropy: max_entropy_bits(m),
        })
    }

    /// Number of symbols consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Consume one symbol and return the entropy estimate at this position.
    pub fn push(&mut self, symbol: usize) -> Result<Option<f64>> {
        if symbol >= self.alphabet_size {
            return Err(Error::SymbolOutOfRange {
                index: symbol,
                alphabet_size: self.alphabet_size,
            });
        }

        self.position += 1;
        let p = self.position;
        let h = self.height;
        let m = self.alphabet_size;

        if p <= h {
            self.recent.push_back(symbol);
        }

        // Joint observation (old past at height, symbol) in steady state.
        if p > h {
            let old = self.current[h - 1];
            let row = &mut self.joint[old * m..(old + 1) * m];
            row[symbol] += 1;
            let refreshed = row_entropy_bits(row);
            let occupancy = self.counts[h - 1][old] as f64;
            self.weighted_entropy += occupancy * (refreshed - self.row_entropy[old]);
            self.row_entropy[old] = refreshed;
        }

        for depth in 1..=p.min(h) {
            let index = if depth == 1 {
                symbol
            } else if depth < p {
                self.tables[depth - 1].shift(self.current[depth - 1], symbol)
            } else {
                self.seed(depth)?
            };
            self.current[depth - 1] = index;
            self.counts[depth - 1][index] += 1;
        }

        if p == h {
            self.recent = VecDeque::new();
        }

        let estimate = if p > h {
            let newest = self.current[h - 1];
            self.weighted_entropy += self.row_entropy[newest];
            let windows = (p - h + 1) as f64;
            Some((self.weighted_entropy / windows).clamp(0.0, self.max_entropy))
        } else {
            if p == h {
                self.weighted_entropy += self.row_entropy[self.current[h - 1]];
            }
            None
        };
        self.trajectory.push(estimate);
        Ok(estimate)
    }

    /// Index at `depth` of the last `depth` symbols, during warm-up.
    fn seed(&self, depth: usize) -> Result<usize> {
        let window: Vec<usize> = self
            .recent
            .iter()
            .skip(self.recent.len() - depth)
            .copied()
            .collect();
        self.tables[depth - 1].index_of(&window).ok_or_else(|| {
            Error::InvalidSequence(format!(
                "window {:?} missing from the depth-{} past table",
                window, depth
            ))
        })
    }

    /// Normalize the counts into the final estimate.
    ///
    /// Fails with `InvalidSequence` when fewer than `height` symbols (or
    /// none at all) were consumed.
    pub fn finish(self) -> Result<EmpiricalEstimate> {
        let n = self.position;
        if n == 0 || n < self.height {
            return Err(Error::InvalidSequence(format!(
                "{} symbols consumed, at least {} needed for height {}",
                n,
                self.height.max(1),
                self.height
            )));
        }

        let occurrence = self
            .counts
            .iter()
            .enumerate()
            .map(|(i, counts)| normalize_by(counts, (n - i) as u64))
            .collect();
        let transition = normalize_rows(&self.joint, self.alphabet_size);
        let unobserved_pasts = zero_rows(&self.joint, self.alphabet_size);

        let estimate = EmpiricalEstimate {
            alphabet_size: self.alphabet_size,
            height: self.height,
            sequence_length: n,
            occurrence,
            transition,
            entropy_trajectory: self.trajectory,
            unobserved_pasts,
        };
        debug!(
            sequence_length = n,
            unobserved_pasts,
            final_entropy = ?estimate.final_entropy_rate(),
            "streaming pass finished"
        );
        Ok(estimate)
    }
}

/// Cells held by an estimator: the table and counters of every depth, plus
/// the joint counts and cached row entropies at the height.
fn footprint(alphabet_size: usize, height: usize, max_cells: usize) -> Result<usize> {
    let tables = tables_cells(alphabet_size, height, max_cells)?;
    table_cells(alphabet_size, height)
        .and_then(|joint| tables.checked_add(joint))
        .filter(|&total| total <= max_cells)
        .ok_or(Error::ResourceExhausted {
            depth: height,
            alphabet_size,
            limit: max_cells,
        })
}

/// Run the estimator over `symbols` and return the final estimate.
pub fn estimate<I>(markov: &FiniteMarkov, symbols: I, max_entries: usize) -> Result<EmpiricalEstimate>
where
    I: IntoIterator<Item = usize>,
{
    let mut estimator = StreamingEstimator::new(markov, max_entries)?;
    for symbol in symbols {
        estimator.push(symbol)?;
    }
    estimator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::fixtures::{renewal_model, ternary_order_one};
    use crate::tree::{to_finite_markov, ContextModel, ContextTree};
    use ct_common::Alphabet;

    const BUDGET: usize = 1 << 20;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    fn order_one_binary() -> FiniteMarkov {
        let alphabet = Alphabet::numeric(2).unwrap();
        let tree = ContextTree::new(vec![vec![0], vec![1]], 2).unwrap();
        let model =
            ContextModel::new(alphabet, tree, vec![vec![0.5, 0.5], vec![0.5, 0.5]]).unwrap();
        to_finite_markov(&model, BUDGET).unwrap()
    }

    #[test]
    fn counts_every_window_at_every_depth() {
        let fm = to_finite_markov(&renewal_model(), BUDGET).unwrap();
        let est = estimate(&fm, [0, 1, 1, 0, 1], BUDGET).unwrap();

        assert_eq!(est.sequence_length, 5);
        // depth 1: two 0s, three 1s over 5 windows
        assert_eq!(est.occurrence_at(1).unwrap(), &[0.4, 0.6]);
        // depth 2 windows: 01, 11, 10, 01 -> indices 1, 3, 2, 1
        assert_eq!(est.occurrence_at(2).unwrap(), &[0.0, 0.5, 0.25, 0.25]);
    }

    #[test]
    fn transition_rows_from_joint_counts() {
        let fm = to_finite_markov(&renewal_model(), BUDGET).unwrap();
        let est = estimate(&fm, [0, 1, 1, 0, 1], BUDGET).unwrap();
        // 01 -> 1, 11 -> 0, 10 -> 1
        assert_eq!(est.transition[0], vec![0.0, 0.0]);
        assert_eq!(est.transition[1], vec![0.0, 1.0]);
        assert_eq!(est.transition[2], vec![0.0, 1.0]);
        assert_eq!(est.transition[3], vec![1.0, 0.0]);
        assert_eq!(est.unobserved_pasts, 1);
    }

    #[test]
    fn warm_up_positions_have_no_entropy() {
        let fm = to_finite_markov(&renewal_model(), BUDGET).unwrap();
        let est = estimate(&fm, [0, 1, 1, 0], BUDGET).unwrap();
        assert_eq!(est.entropy_trajectory.len(), 4);
        assert_eq!(est.entropy_trajectory[0], None);
        assert_eq!(est.entropy_trajectory[1], None);
        assert!(est.entropy_trajectory[2].is_some());
    }

    #[test]
    fn entropy_matches_direct_formula() {
        let fm = order_one_binary();
        let mut estimator = StreamingEstimator::new(&fm, BUDGET).unwrap();
        let seq = [0, 1, 0, 0, 1, 1];
        let mut last = None;
        for &s in &seq {
            last = estimator.push(s).unwrap();
        }
        // Depth-1 windows: 0,1,0,0,1,1 -> mu = (3/6, 3/6).
        // Transitions: 0->1, 1->0, 0->0, 0->1, 1->1 -> rows (1,2), (1,1).
        let h0 = row_entropy_bits(&[1, 2]);
        let h1 = 1.0;
        let expected = 0.5 * h0 + 0.5 * h1;
        assert!(approx_eq(last.unwrap(), expected, 1e-12));
    }

    #[test]
    fn height_one_counts_depth_once() {
        let fm = order_one_binary();
        let est = estimate(&fm, [1, 1, 0, 1], BUDGET).unwrap();
        assert_eq!(est.occurrence.len(), 1);
        assert_eq!(est.occurrence_at(1).unwrap(), &[0.25, 0.75]);
    }

    #[test]
    fn deterministic_row_has_zero_entropy() {
        let fm = order_one_binary();
        let est = estimate(&fm, vec![1; 50], BUDGET).unwrap();
        assert_eq!(est.final_entropy_rate(), Some(0.0));
    }

    #[test]
    fn ternary_rows_sum_to_one() {
        let fm = to_finite_markov(&ternary_order_one(), BUDGET).unwrap();
        let est = estimate(&fm, [0, 1, 2, 2, 0, 2, 1, 0], BUDGET).unwrap();
        for row in &est.transition {
            let s: f64 = row.iter().sum();
            assert!(s == 0.0 || approx_eq(s, 1.0, 1e-12));
        }
    }

    #[test]
    fn out_of_range_symbol_leaves_state_untouched() {
        let fm = order_one_binary();
        let mut estimator = StreamingEstimator::new(&fm, BUDGET).unwrap();
        estimator.push(1).unwrap();
        assert!(matches!(
            estimator.push(2),
            Err(Error::SymbolOutOfRange { index: 2, .. })
        ));
        assert_eq!(estimator.position(), 1);
    }

    #[test]
    fn short_sequences_are_rejected() {
        let fm = to_finite_markov(&renewal_model(), BUDGET).unwrap();
        assert!(matches!(
            estimate(&fm, [1], BUDGET),
            Err(Error::InvalidSequence(_))
        ));
        assert!(matches!(
            estimate(&fm, Vec::<usize>::new(), BUDGET),
            Err(Error::InvalidSequence(_))
        ));
    }

    #[test]
    fn all_depths_share_one_budget() {
        let alphabet = Alphabet::numeric(2).unwrap();
        let contexts = (0..8).map(|i| vec![i >> 2, (i >> 1) & 1, i & 1]).collect();
        let tree = ContextTree::new(contexts, 2).unwrap();
        let model = ContextModel::new(alphabet, tree, vec![vec![0.5, 0.5]; 8]).unwrap();
        // The height table alone needs 8 * 3 cells.
        let fm = to_finite_markov(&model, 60).unwrap();
        // Depths 1..=3 need 6 + 12 + 24 cells and the joint counts 24 more.
        assert!(matches!(
            StreamingEstimator::new(&fm, 60),
            Err(Error::ResourceExhausted {
                depth: 3,
                alphabet_size: 2,
                limit: 60
            })
        ));
        assert!(StreamingEstimator::new(&fm, 66).is_ok());
    }

    #[test]
    fn sequence_of_exactly_height_symbols() {
        let fm = to_finite_markov(&renewal_model(), BUDGET).unwrap();
        let est = estimate(&fm, [1, 0], BUDGET).unwrap();
        assert_eq!(est.occurrence_at(2).unwrap(), &[0.0, 0.0, 1.0, 0.0]);
        assert_eq!(est.final_entropy_rate(), None);
        assert_eq!(est.unobserved_pasts, 4);
    }
}
