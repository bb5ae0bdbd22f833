//! Context classifier: assign each position of a sequence to its context.

use super::ContextTree;
use serde::Serialize;

/// Occurrence sets of every context in a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Occurrence count per context, aligned with `tree.contexts()`.
    pub counts: Vec<usize>,
    /// Positions (0-based, index of the window's last symbol) per context.
    pub positions: Vec<Vec<usize>>,
    /// Positions whose full-height window matches no context.
    pub unmatched: Vec<usize>,
    /// Leading positions with less than `height` symbols of history.
    pub undetermined: usize,
}

impl Classification {
    /// True when some position cannot be explained by the tree.
    pub fn has_unmatched(&self) -> bool {
        !self.unmatched.is_empty()
    }
}

/// Classify every position of `sequence` under `tree`.
pub fn classify(tree: &ContextTree, sequence: &[usize]) -> Classification {
    classify_until(tree, sequence, sequence.len())
}

/// Classify the positions `0..end` of `sequence` under `tree`.
///
/// Only positions with a full window of `height` symbols are classified, so
/// the first `height - 1` positions are undetermined whatever their symbols.
/// Position `t` then belongs to the unique context that `sequence[..=t]`
/// ends with, or is unmatched. A memoryless tree yields no occurrences.
pub fn classify_until(tree: &ContextTree, sequence: &[usize], end: usize) -> Classification {
    let end = end.min(sequence.len());
    let mut counts = vec![0; tree.len()];
    let mut positions = vec![Vec::new(); tree.len()];
    let mut unmatched = Vec::new();

    if tree.is_memoryless() {
        return Classification {
            counts,
            positions,
            unmatched,
            undetermined: 0,
        };
    }

    let height = tree.height();
    let first = height - 1;
    for t in first..end {
        match tree.find_suffix(&sequence[t + 1 - height..=t]) {
            Some(c) => {
                counts[c] += 1;
                positions[c].push(t);
            }
            None => unmatched.push(t),
        }
    }

    Classification {
        counts,
        positions,
        unmatched,
        undetermined: first.min(end),
    }
}
