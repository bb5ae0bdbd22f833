//! Context trees and context-tree models.
//!
//! A context is a sequence of symbol indices written oldest first. A context
//! `c` matches a history `x[..=t]` when the history ends with `c`. The
//! contexts of a tree are suffix-free, so at most one context matches any
//! history. The height of a tree is the length of its longest context; the
//! tree of height 0 (no contexts, or only the empty context) is memoryless.

pub mod classify;
pub mod finite_markov;

pub use classify::{classify, classify_until, Classification};
pub use finite_markov::{to_finite_markov, FiniteMarkov};

use ct_common::{Alphabet, Error, Result};
use ct_config::validate::ROW_SUM_TOLERANCE;
use ct_config::ModelSpec;

/// Set of suffix-free contexts over an alphabet of size `m`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextTree {
    contexts: Vec<Vec<usize>>,
    alphabet_size: usize,
    height: usize,
}

impl ContextTree {
    /// Build a tree from encoded contexts.
    ///
    /// Fails when a symbol is out of range, when a context is a suffix of
    /// another (duplicates included), or when the empty context is mixed
    /// with other contexts.
    pub fn new(contexts: Vec<Vec<usize>>, alphabet_size: usize) -> Result<Self> {
        if alphabet_size == 0 {
            return Err(Error::InvalidAlphabet("alphabet is empty".to_string()));
        }
        for context in &contexts {
            if let Some(&index) = context.iter().find(|&&s| s >= alphabet_size) {
                return Err(Error::SymbolOutOfRange {
                    index,
                    alphabet_size,
                });
            }
        }
        for (i, a) in contexts.iter().enumerate() {
            for (j, b) in contexts.iter().enumerate() {
                if i != j && b.ends_with(a) {
                    return Err(Error::InvalidModel(format!(
                        "context {} is a suffix of context {}",
                        i, j
                    )));
                }
            }
        }

        let height = contexts.iter().map(Vec::len).max().unwrap_or(0);
        Ok(Self {
            contexts,
            alphabet_size,
            height,
        })
    }

    /// The memoryless tree.
    pub fn memoryless(alphabet_size: usize) -> Self {
        Self {
            contexts: Vec::new(),
            alphabet_size,
            height: 0,
        }
    }

    /// Length of the longest context.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Alphabet size `m`.
    pub fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    /// Number of contexts.
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    /// True when the tree has no contexts at all.
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// True for the i.i.d. model.
    pub fn is_memoryless(&self) -> bool {
        self.height == 0
    }

    /// All contexts, oldest symbol first.
    pub fn contexts(&self) -> &[Vec<usize>] {
        &self.contexts
    }

    /// Index of the context that `history` ends with, if any.
    pub fn find_suffix(&self, history: &[usize]) -> Option<usize> {
        self.contexts
            .iter()
            .position(|c| c.len() <= history.len() && history.ends_with(c))
    }
}

/// Context tree, alphabet and one next-symbol distribution per context.
#[derive(Debug, Clone)]
pub struct ContextModel {
    alphabet: Alphabet,
    tree: ContextTree,
    transitions: Vec<Vec<f64>>,
}

impl ContextModel {
    /// Build a model, validating rows against the tree and alphabet.
    pub fn new(alphabet: Alphabet, tree: ContextTree, transitions: Vec<Vec<f64>>) -> Result<Self> {
        if tree.alphabet_size() != alphabet.len() {
            return Err(Error::InvalidModel(format!(
                "tree uses {} symbols but the alphabet has {}",
                tree.alphabet_size(),
                alphabet.len()
            )));
        }
        let expected_rows = tree.len().max(1);
        if transitions.len() != expected_rows {
            return Err(Error::InvalidModel(format!(
                "expected {} transition rows, got {}",
                expected_rows,
                transitions.len()
            )));
        }
        for (i, row) in transitions.iter().enumerate() {
            validate_row(i, row, alphabet.len())?;
        }
        Ok(Self {
            alphabet,
            tree,
            transitions,
        })
    }

    /// Convert a validated model file into encoded form.
    pub fn from_spec(spec: &ModelSpec) -> Result<Self> {
        let alphabet = Alphabet::new(spec.alphabet.iter().cloned())?;

        // A lone empty context is the memoryless model, stored without contexts.
        let memoryless = spec.contexts.len() == 1 && spec.contexts[0].context.is_empty();
        let tree = if memoryless || spec.contexts.is_empty() {
            ContextTree::memoryless(alphabet.len())
        } else {
            let encoded = spec
                .contexts
                .iter()
                .map(|c| alphabet.encode_all(c.context.iter().map(String::as_str)))
                .collect::<Result<Vec<_>>>()?;
            ContextTree::new(encoded, alphabet.len())?
        };

        let transitions = if spec.contexts.is_empty() {
            vec![vec![1.0 / alphabet.len() as f64; alphabet.len()]]
        } else {
            spec.contexts.iter().map(|c| c.transition.clone()).collect()
        };

        Self::new(alphabet, tree, transitions)
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn tree(&self) -> &ContextTree {
        &self.tree
    }

    /// Transition rows aligned with `tree().contexts()`.
    ///
    /// A memoryless model has exactly one row.
    pub fn transitions(&self) -> &[Vec<f64>] {
        &self.transitions
    }

    pub fn height(&self) -> usize {
        self.tree.height()
    }
}

fn validate_row(index: usize, row: &[f64], alphabet_size: usize) -> Result<()> {
    if row.len() != alphabet_size {
        return Err(Error::InvalidModel(format!(
            "transition row {} has {} entries, expected {}",
            index,
            row.len(),
            alphabet_size
        )));
    }
    if row.iter().any(|p| !p.is_finite() || *p < 0.0) {
        return Err(Error::InvalidModel(format!(
            "transition row {} has a negative or non-finite probability",
            index
        )));
    }
    let sum: f64 = row.iter().sum();
    if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
        return Err(Error::InvalidModel(format!(
            "transition row {} sums to {}",
            index, sum
        )));
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;
    use ct_config::ContextSpec;

    #[test]
    fn height_and_lookup() {
        let tree = ContextTree::new(vec![vec![0], vec![0, 1], vec![1, 1]], 2).unwrap();
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.find_suffix(&[1, 1, 0]), Some(0));
        assert_eq!(tree.find_suffix(&[0, 0, 1]), Some(1));
        assert_eq!(tree.find_suffix(&[1, 1]), Some(2));
        // Too short to decide between 01 and 11.
        assert_eq!(tree.find_suffix(&[1]), None);
    }

    #[test]
    fn rejects_suffix_conflict_and_range() {
        assert!(matches!(
            ContextTree::new(vec![vec![1], vec![0, 1]], 2),
            Err(Error::InvalidModel(_))
        ));
        assert!(matches!(
            ContextTree::new(vec![vec![2]], 2),
            Err(Error::SymbolOutOfRange { index: 2, .. })
        ));
    }

    #[test]
    fn memoryless_tree() {
        let tree = ContextTree::memoryless(3);
        assert!(tree.is_memoryless());
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
    }

    #[test]
    fn model_row_validation() {
        let alphabet = Alphabet::numeric(2).unwrap();
        let tree = ContextTree::new(vec![vec![0], vec![1]], 2).unwrap();
        assert!(ContextModel::new(
            alphabet.clone(),
            tree.clone(),
            vec![vec![0.5, 0.5], vec![0.7, 0.2]]
        )
        .is_err());
        assert!(ContextModel::new(alphabet, tree, vec![vec![0.5, 0.5]]).is_err());
    }

    #[test]
    fn from_spec_encodes_through_alphabet() {
        let spec = ModelSpec {
            schema_version: ct_config::CONFIG_SCHEMA_VERSION.to_string(),
            description: None,
            alphabet: vec!["lo".to_string(), "hi".to_string()],
            contexts: vec![
                ContextSpec {
                    context: vec!["lo".to_string()],
                    transition: vec![0.5, 0.5],
                },
                ContextSpec {
                    context: vec!["lo".to_string(), "hi".to_string()],
                    transition: vec![1.0, 0.0],
                },
                ContextSpec {
                    context: vec!["hi".to_string(), "hi".to_string()],
                    transition: vec![0.0, 1.0],
                },
            ],
        };
        let model = ContextModel::from_spec(&spec).unwrap();
        assert_eq!(model.tree().contexts()[1], vec![0, 1]);
        assert_eq!(model.height(), 2);
        assert_eq!(model.transitions()[2], vec![0.0, 1.0]);
    }

    #[test]
    fn from_spec_memoryless() {
        let spec = ModelSpec {
            schema_version: ct_config::CONFIG_SCHEMA_VERSION.to_string(),
            description: None,
            alphabet: vec!["h".to_string(), "t".to_string()],
            contexts: vec![ContextSpec {
                context: vec![],
                transition: vec![0.25, 0.75],
            }],
        };
        let model = ContextModel::from_spec(&spec).unwrap();
        assert!(model.tree().is_memoryless());
        assert_eq!(model.transitions(), &[vec![0.25, 0.75]]);
    }
}
