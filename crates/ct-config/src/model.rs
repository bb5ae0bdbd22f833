//! Model file types.
//!
//! A model file describes a context-tree source:
//!
//! ```json
//! {
//!   "schema_version": "1.0.0",
//!   "alphabet": ["0", "1"],
//!   "contexts": [
//!     { "context": ["0"],      "transition": [0.9, 0.1] },
//!     { "context": ["0", "1"], "transition": [0.3, 0.7] },
//!     { "context": ["1", "1"], "transition": [0.5, 0.5] }
//!   ]
//! }
//! ```
//!
//! Contexts are written oldest symbol first, most recent symbol last.

use serde::{Deserialize, Serialize};

/// Complete model configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    pub schema_version: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Symbols in index order.
    pub alphabet: Vec<String>,

    /// Contexts with their next-symbol distributions.
    ///
    /// An empty list, or a single empty context, is the memoryless model.
    #[serde(default)]
    pub contexts: Vec<ContextSpec>,
}

/// One context and the distribution of the symbol that follows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextSpec {
    /// Context symbols, oldest first.
    pub context: Vec<String>,

    /// Probability of each alphabet symbol following the context.
    pub transition: Vec<f64>,
}

impl ModelSpec {
    /// Length of the longest context.
    pub fn height(&self) -> usize {
        self.contexts
            .iter()
            .map(|c| c.context.len())
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_model() {
        let json = r#"{
            "schema_version": "1.0.0",
            "alphabet": ["a", "b"],
            "contexts": [
                { "context": ["a"], "transition": [0.5, 0.5] },
                { "context": ["b"], "transition": [1.0, 0.0] }
            ]
        }"#;
        let model: ModelSpec = serde_json::from_str(json).unwrap();
        assert_eq!(model.alphabet, vec!["a", "b"]);
        assert_eq!(model.contexts.len(), 2);
        assert_eq!(model.height(), 1);
        assert!(model.description.is_none());
    }

    #[test]
    fn contexts_default_to_empty() {
        let json = r#"{ "schema_version": "1.0.0", "alphabet": ["x"] }"#;
        let model: ModelSpec = serde_json::from_str(json).unwrap();
        assert!(model.contexts.is_empty());
        assert_eq!(model.height(), 0);
    }
}
