//! Alphabet: bijection between symbol strings and dense indices `0..m`.
//!
//! Everything downstream of parsing works on `usize` indices. The alphabet is
//! built once from the model file and passed explicitly to whatever needs to
//! cross the encode/decode boundary.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Finite ordered set of symbols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Alphabet {
    symbols: Vec<String>,
    index: HashMap<String, usize>,
}

impl Alphabet {
    /// Build an alphabet from its symbols, in index order.
    ///
    /// Fails on an empty list or duplicate symbols.
    pub fn new<I, S>(symbols: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let symbols: Vec<String> = symbols.into_iter().map(Into::into).collect();
        if symbols.is_empty() {
            return Err(Error::InvalidAlphabet("alphabet is empty".to_string()));
        }

        let mut index = HashMap::with_capacity(symbols.len());
        for (i, symbol) in symbols.iter().enumerate() {
            if symbol.is_empty() || symbol.chars().any(char::is_whitespace) {
                return Err(Error::InvalidAlphabet(format!(
                    "symbol {:?} must be non-empty and contain no whitespace",
                    symbol
                )));
            }
            if index.insert(symbol.clone(), i).is_some() {
                return Err(Error::InvalidAlphabet(format!(
                    "duplicate symbol {:?}",
                    symbol
                )));
            }
        }

        Ok(Self { symbols, index })
    }

    /// Alphabet `{"0", "1", ..., "m-1"}`.
    pub fn numeric(size: usize) -> Result<Self> {
        Self::new((0..size).map(|i| i.to_string()))
    }

    /// Number of symbols `m`.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false for a constructed alphabet; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbols in index order.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Index of a symbol.
    pub fn encode(&self, symbol: &str) -> Result<usize> {
        self.index
            .get(symbol)
            .copied()
            .ok_or_else(|| Error::UnknownSymbol {
                symbol: symbol.to_string(),
            })
    }

    /// Symbol at an index.
    pub fn decode(&self, index: usize) -> Result<&str> {
        self.symbols
            .get(index)
            .map(String::as_str)
            .ok_or(Error::SymbolOutOfRange {
                index,
                alphabet_size: self.symbols.len(),
            })
    }

    /// Encode a sequence of symbols.
    pub fn encode_all<'a, I>(&self, symbols: I) -> Result<Vec<usize>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        symbols.into_iter().map(|s| self.encode(s)).collect()
    }

    /// Decode a sequence of indices.
    pub fn decode_all(&self, indices: &[usize]) -> Result<Vec<&str>> {
        indices.iter().map(|&i| self.decode(i)).collect()
    }

    /// Render a tuple of indices as space-separated symbols.
    pub fn render(&self, indices: &[usize]) -> String {
        indices
            .iter()
            .map(|&i| self.decode(i).unwrap_or("?"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl TryFrom<Vec<String>> for Alphabet {
    type Error = Error;

    fn try_from(symbols: Vec<String>) -> Result<Self> {
        Alphabet::new(symbols)
    }
}

impl From<Alphabet> for Vec<String> {
    fn from(alphabet: Alphabet) -> Self {
        alphabet.symbols
    }
}
