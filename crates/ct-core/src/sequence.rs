//! Sequence files: whitespace-separated symbols, decoded through the alphabet.
//!
//! Lines whose first non-blank character is `#` are comments.

use ct_common::{Alphabet, Error, Result};
use std::path::Path;

/// Encode the symbols of `text`.
///
/// Fails with `UnknownSymbol` on a token outside the alphabet and with
/// `InvalidSequence` when no symbol is present.
pub fn parse_symbols(text: &str, alphabet: &Alphabet) -> Result<Vec<usize>> {
    let symbols = text
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .flat_map(str::split_whitespace)
        .map(|token| alphabet.encode(token))
        .collect::<Result<Vec<_>>>()?;
    if symbols.is_empty() {
        return Err(Error::InvalidSequence("sequence has no symbols".to_string()));
    }
    Ok(symbols)
}

/// Read and encode a sequence file.
pub fn read_symbols(path: &Path, alphabet: &Alphabet) -> Result<Vec<usize>> {
    let text = std::fs::read_to_string(path)?;
    parse_symbols(&text, alphabet)
}

/// Decode indices into a single whitespace-separated line.
pub fn format_symbols(symbols: &[usize], alphabet: &Alphabet) -> Result<String> {
    Ok(alphabet.decode_all(symbols)?.join(" "))
}
