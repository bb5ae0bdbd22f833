//! Past tables: enumeration of all pasts of one depth and their shift table.
//!
//! A past of depth `k` is a tuple of `k` symbol indices, oldest first. Tuples
//! are enumerated lexicographically (oldest symbol most significant), so the
//! index of a tuple is its base-`m` value and the tuple itself is never
//! stored. The shift table maps `(past i, symbol a)` to the index of
//! `drop_first(past i) ++ [a]`, which is how a sliding window of length `k`
//! advances by one symbol.
//!
//! Memory is budgeted in table cells: a table of depth `k` holds `m^k * m`
//! shift targets and the estimator keeps one counter per past next to it,
//! so one depth costs `m^k * (m + 1)` cells.

use ct_common::{Error, Result};

/// Shift table for one depth.
#[derive(Debug, Clone)]
pub struct PastTable {
    depth: usize,
    alphabet_size: usize,
    len: usize,
    /// Flattened `len x alphabet_size` shift targets.
    shift: Vec<usize>,
}

/// Cells charged for the table of `depth` over `alphabet_size` symbols, or
/// `None` on overflow.
pub fn table_cells(alphabet_size: usize, depth: usize) -> Option<usize> {
    let exponent = u32::try_from(depth).ok()?;
    alphabet_size
        .checked_pow(exponent)?
        .checked_mul(alphabet_size.checked_add(1)?)
}

/// Cells for the tables of every depth `1..=height` together, or
/// `ResourceExhausted` when the sum overflows or exceeds `max_cells`.
pub fn tables_cells(alphabet_size: usize, height: usize, max_cells: usize) -> Result<usize> {
    let exhausted = || Error::ResourceExhausted {
        depth: height,
        alphabet_size,
        limit: max_cells,
    };
    let total = (1..=height).try_fold(0usize, |acc, depth| {
        table_cells(alphabet_size, depth).and_then(|cells| acc.checked_add(cells))
    });
    match total {
        Some(total) if total <= max_cells => Ok(total),
        _ => Err(exhausted()),
    }
}

impl PastTable {
    /// Build the table for `depth` over `alphabet_size` symbols.
    ///
    /// Fails with `ResourceExhausted` before allocating anything when the
    /// table would exceed `max_cells`.
    pub fn build(alphabet_size: usize, depth: usize, max_cells: usize) -> Result<Self> {
        if alphabet_size == 0 {
            return Err(Error::InvalidAlphabet("alphabet is empty".to_string()));
        }
        if depth == 0 {
            return Err(Error::InvalidModel(
                "past tables need a depth of at least 1".to_string(),
            ));
        }
        let exhausted = || Error::ResourceExhausted {
            depth,
            alphabet_size,
            limit: max_cells,
        };
        match table_cells(alphabet_size, depth) {
            Some(cells) if cells <= max_cells => {}
            _ => return Err(exhausted()),
        }
        let len = alphabet_size.pow(depth as u32);

        // Dropping the oldest digit is `i mod m^(k-1)`; appending is `* m + a`.
        let kept = len / alphabet_size;
        let mut shift = Vec::with_capacity(len * alphabet_size);
        for index in 0..len {
            let base = (index % kept) * alphabet_size;
            shift.extend((0..alphabet_size).map(|symbol| base + symbol));
        }

        Ok(Self {
            depth,
            alphabet_size,
            len,
            shift,
        })
    }

    /// Number of pasts `m^k`.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Never true for a built table.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    /// Tuple of past `index`, oldest symbol first.
    ///
    /// Panics if `index >= len()`.
    pub fn tuple(&self, index: usize) -> Vec<usize> {
        assert!(index < self.len, "past {} out of {}", index, self.len);
        let mut digits = vec![0; self.depth];
        let mut rest = index;
        for slot in digits.iter_mut().rev() {
            *slot = rest % self.alphabet_size;
            rest /= self.alphabet_size;
        }
        digits
    }

    /// Index of a past, if `past` has this table's depth and valid symbols.
    pub fn index_of(&self, past: &[usize]) -> Option<usize> {
        if past.len() != self.depth {
            return None;
        }
        past.iter().try_fold(0usize, |acc, &symbol| {
            (symbol < self.alphabet_size).then(|| acc * self.alphabet_size + symbol)
        })
    }

    /// Index of the past obtained by dropping the oldest symbol of `index`
    /// and appending `symbol`.
    ///
    /// Panics if `index >= len()` or `symbol >= alphabet_size()`.
    pub fn shift(&self, index: usize, symbol: usize) -> usize {
        self.shift[index * self.alphabet_size + symbol]
    }

    /// Iterate over `(index, tuple)` pairs in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Vec<usize>)> + '_ {
        (0..self.len).map(move |index| (index, self.tuple(index)))
    }
}
