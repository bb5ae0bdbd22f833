//! Count normalization.

use super::stable::div_or_zero_row;

/// Normalize counts by an explicit total.
///
/// A zero total leaves every entry at zero.
pub fn normalize_by(counts: &[u64], total: u64) -> Vec<f64> {
    let total = total as f64;
    counts
        .iter()
        .map(|&c| div_or_zero_row(c as f64, total))
        .collect()
}

/// Normalize counts by their own sum.
pub fn normalize(counts: &[u64]) -> Vec<f64> {
    let total: u64 = counts.iter().sum();
    normalize_by(counts, total)
}

/// Row-normalize a flattened `rows x cols` count matrix.
///
/// Rows with zero mass stay all zeros.
pub fn normalize_rows(counts: &[u64], cols: usize) -> Vec<Vec<f64>> {
    if cols == 0 {
        return Vec::new();
    }
    counts.chunks(cols).map(normalize).collect()
}

/// Number of rows with zero total mass in a flattened count matrix.
pub fn zero_rows(counts: &[u64], cols: usize) -> usize {
    if cols == 0 {
        return 0;
    }
    counts
        .chunks(cols)
        .filter(|row| row.iter().all(|&c| c == 0))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_sums_to_one() {
        let p = normalize(&[1, 3, 0, 4]);
        assert_eq!(p, vec![0.125, 0.375, 0.0, 0.5]);
    }

    #[test]
    fn normalize_empty_mass() {
        assert_eq!(normalize(&[0, 0]), vec![0.0, 0.0]);
        assert_eq!(normalize_by(&[0, 0, 0], 0), vec![0.0; 3]);
    }

    #[test]
    fn normalize_rows_skips_zero_rows() {
        let rows = normalize_rows(&[1, 1, 0, 0, 0, 5], 2);
        assert_eq!(rows, vec![vec![0.5, 0.5], vec![0.0, 0.0], vec![0.0, 1.0]]);
        assert_eq!(zero_rows(&[1, 1, 0, 0, 0, 5], 2), 1);
    }
}
