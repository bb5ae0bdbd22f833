//! Maximum-likelihood multinomial fits from category counts.
//!
//! For counts `n = (n_1..n_K)` with `N = Σ_i n_i`, the maximum-likelihood
//! parameters are `p_i = n_i / N` and the attained log-likelihood is
//!
//! ```text
//! log L = Σ_{i: n_i > 0} n_i · (ln n_i − ln N)
//! ```
//!
//! which is `−N` times the empirical entropy in nats. Conditional models fit
//! one row per context, each against its own total.

use super::stable::count_log_ratio;

/// Maximized multinomial log-likelihood of `counts` (nats).
pub fn log_likelihood(counts: &[u64]) -> f64 {
    let total: u64 = counts.iter().sum();
    counts.iter().map(|&n| count_log_ratio(n, total)).sum()
}

/// `Σ_rows Σ_i n_i · (ln n_i − ln total)` over `(row, total)` pairs.
///
/// Each `total` must be at least the sum of its row; a row summing to its
/// total gives the row's own [`log_likelihood`].
pub fn log_likelihood_rows<'a, I>(rows: I) -> f64
where
    I: IntoIterator<Item = (&'a [u64], u64)>,
{
    rows.into_iter()
        .map(|(row, total)| row.iter().map(|&n| count_log_ratio(n, total)).sum::<f64>())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn balanced_binary_counts() {
        // Y = [0, 0, 1, 1]
        let ll = log_likelihood(&[2, 2]);
        assert!(approx_eq(ll, 4.0 * 0.5f64.ln(), 1e-12));
    }

    #[test]
    fn degenerate_counts_have_zero_loss() {
        assert_eq!(log_likelihood(&[0, 9, 0]), 0.0);
        assert_eq!(log_likelihood(&[]), 0.0);
    }

    #[test]
    fn skewed_counts() {
        let expected = 3.0 * (0.75f64).ln() + (0.25f64).ln();
        assert!(approx_eq(log_likelihood(&[3, 0, 1]), expected, 1e-12));
    }

    #[test]
    fn rows_add_up() {
        let a = [1u64, 1];
        let b = [4u64, 0];
        let total = log_likelihood_rows([(&a[..], 2), (&b[..], 4)]);
        assert!(approx_eq(total, 2.0 * 0.5f64.ln(), 1e-12));
    }

    #[test]
    fn rows_against_larger_totals() {
        // One count out of two occurrences.
        let row = [1u64, 0];
        assert!(approx_eq(log_likelihood_rows([(&row[..], 2)]), 0.5f64.ln(), 1e-12));
    }
}
