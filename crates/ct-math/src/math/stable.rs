//! Numerically safe primitives with the `0 * log(0) = 0` convention.

/// `x * log2(x)`, with `0 * log2(0) = 0`.
///
/// Returns NaN for negative or NaN input.
pub fn xlog2x(x: f64) -> f64 {
    if x.is_nan() || x < 0.0 {
        return f64::NAN;
    }
    if x == 0.0 {
        return 0.0;
    }
    x * x.log2()
}

/// `n * (ln(n) - ln(total))` for counts, zero when `n == 0`.
///
/// This is the contribution of one category to a maximum-likelihood
/// multinomial log-likelihood. `total` must be at least `n`.
pub fn count_log_ratio(n: u64, total: u64) -> f64 {
    if n == 0 {
        return 0.0;
    }
    if total < n {
        return f64::NAN;
    }
    let n = n as f64;
    n * (n.ln() - (total as f64).ln())
}

/// Divide by `denominator`, substituting 1 for a zero denominator.
///
/// Used to normalize count rows that were never observed: the row stays
/// all zeros instead of becoming NaN.
pub fn div_or_zero_row(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        numerator
    } else {
        numerator / denominator
    }
}
