//! Small descriptive-statistics helpers shared by aggregation, detrending
//! and tercile thresholds.
//!
//! All helpers skip `NaN` values.

/// Mean of the non-missing values. `NaN` when none are present.
pub fn nan_mean(values: &[f64]) -> f64 {
    let (sum, n) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        f64::NAN
    } else {
        sum / n as f64
    }
}

/// Sum of the non-missing values. `NaN` when none are present.
pub fn nan_sum(values: &[f64]) -> f64 {
    let mut valid = values.iter().filter(|v| !v.is_nan()).peekable();
    if valid.peek().is_none() {
        return f64::NAN;
    }
    valid.sum()
}

/// Minimum of the non-missing values. `NaN` when none are present.
pub fn nan_min(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(f64::NAN, f64::min)
}

/// Maximum of the non-missing values. `NaN` when none are present.
pub fn nan_max(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(f64::NAN, f64::max)
}

/// Sample quantile with linear interpolation between order statistics.
///
/// Uses `h = (n - 1) * p` on the sorted non-missing values, the default
/// definition of most statistical packages. Returns `None` for an empty
/// input or `p` outside `[0, 1]`.
pub fn quantile(values: &[f64], p: f64) -> Option<f64> {
    if !(0.0..=1.0).contains(&p) {
        return None;
    }
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    let frac = h - lo as f64;
    Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}

/// Population variance of the non-missing values. `NaN` when none are present.
pub fn nan_variance(values: &[f64]) -> f64 {
    let mean = nan_mean(values);
    if mean.is_nan() {
        return f64::NAN;
    }
    nan_mean(
        &values
            .iter()
            .map(|v| (v - mean).powi(2))
            .collect::<Vec<f64>>(),
    )
}
