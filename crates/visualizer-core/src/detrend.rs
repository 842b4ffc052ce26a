//! Least-squares linear detrending of yearly series.
//!
//! The fitted slope is removed around the mean year, so the series mean is
//! preserved and detrending an already detrended series changes nothing.

/// A fitted linear trend `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Mean of the abscissa values used in the fit.
    pub x_mean: f64,
}

impl LinearFit {
    /// Fit a trend to the pairs where `y` is not missing.
    ///
    /// Returns `None` with fewer than two valid pairs or when all valid `x`
    /// coincide.
    pub fn fit(x: &[f64], y: &[f64]) -> Option<Self> {
        let pairs: Vec<(f64, f64)> = x
            .iter()
            .zip(y)
            .filter(|(_, yi)| !yi.is_nan())
            .map(|(&xi, &yi)| (xi, yi))
            .collect();
        if pairs.len() < 2 {
            return None;
        }
        let n = pairs.len() as f64;
        let x_mean = pairs.iter().map(|p| p.0).sum::<f64>() / n;
        let y_mean = pairs.iter().map(|p| p.1).sum::<f64>() / n;
        let sxx: f64 = pairs.iter().map(|p| (p.0 - x_mean).powi(2)).sum();
        if sxx == 0.0 {
            return None;
        }
        let sxy: f64 = pairs
            .iter()
            .map(|p| (p.0 - x_mean) * (p.1 - y_mean))
            .sum();
        let slope = sxy / sxx;
        Some(Self {
            slope,
            intercept: y_mean - slope * x_mean,
            x_mean,
        })
    }

    /// Trend value at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Remove the trend from `y` observed at `x`, keeping the mean level.
    #[inline]
    pub fn remove(&self, x: f64, y: f64) -> f64 {
        y - self.slope * (x - self.x_mean)
    }
}

/// Remove a fitted linear trend from a yearly series.
///
/// Returns the detrended values and the fit. Series too short to fit are
/// returned unchanged with `None`.
pub fn detrend(years: &[i32], values: &[f64]) -> (Vec<f64>, Option<LinearFit>) {
    let x: Vec<f64> = years.iter().map(|&y| f64::from(y)).collect();
    match LinearFit::fit(&x, values) {
        Some(fit) => (
            x.iter().zip(values).map(|(&xi, &yi)| fit.remove(xi, yi)).collect(),
            Some(fit),
        ),
        None => (values.to_vec(), None),
    }
}
