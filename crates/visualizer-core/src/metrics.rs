//! Discrimination metrics for probabilistic forecasts of binary events.
//!
//! All metrics take forecast probabilities and observed event flags of equal
//! length. The ROC area is computed through the Mann-Whitney U statistic, which
//! equals the trapezoidal area under the empirical ROC curve.

use serde::{Deserialize, Serialize};
use statrs::function::erf::erfc;

use crate::error::{Result, VerificationError};

/// Area under the ROC curve with its one-sided significance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RocArea {
    /// Area under the curve. Range: [0, 1], 0.5 = no discrimination.
    pub auc: f64,
    /// Mann-Whitney U of the events against the non-events.
    pub u_statistic: f64,
    /// P-value of the test AUC > 0.5.
    pub p_value: f64,
    pub n_events: usize,
    pub n_non_events: usize,
}

impl RocArea {
    /// ROC skill score `2 * AUC - 1`. Range: [-1, 1], 1 = perfect.
    pub fn skill_score(&self) -> f64 {
        2.0 * self.auc - 1.0
    }

    /// Returns `true` when the area is significantly above 0.5 at `conf_level`.
    pub fn is_significant(&self, conf_level: f64) -> bool {
        self.p_value < 1.0 - conf_level
    }
}

/// Mid-ranks (1-based) of `values`, tied values sharing their average rank.
///
/// Also returns the tie correction term `sum(t^3 - t)` over tie groups.
fn mid_ranks(values: &[f64]) -> (Vec<f64>, f64) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut ties = 0.0;
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        // positions i..=j share rank (i + 1 + j + 1) / 2
        let rank = (i + j + 2) as f64 / 2.0;
        for &k in &order[i..=j] {
            ranks[k] = rank;
        }
        let t = (j - i + 1) as f64;
        ties += t.powi(3) - t;
        i = j + 1;
    }
    (ranks, ties)
}

/// Area under the ROC curve of `probabilities` for the events in `observed`.
///
/// Significance uses the normal approximation of the Mann-Whitney U with
/// tie-corrected variance and a continuity correction of 0.5. When every
/// probability is tied the variance vanishes and the p-value is 1.
///
/// # Errors
///
/// Returns an alignment error on length mismatch and a degeneracy error when
/// the events are never or always observed.
pub fn roc_area(probabilities: &[f64], observed: &[bool]) -> Result<RocArea> {
    if probabilities.len() != observed.len() {
        return Err(VerificationError::alignment(format!(
            "probabilities length {} != observed length {}",
            probabilities.len(),
            observed.len()
        )));
    }
    if probabilities.iter().any(|p| !p.is_finite()) {
        return Err(VerificationError::NonNumeric(
            "probabilities must be finite".to_string(),
        ));
    }
    let n_events = observed.iter().filter(|&&o| o).count();
    let n_non_events = observed.len() - n_events;
    if n_events == 0 || n_non_events == 0 {
        return Err(VerificationError::degenerate(format!(
            "ROC area undefined with {n_events} events and {n_non_events} non-events"
        )));
    }

    let (ranks, ties) = mid_ranks(probabilities);
    let n1 = n_events as f64;
    let n0 = n_non_events as f64;
    let n = n1 + n0;

    let rank_sum: f64 = ranks
        .iter()
        .zip(observed)
        .filter(|(_, &o)| o)
        .map(|(r, _)| r)
        .sum();
    let u = rank_sum - n1 * (n1 + 1.0) / 2.0;
    let auc = u / (n1 * n0);

    let variance = n1 * n0 / 12.0 * ((n + 1.0) - ties / (n * (n - 1.0)));
    let p_value = if variance <= 0.0 {
        1.0
    } else {
        let z = (u - n1 * n0 / 2.0 - 0.5) / variance.sqrt();
        0.5 * erfc(z / std::f64::consts::SQRT_2)
    };

    Ok(RocArea {
        auc,
        u_statistic: u,
        p_value,
        n_events,
        n_non_events,
    })
}

/// ROC skill score. Range: [-1, 1], 1 = perfect, 0 = no skill.
pub fn roc_skill_score(probabilities: &[f64], observed: &[bool]) -> Result<f64> {
    Ok(roc_area(probabilities, observed)?.skill_score())
}
