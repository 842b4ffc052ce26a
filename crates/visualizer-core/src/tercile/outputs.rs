/// Output types of a tercile verification run.
///
/// `TercileSkill` is the contract consumed by the plotting layer: three
/// probabilities summing to one, three scores in [-1, 1] and three
/// significance flags, tagged with `CONTRACT_VERSION`.
use serde::{Deserialize, Serialize};

use super::category::{
    Category, CategoryProbabilities, CategoryProbabilitiesSeries, Thresholds,
};
use super::constants::{N_CATEGORIES, PROBABILITY_SUM_TOLERANCE};
use crate::metrics::RocArea;

/// ROC skill of one category over the reference years.
///
/// `score` and `roc` are `None` when the category was observed in every
/// reference year or in none of them; such a score is never significant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: Category,
    /// ROC skill score `2 * AUC - 1`.
    pub score: Option<f64>,
    pub roc: Option<RocArea>,
    pub significant: bool,
    /// Score at or above the configured highlight threshold.
    pub highlighted: bool,
}

/// Leave-one-out categorisation of one reference year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearOutcome {
    pub year: i32,
    pub thresholds: Thresholds,
    pub probabilities: CategoryProbabilities,
    pub observed: Category,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TercileSkill {
    pub contract_version: u32,
    pub year_target: i32,
    /// Member-agreement probabilities of the target year.
    pub probabilities: CategoryProbabilities,
    pub scores: [CategoryScore; N_CATEGORIES],
    /// Thresholds of the full reference period, applied to the target year.
    pub thresholds: Thresholds,
    /// Number of valid members in the target year.
    pub n_members: usize,
    pub reference: Vec<YearOutcome>,
}

impl TercileSkill {
    pub fn score(&self, category: Category) -> &CategoryScore {
        &self.scores[category.index()]
    }

    /// Scores in category order; `None` where undefined.
    pub fn score_values(&self) -> [Option<f64>; N_CATEGORIES] {
        self.scores.map(|s| s.score)
    }

    /// Significance flags in category order.
    pub fn significance(&self) -> [bool; N_CATEGORIES] {
        self.scores.map(|s| s.significant)
    }

    /// Probabilities sum to one and every defined score lies in [-1, 1].
    pub fn satisfies_contract(&self) -> bool {
        let sum_ok = (self.probabilities.sum() - 1.0).abs() <= PROBABILITY_SUM_TOLERANCE;
        sum_ok
            && self.scores.iter().all(|s| match s.score {
                Some(v) => (-1.0..=1.0).contains(&v),
                None => !s.significant,
            })
    }

    pub fn reference_years(&self) -> Vec<i32> {
        self.reference.iter().map(|y| y.year).collect()
    }

    /// Reference-year probabilities as columns.
    pub fn reference_probabilities(&self) -> CategoryProbabilitiesSeries {
        let mut cols = CategoryProbabilitiesSeries::with_capacity(self.reference.len());
        for y in &self.reference {
            cols.push(&y.probabilities);
        }
        cols
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
