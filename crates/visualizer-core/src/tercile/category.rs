/// Tercile categories, thresholds and member-agreement probabilities.
///
/// Intervals are closed on the right: a value equal to a threshold falls in
/// the lower category.
use serde::{Deserialize, Serialize};
use visualizer_macros::Columnar;

use super::constants::{LOWER_TERCILE, MIN_REFERENCE_YEARS, N_CATEGORIES, UPPER_TERCILE};
use crate::error::{Result, VerificationError};
use crate::stats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Below,
    Between,
    Above,
}

impl Category {
    /// All categories, lowest first.
    pub const ALL: [Category; N_CATEGORIES] = [Category::Below, Category::Between, Category::Above];

    /// Position in [`Category::ALL`].
    pub fn index(self) -> usize {
        match self {
            Category::Below => 0,
            Category::Between => 1,
            Category::Above => 2,
        }
    }

    /// Label used on plot axes.
    pub fn label(self) -> &'static str {
        match self {
            Category::Below => "Below",
            Category::Between => "Normal",
            Category::Above => "Above",
        }
    }
}

/// Lower and upper tercile thresholds of a reference distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub lower: f64,
    pub upper: f64,
}

impl Thresholds {
    /// Tercile thresholds of the non-missing `reference` values.
    pub fn from_reference(reference: &[f64]) -> Result<Self> {
        let lower = stats::quantile(reference, LOWER_TERCILE);
        let upper = stats::quantile(reference, UPPER_TERCILE);
        match (lower, upper) {
            (Some(lower), Some(upper)) => Ok(Self { lower, upper }),
            _ => Err(VerificationError::InsufficientData {
                available: reference.iter().filter(|v| !v.is_nan()).count(),
                required: MIN_REFERENCE_YEARS,
            }),
        }
    }

    /// Thresholds of `reference` with the value at `excluded` left out.
    pub fn leave_one_out(reference: &[f64], excluded: usize) -> Result<Self> {
        let rest: Vec<f64> = reference
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != excluded)
            .map(|(_, &v)| v)
            .collect();
        Self::from_reference(&rest)
    }

    /// Category of `value`; `None` for a missing value.
    pub fn classify(&self, value: f64) -> Option<Category> {
        if value.is_nan() {
            None
        } else if value <= self.lower {
            Some(Category::Below)
        } else if value <= self.upper {
            Some(Category::Between)
        } else {
            Some(Category::Above)
        }
    }
}

/// Fraction of ensemble members falling in each category.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Columnar)]
pub struct CategoryProbabilities {
    pub below: f64,
    pub between: f64,
    pub above: f64,
}

impl CategoryProbabilities {
    /// Classify every non-missing member and count per category.
    ///
    /// Returns `None` when no member has a value.
    pub fn from_members(members: &[f64], thresholds: &Thresholds) -> Option<Self> {
        let mut counts = [0usize; N_CATEGORIES];
        for c in members.iter().filter_map(|&v| thresholds.classify(v)) {
            counts[c.index()] += 1;
        }
        let total: usize = counts.iter().sum();
        if total == 0 {
            return None;
        }
        let n = total as f64;
        Some(Self {
            below: counts[0] as f64 / n,
            between: counts[1] as f64 / n,
            above: counts[2] as f64 / n,
        })
    }

    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Below => self.below,
            Category::Between => self.between,
            Category::Above => self.above,
        }
    }

    pub fn to_array(&self) -> [f64; N_CATEGORIES] {
        [self.below, self.between, self.above]
    }

    pub fn sum(&self) -> f64 {
        self.below + self.between + self.above
    }

    /// Category with the highest probability; ties resolve to the lower category.
    pub fn most_likely(&self) -> Category {
        Category::ALL
            .into_iter()
            .fold(Category::Below, |best, c| {
                if self.get(c) > self.get(best) {
                    c
                } else {
                    best
                }
            })
    }
}
