//! Per-date ensemble mean and range.

use chrono::NaiveDate;
use visualizer_macros::Columnar;

use super::gaps::{self, Step};
use crate::aggregate;
use crate::error::Result;
use crate::stats;
use crate::traits::EnsembleSource;

/// Ensemble statistics at one date.
#[derive(Debug, Clone, Copy, PartialEq, Columnar)]
pub struct EnsembleSummary {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl EnsembleSummary {
    pub fn of(members: &[f64]) -> Self {
        Self {
            mean: stats::nan_mean(members),
            min: stats::nan_min(members),
            max: stats::nan_max(members),
        }
    }
}

/// Ensemble summary along a date axis.
#[derive(Debug, Clone, PartialEq)]
pub struct SummarizedSeries {
    pub dates: Vec<NaiveDate>,
    pub rows: EnsembleSummarySeries,
    pub n_members: usize,
}

impl SummarizedSeries {
    /// Place the summary on a regular axis, inserting `NaN` rows for missing dates.
    ///
    /// The step is inferred from the dates when not given.
    pub fn fill_gaps(&self, step: Option<Step>) -> Self {
        let step = step.unwrap_or_else(|| Step::detect(&self.dates));
        let axis = step.axis(&self.dates);
        let mean = gaps::reindex(&self.dates, &self.rows.mean, &axis);
        let min = gaps::reindex(&self.dates, &self.rows.min, &axis);
        let max = gaps::reindex(&self.dates, &self.rows.max, &axis);
        Self {
            dates: axis,
            rows: EnsembleSummarySeries { mean, min, max },
            n_members: self.n_members,
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Spatially average every member and summarise the ensemble at each date.
pub fn summarize<E: EnsembleSource + ?Sized>(ensemble: &E) -> Result<SummarizedSeries> {
    let members = aggregate::member_series(ensemble)?;
    let dates = ensemble.dates().to_vec();
    let mut rows = EnsembleSummarySeries::with_capacity(dates.len());
    let mut at = Vec::with_capacity(members.len());
    for t in 0..dates.len() {
        at.clear();
        at.extend(members.iter().map(|m| m[t]));
        rows.push(&EnsembleSummary::of(&at));
    }
    Ok(SummarizedSeries {
        dates,
        rows,
        n_members: members.len(),
    })
}
