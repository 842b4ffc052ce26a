//! Uncertainty-band polygons.

use chrono::NaiveDate;
use serde::Serialize;

/// A closed outline: the upper edge left to right, then the lower edge back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polygon {
    pub points: Vec<(NaiveDate, f64)>,
}

/// Polygons enclosing `lower..=upper`, split wherever either bound is missing.
///
/// Runs shorter than two dates enclose no area and are skipped.
pub fn band_polygons(dates: &[NaiveDate], lower: &[f64], upper: &[f64]) -> Vec<Polygon> {
    let valid = |i: usize| !lower[i].is_nan() && !upper[i].is_nan();
    let n = dates.len().min(lower.len()).min(upper.len());

    let mut polygons = Vec::new();
    let mut i = 0;
    while i < n {
        if !valid(i) {
            i += 1;
            continue;
        }
        let start = i;
        while i < n && valid(i) {
            i += 1;
        }
        if i - start < 2 {
            continue;
        }
        let run = start..i;
        let points = run
            .clone()
            .map(|k| (dates[k], upper[k]))
            .chain(run.rev().map(|k| (dates[k], lower[k])))
            .collect();
        polygons.push(Polygon { points });
    }
    polygons
}
