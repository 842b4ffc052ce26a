//! Spatial and temporal reduction of fields to one value per season-year.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calendar::Season;
use crate::error::{Result, VerificationError};
use crate::series::validate_axis;
use crate::stats;
use crate::traits::{EnsembleSource, ObservationSource};

/// How the values of a season are combined into one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    #[default]
    Mean,
    Sum,
}

impl Aggregation {
    fn apply(self, values: &[f64]) -> f64 {
        match self {
            Aggregation::Mean => stats::nan_mean(values),
            Aggregation::Sum => stats::nan_sum(values),
        }
    }
}

/// One value per year. Missing years carry `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlySeries {
    pub years: Vec<i32>,
    pub values: Vec<f64>,
}

impl YearlySeries {
    /// Create a yearly series; years must be strictly increasing.
    pub fn new(years: Vec<i32>, values: Vec<f64>) -> Result<Self> {
        validate_years(&years)?;
        if years.len() != values.len() {
            return Err(VerificationError::alignment(format!(
                "{} years but {} values",
                years.len(),
                values.len()
            )));
        }
        check_finite(&values, "observations")?;
        Ok(Self { years, values })
    }

    /// Value for `year`, if the year is on the axis.
    pub fn get(&self, year: i32) -> Option<f64> {
        self.years
            .binary_search(&year)
            .ok()
            .map(|i| self.values[i])
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}

/// One value per year and member: `members[m][i]` belongs to `years[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyEnsemble {
    pub years: Vec<i32>,
    pub members: Vec<Vec<f64>>,
}

impl YearlyEnsemble {
    /// Create a yearly ensemble with validation.
    pub fn new(years: Vec<i32>, members: Vec<Vec<f64>>) -> Result<Self> {
        validate_years(&years)?;
        if members.is_empty() {
            return Err(VerificationError::dimension("ensemble has zero members"));
        }
        if let Some((m, values)) = members
            .iter()
            .enumerate()
            .find(|(_, v)| v.len() != years.len())
        {
            return Err(VerificationError::alignment(format!(
                "member {} has {} values for {} years",
                m,
                values.len(),
                years.len()
            )));
        }
        if members.iter().flatten().any(|v| v.is_infinite()) {
            return Err(VerificationError::NonNumeric(
                "ensemble contains infinite values".to_string(),
            ));
        }
        Ok(Self { years, members })
    }

    pub fn n_members(&self) -> usize {
        self.members.len()
    }

    /// Index of `year` on the axis.
    pub fn year_index(&self, year: i32) -> Option<usize> {
        self.years.binary_search(&year).ok()
    }

    /// All member values for the year at index `i`.
    pub fn members_at(&self, i: usize) -> Vec<f64> {
        self.members.iter().map(|m| m[i]).collect()
    }
}

fn validate_years(years: &[i32]) -> Result<()> {
    if years.windows(2).any(|w| w[1] <= w[0]) {
        return Err(VerificationError::alignment(
            "years are not strictly increasing",
        ));
    }
    Ok(())
}

/// Reduce an observation source to a single series by averaging its points.
///
/// Emits a warning when more than one point is averaged.
pub fn observation_series<O: ObservationSource + ?Sized>(obs: &O) -> Result<Vec<f64>> {
    validate_axis(obs.dates())?;
    let n_points = obs.n_points();
    if n_points == 0 {
        return Err(VerificationError::dimension("observations have zero spatial points"));
    }
    if n_points > 1 {
        warn!(n_points, "observations are gridded; computing the spatial mean");
    }
    let mut out = Vec::with_capacity(obs.dates().len());
    let mut cell = Vec::with_capacity(n_points);
    for t in 0..obs.dates().len() {
        cell.clear();
        cell.extend((0..n_points).map(|p| obs.observed(t, p)));
        check_finite(&cell, "observations")?;
        out.push(stats::nan_mean(&cell));
    }
    Ok(out)
}

/// Reduce every ensemble member to a single series by averaging its points.
///
/// Emits a warning when more than one point is averaged.
pub fn member_series<E: EnsembleSource + ?Sized>(ens: &E) -> Result<Vec<Vec<f64>>> {
    validate_axis(ens.dates())?;
    let (n_members, n_points) = (ens.n_members(), ens.n_points());
    if n_members == 0 {
        return Err(VerificationError::dimension("ensemble has zero members"));
    }
    if n_points == 0 {
        return Err(VerificationError::dimension("ensemble has zero spatial points"));
    }
    if n_points > 1 {
        warn!(
            n_points,
            n_members, "ensemble is gridded; computing the spatial mean of each member"
        );
    }
    let n_times = ens.dates().len();
    let mut cell = Vec::with_capacity(n_points);
    let mut members = Vec::with_capacity(n_members);
    for m in 0..n_members {
        let mut series = Vec::with_capacity(n_times);
        for t in 0..n_times {
            cell.clear();
            cell.extend((0..n_points).map(|p| ens.value(m, t, p)));
            check_finite(&cell, "ensemble")?;
            series.push(stats::nan_mean(&cell));
        }
        members.push(series);
    }
    Ok(members)
}

fn check_finite(values: &[f64], name: &str) -> Result<()> {
    if values.iter().any(|v| v.is_infinite()) {
        return Err(VerificationError::NonNumeric(format!(
            "{name} contain infinite values"
        )));
    }
    Ok(())
}

/// Aggregate a dated series to one value per season-year.
///
/// With a season, only dates inside it are used and a season-year whose
/// dates cover fewer distinct months than the season is dropped as
/// incomplete. Without a season each date counts towards its calendar year.
pub fn to_season_years(
    dates: &[NaiveDate],
    values: &[f64],
    season: Option<&Season>,
    aggregation: Aggregation,
) -> YearlySeries {
    let mut groups: BTreeMap<i32, (Vec<f64>, Vec<u32>)> = BTreeMap::new();
    for (date, &v) in dates.iter().zip(values) {
        let year = match season {
            Some(s) => match s.season_year(*date) {
                Some(y) => y,
                None => continue,
            },
            None => date.year(),
        };
        let (vals, months) = groups.entry(year).or_default();
        vals.push(v);
        if !months.contains(&date.month()) {
            months.push(date.month());
        }
    }

    let mut years = Vec::with_capacity(groups.len());
    let mut out = Vec::with_capacity(groups.len());
    for (year, (vals, months)) in groups {
        if let Some(s) = season {
            if months.len() < s.len() {
                debug!(year, months = months.len(), "dropping incomplete season");
                continue;
            }
        }
        years.push(year);
        out.push(aggregation.apply(&vals));
    }
    YearlySeries { years, values: out }
}

/// Spatially average and season-aggregate an observation source.
pub fn yearly_observations<O: ObservationSource + ?Sized>(
    obs: &O,
    season: Option<&Season>,
    aggregation: Aggregation,
) -> Result<YearlySeries> {
    let series = observation_series(obs)?;
    Ok(to_season_years(obs.dates(), &series, season, aggregation))
}

/// Spatially average and season-aggregate every member of an ensemble.
pub fn yearly_ensemble<E: EnsembleSource + ?Sized>(
    ens: &E,
    season: Option<&Season>,
    aggregation: Aggregation,
) -> Result<YearlyEnsemble> {
    let members = member_series(ens)?;
    let mut years = Vec::new();
    let mut yearly = Vec::with_capacity(members.len());
    for series in &members {
        let ys = to_season_years(ens.dates(), series, season, aggregation);
        years = ys.years;
        yearly.push(ys.values);
    }
    YearlyEnsemble::new(years, yearly)
}
