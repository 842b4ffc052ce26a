//! In-memory time-indexed fields and ensembles.
//!
//! Values are stored time-major: the value of point `p` at time `t` lives at
//! `t * n_points + p`. Missing values are `NaN`; infinities are rejected.

use chrono::NaiveDate;

use crate::error::{Result, VerificationError};
use crate::traits::{EnsembleSource, ObservationSource};

/// A single (possibly gridded) field on a date axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    dates: Vec<NaiveDate>,
    n_points: usize,
    values: Vec<f64>,
}

impl Field {
    /// Create a new Field with validation.
    ///
    /// Validates:
    /// - the date axis is non-empty and strictly increasing
    /// - `n_points` is positive
    /// - `values` holds exactly `dates.len() * n_points` entries
    /// - no infinite values
    pub fn new(dates: Vec<NaiveDate>, n_points: usize, values: Vec<f64>) -> Result<Self> {
        validate_axis(&dates)?;
        if n_points == 0 {
            return Err(VerificationError::dimension("field has zero spatial points"));
        }
        validate_values(&values, dates.len() * n_points, "field")?;
        Ok(Self {
            dates,
            n_points,
            values,
        })
    }

    /// Create a single-point series.
    pub fn series(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        Self::new(dates, 1, values)
    }

    /// Number of dates.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns `true` if there are no dates.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Returns `true` when the field holds more than one spatial point.
    pub fn is_gridded(&self) -> bool {
        self.n_points > 1
    }

    /// Values of all points at time index `t`.
    pub fn at(&self, t: usize) -> &[f64] {
        &self.values[t * self.n_points..(t + 1) * self.n_points]
    }
}

impl ObservationSource for Field {
    fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    fn n_points(&self) -> usize {
        self.n_points
    }

    fn observed(&self, t: usize, point: usize) -> f64 {
        self.values[t * self.n_points + point]
    }
}

/// Ensemble members sharing one date axis and one spatial layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Ensemble {
    dates: Vec<NaiveDate>,
    n_points: usize,
    members: Vec<Vec<f64>>,
}

impl Ensemble {
    /// Create a new Ensemble with validation.
    ///
    /// Each member is laid out like a [`Field`]. Fails with a dimension
    /// error when there are no members.
    pub fn new(dates: Vec<NaiveDate>, n_points: usize, members: Vec<Vec<f64>>) -> Result<Self> {
        validate_axis(&dates)?;
        if members.is_empty() {
            return Err(VerificationError::dimension("ensemble has zero members"));
        }
        if n_points == 0 {
            return Err(VerificationError::dimension("ensemble has zero spatial points"));
        }
        for (m, values) in members.iter().enumerate() {
            validate_values(values, dates.len() * n_points, &format!("member {m}"))?;
        }
        Ok(Self {
            dates,
            n_points,
            members,
        })
    }

    /// Create an ensemble of single-point member series.
    pub fn from_series(dates: Vec<NaiveDate>, members: Vec<Vec<f64>>) -> Result<Self> {
        Self::new(dates, 1, members)
    }

    /// Raw values of one member.
    pub fn member(&self, m: usize) -> &[f64] {
        &self.members[m]
    }

    /// Number of dates.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns `true` if there are no dates.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl From<Field> for Ensemble {
    fn from(field: Field) -> Self {
        Self {
            dates: field.dates,
            n_points: field.n_points,
            members: vec![field.values],
        }
    }
}

impl EnsembleSource for Ensemble {
    fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    fn n_members(&self) -> usize {
        self.members.len()
    }

    fn n_points(&self) -> usize {
        self.n_points
    }

    fn value(&self, member: usize, t: usize, point: usize) -> f64 {
        self.members[member][t * self.n_points + point]
    }
}

/// Check that a date axis is non-empty and strictly increasing.
pub(crate) fn validate_axis(dates: &[NaiveDate]) -> Result<()> {
    if dates.is_empty() {
        return Err(VerificationError::dimension("date axis is empty"));
    }
    if let Some(w) = dates.windows(2).find(|w| w[1] <= w[0]) {
        return Err(VerificationError::alignment(format!(
            "date axis is not strictly increasing at {} -> {}",
            w[0], w[1]
        )));
    }
    Ok(())
}

fn validate_values(values: &[f64], expected: usize, name: &str) -> Result<()> {
    if values.len() != expected {
        return Err(VerificationError::alignment(format!(
            "{} has {} values, expected {}",
            name,
            values.len(),
            expected
        )));
    }
    if values.iter().any(|v| v.is_infinite()) {
        return Err(VerificationError::NonNumeric(format!(
            "{name} contains infinite values"
        )));
    }
    Ok(())
}
