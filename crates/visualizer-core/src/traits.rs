use chrono::NaiveDate;

/// Read access to an observational reference.
///
/// Implemented by the in-memory [`Field`](crate::series::Field); data loaders
/// can implement it directly to avoid copying into one.
pub trait ObservationSource {
    /// Dates of the time axis, strictly increasing.
    fn dates(&self) -> &[NaiveDate];

    /// Number of spatial points per date (1 for a single series).
    fn n_points(&self) -> usize;

    /// Observed value at time index `t` and spatial point `point`. `NaN` if missing.
    fn observed(&self, t: usize, point: usize) -> f64;
}

/// Read access to an ensemble of model runs on a shared time axis.
pub trait EnsembleSource {
    /// Dates of the time axis shared by all members, strictly increasing.
    fn dates(&self) -> &[NaiveDate];

    /// Number of ensemble members.
    fn n_members(&self) -> usize;

    /// Number of spatial points per date (1 for a single series).
    fn n_points(&self) -> usize;

    /// Value of `member` at time index `t` and spatial point `point`. `NaN` if missing.
    fn value(&self, member: usize, t: usize, point: usize) -> f64;
}
