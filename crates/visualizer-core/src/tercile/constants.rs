/// Tercile verification constants and output contract.
///
/// Centralises the fixed values used throughout the verification routine.

// -- Categorisation --

/// Probability level of the lower tercile threshold.
pub const LOWER_TERCILE: f64 = 1.0 / 3.0;

/// Probability level of the upper tercile threshold.
pub const UPPER_TERCILE: f64 = 2.0 / 3.0;

/// Number of tercile categories.
pub const N_CATEGORIES: usize = 3;

/// Climatological probability of each category.
pub const CLIMATOLOGICAL_PROBABILITY: f64 = 1.0 / 3.0;

/// Fewest reference years for which terciles are considered stable.
pub const MIN_REFERENCE_YEARS: usize = 5;

// -- Significance --

/// Default confidence level of the ROC area significance test.
pub const DEFAULT_CONF_LEVEL: f64 = 0.95;

/// Open interval the confidence level must lie in.
pub const CONF_LEVEL_BOUNDS: (f64, f64) = (0.0, 1.0);

// -- Output contract --

/// Version of the serialised verification output. Bump on breaking changes.
pub const CONTRACT_VERSION: u32 = 1;

/// Tolerance for the probability triple summing to one.
pub const PROBABILITY_SUM_TOLERANCE: f64 = 1e-9;
