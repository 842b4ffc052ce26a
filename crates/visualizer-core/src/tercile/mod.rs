/// Tercile categorisation of ensemble forecasts and ROC skill scoring.
///
/// Member values are categorised against the observed terciles of a
/// reference period, thresholds for each hindcast year are computed with that
/// year left out, and the discrimination of each category is summarised by
/// its ROC skill score.
pub mod category;
pub mod constants;
pub mod outputs;
pub mod params;
pub mod run;

pub use category::{Category, CategoryProbabilities, CategoryProbabilitiesSeries, Thresholds};
pub use outputs::{CategoryScore, TercileSkill, YearOutcome};
pub use params::VerificationOptions;
pub use run::{verify, verify_forecast, verify_yearly, ForecastMembers};
