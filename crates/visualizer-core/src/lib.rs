/// visualizer-core: tercile forecast verification and plot preparation.
///
/// Seasonal hindcasts are aggregated to one value per season-year, split into
/// terciles of the observed climatology and scored with the ROC skill score.
/// The results feed a tercile bar plot and a layered temporal plot, both
/// serialisable to JSON for a renderer.
pub mod aggregate;
pub mod barplot;
pub mod calendar;
pub mod detrend;
pub mod error;
pub mod metrics;
pub mod series;
pub mod stats;
pub mod temporal;
pub mod tercile;
pub mod traits;

pub use aggregate::{Aggregation, YearlyEnsemble, YearlySeries};
pub use barplot::TercileBarPlot;
pub use calendar::Season;
pub use error::{Result, VerificationError};
pub use series::{Ensemble, Field};
pub use temporal::{temporal_plot, LabeledSeries, TemporalOptions, TemporalPlot};
pub use tercile::{verify, verify_forecast, verify_yearly, TercileSkill, VerificationOptions};
