/// Options of a tercile verification run.
///
/// - `season`: months aggregated into one value per season-year; `None`
///   treats each calendar year as a season
/// - `aggregation`: how the values inside a season are combined
/// - `year_target`: year whose probabilities are reported
/// - `detrend`: remove a linear trend before categorisation
/// - `conf_level`: confidence level of the ROC significance test
/// - `score_threshold`: scores at or above it are highlighted
use serde::{Deserialize, Serialize};

use super::constants::{CONF_LEVEL_BOUNDS, DEFAULT_CONF_LEVEL};
use crate::aggregate::Aggregation;
use crate::calendar::Season;
use crate::error::{Result, VerificationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationOptions {
    pub season: Option<Season>,
    pub aggregation: Aggregation,
    pub year_target: Option<i32>,
    pub detrend: bool,
    pub conf_level: f64,
    pub score_threshold: Option<f64>,
}

impl Default for VerificationOptions {
    fn default() -> Self {
        Self {
            season: None,
            aggregation: Aggregation::Mean,
            year_target: None,
            detrend: false,
            conf_level: DEFAULT_CONF_LEVEL,
            score_threshold: None,
        }
    }
}

impl VerificationOptions {
    pub fn with_season(mut self, season: Season) -> Self {
        self.season = Some(season);
        self
    }

    pub fn with_year_target(mut self, year: i32) -> Self {
        self.year_target = Some(year);
        self
    }

    pub fn with_detrend(mut self, detrend: bool) -> Self {
        self.detrend = detrend;
        self
    }

    pub fn with_conf_level(mut self, conf_level: f64) -> Self {
        self.conf_level = conf_level;
        self
    }

    pub fn with_score_threshold(mut self, threshold: f64) -> Self {
        self.score_threshold = Some(threshold);
        self
    }

    /// Check every option against its bounds.
    pub fn validate(&self) -> Result<()> {
        let (lo, hi) = CONF_LEVEL_BOUNDS;
        if !(self.conf_level > lo && self.conf_level < hi) {
            return Err(VerificationError::InvalidParameter {
                name: "conf_level",
                value: self.conf_level.to_string(),
                reason: "must lie in (0, 1)",
            });
        }
        if let Some(t) = self.score_threshold {
            if !(-1.0..=1.0).contains(&t) {
                return Err(VerificationError::InvalidParameter {
                    name: "score_threshold",
                    value: t.to_string(),
                    reason: "must lie in [-1, 1]",
                });
            }
        }
        Ok(())
    }
}
