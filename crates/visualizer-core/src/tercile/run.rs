/// Tercile verification orchestration.
///
/// - `verify()`: hindcast and observations only; the target year is a hindcast year
/// - `verify_forecast()`: adds a forecast ensemble for the target year
/// - `verify_yearly()`: the same on inputs already reduced to season-years
use tracing::{debug, warn};

use super::category::{CategoryProbabilities, Category, Thresholds};
use super::constants::{CONTRACT_VERSION, MIN_REFERENCE_YEARS};
use super::outputs::{CategoryScore, TercileSkill, YearOutcome};
use super::params::VerificationOptions;
use crate::aggregate::{self, YearlyEnsemble, YearlySeries};
use crate::detrend::{self, LinearFit};
use crate::error::{Result, VerificationError};
use crate::metrics;
use crate::stats;
use crate::traits::{EnsembleSource, ObservationSource};

/// Member values of a forecast for a single season-year.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastMembers {
    pub year: i32,
    pub members: Vec<f64>,
}

/// Verify a hindcast against observations.
///
/// The target year is `options.year_target` or the last year shared by the
/// hindcast and the observations; its members come from the hindcast.
pub fn verify<H, O>(hindcast: &H, observations: &O, options: &VerificationOptions) -> Result<TercileSkill>
where
    H: EnsembleSource + ?Sized,
    O: ObservationSource + ?Sized,
{
    options.validate()?;
    let season = options.season.as_ref();
    let hc = aggregate::yearly_ensemble(hindcast, season, options.aggregation)?;
    let obs = aggregate::yearly_observations(observations, season, options.aggregation)?;
    verify_yearly(&hc, &obs, None, options)
}

/// Verify a hindcast against observations and report the forecast's probabilities.
///
/// The forecast is reduced to season-years like the hindcast; its target is
/// `options.year_target` when given, else its last season-year with data.
pub fn verify_forecast<H, O, F>(
    hindcast: &H,
    observations: &O,
    forecast: &F,
    options: &VerificationOptions,
) -> Result<TercileSkill>
where
    H: EnsembleSource + ?Sized,
    O: ObservationSource + ?Sized,
    F: EnsembleSource + ?Sized,
{
    options.validate()?;
    let season = options.season.as_ref();
    let hc = aggregate::yearly_ensemble(hindcast, season, options.aggregation)?;
    let obs = aggregate::yearly_observations(observations, season, options.aggregation)?;
    let fc = aggregate::yearly_ensemble(forecast, season, options.aggregation)?;

    let has_data = |i: usize| fc.members.iter().any(|m| !m[i].is_nan());
    let index = match options.year_target {
        Some(year) => fc.year_index(year).filter(|&i| has_data(i)).ok_or_else(|| {
            VerificationError::alignment(format!("forecast has no data for target year {year}"))
        })?,
        None => (0..fc.years.len())
            .rev()
            .find(|&i| has_data(i))
            .ok_or_else(|| VerificationError::alignment("forecast has no season-year with data"))?,
    };
    if fc.years.len() > 1 {
        debug!(
            years = fc.years.len(),
            year = fc.years[index],
            "forecast spans several season-years; using one"
        );
    }
    let members = ForecastMembers {
        year: fc.years[index],
        members: fc.members_at(index),
    };
    verify_yearly(&hc, &obs, Some(&members), options)
}

/// A hindcast year usable as a reference year.
struct Aligned {
    year: i32,
    index: usize,
    observed: f64,
}

fn align(hindcast: &YearlyEnsemble, observations: &YearlySeries) -> Vec<Aligned> {
    let mut aligned = Vec::with_capacity(hindcast.years.len());
    for (index, &year) in hindcast.years.iter().enumerate() {
        let Some(observed) = observations.get(year) else {
            debug!(year, "year absent from observations");
            continue;
        };
        if observed.is_nan() {
            warn!(year, "observation missing; year excluded");
            continue;
        }
        if hindcast.members.iter().all(|m| m[index].is_nan()) {
            warn!(year, "all hindcast members missing; year excluded");
            continue;
        }
        aligned.push(Aligned {
            year,
            index,
            observed,
        });
    }
    aligned
}

fn check_shapes(hindcast: &YearlyEnsemble, observations: &YearlySeries) -> Result<()> {
    if hindcast.members.is_empty() {
        return Err(VerificationError::dimension("hindcast has zero members"));
    }
    if hindcast
        .members
        .iter()
        .any(|m| m.len() != hindcast.years.len())
    {
        return Err(VerificationError::alignment(
            "hindcast members do not match the year axis",
        ));
    }
    if observations.years.len() != observations.values.len() {
        return Err(VerificationError::alignment(
            "observations do not match the year axis",
        ));
    }
    if observations.values.iter().any(|v| v.is_infinite()) {
        return Err(VerificationError::NonNumeric(
            "observations contain infinite values".to_string(),
        ));
    }
    Ok(())
}

/// Verify season-year inputs.
///
/// Reference years are the years shared by hindcast and observations, other
/// than the target year, where the observation and at least one member are
/// present. Each reference year is categorised against thresholds computed
/// without its own observation; the target year uses thresholds from the
/// whole reference period.
pub fn verify_yearly(
    hindcast: &YearlyEnsemble,
    observations: &YearlySeries,
    forecast: Option<&ForecastMembers>,
    options: &VerificationOptions,
) -> Result<TercileSkill> {
    options.validate()?;
    check_shapes(hindcast, observations)?;
    if let Some(fc) = forecast {
        if fc.members.is_empty() {
            return Err(VerificationError::dimension("forecast has zero members"));
        }
        if fc.members.iter().any(|v| v.is_infinite()) {
            return Err(VerificationError::NonNumeric(
                "forecast contains infinite values".to_string(),
            ));
        }
        if let Some(year) = options.year_target.filter(|&y| y != fc.year) {
            return Err(VerificationError::alignment(format!(
                "forecast year {} differs from target year {}",
                fc.year, year
            )));
        }
    }

    let aligned = align(hindcast, observations);
    if aligned.is_empty() {
        return Err(VerificationError::alignment(
            "hindcast and observations share no valid years",
        ));
    }

    let year_target = options
        .year_target
        .or(forecast.map(|f| f.year))
        .or(aligned.last().map(|a| a.year))
        .ok_or_else(|| VerificationError::alignment("no target year"))?;

    let reference: Vec<&Aligned> = aligned.iter().filter(|a| a.year != year_target).collect();
    if reference.len() < MIN_REFERENCE_YEARS {
        return Err(VerificationError::InsufficientData {
            available: reference.len(),
            required: MIN_REFERENCE_YEARS,
        });
    }

    let ref_years: Vec<i32> = reference.iter().map(|a| a.year).collect();
    let mut ref_obs: Vec<f64> = reference.iter().map(|a| a.observed).collect();
    // ref_members[m][k] is member m in reference year k
    let mut ref_members: Vec<Vec<f64>> = hindcast
        .members
        .iter()
        .map(|m| reference.iter().map(|a| m[a.index]).collect())
        .collect();

    let mut target_members = match forecast {
        Some(fc) => fc.members.clone(),
        None => {
            let index = hindcast.year_index(year_target).ok_or_else(|| {
                VerificationError::alignment(format!(
                    "target year {year_target} is not a hindcast year and no forecast was given"
                ))
            })?;
            hindcast.members_at(index)
        }
    };

    if options.detrend {
        let x = f64::from(year_target);
        ref_obs = detrend::detrend(&ref_years, &ref_obs).0;
        if forecast.is_some() {
            let mean: Vec<f64> = (0..ref_years.len())
                .map(|k| stats::nan_mean(&ref_members.iter().map(|m| m[k]).collect::<Vec<_>>()))
                .collect();
            if let Some(fit) = fit_years(&ref_years, &mean) {
                target_members = target_members.iter().map(|&v| fit.remove(x, v)).collect();
            }
        }
        for (m, member) in ref_members.iter_mut().enumerate() {
            let (detrended, fit) = detrend::detrend(&ref_years, member.as_slice());
            if let (Some(fit), None) = (fit, forecast) {
                if let Some(v) = target_members.get_mut(m) {
                    *v = fit.remove(x, *v);
                }
            }
            *member = detrended;
        }
        debug!(year_target, "series detrended over the reference period");
    }

    if stats::nan_variance(&ref_obs) == 0.0 {
        return Err(VerificationError::degenerate(
            "reference observations have zero variance",
        ));
    }

    let mut outcomes = Vec::with_capacity(ref_years.len());
    for (k, &year) in ref_years.iter().enumerate() {
        let thresholds = Thresholds::leave_one_out(&ref_obs, k)?;
        let members: Vec<f64> = ref_members.iter().map(|m| m[k]).collect();
        let (Some(observed), Some(probabilities)) = (
            thresholds.classify(ref_obs[k]),
            CategoryProbabilities::from_members(&members, &thresholds),
        ) else {
            return Err(VerificationError::alignment(format!(
                "reference year {year} lost its data during detrending"
            )));
        };
        outcomes.push(YearOutcome {
            year,
            thresholds,
            probabilities,
            observed,
        });
    }

    let thresholds = Thresholds::from_reference(&ref_obs)?;
    let probabilities = CategoryProbabilities::from_members(&target_members, &thresholds)
        .ok_or_else(|| {
            VerificationError::alignment(format!(
                "target year {year_target} has no valid member values"
            ))
        })?;
    let n_members = target_members.iter().filter(|v| !v.is_nan()).count();

    let scores = [
        score_category(Category::Below, &outcomes, options)?,
        score_category(Category::Between, &outcomes, options)?,
        score_category(Category::Above, &outcomes, options)?,
    ];

    debug!(
        year_target,
        n_reference = outcomes.len(),
        below = ?scores[0].score,
        between = ?scores[1].score,
        above = ?scores[2].score,
        "tercile verification complete"
    );

    Ok(TercileSkill {
        contract_version: CONTRACT_VERSION,
        year_target,
        probabilities,
        scores,
        thresholds,
        n_members,
        reference: outcomes,
    })
}

fn fit_years(years: &[i32], values: &[f64]) -> Option<LinearFit> {
    let x: Vec<f64> = years.iter().map(|&y| f64::from(y)).collect();
    LinearFit::fit(&x, values)
}

fn score_category(
    category: Category,
    outcomes: &[YearOutcome],
    options: &VerificationOptions,
) -> Result<CategoryScore> {
    let probabilities: Vec<f64> = outcomes.iter().map(|o| o.probabilities.get(category)).collect();
    let observed: Vec<bool> = outcomes.iter().map(|o| o.observed == category).collect();
    let roc = match metrics::roc_area(&probabilities, &observed) {
        Ok(roc) => Some(roc),
        Err(VerificationError::Degenerate(msg)) => {
            warn!(category = category.label(), "score undefined: {msg}");
            None
        }
        Err(other) => return Err(other),
    };
    let score = roc.map(|r| r.skill_score());
    Ok(CategoryScore {
        category,
        score,
        roc,
        significant: roc.is_some_and(|r| r.is_significant(options.conf_level)),
        highlighted: score
            .zip(options.score_threshold)
            .is_some_and(|(s, t)| s >= t),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn identical_members(n_members: usize, values: &[f64]) -> Vec<Vec<f64>> {
        vec![values.to_vec(); n_members]
    }

    fn one_to_ten() -> (Vec<i32>, Vec<f64>) {
        ((1..=10).collect(), (1..=10).map(f64::from).collect())
    }

    #[test]
    fn perfect_ensemble_target_year_above() {
        let (years, values) = one_to_ten();
        let hc = YearlyEnsemble::new(years.clone(), identical_members(5, &values)).unwrap();
        let obs = YearlySeries::new(years, values).unwrap();
        let opts = VerificationOptions::default().with_year_target(10);

        let skill = verify_yearly(&hc, &obs, None, &opts).unwrap();

        assert_eq!(skill.year_target, 10);
        assert_relative_eq!(skill.thresholds.lower, 11.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(skill.thresholds.upper, 19.0 / 3.0, epsilon = 1e-12);
        assert_eq!(skill.probabilities.to_array(), [0.0, 0.0, 1.0]);
        assert_eq!(skill.n_members, 5);
        assert_eq!(skill.reference_years(), (1..=9).collect::<Vec<_>>());
        assert_eq!(skill.score_values(), [Some(1.0); 3]);
    }

    #[test]
    fn default_target_is_last_shared_year() {
        let (years, values) = one_to_ten();
        let hc = YearlyEnsemble::new(years.clone(), identical_members(3, &values)).unwrap();
        let obs = YearlySeries::new(years, values).unwrap();
        let skill = verify_yearly(&hc, &obs, None, &VerificationOptions::default()).unwrap();
        assert_eq!(skill.year_target, 10);
        assert!(!skill.reference_years().contains(&10));
    }

    #[test]
    fn forecast_members_drive_target_probabilities() {
        let (years, values) = one_to_ten();
        let hc = YearlyEnsemble::new(years.clone(), identical_members(5, &values)).unwrap();
        let obs = YearlySeries::new(years, values).unwrap();
        let fc = ForecastMembers {
            year: 11,
            members: vec![0.0, 1.0, 5.0, 5.5, 100.0],
        };
        let skill = verify_yearly(&hc, &obs, Some(&fc), &VerificationOptions::default()).unwrap();
        assert_eq!(skill.year_target, 11);
        // all ten hindcast years are reference years
        assert_eq!(skill.reference.len(), 10);
        assert_relative_eq!(skill.probabilities.below, 0.4);
        assert_relative_eq!(skill.probabilities.between, 0.4);
        assert_relative_eq!(skill.probabilities.above, 0.2);
    }

    #[test]
    fn forecast_year_must_match_target() {
        let (years, values) = one_to_ten();
        let hc = YearlyEnsemble::new(years.clone(), identical_members(2, &values)).unwrap();
        let obs = YearlySeries::new(years, values).unwrap();
        let fc = ForecastMembers {
            year: 11,
            members: vec![1.0],
        };
        let opts = VerificationOptions::default().with_year_target(12);
        let err = verify_yearly(&hc, &obs, Some(&fc), &opts).unwrap_err();
        assert!(matches!(err, VerificationError::Alignment(_)));
    }

    #[test]
    fn reference_thresholds_exclude_own_year() {
        let (years, values) = one_to_ten();
        let hc = YearlyEnsemble::new(years.clone(), identical_members(2, &values)).unwrap();
        let obs = YearlySeries::new(years, values.clone()).unwrap();
        let skill = verify_yearly(&hc, &obs, None, &VerificationOptions::default()).unwrap();
        let ref_obs = &values[..9];
        for (k, outcome) in skill.reference.iter().enumerate() {
            let expected = Thresholds::leave_one_out(ref_obs, k).unwrap();
            assert_eq!(outcome.thresholds, expected);
        }
    }

    #[test]
    fn probabilities_sum_to_one_every_year() {
        let years: Vec<i32> = (1981..=2000).collect();
        let obs_values: Vec<f64> = (0..20).map(|i| ((i * 7) % 11) as f64).collect();
        let members: Vec<Vec<f64>> = (0..4)
            .map(|m| (0..20).map(|i| ((i * 3 + m * 5) % 13) as f64).collect())
            .collect();
        let hc = YearlyEnsemble::new(years.clone(), members).unwrap();
        let obs = YearlySeries::new(years, obs_values).unwrap();
        let skill = verify_yearly(&hc, &obs, None, &VerificationOptions::default()).unwrap();
        assert_relative_eq!(skill.probabilities.sum(), 1.0, epsilon = 1e-12);
        for y in &skill.reference {
            assert_relative_eq!(y.probabilities.sum(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn missing_years_are_excluded() {
        let (years, mut values) = one_to_ten();
        let mut members = identical_members(3, &values);
        values[2] = f64::NAN;
        for m in &mut members {
            m[5] = f64::NAN;
        }
        let hc = YearlyEnsemble::new(years.clone(), members).unwrap();
        let obs = YearlySeries::new(years, values).unwrap();
        let skill = verify_yearly(&hc, &obs, None, &VerificationOptions::default()).unwrap();
        let ref_years = skill.reference_years();
        assert!(!ref_years.contains(&3));
        assert!(!ref_years.contains(&6));
        assert_eq!(ref_years.len(), 7);
    }

    #[test]
    fn too_few_reference_years() {
        let years: Vec<i32> = (1..=5).collect();
        let values: Vec<f64> = (1..=5).map(f64::from).collect();
        let hc = YearlyEnsemble::new(years.clone(), identical_members(2, &values)).unwrap();
        let obs = YearlySeries::new(years, values).unwrap();
        let err = verify_yearly(&hc, &obs, None, &VerificationOptions::default()).unwrap_err();
        assert_eq!(
            err,
            VerificationError::InsufficientData {
                available: 4,
                required: MIN_REFERENCE_YEARS
            }
        );
    }

    #[test]
    fn disjoint_years_fail_alignment() {
        let hc = YearlyEnsemble::new(vec![1, 2, 3], vec![vec![1.0, 2.0, 3.0]]).unwrap();
        let obs = YearlySeries::new(vec![10, 11, 12], vec![1.0, 2.0, 3.0]).unwrap();
        let err = verify_yearly(&hc, &obs, None, &VerificationOptions::default()).unwrap_err();
        assert!(matches!(err, VerificationError::Alignment(_)));
    }

    #[test]
    fn zero_members_fail_dimension() {
        let hc = YearlyEnsemble {
            years: vec![1, 2],
            members: vec![],
        };
        let obs = YearlySeries::new(vec![1, 2], vec![1.0, 2.0]).unwrap();
        let err = verify_yearly(&hc, &obs, None, &VerificationOptions::default()).unwrap_err();
        assert!(matches!(err, VerificationError::Dimension(_)));
    }

    #[test]
    fn constant_observations_are_degenerate() {
        let (years, values) = one_to_ten();
        let hc = YearlyEnsemble::new(years.clone(), identical_members(2, &values)).unwrap();
        let obs = YearlySeries::new(years, vec![4.0; 10]).unwrap();
        let err = verify_yearly(&hc, &obs, None, &VerificationOptions::default()).unwrap_err();
        assert!(matches!(err, VerificationError::Degenerate(_)));
    }

    #[test]
    fn invalid_conf_level_rejected() {
        let (years, values) = one_to_ten();
        let hc = YearlyEnsemble::new(years.clone(), identical_members(2, &values)).unwrap();
        let obs = YearlySeries::new(years, values).unwrap();
        let opts = VerificationOptions::default().with_conf_level(1.0);
        let err = verify_yearly(&hc, &obs, None, &opts).unwrap_err();
        assert!(matches!(err, VerificationError::InvalidParameter { .. }));
    }

    /// Observations without trend; members share their anomalies plus a
    /// trend of 10 per year centred on 1990.
    fn trended_hindcast(n_years: usize) -> (Vec<i32>, YearlyEnsemble, YearlySeries) {
        let years: Vec<i32> = (1981..).take(n_years).collect();
        let signal: Vec<f64> = (0..n_years).map(|i| ((i * 7) % 19) as f64).collect();
        let trended: Vec<f64> = signal
            .iter()
            .enumerate()
            .map(|(i, s)| s + 10.0 * (i as f64 - 9.0))
            .collect();
        let hc = YearlyEnsemble::new(years.clone(), identical_members(3, &trended)).unwrap();
        let obs = YearlySeries::new(years.clone(), signal).unwrap();
        (years, hc, obs)
    }

    fn all_reference_years_called(skill: &TercileSkill) -> bool {
        skill
            .reference
            .iter()
            .all(|y| y.probabilities.get(y.observed) == 1.0)
    }

    #[test]
    fn detrending_aligns_trended_members_with_observations() {
        let (_, hc, obs) = trended_hindcast(20);

        let raw = verify_yearly(&hc, &obs, None, &VerificationOptions::default()).unwrap();
        assert!(!all_reference_years_called(&raw));
        // the member trend pushes the last year far above the observed terciles
        assert_eq!(raw.probabilities.to_array(), [0.0, 0.0, 1.0]);

        let opts = VerificationOptions::default().with_detrend(true);
        let detrended = verify_yearly(&hc, &obs, None, &opts).unwrap();
        assert!(all_reference_years_called(&detrended));
        assert_eq!(detrended.score_values(), [Some(1.0); 3]);
        // target members are extrapolated with their own trend and land below
        assert_eq!(detrended.probabilities.to_array(), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn detrending_extrapolates_forecast_with_ensemble_mean_trend() {
        let (_, hc, obs) = trended_hindcast(19);
        let fc = ForecastMembers {
            year: 2001,
            members: vec![110.5, 111.0, 111.5, 112.0],
        };

        let raw = verify_yearly(&hc, &obs, Some(&fc), &VerificationOptions::default()).unwrap();
        assert_eq!(raw.year_target, 2001);
        assert_eq!(raw.probabilities.to_array(), [0.0, 0.0, 1.0]);

        let opts = VerificationOptions::default().with_detrend(true);
        let detrended = verify_yearly(&hc, &obs, Some(&fc), &opts).unwrap();
        assert_eq!(detrended.reference.len(), 19);
        assert_eq!(detrended.probabilities.to_array(), [1.0, 0.0, 0.0]);
        assert_eq!(detrended.n_members, 4);
    }

    #[test]
    fn category_never_observed_has_undefined_score() {
        // tied zeros leave no room for the middle category
        let years: Vec<i32> = (1..=11).collect();
        let values = vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let hc = YearlyEnsemble::new(years.clone(), identical_members(4, &values)).unwrap();
        let obs = YearlySeries::new(years, values).unwrap();
        let opts = VerificationOptions::default().with_score_threshold(0.0);

        let skill = verify_yearly(&hc, &obs, None, &opts).unwrap();
        let normal = skill.score(Category::Between);
        assert_eq!(normal.score, None);
        assert!(normal.roc.is_none());
        assert!(!normal.significant);
        assert!(!normal.highlighted);
        assert_eq!(skill.score(Category::Below).score, Some(1.0));
        assert_eq!(skill.score(Category::Above).score, Some(1.0));
        assert_eq!(skill.probabilities.to_array(), [0.0, 0.0, 1.0]);
        assert!(skill.satisfies_contract());
    }

    #[test]
    fn infinite_forecast_member_rejected() {
        let (years, values) = one_to_ten();
        let hc = YearlyEnsemble::new(years.clone(), identical_members(2, &values)).unwrap();
        let obs = YearlySeries::new(years, values).unwrap();
        let fc = ForecastMembers {
            year: 11,
            members: vec![1.0, f64::INFINITY],
        };
        let err = verify_yearly(&hc, &obs, Some(&fc), &VerificationOptions::default()).unwrap_err();
        assert!(matches!(err, VerificationError::NonNumeric(_)));
    }

    #[test]
    fn infinite_observation_rejected_even_when_built_directly() {
        let (years, values) = one_to_ten();
        let hc = YearlyEnsemble::new(years.clone(), identical_members(2, &values)).unwrap();
        let mut obs_values = values;
        obs_values[2] = f64::INFINITY;
        let obs = YearlySeries {
            years,
            values: obs_values,
        };
        let err = verify_yearly(&hc, &obs, None, &VerificationOptions::default()).unwrap_err();
        assert!(matches!(err, VerificationError::NonNumeric(_)));
    }

    #[test]
    fn highlight_follows_threshold() {
        let (years, values) = one_to_ten();
        let hc = YearlyEnsemble::new(years.clone(), identical_members(2, &values)).unwrap();
        let obs = YearlySeries::new(years, values).unwrap();
        let opts = VerificationOptions::default().with_score_threshold(0.5);
        let skill = verify_yearly(&hc, &obs, None, &opts).unwrap();
        assert!(skill.scores.iter().all(|s| s.highlighted));
    }
}
