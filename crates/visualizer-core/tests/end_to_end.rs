use chrono::{Datelike, Months, NaiveDate};
use visualizer_core::barplot::{Emphasis, TercileBarPlot};
use visualizer_core::metrics::roc_area;
use visualizer_core::series::{Ensemble, Field};
use visualizer_core::temporal::{temporal_plot, LabeledSeries, Layer, TemporalOptions};
use visualizer_core::tercile::{verify, verify_forecast, verify_yearly, Category};
use visualizer_core::{Season, VerificationError, VerificationOptions, YearlyEnsemble, YearlySeries};

fn monthly(start: NaiveDate, n: u32) -> Vec<NaiveDate> {
    (0..n)
        .map(|i| start.checked_add_months(Months::new(i)).unwrap())
        .collect()
}

/// A permutation of 0..20 over consecutive season-years.
fn djf_value(date: NaiveDate) -> f64 {
    let year = Season::djf().season_year(date).unwrap_or(date.year());
    f64::from((year * 7).rem_euclid(20))
}

fn djf_inputs() -> (Ensemble, Field) {
    let dates = monthly(NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(), 252);
    let values: Vec<f64> = dates.iter().map(|&d| djf_value(d)).collect();
    let obs = Field::series(dates.clone(), values.clone()).unwrap();
    let hindcast = Ensemble::from_series(dates, vec![values; 3]).unwrap();
    (hindcast, obs)
}

fn lcg(seed: u64) -> impl FnMut() -> f64 {
    let mut state = seed;
    move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 33) as f64 / (1u64 << 31) as f64
    }
}

#[test]
fn perfect_djf_hindcast_scores_one() {
    let (hindcast, obs) = djf_inputs();
    let options = VerificationOptions::default().with_season(Season::djf());
    let skill = verify(&hindcast, &obs, &options).unwrap();

    // 1990 and 2011 lack a December or a January/February and are dropped
    assert_eq!(skill.year_target, 2010);
    assert_eq!(skill.reference_years(), (1991..=2009).collect::<Vec<_>>());
    assert_eq!(skill.probabilities.to_array(), [0.0, 1.0, 0.0]);
    assert!((skill.thresholds.lower - 6.0).abs() < 1e-9);
    assert!((skill.thresholds.upper - 13.0).abs() < 1e-9);
    assert_eq!(skill.score_values(), [Some(1.0); 3]);
    assert_eq!(skill.significance(), [true, true, true]);
    assert_eq!(skill.n_members, 3);
}

#[test]
fn forecast_probabilities_follow_member_split() {
    let (hindcast, obs) = djf_inputs();
    let fc_dates = monthly(NaiveDate::from_ymd_opt(2010, 12, 1).unwrap(), 3);
    let members = [0.0, 1.0, 10.0, 10.5, 19.0]
        .iter()
        .map(|&v| vec![v; 3])
        .collect();
    let forecast = Ensemble::from_series(fc_dates, members).unwrap();
    let options = VerificationOptions::default().with_season(Season::djf());

    let skill = verify_forecast(&hindcast, &obs, &forecast, &options).unwrap();
    assert_eq!(skill.year_target, 2011);
    assert_eq!(skill.reference.len(), 20);
    let p = skill.probabilities;
    assert!((p.below - 0.4).abs() < 1e-12);
    assert!((p.between - 0.4).abs() < 1e-12);
    assert!((p.above - 0.2).abs() < 1e-12);
    assert_eq!(p.most_likely(), Category::Below);
}

#[test]
fn forecast_for_other_year_than_target_is_rejected() {
    let (hindcast, obs) = djf_inputs();
    let fc_dates = monthly(NaiveDate::from_ymd_opt(2010, 12, 1).unwrap(), 3);
    let forecast = Ensemble::from_series(fc_dates, vec![vec![1.0; 3]]).unwrap();
    let options = VerificationOptions::default()
        .with_season(Season::djf())
        .with_year_target(2005);
    let err = verify_forecast(&hindcast, &obs, &forecast, &options).unwrap_err();
    assert!(matches!(err, VerificationError::Alignment(_)));
}

#[test]
fn unrelated_hindcast_has_no_skill() {
    let years: Vec<i32> = (1600..2000).collect();
    let mut next = lcg(7);
    let obs: Vec<f64> = years.iter().map(|_| next()).collect();
    let members: Vec<Vec<f64>> = (0..10)
        .map(|_| years.iter().map(|_| next()).collect())
        .collect();
    let hindcast = YearlyEnsemble::new(years.clone(), members).unwrap();
    let obs = YearlySeries::new(years, obs).unwrap();

    let skill = verify_yearly(&hindcast, &obs, None, &VerificationOptions::default()).unwrap();
    for s in &skill.scores {
        let score = s.score.unwrap();
        assert!(score.abs() < 0.25, "{:?} scored {}", s.category, score);
    }
    assert!(skill.satisfies_contract());
}

#[test]
fn skill_json_carries_the_contract() {
    let (hindcast, obs) = djf_inputs();
    let options = VerificationOptions::default().with_season(Season::djf());
    let skill = verify(&hindcast, &obs, &options).unwrap();

    let json: serde_json::Value = serde_json::from_str(&skill.to_json().unwrap()).unwrap();
    assert_eq!(json["contract_version"], 1);
    assert_eq!(json["year_target"], 2010);
    assert_eq!(json["scores"].as_array().unwrap().len(), 3);
    assert_eq!(json["scores"][0]["category"], "below");
    assert_eq!(json["probabilities"]["between"], 1.0);
}

#[test]
fn bar_plot_marks_significant_scores() {
    let (hindcast, obs) = djf_inputs();
    let options = VerificationOptions::default().with_season(Season::djf());
    let skill = verify(&hindcast, &obs, &options).unwrap();
    let plot = TercileBarPlot::from_skill(&skill);
    assert!(plot
        .annotations
        .iter()
        .all(|a| a.emphasis == Emphasis::Significant));
    assert_eq!(plot.bars[1].label, "Normal");
}

#[test]
fn roc_area_of_reference_outcomes_matches_scores() {
    let (hindcast, obs) = djf_inputs();
    let options = VerificationOptions::default().with_season(Season::djf());
    let skill = verify(&hindcast, &obs, &options).unwrap();
    let probs: Vec<f64> = skill.reference.iter().map(|y| y.probabilities.above).collect();
    let events: Vec<bool> = skill
        .reference
        .iter()
        .map(|y| y.observed == Category::Above)
        .collect();
    let roc = roc_area(&probs, &events).unwrap();
    assert_eq!(Some(roc.skill_score()), skill.score(Category::Above).score);
}

#[test]
fn temporal_plot_breaks_at_missing_dates() {
    let dates: Vec<NaiveDate> = (1..=10)
        .filter(|&d| d != 5)
        .map(|d| NaiveDate::from_ymd_opt(2001, 1, d).unwrap())
        .collect();
    let n = dates.len();
    let obs = Field::series(dates.clone(), vec![1.0; n]).unwrap();
    let hindcast = Ensemble::from_series(dates, vec![vec![0.0; n], vec![2.0; n]]).unwrap();
    let series = [
        LabeledSeries::new("obs", obs),
        LabeledSeries::new("hindcast", hindcast),
    ];

    let plot = temporal_plot(&series, &TemporalOptions::default()).unwrap();
    assert_eq!(plot.layers.len(), 3);
    match &plot.layers[0] {
        Layer::Line { points, .. } => {
            assert_eq!(points.len(), 10);
            assert!(points[4].1.is_nan());
        }
        other => panic!("expected a line, got {other:?}"),
    }
    match &plot.layers[1] {
        Layer::Band { polygons, .. } => assert_eq!(polygons.len(), 2),
        other => panic!("expected a band, got {other:?}"),
    }
}
