use numpy::{PyArray1, PyReadonlyArray1, PyReadonlyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::convert::{checked_rows, checked_slice, contiguous_slice, to_py_err};

use visualizer_core::aggregate::{YearlyEnsemble, YearlySeries};
use visualizer_core::tercile::{
    verify_yearly, CategoryProbabilities, CategoryProbabilitiesSeries, ForecastMembers,
    TercileSkill, VerificationOptions,
};

// ---------------------------------------------------------------------------
// Typed pyclass result objects
// ---------------------------------------------------------------------------

define_row_result! {
    /// Tercile probabilities of the target year.
    pub struct Probabilities from CategoryProbabilities {
        below, between, above,
    }
}

define_columns_result! {
    /// Leave-one-out probabilities of every reference year.
    pub struct ReferenceProbabilities from CategoryProbabilitiesSeries {
        below, between, above,
    }
}

/// Result of a tercile verification.
#[pyclass(frozen)]
pub struct TercileResult {
    #[pyo3(get)]
    contract_version: u32,
    #[pyo3(get)]
    year_target: i32,
    #[pyo3(get)]
    probabilities: Py<Probabilities>,
    /// ROC skill scores, below/normal/above; `None` where a category was
    /// never or always observed.
    #[pyo3(get)]
    scores: Vec<Option<f64>>,
    #[pyo3(get)]
    p_values: Vec<Option<f64>>,
    #[pyo3(get)]
    significant: Vec<bool>,
    #[pyo3(get)]
    highlighted: Vec<bool>,
    /// Lower and upper tercile thresholds of the reference period.
    #[pyo3(get)]
    thresholds: (f64, f64),
    #[pyo3(get)]
    n_members: usize,
    #[pyo3(get)]
    reference_years: Py<PyArray1<i32>>,
    #[pyo3(get)]
    reference: Py<ReferenceProbabilities>,
    json: String,
}

impl TercileResult {
    fn from_skill(py: Python<'_>, skill: &TercileSkill) -> PyResult<Self> {
        let json = skill
            .to_json()
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self {
            contract_version: skill.contract_version,
            year_target: skill.year_target,
            probabilities: Py::new(py, Probabilities::from_row(&skill.probabilities))?,
            scores: skill.score_values().to_vec(),
            p_values: skill.scores.iter().map(|s| s.roc.map(|r| r.p_value)).collect(),
            significant: skill.significance().to_vec(),
            highlighted: skill.scores.iter().map(|s| s.highlighted).collect(),
            thresholds: (skill.thresholds.lower, skill.thresholds.upper),
            n_members: skill.n_members,
            reference_years: PyArray1::from_vec(py, skill.reference_years()).unbind(),
            reference: Py::new(
                py,
                ReferenceProbabilities::from_columns(py, skill.reference_probabilities()),
            )?,
            json,
        })
    }
}

#[pymethods]
impl TercileResult {
    /// Serialised verification output.
    fn to_json(&self) -> &str {
        &self.json
    }

    fn __repr__(&self) -> String {
        format!(
            "TercileResult(year_target={}, scores={:?}, significant={:?})",
            self.year_target, self.scores, self.significant
        )
    }
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

#[pyfunction]
#[pyo3(signature = (
    years, hindcast, observations, forecast=None, forecast_year=None,
    year_target=None, detrend=false, conf_level=0.95, score_threshold=None
))]
#[allow(clippy::too_many_arguments)]
fn verify<'py>(
    py: Python<'py>,
    years: Vec<i32>,
    hindcast: PyReadonlyArray2<'py, f64>,
    observations: PyReadonlyArray1<'py, f64>,
    forecast: Option<PyReadonlyArray1<'py, f64>>,
    forecast_year: Option<i32>,
    year_target: Option<i32>,
    detrend: bool,
    conf_level: f64,
    score_threshold: Option<f64>,
) -> PyResult<TercileResult> {
    let members = checked_rows(&hindcast, years.len(), "hindcast")?;
    let obs = checked_slice(&observations, years.len(), "observations")?;

    let hc = YearlyEnsemble::new(years.clone(), members).map_err(to_py_err)?;
    let obs = YearlySeries::new(years, obs.to_vec()).map_err(to_py_err)?;

    let forecast = match &forecast {
        Some(arr) => {
            let year = forecast_year.or(year_target).ok_or_else(|| {
                PyValueError::new_err("forecast_year is required when a forecast is given")
            })?;
            Some(ForecastMembers {
                year,
                members: contiguous_slice(arr)?.to_vec(),
            })
        }
        None => None,
    };

    let mut options = VerificationOptions::default()
        .with_detrend(detrend)
        .with_conf_level(conf_level);
    options.year_target = year_target;
    options.score_threshold = score_threshold;

    let skill = verify_yearly(&hc, &obs, forecast.as_ref(), &options).map_err(to_py_err)?;
    TercileResult::from_skill(py, &skill)
}

pub fn register(parent: &Bound<'_, PyModule>) -> PyResult<()> {
    let m = PyModule::new(parent.py(), "tercile")?;
    m.add_function(wrap_pyfunction!(verify, &m)?)?;
    m.add_class::<TercileResult>()?;
    m.add_class::<Probabilities>()?;
    m.add_class::<ReferenceProbabilities>()?;
    parent.add_submodule(&m)?;
    Ok(())
}
