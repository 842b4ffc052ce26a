use numpy::PyReadonlyArray1;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::convert::{contiguous_slice, to_py_err};

use visualizer_core::metrics;

fn events(observed: &PyReadonlyArray1<'_, f64>) -> PyResult<Vec<bool>> {
    let slice = observed
        .as_slice()
        .map_err(|_| PyValueError::new_err("array must be C-contiguous"))?;
    slice
        .iter()
        .map(|&v| {
            if v == 1.0 {
                Ok(true)
            } else if v == 0.0 {
                Ok(false)
            } else {
                Err(PyValueError::new_err(format!(
                    "observed events must be 0 or 1, got {v}"
                )))
            }
        })
        .collect()
}

/// ROC skill score `2 * AUC - 1` of probabilities against binary events.
#[pyfunction]
fn roc_skill_score<'py>(
    probabilities: PyReadonlyArray1<'py, f64>,
    observed: PyReadonlyArray1<'py, f64>,
) -> PyResult<f64> {
    let probs = contiguous_slice(&probabilities)?;
    metrics::roc_skill_score(probs, &events(&observed)?).map_err(to_py_err)
}

/// ROC area with its one-sided significance test, as a dict.
#[pyfunction]
fn roc_area<'py>(
    py: Python<'py>,
    probabilities: PyReadonlyArray1<'py, f64>,
    observed: PyReadonlyArray1<'py, f64>,
) -> PyResult<Bound<'py, PyDict>> {
    let probs = contiguous_slice(&probabilities)?;
    let roc = metrics::roc_area(probs, &events(&observed)?).map_err(to_py_err)?;
    let dict = PyDict::new(py);
    dict.set_item("auc", roc.auc)?;
    dict.set_item("skill_score", roc.skill_score())?;
    dict.set_item("u_statistic", roc.u_statistic)?;
    dict.set_item("p_value", roc.p_value)?;
    dict.set_item("n_events", roc.n_events)?;
    dict.set_item("n_non_events", roc.n_non_events)?;
    Ok(dict)
}

pub fn register(parent: &Bound<'_, PyModule>) -> PyResult<()> {
    let m = PyModule::new(parent.py(), "metrics")?;
    m.add_function(wrap_pyfunction!(roc_skill_score, &m)?)?;
    m.add_function(wrap_pyfunction!(roc_area, &m)?)?;
    parent.add_submodule(&m)?;
    Ok(())
}
