use numpy::{PyArray1, PyReadonlyArray1, PyReadonlyArray2};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::convert::{checked_rows, dates_from_days, days_from_dates, to_py_err};

use visualizer_core::series::Ensemble;
use visualizer_core::temporal::summarize;

/// Per-date ensemble mean, min and max on a gap-filled date axis.
///
/// `dates` are days since 1970-01-01; `members` is members × dates.
#[pyfunction]
fn ensemble_summary<'py>(
    py: Python<'py>,
    dates: PyReadonlyArray1<'py, i64>,
    members: PyReadonlyArray2<'py, f64>,
) -> PyResult<Bound<'py, PyDict>> {
    let days = dates.as_array().to_vec();
    let dates = dates_from_days(&days)?;
    let rows = checked_rows(&members, dates.len(), "members")?;
    let ensemble = Ensemble::from_series(dates, rows).map_err(to_py_err)?;
    let summary = summarize(&ensemble).map_err(to_py_err)?.fill_gaps(None);

    let dict = columns_to_dict!(py, summary.rows);
    dict.set_item("dates", PyArray1::from_vec(py, days_from_dates(&summary.dates)))?;
    Ok(dict)
}

pub fn register(parent: &Bound<'_, PyModule>) -> PyResult<()> {
    let m = PyModule::new(parent.py(), "temporal")?;
    m.add_function(wrap_pyfunction!(ensemble_summary, &m)?)?;
    parent.add_submodule(&m)?;
    Ok(())
}
