use chrono::{Days, NaiveDate};
use numpy::{PyReadonlyArray1, PyReadonlyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use visualizer_core::VerificationError;

/// Map a core error onto `ValueError`.
pub fn to_py_err(err: VerificationError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Validate that a numpy array is C-contiguous and return its slice.
pub fn contiguous_slice<'py>(arr: &'py PyReadonlyArray1<'py, f64>) -> PyResult<&'py [f64]> {
    arr.as_slice()
        .map_err(|_| PyValueError::new_err("array must be C-contiguous"))
}

/// Validate length + contiguity of a numpy array.
pub fn checked_slice<'py>(
    arr: &'py PyReadonlyArray1<'py, f64>,
    expected_len: usize,
    name: &str,
) -> PyResult<&'py [f64]> {
    let slice = contiguous_slice(arr)?;
    if slice.len() != expected_len {
        return Err(PyValueError::new_err(format!(
            "{} must have {} elements, got {}",
            name,
            expected_len,
            slice.len()
        )));
    }
    Ok(slice)
}

/// Copy the rows of a 2-D array, checking the row length.
pub fn checked_rows(
    arr: &PyReadonlyArray2<'_, f64>,
    expected_cols: usize,
    name: &str,
) -> PyResult<Vec<Vec<f64>>> {
    let view = arr.as_array();
    let (n_rows, n_cols) = view.dim();
    if n_rows == 0 {
        return Err(PyValueError::new_err(format!("{name} has no rows")));
    }
    if n_cols != expected_cols {
        return Err(PyValueError::new_err(format!(
            "{} must have {} columns, got {}",
            name, expected_cols, n_cols
        )));
    }
    Ok(view.rows().into_iter().map(|row| row.to_vec()).collect())
}

fn epoch() -> NaiveDate {
    NaiveDate::default()
}

/// Dates from day offsets relative to 1970-01-01.
pub fn dates_from_days(days: &[i64]) -> PyResult<Vec<NaiveDate>> {
    days.iter()
        .map(|&d| {
            let shifted = if d >= 0 {
                epoch().checked_add_days(Days::new(d.unsigned_abs()))
            } else {
                epoch().checked_sub_days(Days::new(d.unsigned_abs()))
            };
            shifted.ok_or_else(|| PyValueError::new_err(format!("day offset {d} out of range")))
        })
        .collect()
}

/// Day offsets relative to 1970-01-01.
pub fn days_from_dates(dates: &[NaiveDate]) -> Vec<i64> {
    dates
        .iter()
        .map(|d| d.signed_duration_since(epoch()).num_days())
        .collect()
}
