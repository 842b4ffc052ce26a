/// Frozen pyclass exposing each column of a `Columnar` series as a numpy array.
///
/// `from_columns()` moves the column vectors into numpy without copying them
/// again on the Python side.
macro_rules! define_columns_result {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident from $series:ty {
            $($column:ident),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[pyo3::pyclass(frozen)]
        $vis struct $name {
            $(
                #[pyo3(get)]
                pub $column: Py<numpy::PyArray1<f64>>,
            )+
        }

        impl $name {
            pub fn from_columns(py: pyo3::Python<'_>, series: $series) -> Self {
                Self {
                    $($column: numpy::PyArray1::from_vec(py, series.$column).unbind(),)+
                }
            }
        }
    };
}

/// Frozen pyclass with one `f64` attribute per field of a `Columnar` row.
macro_rules! define_row_result {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident from $row:ty {
            $($field:ident),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[pyo3::pyclass(frozen)]
        $vis struct $name {
            $(
                #[pyo3(get)]
                pub $field: f64,
            )+
        }

        impl $name {
            pub fn from_row(row: &$row) -> Self {
                Self {
                    $($field: row.$field,)+
                }
            }
        }
    };
}

/// Dict of numpy arrays keyed by column name, built from `Columnar::columns()`.
///
/// Needs no field list: the names come from the derive.
macro_rules! columns_to_dict {
    ($py:expr, $series:expr) => {{
        let dict = pyo3::types::PyDict::new($py);
        for (name, column) in $series.columns() {
            dict.set_item(name, numpy::PyArray1::from_slice($py, column))?;
        }
        dict
    }};
}
