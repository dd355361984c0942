//! PyO3 bindings for Python integration

use pyo3::prelude::*;

mod eq_bindings;
mod analysis_bindings;
#[cfg(feature = "device-io")]
mod engine_bindings;

/// Python module definition
#[pymodule]
fn three_band_eq(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<eq_bindings::PyThreeBandEq>()?;
    m.add_function(wrap_pyfunction!(analysis_bindings::measure_band_response, m)?)?;

    #[cfg(feature = "device-io")]
    m.add_class::<engine_bindings::PyEqEngine>()?;

    Ok(())
}
