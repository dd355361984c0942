//! Python bindings for band response measurement

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;
use numpy::PyArray1;
use crate::analysis;
use crate::eq::{EqConfig, GainConfiguration};

/// Measure the magnitude response of each band
///
/// Returns:
///     Dictionary with keys 'frequencies', 'low', 'mid', 'high', 'output'
///     (dB arrays) and 'sample_rate'
#[pyfunction]
#[pyo3(signature = (sample_rate=48000.0, fft_size=4096, low_cutoff=800.0, high_cutoff=5000.0, low_db=0.0, mid_db=0.0, high_db=0.0))]
#[allow(clippy::too_many_arguments)]
pub fn measure_band_response(
    py: Python<'_>,
    sample_rate: f32,
    fft_size: usize,
    low_cutoff: f32,
    high_cutoff: f32,
    low_db: f32,
    mid_db: f32,
    high_db: f32,
) -> PyResult<PyObject> {
    let config = EqConfig {
        low_cutoff_hz: low_cutoff,
        high_cutoff_hz: high_cutoff,
        gains: GainConfiguration::new(low_db, mid_db, high_db),
    };

    let response = analysis::measure_band_response(&config, sample_rate, fft_size)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;

    let dict = PyDict::new(py);
    dict.set_item("frequencies", PyArray1::from_vec(py, response.frequencies_hz))?;
    dict.set_item("low", PyArray1::from_vec(py, response.low_db))?;
    dict.set_item("mid", PyArray1::from_vec(py, response.mid_db))?;
    dict.set_item("high", PyArray1::from_vec(py, response.high_db))?;
    dict.set_item("output", PyArray1::from_vec(py, response.output_db))?;
    dict.set_item("sample_rate", response.sample_rate)?;

    Ok(dict.to_object(py))
}
