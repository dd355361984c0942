//! Python bindings for the live monitoring engine

use pyo3::exceptions::PyRuntimeError;
use pyo3::prelude::*;
use crate::audio::EqEngine;
use crate::eq::GainConfiguration;
use super::eq_bindings::{eq_error, parse_band};

/// Live capture -> EQ -> playback engine exposed to Python
///
/// WARNING: use headphones to avoid a feedback loop.
#[pyclass(name = "EqEngine", unsendable)]
pub struct PyEqEngine {
    engine: EqEngine,
}

#[pymethods]
impl PyEqEngine {
    #[new]
    fn new() -> Self {
        Self {
            engine: EqEngine::default(),
        }
    }

    /// Start capture and playback on the default devices
    ///
    /// Returns:
    ///     Capture device name
    fn start(&mut self) -> PyResult<String> {
        self.engine
            .start()
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    fn stop(&mut self) {
        self.engine.stop();
    }

    fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    fn sample_rate(&self) -> u32 {
        self.engine.sample_rate()
    }

    /// Set all three band gains in dB (applied from the next block)
    fn set_gains(&self, low_db: f32, mid_db: f32, high_db: f32) -> PyResult<()> {
        let gains = GainConfiguration::new(low_db, mid_db, high_db);
        gains.validate().map_err(eq_error)?;
        self.engine.set_gains(gains);
        Ok(())
    }

    /// Set one band gain ("low", "mid" or "high") in dB
    fn set_gain(&self, band: &str, db: f32) -> PyResult<()> {
        let band = parse_band(band)?;
        let mut gains = self.engine.config().gains;
        gains.set(band, db);
        gains.validate().map_err(eq_error)?;
        self.engine.set_gain(band, db);
        Ok(())
    }

    fn set_bypass(&self, bypass: bool) {
        self.engine.set_bypass(bypass);
    }

    /// List available capture devices
    #[staticmethod]
    fn list_devices() -> PyResult<Vec<String>> {
        EqEngine::list_devices().map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }
}
