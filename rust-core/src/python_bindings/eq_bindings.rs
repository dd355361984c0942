//! Python bindings for the equalizer core

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use numpy::{PyArray1, PyReadonlyArray1};
use crate::eq::{AudioEffectCore, Band, EqConfig, EqError, GainConfiguration, ThreeBandEq};

pub(crate) fn parse_band(name: &str) -> PyResult<Band> {
    Band::from_name(name).ok_or_else(|| {
        PyValueError::new_err(format!("Unknown band '{}' (expected low, mid or high)", name))
    })
}

pub(crate) fn eq_error(err: EqError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Three-band equalizer exposed to Python
#[pyclass(name = "ThreeBandEq")]
pub struct PyThreeBandEq {
    eq: ThreeBandEq,
}

#[pymethods]
impl PyThreeBandEq {
    /// Create a new equalizer
    ///
    /// Args:
    ///     sample_rate: Sample rate in Hz
    ///     low_cutoff: Low/mid crossover in Hz
    ///     high_cutoff: Mid/high crossover in Hz
    ///     low_db, mid_db, high_db: Band gains in dB
    ///
    /// Raises:
    ///     ValueError: if a cutoff is not below Nyquist or the sample rate is invalid
    #[new]
    #[pyo3(signature = (sample_rate=48000.0, low_cutoff=800.0, high_cutoff=5000.0, low_db=0.0, mid_db=0.0, high_db=0.0))]
    fn new(
        sample_rate: f32,
        low_cutoff: f32,
        high_cutoff: f32,
        low_db: f32,
        mid_db: f32,
        high_db: f32,
    ) -> PyResult<Self> {
        let config = EqConfig {
            low_cutoff_hz: low_cutoff,
            high_cutoff_hz: high_cutoff,
            gains: GainConfiguration::new(low_db, mid_db, high_db),
        };
        config.validate(sample_rate).map_err(eq_error)?;

        let mut eq = ThreeBandEq::new(config);
        eq.configure(sample_rate);
        Ok(Self { eq })
    }

    /// Process a stereo block
    ///
    /// Args:
    ///     left, right: float32 arrays of equal length
    ///
    /// Returns:
    ///     Tuple of processed (left, right) arrays
    fn process<'py>(
        &mut self,
        py: Python<'py>,
        left: PyReadonlyArray1<f32>,
        right: PyReadonlyArray1<f32>,
    ) -> PyResult<(&'py PyArray1<f32>, &'py PyArray1<f32>)> {
        let left = left.as_slice().map_err(|e| PyValueError::new_err(e.to_string()))?;
        let right = right.as_slice().map_err(|e| PyValueError::new_err(e.to_string()))?;
        if left.len() != right.len() {
            return Err(PyValueError::new_err(format!(
                "Channel lengths differ: {} vs {}",
                left.len(),
                right.len()
            )));
        }

        let n = left.len();
        let mut out_left = vec![0.0; n];
        let mut out_right = vec![0.0; n];
        self.eq.process(&[left, right], &mut [&mut out_left[..], &mut out_right[..]], n);

        Ok((PyArray1::from_vec(py, out_left), PyArray1::from_vec(py, out_right)))
    }

    /// Process a mono block through the first channel's state
    fn process_mono<'py>(
        &mut self,
        py: Python<'py>,
        signal: PyReadonlyArray1<f32>,
    ) -> PyResult<&'py PyArray1<f32>> {
        let mut buffer = signal
            .as_slice()
            .map_err(|e| PyValueError::new_err(e.to_string()))?
            .to_vec();
        self.eq.process_in_place(&mut [&mut buffer[..]]);
        Ok(PyArray1::from_vec(py, buffer))
    }

    /// Set all three band gains in dB
    ///
    /// Raises:
    ///     ValueError: if a gain is NaN
    fn set_gains(&mut self, low_db: f32, mid_db: f32, high_db: f32) -> PyResult<()> {
        let gains = GainConfiguration::new(low_db, mid_db, high_db);
        gains.validate().map_err(eq_error)?;
        self.eq.set_gains(gains);
        Ok(())
    }

    /// Set one band gain ("low", "mid" or "high") in dB
    fn set_gain(&mut self, band: &str, db: f32) -> PyResult<()> {
        let band = parse_band(band)?;
        let mut gains = self.eq.config().gains;
        gains.set(band, db);
        gains.validate().map_err(eq_error)?;
        self.eq.set_gain(band, db);
        Ok(())
    }

    /// Current gains as (low_db, mid_db, high_db)
    fn gains(&self) -> (f32, f32, f32) {
        let gains = self.eq.config().gains;
        (gains.low_db, gains.mid_db, gains.high_db)
    }

    /// Move the crossover frequencies
    fn set_cutoffs(&mut self, low_cutoff: f32, high_cutoff: f32) -> PyResult<()> {
        let config = EqConfig {
            low_cutoff_hz: low_cutoff,
            high_cutoff_hz: high_cutoff,
            ..*self.eq.config()
        };
        config.validate(self.eq.sample_rate()).map_err(eq_error)?;
        self.eq.set_cutoffs(low_cutoff, high_cutoff);
        Ok(())
    }

    /// Change the sample rate (recomputes coefficients)
    fn configure(&mut self, sample_rate: f32) -> PyResult<()> {
        self.eq.config().validate(sample_rate).map_err(eq_error)?;
        self.eq.configure(sample_rate);
        Ok(())
    }

    /// Clear filter memory
    fn reset(&mut self) {
        self.eq.reset();
    }

    /// Filter coefficients as (low, high)
    fn coefficients(&self) -> (f32, f32) {
        let coefs = self.eq.coefficients();
        (coefs.low, coefs.high)
    }

    /// Processing latency in samples
    fn latency(&self) -> usize {
        self.eq.latency_samples()
    }

    #[getter]
    fn sample_rate(&self) -> f32 {
        self.eq.sample_rate()
    }
}
