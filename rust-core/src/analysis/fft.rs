//! FFT engine using realfft for real-valued signals

use num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("FFT size must be at least 2 (got {0})")]
    InvalidFftSize(usize),

    #[error("FFT failed: {0}")]
    Fft(#[from] realfft::FftError),
}

/// Forward FFT with reusable buffers
pub struct FftEngine {
    fft_size: usize,
    r2c: Arc<dyn RealToComplex<f64>>,
    input_buffer: Vec<f64>,
    output_buffer: Vec<Complex<f64>>,
}

impl FftEngine {
    pub fn new(fft_size: usize) -> Result<Self, AnalysisError> {
        if fft_size < 2 {
            return Err(AnalysisError::InvalidFftSize(fft_size));
        }

        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(fft_size);
        let input_buffer = r2c.make_input_vec();
        let output_buffer = r2c.make_output_vec();

        Ok(Self {
            fft_size,
            r2c,
            input_buffer,
            output_buffer,
        })
    }

    /// Magnitude spectrum |X[k]| for k = 0..=fft_size/2
    ///
    /// The signal is truncated or zero-padded to the FFT size.
    pub fn compute_magnitude(&mut self, signal: &[f64]) -> Result<Vec<f64>, AnalysisError> {
        let copy_len = signal.len().min(self.fft_size);
        self.input_buffer[..copy_len].copy_from_slice(&signal[..copy_len]);
        self.input_buffer[copy_len..].fill(0.0);

        self.r2c.process(&mut self.input_buffer, &mut self.output_buffer)?;

        Ok(self.output_buffer.iter().map(|c| c.norm()).collect())
    }

    /// Magnitude spectrum in dB relative to `reference`, floored at -200 dB
    pub fn compute_magnitude_db(&mut self, signal: &[f64], reference: f64) -> Result<Vec<f64>, AnalysisError> {
        let magnitude = self.compute_magnitude(signal)?;
        Ok(magnitude
            .iter()
            .map(|&mag| 20.0 * (mag.max(1e-10) / reference).log10())
            .collect())
    }

    /// Number of bins (fft_size/2 + 1 for a real FFT)
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// Centre frequency of a bin in Hz
    pub fn bin_to_hz(&self, bin: usize, sample_rate: f64) -> f64 {
        bin as f64 * sample_rate / self.fft_size as f64
    }

    /// Bin closest to `hz`, clamped to the valid range
    pub fn hz_to_bin(&self, hz: f64, sample_rate: f64) -> usize {
        let bin = (hz * self.fft_size as f64 / sample_rate).round();
        (bin.max(0.0) as usize).min(self.num_bins() - 1)
    }

    /// Frequency axis in Hz
    pub fn frequency_axis_hz(&self, sample_rate: f64) -> Vec<f64> {
        (0..self.num_bins())
            .map(|bin| self.bin_to_hz(bin, sample_rate))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_fft_impulse_is_flat() {
        let mut fft = FftEngine::new(256).unwrap();
        let mut signal = vec![0.0; 256];
        signal[0] = 1.0;

        let spectrum = fft.compute_magnitude(&signal).unwrap();
        assert_eq!(spectrum.len(), 129);
        assert!(spectrum.iter().all(|&m| (m - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_fft_sine_peak() {
        let mut fft = FftEngine::new(1024).unwrap();
        let sample_rate = 48000.0;
        let freq = 3000.0;
        let signal: Vec<f64> = (0..1024)
            .map(|n| (2.0 * PI * freq * n as f64 / sample_rate).sin())
            .collect();

        let spectrum = fft.compute_magnitude(&signal).unwrap();
        let (peak_bin, _) = spectrum
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .unwrap();

        assert_eq!(peak_bin, fft.hz_to_bin(freq, sample_rate));
    }

    #[test]
    fn test_frequency_axis() {
        let fft = FftEngine::new(1024).unwrap();
        let freqs = fft.frequency_axis_hz(48000.0);

        assert_eq!(freqs.len(), 513);
        assert_eq!(freqs[0], 0.0);
        assert!((freqs[512] - 24000.0).abs() < 1e-9);
        assert_eq!(fft.hz_to_bin(1e9, 48000.0), 512);
    }

    #[test]
    fn test_rejects_tiny_fft() {
        assert!(matches!(FftEngine::new(1), Err(AnalysisError::InvalidFftSize(1))));
    }
}
