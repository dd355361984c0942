//! One-pole coefficient derivation for the band-split cascades
//!
//! Each cascade stage is `y += c * (x - y)`, which has its pole at `1 - c`
//! and is stable for `0 < c < 2`.

use std::f32::consts::PI;

/// Default crossover between the low and mid bands (Hz)
pub const DEFAULT_LOW_CUTOFF_HZ: f32 = 800.0;

/// Default crossover between the mid and high bands (Hz)
pub const DEFAULT_HIGH_CUTOFF_HZ: f32 = 5000.0;

/// Exclusive upper bound of the stable coefficient range
pub const MAX_STABLE_COEFFICIENT: f32 = 2.0;

/// Derive a one-pole coefficient: `2 * sin(π * f / fs)`
///
/// No validation is performed. `sample_rate <= 0` yields a non-finite value
/// and cutoffs at or above Nyquist leave the stable range.
#[inline]
pub fn one_pole_coefficient(sample_rate: f32, cutoff_hz: f32) -> f32 {
    2.0 * (PI * cutoff_hz / sample_rate).sin()
}

/// Coefficient pair shared read-only by every channel during a block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterCoefficients {
    /// Coefficient of the low-band cascade
    pub low: f32,

    /// Coefficient of the cascade whose output is subtracted to form the high band
    pub high: f32,
}

impl FilterCoefficients {
    /// Compute both coefficients for a sample rate and crossover pair
    pub fn new(sample_rate: f32, low_cutoff_hz: f32, high_cutoff_hz: f32) -> Self {
        Self {
            low: one_pole_coefficient(sample_rate, low_cutoff_hz),
            high: one_pole_coefficient(sample_rate, high_cutoff_hz),
        }
    }

    /// Coefficients for the default 800 Hz / 5000 Hz crossovers
    pub fn with_default_cutoffs(sample_rate: f32) -> Self {
        Self::new(sample_rate, DEFAULT_LOW_CUTOFF_HZ, DEFAULT_HIGH_CUTOFF_HZ)
    }

    /// True when both coefficients lie in `(0, 2)`
    ///
    /// A cutoff above Nyquist folds back into this range, so this alone does
    /// not prove the cutoffs were sensible; see `EqConfig::validate`.
    pub fn is_stable(&self) -> bool {
        let in_range = |c: f32| c > 0.0 && c < MAX_STABLE_COEFFICIENT;
        in_range(self.low) && in_range(self.high)
    }
}
