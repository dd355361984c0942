//! Equalizer configuration, effect metadata and control-path validation

use thiserror::Error;

use super::coefficients::{DEFAULT_HIGH_CUTOFF_HZ, DEFAULT_LOW_CUTOFF_HZ};
use super::gain::GainConfiguration;
use super::splitter::Band;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EqError {
    #[error("Sample rate must be positive and finite (got {0} Hz)")]
    InvalidSampleRate(f32),

    #[error("{band} cutoff {cutoff_hz} Hz is outside the stable range (0, {nyquist_hz}) Hz")]
    CutoffOutOfRange {
        band: Band,
        cutoff_hz: f32,
        nyquist_hz: f32,
    },

    #[error("Gain for the {band} band is not a number")]
    InvalidGain { band: Band },
}

/// Equalizer configuration supplied at construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EqConfig {
    /// Crossover between the low and mid bands (Hz)
    pub low_cutoff_hz: f32,

    /// Crossover between the mid and high bands (Hz)
    pub high_cutoff_hz: f32,

    /// Band gains in dB
    pub gains: GainConfiguration,
}

impl Default for EqConfig {
    fn default() -> Self {
        Self {
            low_cutoff_hz: DEFAULT_LOW_CUTOFF_HZ,
            high_cutoff_hz: DEFAULT_HIGH_CUTOFF_HZ,
            gains: GainConfiguration::flat(),
        }
    }
}

impl EqConfig {
    /// Default crossovers with the given gains
    pub fn with_gains(gains: GainConfiguration) -> Self {
        Self {
            gains,
            ..Self::default()
        }
    }

    /// Check that this configuration keeps the cascades stable at `sample_rate`
    ///
    /// The audio path never calls this. Hosts that want to reject bad
    /// settings before they reach the core do.
    pub fn validate(&self, sample_rate: f32) -> Result<(), EqError> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(EqError::InvalidSampleRate(sample_rate));
        }

        let nyquist_hz = sample_rate / 2.0;
        for (band, cutoff_hz) in [(Band::Low, self.low_cutoff_hz), (Band::High, self.high_cutoff_hz)] {
            if !(cutoff_hz > 0.0 && cutoff_hz < nyquist_hz) {
                return Err(EqError::CutoffOutOfRange {
                    band,
                    cutoff_hz,
                    nyquist_hz,
                });
            }
        }

        self.gains.validate()
    }
}

/// Identity and metadata a host integration registers the effect under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectDescriptor {
    pub name: String,
    pub vendor: String,
    pub url: String,
    pub email: String,
    pub category: String,
    pub version: String,
    /// 128-bit class identifier as four 32-bit words
    pub class_id: [u32; 4],
    pub input_channels: usize,
    pub output_channels: usize,
}

impl Default for EffectDescriptor {
    fn default() -> Self {
        Self {
            name: "3BandEQ".to_string(),
            vendor: "Zikitaka".to_string(),
            url: "https://github.com/zikitaka".to_string(),
            email: "mailto:zikitaka@example.com".to_string(),
            category: "Fx".to_string(),
            version: "1.0.0".to_string(),
            class_id: [0x1234_5678, 0x1234, 0x5678, 0x9abc],
            input_channels: 2,
            output_channels: 2,
        }
    }
}
