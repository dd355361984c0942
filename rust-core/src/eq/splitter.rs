//! Per-channel band splitting with cascaded one-pole lowpass stages
//!
//! Two 4-stage cascades run side by side on every input sample. The low band
//! is the output of the first cascade; the high band is the dry signal,
//! delayed by three samples to line up with the cascades, minus the output of
//! the second cascade. The mid band is whatever remains, so the three bands
//! always sum back to the delayed input.

use std::fmt;

use super::coefficients::FilterCoefficients;

/// Number of one-pole stages in each cascade
pub const CASCADE_STAGES: usize = 4;

/// Length of the dry-signal delay line (samples)
pub const DRY_DELAY_SAMPLES: usize = 3;

/// Bias added to the first low-band stage to keep its state out of the
/// subnormal range during silence
pub const DENORMAL_BIAS: f32 = 1.0 / 4_294_967_295.0;

/// One of the three frequency bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    Low,
    Mid,
    High,
}

impl Band {
    pub const ALL: [Band; 3] = [Band::Low, Band::Mid, Band::High];

    pub fn name(&self) -> &'static str {
        match self {
            Band::Low => "low",
            Band::Mid => "mid",
            Band::High => "high",
        }
    }

    /// Parse a band name as used by the bindings ("low", "mid", "high")
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "low" => Some(Band::Low),
            "mid" => Some(Band::Mid),
            "high" => Some(Band::High),
            _ => None,
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Band values produced from one input sample
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bands {
    pub low: f32,
    pub mid: f32,
    pub high: f32,
}

impl Bands {
    /// Unweighted recombination, equal to the 3-sample-delayed input
    #[inline]
    pub fn sum(&self) -> f32 {
        self.low + self.mid + self.high
    }
}

/// Filter memory owned by one audio channel
///
/// Holds the eight cascade cells and the three dry delay cells. The cells are
/// private: the only way to change them is `split` (or `reset`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelFilterState {
    low_stages: [f32; CASCADE_STAGES],
    high_stages: [f32; CASCADE_STAGES],
    /// `dry[0]` is the previous input, `dry[2]` the input three samples ago
    dry: [f32; DRY_DELAY_SAMPLES],
}

impl ChannelFilterState {
    /// Create a state with every cell at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Split one input sample into bands and advance the state
    ///
    /// Must be called with the channel's samples in time order.
    #[inline]
    pub fn split(&mut self, input: f32, coefficients: &FilterCoefficients) -> Bands {
        let low = run_cascade(&mut self.low_stages, input, coefficients.low, DENORMAL_BIAS);
        let high_lowpass = run_cascade(&mut self.high_stages, input, coefficients.high, 0.0);

        let delayed = self.dry[DRY_DELAY_SAMPLES - 1];
        let high = delayed - high_lowpass;
        let mid = delayed - (low + high);

        self.dry = [input, self.dry[0], self.dry[1]];

        Bands { low, mid, high }
    }

    /// Clear all cascade and delay cells
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// True when every cell holds a finite value
    pub fn is_finite(&self) -> bool {
        self.low_stages
            .iter()
            .chain(self.high_stages.iter())
            .chain(self.dry.iter())
            .all(|v| v.is_finite())
    }
}

/// Run one sample through a cascade of one-pole lowpass stages
///
/// `bias` is added to the first stage only. Returns the last stage's value.
#[inline(always)]
fn run_cascade(stages: &mut [f32; CASCADE_STAGES], input: f32, coef: f32, bias: f32) -> f32 {
    stages[0] += coef * (input - stages[0]) + bias;
    for i in 1..CASCADE_STAGES {
        stages[i] += coef * (stages[i - 1] - stages[i]);
    }
    stages[CASCADE_STAGES - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coefs() -> FilterCoefficients {
        FilterCoefficients::with_default_cutoffs(48000.0)
    }

    /// Deterministic broadband test signal
    fn test_signal(len: usize) -> Vec<f32> {
        let mut seed: u32 = 0x1234_5678;
        (0..len)
            .map(|n| {
                seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                let noise = (seed >> 8) as f32 / (1u32 << 24) as f32 - 0.5;
                let tone = (2.0 * std::f32::consts::PI * 440.0 * n as f32 / 48000.0).sin();
                0.5 * tone + noise
            })
            .collect()
    }

    #[test]
    fn test_band_sum_equals_delayed_input() {
        let mut state = ChannelFilterState::new();
        let coefs = coefs();
        let input = test_signal(4096);

        for (i, &x) in input.iter().enumerate() {
            let bands = state.split(x, &coefs);
            let expected = if i >= DRY_DELAY_SAMPLES { input[i - DRY_DELAY_SAMPLES] } else { 0.0 };
            assert!(
                (bands.sum() - expected).abs() < 1e-5,
                "mismatch at {}: {} vs {}",
                i,
                bands.sum(),
                expected
            );
        }
    }

    #[test]
    fn test_band_sum_holds_for_other_coefficients() {
        let input = test_signal(1024);
        for &(low, high) in &[(0.01, 0.5), (0.3, 1.0), (0.8, 1.2), (0.05, 0.05)] {
            let coefs = FilterCoefficients { low, high };
            let mut state = ChannelFilterState::new();
            for (i, &x) in input.iter().enumerate() {
                let bands = state.split(x, &coefs);
                if i >= DRY_DELAY_SAMPLES {
                    assert!((bands.sum() - input[i - DRY_DELAY_SAMPLES]).abs() < 1e-4);
                }
            }
        }
    }

    #[test]
    fn test_dc_settles_into_low_band() {
        let mut state = ChannelFilterState::new();
        let coefs = coefs();
        let mut bands = Bands::default();
        for _ in 0..5000 {
            bands = state.split(1.0, &coefs);
        }
        assert!((bands.low - 1.0).abs() < 1e-4);
        assert!(bands.mid.abs() < 1e-4);
        assert!(bands.high.abs() < 1e-4);
    }

    #[test]
    fn test_silence_bias_stays_bounded() {
        let mut state = ChannelFilterState::new();
        let coefs = coefs();
        let mut bands = Bands::default();
        for _ in 0..20000 {
            bands = state.split(0.0, &coefs);
        }

        // Low cascade settles at bias / coefficient instead of drifting
        let settled = DENORMAL_BIAS / coefs.low;
        assert!(bands.low > 0.0);
        assert!((bands.low - settled).abs() < settled * 1e-3);
        assert!(bands.sum().abs() < 1e-7);
        assert!(state.is_finite());
    }

    #[test]
    fn test_bias_only_on_low_cascade() {
        let mut state = ChannelFilterState::new();
        state.split(0.0, &coefs());
        assert!(state.low_stages[0] > 0.0);
        assert_eq!(state.high_stages, [0.0; CASCADE_STAGES]);
    }

    #[test]
    fn test_dry_delay_line_shifts() {
        let mut state = ChannelFilterState::new();
        let coefs = coefs();
        state.split(1.0, &coefs);
        state.split(2.0, &coefs);
        state.split(3.0, &coefs);
        assert_eq!(state.dry, [3.0, 2.0, 1.0]);
        state.split(4.0, &coefs);
        assert_eq!(state.dry, [4.0, 3.0, 2.0]);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut state = ChannelFilterState::new();
        let coefs = coefs();
        for &x in &test_signal(64) {
            state.split(x, &coefs);
        }
        state.reset();
        assert_eq!(state, ChannelFilterState::new());
    }

    #[test]
    fn test_band_names_roundtrip() {
        for band in Band::ALL {
            assert_eq!(Band::from_name(band.name()), Some(band));
        }
        assert_eq!(Band::from_name("HIGH"), Some(Band::High));
        assert_eq!(Band::from_name("treble"), None);
    }
}
