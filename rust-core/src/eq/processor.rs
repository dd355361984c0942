//! Three-band equalizer processor
//!
//! The processor owns one `ChannelFilterState` per channel, the coefficient
//! pair derived from the session sample rate and the current configuration.
//! `process` never allocates, locks or fails; everything that can go wrong is
//! a precondition checked (optionally) on the control path.

use super::coefficients::{FilterCoefficients, MAX_STABLE_COEFFICIENT};
use super::config::{EffectDescriptor, EqConfig};
use super::gain::{BandGains, GainConfiguration};
use super::splitter::{Band, ChannelFilterState, DRY_DELAY_SAMPLES};

/// Number of channels with their own filter state
pub const CHANNELS: usize = 2;

/// Sample rate assumed until the host calls `configure`
pub const DEFAULT_SAMPLE_RATE: f32 = 48000.0;

/// Capability a host adapter drives an effect through
pub trait AudioEffectCore {
    /// Session setup or sample-rate change
    fn configure(&mut self, sample_rate: f32);

    /// Process one block
    ///
    /// Writes `num_samples` values into each output channel that has a matching
    /// input. With no inputs or no outputs the call does nothing.
    fn process(&mut self, inputs: &[&[f32]], outputs: &mut [&mut [f32]], num_samples: usize);

    /// Process one block where each buffer is both input and output
    fn process_in_place(&mut self, buffers: &mut [&mut [f32]]);

    /// Clear all per-channel filter memory
    fn reset(&mut self);

    /// Delay between input and output (samples)
    fn latency_samples(&self) -> usize;
}

/// Build an effect instance from plain configuration data
///
/// # Arguments
/// * `descriptor` - Metadata a host registry shows for the effect
/// * `config` - Initial cutoffs and gains
/// * `sample_rate` - Session sample rate in Hz
///
/// # Returns
/// An equalizer already configured for `sample_rate`
pub fn create_effect(descriptor: EffectDescriptor, config: EqConfig, sample_rate: f32) -> ThreeBandEq {
    let mut eq = ThreeBandEq::new(config);
    eq.descriptor = descriptor;
    eq.configure(sample_rate);
    eq
}

/// Real-time three-band equalizer
#[derive(Debug, Clone)]
pub struct ThreeBandEq {
    config: EqConfig,
    descriptor: EffectDescriptor,
    sample_rate: f32,
    coefficients: FilterCoefficients,
    channels: [ChannelFilterState; CHANNELS],
}

impl Default for ThreeBandEq {
    fn default() -> Self {
        Self::new(EqConfig::default())
    }
}

impl ThreeBandEq {
    /// Create an equalizer running at `DEFAULT_SAMPLE_RATE`
    ///
    /// # Arguments
    /// * `config` - Cutoffs and gains; not validated
    ///
    /// # Returns
    /// An equalizer with cleared filter memory; call `configure` once the
    /// host sample rate is known
    pub fn new(config: EqConfig) -> Self {
        Self {
            coefficients: FilterCoefficients::new(
                DEFAULT_SAMPLE_RATE,
                config.low_cutoff_hz,
                config.high_cutoff_hz,
            ),
            config,
            descriptor: EffectDescriptor::default(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            channels: Default::default(),
        }
    }

    pub fn config(&self) -> &EqConfig {
        &self.config
    }

    pub fn descriptor(&self) -> &EffectDescriptor {
        &self.descriptor
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn coefficients(&self) -> FilterCoefficients {
        self.coefficients
    }

    /// Replace the whole configuration; takes effect from the next block
    pub fn set_config(&mut self, config: EqConfig) {
        let cutoffs_changed = config.low_cutoff_hz != self.config.low_cutoff_hz
            || config.high_cutoff_hz != self.config.high_cutoff_hz;
        self.config = config;
        if cutoffs_changed {
            self.update_coefficients();
        }
    }

    pub fn set_gains(&mut self, gains: GainConfiguration) {
        self.config.gains = gains;
    }

    pub fn set_gain(&mut self, band: Band, db: f32) {
        self.config.gains.set(band, db);
    }

    /// Move the crossovers and recompute the coefficients
    pub fn set_cutoffs(&mut self, low_cutoff_hz: f32, high_cutoff_hz: f32) {
        self.config.low_cutoff_hz = low_cutoff_hz;
        self.config.high_cutoff_hz = high_cutoff_hz;
        self.update_coefficients();
    }

    fn update_coefficients(&mut self) {
        self.coefficients = FilterCoefficients::new(
            self.sample_rate,
            self.config.low_cutoff_hz,
            self.config.high_cutoff_hz,
        );

        log::debug!(
            "coefficients at {} Hz: low {:.6} ({} Hz), high {:.6} ({} Hz)",
            self.sample_rate,
            self.coefficients.low,
            self.config.low_cutoff_hz,
            self.coefficients.high,
            self.config.high_cutoff_hz,
        );

        // Not clamped: an out-of-range cutoff is passed through unchanged
        let nyquist = self.sample_rate / 2.0;
        for (band, cutoff) in [(Band::Low, self.config.low_cutoff_hz), (Band::High, self.config.high_cutoff_hz)] {
            if cutoff >= nyquist {
                log::warn!(
                    "{} cutoff {} Hz is at or above Nyquist ({} Hz); cascade may be unstable",
                    band,
                    cutoff,
                    nyquist
                );
            }
        }
        if !self.coefficients.is_stable() {
            log::warn!(
                "coefficients ({}, {}) outside (0, {})",
                self.coefficients.low,
                self.coefficients.high,
                MAX_STABLE_COEFFICIENT
            );
        }
    }
}

/// Run one channel's samples through split -> gain -> recombine
#[inline]
fn process_channel(
    state: &mut ChannelFilterState,
    input: &[f32],
    output: &mut [f32],
    coefficients: &FilterCoefficients,
    gains: &BandGains,
) {
    for (out, &x) in output.iter_mut().zip(input) {
        let bands = state.split(x, coefficients);
        *out = gains.apply(&bands);
    }
}

impl AudioEffectCore for ThreeBandEq {
    fn configure(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.update_coefficients();
    }

    fn process(&mut self, inputs: &[&[f32]], outputs: &mut [&mut [f32]], num_samples: usize) {
        if inputs.is_empty() || outputs.is_empty() || num_samples == 0 {
            return;
        }

        // Snapshot for the whole block
        let coefficients = self.coefficients;
        let gains = self.config.gains.linear();

        for ((state, input), output) in self.channels.iter_mut().zip(inputs).zip(outputs.iter_mut()) {
            let len = num_samples.min(input.len()).min(output.len());
            process_channel(state, &input[..len], &mut output[..len], &coefficients, &gains);
        }
    }

    fn process_in_place(&mut self, buffers: &mut [&mut [f32]]) {
        let coefficients = self.coefficients;
        let gains = self.config.gains.linear();

        for (state, buffer) in self.channels.iter_mut().zip(buffers.iter_mut()) {
            for sample in buffer.iter_mut() {
                let bands = state.split(*sample, &coefficients);
                *sample = gains.apply(&bands);
            }
        }
    }

    fn reset(&mut self) {
        for state in self.channels.iter_mut() {
            state.reset();
        }
    }

    fn latency_samples(&self) -> usize {
        DRY_DELAY_SAMPLES
    }
}
