//! Per-block processing for the live engine
//!
//! `EngineParams` is what the control side publishes; `process_block` is one
//! iteration of the processing thread. Neither touches a device, so both are
//! available without the `device-io` feature.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use super::driver::InterleavedDriver;
use crate::eq::{Band, EqConfig, GainConfiguration, ThreeBandEq};

/// Parameters shared between the control side and the processing thread
#[derive(Debug, Default)]
pub struct EngineParams {
    config: Mutex<EqConfig>,

    /// Copy input to output untouched
    bypass: AtomicBool,
}

impl EngineParams {
    pub fn new(config: EqConfig) -> Self {
        Self {
            config: Mutex::new(config),
            bypass: AtomicBool::new(false),
        }
    }

    // A panicked writer cannot leave a half-written `EqConfig` (it is `Copy`)
    fn lock(&self) -> MutexGuard<'_, EqConfig> {
        self.config.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current parameter snapshot
    pub fn config(&self) -> EqConfig {
        *self.lock()
    }

    /// Publish a full configuration; picked up at the next block
    pub fn set_config(&self, config: EqConfig) {
        *self.lock() = config;
    }

    pub fn set_gains(&self, gains: GainConfiguration) {
        self.lock().gains = gains;
    }

    pub fn set_gain(&self, band: Band, db: f32) {
        self.lock().gains.set(band, db);
    }

    pub fn set_bypass(&self, bypass: bool) {
        self.bypass.store(bypass, Ordering::SeqCst);
    }

    pub fn is_bypassed(&self) -> bool {
        self.bypass.load(Ordering::SeqCst)
    }
}

/// Run one interleaved block through the EQ with the published parameters
///
/// The configuration is copied once, before any sample is processed. While
/// bypassed the EQ still runs so its filter memory follows the signal, and
/// its output is replaced by the input.
///
/// # Arguments
/// * `eq` - Equalizer owned by the processing thread
/// * `driver` - Interleaved adapter sized for the device stream
/// * `params` - Parameters published by the control side
/// * `input` - Captured interleaved samples
/// * `output` - Interleaved samples for playback
///
/// # Returns
/// Number of frames written to `output`
pub fn process_block(
    eq: &mut ThreeBandEq,
    driver: &mut InterleavedDriver,
    params: &EngineParams,
    input: &[f32],
    output: &mut [f32],
) -> usize {
    // Parameters are fixed for the whole block
    eq.set_config(params.config());

    let frames = driver.process(eq, input, output);

    if params.is_bypassed() {
        let n = frames * driver.channels();
        output[..n].copy_from_slice(&input[..n]);
    }

    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eq::splitter::DRY_DELAY_SAMPLES;

    fn stereo_noise(frames: usize, mut seed: u32) -> Vec<f32> {
        (0..frames * 2)
            .map(|_| {
                seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                (seed >> 8) as f32 / (1u32 << 24) as f32 * 2.0 - 1.0
            })
            .collect()
    }

    #[test]
    fn test_bypass_copies_input() {
        let params = EngineParams::new(EqConfig::with_gains(GainConfiguration::new(12.0, -6.0, 3.0)));
        params.set_bypass(true);

        let mut eq = ThreeBandEq::default();
        let mut driver = InterleavedDriver::new(2, 128);
        let input = stereo_noise(300, 4);
        let mut output = vec![0.0; input.len()];

        assert_eq!(process_block(&mut eq, &mut driver, &params, &input, &mut output), 300);
        assert_eq!(output, input);
    }

    #[test]
    fn test_leaving_bypass_has_no_stale_state() {
        let params = EngineParams::new(EqConfig::with_gains(GainConfiguration::new(6.0, 0.0, -6.0)));
        let first = stereo_noise(256, 1);
        let second = stereo_noise(256, 2);

        let mut reference_eq = ThreeBandEq::default();
        let mut reference_driver = InterleavedDriver::new(2, 64);
        let mut expected = vec![0.0; first.len()];
        process_block(&mut reference_eq, &mut reference_driver, &params, &first, &mut expected);
        process_block(&mut reference_eq, &mut reference_driver, &params, &second, &mut expected);

        let mut eq = ThreeBandEq::default();
        let mut driver = InterleavedDriver::new(2, 64);
        let mut output = vec![0.0; first.len()];
        params.set_bypass(true);
        process_block(&mut eq, &mut driver, &params, &first, &mut output);
        params.set_bypass(false);
        process_block(&mut eq, &mut driver, &params, &second, &mut output);

        assert_eq!(output, expected);
    }

    #[test]
    fn test_published_gains_apply_from_next_block() {
        let params = EngineParams::default();
        let mut eq = ThreeBandEq::default();
        let mut driver = InterleavedDriver::new(2, 512);

        let mut impulse = vec![0.0; 32];
        impulse[0] = 1.0;
        let mut first = vec![0.0; 32];
        process_block(&mut eq, &mut driver, &params, &impulse, &mut first);

        params.set_gains(GainConfiguration::new(-200.0, -200.0, -200.0));

        // The block already processed keeps the flat gains
        assert!((first[DRY_DELAY_SAMPLES * 2] - 1.0).abs() < 1e-6);
        assert_eq!(eq.config().gains, GainConfiguration::flat());

        let loud = vec![0.9; 64];
        let mut second = vec![0.0; 64];
        process_block(&mut eq, &mut driver, &params, &loud, &mut second);

        assert_eq!(eq.config().gains, GainConfiguration::new(-200.0, -200.0, -200.0));
        assert!(second.iter().all(|y| y.abs() < 1e-6));
    }

    #[test]
    fn test_params_setters() {
        let params = EngineParams::default();
        assert!(!params.is_bypassed());

        params.set_gain(Band::Low, 4.0);
        params.set_bypass(true);
        assert_eq!(params.config().gains.low_db, 4.0);
        assert!(params.is_bypassed());

        let config = EqConfig {
            low_cutoff_hz: 300.0,
            ..EqConfig::default()
        };
        params.set_config(config);
        assert_eq!(params.config(), config);
    }
}
