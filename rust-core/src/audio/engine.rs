//! Live monitoring engine: capture -> three-band EQ -> playback
//!
//! The device callbacks only move frames through ring buffers. A dedicated
//! thread pulls captured frames, runs them through `ThreeBandEq` and pushes
//! the result to the playback buffer. Parameters are published through
//! `EngineParams`, which `process_block` copies once per block.

use crate::audio::{process_block, AudioInput, AudioOutput, AudioRingBuffer, EngineParams, InterleavedDriver};
use crate::audio::input::{list_input_devices, AudioError};
use crate::eq::{AudioEffectCore, Band, EqConfig, GainConfiguration, ThreeBandEq};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Ring buffer capacity in samples (both directions)
pub const RING_CAPACITY: usize = 96000;

/// Frames handed to the EQ per block
pub const BLOCK_FRAMES: usize = 512;

pub struct EqEngine {
    /// Gains, cutoffs and bypass shared with the processing thread
    params: Arc<EngineParams>,

    running: Arc<AtomicBool>,

    audio_input: Option<AudioInput>,

    audio_output: Option<AudioOutput>,

    process_thread: Option<std::thread::JoinHandle<()>>,

    /// Rate negotiated with the capture device (0 until started)
    sample_rate: u32,
}

impl EqEngine {
    pub fn new(config: EqConfig) -> Self {
        Self {
            params: Arc::new(EngineParams::new(config)),
            running: Arc::new(AtomicBool::new(false)),
            audio_input: None,
            audio_output: None,
            process_thread: None,
            sample_rate: 0,
        }
    }

    /// Open the default devices and start processing
    ///
    /// Returns the capture device name.
    pub fn start(&mut self) -> Result<String, AudioError> {
        if self.running.load(Ordering::SeqCst) {
            return Err(AudioError::AlreadyRunning);
        }

        let (in_producer, mut in_consumer) = AudioRingBuffer::new(RING_CAPACITY).split();
        let (mut out_producer, out_consumer) = AudioRingBuffer::new(RING_CAPACITY).split();

        let input = AudioInput::from_default_device(in_producer)?;
        let output = AudioOutput::from_default_device(out_consumer)?;

        let in_info = input.device_info().clone();
        let out_info = output.device_info();
        if in_info.sample_rate != out_info.sample_rate {
            return Err(AudioError::SampleRateMismatch {
                input: in_info.sample_rate,
                output: out_info.sample_rate,
            });
        }
        if in_info.channels != out_info.channels {
            return Err(AudioError::ChannelMismatch {
                input: in_info.channels,
                output: out_info.channels,
            });
        }

        self.sample_rate = in_info.sample_rate;
        let channels = in_info.channels as usize;

        let initial_config = self.params.config();
        if let Err(e) = initial_config.validate(self.sample_rate as f32) {
            log::warn!("Starting with questionable EQ settings: {}", e);
        }

        input.start()?;
        output.start()?;

        self.running.store(true, Ordering::SeqCst);

        let params = Arc::clone(&self.params);
        let running = Arc::clone(&self.running);
        let sample_rate = self.sample_rate as f32;

        let handle = std::thread::spawn(move || {
            let mut eq = ThreeBandEq::new(initial_config);
            eq.configure(sample_rate);
            let mut driver = InterleavedDriver::new(channels, BLOCK_FRAMES);

            let mut in_buffer = vec![0.0; BLOCK_FRAMES * channels];
            let mut out_buffer = vec![0.0; BLOCK_FRAMES * channels];

            while running.load(Ordering::SeqCst) {
                let frames = in_consumer.read_frames(&mut in_buffer, channels);

                if frames == 0 {
                    // Nothing captured yet; avoid spinning
                    std::thread::sleep(std::time::Duration::from_micros(100));
                    continue;
                }

                let n = frames * channels;
                process_block(&mut eq, &mut driver, &params, &in_buffer[..n], &mut out_buffer[..n]);
                out_producer.write_frames(&out_buffer[..n], channels);
            }
        });

        self.process_thread = Some(handle);
        self.audio_input = Some(input);
        self.audio_output = Some(output);

        log::info!(
            "EQ engine started on '{}' ({} Hz, {} channels)",
            in_info.name,
            in_info.sample_rate,
            in_info.channels
        );

        Ok(in_info.name)
    }

    /// Stop processing and release the devices
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);

        if let Some(handle) = self.process_thread.take() {
            let _ = handle.join();
        }

        if let Some(input) = self.audio_input.take() {
            let _ = input.pause();
        }
        if let Some(output) = self.audio_output.take() {
            let _ = output.pause();
            log::info!("EQ engine stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Sample rate of the running session (0 when stopped before first start)
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Current parameter snapshot
    pub fn config(&self) -> EqConfig {
        self.params.config()
    }

    /// Publish a full configuration; picked up at the next block
    pub fn set_config(&self, config: EqConfig) {
        self.params.set_config(config);
    }

    pub fn set_gains(&self, gains: GainConfiguration) {
        self.params.set_gains(gains);
    }

    pub fn set_gain(&self, band: Band, db: f32) {
        self.params.set_gain(band, db);
    }

    /// Pass input straight to output; the EQ keeps tracking the signal
    pub fn set_bypass(&self, bypass: bool) {
        self.params.set_bypass(bypass);
    }

    pub fn is_bypassed(&self) -> bool {
        self.params.is_bypassed()
    }

    /// Names of the available capture devices
    pub fn list_devices() -> Result<Vec<String>, AudioError> {
        list_input_devices().map(|devices| devices.into_iter().map(|d| d.name).collect())
    }
}

impl Default for EqEngine {
    fn default() -> Self {
        Self::new(EqConfig::default())
    }
}

impl Drop for EqEngine {
    fn drop(&mut self) {
        self.stop();
    }
}
