//! Interleaved block driver
//!
//! Device APIs hand out interleaved buffers while `AudioEffectCore` works on
//! one slice per channel. The driver de-interleaves into scratch buffers
//! allocated up front, runs the effect chunk by chunk and interleaves the
//! result back.

use crate::eq::{AudioEffectCore, CHANNELS};

pub struct InterleavedDriver {
    /// Channels in the interleaved stream
    channels: usize,

    /// Frames processed per effect call
    max_frames: usize,

    /// One scratch buffer per channel the effect owns
    scratch: [Vec<f32>; CHANNELS],
}

impl InterleavedDriver {
    /// Create a driver for a stream with `channels` interleaved channels
    ///
    /// # Arguments
    /// * `channels` - Interleaved channel count of the device stream
    /// * `max_frames` - Chunk size; scratch memory is allocated once for it
    pub fn new(channels: usize, max_frames: usize) -> Self {
        let max_frames = max_frames.max(1);
        Self {
            channels,
            max_frames,
            scratch: std::array::from_fn(|_| vec![0.0; max_frames]),
        }
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Channels routed through the effect; the rest pass through dry
    pub fn processed_channels(&self) -> usize {
        self.channels.min(CHANNELS)
    }

    /// Run interleaved `input` through `effect` into interleaved `output`
    ///
    /// Returns the number of frames written. Only whole frames present in
    /// both buffers are processed.
    pub fn process<E: AudioEffectCore>(&mut self, effect: &mut E, input: &[f32], output: &mut [f32]) -> usize {
        if self.channels == 0 {
            return 0;
        }

        let channels = self.channels;
        let active = self.processed_channels();
        let total_frames = input.len().min(output.len()) / channels;

        let mut done = 0;
        while done < total_frames {
            let frames = (total_frames - done).min(self.max_frames);
            let start = done * channels;
            let end = start + frames * channels;
            let in_chunk = &input[start..end];
            let out_chunk = &mut output[start..end];

            for (c, buffer) in self.scratch.iter_mut().enumerate().take(active) {
                for (dst, frame) in buffer[..frames].iter_mut().zip(in_chunk.chunks_exact(channels)) {
                    *dst = frame[c];
                }
            }

            {
                let mut buffers = self.scratch.each_mut().map(|b| &mut b[..frames]);
                effect.process_in_place(&mut buffers[..active]);
            }

            for (out_frame, in_frame) in out_chunk.chunks_exact_mut(channels).zip(in_chunk.chunks_exact(channels)) {
                out_frame[active..].copy_from_slice(&in_frame[active..]);
            }
            for (c, buffer) in self.scratch.iter().enumerate().take(active) {
                for (out_frame, &sample) in out_chunk.chunks_exact_mut(channels).zip(&buffer[..frames]) {
                    out_frame[c] = sample;
                }
            }

            done += frames;
        }

        total_frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eq::{EqConfig, GainConfiguration, ThreeBandEq};

    fn interleave(left: &[f32], right: &[f32]) -> Vec<f32> {
        left.iter().zip(right).flat_map(|(&l, &r)| [l, r]).collect()
    }

    #[test]
    fn test_matches_planar_processing() {
        let left: Vec<f32> = (0..1000).map(|n| (n as f32 * 0.05).sin()).collect();
        let right: Vec<f32> = (0..1000).map(|n| (n as f32 * 0.31).cos()).collect();
        let config = EqConfig::with_gains(GainConfiguration::new(3.0, -6.0, 1.5));

        let mut planar = ThreeBandEq::new(config);
        let mut out_l = vec![0.0; 1000];
        let mut out_r = vec![0.0; 1000];
        planar.process(&[&left[..], &right[..]], &mut [&mut out_l[..], &mut out_r[..]], 1000);

        // Chunk size that does not divide the block evenly
        let mut driven = ThreeBandEq::new(config);
        let mut driver = InterleavedDriver::new(2, 96);
        let input = interleave(&left, &right);
        let mut output = vec![0.0; input.len()];
        assert_eq!(driver.process(&mut driven, &input, &mut output), 1000);

        assert_eq!(output, interleave(&out_l, &out_r));
    }

    #[test]
    fn test_mono_stream() {
        let mut eq = ThreeBandEq::default();
        let mut driver = InterleavedDriver::new(1, 64);
        let mut input = vec![0.0; 16];
        input[0] = 1.0;
        let mut output = vec![0.0; 16];

        assert_eq!(driver.process(&mut eq, &input, &mut output), 16);
        assert!((output[3] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_extra_channels_pass_through() {
        let mut eq = ThreeBandEq::default();
        let mut driver = InterleavedDriver::new(4, 32);
        assert_eq!(driver.processed_channels(), 2);

        let input: Vec<f32> = (0..40).map(|n| n as f32).collect();
        let mut output = vec![0.0; 40];
        assert_eq!(driver.process(&mut eq, &input, &mut output), 10);

        for frame in 0..10 {
            assert_eq!(output[frame * 4 + 2], input[frame * 4 + 2]);
            assert_eq!(output[frame * 4 + 3], input[frame * 4 + 3]);
        }
    }

    #[test]
    fn test_partial_frames_ignored() {
        let mut eq = ThreeBandEq::default();
        let mut driver = InterleavedDriver::new(2, 32);
        let input = vec![0.25; 7];
        let mut output = vec![5.0; 7];

        assert_eq!(driver.process(&mut eq, &input, &mut output), 3);
        assert_eq!(output[6], 5.0);
    }
}
