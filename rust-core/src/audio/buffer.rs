//! Lock-free ring buffer for interleaved audio frames
//!
//! Moves samples between the device callbacks and the EQ thread. Reads and
//! writes on the frame-aware methods always move whole frames so channel
//! alignment survives overruns.

use ringbuf::{HeapConsumer, HeapProducer, HeapRb};

/// Single-producer single-consumer sample queue
pub struct AudioRingBuffer {
    producer: HeapProducer<f32>,
    consumer: HeapConsumer<f32>,
}

impl AudioRingBuffer {
    /// Create a ring buffer holding `capacity` samples
    pub fn new(capacity: usize) -> Self {
        let rb = HeapRb::<f32>::new(capacity);
        let (producer, consumer) = rb.split();

        Self { producer, consumer }
    }

    /// Split into producer and consumer ends
    pub fn split(self) -> (AudioProducer, AudioConsumer) {
        (
            AudioProducer {
                producer: self.producer,
            },
            AudioConsumer {
                consumer: self.consumer,
            },
        )
    }
}

/// Writing end
pub struct AudioProducer {
    producer: HeapProducer<f32>,
}

impl AudioProducer {
    /// Write as many samples as fit; returns the number written
    pub fn write(&mut self, samples: &[f32]) -> usize {
        self.producer.push_slice(samples)
    }

    /// Write whole interleaved frames only; returns the number of frames written
    ///
    /// Frames that do not fit are dropped.
    pub fn write_frames(&mut self, samples: &[f32], channels: usize) -> usize {
        if channels == 0 {
            return 0;
        }
        let frames = (samples.len() / channels).min(self.producer.free_len() / channels);
        self.producer.push_slice(&samples[..frames * channels]) / channels
    }
}

/// Reading end
pub struct AudioConsumer {
    consumer: HeapConsumer<f32>,
}

impl AudioConsumer {
    /// Read up to `buffer.len()` samples; returns the number read
    pub fn read(&mut self, buffer: &mut [f32]) -> usize {
        self.consumer.pop_slice(buffer)
    }

    /// Read whole interleaved frames only; returns the number of frames read
    pub fn read_frames(&mut self, buffer: &mut [f32], channels: usize) -> usize {
        if channels == 0 {
            return 0;
        }
        let frames = (buffer.len() / channels).min(self.consumer.len() / channels);
        self.consumer.pop_slice(&mut buffer[..frames * channels]) / channels
    }

    pub fn len(&self) -> usize {
        self.consumer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.consumer.is_empty()
    }
}
