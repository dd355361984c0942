//! Block driving and, with the `device-io` feature, live device I/O via cpal

pub mod block;
pub mod buffer;
pub mod driver;
#[cfg(feature = "device-io")]
pub mod input;
#[cfg(feature = "device-io")]
pub mod output;
#[cfg(feature = "device-io")]
pub mod engine;

pub use block::{process_block, EngineParams};
pub use buffer::AudioRingBuffer;
pub use driver::InterleavedDriver;
#[cfg(feature = "device-io")]
pub use input::{AudioError, AudioInput};
#[cfg(feature = "device-io")]
pub use output::AudioOutput;
#[cfg(feature = "device-io")]
pub use engine::EqEngine;
