//! Three-Band EQ - Real-Time Audio Equalizer Core
//!
//! Splits each channel into low, mid and high bands with cascaded one-pole
//! lowpass stages, applies a gain per band and recombines. Optional live
//! device monitoring (`device-io`) and Python bindings (`python`).

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![allow(non_local_definitions)]

pub mod eq;
pub mod audio;
pub mod analysis;
#[cfg(feature = "python")]
pub mod python_bindings;

pub use eq::{AudioEffectCore, EqConfig, GainConfiguration, ThreeBandEq};
pub use analysis::{measure_band_response, BandResponse};
