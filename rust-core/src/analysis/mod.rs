//! Frequency-domain measurement of the band split

pub mod fft;
pub mod response;

pub use fft::{AnalysisError, FftEngine};
pub use response::{measure_band_response, BandResponse};
