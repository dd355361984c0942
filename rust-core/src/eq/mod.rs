//! Three-band equalizer core: band splitting, gains and block processing

pub mod coefficients;
pub mod splitter;
pub mod gain;
pub mod config;
pub mod processor;

pub use coefficients::{one_pole_coefficient, FilterCoefficients};
pub use splitter::{Band, Bands, ChannelFilterState, DENORMAL_BIAS};
pub use gain::{db_to_linear, BandGains, GainConfiguration};
pub use config::{EffectDescriptor, EqConfig, EqError};
pub use processor::{create_effect, AudioEffectCore, ThreeBandEq, CHANNELS};
