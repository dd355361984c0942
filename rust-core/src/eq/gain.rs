//! Decibel gains and band recombination

use super::config::EqError;
use super::splitter::{Band, Bands};

/// Convert decibels to a linear multiplier: `10^(db / 20)`
///
/// `-inf` maps to exactly zero.
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    10.0f32.powf(db / 20.0)
}

/// Per-band gains in decibels, as set from the control path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainConfiguration {
    pub low_db: f32,
    pub mid_db: f32,
    pub high_db: f32,
}

impl Default for GainConfiguration {
    fn default() -> Self {
        Self::flat()
    }
}

impl GainConfiguration {
    /// All bands at 0 dB
    pub const fn flat() -> Self {
        Self {
            low_db: 0.0,
            mid_db: 0.0,
            high_db: 0.0,
        }
    }

    pub const fn new(low_db: f32, mid_db: f32, high_db: f32) -> Self {
        Self { low_db, mid_db, high_db }
    }

    pub fn get(&self, band: Band) -> f32 {
        match band {
            Band::Low => self.low_db,
            Band::Mid => self.mid_db,
            Band::High => self.high_db,
        }
    }

    pub fn set(&mut self, band: Band, db: f32) {
        match band {
            Band::Low => self.low_db = db,
            Band::Mid => self.mid_db = db,
            Band::High => self.high_db = db,
        }
    }

    /// Reject NaN gains; any other value, infinities included, is usable
    pub fn validate(&self) -> Result<(), EqError> {
        match Band::ALL.into_iter().find(|&band| self.get(band).is_nan()) {
            Some(band) => Err(EqError::InvalidGain { band }),
            None => Ok(()),
        }
    }

    /// Linear multipliers, computed once per block
    pub fn linear(&self) -> BandGains {
        BandGains {
            low: db_to_linear(self.low_db),
            mid: db_to_linear(self.mid_db),
            high: db_to_linear(self.high_db),
        }
    }
}

/// Linear per-band multipliers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandGains {
    pub low: f32,
    pub mid: f32,
    pub high: f32,
}

impl BandGains {
    pub const UNITY: Self = Self {
        low: 1.0,
        mid: 1.0,
        high: 1.0,
    };

    /// Scale each band and recombine into one output sample
    #[inline]
    pub fn apply(&self, bands: &Bands) -> f32 {
        bands.low * self.low + bands.mid * self.mid + bands.high * self.high
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_to_linear() {
        assert!((db_to_linear(0.0) - 1.0).abs() < 1e-7);
        assert!((db_to_linear(20.0) - 10.0).abs() < 1e-5);
        assert!((db_to_linear(-20.0) - 0.1).abs() < 1e-7);
        assert!((db_to_linear(6.0) - 1.995_262).abs() < 1e-5);
        assert_eq!(db_to_linear(f32::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_flat_gains_are_unity() {
        assert_eq!(GainConfiguration::default().linear(), BandGains::UNITY);
    }

    #[test]
    fn test_apply_weights_each_band() {
        let bands = Bands {
            low: 1.0,
            mid: 2.0,
            high: 4.0,
        };
        let gains = BandGains {
            low: 0.5,
            mid: 0.25,
            high: 2.0,
        };
        assert!((gains.apply(&bands) - 9.0).abs() < 1e-6);
        assert!((BandGains::UNITY.apply(&bands) - bands.sum()).abs() < 1e-6);
    }

    #[test]
    fn test_set_and_get_by_band() {
        let mut gains = GainConfiguration::flat();
        gains.set(Band::Mid, -3.0);
        gains.set(Band::High, 4.5);
        assert_eq!(gains.get(Band::Low), 0.0);
        assert_eq!(gains.get(Band::Mid), -3.0);
        assert_eq!(gains, GainConfiguration::new(0.0, -3.0, 4.5));
    }

    #[test]
    fn test_validate_rejects_nan_set_after_construction() {
        let mut gains = GainConfiguration::new(f32::NEG_INFINITY, 0.0, 24.0);
        assert_eq!(gains.validate(), Ok(()));

        gains.set(Band::High, f32::NAN);
        assert_eq!(gains.validate(), Err(EqError::InvalidGain { band: Band::High }));
    }
}
