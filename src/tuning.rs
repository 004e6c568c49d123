//! Auto-Tuning Engine
//!
//! Closed-loop calibration of the two VCO chains: a tuning-voltage search
//! that finds the PWM duty centering a VCO on a target frequency, and a
//! bandwidth search that finds the widest sweep amplitude that still keeps
//! the loop locked across the whole range.

pub mod frontend;
pub mod search;

pub use frontend::{BandTuner, Frontend, RfFrontend};
pub use search::BinarySearch;

use crate::drivers::RegisterError;

/// Calibration failures
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TuneError {
    /// Already locked at the lowest tuning voltage: target below the VCO range
    RangeTooHigh,
    /// Still unlocked at the highest tuning voltage: target above the VCO range
    RangeTooLow,
    /// Synthesizer or potentiometer write failed
    Register(RegisterError),
}

impl From<RegisterError> for TuneError {
    fn from(err: RegisterError) -> Self {
        Self::Register(err)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for TuneError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::RangeTooHigh => defmt::write!(f, "range too high"),
            Self::RangeTooLow => defmt::write!(f, "range too low"),
            Self::Register(e) => defmt::write!(f, "register: {}", e),
        }
    }
}

/// Result alias for calibration
pub type TuneResult<T> = Result<T, TuneError>;
