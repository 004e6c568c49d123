//! Peripheral Drivers
//!
//! Bit-banged drivers for the external ICs on the RF board.
//! These provide domain-specific abstractions over the HAL layer.

pub mod ad8402;
pub mod lmx2433;

/// Serial interface errors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegisterError {
    /// Register address not implemented by the chip
    InvalidAddress,
    /// A serial line could not be driven
    Pin,
}

#[cfg(feature = "embedded")]
impl defmt::Format for RegisterError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::InvalidAddress => defmt::write!(f, "invalid address"),
            Self::Pin => defmt::write!(f, "pin error"),
        }
    }
}
