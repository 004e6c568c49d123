//! Shared types used across the firmware
//!
//! This module defines domain-specific types that enforce invariants
//! and provide type safety throughout the codebase.

use crate::config::{
    adc, HIGH_BAND_MAX_MHZ, HIGH_BAND_MIN_MHZ, LOW_BAND_MAX_MHZ, LOW_BAND_MIN_MHZ,
};

/// Frequency in whole megahertz (0 marks a disabled band)
pub type Mhz = u16;

/// One of the two VCO chains
///
/// The high band chain is fed by the synthesizer RF stage, the low band
/// chain by its IF stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VcoBand {
    /// High band VCO (1225 - 2715 MHz)
    High,
    /// Low band VCO (345 - 1350 MHz)
    Low,
}

impl VcoBand {
    /// Both bands in calibration order
    pub const ALL: [Self; 2] = [Self::High, Self::Low];

    /// Lowest reachable frequency
    #[must_use]
    pub const fn min_mhz(self) -> Mhz {
        match self {
            Self::High => HIGH_BAND_MIN_MHZ,
            Self::Low => LOW_BAND_MIN_MHZ,
        }
    }

    /// Highest reachable frequency
    #[must_use]
    pub const fn max_mhz(self) -> Mhz {
        match self {
            Self::High => HIGH_BAND_MAX_MHZ,
            Self::Low => LOW_BAND_MAX_MHZ,
        }
    }

    /// Check if a frequency lies inside this band
    #[must_use]
    pub const fn contains(self, mhz: Mhz) -> bool {
        mhz >= self.min_mhz() && mhz <= self.max_mhz()
    }

    /// ADC channel carrying this chain's analog lock strength
    #[must_use]
    pub const fn lock_strength_channel(self) -> u8 {
        match self {
            Self::High => adc::HIGH_BAND_LOCK_STRENGTH,
            Self::Low => adc::LOW_BAND_LOCK_STRENGTH,
        }
    }

    /// Array slot used by per-band tables
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::High => 0,
            Self::Low => 1,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for VcoBand {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::High => defmt::write!(f, "HIGH"),
            Self::Low => defmt::write!(f, "LOW"),
        }
    }
}

/// Dual-modulus prescaler setting of the synthesizer feedback path
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Prescaler {
    /// 8/9 prescaler
    #[default]
    Eight,
    /// 16/17 prescaler
    Sixteen,
}

impl Prescaler {
    /// Preset modulus P
    #[must_use]
    pub const fn modulus(self) -> u16 {
        match self {
            Self::Eight => 8,
            Self::Sixteen => 16,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Prescaler {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}/{}", self.modulus(), self.modulus() + 1);
    }
}

/// Outcome of calibrating one VCO chain
///
/// `{0, 0}` means the chain has never been tuned (or tuning failed).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TuningResult {
    /// Tuning voltage PWM duty (0-4095)
    pub dc_offset: u16,
    /// Bandwidth potentiometer value (0-255)
    pub bandwidth: u8,
}

impl TuningResult {
    /// The untuned sentinel
    pub const UNTUNED: Self = Self {
        dc_offset: 0,
        bandwidth: 0,
    };

    /// Create a tuning result
    #[must_use]
    pub const fn new(dc_offset: u16, bandwidth: u8) -> Self {
        Self {
            dc_offset,
            bandwidth,
        }
    }

    /// Check for the untuned sentinel
    #[must_use]
    pub const fn is_untuned(self) -> bool {
        self.dc_offset == 0 && self.bandwidth == 0
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for TuningResult {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "({}, {})", self.dc_offset, self.bandwidth);
    }
}

/// Frequency range and calibration of one band within a program
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct BandSettings {
    /// Sweep start in MHz (0 = band off)
    pub start: Mhz,
    /// Sweep end in MHz
    pub end: Mhz,
    /// Calibration result
    pub tuning: TuningResult,
}

impl BandSettings {
    /// A switched-off band
    pub const OFF: Self = Self {
        start: 0,
        end: 0,
        tuning: TuningResult::UNTUNED,
    };

    /// Create an untuned band covering `start..=end`
    #[must_use]
    pub const fn new(start: Mhz, end: Mhz) -> Self {
        Self {
            start,
            end,
            tuning: TuningResult::UNTUNED,
        }
    }

    /// Band is on iff it has a start frequency
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.start != 0
    }

    /// Band has both ends of a range and can be calibrated
    #[must_use]
    pub const fn is_tunable(&self) -> bool {
        self.start != 0 && self.end != 0
    }

    /// Range ordered as `(min, max)`
    #[must_use]
    pub const fn span(&self) -> (Mhz, Mhz) {
        if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        }
    }

    /// Center of the range (floor)
    #[must_use]
    pub const fn center(&self) -> Mhz {
        let (min, max) = self.span();
        ((min as u32 + max as u32) / 2) as Mhz
    }
}

/// A stored jammer program: one range per VCO chain plus calibration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct JammerProgram {
    /// High band chain
    pub high: BandSettings,
    /// Low band chain
    pub low: BandSettings,
}

impl JammerProgram {
    /// Create an untuned program from two band ranges
    #[must_use]
    pub const fn new(high: BandSettings, low: BandSettings) -> Self {
        Self { high, low }
    }

    /// Settings of one band
    #[must_use]
    pub const fn band(&self, band: VcoBand) -> &BandSettings {
        match band {
            VcoBand::High => &self.high,
            VcoBand::Low => &self.low,
        }
    }

    /// Mutable settings of one band
    pub fn band_mut(&mut self, band: VcoBand) -> &mut BandSettings {
        match band {
            VcoBand::High => &mut self.high,
            VcoBand::Low => &mut self.low,
        }
    }

    /// At least one band is switched on
    #[must_use]
    pub const fn has_enabled_band(&self) -> bool {
        self.high.is_enabled() || self.low.is_enabled()
    }

    /// Neither band carries a calibration
    #[must_use]
    pub const fn is_untuned(&self) -> bool {
        self.high.tuning.is_untuned() && self.low.tuning.is_untuned()
    }

    /// Copy with both calibrations cleared
    #[must_use]
    pub const fn without_tuning(mut self) -> Self {
        self.high.tuning = TuningResult::UNTUNED;
        self.low.tuning = TuningResult::UNTUNED;
        self
    }
}
