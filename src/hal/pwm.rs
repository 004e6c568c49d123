//! Tuning-Voltage Generator
//!
//! Two PWM duty channels, one per VCO, filtered into the analog tuning
//! voltage. Duties are kept in `0..=max_duty`.

use crate::types::VcoBand;

/// A PWM peripheral with one duty register per VCO band
pub trait DutyOutput {
    /// Write a raw duty value (already clamped)
    fn set_duty(&mut self, band: VcoBand, duty: u16);
}

/// Tuning voltage generator for both VCOs
#[derive(Debug)]
pub struct TuningVoltage<P> {
    out: P,
    max_duty: u16,
    duty: [u16; 2],
}

impl<P: DutyOutput> TuningVoltage<P> {
    /// Create the generator with both channels at zero
    pub fn new(mut out: P, max_duty: u16) -> Self {
        for band in VcoBand::ALL {
            out.set_duty(band, 0);
        }
        Self {
            out,
            max_duty,
            duty: [0; 2],
        }
    }

    /// Set a channel, clamping to full scale; returns the applied duty
    pub fn set(&mut self, band: VcoBand, duty: u16) -> u16 {
        let duty = duty.min(self.max_duty);
        self.out.set_duty(band, duty);
        self.duty[band.index()] = duty;
        duty
    }

    /// Move a channel by a signed step, saturating at both ends
    pub fn adjust(&mut self, band: VcoBand, delta: i32) -> u16 {
        let next = (i32::from(self.duty(band)) + delta).clamp(0, i32::from(self.max_duty));
        self.set(band, u16::try_from(next).unwrap_or(self.max_duty))
    }

    /// Current duty of a channel
    #[must_use]
    pub fn duty(&self, band: VcoBand) -> u16 {
        self.duty[band.index()]
    }

    /// Full-scale duty
    #[must_use]
    pub const fn max_duty(&self) -> u16 {
        self.max_duty
    }

    /// Access the underlying peripheral
    pub fn inner(&self) -> &P {
        &self.out
    }
}
