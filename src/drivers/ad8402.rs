//! `AD8402` Dual Digital Potentiometer Driver
//!
//! Sets the sweep amplitude (bandwidth) of each VCO chain. Writes are
//! 10-bit frames, two address bits followed by the 8-bit wiper value,
//! MSB first, framed by chip select. There is no read-back.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::drivers::RegisterError;
use crate::types::VcoBand;

const FRAME_BITS: u32 = 10;
const BIT_DELAY_US: u32 = 1;

/// Potentiometer channel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rdac {
    /// Channel 0, wired to the low band chain
    Rdac1 = 0,
    /// Channel 1, wired to the high band chain
    Rdac2 = 1,
}

impl Rdac {
    /// Channel controlling a band's bandwidth
    #[must_use]
    pub const fn for_band(band: VcoBand) -> Self {
        match band {
            VcoBand::High => Self::Rdac2,
            VcoBand::Low => Self::Rdac1,
        }
    }
}

/// Serial frame for a wiper write
#[must_use]
pub const fn frame(rdac: Rdac, value: u8) -> u16 {
    (((rdac as u16) & 0x3) << 8) | value as u16
}

/// Bandwidth potentiometer seam used by the tuning engine
pub trait BandwidthPot {
    /// Set the wiper of the channel serving `band`
    ///
    /// # Errors
    /// Returns an error if a line could not be driven
    fn set_bandwidth(&mut self, band: VcoBand, value: u8) -> Result<(), RegisterError>;
}

/// Bit-banged `AD8402`
pub struct Ad8402<CLK, SDI, CS, D> {
    clk: CLK,
    sdi: SDI,
    cs: CS,
    delay: D,
}

impl<CLK, SDI, CS, D> Ad8402<CLK, SDI, CS, D>
where
    CLK: OutputPin,
    SDI: OutputPin,
    CS: OutputPin,
    D: DelayNs,
{
    /// Wrap the serial lines; chip select idles high
    ///
    /// # Errors
    /// Returns an error if chip select could not be driven
    pub fn new(clk: CLK, sdi: SDI, mut cs: CS, delay: D) -> Result<Self, RegisterError> {
        cs.set_high().map_err(|_| RegisterError::Pin)?;
        Ok(Self {
            clk,
            sdi,
            cs,
            delay,
        })
    }

    /// Set a wiper position
    ///
    /// # Errors
    /// Returns an error if a line could not be driven
    pub fn set_resistor(&mut self, rdac: Rdac, value: u8) -> Result<(), RegisterError> {
        let frame = frame(rdac, value);
        trace!("ad8402 {=u16:#05x}", frame);

        self.cs.set_low().map_err(|_| RegisterError::Pin)?;
        for bit in (0..FRAME_BITS).rev() {
            if frame & (1 << bit) != 0 {
                self.sdi.set_high().map_err(|_| RegisterError::Pin)?;
            } else {
                self.sdi.set_low().map_err(|_| RegisterError::Pin)?;
            }
            self.clk.set_high().map_err(|_| RegisterError::Pin)?;
            self.delay.delay_us(BIT_DELAY_US);
            self.clk.set_low().map_err(|_| RegisterError::Pin)?;
        }
        self.cs.set_high().map_err(|_| RegisterError::Pin)?;
        Ok(())
    }

    /// Give the serial lines back
    pub fn release(self) -> (CLK, SDI, CS, D) {
        (self.clk, self.sdi, self.cs, self.delay)
    }
}

impl<CLK, SDI, CS, D> BandwidthPot for Ad8402<CLK, SDI, CS, D>
where
    CLK: OutputPin,
    SDI: OutputPin,
    CS: OutputPin,
    D: DelayNs,
{
    fn set_bandwidth(&mut self, band: VcoBand, value: u8) -> Result<(), RegisterError> {
        self.set_resistor(Rdac::for_band(band), value)
    }
}
