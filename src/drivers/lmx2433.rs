//! `LMX2433` Dual Frequency Synthesizer Driver
//!
//! The RF stage steers the high band VCO and the IF stage the low band VCO.
//! Registers are written through a three-wire bit-banged interface
//! (CLK, DATA, LE): 24-bit frames, MSB first, with the register address in
//! the three least significant bits.
//!
//! Every stage runs from a 1 MHz comparison frequency (10 MHz reference
//! divided by R = 10), so the feedback divider N equals the target
//! frequency in MHz. N is realised by the dual-modulus prescaler as
//! `N = B * P + A`.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::PLL_REFERENCE_DIVIDER;
use crate::drivers::RegisterError;
use crate::types::{Mhz, Prescaler, VcoBand};

/// Frame width of the serial interface
const FRAME_BITS: u32 = 24;

/// Valid bits of a frame
const FRAME_MASK: u32 = (1 << FRAME_BITS) - 1;

/// Address field width
const ADDRESS_MASK: u32 = 0x7;

/// Setup/hold time around every clock edge in microseconds
const BIT_DELAY_US: u32 = 1;

/// Register field positions
mod field {
    pub const R_SHIFT: u32 = 3;
    pub const R_MASK: u32 = 0x7FFF;
    pub const MUX_SHIFT: u32 = 22;
    pub const MUX_MASK: u32 = 0x3;

    pub const A_SHIFT: u32 = 3;
    pub const A_MASK: u32 = 0xF;
    pub const B_SHIFT: u32 = 7;
    pub const RF_B_MASK: u32 = 0x7FFF;
    pub const IF_B_MASK: u32 = 0x3FFF;
    pub const PRESCALER_SHIFT: u32 = 22;
    pub const POWER_DOWN_SHIFT: u32 = 23;
}

/// Control registers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Register {
    /// RF reference divider
    RfR = 0,
    /// RF feedback divider
    RfN = 1,
    /// RF time-out counter
    RfToc = 2,
    /// IF reference divider
    IfR = 3,
    /// IF feedback divider
    IfN = 4,
    /// IF time-out counter
    IfToc = 5,
}

impl Register {
    /// Address field value
    #[must_use]
    pub const fn address(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Register {
    type Error = RegisterError;

    fn try_from(addr: u8) -> Result<Self, Self::Error> {
        match addr {
            0 => Ok(Self::RfR),
            1 => Ok(Self::RfN),
            2 => Ok(Self::RfToc),
            3 => Ok(Self::IfR),
            4 => Ok(Self::IfN),
            5 => Ok(Self::IfToc),
            _ => Err(RegisterError::InvalidAddress),
        }
    }
}

/// Synthesizer stage
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SynthStage {
    /// RF stage (high band VCO)
    Rf,
    /// IF stage (low band VCO)
    If,
}

impl SynthStage {
    /// Stage steering a VCO band
    #[must_use]
    pub const fn for_band(band: VcoBand) -> Self {
        match band {
            VcoBand::High => Self::Rf,
            VcoBand::Low => Self::If,
        }
    }

    /// Feedback divider register
    #[must_use]
    pub const fn n_register(self) -> Register {
        match self {
            Self::Rf => Register::RfN,
            Self::If => Register::IfN,
        }
    }

    /// Width mask of the B counter
    #[must_use]
    pub const fn b_mask(self) -> u32 {
        match self {
            Self::Rf => field::RF_B_MASK,
            Self::If => field::IF_B_MASK,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for SynthStage {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Rf => defmt::write!(f, "RF"),
            Self::If => defmt::write!(f, "IF"),
        }
    }
}

/// Signal routed to the multiplexed output pin
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MuxOutput {
    /// RF digital lock detect
    RfDigitalLock = 4,
    /// IF digital lock detect
    IfDigitalLock = 5,
    /// RF analog lock detect
    RfAnalogLock = 7,
    /// IF analog lock detect
    IfAnalogLock = 8,
    /// RF N divider output divided by two
    RfNDivBy2 = 15,
}

impl MuxOutput {
    /// The 4-bit select is split over R0 (low bits) and R3 (high bits)
    const fn bits(self, register: Register) -> u32 {
        let select = self as u32;
        match register {
            Register::IfR => (select >> 2) & field::MUX_MASK,
            _ => select & field::MUX_MASK,
        }
    }
}

/// One register write: positioned payload plus address
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegisterWord {
    /// Payload with every field already at its frame position
    pub payload: u32,
    /// Target register
    pub register: Register,
}

impl RegisterWord {
    /// Reference divider word for R0 or R3
    #[must_use]
    pub const fn reference(register: Register, r: u16, mux: MuxOutput) -> Self {
        let payload = (mux.bits(register) << field::MUX_SHIFT)
            | ((r as u32 & field::R_MASK) << field::R_SHIFT);
        Self { payload, register }
    }

    /// Time-out counter word with every feature disabled
    #[must_use]
    pub const fn toc_disabled(register: Register) -> Self {
        Self {
            payload: 0,
            register,
        }
    }

    /// The 24-bit frame shifted out on the wire
    #[must_use]
    pub const fn frame(self) -> u32 {
        (self.payload | (self.register.address() as u32 & ADDRESS_MASK)) & FRAME_MASK
    }
}

/// Feedback divider fields for one frequency
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Divider {
    /// B (main) counter
    pub b: u16,
    /// A (swallow) counter
    pub a: u16,
    /// Prescaler in use
    pub prescaler: Prescaler,
}

impl Divider {
    /// Smallest B counter the chip accepts
    pub const MIN_B: u16 = 3;

    /// Split a frequency (= N at 1 MHz comparison) into B and A
    #[must_use]
    pub const fn for_frequency(mhz: Mhz, prescaler: Prescaler) -> Self {
        let p = prescaler.modulus();
        let b = mhz / p;
        Self {
            b: if b < Self::MIN_B { Self::MIN_B } else { b },
            a: mhz % p,
            prescaler,
        }
    }

    /// Total division ratio `B * P + A`
    #[must_use]
    pub const fn n(self) -> u32 {
        self.b as u32 * self.prescaler.modulus() as u32 + self.a as u32
    }

    /// Positioned N-register payload for a stage
    #[must_use]
    pub const fn payload(self, stage: SynthStage) -> u32 {
        let prescaler = match self.prescaler {
            Prescaler::Eight => 0,
            Prescaler::Sixteen => 1,
        };
        ((self.a as u32 & field::A_MASK) << field::A_SHIFT)
            | ((self.b as u32 & stage.b_mask()) << field::B_SHIFT)
            | (prescaler << field::PRESCALER_SHIFT)
            // PLL active
            | (0 << field::POWER_DOWN_SHIFT)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Divider {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "B={} A={} P={}", self.b, self.a, self.prescaler);
    }
}

/// Frequency programming seam used by the tuning engine
pub trait Synthesizer {
    /// Bring both stages to a known state
    ///
    /// # Errors
    /// Returns an error if a line could not be driven
    fn init(&mut self) -> Result<(), RegisterError>;

    /// Program one stage's feedback divider
    ///
    /// # Errors
    /// Returns an error if a line could not be driven
    fn set_frequency(
        &mut self,
        stage: SynthStage,
        mhz: Mhz,
        prescaler: Prescaler,
    ) -> Result<Divider, RegisterError>;
}

/// Bit-banged `LMX2433`
pub struct Lmx2433<CLK, DATA, LE, D> {
    clk: CLK,
    data: DATA,
    le: LE,
    delay: D,
}

impl<CLK, DATA, LE, D> Lmx2433<CLK, DATA, LE, D>
where
    CLK: OutputPin,
    DATA: OutputPin,
    LE: OutputPin,
    D: DelayNs,
{
    /// Wrap the three serial lines
    pub fn new(clk: CLK, data: DATA, le: LE, delay: D) -> Self {
        Self {
            clk,
            data,
            le,
            delay,
        }
    }

    /// Shift one positioned payload into register `addr`
    ///
    /// # Errors
    /// `InvalidAddress` if `addr` is not one of R0-R5; `Pin` if a line
    /// could not be driven.
    pub fn send(&mut self, payload: u32, addr: u8) -> Result<(), RegisterError> {
        let register = Register::try_from(addr)?;
        self.write(RegisterWord { payload, register })
    }

    /// Shift a register word out
    ///
    /// # Errors
    /// Returns an error if a line could not be driven
    pub fn write(&mut self, word: RegisterWord) -> Result<(), RegisterError> {
        let frame = word.frame();
        trace!("lmx2433 R{} <- {=u32:#08x}", word.register.address(), frame);

        self.le.set_low().map_err(|_| RegisterError::Pin)?;
        self.clk.set_low().map_err(|_| RegisterError::Pin)?;

        for bit in (0..FRAME_BITS).rev() {
            if frame & (1 << bit) != 0 {
                self.data.set_high().map_err(|_| RegisterError::Pin)?;
            } else {
                self.data.set_low().map_err(|_| RegisterError::Pin)?;
            }
            self.delay.delay_us(BIT_DELAY_US);
            self.clk.set_high().map_err(|_| RegisterError::Pin)?;
            self.delay.delay_us(BIT_DELAY_US);
            self.clk.set_low().map_err(|_| RegisterError::Pin)?;
        }

        // Latch the shift register into the addressed register
        self.le.set_high().map_err(|_| RegisterError::Pin)?;
        self.delay.delay_us(BIT_DELAY_US);
        self.le.set_low().map_err(|_| RegisterError::Pin)?;
        self.data.set_low().map_err(|_| RegisterError::Pin)?;
        Ok(())
    }

    /// Program the reference divider and mux output of one stage
    ///
    /// # Errors
    /// Returns an error if a line could not be driven
    pub fn set_reference(&mut self, stage: SynthStage, mux: MuxOutput) -> Result<(), RegisterError> {
        let register = match stage {
            SynthStage::Rf => Register::RfR,
            SynthStage::If => Register::IfR,
        };
        self.write(RegisterWord::reference(register, PLL_REFERENCE_DIVIDER, mux))
    }

    /// Give the serial lines back
    pub fn release(self) -> (CLK, DATA, LE, D) {
        (self.clk, self.data, self.le, self.delay)
    }
}

impl<CLK, DATA, LE, D> Synthesizer for Lmx2433<CLK, DATA, LE, D>
where
    CLK: OutputPin,
    DATA: OutputPin,
    LE: OutputPin,
    D: DelayNs,
{
    fn init(&mut self) -> Result<(), RegisterError> {
        self.write(RegisterWord::toc_disabled(Register::RfToc))?;
        self.write(RegisterWord::toc_disabled(Register::IfToc))?;
        // IF register first: its MUX bits are the high half of the select
        self.set_reference(SynthStage::If, MuxOutput::RfNDivBy2)?;
        self.set_reference(SynthStage::Rf, MuxOutput::RfNDivBy2)?;
        debug!("lmx2433 initialised, R = {}", PLL_REFERENCE_DIVIDER);
        Ok(())
    }

    fn set_frequency(
        &mut self,
        stage: SynthStage,
        mhz: Mhz,
        prescaler: Prescaler,
    ) -> Result<Divider, RegisterError> {
        let divider = Divider::for_frequency(mhz, prescaler);
        debug!("lmx2433 {} MHz: B={} A={}", mhz, divider.b, divider.a);
        self.write(RegisterWord {
            payload: divider.payload(stage),
            register: stage.n_register(),
        })?;
        Ok(divider)
    }
}
