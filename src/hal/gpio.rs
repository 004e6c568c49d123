//! GPIO Abstractions
//!
//! Type-safe GPIO wrappers for the front panel and the RF chain.
//! Provides semantic meaning to pins through the type system.

use core::convert::Infallible;

use embedded_hal::digital::{InputPin, OutputPin};

use crate::types::VcoBand;

/// Status LED state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LedState {
    /// LED is off
    #[default]
    Off,
    /// LED is on
    On,
}

impl LedState {
    /// Toggle the LED state
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Off => Self::On,
            Self::On => Self::Off,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for LedState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Off => defmt::write!(f, "OFF"),
            Self::On => defmt::write!(f, "ON"),
        }
    }
}

/// Status LED driver
pub struct StatusLed<P> {
    pin: P,
    state: LedState,
}

impl<P: OutputPin<Error = Infallible>> StatusLed<P> {
    /// Create a new status LED (initially off)
    pub fn new(mut pin: P) -> Self {
        let _ = pin.set_low();
        Self {
            pin,
            state: LedState::Off,
        }
    }

    /// Turn LED on
    pub fn on(&mut self) {
        let _ = self.pin.set_high();
        self.state = LedState::On;
    }

    /// Turn LED off
    pub fn off(&mut self) {
        let _ = self.pin.set_low();
        self.state = LedState::Off;
    }

    /// Drive the LED from a boolean
    pub fn set(&mut self, lit: bool) {
        if lit {
            self.on();
        } else {
            self.off();
        }
    }

    /// Toggle LED state
    pub fn toggle(&mut self) {
        match self.state {
            LedState::Off => self.on(),
            LedState::On => self.off(),
        }
    }

    /// Get current state
    #[must_use]
    pub const fn state(&self) -> LedState {
        self.state
    }
}

/// Program select key (active low with pull-up)
pub struct ProgramKey<P> {
    pin: P,
}

impl<P: InputPin> ProgramKey<P> {
    /// Wrap the key input
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Key is held down; a read error counts as released
    pub fn is_pressed(&mut self) -> bool {
        self.pin.is_low().unwrap_or(false)
    }
}

/// Lock-detect lines of the two synthesizer stages
pub trait LockDetect {
    /// Stage feeding `band` currently reports lock
    fn is_locked(&mut self, band: VcoBand) -> bool;
}

/// Lock detect read from two input pins (high = locked)
pub struct LockDetectPins<RF, IF> {
    rf: RF,
    if_: IF,
}

impl<RF: InputPin, IF: InputPin> LockDetectPins<RF, IF> {
    /// RF stage line feeds the high band, IF stage line the low band
    pub fn new(rf: RF, if_: IF) -> Self {
        Self { rf, if_ }
    }
}

impl<RF: InputPin, IF: InputPin> LockDetect for LockDetectPins<RF, IF> {
    fn is_locked(&mut self, band: VcoBand) -> bool {
        // A read error is reported as unlocked
        match band {
            VcoBand::High => self.rf.is_high().unwrap_or(false),
            VcoBand::Low => self.if_.is_high().unwrap_or(false),
        }
    }
}

/// Supply switches of the VCO and gain stages
pub trait VcoPower {
    /// Switch one chain on or off
    fn set_powered(&mut self, band: VcoBand, on: bool);
}

/// VCO power switches driven by two output pins (high = on)
pub struct VcoPowerPins<H, L> {
    high: H,
    low: L,
}

impl<H, L> VcoPowerPins<H, L>
where
    H: OutputPin<Error = Infallible>,
    L: OutputPin<Error = Infallible>,
{
    /// Wrap the switches, both chains off
    pub fn new(mut high: H, mut low: L) -> Self {
        let _ = high.set_low();
        let _ = low.set_low();
        Self { high, low }
    }
}

impl<H, L> VcoPower for VcoPowerPins<H, L>
where
    H: OutputPin<Error = Infallible>,
    L: OutputPin<Error = Infallible>,
{
    fn set_powered(&mut self, band: VcoBand, on: bool) {
        let _ = match (band, on) {
            (VcoBand::High, true) => self.high.set_high(),
            (VcoBand::High, false) => self.high.set_low(),
            (VcoBand::Low, true) => self.low.set_high(),
            (VcoBand::Low, false) => self.low.set_low(),
        };
    }
}

/// Sawtooth generator frequency
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SweepMode {
    /// Fast sweep used in operation
    #[default]
    High,
    /// Slow sweep used while calibrating bandwidth
    Low,
}

#[cfg(feature = "embedded")]
impl defmt::Format for SweepMode {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::High => defmt::write!(f, "HIGH"),
            Self::Low => defmt::write!(f, "LOW"),
        }
    }
}

/// Sawtooth frequency select
pub trait SweepControl {
    /// Switch the sawtooth generator
    fn set_sweep(&mut self, mode: SweepMode);
}
