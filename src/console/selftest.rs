//! Bench bring-up commands
//!
//! Single-letter commands that drive the RF board directly, one step per
//! command, so each stage can be checked with a scope or spectrum analyser.

use crate::config::CALIBRATION_PRESCALER;
use crate::drivers::ad8402::BandwidthPot;
use crate::drivers::lmx2433::{SynthStage, Synthesizer};
use crate::drivers::RegisterError;
use crate::hal::adc::AnalogInput;
use crate::hal::gpio::{LockDetect, SweepControl, SweepMode, VcoPower};
use crate::hal::pwm::DutyOutput;
use crate::hal::timer::TimerService;
use crate::tuning::RfFrontend;
use crate::types::{Mhz, VcoBand};

/// Frequency used to check the RF stage
pub const RF_CHECK_MHZ: Mhz = 2000;

/// Frequency used to check the IF stage
pub const IF_CHECK_MHZ: Mhz = 1200;

/// Bench command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BenchCommand {
    /// Slow sawtooth
    SweepLow,
    /// Fast sawtooth
    SweepHigh,
    /// Step both potentiometers in opposite directions
    PotStep,
    /// Both potentiometers to 0
    PotMin,
    /// Both potentiometers to full scale
    PotMax,
    /// High band chain on, low band off
    PowerHighOnly,
    /// Low band chain on, high band off
    PowerLowOnly,
    /// Both chains off
    PowerNone,
    /// Step both tuning voltages in opposite directions
    DutyStep,
    /// Both tuning voltages to 0
    DutyMin,
    /// Both tuning voltages to full scale
    DutyMax,
    /// Both tuning voltages up one count
    DutyUp,
    /// Both tuning voltages down one count
    DutyDown,
    /// Program the RF stage and run the high band chain alone
    RfStage,
    /// Program the IF stage and run the low band chain alone
    IfStage,
}

impl BenchCommand {
    /// Look up a command letter
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            b's' => Self::SweepLow,
            b'S' => Self::SweepHigh,
            b'r' => Self::PotStep,
            b'[' => Self::PotMin,
            b']' => Self::PotMax,
            b'1' => Self::PowerHighOnly,
            b'2' => Self::PowerLowOnly,
            b'0' => Self::PowerNone,
            b'v' => Self::DutyStep,
            b'<' => Self::DutyMin,
            b'>' => Self::DutyMax,
            b'+' => Self::DutyUp,
            b'-' => Self::DutyDown,
            b'f' => Self::RfStage,
            b'i' => Self::IfStage,
            _ => return None,
        })
    }
}

/// Step counters carried between bench commands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BenchState {
    /// Potentiometer sweep position
    pub pot: u8,
    /// Tuning voltage sweep position
    pub duty: u16,
}

impl<S, B, P, L, A, V, W, T> RfFrontend<S, B, P, L, A, V, W, T>
where
    S: Synthesizer,
    B: BandwidthPot,
    P: DutyOutput,
    L: LockDetect,
    A: AnalogInput,
    V: VcoPower,
    W: SweepControl,
    T: TimerService,
{
    fn run_alone(&mut self, band: VcoBand, mhz: Mhz) -> Result<(), RegisterError> {
        self.synth.init()?;
        self.sweep.set_sweep(SweepMode::Low);
        self.pot.set_bandwidth(band, 0)?;
        self.synth
            .set_frequency(SynthStage::for_band(band), mhz, CALIBRATION_PRESCALER)?;
        for other in VcoBand::ALL {
            self.power.set_powered(other, other == band);
        }
        Ok(())
    }

    /// Execute one bench command
    ///
    /// # Errors
    /// Returns an error if a serial line could not be driven
    pub fn run_bench(&mut self, cmd: BenchCommand, state: &mut BenchState) -> Result<(), RegisterError> {
        debug!("bench command {}", cmd as u8);
        match cmd {
            BenchCommand::SweepLow => self.sweep.set_sweep(SweepMode::Low),
            BenchCommand::SweepHigh => self.sweep.set_sweep(SweepMode::High),
            BenchCommand::PotStep => {
                self.pot.set_bandwidth(VcoBand::High, state.pot)?;
                self.pot.set_bandwidth(VcoBand::Low, u8::MAX - state.pot)?;
                state.pot = state.pot.wrapping_add(1);
            }
            BenchCommand::PotMin | BenchCommand::PotMax => {
                let value = if cmd == BenchCommand::PotMin { 0 } else { u8::MAX };
                for band in VcoBand::ALL {
                    self.pot.set_bandwidth(band, value)?;
                }
            }
            BenchCommand::PowerHighOnly | BenchCommand::PowerLowOnly | BenchCommand::PowerNone => {
                let on = match cmd {
                    BenchCommand::PowerHighOnly => Some(VcoBand::High),
                    BenchCommand::PowerLowOnly => Some(VcoBand::Low),
                    _ => None,
                };
                for band in VcoBand::ALL {
                    self.power.set_powered(band, on == Some(band));
                }
            }
            BenchCommand::DutyStep => {
                let step = state.duty & 0x3FF;
                self.tuning.set(VcoBand::High, step);
                self.tuning
                    .set(VcoBand::Low, self.tuning.max_duty().saturating_sub(step));
                state.duty = state.duty.wrapping_add(1);
            }
            BenchCommand::DutyMin | BenchCommand::DutyMax => {
                let duty = if cmd == BenchCommand::DutyMin { 0 } else { self.tuning.max_duty() };
                for band in VcoBand::ALL {
                    self.tuning.set(band, duty);
                }
            }
            BenchCommand::DutyUp | BenchCommand::DutyDown => {
                let delta = if cmd == BenchCommand::DutyUp { 1 } else { -1 };
                for band in VcoBand::ALL {
                    self.tuning.adjust(band, delta);
                }
            }
            BenchCommand::RfStage => self.run_alone(VcoBand::High, RF_CHECK_MHZ)?,
            BenchCommand::IfStage => self.run_alone(VcoBand::Low, IF_CHECK_MHZ)?,
        }
        Ok(())
    }
}
