//! RF front end: everything the calibration loop drives or reads
//!
//! [`RfFrontend`] bundles the synthesizer, the bandwidth potentiometer, the
//! tuning-voltage PWM, lock detect, the ADC, the VCO supply switches, the
//! sweep select and the tick source. The searches themselves live here
//! because they interleave all of them.

use crate::config::{
    adc, BANDWIDTH_MARGIN, BASELINE_SETTLE_MS, CALIBRATION_PRESCALER, GLITCH_RECHECK_MS,
    LOCK_STRENGTH_SAMPLES, POT_MAX, PWM_LOW_RAIL, SETTLE_DELAY_MS,
};
use crate::console::selftest::{BenchCommand, BenchState};
use crate::drivers::ad8402::BandwidthPot;
use crate::drivers::lmx2433::{SynthStage, Synthesizer};
use crate::drivers::RegisterError;
use crate::hal::adc::{average, AnalogInput};
use crate::hal::gpio::{LockDetect, SweepControl, SweepMode, VcoPower};
use crate::hal::pwm::{DutyOutput, TuningVoltage};
use crate::hal::timer::TimerService;
use crate::tuning::search::BinarySearch;
use crate::tuning::{TuneError, TuneResult};
use crate::types::{Mhz, TuningResult, VcoBand};

/// Per-band calibration, as needed by the program store
pub trait BandTuner {
    /// Calibrate one chain for the range `start..=end`
    ///
    /// # Errors
    /// Returns the rail or register failure; nothing is retried.
    fn tune_band(&mut self, band: VcoBand, start: Mhz, end: Mhz) -> TuneResult<TuningResult>;
}

/// Operations the foreground loop needs from the RF hardware
pub trait Frontend: BandTuner {
    /// Tick source
    type Timers: TimerService;

    /// Drive a chain from a stored calibration and switch it on
    ///
    /// # Errors
    /// Returns an error if the potentiometer could not be written
    fn apply(&mut self, band: VcoBand, result: TuningResult) -> Result<(), RegisterError>;

    /// Switch both chains off
    fn power_down(&mut self);

    /// Raw battery divider reading
    fn sample_battery(&mut self) -> u16;

    /// Tick source
    fn timers(&self) -> &Self::Timers;

    /// Execute one bench bring-up command
    ///
    /// # Errors
    /// Returns an error if a serial line could not be driven
    fn bench(&mut self, cmd: BenchCommand, state: &mut BenchState) -> Result<(), RegisterError>;
}

/// The RF board
pub struct RfFrontend<S, B, P, L, A, V, W, T> {
    /// `LMX2433` synthesizer
    pub synth: S,
    /// `AD8402` bandwidth potentiometer
    pub pot: B,
    /// Tuning voltage PWM
    pub tuning: TuningVoltage<P>,
    /// Lock-detect lines
    pub lock: L,
    /// Lock strength and battery ADC
    pub adc: A,
    /// VCO supply switches
    pub power: V,
    /// Sawtooth frequency select
    pub sweep: W,
    /// Tick source
    pub timers: T,
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
    /// Initialise the synthesizer and park both chains: off, zero
    /// bandwidth, slow sweep
    ///
    /// # Errors
    /// Returns an error if a serial line could not be driven
    pub fn init(&mut self) -> Result<(), RegisterError> {
        self.power_down();
        self.synth.init()?;
        for band in VcoBand::ALL {
            self.pot.set_bandwidth(band, 0)?;
        }
        self.sweep.set_sweep(SweepMode::Low);
        Ok(())
    }

    fn locked(&mut self, band: VcoBand) -> bool {
        self.lock.is_locked(band)
    }

    /// Find the tuning voltage that centers `band` on `target`
    ///
    /// The chain is left powered at the found duty with zero bandwidth.
    ///
    /// # Errors
    /// `RangeTooHigh` if the loop is already locked at the bottom rail,
    /// `RangeTooLow` if it is still unlocked at full scale.
    pub fn tune_vco(&mut self, band: VcoBand, target: Mhz) -> TuneResult<u16> {
        self.synth
            .set_frequency(SynthStage::for_band(band), target, CALIBRATION_PRESCALER)?;
        self.pot.set_bandwidth(band, 0)?;
        self.power.set_powered(band, true);

        self.tuning.set(band, PWM_LOW_RAIL);
        self.timers.delay_ms(SETTLE_DELAY_MS);
        if self.locked(band) {
            warn!("{} VCO range is too high for {} MHz", band, target);
            return Err(TuneError::RangeTooHigh);
        }

        let max = self.tuning.max_duty();
        self.tuning.set(band, max);
        self.timers.delay_ms(SETTLE_DELAY_MS);
        if !self.locked(band) {
            warn!("{} VCO range is too low for {} MHz", band, target);
            return Err(TuneError::RangeTooLow);
        }

        let mut search = BinarySearch::new(0, max);
        while let Some(duty) = search.next_mid() {
            self.tuning.set(band, duty);
            self.timers.delay_ms(SETTLE_DELAY_MS);
            if self.locked(band) {
                // Only trust a lock that survives a second look
                self.timers.delay_ms(GLITCH_RECHECK_MS);
                if self.locked(band) {
                    search.narrow_upper();
                    trace!("duty {} locked", duty);
                    continue;
                }
            }
            search.narrow_lower();
            trace!("duty {} unlocked", duty);
        }

        let duty = search.result();
        self.tuning.set(band, duty);
        info!("{} VCO midpoint at {} ({} steps)", band, duty, search.steps());
        Ok(duty)
    }

    /// Calibrate one chain for the range `start..=end`
    ///
    /// Centers the VCO on the middle of the range, then widens the sweep
    /// until the lock strength measured at the bottom of the range drops
    /// more than [`BANDWIDTH_MARGIN`] counts below its full-lock baseline.
    /// The fast sweep is restored before returning, on success or failure.
    ///
    /// # Errors
    /// Returns the failure of the center search or a register write.
    pub fn tune_bandwidth(&mut self, band: VcoBand, start: Mhz, end: Mhz) -> TuneResult<TuningResult> {
        let (min, max) = if start <= end { (start, end) } else { (end, start) };
        let center = u16::try_from((u32::from(min) + u32::from(max)) / 2).unwrap_or(min);

        let dc_offset = self.tune_vco(band, center)?;
        if min == max {
            return Ok(TuningResult::new(dc_offset, 0));
        }

        self.sweep.set_sweep(SweepMode::Low);
        let bandwidth = self.search_bandwidth(band, min);
        self.sweep.set_sweep(SweepMode::High);

        let result = TuningResult::new(dc_offset, bandwidth?);
        info!("{} VCO {}-{} MHz tuned to {}", band, min, max, result);
        Ok(result)
    }

    fn search_bandwidth(&mut self, band: VcoBand, min: Mhz) -> TuneResult<u8> {
        self.synth
            .set_frequency(SynthStage::for_band(band), min, CALIBRATION_PRESCALER)?;

        let channel = band.lock_strength_channel();
        self.pot.set_bandwidth(band, 0)?;
        self.timers.delay_ms(BASELINE_SETTLE_MS);
        let baseline = average(&mut self.adc, channel, LOCK_STRENGTH_SAMPLES);
        let floor = baseline.saturating_sub(BANDWIDTH_MARGIN);
        debug!("{} lock strength baseline {}", band, baseline);

        let mut search = BinarySearch::new(0, u16::from(POT_MAX));
        while let Some(mid) = search.next_mid() {
            let value = u8::try_from(mid).unwrap_or(POT_MAX);
            self.pot.set_bandwidth(band, value)?;
            self.timers.delay_ms(SETTLE_DELAY_MS);
            let strength = average(&mut self.adc, channel, LOCK_STRENGTH_SAMPLES);
            trace!("bandwidth {}: strength {}", value, strength);
            if strength < floor {
                search.narrow_upper();
            } else {
                search.narrow_lower();
            }
        }

        Ok(u8::try_from(search.result()).unwrap_or(POT_MAX))
    }
}

impl<S, B, P, L, A, V, W, T> BandTuner for RfFrontend<S, B, P, L, A, V, W, T>
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
    fn tune_band(&mut self, band: VcoBand, start: Mhz, end: Mhz) -> TuneResult<TuningResult> {
        self.tune_bandwidth(band, start, end)
    }
}

impl<S, B, P, L, A, V, W, T> Frontend for RfFrontend<S, B, P, L, A, V, W, T>
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
    type Timers = T;

    fn apply(&mut self, band: VcoBand, result: TuningResult) -> Result<(), RegisterError> {
        self.tuning.set(band, result.dc_offset);
        self.pot.set_bandwidth(band, result.bandwidth)?;
        self.sweep.set_sweep(SweepMode::High);
        self.power.set_powered(band, true);
        debug!("{} VCO on at {}", band, result);
        Ok(())
    }

    fn power_down(&mut self) {
        for band in VcoBand::ALL {
            self.power.set_powered(band, false);
        }
    }

    fn sample_battery(&mut self) -> u16 {
        self.adc.read(adc::BATTERY)
    }

    fn timers(&self) -> &T {
        &self.timers
    }

    fn bench(&mut self, cmd: BenchCommand, state: &mut BenchState) -> Result<(), RegisterError> {
        self.run_bench(cmd, state)
    }
}
