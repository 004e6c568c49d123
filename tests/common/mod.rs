//! Simulated hardware shared by the integration tests
//!
//! A `Rig` holds the state of a simulated RF board: the VCOs lock once
//! their tuning duty reaches a threshold, and the lock-strength ADC drops
//! once the bandwidth potentiometer reaches a limit. A `SimClock` advances
//! the shared counters whenever the code under test busy-waits.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorKind, ErrorType, InputPin, OutputPin};

use wavebubble::config::{MAX_PROGRAMS, PWM_MAX_DUTY, STORAGE_CAPACITY};
use wavebubble::drivers::ad8402::BandwidthPot;
use wavebubble::drivers::lmx2433::{Divider, SynthStage, Synthesizer};
use wavebubble::drivers::RegisterError;
use wavebubble::hal::adc::AnalogInput;
use wavebubble::hal::gpio::{LockDetect, SweepControl, SweepMode, VcoPower};
use wavebubble::hal::pwm::{DutyOutput, TuningVoltage};
use wavebubble::hal::timer::{Counters, TimerService};
use wavebubble::store::ProgramStore;
use wavebubble::tuning::RfFrontend;
use wavebubble::types::{BandSettings, JammerProgram, Mhz, Prescaler, VcoBand};

// =============================================================================
// Clock
// =============================================================================

/// Fake tick source: every idle call is one tick
#[derive(Clone, Default)]
pub struct SimClock {
    counters: Rc<Counters>,
    idles: Rc<Cell<u64>>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticks spent busy-waiting so far
    pub fn ticks_waited(&self) -> u64 {
        self.idles.get()
    }

    /// Let `n` ticks pass
    pub fn advance(&self, n: u32) {
        for _ in 0..n {
            self.idle();
        }
    }
}

impl TimerService for SimClock {
    fn counters(&self) -> &Counters {
        &self.counters
    }

    fn idle(&self) {
        self.idles.set(self.idles.get() + 1);
        self.counters.tick();
    }
}

// =============================================================================
// Pins and serial bus
// =============================================================================

/// Output pin recording every level it was driven to
#[derive(Clone, Default)]
pub struct RecordingPin {
    levels: Rc<RefCell<Vec<bool>>>,
}

impl RecordingPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn levels(&self) -> Vec<bool> {
        self.levels.borrow().clone()
    }

    pub fn is_high(&self) -> bool {
        self.levels.borrow().last().copied().unwrap_or(false)
    }
}

impl ErrorType for RecordingPin {
    type Error = Infallible;
}

impl OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.levels.borrow_mut().push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.levels.borrow_mut().push(true);
        Ok(())
    }
}

/// Output pin that always fails
pub struct BrokenPin;

impl ErrorType for BrokenPin {
    type Error = ErrorKind;
}

impl OutputPin for BrokenPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Err(ErrorKind::Other)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Err(ErrorKind::Other)
    }
}

/// Active-low key
#[derive(Clone, Default)]
pub struct KeyPin {
    pressed: Rc<Cell<bool>>,
}

impl KeyPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&self) {
        self.pressed.set(true);
    }

    pub fn release(&self) {
        self.pressed.set(false);
    }
}

impl ErrorType for KeyPin {
    type Error = Infallible;
}

impl InputPin for KeyPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.pressed.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.pressed.get())
    }
}

/// Delay that returns immediately
pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Role {
    Clock,
    Data,
    /// Frame ends on a rising edge (`LMX2433` LE)
    Latch,
    /// Frame spans the low phase (`AD8402` CS)
    ChipSelect,
}

/// A captured serial frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame {
    pub value: u32,
    pub bits: usize,
}

#[derive(Default)]
struct BusState {
    data: bool,
    clock: bool,
    bits: Vec<bool>,
    frames: Vec<Frame>,
}

impl BusState {
    fn close_frame(&mut self) {
        let value = self.bits.iter().fold(0u32, |acc, &b| (acc << 1) | u32::from(b));
        self.frames.push(Frame {
            value,
            bits: self.bits.len(),
        });
        self.bits.clear();
    }
}

/// Logic analyser on a three-wire serial bus
#[derive(Clone, Default)]
pub struct SerialBus {
    state: Rc<RefCell<BusState>>,
}

impl SerialBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn pin(&self, role: Role) -> BusPin {
        BusPin {
            bus: self.state.clone(),
            role,
        }
    }

    pub fn clock(&self) -> BusPin {
        self.pin(Role::Clock)
    }

    pub fn data(&self) -> BusPin {
        self.pin(Role::Data)
    }

    pub fn latch(&self) -> BusPin {
        self.pin(Role::Latch)
    }

    pub fn chip_select(&self) -> BusPin {
        self.pin(Role::ChipSelect)
    }

    pub fn frames(&self) -> Vec<Frame> {
        self.state.borrow().frames.clone()
    }

    pub fn data_level(&self) -> bool {
        self.state.borrow().data
    }

    pub fn pending_bits(&self) -> usize {
        self.state.borrow().bits.len()
    }
}

pub struct BusPin {
    bus: Rc<RefCell<BusState>>,
    role: Role,
}

impl ErrorType for BusPin {
    type Error = Infallible;
}

impl OutputPin for BusPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        let mut bus = self.bus.borrow_mut();
        match self.role {
            Role::Clock => bus.clock = false,
            Role::Data => bus.data = false,
            Role::Latch => {}
            Role::ChipSelect => bus.bits.clear(),
        }
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let mut bus = self.bus.borrow_mut();
        match self.role {
            Role::Clock => {
                if !bus.clock {
                    let bit = bus.data;
                    bus.bits.push(bit);
                }
                bus.clock = true;
            }
            Role::Data => bus.data = true,
            Role::Latch => bus.close_frame(),
            Role::ChipSelect => {
                if !bus.bits.is_empty() {
                    bus.close_frame();
                }
            }
        }
        Ok(())
    }
}

// =============================================================================
// Simulated RF board
// =============================================================================

/// Behaviour and observable state of the simulated board
pub struct Board {
    pub duty: [u16; 2],
    pub pot: [u8; 2],
    pub powered: [bool; 2],
    pub sweep: SweepMode,
    pub sweep_history: Vec<SweepMode>,
    pub synth_inits: usize,
    pub frequencies: Vec<(SynthStage, Mhz, Prescaler)>,
    /// VCO locks once its duty reaches this value (`None` = never)
    pub lock_at: [Option<u16>; 2],
    /// Duties that report lock on the first read only
    pub glitch_at: Vec<u16>,
    glitch_reads: u32,
    /// Lock strength with the loop fully locked
    pub baseline: u16,
    /// Strength drops once the potentiometer reaches this value
    pub drop_at: [Option<u8>; 2],
    pub battery: u16,
    pub lock_reads: usize,
    pub adc_reads: usize,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            duty: [0; 2],
            pot: [0; 2],
            powered: [false; 2],
            sweep: SweepMode::High,
            sweep_history: Vec::new(),
            synth_inits: 0,
            frequencies: Vec::new(),
            lock_at: [Some(2048); 2],
            glitch_at: Vec::new(),
            glitch_reads: 0,
            baseline: 600,
            drop_at: [Some(40); 2],
            battery: 400,
            lock_reads: 0,
            adc_reads: 0,
        }
    }
}

/// Handle to the shared board state
#[derive(Clone, Default)]
pub struct Rig {
    pub board: Rc<RefCell<Board>>,
}

pub type SimFrontend =
    RfFrontend<SimSynth, SimPot, SimPwm, SimLock, SimAdc, SimPower, SimSweep, SimClock>;

impl Rig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frontend(&self, clock: &SimClock) -> SimFrontend {
        RfFrontend {
            synth: SimSynth(self.clone()),
            pot: SimPot(self.clone()),
            tuning: TuningVoltage::new(SimPwm(self.clone()), PWM_MAX_DUTY),
            lock: SimLock(self.clone()),
            adc: SimAdc(self.clone()),
            power: SimPower(self.clone()),
            sweep: SimSweep(self.clone()),
            timers: clock.clone(),
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut Board) -> R) -> R {
        f(&mut self.board.borrow_mut())
    }
}

pub struct SimSynth(Rig);

impl Synthesizer for SimSynth {
    fn init(&mut self) -> Result<(), RegisterError> {
        self.0.with(|b| b.synth_inits += 1);
        Ok(())
    }

    fn set_frequency(
        &mut self,
        stage: SynthStage,
        mhz: Mhz,
        prescaler: Prescaler,
    ) -> Result<Divider, RegisterError> {
        self.0.with(|b| b.frequencies.push((stage, mhz, prescaler)));
        Ok(Divider::for_frequency(mhz, prescaler))
    }
}

pub struct SimPot(Rig);

impl BandwidthPot for SimPot {
    fn set_bandwidth(&mut self, band: VcoBand, value: u8) -> Result<(), RegisterError> {
        self.0.with(|b| b.pot[band.index()] = value);
        Ok(())
    }
}

pub struct SimPwm(Rig);

impl DutyOutput for SimPwm {
    fn set_duty(&mut self, band: VcoBand, duty: u16) {
        self.0.with(|b| b.duty[band.index()] = duty);
    }
}

pub struct SimLock(Rig);

impl LockDetect for SimLock {
    fn is_locked(&mut self, band: VcoBand) -> bool {
        self.0.with(|b| {
            b.lock_reads += 1;
            let duty = b.duty[band.index()];
            if b.glitch_at.contains(&duty) {
                b.glitch_reads += 1;
                return b.glitch_reads % 2 == 1;
            }
            b.lock_at[band.index()].is_some_and(|at| duty >= at)
        })
    }
}

pub struct SimAdc(Rig);

impl AnalogInput for SimAdc {
    fn read(&mut self, channel: u8) -> u16 {
        self.0.with(|b| {
            b.adc_reads += 1;
            let band = match channel {
                0 => VcoBand::High,
                5 => VcoBand::Low,
                6 => return b.battery,
                _ => return 0,
            };
            let pot = b.pot[band.index()];
            match b.drop_at[band.index()] {
                Some(at) if pot >= at => b.baseline - 20,
                _ => b.baseline,
            }
        })
    }
}

pub struct SimPower(Rig);

impl VcoPower for SimPower {
    fn set_powered(&mut self, band: VcoBand, on: bool) {
        self.0.with(|b| b.powered[band.index()] = on);
    }
}

pub struct SimSweep(Rig);

impl SweepControl for SimSweep {
    fn set_sweep(&mut self, mode: SweepMode) {
        self.0.with(|b| {
            b.sweep = mode;
            b.sweep_history.push(mode);
        });
    }
}

// =============================================================================
// Storage and console
// =============================================================================

/// RAM-backed non-volatile store
#[derive(Clone)]
pub struct RamStorage {
    bytes: Rc<RefCell<Vec<u8>>>,
    writes: Rc<Cell<usize>>,
}

impl RamStorage {
    /// Blank (all 0xFF, like erased flash)
    pub fn blank() -> Self {
        Self {
            bytes: Rc::new(RefCell::new(vec![0xFF; STORAGE_CAPACITY])),
            writes: Rc::new(Cell::new(0)),
        }
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.borrow().clone()
    }

    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    pub fn poke(&self, offset: usize, data: &[u8]) {
        self.bytes.borrow_mut()[offset..offset + data.len()].copy_from_slice(data);
    }
}

impl embedded_storage::ReadStorage for RamStorage {
    type Error = Infallible;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        let start = offset as usize;
        bytes.copy_from_slice(&self.bytes.borrow()[start..start + bytes.len()]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        STORAGE_CAPACITY
    }
}

impl embedded_storage::Storage for RamStorage {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        let start = offset as usize;
        self.bytes.borrow_mut()[start..start + bytes.len()].copy_from_slice(bytes);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

/// Console transport fed from a script
#[derive(Default)]
pub struct ScriptedIo {
    input: VecDeque<u8>,
    pub output: Vec<u8>,
}

impl ScriptedIo {
    pub fn new(script: &str) -> Self {
        Self {
            input: script.bytes().collect(),
            output: Vec::new(),
        }
    }

    pub fn output_text(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }
}

impl embedded_io::ErrorType for ScriptedIo {
    type Error = Infallible;
}

impl embedded_io::Read for ScriptedIo {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        match self.input.pop_front() {
            Some(byte) => {
                buf[0] = byte;
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

impl embedded_io::ReadReady for ScriptedIo {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.input.is_empty())
    }
}

impl embedded_io::Write for ScriptedIo {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.output.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn high_only(start: Mhz, end: Mhz) -> JammerProgram {
    JammerProgram::new(BandSettings::new(start, end), BandSettings::OFF)
}

pub fn low_only(start: Mhz, end: Mhz) -> JammerProgram {
    JammerProgram::new(BandSettings::OFF, BandSettings::new(start, end))
}

pub fn dual(high: (Mhz, Mhz), low: (Mhz, Mhz)) -> JammerProgram {
    JammerProgram::new(
        BandSettings::new(high.0, high.1),
        BandSettings::new(low.0, low.1),
    )
}

/// A formatted, empty store
pub fn empty_store() -> (ProgramStore<RamStorage>, RamStorage) {
    let ram = RamStorage::blank();
    let store = ProgramStore::open(ram.clone()).unwrap();
    (store, ram)
}

/// A store holding `programs`
pub fn store_with(programs: &[JammerProgram]) -> (ProgramStore<RamStorage>, RamStorage) {
    assert!(programs.len() <= MAX_PROGRAMS);
    let (mut store, ram) = empty_store();
    for program in programs {
        store.add(program).unwrap();
    }
    (store, ram)
}
