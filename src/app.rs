//! Foreground application
//!
//! Activates the selected program and then loops: battery check, key,
//! LED. A short press steps to the next program, a long press switches
//! off, and a drained battery cuts the supply.

use core::convert::Infallible;

use embedded_hal::digital::{InputPin, OutputPin};
use embedded_storage::Storage;

use crate::config::POWER_ON_HOLD_MS;
use crate::hal::gpio::{ProgramKey, StatusLed};
use crate::hal::timer::TimerService;
use crate::power::PowerHold;
use crate::scheduler::{Action, Supervisor};
use crate::store::{ProgramStore, StoreResult};
use crate::tuning::Frontend;
use crate::types::{JammerProgram, VcoBand};

/// State of the foreground loop after one iteration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// Keep polling
    Running,
    /// Supply released; nothing more to do
    Halted,
}

/// Wait for the key to be held long enough to switch on
///
/// Returns `false` if it is released early.
pub fn hold_to_power_on<T, K>(timers: &T, key: &mut ProgramKey<K>) -> bool
where
    T: TimerService + ?Sized,
    K: InputPin,
{
    let counters = timers.counters();
    let start = counters.now();
    while counters.now().wrapping_sub(start) < POWER_ON_HOLD_MS {
        if !key.is_pressed() {
            return false;
        }
        timers.idle();
    }
    true
}

/// The running device
pub struct Jammer<F, S, LED, KEY, HOLD> {
    frontend: F,
    store: ProgramStore<S>,
    led: StatusLed<LED>,
    key: ProgramKey<KEY>,
    hold: PowerHold<HOLD>,
    supervisor: Supervisor,
    active: usize,
}

impl<F, S, LED, KEY, HOLD> Jammer<F, S, LED, KEY, HOLD>
where
    F: Frontend,
    S: Storage,
    LED: OutputPin<Error = Infallible>,
    KEY: InputPin,
    HOLD: OutputPin<Error = Infallible>,
{
    /// Assemble the device; arms the battery grace countdown
    pub fn new(
        frontend: F,
        store: ProgramStore<S>,
        led: StatusLed<LED>,
        key: ProgramKey<KEY>,
        hold: PowerHold<HOLD>,
    ) -> Self {
        let supervisor = Supervisor::new(frontend.timers().counters());
        Self {
            frontend,
            store,
            led,
            key,
            hold,
            supervisor,
            active: 0,
        }
    }

    /// Bring the selected program on air
    ///
    /// An uncalibrated program is tuned first, without saving the result.
    /// Returns `None` when no program is stored.
    ///
    /// # Errors
    /// Returns a storage error
    pub fn activate(&mut self) -> StoreResult<Option<JammerProgram>, S::Error> {
        if self.store.count() == 0 {
            return Ok(None);
        }
        let index = self.store.selected()?;
        let mut program = self.store.get(index)?;
        self.active = index;

        if program.is_untuned() {
            info!("program {} untuned, calibrating", index + 1);
            program = self.store.tune(index, false, &mut self.frontend)?.program;
        } else {
            for band in VcoBand::ALL {
                let settings = program.band(band);
                if settings.is_enabled() && self.frontend.apply(band, settings.tuning).is_err() {
                    warn!("{} VCO could not be configured", band);
                }
            }
        }
        info!("program {} of {} active", index + 1, self.store.count());
        Ok(Some(program))
    }

    /// One foreground iteration
    ///
    /// # Errors
    /// Returns a storage error while switching programs
    pub fn service(&mut self) -> StoreResult<Status, S::Error> {
        let battery = self.frontend.sample_battery();
        let pressed = self.key.is_pressed();
        let poll = self
            .supervisor
            .poll(self.frontend.timers().counters(), battery, pressed, self.active);
        if let Some(lit) = poll.led {
            self.led.set(lit);
        }

        match poll.action {
            Action::None => Ok(Status::Running),
            Action::NextProgram => {
                self.led.off();
                self.frontend.power_down();
                self.supervisor.reset_led(self.frontend.timers().counters());
                if self.store.count() > 0 {
                    self.store.select_next(self.active)?;
                    self.activate()?;
                }
                Ok(Status::Running)
            }
            Action::PowerOff => {
                self.power_off();
                Ok(Status::Halted)
            }
            Action::BatteryCutoff | Action::Off => {
                self.led.off();
                self.frontend.power_down();
                self.hold.cut();
                Ok(Status::Halted)
            }
        }
    }

    /// Orderly switch-off
    pub fn power_off(&mut self) {
        self.frontend.power_down();
        self.hold.power_off(self.frontend.timers());
    }

    /// Index of the program on air
    #[must_use]
    pub const fn active(&self) -> usize {
        self.active
    }

    /// Store and front end, for the console menu
    pub fn parts(&mut self) -> (&mut ProgramStore<S>, &mut F) {
        (&mut self.store, &mut self.frontend)
    }

    /// Supply hold line
    pub fn hold(&self) -> &PowerHold<HOLD> {
        &self.hold
    }

    /// Status LED
    pub fn led(&self) -> &StatusLed<LED> {
        &self.led
    }
}
