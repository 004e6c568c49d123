//! One foreground iteration: battery, key and LED

use crate::hal::timer::{Countdown, Counters};
use crate::power::{BatteryStatus, BatteryVoltage, LowBatteryMonitor};
use crate::scheduler::key::{KeyEvent, KeyMachine};
use crate::scheduler::led::LedPattern;

/// What the foreground loop must do after a poll
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Keep running
    None,
    /// Short press: switch to the next program
    NextProgram,
    /// Long press: orderly power-off
    PowerOff,
    /// Battery grace ran out: cut the supply now
    BatteryCutoff,
    /// Already cut off; nothing runs any more
    Off,
}

impl Action {
    /// No further operation is possible
    #[must_use]
    pub const fn is_halted(self) -> bool {
        matches!(self, Self::BatteryCutoff | Self::Off)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Action {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::None => defmt::write!(f, "none"),
            Self::NextProgram => defmt::write!(f, "next"),
            Self::PowerOff => defmt::write!(f, "power off"),
            Self::BatteryCutoff => defmt::write!(f, "battery cutoff"),
            Self::Off => defmt::write!(f, "off"),
        }
    }
}

/// Result of one poll
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Poll {
    /// Requested action
    pub action: Action,
    /// New LED level if a phase ended
    pub led: Option<bool>,
}

/// Battery, key and LED state machines
#[derive(Clone, Copy, Debug)]
pub struct Supervisor {
    battery: LowBatteryMonitor,
    key: KeyMachine,
    led: LedPattern,
}

impl Supervisor {
    /// Create the machines and arm the battery grace countdown
    #[must_use]
    pub fn new(counters: &Counters) -> Self {
        Self {
            battery: LowBatteryMonitor::new(counters),
            key: KeyMachine::new(),
            led: LedPattern::new(),
        }
    }

    /// Run one iteration
    pub fn poll(
        &mut self,
        counters: &Counters,
        battery_raw: u16,
        key_pressed: bool,
        program_index: usize,
    ) -> Poll {
        match self.battery.update(counters, BatteryVoltage::from_adc(battery_raw)) {
            BatteryStatus::Cutoff => {
                return Poll {
                    action: Action::BatteryCutoff,
                    led: Some(false),
                }
            }
            BatteryStatus::Off => {
                return Poll {
                    action: Action::Off,
                    led: None,
                }
            }
            BatteryStatus::Healthy | BatteryStatus::Draining => {}
        }

        let action = match self.key.update(key_pressed, counters.now()) {
            Some(KeyEvent::Short) => Action::NextProgram,
            Some(KeyEvent::Long) => Action::PowerOff,
            Some(event @ (KeyEvent::Bounce | KeyEvent::Expired)) => {
                debug!("key {} ignored", event);
                Action::None
            }
            None => Action::None,
        };
        if action != Action::None {
            info!("key: {}", action);
        }

        let led = if counters.expired(Countdown::LedPhase) {
            let step = self.led.advance(program_index);
            counters.set(Countdown::LedPhase, step.hold_ms);
            Some(step.lit)
        } else {
            None
        };

        Poll { action, led }
    }

    /// Restart the blink pattern (after a program switch)
    pub fn reset_led(&mut self, counters: &Counters) {
        self.led.reset();
        counters.set(Countdown::LedPhase, 0);
    }
}
