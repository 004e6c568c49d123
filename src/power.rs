//! Power Management
//!
//! Battery monitoring and the supply hold line. The device only stays on
//! while the firmware drives the hold line high; releasing it is the only
//! way to switch off.

use core::convert::Infallible;

use embedded_hal::digital::OutputPin;

use crate::config::{BATTERY_THRESHOLD, LOW_BATTERY_GRACE_TICKS, POWER_OFF_DELAY_MS};
use crate::hal::timer::{Countdown, Counters, TimerService};

/// Battery voltage reading
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatteryVoltage {
    /// Raw ADC reading of the divider
    raw: u16,
}

impl BatteryVoltage {
    /// Create from ADC reading
    #[must_use]
    pub const fn from_adc(raw: u16) -> Self {
        Self { raw }
    }

    /// Raw ADC value
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.raw
    }

    /// Above the cutoff threshold
    #[must_use]
    pub const fn is_healthy(self) -> bool {
        self.raw > BATTERY_THRESHOLD
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for BatteryVoltage {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "BATT({})", self.raw);
    }
}

/// Outcome of one battery check
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatteryStatus {
    /// Above threshold; grace period re-armed
    Healthy,
    /// Below threshold, grace period still running
    Draining,
    /// Grace period ran out just now: power off
    Cutoff,
    /// Cutoff already reported
    Off,
}

/// Forces power-off after a continuous stretch of low battery readings
///
/// Every healthy reading re-arms the grace countdown. The tick keeps
/// running during blocking waits, so the countdown also expires in the
/// middle of a calibration. The cutoff is reported exactly once.
#[derive(Clone, Copy, Debug, Default)]
pub struct LowBatteryMonitor {
    tripped: bool,
}

impl LowBatteryMonitor {
    /// Create the monitor and arm the grace countdown
    #[must_use]
    pub fn new(counters: &Counters) -> Self {
        counters.set(Countdown::LowBatteryGrace, LOW_BATTERY_GRACE_TICKS);
        Self { tripped: false }
    }

    /// Feed one battery sample
    pub fn update(&mut self, counters: &Counters, battery: BatteryVoltage) -> BatteryStatus {
        if self.tripped {
            return BatteryStatus::Off;
        }
        if battery.is_healthy() {
            counters.set(Countdown::LowBatteryGrace, LOW_BATTERY_GRACE_TICKS);
            BatteryStatus::Healthy
        } else if counters.expired(Countdown::LowBatteryGrace) {
            self.tripped = true;
            error!("battery low ({}), powering off", battery.raw());
            BatteryStatus::Cutoff
        } else {
            BatteryStatus::Draining
        }
    }

    /// Cutoff has been reported
    #[must_use]
    pub const fn is_tripped(&self) -> bool {
        self.tripped
    }
}

/// Supply hold line
pub struct PowerHold<P> {
    pin: P,
    latched: bool,
}

impl<P: OutputPin<Error = Infallible>> PowerHold<P> {
    /// Wrap the hold line without changing it
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            latched: false,
        }
    }

    /// Keep the device powered after the key is released
    pub fn latch(&mut self) {
        let _ = self.pin.set_high();
        self.latched = true;
    }

    /// Orderly switch-off: give the console time to drain, then release
    pub fn power_off<T: TimerService + ?Sized>(&mut self, timers: &T) {
        info!("powering off");
        timers.delay_ms(POWER_OFF_DELAY_MS);
        self.cut();
    }

    /// Release the hold line immediately
    pub fn cut(&mut self) {
        let _ = self.pin.set_low();
        self.latched = false;
    }

    /// Hold line is driven high
    #[must_use]
    pub const fn is_latched(&self) -> bool {
        self.latched
    }
}
