//! Timer Abstractions
//!
//! The 1 ms tick interrupt and the foreground share a handful of counters.
//! The tick side only ever decrements (never below zero); the foreground
//! arms a counter and polls it. Everything that waits goes through
//! [`TimerService::delay_ms`], so a fake tick source can drive the whole
//! foreground on the host.

use core::sync::atomic::{AtomicU16, AtomicU32, Ordering};

/// Down-counters serviced by the tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Countdown {
    /// Blocking wait used by every "wait N ms"
    Delay,
    /// Remaining time of the current LED phase
    LedPhase,
    /// Ticks left before a low battery forces power-off
    LowBatteryGrace,
}

impl Countdown {
    const fn slot(self) -> usize {
        match self {
            Self::Delay => 0,
            Self::LedPhase => 1,
            Self::LowBatteryGrace => 2,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Countdown {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Delay => defmt::write!(f, "DELAY"),
            Self::LedPhase => defmt::write!(f, "LED"),
            Self::LowBatteryGrace => defmt::write!(f, "BATT"),
        }
    }
}

/// Counters shared between the tick interrupt and the foreground
///
/// The key debounce counter is a free-running tick count rather than a
/// down-counter: the key state machine captures it at the press edge and
/// measures the elapsed ticks on release.
#[derive(Debug)]
pub struct Counters {
    countdowns: [AtomicU16; 3],
    ticks: AtomicU32,
}

impl Counters {
    /// All counters at zero
    #[must_use]
    pub const fn new() -> Self {
        Self {
            countdowns: [AtomicU16::new(0), AtomicU16::new(0), AtomicU16::new(0)],
            ticks: AtomicU32::new(0),
        }
    }

    /// Tick handler body: decrement-if-positive on every countdown
    pub fn tick(&self) {
        for counter in &self.countdowns {
            // Err means the counter already sits at zero
            let _ = counter.fetch_update(Ordering::AcqRel, Ordering::Acquire, |v| v.checked_sub(1));
        }
        self.ticks.fetch_add(1, Ordering::AcqRel);
    }

    /// Arm a countdown
    pub fn set(&self, which: Countdown, ticks: u16) {
        self.countdowns[which.slot()].store(ticks, Ordering::Release);
    }

    /// Ticks left on a countdown
    #[must_use]
    pub fn remaining(&self, which: Countdown) -> u16 {
        self.countdowns[which.slot()].load(Ordering::Acquire)
    }

    /// Countdown has reached zero
    #[must_use]
    pub fn expired(&self, which: Countdown) -> bool {
        self.remaining(which) == 0
    }

    /// Free-running tick count (wraps)
    #[must_use]
    pub fn now(&self) -> u32 {
        self.ticks.load(Ordering::Acquire)
    }
}

impl Default for Counters {
    fn default() -> Self {
        Self::new()
    }
}

/// Foreground view of the tick source
pub trait TimerService {
    /// Shared counters
    fn counters(&self) -> &Counters;

    /// Called while busy-waiting; the tick interrupt stays live meanwhile
    fn idle(&self);

    /// Busy-wait for `ms` ticks
    fn delay_ms(&self, ms: u16) {
        let counters = self.counters();
        counters.set(Countdown::Delay, ms);
        while !counters.expired(Countdown::Delay) {
            self.idle();
        }
    }
}

impl<T: TimerService + ?Sized> TimerService for &T {
    fn counters(&self) -> &Counters {
        (**self).counters()
    }

    fn idle(&self) {
        (**self).idle();
    }
}

/// Tick source backed by a real periodic interrupt
#[derive(Clone, Copy, Debug)]
pub struct SystemTimers {
    counters: &'static Counters,
}

impl SystemTimers {
    /// Wrap the counters the tick interrupt decrements
    #[must_use]
    pub const fn new(counters: &'static Counters) -> Self {
        Self { counters }
    }
}

impl TimerService for SystemTimers {
    fn counters(&self) -> &Counters {
        self.counters
    }

    fn idle(&self) {
        core::hint::spin_loop();
    }
}
