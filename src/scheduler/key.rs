//! Program key debouncing and press classification

use crate::config::{LONG_PRESS_MAX_MS, SHORT_PRESS_MAX_MS, TICK_PERIOD_MS};

/// Key state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KeyState {
    /// Not pressed
    #[default]
    Idle,
    /// Held since the given tick
    Pressed {
        /// Tick count at the press edge
        since: u32,
    },
}

/// Classified key release
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyEvent {
    /// Released within the same tick: contact bounce
    Bounce,
    /// Up to 0.8 s: select next program
    Short,
    /// Up to 5 s: power off
    Long,
    /// Held longer than a long press: ignored
    Expired,
}

#[cfg(feature = "embedded")]
impl defmt::Format for KeyEvent {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Bounce => defmt::write!(f, "bounce"),
            Self::Short => defmt::write!(f, "short"),
            Self::Long => defmt::write!(f, "long"),
            Self::Expired => defmt::write!(f, "expired"),
        }
    }
}

/// Classify a press by its length in ticks
#[must_use]
pub const fn classify(elapsed_ticks: u32) -> KeyEvent {
    let ms = elapsed_ticks.saturating_mul(TICK_PERIOD_MS);
    if ms == 0 {
        KeyEvent::Bounce
    } else if ms <= SHORT_PRESS_MAX_MS {
        KeyEvent::Short
    } else if ms <= LONG_PRESS_MAX_MS {
        KeyEvent::Long
    } else {
        KeyEvent::Expired
    }
}

/// Idle/Pressed state machine fed once per foreground iteration
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyMachine {
    state: KeyState,
}

impl KeyMachine {
    /// Start idle
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: KeyState::Idle,
        }
    }

    /// Feed the current key level and tick count; returns an event on release
    pub fn update(&mut self, pressed: bool, now: u32) -> Option<KeyEvent> {
        match (self.state, pressed) {
            (KeyState::Idle, true) => {
                self.state = KeyState::Pressed { since: now };
                None
            }
            (KeyState::Pressed { since }, false) => {
                self.state = KeyState::Idle;
                Some(classify(now.wrapping_sub(since)))
            }
            _ => None,
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> KeyState {
        self.state
    }
}
