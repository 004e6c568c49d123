//! Program indicator: the LED blinks (index + 1) times, then pauses

use crate::config::{LED_OFF_MS, LED_ON_MS, LED_PAUSE_MS};

/// One LED phase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LedStep {
    /// LED level for this phase
    pub lit: bool,
    /// Phase length in milliseconds
    pub hold_ms: u16,
}

/// Blink pattern state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LedPattern {
    blinks_remaining: u8,
    lit: bool,
}

impl LedPattern {
    /// Start with the pause
    #[must_use]
    pub const fn new() -> Self {
        Self {
            blinks_remaining: 0,
            lit: false,
        }
    }

    /// Advance to the next phase once the current one has run out
    pub fn advance(&mut self, program_index: usize) -> LedStep {
        if self.blinks_remaining == 0 {
            self.blinks_remaining = u8::try_from(program_index + 1).unwrap_or(u8::MAX);
            LedStep {
                lit: self.lit,
                hold_ms: LED_PAUSE_MS,
            }
        } else if self.lit {
            self.lit = false;
            self.blinks_remaining -= 1;
            LedStep {
                lit: false,
                hold_ms: LED_OFF_MS,
            }
        } else {
            self.lit = true;
            LedStep {
                lit: true,
                hold_ms: LED_ON_MS,
            }
        }
    }

    /// Restart from the pause with the LED off
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
