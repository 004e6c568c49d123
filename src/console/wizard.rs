//! Add-program wizard
//!
//! A table of steps, one per frequency entry. Each step names the band and
//! field it fills, the prompt, and where to go next. Entering 0 at a start
//! step switches that band off and skips its end step; an out-of-range
//! value stays on the same step.

use crate::types::{BandSettings, JammerProgram, Mhz, VcoBand};

/// Wizard position
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WizardState {
    /// Waiting for the high band start frequency
    AwaitHighStart,
    /// Waiting for the high band end frequency
    AwaitHighEnd,
    /// Waiting for the low band start frequency
    AwaitLowStart,
    /// Waiting for the low band end frequency
    AwaitLowEnd,
    /// All entries collected
    Save,
}

/// Rejected entry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WizardError {
    /// Below the band's lowest frequency
    TooLow,
    /// Above the band's highest frequency
    TooHigh,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    Start,
    End,
}

struct Step {
    state: WizardState,
    band: VcoBand,
    field: Field,
    prompt: &'static str,
    next: WizardState,
    /// Where a 0 entry leads; `None` if 0 is just out of range
    off: Option<WizardState>,
}

const STEPS: [Step; 4] = [
    Step {
        state: WizardState::AwaitHighStart,
        band: VcoBand::High,
        field: Field::Start,
        prompt: "High band VCO\nstart: ",
        next: WizardState::AwaitHighEnd,
        off: Some(WizardState::AwaitLowStart),
    },
    Step {
        state: WizardState::AwaitHighEnd,
        band: VcoBand::High,
        field: Field::End,
        prompt: "end: ",
        next: WizardState::AwaitLowStart,
        off: None,
    },
    Step {
        state: WizardState::AwaitLowStart,
        band: VcoBand::Low,
        field: Field::Start,
        prompt: "\nLow band VCO\nstart: ",
        next: WizardState::AwaitLowEnd,
        off: Some(WizardState::Save),
    },
    Step {
        state: WizardState::AwaitLowEnd,
        band: VcoBand::Low,
        field: Field::End,
        prompt: "end: ",
        next: WizardState::Save,
        off: None,
    },
];

fn step(state: WizardState) -> Option<&'static Step> {
    STEPS.iter().find(|s| s.state == state)
}

/// Collects the frequencies of a new program
#[derive(Clone, Copy, Debug)]
pub struct AddProgramWizard {
    state: WizardState,
    program: JammerProgram,
}

impl AddProgramWizard {
    /// Start at the high band start frequency with both bands off
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: WizardState::AwaitHighStart,
            program: JammerProgram::new(BandSettings::OFF, BandSettings::OFF),
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> WizardState {
        self.state
    }

    /// Prompt for the current state (`None` once saved)
    #[must_use]
    pub fn prompt(&self) -> Option<&'static str> {
        step(self.state).map(|s| s.prompt)
    }

    /// Feed one entry and return the new state
    ///
    /// # Errors
    /// `TooLow`/`TooHigh` when the value is outside the band; the state
    /// does not change.
    pub fn feed(&mut self, mhz: Mhz) -> Result<WizardState, WizardError> {
        let Some(step) = step(self.state) else {
            return Ok(self.state);
        };

        if mhz == 0 {
            if let Some(off) = step.off {
                *self.program.band_mut(step.band) = BandSettings::OFF;
                self.state = off;
                return Ok(off);
            }
        }
        if mhz < step.band.min_mhz() {
            return Err(WizardError::TooLow);
        }
        if mhz > step.band.max_mhz() {
            return Err(WizardError::TooHigh);
        }

        let band = self.program.band_mut(step.band);
        match step.field {
            Field::Start => band.start = mhz,
            Field::End => band.end = mhz,
        }
        self.state = step.next;
        Ok(step.next)
    }

    /// The collected program, or `None` when both bands are off
    #[must_use]
    pub fn finish(&self) -> Option<JammerProgram> {
        (self.state == WizardState::Save && self.program.has_enabled_band()).then_some(self.program)
    }
}

impl Default for AddProgramWizard {
    fn default() -> Self {
        Self::new()
    }
}
