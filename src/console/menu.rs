//! Serial maintenance menu
//!
//! Lists, adds, deletes, tunes and erases programs over the console, and
//! gives access to the bench commands.

use core::fmt::Write as _;

use embedded_io::{Read, ReadReady, Write};
use embedded_storage::Storage;
use heapless::String;

use crate::config::MAX_PROGRAMS;
use crate::console::input::{read_byte, read_u16, write_str};
use crate::console::selftest::{BenchCommand, BenchState};
use crate::console::wizard::{AddProgramWizard, WizardError, WizardState};
use crate::console::{ConsoleError, ConsoleResult};
use crate::store::{BandOutcome, ProgramStore, StoreError};
use crate::tuning::{Frontend, TuneError};
use crate::types::{BandSettings, JammerProgram, VcoBand};

const DIVIDER: &str = "------------------------------\n";

const MENU: &str = " p > Display progs\n \
a > Add prog\n \
d > Delete prog\n \
t > Tune prog\n \
e > Erase all\n \
b > Bench tests\n \
q > Quit menu\n \
o > Power off\n";

/// Menu command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// List programs
    List,
    /// Add a program
    Add,
    /// Delete a program
    Delete,
    /// Tune a program and save the result
    Tune,
    /// Erase every program
    EraseAll,
    /// Bench command mode
    Bench,
    /// Leave the menu
    Quit,
    /// Switch off
    PowerOff,
}

impl Command {
    /// Look up a command letter
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            b'p' => Self::List,
            b'a' => Self::Add,
            b'd' => Self::Delete,
            b't' => Self::Tune,
            b'e' => Self::EraseAll,
            b'b' => Self::Bench,
            b'q' => Self::Quit,
            b'o' => Self::PowerOff,
            _ => return None,
        })
    }
}

/// How the menu was left
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuExit {
    /// Back to normal operation
    Quit,
    /// The caller must power off
    PowerOff,
}

/// Console on a byte stream
pub struct Console<IO> {
    io: IO,
}

impl<IO: Read + Write + ReadReady> Console<IO> {
    /// Wrap the console transport
    pub fn new(io: IO) -> Self {
        Self { io }
    }

    /// Give the transport back
    pub fn into_inner(self) -> IO {
        self.io
    }

    /// Write a string
    ///
    /// # Errors
    /// `Io` on a transport error
    pub fn print(&mut self, s: &str) -> ConsoleResult<(), IO::Error> {
        write_str(&mut self.io, s)
    }

    fn print_fmt(&mut self, args: core::fmt::Arguments<'_>) -> ConsoleResult<(), IO::Error> {
        let mut line: String<96> = String::new();
        // Overlong lines are truncated
        let _ = line.write_fmt(args);
        self.print(&line)
    }

    /// An ASCII byte is waiting: the user wants the menu
    ///
    /// # Errors
    /// `Io` on a transport error
    pub fn poll_for_menu(&mut self) -> ConsoleResult<bool, IO::Error> {
        if !self.io.read_ready().map_err(ConsoleError::Io)? {
            return Ok(false);
        }
        Ok(read_byte(&mut self.io)?.is_ascii())
    }

    /// Show a program as the menu and the boot banner do
    ///
    /// # Errors
    /// `Io` on a transport error
    pub fn print_program(&mut self, program: &JammerProgram, index: usize, count: usize) -> ConsoleResult<(), IO::Error> {
        self.print(DIVIDER)?;
        self.print_fmt(format_args!("Program #{} of {}\n", index + 1, count))?;
        self.print_band("High band VCO: ", &program.high)?;
        self.print_band("Low band VCO: ", &program.low)
    }

    fn print_band(&mut self, label: &str, band: &BandSettings) -> ConsoleResult<(), IO::Error> {
        self.print(label)?;
        if band.is_enabled() {
            self.print_fmt(format_args!(
                "{} -> {} ({}, {})\n",
                band.start, band.end, band.tuning.dc_offset, band.tuning.bandwidth
            ))
        } else {
            self.print("OFF\n")
        }
    }

    fn list<S: Storage>(&mut self, store: &mut ProgramStore<S>) -> ConsoleResult<(), IO::Error> {
        let programs = store.programs().map_err(storage_failed)?;
        self.print_fmt(format_args!("{} of {} programs in memory\n", programs.len(), MAX_PROGRAMS))?;
        for (index, program) in programs.iter().enumerate() {
            self.print_program(program, index, programs.len())?;
        }
        Ok(())
    }

    fn add<S: Storage>(&mut self, store: &mut ProgramStore<S>) -> ConsoleResult<(), IO::Error> {
        if store.is_full() {
            return self.print("Memory full.\n");
        }
        self.print("Enter start and stop frequency for each VCO.\nEnter 0 to turn OFF VCO.\n")?;
        self.print("Low Band: 345-1350MHz - High Band 1225-2715MHz\n\n")?;

        let mut wizard = AddProgramWizard::new();
        while let Some(prompt) = wizard.prompt() {
            self.print(prompt)?;
            let mhz = read_u16(&mut self.io)?;
            match wizard.feed(mhz) {
                Ok(_) => {}
                Err(WizardError::TooLow) => self.print("Frequency too low.\n")?,
                Err(WizardError::TooHigh) => self.print("Frequency too high.\n")?,
            }
        }
        debug_assert_eq!(wizard.state(), WizardState::Save);

        let Some(program) = wizard.finish() else {
            return self.print("Nothing to save.\n");
        };
        match store.add(&program) {
            Ok(index) => self.print_fmt(format_args!("Saved program {}\n", index + 1)),
            Err(StoreError::Full) => self.print("Memory full.\n"),
            Err(StoreError::NothingToSave) => self.print("Nothing to save.\n"),
            Err(err) => Err(storage_failed(err)),
        }
    }

    /// Ask for a 1-based program number; `None` if out of range
    fn ask_index<S: Storage>(&mut self, store: &mut ProgramStore<S>, prompt: &str) -> ConsoleResult<Option<usize>, IO::Error> {
        self.list(store)?;
        self.print(DIVIDER)?;
        self.print(prompt)?;
        let number = usize::from(read_u16(&mut self.io)?);
        if number == 0 || number > store.count() {
            self.print("Invalid #\n")?;
            return Ok(None);
        }
        Ok(Some(number - 1))
    }

    fn delete<S: Storage>(&mut self, store: &mut ProgramStore<S>) -> ConsoleResult<(), IO::Error> {
        if let Some(index) = self.ask_index(store, "Delete #? ")? {
            store.delete(index).map_err(storage_failed)?;
            self.print_fmt(format_args!("Deleted program {}\n", index + 1))?;
        }
        Ok(())
    }

    fn tune<S: Storage, F: Frontend>(&mut self, store: &mut ProgramStore<S>, frontend: &mut F) -> ConsoleResult<(), IO::Error> {
        if store.count() == 0 {
            return self.print("No programs stored.\n");
        }
        let Some(index) = self.ask_index(store, "Tune prog # ")? else {
            return Ok(());
        };
        let report = store.tune(index, true, frontend).map_err(storage_failed)?;
        for band in VcoBand::ALL {
            let name = match band {
                VcoBand::High => "High",
                VcoBand::Low => "Low",
            };
            match report.outcome(band) {
                BandOutcome::Skipped => {}
                BandOutcome::Tuned(result) => self.print_fmt(format_args!(
                    "{} band VCO: midpoint {}, bandwidth {}\n",
                    name, result.dc_offset, result.bandwidth
                ))?,
                BandOutcome::Failed(TuneError::RangeTooHigh) => {
                    self.print_fmt(format_args!("{name} band VCO range is too high!\n"))?;
                }
                BandOutcome::Failed(TuneError::RangeTooLow) => {
                    self.print_fmt(format_args!("{name} band VCO range is too low!\n"))?;
                }
                BandOutcome::Failed(TuneError::Register(_)) => {
                    self.print_fmt(format_args!("{name} band VCO not responding.\n"))?;
                }
            }
        }
        self.print_program(&report.program, index, store.count())
    }

    fn erase<S: Storage>(&mut self, store: &mut ProgramStore<S>) -> ConsoleResult<(), IO::Error> {
        self.print("Erase all programs? y/n: ")?;
        let answer = read_byte(&mut self.io)?;
        self.io.write_all(&[answer, b'\n']).map_err(ConsoleError::Io)?;
        if answer == b'y' {
            store.erase_all().map_err(storage_failed)?;
            self.print("All programs erased.\n")?;
        }
        Ok(())
    }

    /// Bench mode: one command letter at a time until `q` or `o`
    fn bench<F: Frontend>(&mut self, frontend: &mut F) -> ConsoleResult<MenuExit, IO::Error> {
        let mut state = BenchState::default();
        loop {
            self.print("bench> ")?;
            let byte = read_byte(&mut self.io)?;
            self.io.write_all(&[byte, b'\n']).map_err(ConsoleError::Io)?;
            match (byte, BenchCommand::from_byte(byte)) {
                (b'q', _) => return Ok(MenuExit::Quit),
                (b'o', _) => return Ok(MenuExit::PowerOff),
                (_, Some(cmd)) => {
                    if frontend.bench(cmd, &mut state).is_err() {
                        self.print("Bus error.\n")?;
                    }
                }
                (_, None) => self.print("Bad command.\n")?,
            }
        }
    }

    /// Run the menu until `q` or `o`
    ///
    /// # Errors
    /// Transport errors, end of input, or a storage failure
    pub fn run_menu<S: Storage, F: Frontend>(
        &mut self,
        store: &mut ProgramStore<S>,
        frontend: &mut F,
    ) -> ConsoleResult<MenuExit, IO::Error> {
        loop {
            self.print(DIVIDER)?;
            self.print(MENU)?;
            self.print(DIVIDER)?;
            self.print("=> ")?;
            let byte = read_byte(&mut self.io)?;
            self.io.write_all(&[byte, b'\n']).map_err(ConsoleError::Io)?;

            match Command::from_byte(byte) {
                Some(Command::List) => self.list(store)?,
                Some(Command::Add) => self.add(store)?,
                Some(Command::Delete) => self.delete(store)?,
                Some(Command::Tune) => self.tune(store, frontend)?,
                Some(Command::EraseAll) => self.erase(store)?,
                Some(Command::Bench) => {
                    if self.bench(frontend)? == MenuExit::PowerOff {
                        self.print("Powering OFF...\n")?;
                        return Ok(MenuExit::PowerOff);
                    }
                }
                Some(Command::Quit) => return Ok(MenuExit::Quit),
                Some(Command::PowerOff) => {
                    self.print("Powering OFF...\n")?;
                    return Ok(MenuExit::PowerOff);
                }
                None => self.print("Bad command.\n")?,
            }
        }
    }
}

fn storage_failed<IE, SE>(err: StoreError<SE>) -> ConsoleError<IE> {
    match err {
        StoreError::Storage(_) => ConsoleError::Storage,
        StoreError::Full | StoreError::InvalidIndex | StoreError::NothingToSave => ConsoleError::Rejected,
    }
}
