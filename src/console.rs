//! Console
//!
//! The serial maintenance interface: number input, the add-program
//! wizard, the program menu and the bench commands.

pub mod input;
pub mod menu;
pub mod selftest;
pub mod wizard;

pub use menu::{Command, Console, MenuExit};
pub use selftest::{BenchCommand, BenchState};
pub use wizard::{AddProgramWizard, WizardError, WizardState};

/// Console errors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsoleError<E> {
    /// Transport error
    Io(E),
    /// Input stream ended
    Eof,
    /// Program storage failed
    Storage,
    /// The store refused a request the menu had already validated
    Rejected,
}

#[cfg(feature = "embedded")]
impl<E> defmt::Format for ConsoleError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Io(_) => defmt::write!(f, "io error"),
            Self::Eof => defmt::write!(f, "end of input"),
            Self::Storage => defmt::write!(f, "storage error"),
            Self::Rejected => defmt::write!(f, "rejected"),
        }
    }
}

/// Result alias for console operations
pub type ConsoleResult<T, E> = Result<T, ConsoleError<E>>;
