//! Program Store
//!
//! Up to [`MAX_PROGRAMS`](crate::config::MAX_PROGRAMS) jammer programs
//! kept in byte-addressable non-volatile storage, behind a validity marker.

pub mod layout;
pub mod programs;

pub use programs::{BandOutcome, ProgramStore, TuneReport};

/// Program store errors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreError<E> {
    /// Every slot is used
    Full,
    /// No program at that index
    InvalidIndex,
    /// Program has no enabled band
    NothingToSave,
    /// Storage back-end failure
    Storage(E),
}

#[cfg(feature = "embedded")]
impl<E> defmt::Format for StoreError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Full => defmt::write!(f, "full"),
            Self::InvalidIndex => defmt::write!(f, "invalid index"),
            Self::NothingToSave => defmt::write!(f, "nothing to save"),
            Self::Storage(_) => defmt::write!(f, "storage error"),
        }
    }
}

/// Result alias for store operations
pub type StoreResult<T, E> = Result<T, StoreError<E>>;
