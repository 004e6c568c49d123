//! Persistent program list
//!
//! Every mutation is written through to storage immediately. A record write
//! is not protected against power loss: a reset in the middle of one can
//! leave that record half-written, and nothing detects it.

use embedded_storage::Storage;
use heapless::Vec;

use crate::config::{MAX_PROGRAMS, STORAGE_CAPACITY, VALIDITY_MARKER};
use crate::store::layout::{self, RECORD_SIZE};
use crate::store::{StoreError, StoreResult};
use crate::tuning::{BandTuner, TuneError};
use crate::types::{JammerProgram, TuningResult, VcoBand};

/// What happened to one band during [`ProgramStore::tune`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BandOutcome {
    /// Band has no complete range
    Skipped,
    /// New calibration
    Tuned(TuningResult),
    /// Calibration failed; the previous result was kept
    Failed(TuneError),
}

/// Result of tuning one program
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TuneReport {
    /// Program with every successful calibration applied
    pub program: JammerProgram,
    /// Per-band outcome, indexed by [`VcoBand::index`]
    pub outcomes: [BandOutcome; 2],
    /// The record was written back
    pub persisted: bool,
}

impl TuneReport {
    /// Outcome for one band
    #[must_use]
    pub const fn outcome(&self, band: VcoBand) -> BandOutcome {
        self.outcomes[band.index()]
    }
}

/// Program list in non-volatile storage
pub struct ProgramStore<S> {
    storage: S,
    count: usize,
}

impl<S: Storage> ProgramStore<S> {
    /// Load the store, erasing it if the validity marker is missing
    ///
    /// # Errors
    /// Returns the storage error if the header cannot be read or rewritten
    pub fn open(mut storage: S) -> StoreResult<Self, S::Error> {
        let mut header = [0u8; layout::HEADER_SIZE];
        storage.read(0, &mut header).map_err(StoreError::Storage)?;

        let marker = u16::from_le_bytes([header[2], header[3]]);
        let mut store = Self { storage, count: 0 };
        if marker == VALIDITY_MARKER {
            store.count = usize::from(header[4]).min(MAX_PROGRAMS);
            debug!("program store: {} programs", store.count);
        } else {
            warn!("program store marker {=u16:#06x} invalid, erasing", marker);
            store.erase_all()?;
        }
        Ok(store)
    }

    /// Wipe every byte and write a fresh marker
    ///
    /// # Errors
    /// Returns the storage error on a failed write
    pub fn erase_all(&mut self) -> StoreResult<(), S::Error> {
        let zeros = [0u8; 64];
        let mut offset = 0;
        while offset < STORAGE_CAPACITY {
            let len = zeros.len().min(STORAGE_CAPACITY - offset);
            self.write(u32::try_from(offset).unwrap_or(u32::MAX), &zeros[..len])?;
            offset += len;
        }
        self.write(layout::MARKER_OFFSET, &VALIDITY_MARKER.to_le_bytes())?;
        self.count = 0;
        Ok(())
    }

    fn write(&mut self, offset: u32, bytes: &[u8]) -> StoreResult<(), S::Error> {
        self.storage.write(offset, bytes).map_err(StoreError::Storage)
    }

    fn write_count(&mut self, count: usize) -> StoreResult<(), S::Error> {
        let byte = u8::try_from(count).unwrap_or(u8::MAX);
        self.write(layout::COUNT_OFFSET, &[byte])?;
        self.count = count;
        Ok(())
    }

    fn read_record(&mut self, index: usize) -> StoreResult<JammerProgram, S::Error> {
        let mut bytes = [0u8; RECORD_SIZE];
        self.storage
            .read(layout::record_offset(index), &mut bytes)
            .map_err(StoreError::Storage)?;
        Ok(layout::decode(&bytes))
    }

    fn write_record(&mut self, index: usize, program: &JammerProgram) -> StoreResult<(), S::Error> {
        self.write(layout::record_offset(index), &layout::encode(program))
    }

    /// Number of stored programs
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// No slot left
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.count >= MAX_PROGRAMS
    }

    /// Read one program
    ///
    /// # Errors
    /// `InvalidIndex` past the end of the list
    pub fn get(&mut self, index: usize) -> StoreResult<JammerProgram, S::Error> {
        if index >= self.count {
            return Err(StoreError::InvalidIndex);
        }
        self.read_record(index)
    }

    /// Every stored program in order
    ///
    /// # Errors
    /// Returns the storage error on a failed read
    pub fn programs(&mut self) -> StoreResult<Vec<JammerProgram, MAX_PROGRAMS>, S::Error> {
        let mut out = Vec::new();
        for index in 0..self.count {
            let program = self.read_record(index)?;
            // Cannot overflow: count never exceeds MAX_PROGRAMS
            let _ = out.push(program);
        }
        Ok(out)
    }

    /// Append a program with its calibration cleared
    ///
    /// # Errors
    /// `Full` when every slot is used, `NothingToSave` when both bands
    /// are off. Neither changes the store.
    pub fn add(&mut self, program: &JammerProgram) -> StoreResult<usize, S::Error> {
        if self.is_full() {
            return Err(StoreError::Full);
        }
        if !program.has_enabled_band() {
            return Err(StoreError::NothingToSave);
        }
        let index = self.count;
        self.write_record(index, &program.without_tuning())?;
        self.write_count(index + 1)?;
        info!("program {} added", index + 1);
        Ok(index)
    }

    /// Remove a program, moving every later one down a slot
    ///
    /// # Errors
    /// `InvalidIndex` past the end of the list
    pub fn delete(&mut self, index: usize) -> StoreResult<(), S::Error> {
        if index >= self.count {
            return Err(StoreError::InvalidIndex);
        }
        for slot in index + 1..self.count {
            let program = self.read_record(slot)?;
            self.write_record(slot - 1, &program)?;
        }
        self.write_count(self.count - 1)?;
        info!("program {} deleted", index + 1);
        Ok(())
    }

    /// Calibrate every band of a program that has a complete range
    ///
    /// A band that fails keeps its previous result. With `persist` the
    /// record is rewritten once, after both bands.
    ///
    /// # Errors
    /// `InvalidIndex` past the end of the list, or a storage error
    pub fn tune<T: BandTuner + ?Sized>(
        &mut self,
        index: usize,
        persist: bool,
        tuner: &mut T,
    ) -> StoreResult<TuneReport, S::Error> {
        let mut program = self.get(index)?;
        let mut outcomes = [BandOutcome::Skipped; 2];

        for band in VcoBand::ALL {
            let settings = program.band(band);
            if !settings.is_tunable() {
                continue;
            }
            let (start, end) = (settings.start, settings.end);
            outcomes[band.index()] = match tuner.tune_band(band, start, end) {
                Ok(result) => {
                    program.band_mut(band).tuning = result;
                    BandOutcome::Tuned(result)
                }
                Err(err) => {
                    warn!("program {} {} band not tuned: {}", index + 1, band, err);
                    BandOutcome::Failed(err)
                }
            };
        }

        if persist {
            self.write_record(index, &program)?;
        }
        Ok(TuneReport {
            program,
            outcomes,
            persisted: persist,
        })
    }

    /// Persisted selection, reset to 0 when out of range
    ///
    /// # Errors
    /// Returns the storage error on a failed read
    pub fn selected(&mut self) -> StoreResult<usize, S::Error> {
        let mut byte = [0u8; 1];
        self.storage
            .read(layout::SELECTED_OFFSET, &mut byte)
            .map_err(StoreError::Storage)?;
        let index = usize::from(byte[0]);
        Ok(if index < self.count { index } else { 0 })
    }

    /// Persist the selection
    ///
    /// # Errors
    /// `InvalidIndex` past the end of the list
    pub fn select(&mut self, index: usize) -> StoreResult<(), S::Error> {
        if index >= self.count {
            return Err(StoreError::InvalidIndex);
        }
        let byte = u8::try_from(index).unwrap_or(0);
        self.write(layout::SELECTED_OFFSET, &[byte])
    }

    /// Select the program after `current`, wrapping to the first
    ///
    /// # Errors
    /// `InvalidIndex` when the store is empty
    pub fn select_next(&mut self, current: usize) -> StoreResult<usize, S::Error> {
        if self.count == 0 {
            return Err(StoreError::InvalidIndex);
        }
        let next = (current + 1) % self.count;
        self.select(next)?;
        Ok(next)
    }

    /// Give the storage back
    pub fn into_inner(self) -> S {
        self.storage
    }
}
