//! Byte layout of the program store
//!
//! ```text
//! 0..2   reserved (dummy word)
//! 2..4   validity marker, little endian
//! 4      program count
//! 5      selected program index
//! 6..    packed program records, RECORD_SIZE bytes each
//! ```
//!
//! A record holds, in order and little endian: high band start, end and dc
//! offset (u16 each), high band bandwidth (u8), then the same four fields
//! for the low band.

use crate::config::{MAX_PROGRAMS, STORAGE_CAPACITY};
use crate::types::{BandSettings, JammerProgram, TuningResult};

/// Offset of the validity marker
pub const MARKER_OFFSET: u32 = 2;
/// Offset of the program count
pub const COUNT_OFFSET: u32 = 4;
/// Offset of the selected index
pub const SELECTED_OFFSET: u32 = 5;
/// Offset of the first record
pub const RECORDS_OFFSET: u32 = 6;
/// Size of the header preceding the records
pub const HEADER_SIZE: usize = 6;

const BAND_SIZE: usize = 7;

/// Packed size of one program
pub const RECORD_SIZE: usize = 2 * BAND_SIZE;

/// Bytes used by a full store
pub const USED_SIZE: usize = HEADER_SIZE + MAX_PROGRAMS * RECORD_SIZE;

const _: () = assert!(USED_SIZE <= STORAGE_CAPACITY);

/// Offset of the record in slot `index`
#[must_use]
pub const fn record_offset(index: usize) -> u32 {
    RECORDS_OFFSET + (index * RECORD_SIZE) as u32
}

fn encode_band(band: &BandSettings, out: &mut [u8]) {
    out[0..2].copy_from_slice(&band.start.to_le_bytes());
    out[2..4].copy_from_slice(&band.end.to_le_bytes());
    out[4..6].copy_from_slice(&band.tuning.dc_offset.to_le_bytes());
    out[6] = band.tuning.bandwidth;
}

fn decode_band(bytes: &[u8]) -> BandSettings {
    BandSettings {
        start: u16::from_le_bytes([bytes[0], bytes[1]]),
        end: u16::from_le_bytes([bytes[2], bytes[3]]),
        tuning: TuningResult::new(u16::from_le_bytes([bytes[4], bytes[5]]), bytes[6]),
    }
}

/// Pack a program into its record
#[must_use]
pub fn encode(program: &JammerProgram) -> [u8; RECORD_SIZE] {
    let mut out = [0; RECORD_SIZE];
    let (high, low) = out.split_at_mut(BAND_SIZE);
    encode_band(&program.high, high);
    encode_band(&program.low, low);
    out
}

/// Unpack a record
#[must_use]
pub fn decode(bytes: &[u8; RECORD_SIZE]) -> JammerProgram {
    let (high, low) = bytes.split_at(BAND_SIZE);
    JammerProgram::new(decode_band(high), decode_band(low))
}
