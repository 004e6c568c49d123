//! Byte-level console helpers
//!
//! Numbers arrive as decimal ASCII terminated by CR or LF. Digits are
//! echoed, anything else is ignored, and the value saturates at `u16::MAX`.

use embedded_io::{Read, Write};

use crate::console::ConsoleError;

/// Block until one byte arrives
///
/// # Errors
/// `Eof` when the stream has ended, `Io` on a transport error
pub fn read_byte<R: Read>(io: &mut R) -> Result<u8, ConsoleError<R::Error>> {
    let mut byte = [0u8; 1];
    match io.read(&mut byte).map_err(ConsoleError::Io)? {
        0 => Err(ConsoleError::Eof),
        _ => Ok(byte[0]),
    }
}

/// Write a string
///
/// # Errors
/// `Io` on a transport error
pub fn write_str<W: Write>(io: &mut W, s: &str) -> Result<(), ConsoleError<W::Error>> {
    io.write_all(s.as_bytes()).map_err(ConsoleError::Io)
}

/// Read a decimal number terminated by CR or LF
///
/// # Errors
/// `Eof` when the stream ends before a terminator, `Io` on a transport error
pub fn read_u16<IO: Read + Write>(io: &mut IO) -> Result<u16, ConsoleError<IO::Error>> {
    let mut value: u16 = 0;
    loop {
        let byte = read_byte(io)?;
        match byte {
            b'\r' | b'\n' => {
                io.write_all(b"\n").map_err(ConsoleError::Io)?;
                return Ok(value);
            }
            b'0'..=b'9' => {
                io.write_all(&[byte]).map_err(ConsoleError::Io)?;
                value = value
                    .saturating_mul(10)
                    .saturating_add(u16::from(byte - b'0'));
            }
            _ => {}
        }
    }
}
