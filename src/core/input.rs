//! Keyboard input
//!
//! Raw mode sets a short inter-byte timeout, so a read can come back empty.
//! Some platforms (Cygwin among them) report that timeout as `EAGAIN`
//! instead of a zero-length read; both mean "nothing yet, try again".

use std::io;

use super::tty::{Result, TerminalDevice, TerminalError};

/// Block until one byte of input arrives
pub fn read_byte<D: TerminalDevice + ?Sized>(device: &mut D) -> Result<u8> {
    let mut byte = [0u8; 1];
    loop {
        match device.read(&mut byte) {
            Ok(1) => return Ok(byte[0]),
            Ok(_) => continue,
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => continue,
            Err(e) => return Err(TerminalError::Read(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{FakeTerminal, ReadEvent};

    #[test]
    fn test_returns_available_byte() {
        let mut fake = FakeTerminal::new();
        fake.push_bytes(b"q");
        assert_eq!(read_byte(&mut fake).unwrap(), b'q');
    }

    #[test]
    fn test_retries_after_timeouts() {
        let mut fake = FakeTerminal::new();
        fake.push(ReadEvent::Timeout);
        fake.push(ReadEvent::Timeout);
        fake.push(ReadEvent::Byte(0x11));

        assert_eq!(read_byte(&mut fake).unwrap(), 0x11);
        assert_eq!(fake.pending_reads(), 0);
    }

    #[test]
    fn test_would_block_is_a_timeout() {
        let mut fake = FakeTerminal::new();
        fake.push(ReadEvent::WouldBlock);
        fake.push(ReadEvent::Timeout);
        fake.push(ReadEvent::WouldBlock);
        fake.push(ReadEvent::Byte(b'x'));

        assert_eq!(read_byte(&mut fake).unwrap(), b'x');
    }

    #[test]
    fn test_other_errors_are_fatal() {
        let mut fake = FakeTerminal::new();
        fake.push(ReadEvent::Timeout);
        fake.push(ReadEvent::Fail(io::ErrorKind::PermissionDenied));
        fake.push_bytes(b"x");

        let err = read_byte(&mut fake).unwrap_err();
        assert!(matches!(err, TerminalError::Read(ref e) if e.kind() == io::ErrorKind::PermissionDenied));
        // The byte after the failure is never consumed
        assert_eq!(fake.pending_reads(), 1);
    }

    #[test]
    fn test_consecutive_bytes() {
        let mut fake = FakeTerminal::new();
        fake.push_bytes(b"ab");
        assert_eq!(read_byte(&mut fake).unwrap(), b'a');
        assert_eq!(read_byte(&mut fake).unwrap(), b'b');
    }
}
