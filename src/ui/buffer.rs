//! Frame output buffer
//!
//! A frame is accumulated here and handed to the terminal in a single
//! write, so the screen never shows a half-drawn frame.

use std::io;

use tracing::trace;

use crate::core::tty::TerminalDevice;

/// Append-only byte accumulator for one frame
#[derive(Debug, Default)]
pub struct OutputBuffer {
    bytes: Vec<u8>,
    /// Appends that would grow the frame past this are dropped
    limit: Option<usize>,
    dropped: usize,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Add bytes to the end of the frame.
    ///
    /// If the buffer cannot grow (allocation failure or the frame limit) the
    /// bytes are dropped and the frame is drawn incomplete.
    pub fn append(&mut self, bytes: &[u8]) {
        let over_limit = self
            .limit
            .map_or(false, |limit| self.bytes.len() + bytes.len() > limit);
        if over_limit || self.bytes.try_reserve(bytes.len()).is_err() {
            self.dropped += bytes.len();
            trace!(len = bytes.len(), "frame append dropped");
            return;
        }
        self.bytes.extend_from_slice(bytes);
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Lift the frame ceiling; later appends only fail on allocation
    pub fn remove_limit(&mut self) {
        self.limit = None;
    }

    /// Bytes lost to failed appends
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Write the whole frame in one call and release it
    pub fn flush_to<D: TerminalDevice + ?Sized>(self, device: &mut D) -> io::Result<usize> {
        device.write(&self.bytes)
    }

    #[cfg(test)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Lets crossterm commands be queued straight into a frame
impl io::Write for OutputBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // Dropped bytes are reported as written; a lost append is not an error
        self.append(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
