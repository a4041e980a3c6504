//! Raw-mode session
//!
//! Owns the controlling terminal for the lifetime of the program. Entering
//! the session captures the terminal's attributes and switches to raw mode;
//! the captured snapshot is re-applied exactly once, either through
//! [`RawModeSession::close`] or, on any other exit path (early return,
//! panic unwind), when the session is dropped.

use tracing::{debug, error};

use super::attrs::Attributes;
use super::tty::{Result, TerminalDevice, TerminalError};

/// Terminal attributes as they were before raw mode was entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalModeSnapshot(Attributes);

impl TerminalModeSnapshot {
    pub fn attributes(&self) -> &Attributes {
        &self.0
    }
}

/// A terminal held in raw mode
pub struct RawModeSession<D: TerminalDevice> {
    device: D,
    /// Taken on restoration so it can only happen once
    snapshot: Option<TerminalModeSnapshot>,
}

impl<D: TerminalDevice> RawModeSession<D> {
    /// Capture the current attributes and switch the device to raw mode.
    ///
    /// `read_timeout` is the inter-byte read timeout in deciseconds. If the
    /// raw attributes cannot be applied the snapshot is put back before the
    /// error is returned, so the terminal is never left half-configured.
    pub fn enable(mut device: D, read_timeout: u8) -> Result<Self> {
        let original = device.attributes().map_err(TerminalError::GetAttributes)?;
        let raw = original.raw(read_timeout);

        if let Err(e) = device.set_attributes(&raw) {
            let _ = device.set_attributes(&original);
            return Err(TerminalError::SetAttributes(e));
        }
        debug!(?raw, "raw mode enabled");

        Ok(Self {
            device,
            snapshot: Some(TerminalModeSnapshot(original)),
        })
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// The captured attributes, until they have been restored
    #[cfg(test)]
    pub fn snapshot(&self) -> Option<&TerminalModeSnapshot> {
        self.snapshot.as_ref()
    }

    /// End the session, reporting a failed restoration to the caller
    pub fn close(mut self) -> Result<()> {
        self.restore()
    }

    fn restore(&mut self) -> Result<()> {
        let Some(snapshot) = self.snapshot.take() else {
            return Ok(());
        };
        self.device
            .set_attributes(snapshot.attributes())
            .map_err(TerminalError::RestoreAttributes)?;
        debug!("terminal settings restored");
        Ok(())
    }
}

impl<D: TerminalDevice> Drop for RawModeSession<D> {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            let message = restore_failure_message(&e);
            error!("{}", message.trim_end());
            // Output post-processing is still off, so the line ending is spelled out
            eprint!("{}", message);
        }
    }
}

fn restore_failure_message(e: &TerminalError) -> String {
    match std::error::Error::source(e) {
        Some(source) => format!("aurora: {}: {}\r\n", e, source),
        None => format!("aurora: {}\r\n", e),
    }
}
