//! Screen geometry
//!
//! The window size normally comes straight from the device. When the device
//! cannot say (or claims zero columns, as some emulation layers do), the
//! size is measured instead: the cursor is pushed far past the bottom-right
//! corner, where the terminal clamps it, and its position is then asked for
//! with a cursor-position report.
//!
//! The measurement is a small request/response state machine:
//!
//! ```text
//! Idle --(move + request written)--> AwaitingResponse --'R'--> Parsed
//!   |                                       |
//!   +--(short write)--> Failed <--(timeout, overflow, bad report)
//! ```

use crossterm::cursor::{MoveDown, MoveRight};
use crossterm::queue;
use thiserror::Error;
use tracing::{debug, info};

use super::ansi::RequestCursorPosition;
use super::tty::TerminalDevice;

/// Size of the report buffer; one slot is reserved, as for a C string
pub const CURSOR_REPORT_CAPACITY: usize = 32;

/// Most bytes ever read while waiting for a report
pub const CURSOR_REPORT_LIMIT: usize = CURSOR_REPORT_CAPACITY - 1;

/// Far enough to reach the edge of any real screen
const FAR_CORNER: u16 = 999;

#[derive(Error, Debug)]
pub enum GeometryError {
    #[error("wrote {written} of {expected} bytes of {what}")]
    ShortWrite {
        what: &'static str,
        written: usize,
        expected: usize,
    },

    #[error("writing {what}")]
    Write {
        what: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed cursor position report {report:?}")]
    MalformedReport { report: String },

    #[error("cursor position report not terminated after {read} bytes")]
    UnterminatedReport { read: usize },

    #[error("terminal reported a zero dimension")]
    ZeroDimension,
}

pub type Result<T> = std::result::Result<T, GeometryError>;

/// Terminal dimensions, both nonzero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub columns: u16,
    pub rows: u16,
}

impl ScreenSize {
    pub fn new(columns: u16, rows: u16) -> Option<Self> {
        (columns > 0 && rows > 0).then_some(Self { columns, rows })
    }
}

/// 1-based cursor position from a status report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPosition {
    pub row: u16,
    pub column: u16,
}

impl CursorPosition {
    /// Parse a complete report, `ESC [ row ; col R`
    pub fn parse(report: &[u8]) -> Result<Self> {
        let malformed = || GeometryError::MalformedReport {
            report: String::from_utf8_lossy(report).into_owned(),
        };

        let body = report.strip_prefix(b"\x1b[").ok_or_else(malformed)?;
        let body = body.strip_suffix(b"R").ok_or(GeometryError::UnterminatedReport {
            read: report.len(),
        })?;
        let text = std::str::from_utf8(body).map_err(|_| malformed())?;
        let (row, column) = text.split_once(';').ok_or_else(malformed)?;

        let row = parse_coordinate(row).ok_or_else(malformed)?;
        let column = parse_coordinate(column).ok_or_else(malformed)?;
        if row == 0 || column == 0 {
            return Err(GeometryError::ZeroDimension);
        }
        Ok(Self { row, column })
    }
}

fn parse_coordinate(digits: &str) -> Option<u16> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Where a cursor probe is in its exchange with the terminal
#[derive(Debug)]
pub enum ProbeState {
    Idle,
    AwaitingResponse,
    Parsed(CursorPosition),
    Failed(GeometryError),
}

/// Measures the screen by asking the terminal where a clamped cursor ended up
#[derive(Debug)]
pub struct CursorProbe {
    state: ProbeState,
    report: Vec<u8>,
}

impl Default for CursorProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorProbe {
    pub fn new() -> Self {
        Self {
            state: ProbeState::Idle,
            report: Vec::with_capacity(CURSOR_REPORT_CAPACITY),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &ProbeState {
        &self.state
    }

    /// Drive the probe to completion
    pub fn run<D: TerminalDevice + ?Sized>(mut self, device: &mut D) -> Result<CursorPosition> {
        self.start(device);
        loop {
            match self.state {
                ProbeState::Parsed(position) => return Ok(position),
                ProbeState::Failed(e) => return Err(e),
                ProbeState::Idle | ProbeState::AwaitingResponse => {}
            }

            let mut byte = [0u8; 1];
            match device.read(&mut byte) {
                Ok(1) => self.feed(byte[0]),
                // No further fallback: a silent terminal ends the exchange
                _ => self.abandon(),
            }
        }
    }

    /// Idle -> AwaitingResponse, or Failed if either sequence is cut short
    fn start<D: TerminalDevice + ?Sized>(&mut self, device: &mut D) {
        let mut corner = Vec::new();
        let mut request = Vec::new();
        // Writing into a Vec cannot fail
        let _ = queue!(corner, MoveRight(FAR_CORNER), MoveDown(FAR_CORNER));
        let _ = queue!(request, RequestCursorPosition);

        let sent = send_all(device, &corner, "cursor move")
            .and_then(|()| send_all(device, &request, "cursor position request"));
        self.state = match sent {
            Ok(()) => ProbeState::AwaitingResponse,
            Err(e) => ProbeState::Failed(e),
        };
    }

    /// Accept one byte of the report
    fn feed(&mut self, byte: u8) {
        self.report.push(byte);
        if byte == b'R' {
            self.state = match CursorPosition::parse(&self.report) {
                Ok(position) => ProbeState::Parsed(position),
                Err(e) => ProbeState::Failed(e),
            };
        } else if self.report.len() >= CURSOR_REPORT_LIMIT {
            self.abandon();
        }
    }

    fn abandon(&mut self) {
        debug!(report = ?String::from_utf8_lossy(&self.report), "cursor report incomplete");
        self.state = ProbeState::Failed(GeometryError::UnterminatedReport {
            read: self.report.len(),
        });
    }
}

fn send_all<D: TerminalDevice + ?Sized>(
    device: &mut D,
    bytes: &[u8],
    what: &'static str,
) -> Result<()> {
    let written = device
        .write(bytes)
        .map_err(|source| GeometryError::Write { what, source })?;
    if written != bytes.len() {
        return Err(GeometryError::ShortWrite {
            what,
            written,
            expected: bytes.len(),
        });
    }
    Ok(())
}

/// Determine the screen size, falling back to a cursor probe
pub fn resolve<D: TerminalDevice + ?Sized>(device: &mut D) -> Result<ScreenSize> {
    let reported = device.window_size();
    if let Some(size) = reported
        .as_ref()
        .ok()
        .and_then(|ws| ScreenSize::new(ws.columns, ws.rows))
    {
        info!("Terminal size: {}x{}", size.columns, size.rows);
        return Ok(size);
    }
    debug!(?reported, "window size unavailable, probing cursor position");

    let corner = CursorProbe::new().run(device)?;
    let size = ScreenSize::new(corner.column, corner.row).ok_or(GeometryError::ZeroDimension)?;
    info!("Terminal size (probed): {}x{}", size.columns, size.rows);
    Ok(size)
}
