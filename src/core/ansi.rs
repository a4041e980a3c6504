//! Escape sequences crossterm has no public command for

use std::fmt;

use crossterm::Command;

/// Move the cursor to the top-left cell: `ESC [ H`
///
/// `cursor::MoveTo(0, 0)` spells this `ESC [ 1 ; 1 H`; the short form is
/// what terminals without full parameter parsing still understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorHome;

impl Command for CursorHome {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        f.write_str("\x1b[H")
    }
}

/// Device status report request; the terminal answers `ESC [ row ; col R`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestCursorPosition;

impl Command for RequestCursorPosition {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        f.write_str("\x1b[6n")
    }
}
