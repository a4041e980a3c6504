//! Core terminal session components.
//!
//! This module contains the low-level terminal handling:
//!
//! - **tty**: the `TerminalDevice` seam and its termios-backed `Tty`
//! - **attrs**: typed views over line-discipline attributes
//! - **raw_mode**: raw-mode session with guaranteed restoration
//! - **geometry**: screen size query with cursor-report fallback
//! - **input**: timeout-tolerant single byte reads
//!
//! # Architecture
//!
//! ```text
//! RawModeSession
//! ├── TerminalModeSnapshot (attributes captured at startup)
//! └── TerminalDevice (Tty, or a fake in tests)
//!     ├── geometry::resolve (window size / cursor probe)
//!     └── input::read_byte
//! ```

pub mod ansi;
pub mod attrs;
pub mod geometry;
pub mod input;
pub mod raw_mode;
pub mod tty;

#[cfg(test)]
pub mod testing;
