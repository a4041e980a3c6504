//! Controlling terminal access
//!
//! `TerminalDevice` is the seam every component talks through: attribute
//! get/set, the window-size query, and single unbuffered reads and writes.
//! `Tty` implements it over the process's stdin/stdout with termios.

use std::io;
use std::os::unix::io::RawFd;

use thiserror::Error;

use super::attrs::Attributes;

#[derive(Error, Debug)]
pub enum TerminalError {
    #[error("getting terminal settings")]
    GetAttributes(#[source] io::Error),

    #[error("setting terminal settings")]
    SetAttributes(#[source] io::Error),

    #[error("restoring terminal settings")]
    RestoreAttributes(#[source] io::Error),

    #[error("read error")]
    Read(#[source] io::Error),

    #[error("composing frame")]
    Compose(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, TerminalError>;

/// Window dimensions as reported by the device, possibly zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub columns: u16,
    pub rows: u16,
}

/// A character-cell terminal
pub trait TerminalDevice {
    /// Current line-discipline attributes
    fn attributes(&self) -> io::Result<Attributes>;

    /// Apply attributes after pending output drains, discarding unread input
    fn set_attributes(&mut self, attrs: &Attributes) -> io::Result<()>;

    /// Ask the device for its column/row count
    fn window_size(&self) -> io::Result<WindowSize>;

    /// One read call; `Ok(0)` means the read timed out
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// One write call; may transfer fewer bytes than given
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;
}

/// The process's controlling terminal
#[derive(Debug)]
pub struct Tty {
    input: RawFd,
    output: RawFd,
}

impl Tty {
    /// Attributes and reads go through stdin, size queries and writes through stdout
    pub fn stdio() -> Self {
        Self {
            input: libc::STDIN_FILENO,
            output: libc::STDOUT_FILENO,
        }
    }
}

fn check(rc: libc::c_int) -> io::Result<()> {
    if rc == -1 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}

fn check_len(rc: libc::ssize_t) -> io::Result<usize> {
    if rc < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(rc as usize)
    }
}

impl TerminalDevice for Tty {
    fn attributes(&self) -> io::Result<Attributes> {
        let mut termios = std::mem::MaybeUninit::<libc::termios>::uninit();
        check(unsafe { libc::tcgetattr(self.input, termios.as_mut_ptr()) })?;
        // SAFETY: tcgetattr succeeded and filled the struct
        Ok(Attributes::from(unsafe { termios.assume_init() }))
    }

    fn set_attributes(&mut self, attrs: &Attributes) -> io::Result<()> {
        check(unsafe { libc::tcsetattr(self.input, libc::TCSAFLUSH, attrs.as_termios()) })
    }

    fn window_size(&self) -> io::Result<WindowSize> {
        // SAFETY: winsize is plain data
        let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
        check(unsafe { libc::ioctl(self.output, libc::TIOCGWINSZ, &mut ws) })?;
        Ok(WindowSize {
            columns: ws.ws_col,
            rows: ws.ws_row,
        })
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        check_len(unsafe { libc::read(self.input, buf.as_mut_ptr().cast(), buf.len()) })
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        check_len(unsafe { libc::write(self.output, buf.as_ptr().cast(), buf.len()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = TerminalError::GetAttributes(io::Error::from_raw_os_error(libc::ENOTTY));
        assert_eq!(err.to_string(), "getting terminal settings");
        assert!(std::error::Error::source(&err).is_some());

        let err = TerminalError::Read(io::Error::from(io::ErrorKind::BrokenPipe));
        assert_eq!(err.to_string(), "read error");
    }

    #[test]
    fn test_window_size_on_non_tty_fails() {
        // A pipe is never a terminal, so the size query must fail rather than report zeros
        let mut fds = [0 as libc::c_int; 2];
        assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);
        let tty = Tty {
            input: fds[0],
            output: fds[1],
        };
        assert!(tty.window_size().is_err());
        assert!(tty.attributes().is_err());
        unsafe {
            libc::close(fds[0]);
            libc::close(fds[1]);
        }
    }

    #[test]
    fn test_read_write_single_calls() {
        let mut fds = [0 as libc::c_int; 2];
        assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);
        let mut tty = Tty {
            input: fds[0],
            output: fds[1],
        };
        assert_eq!(tty.write(b"\x1b[6n").unwrap(), 4);

        let mut buf = [0u8; 1];
        assert_eq!(tty.read(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], 0x1b);
        unsafe {
            libc::close(fds[0]);
            libc::close(fds[1]);
        }
    }
}
