//! In-memory terminal for tests

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;

use super::attrs::{Attributes, ControlFlags, InputFlags, LocalFlags, OutputFlags};
use super::tty::{TerminalDevice, WindowSize};

/// One scripted outcome of a `read` call
#[derive(Debug, Clone)]
pub enum ReadEvent {
    Byte(u8),
    Timeout,
    WouldBlock,
    Fail(io::ErrorKind),
}

#[derive(Debug, Default)]
struct FakeState {
    attributes: Attributes,
    fail_get: bool,
    failing_sets: usize,
    set_calls: usize,
    window_size: Option<WindowSize>,
    reads: VecDeque<ReadEvent>,
    bytes_read: usize,
    writes: Vec<Vec<u8>>,
    write_limit: Option<usize>,
}

/// A scripted terminal; clones share state so tests can inspect it after
/// handing a clone to the code under test.
#[derive(Debug, Clone, Default)]
pub struct FakeTerminal {
    state: Rc<RefCell<FakeState>>,
}

impl FakeTerminal {
    /// A terminal in typical cooked mode with no usable window size
    pub fn new() -> Self {
        let fake = Self::default();
        fake.state.borrow_mut().attributes = cooked_attributes();
        fake
    }

    pub fn with_window_size(self, columns: u16, rows: u16) -> Self {
        self.state.borrow_mut().window_size = Some(WindowSize { columns, rows });
        self
    }

    pub fn push(&self, event: ReadEvent) {
        self.state.borrow_mut().reads.push_back(event);
    }

    pub fn push_bytes(&self, bytes: &[u8]) {
        let mut state = self.state.borrow_mut();
        state.reads.extend(bytes.iter().copied().map(ReadEvent::Byte));
    }

    pub fn fail_get_attributes(&self) {
        self.state.borrow_mut().fail_get = true;
    }

    /// Make the next `count` attribute writes fail
    pub fn fail_next_sets(&self, count: usize) {
        self.state.borrow_mut().failing_sets = count;
    }

    /// Cap how many bytes a single write transfers
    pub fn limit_writes(&self, max: usize) {
        self.state.borrow_mut().write_limit = Some(max);
    }

    pub fn current_attributes(&self) -> Attributes {
        self.state.borrow().attributes
    }

    pub fn set_calls(&self) -> usize {
        self.state.borrow().set_calls
    }

    pub fn bytes_read(&self) -> usize {
        self.state.borrow().bytes_read
    }

    pub fn pending_reads(&self) -> usize {
        self.state.borrow().reads.len()
    }

    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.state.borrow().writes.clone()
    }
}

/// Attributes resembling a freshly opened interactive terminal
pub fn cooked_attributes() -> Attributes {
    let mut attrs = Attributes::default();
    attrs.set_input_flags(InputFlags::BRKINT | InputFlags::ICRNL | InputFlags::IXON);
    attrs.set_output_flags(OutputFlags::OPOST | OutputFlags::from_bits_retain(libc::ONLCR));
    attrs.set_control_flags(ControlFlags::CS8 | ControlFlags::from_bits_retain(libc::CREAD));
    attrs.set_local_flags(
        LocalFlags::ECHO | LocalFlags::ICANON | LocalFlags::IEXTEN | LocalFlags::ISIG,
    );
    attrs.set_control_char(libc::VINTR, 0x03);
    attrs.set_control_char(libc::VSUSP, 0x1a);
    attrs.set_control_char(libc::VMIN, 1);
    attrs.set_control_char(libc::VTIME, 0);
    attrs
}

impl TerminalDevice for FakeTerminal {
    fn attributes(&self) -> io::Result<Attributes> {
        let state = self.state.borrow();
        if state.fail_get {
            return Err(io::Error::from_raw_os_error(libc::ENOTTY));
        }
        Ok(state.attributes)
    }

    fn set_attributes(&mut self, attrs: &Attributes) -> io::Result<()> {
        let mut state = self.state.borrow_mut();
        state.set_calls += 1;
        if state.failing_sets > 0 {
            state.failing_sets -= 1;
            return Err(io::Error::from_raw_os_error(libc::EIO));
        }
        state.attributes = *attrs;
        Ok(())
    }

    fn window_size(&self) -> io::Result<WindowSize> {
        self.state
            .borrow()
            .window_size
            .ok_or_else(|| io::Error::from_raw_os_error(libc::ENOTTY))
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut state = self.state.borrow_mut();
        match state.reads.pop_front() {
            Some(ReadEvent::Byte(byte)) => {
                buf[0] = byte;
                state.bytes_read += 1;
                Ok(1)
            }
            Some(ReadEvent::Timeout) => Ok(0),
            Some(ReadEvent::WouldBlock) => Err(io::Error::from_raw_os_error(libc::EAGAIN)),
            Some(ReadEvent::Fail(kind)) => Err(io::Error::from(kind)),
            // An exhausted script never blocks a test forever
            None => Err(io::Error::from(io::ErrorKind::UnexpectedEof)),
        }
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.state.borrow_mut();
        let len = state.write_limit.map_or(buf.len(), |max| buf.len().min(max));
        state.writes.push(buf[..len].to_vec());
        Ok(len)
    }
}
