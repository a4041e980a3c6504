//! Render loop
//!
//! Redraws the screen, waits for one key, dispatches it, and repeats until
//! the quit chord moves the loop to `Terminated`.

use tracing::{info, trace, warn};

use crate::core::geometry::ScreenSize;
use crate::core::input::read_byte;
use crate::core::raw_mode::RawModeSession;
use crate::core::tty::{Result, TerminalDevice, TerminalError};
use crate::ui::{KeyAction, KeyMapper, OutputBuffer, Renderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Terminated,
}

/// The editor: a raw-mode terminal, its size, and the loop state
pub struct Editor<D: TerminalDevice> {
    session: RawModeSession<D>,
    screen: ScreenSize,
    renderer: Renderer,
    state: LoopState,
}

impl<D: TerminalDevice> Editor<D> {
    pub fn new(session: RawModeSession<D>, screen: ScreenSize, renderer: Renderer) -> Self {
        Self {
            session,
            screen,
            renderer,
            state: LoopState::Running,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Draw a full frame and hand it to the terminal in one write
    pub fn refresh_screen(&mut self) -> Result<()> {
        let frame = self
            .renderer
            .draw_frame(self.screen)
            .map_err(TerminalError::Compose)?;
        self.flush(frame);
        Ok(())
    }

    /// Act on one input byte
    pub fn process_keypress(&mut self, byte: u8) -> Result<LoopState> {
        match KeyMapper::map(byte) {
            KeyAction::Quit => {
                info!("Quit requested");
                let frame = Renderer::clear_screen().map_err(TerminalError::Compose)?;
                self.flush(frame);
                self.state = LoopState::Terminated;
            }
            KeyAction::Ignore => trace!(byte, "key ignored"),
        }
        Ok(self.state)
    }

    /// Run until quit, then restore the terminal
    pub fn run(mut self) -> Result<()> {
        while self.state == LoopState::Running {
            self.refresh_screen()?;
            let byte = read_byte(self.session.device_mut())?;
            self.process_keypress(byte)?;
        }
        self.session.close()
    }

    fn flush(&mut self, frame: OutputBuffer) {
        if frame.dropped() > 0 {
            warn!(dropped = frame.dropped(), "frame incomplete");
        }
        let expected = frame.len();
        match frame.flush_to(self.session.device_mut()) {
            Ok(written) if written == expected => {}
            Ok(written) => warn!(written, expected, "short frame write"),
            Err(e) => warn!("Failed to write frame: {}", e),
        }
    }
}
