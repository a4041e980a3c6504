//! Frame renderer
//!
//! Composes a full redraw into an `OutputBuffer`: hide the cursor, home it,
//! draw every row, home it again and show it. Rows are cleared to the end
//! of the line as they are drawn instead of clearing the whole screen up
//! front.

use std::io;

use crossterm::cursor::{Hide, Show};
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};
use tracing::warn;

use super::buffer::OutputBuffer;
use crate::config::RenderConfig;
use crate::core::ansi::CursorHome;
use crate::core::geometry::ScreenSize;

/// Terminal renderer
#[derive(Debug, Clone)]
pub struct Renderer {
    /// Marker drawn at the start of every row
    filler: String,
    max_frame_bytes: usize,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::from_config(&RenderConfig::default())
    }
}

impl Renderer {
    pub fn from_config(config: &RenderConfig) -> Self {
        let filler = config.filler();
        if filler != config.filler {
            warn!("Filler {:?} is not one column wide, using {:?}", config.filler, filler);
        }
        Self {
            filler: filler.to_string(),
            max_frame_bytes: config.max_frame_bytes,
        }
    }

    /// Build one frame for a screen of the given size.
    ///
    /// Room for the closing home/show sequence is kept out of the frame
    /// limit, so a truncated frame still gives the cursor back.
    pub fn draw_frame(&self, size: ScreenSize) -> io::Result<OutputBuffer> {
        let mut trailer = Vec::new();
        queue!(trailer, CursorHome, Show)?;

        let mut frame =
            OutputBuffer::with_limit(self.max_frame_bytes.saturating_sub(trailer.len()));
        queue!(frame, Hide, CursorHome)?;
        self.draw_rows(&mut frame, size)?;

        frame.remove_limit();
        frame.append(&trailer);
        Ok(frame)
    }

    fn draw_rows(&self, frame: &mut OutputBuffer, size: ScreenSize) -> io::Result<()> {
        let rows = size.rows;
        for y in 0..rows {
            frame.append(self.filler.as_bytes());
            queue!(frame, Clear(ClearType::UntilNewLine))?;
            if y < rows - 1 {
                frame.append(b"\r\n");
            }
        }
        Ok(())
    }

    /// Clear the screen and home the cursor, as on exit
    pub fn clear_screen() -> io::Result<OutputBuffer> {
        let mut frame = OutputBuffer::new();
        queue!(frame, Clear(ClearType::All), CursorHome)?;
        Ok(frame)
    }
}
