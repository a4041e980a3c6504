//! Screen output and key handling.
//!
//! - **buffer**: append-only frame buffer flushed in one write
//! - **renderer**: composes each redraw into a frame
//! - **keymapper**: input byte to editor action mapping

pub mod buffer;
pub mod keymapper;
pub mod renderer;

pub use buffer::OutputBuffer;
pub use keymapper::{KeyAction, KeyMapper};
pub use renderer::Renderer;
