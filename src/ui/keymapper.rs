//! Key mapping
//!
//! Maps raw input bytes to editor actions. With signals disabled, control
//! chords arrive as plain bytes: Ctrl+<letter> is the letter with the top
//! three bits cleared.

/// The byte a Ctrl+`key` chord produces
pub const fn ctrl_key(key: u8) -> u8 {
    key & 0x1f
}

/// Ctrl+Q
pub const QUIT: u8 = ctrl_key(b'q');

/// What a key press asks the editor to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Ignore,
}

/// Key mapper
pub struct KeyMapper;

impl KeyMapper {
    pub fn map(byte: u8) -> KeyAction {
        match byte {
            QUIT => KeyAction::Quit,
            _ => KeyAction::Ignore,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctrl_key() {
        assert_eq!(ctrl_key(b'q'), 0x11);
        assert_eq!(ctrl_key(b'Q'), 0x11);
        assert_eq!(ctrl_key(b'c'), 0x03);
    }

    #[test]
    fn test_quit_chord() {
        assert_eq!(KeyMapper::map(0x11), KeyAction::Quit);
    }

    #[test]
    fn test_other_keys_ignored() {
        for byte in [b'q', b'Q', 0x03, 0x1a, 0x1b, b'\r', 0x7f] {
            assert_eq!(KeyMapper::map(byte), KeyAction::Ignore, "byte {:#04x}", byte);
        }
    }
}
