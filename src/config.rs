//! Configuration for aurora.
//!
//! Settings are read from `~/.aurora/config.toml` (or the file given with
//! `--config`). The file is optional: a missing or unreadable file means the
//! defaults below, and aurora never writes it.
//!
//! # Configuration File
//!
//! ```toml
//! # Log level for ~/.aurora/aurora.log (AURORA_LOG overrides)
//! log_level = "info"
//!
//! [terminal]
//! # Inter-byte read timeout in tenths of a second
//! read_timeout = 1
//!
//! [render]
//! # Marker drawn on every row, one column wide
//! filler = "~"
//! # Largest frame in bytes; anything beyond is dropped
//! max_frame_bytes = 1048576
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use unicode_width::UnicodeWidthStr;

pub const DEFAULT_FILLER: &str = "~";

/// Main configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log filter directive
    pub log_level: String,
    /// Terminal settings
    pub terminal: TerminalConfig,
    /// Render settings
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            terminal: TerminalConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

/// Terminal configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Deciseconds a raw read waits before returning empty
    pub read_timeout: u8,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self { read_timeout: 1 }
    }
}

impl TerminalConfig {
    /// The read timeout, never zero (zero would make reads spin)
    pub fn read_timeout(&self) -> u8 {
        self.read_timeout.max(1)
    }
}

/// Render configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub filler: String,
    pub max_frame_bytes: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            filler: DEFAULT_FILLER.to_string(),
            max_frame_bytes: 1 << 20,
        }
    }
}

impl RenderConfig {
    /// The row marker, or the default if the configured one isn't one column wide
    pub fn filler(&self) -> &str {
        if self.filler.width() == 1 && !self.filler.chars().any(char::is_control) {
            &self.filler
        } else {
            DEFAULT_FILLER
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default location
    pub fn load(path: Option<&Path>) -> Self {
        let path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::get_config_path(),
        };
        path.and_then(|path| Self::from_file(&path)).unwrap_or_default()
    }

    fn from_file(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        toml::from_str(&content).ok()
    }

    /// Get config file path
    fn get_config_path() -> Option<PathBuf> {
        aurora_dir().map(|dir| dir.join("config.toml"))
    }
}

/// `~/.aurora`, home of the config file and the log
pub fn aurora_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(|home| PathBuf::from(home).join(".aurora"))
}
