//! aurora - a flicker-free raw-mode terminal session
//!
//! aurora takes over the controlling terminal, switches it to raw mode and
//! redraws the whole screen on every key press, one buffered write per
//! frame. The terminal's original settings are put back however the
//! program ends.
//!
//! # Features
//!
//! - **Raw Mode**: no echo, no line buffering, Ctrl+C/Ctrl+Z arrive as bytes
//! - **Guaranteed Restore**: terminal settings restored on quit, error or panic
//! - **Size Detection**: window size query with a cursor-report fallback
//! - **Flicker-free Redraw**: each frame is written in a single call
//!
//! # Quick Start
//!
//! ```text
//! aurora                       # Start with ~/.aurora/config.toml
//! aurora -c ./aurora.toml      # Start with another config file
//! ```
//!
//! # Keybindings
//!
//! | Key | Action |
//! |-----|--------|
//! | Ctrl+Q | Quit |

#[cfg(not(unix))]
compile_error!("aurora drives the terminal through termios and only builds on Unix targets");

mod config;
mod core;
mod editor;
mod ui;

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::Config;
use crate::core::ansi::CursorHome;
use crate::core::geometry;
use crate::core::raw_mode::RawModeSession;
use crate::core::tty::Tty;
use crate::editor::Editor;
use crate::ui::Renderer;

/// Command line options
#[derive(Debug, Default)]
struct Options {
    /// Config file given with --config
    config_path: Option<PathBuf>,
}

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_version() {
    eprintln!("aurora {}", VERSION);
}

fn print_help() {
    eprintln!("aurora {} - A flicker-free raw-mode terminal session", VERSION);
    eprintln!();
    eprintln!("Usage: aurora [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --config <PATH>   Read settings from PATH");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("Keys:");
    eprintln!("  Ctrl+Q                Quit");
    eprintln!();
    eprintln!("Configuration: ~/.aurora/config.toml");
    eprintln!("Log file:      ~/.aurora/aurora.log (level from AURORA_LOG or log_level)");
}

fn parse_args() -> Result<Options, String> {
    let args: Vec<String> = env::args().collect();
    let mut options = Options::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            "-c" | "--config" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing config path".to_string());
                }
                options.config_path = Some(PathBuf::from(&args[i]));
            }
            arg => {
                return Err(format!("Unknown argument: {}. Use -h for help.", arg));
            }
        }
        i += 1;
    }

    Ok(options)
}

/// Log to a file; stdout and stderr belong to the screen while raw mode is on
fn init_logging(config: &Config) {
    let log_path = config::aurora_dir()
        .map(|dir| dir.join("aurora.log"))
        .unwrap_or_else(|| PathBuf::from("aurora.log"));

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let filter = EnvFilter::try_from_env("AURORA_LOG")
            .or_else(|_| EnvFilter::try_new(&config.log_level))
            .unwrap_or_else(|_| EnvFilter::new("info"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

fn main() -> anyhow::Result<()> {
    let options = match parse_args() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    let config = Config::load(options.config_path.as_deref());
    init_logging(&config);
    info!("aurora {} starting...", VERSION);

    // The session is gone by the time run() returns, so the terminal is
    // already restored when the error is reported
    let result = run(&config);
    if let Err(e) = &result {
        error!("{:#}", e);
        let mut stdout = std::io::stdout();
        let _ = execute!(stdout, Clear(ClearType::All), CursorHome);
    } else {
        info!("aurora exiting");
    }
    result
}

fn run(config: &Config) -> anyhow::Result<()> {
    let mut session = RawModeSession::enable(Tty::stdio(), config.terminal.read_timeout())?;
    let screen = geometry::resolve(session.device_mut()).context("getting window size")?;

    let renderer = Renderer::from_config(&config.render);
    Editor::new(session, screen, renderer).run()?;
    Ok(())
}
