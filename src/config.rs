//! Command-line configuration.

use std::{path::PathBuf, time::Duration};

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use crate::generator::{MAX_MAZE_SIZE, MIN_MAZE_SIZE};

/// Board size used when none is requested.
pub const DEFAULT_MAZE_SIZE: usize = 10;

/// Board size used in hard mode.
pub const HARD_MODE_SIZE: usize = 12;

/// Default length of a single move, in milliseconds.
pub const DEFAULT_MOVE_DURATION_MS: u64 = 200;

/// Settings of a game run, parsed from the command line.
#[derive(Clone, Debug, Parser)]
#[command(version, about)]
pub struct Config {
    /// Requested board size, raised to 5 when smaller and at most 201.
    #[arg(long, default_value_t = DEFAULT_MAZE_SIZE, value_parser = parse_size)]
    pub size: usize,
    /// Starts the first round in hard mode, on a 12x12 board.
    #[arg(long)]
    pub hard: bool,
    /// Seed for reproducible mazes.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Duration of one animated move, in milliseconds.
    #[arg(long, default_value_t = DEFAULT_MOVE_DURATION_MS)]
    pub move_duration_ms: u64,
    /// Writes logs into this file. Logging is off without it.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
    /// Default log level, overridden by `RUST_LOG`.
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: DEFAULT_MAZE_SIZE,
            hard: false,
            seed: None,
            move_duration_ms: DEFAULT_MOVE_DURATION_MS,
            log_file: None,
            log_level: LogLevel::Info,
        }
    }
}

impl Config {
    /// Returns the board size of a round, in hard mode or not.
    ///
    /// Hard mode ignores the requested size. Otherwise the size is kept between [`MIN_MAZE_SIZE`]
    /// and [`MAX_MAZE_SIZE`].
    #[must_use]
    pub fn maze_size(&self, hard: bool) -> usize {
        if hard {
            HARD_MODE_SIZE
        } else {
            self.size.clamp(MIN_MAZE_SIZE, MAX_MAZE_SIZE)
        }
    }

    /// Returns the duration of one animated move.
    #[must_use]
    pub const fn move_duration(&self) -> Duration {
        Duration::from_millis(self.move_duration_ms)
    }
}

/// Parses the `--size` argument, refusing boards larger than [`MAX_MAZE_SIZE`].
fn parse_size(value: &str) -> Result<usize, String> {
    let size: usize = value.parse().map_err(|err| format!("{err}"))?;
    if size > MAX_MAZE_SIZE {
        return Err(format!("board size must be at most {MAX_MAZE_SIZE}"));
    }

    Ok(size)
}

/// Log level accepted on the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Logging disabled.
    Off,
    /// Errors only.
    Error,
    /// Warnings and errors.
    Warn,
    /// Informational messages and above.
    #[default]
    Info,
    /// Debugging messages and above.
    Debug,
    /// Everything.
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => Self::Off,
            LogLevel::Error => Self::Error,
            LogLevel::Warn => Self::Warn,
            LogLevel::Info => Self::Info,
            LogLevel::Debug => Self::Debug,
            LogLevel::Trace => Self::Trace,
        }
    }
}
