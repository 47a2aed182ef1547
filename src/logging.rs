//! Logger installation.
//!
//! The terminal belongs to the game screen, so log records never go to stderr. They are written
//! into the file named by `--log-file`, and nothing is logged when no file is given.

use std::fs::File;

use color_eyre::eyre::{Result, WrapErr as _};
use env_logger::{Builder, Env, Target};
use log::LevelFilter;

use crate::config::Config;

/// Installs the global logger described by the configuration.
///
/// `RUST_LOG` overrides the configured level.
///
/// # Errors
///
/// Fails when the log file cannot be created or a logger is already installed.
pub fn init(config: &Config) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };

    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;

    builder(LevelFilter::from(config.log_level))
        .target(Target::Pipe(Box::new(file)))
        .try_init()?;

    Ok(())
}

/// Builds a logger with a default level, letting the environment refine it.
fn builder(level: LevelFilter) -> Builder {
    let mut builder = Builder::new();
    let _ = builder
        .filter_level(level)
        .parse_env(Env::default())
        .format_timestamp_millis();
    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_log_file_is_a_no_op() {
        let config = Config::default();

        assert!(init(&config).is_ok());
    }

    #[test]
    fn test_unwritable_log_file_is_an_error() {
        let config = Config {
            log_file: Some(std::env::temp_dir().join("heartmaze-missing-dir/nested/maze.log")),
            ..Config::default()
        };

        assert!(init(&config).is_err());
    }

    #[test]
    fn test_builder_accepts_every_level() {
        for level in [LevelFilter::Off, LevelFilter::Info, LevelFilter::Trace] {
            let _ = builder(level).build();
        }
    }
}
