// Diagnostic logging to stderr; user-facing results are printed by main.
use anyhow::{anyhow, Result};
use std::io::{self, IsTerminal};
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: Level,
    pub color: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            color: false,
        }
    }
}

impl LogConfig {
    /// `-q` keeps errors only, `-v` adds progress, `-vv` adds debug detail.
    pub fn from_cli(verbose: u8, quiet: bool) -> Self {
        let level = if quiet {
            Level::ERROR
        } else {
            match verbose {
                0 => Level::WARN,
                1 => Level::INFO,
                _ => Level::DEBUG,
            }
        };
        Self {
            level,
            color: io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
        }
    }
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over the CLI level.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("langpack={}", config.level)));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(config.color)
        .without_time()
        .try_init()
        .map_err(|e| anyhow!("failed to initialise logging: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_wins_over_verbose() {
        assert_eq!(LogConfig::from_cli(2, true).level, Level::ERROR);
        assert_eq!(LogConfig::from_cli(0, false).level, Level::WARN);
        assert_eq!(LogConfig::from_cli(1, false).level, Level::INFO);
        assert_eq!(LogConfig::from_cli(3, false).level, Level::DEBUG);
    }
}
