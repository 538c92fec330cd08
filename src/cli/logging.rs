//! Logging setup for the CLI.
//!
//! Log output goes to stderr. `RUST_LOG` overrides the level chosen by
//! `-v`.

use super::error::CliError;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Level for a `-v` count: warn, info, debug, then trace.
pub fn level_from_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn build_env_filter(level: Level) -> EnvFilter {
    let level = level.as_str().to_lowercase();
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // Other crates stay at warn.
        EnvFilter::new(format!("warn,cdi_metadata_sdk={level},cdi_metadata_cli={level}"))
    })
}

/// Install the global fmt subscriber.
pub fn init_logging(verbosity: u8) -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(level_from_verbosity(verbosity)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| CliError::LoggingError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_verbosity() {
        assert_eq!(level_from_verbosity(0), Level::WARN);
        assert_eq!(level_from_verbosity(1), Level::INFO);
        assert_eq!(level_from_verbosity(2), Level::DEBUG);
        assert_eq!(level_from_verbosity(9), Level::TRACE);
    }
}
