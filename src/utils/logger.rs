//! Logging setup
//!
//! Logs go to stderr so command output on stdout stays machine-readable.

use std::fmt;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Verbosity of the console's own log lines. Dependencies log at `warn`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Quiet,
    Normal,
    Verbose,
    Trace,
}

impl LogLevel {
    /// Level for the `--verbose` flag
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            LogLevel::Verbose
        } else {
            LogLevel::Normal
        }
    }

    /// Directive name accepted by `EnvFilter`
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Quiet => "warn",
            LogLevel::Normal => "info",
            LogLevel::Verbose => "debug",
            LogLevel::Trace => "trace",
        }
    }

    pub fn level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Quiet => LevelFilter::WARN,
            LogLevel::Normal => LevelFilter::INFO,
            LogLevel::Verbose => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "warn" | "error" => Ok(LogLevel::Quiet),
            "normal" | "info" => Ok(LogLevel::Normal),
            "verbose" | "debug" => Ok(LogLevel::Verbose),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `EnvFilter` directive for `level`. `RUST_LOG`, when set, replaces it.
pub fn filter_directive(level: LogLevel) -> String {
    format!("warn,mesh_console={}", level.as_str())
}

pub fn init_logger(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!("debug".parse::<LogLevel>(), Ok(LogLevel::Verbose));
        assert_eq!("INFO".parse::<LogLevel>(), Ok(LogLevel::Normal));
        assert_eq!("error".parse::<LogLevel>(), Ok(LogLevel::Quiet));
        assert!("loud".parse::<LogLevel>().is_err());
        assert_eq!(LogLevel::Trace.level_filter(), LevelFilter::TRACE);
    }

    #[test]
    fn test_filter_directive() {
        assert_eq!(
            filter_directive(LogLevel::from_verbose(true)),
            "warn,mesh_console=debug"
        );
        assert_eq!(
            filter_directive(LogLevel::from_verbose(false)),
            "warn,mesh_console=info"
        );
    }
}
