//! Runtime configuration for gridtool.

use std::env;

use tracing::Level;

/// Logging settings, loaded from the environment and overridden by CLI flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridtoolConfig {
    /// Maximum level of emitted log events
    pub log_level: Level,
    /// Emit logs as JSON lines instead of human-readable text
    pub json_logs: bool,
}

impl Default for GridtoolConfig {
    fn default() -> Self {
        Self {
            log_level: Level::INFO,
            json_logs: false,
        }
    }
}

impl GridtoolConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = env::var("GRIDTOOL_LOG_LEVEL") {
            config.log_level = parse_level(&val);
        }

        if let Ok(val) = env::var("GRIDTOOL_LOG_JSON") {
            config.json_logs = parse_flag(&val);
        }

        config
    }

    /// Apply command-line overrides on top of the environment.
    pub fn with_overrides(mut self, log_level: Option<&str>, json_logs: bool) -> Self {
        if let Some(level) = log_level {
            self.log_level = parse_level(level);
        }
        if json_logs {
            self.json_logs = true;
        }
        self
    }
}

/// Parse a log level name, defaulting to INFO for unknown names.
pub fn parse_level(name: &str) -> Level {
    match name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn parse_flag(val: &str) -> bool {
    val.to_lowercase() == "true" || val == "1"
}
