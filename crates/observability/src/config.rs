//! Environment-driven observability configuration.

use core::str::FromStr;

use thiserror::Error;

pub const FILTER_ENV: &str = "RUST_LOG";
pub const FORMAT_ENV: &str = "INVITEKIT_LOG_FORMAT";

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unsupported log format {0:?} (expected \"json\" or \"pretty\")")]
    UnsupportedFormat(String),
}

/// Log line encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(ConfigError::UnsupportedFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// `EnvFilter` directive string.
    pub filter: String,
    pub format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: LogFormat::Json,
        }
    }
}

impl ObservabilityConfig {
    /// Read configuration from the process environment.
    ///
    /// An unusable format falls back to JSON; the parse error is handed back so
    /// it can be logged once a subscriber exists.
    pub fn from_env() -> (Self, Option<ConfigError>) {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> (Self, Option<ConfigError>) {
        let filter = lookup(FILTER_ENV)
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string());

        let (format, error) = match lookup(FORMAT_ENV) {
            None => (LogFormat::default(), None),
            Some(raw) => match raw.parse::<LogFormat>() {
                Ok(format) => (format, None),
                Err(err) => (LogFormat::default(), Some(err)),
            },
        };

        (Self { filter, format }, error)
    }
}
