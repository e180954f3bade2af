//! Process-wide tracing/logging setup.

pub mod config;
pub mod tracing;

pub use config::{ConfigError, LogFormat, ObservabilityConfig};

/// Initialize tracing from the environment (`RUST_LOG`, `INVITEKIT_LOG_FORMAT`).
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    let (config, format_error) = ObservabilityConfig::from_env();
    tracing::init(&config);
    if let Some(err) = format_error {
        ::tracing::warn!(error = %err, "falling back to JSON log output");
    }
}
