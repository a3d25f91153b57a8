//! Tracing subscriber setup
//!
//! Libraries in this workspace only emit `tracing` events; binaries and
//! integration harnesses call [`init_tracing`] once to print them.

use tracing_subscriber::{fmt, EnvFilter};
use visadesk_domain::{Result, VisadeskError};

/// Filter used when `RUST_LOG` is unset or empty
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Output format of the fmt layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Install a global `fmt` subscriber filtered by `RUST_LOG`
///
/// # Errors
/// Returns `Config` if `RUST_LOG` does not parse or a global subscriber is
/// already installed
pub fn init_tracing(format: LogFormat) -> Result<()> {
    let filter = env_filter()?;
    let builder = fmt().with_env_filter(filter).with_target(true);

    let installed = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| VisadeskError::Config(format!("failed to install subscriber: {e}")))
}

fn env_filter() -> Result<EnvFilter> {
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives)
            .map_err(|e| VisadeskError::Config(format!("invalid RUST_LOG: {e}"))),
        _ => Ok(EnvFilter::new(DEFAULT_LOG_FILTER)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_reported() {
        // Another test in this binary may have installed one already.
        let _ = init_tracing(LogFormat::Pretty);
        assert!(matches!(init_tracing(LogFormat::Json), Err(VisadeskError::Config(_))));
    }
}
