//! Logging setup for programs and tests using this crate.
//!
//! The library itself only emits `tracing` events. `init` installs a global
//! subscriber that prints them to stderr, filtered by `RUST_LOG`.

use std::sync::OnceLock;

use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

/// Filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "info";

/// Outcome of the one installation attempt, replayed to every caller.
static OUTCOME: OnceLock<Result<(), String>> = OnceLock::new();

/// Errors that may occur while initializing logging.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoggingError {
    /// Another global subscriber was installed first.
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(String),
}

/// Install the global tracing subscriber.
///
/// Installation is attempted once. Later calls, including concurrent ones,
/// return the result of that attempt, so a failure keeps being reported.
pub fn init() -> Result<(), LoggingError> {
    OUTCOME
        .get_or_init(|| install().map_err(|err| err.to_string()))
        .clone()
        .map_err(LoggingError::SetGlobal)
}

fn install() -> Result<(), SetGlobalDefaultError> {
    let subscriber = Registry::default()
        .with(build_env_filter())
        .with(fmt::layer().with_writer(std::io::stderr));
    tracing::subscriber::set_global_default(subscriber)?;
    tracing::debug!("Logging initialized");
    Ok(())
}

fn build_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
