//! Logging setup for LeadPilot
//!
//! Diagnostics go through `tracing` to stderr so they never interleave with
//! streamed answers on stdout. `RUST_LOG` overrides the verbosity flags.

use crate::cli::Verbosity;
use crate::errors::{LeadError, Result};
use tracing_subscriber::EnvFilter;

/// Build the filter for a verbosity level, honouring `RUST_LOG`
pub fn log_filter(verbosity: Verbosity) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()))
}

/// Install the global subscriber
pub fn init_logging(verbosity: Verbosity) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| LeadError::Generic(format!("Failed to initialise logging: {}", e)))
}
