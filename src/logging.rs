//! Logging setup for the command line tool.
//!
//! Log lines go to stderr so that stdout only carries reports.

use tracing_subscriber::EnvFilter;

use crate::errors::{PestGuardError, Result};

/// Default filter when `RUST_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "pest_guard=debug"
    } else {
        "pest_guard=warn"
    }
}

/// Install a global fmt subscriber. `RUST_LOG` takes precedence over the
/// verbosity flag.
pub fn init_logging(verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .compact()
        .try_init()
        .map_err(|e| PestGuardError::Configuration {
            message: format!("failed to initialize logging: {e}"),
        })
}
