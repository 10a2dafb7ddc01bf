//! Logging setup
//!
//! All crate logging goes through `tracing`. Messages carry a bracketed
//! subsystem tag (`[ORCHESTRATOR]`, `[NETWORK]`, `[SETTINGS]`) so a plain
//! text log can be filtered by eye.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or unparseable
pub const DEFAULT_FILTER: &str = "info";

/// Install the global fmt subscriber.
///
/// `verbose` raises this crate to `debug` on top of whatever `RUST_LOG` says.
/// Calling this twice is harmless; the second call is ignored.
pub fn init_logging(verbose: bool) {
    let mut filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    if verbose {
        if let Ok(directive) = "stockzero_client=debug".parse() {
            filter = filter.add_directive(directive);
        }
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
