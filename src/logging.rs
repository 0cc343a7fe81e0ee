//! Logging setup for the guardtmp binary.
//!
//! Library code only emits `tracing` events; installing a subscriber is
//! left to the host program. The CLI writes them to stderr so a child's
//! stdout stays clean.

use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber.
///
/// `RUST_LOG` takes precedence; without it only warnings are shown, or
/// debug output for this crate when `verbose` is set.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("guardtmp={default_level}")));

    // A subscriber may already be installed (e.g. by a host program or a test).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
