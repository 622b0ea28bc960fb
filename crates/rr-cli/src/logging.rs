//! Logging init: fmt subscriber on stderr, filtered by `RUST_LOG`.
//!
//! The library crates log through the `log` facade; the subscriber picks
//! those records up as well.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `verbose` lowers the default level to
/// `debug`; an explicit `RUST_LOG` always wins.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
