//! Shared plumbing for the `tweetmind-server` and `tweetmind` binaries.

pub mod cli;
pub mod repl;

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt};

static TRACING: Once = Once::new();

/// Installs the global subscriber once. `RUST_LOG` overrides the default
/// `info` filter. Logs go to stderr so they never interleave with REPL
/// output on stdout.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_level(true)
            .with_writer(std::io::stderr)
            .init();
    });
}
