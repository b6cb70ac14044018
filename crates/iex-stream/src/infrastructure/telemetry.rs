//! Tracing Setup
//!
//! Subscriber initialization for binaries, examples, and tests. Libraries
//! embedding this crate should install their own subscriber instead.

use tracing_subscriber::EnvFilter;

/// Initialize a formatting subscriber from `RUST_LOG`.
///
/// Defaults to `info` for this crate when `RUST_LOG` is unset. Safe to call
/// more than once; later calls are no-ops.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("iex_stream=info"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
