//! Subscriber setup for the worker binary.

use tracing_subscriber::EnvFilter;

/// Log to stderr, filtered by `RUST_LOG`. Silent when the variable is unset.
///
/// Stdout is reserved for protocol responses.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}
