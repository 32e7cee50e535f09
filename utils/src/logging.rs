//! Structured logging initialization via `tracing`.

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber for the gateway.
///
/// Filtering follows the `RUST_LOG` environment variable; when it is unset
/// the gateway logs at `info`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
