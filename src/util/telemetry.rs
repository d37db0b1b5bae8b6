//! Telemetry helpers for structured logging and tracing.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/telemetry. Users can install their own subscriber; this
/// helper installs a default env-based subscriber if none is set, falling
/// back to `warn` when `RUST_LOG` is unset.
pub fn init_tracing() {
    init_tracing_with("warn");
}

/// Like [`init_tracing`], with an explicit fallback filter directive used
/// when `RUST_LOG` is unset or unparsable.
pub fn init_tracing_with(default_directive: &str) {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
