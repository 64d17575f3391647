//! Tracing bootstrap for demos and tests.
//!
//! The crate itself only emits `tracing` events; installing a subscriber
//! is the application's choice. This helper wires up the common case.

use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber honoring `RUST_LOG`.
///
/// Defaults to `info` when `RUST_LOG` is unset. Does nothing if a
/// subscriber is already installed, so tests may call it repeatedly.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
