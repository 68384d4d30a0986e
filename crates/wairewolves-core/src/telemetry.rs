//! Tracing subscriber setup.
//!
//! The library only emits `tracing` events; hosts call [`init_tracing`] once
//! at startup. `RUST_LOG` overrides the default directive.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is not set.
pub const DEFAULT_DIRECTIVE: &str = "info,wairewolves_core=debug";

/// Installs a global fmt subscriber.
///
/// Returns `false` if a global subscriber was already installed, which is
/// expected when several tests share one process.
pub fn init_tracing(default_directive: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

/// Test variant that writes through the test harness' captured output.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(DEFAULT_DIRECTIVE))
        .with_test_writer()
        .try_init();
}
