//! Tracing setup for binaries and tests that want inference logs.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a global subscriber filtered by `RUST_LOG`.
///
/// Does nothing when `RUST_LOG` is unset or a subscriber is already
/// installed, so it is safe to call from every test.
pub fn init_tracing() {
    if std::env::var("RUST_LOG").is_err() {
        return;
    }
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}
