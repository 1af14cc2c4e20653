//! Log subscriber setup for the binary.

use tracing_subscriber::prelude::*;

/// Installs the global subscriber: `RUST_LOG` filter (default `info`) and a
/// plain fmt layer on stderr, leaving stdout to the serial stream.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
