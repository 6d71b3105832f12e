//! Tracing setup.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Installs a global `tracing` subscriber writing to stderr.
///
/// Levels come from the `SWATCH_LOG` environment variable, in `EnvFilter`
/// syntax (`SWATCH_LOG=swatch_dispatch=debug,swatch=info`), falling back to
/// `swatch=info` when unset or invalid.
///
/// Idempotent. Does nothing if another global subscriber is already set.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env("SWATCH_LOG").unwrap_or_else(|_| EnvFilter::new("swatch=info"));

        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .try_init();
    });
}
