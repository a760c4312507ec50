//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the mv3lint tracing/logging system.
///
/// Reads the `MV3LINT_LOG` environment variable for per-module log levels.
/// Format: `MV3LINT_LOG=mv3lint_analysis::rules=trace,mv3lint_analysis=debug`
///
/// Falls back to `mv3lint=info` if `MV3LINT_LOG` is not set or is invalid.
/// Calling it more than once has no further effect.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("MV3LINT_LOG")
            .unwrap_or_else(|_| EnvFilter::new("mv3lint=info"));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .try_init();
    });
}
