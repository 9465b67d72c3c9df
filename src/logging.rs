//! Diagnostic tracing for the CLI.
//!
//! Reads the `TODO_LOG` env var (same syntax as `RUST_LOG`). Defaults to
//! `warn` if unset. Output goes to stderr so it never mixes with command
//! output on stdout.
//!
//! ```bash
//! TODO_LOG=todo_cli=debug todo add "Write tests"
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "TODO_LOG";

/// Initialize the global tracing subscriber. Safe to call more than once.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init();
}
