//! Logging setup for binaries and tests that embed the suppressors.
//!
//! The crate itself only emits `tracing` events: malformed input and kept
//! diffs are reported at `debug`, flatten collisions at `trace`. These helpers
//! install a subscriber that writes them to **stderr**, so stdout stays free
//! for the plugin handshake of the host process.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Controls log levels (e.g., `info`, `hemmer_elasticsearch_diff=debug`)
//!
//! # Examples
//!
//! ```bash
//! # See why a diff was kept
//! RUST_LOG=hemmer_elasticsearch_diff=debug ./my-provider
//!
//! # Include flatten collisions
//! RUST_LOG=hemmer_elasticsearch_diff=trace ./my-provider
//! ```

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn stderr_layer<S>() -> impl tracing_subscriber::Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
}

/// Initialize the default logging subscriber.
///
/// Respects `RUST_LOG` and falls back to `info`.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_logging() {
    init_logging_with_default("info");
}

/// Initialize logging with a custom default level.
///
/// Like [`init_logging`], but `default_level` is used when `RUST_LOG` is unset.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
///
/// # Example
///
/// ```ignore
/// use hemmer_elasticsearch_diff::init_logging_with_default;
///
/// init_logging_with_default("hemmer_elasticsearch_diff=debug");
/// ```
pub fn init_logging_with_default(default_level: &str) {
    tracing_subscriber::registry()
        .with(filter(default_level))
        .with(stderr_layer())
        .init();
}

/// Try to initialize logging, returning false if already initialized.
///
/// Useful from tests, where several cases may race to install a subscriber.
pub fn try_init_logging() -> bool {
    tracing_subscriber::registry()
        .with(filter("info"))
        .with(stderr_layer())
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    // The global subscriber can only be set once per process, so only the
    // filter directives are checked here.

    use super::*;

    const LOG_TARGET: &str = "hemmer_elasticsearch_diff";

    #[test]
    fn test_env_filter_parsing() {
        assert!(EnvFilter::try_new("info").is_ok());
        assert!(EnvFilter::try_new(format!("{}=debug", LOG_TARGET)).is_ok());
        assert!(EnvFilter::try_new(format!("warn,{}=trace", LOG_TARGET)).is_ok());
    }

    #[test]
    fn test_try_init_logging_is_idempotent() {
        try_init_logging();
        assert!(!try_init_logging());
    }
}
