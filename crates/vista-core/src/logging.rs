#![forbid(unsafe_code)]

//! Logging helpers.
//!
//! Library code in every Vista crate logs through the `tracing` macros that
//! are re-exported here. Nothing is printed unless the application installs
//! a subscriber; [`init_logging`] installs a `tracing-subscriber` formatter
//! when the `tracing-subscriber` feature is enabled.
//!
//! The filter is read from `VISTA_LOG`, then `RUST_LOG`, defaulting to
//! `warn` so that degraded-state warnings (storage failures, unknown
//! breakpoint names) are visible out of the box.

pub use tracing::{debug, debug_span, error, info, info_span, trace, warn, warn_span};

/// Environment variable consulted first for the log filter.
pub const LOG_ENV: &str = "VISTA_LOG";

/// Filter used when neither `VISTA_LOG` nor `RUST_LOG` is set.
pub const DEFAULT_FILTER: &str = "warn";

/// Output format for [`init_logging`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Pretty,
    /// One JSON object per event, for production log shipping.
    Json,
}

/// Resolve the filter directive string from the environment.
#[must_use]
pub fn filter_directive() -> String {
    std::env::var(LOG_ENV)
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| DEFAULT_FILTER.to_string())
}

/// Install a global subscriber.
///
/// Returns `false` if a global subscriber was already installed (the
/// existing one is kept).
#[cfg(feature = "tracing-subscriber")]
pub fn init_logging(format: LogFormat) -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(filter_directive())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.is_ok()
}

/// Without the `tracing-subscriber` feature there is nothing to install.
#[cfg(not(feature = "tracing-subscriber"))]
pub fn init_logging(_format: LogFormat) -> bool {
    false
}
