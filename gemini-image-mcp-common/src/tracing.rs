//! Tracing initialization for the image server.
//!
//! Log output goes to stderr: with the stdio transport, stdout carries the
//! MCP JSON-RPC stream and must not be interleaved with log lines.
//!
//! # Usage
//!
//! ```no_run
//! use gemini_image_mcp_common::tracing::init_tracing;
//!
//! fn main() {
//!     init_tracing();
//!     tracing::info!("Application started");
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Controls the log level and filtering. Examples:
//!   - `RUST_LOG=debug` - Enable debug logging for all modules
//!   - `RUST_LOG=gemini_image_mcp=debug` - Enable debug for the server crate
//!   - `RUST_LOG=warn,gemini_image_mcp_common=debug` - Warn by default, debug for common

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    util::TryInitError,
    EnvFilter,
};

/// Default filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Initialize the tracing subscriber with environment-based filtering.
///
/// # Panics
///
/// This function will panic if called more than once, as the global
/// subscriber can only be set once.
pub fn init_tracing() {
    init_tracing_with_default(DEFAULT_LOG_LEVEL);
}

/// Initialize tracing with a custom default level.
///
/// Similar to `init_tracing()`, but allows specifying a default log level
/// when `RUST_LOG` is not set.
///
/// ```no_run
/// use gemini_image_mcp_common::tracing::init_tracing_with_default;
///
/// init_tracing_with_default("debug");
/// ```
pub fn init_tracing_with_default(default_level: &str) {
    subscriber(env_filter(default_level)).init();
}

/// Try to initialize tracing, returning an error if already initialized.
///
/// Unlike `init_tracing()`, this function does not panic if the subscriber
/// is already set, which makes it usable from tests.
///
/// ```
/// use gemini_image_mcp_common::tracing::try_init_tracing;
///
/// let _ = try_init_tracing();
/// ```
pub fn try_init_tracing() -> Result<(), TryInitError> {
    subscriber(env_filter(DEFAULT_LOG_LEVEL)).try_init()
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn subscriber(env_filter: EnvFilter) -> impl tracing::Subscriber + Send + Sync + 'static {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry().with(env_filter).with(fmt_layer)
}
