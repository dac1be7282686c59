//! Tracing subscriber setup for hosts embedding keytrap
//!
//! The library itself only emits `tracing` events: binding registration and
//! sequence transitions at `debug`, per-event resolution at `trace`. Hosts
//! that have no subscriber of their own can install one here.
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=keytrap=debug` - registration and sequence state
//! - `RUST_LOG=keytrap::resolver=trace` - every resolved event

use std::path::Path;

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter, Layer,
};

/// Initialize tracing with console output and a daily log file under the
/// config directory
///
/// Panics if a global subscriber is already installed; see [`try_init`].
pub fn init() {
    if let Err(e) = try_init() {
        panic!("Failed to initialize tracing: {}", e);
    }
}

/// Like [`init`], but reports an already-installed subscriber as an error
pub fn try_init() -> Result<(), TryInitError> {
    match crate::config_paths::ensure_logs_dir() {
        Ok(dir) => try_init_with_log_dir(Some(&dir)),
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            try_init_with_log_dir(None)
        }
    }
}

/// Initialize tracing, writing `keytrap.log` into `log_dir` when given
///
/// Console output respects RUST_LOG and defaults to `warn`. The file layer
/// always records at debug level.
pub fn try_init_with_log_dir(log_dir: Option<&Path>) -> Result<(), TryInitError> {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let file_layer = log_dir.map(|dir| {
        let file_appender = tracing_appender::rolling::daily(dir, "keytrap.log");
        fmt::layer()
            .with_writer(file_appender)
            .with_ansi(false)
            .with_target(true)
            .with_line_number(true)
            .with_filter(EnvFilter::new("debug"))
    });

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
}
