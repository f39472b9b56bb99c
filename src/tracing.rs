//! Logging setup for the playground binary
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - engine swaps, option updates
//! - `RUST_LOG=maskedit::controller=trace` - every event, edit and caret move
//!
//! Logs are also written to `~/.config/maskedit/logs/maskedit.log` with daily
//! rotation, at debug level.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config_paths::{ensure_logs_dir, LOG_FILE_PREFIX};

/// Initialize tracing subscriber with console and file logging
///
/// Console output goes to stderr so it never mixes with the state dump on
/// stdout. `no_file` skips the rolling log file.
pub fn init(no_file: bool) {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let file_layer = if no_file {
        None
    } else {
        match ensure_logs_dir() {
            Ok(logs_dir) => {
                let file_appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
                Some(
                    fmt::layer()
                        .with_writer(file_appender)
                        .with_ansi(false)
                        .with_target(true)
                        .with_line_number(true)
                        .with_filter(EnvFilter::new("debug")),
                )
            }
            Err(e) => {
                eprintln!("Warning: Could not initialize file logging: {}", e);
                None
            }
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
