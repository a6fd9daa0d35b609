//! Logging Infrastructure
//!
//! Structured logging setup with support for both development and production environments.

use std::path::Path;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the logger
pub fn init_logger() {
    init_logger_with_file(None, false, None);
}

/// Initialize the logger with optional JSON formatting and file output
///
/// `RUST_LOG` takes precedence over `log_level` when set. File output is only
/// enabled when `log_dir` already exists.
pub fn init_logger_with_file(log_level: Option<&str>, json: bool, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("desk_server={level},tower_http={level},{level}")));

    let file_writer = log_dir.and_then(|dir| {
        let log_path = Path::new(dir);
        if log_path.is_dir() {
            Some(tracing_appender::rolling::daily(log_path, "desk-server"))
        } else {
            eprintln!("Log directory {dir} does not exist, logging to stdout only");
            None
        }
    });

    let registry = tracing_subscriber::registry().with(filter);

    // try_init: tests and embedders may have installed a subscriber already
    let result = match (file_writer, json) {
        (Some(writer), _) => registry
            .with(fmt::layer().with_target(false).with_ansi(false).with_writer(writer))
            .try_init(),
        (None, true) => registry
            .with(fmt::layer().with_target(false).json())
            .try_init(),
        (None, false) => registry
            .with(
                fmt::layer()
                    .with_file(false)
                    .with_line_number(false)
                    .with_thread_ids(false)
                    .with_target(false),
            )
            .try_init(),
    };

    if let Err(e) = result {
        eprintln!("Logger already initialized: {e}");
    }
}
