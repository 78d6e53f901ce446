//! Logging infrastructure for the timing engine.
//!
//! The engine itself only emits `tracing` events. Hosts that do not install
//! their own subscriber can use the helpers here:
//! - [`init_tracing`] writes to stderr
//! - [`init_file_tracing`] writes to stderr and a log file
//!
//! Both respect the `RUST_LOG` environment variable and fall back to the
//! provided default level.

mod types;

pub use types::LogLevel;

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingSettings;

/// Log file name used by [`init_file_tracing`].
pub const LOG_FILE_NAME: &str = "subtime.log";

/// Initialize global tracing subscriber for application-wide logging.
///
/// Should be called once at application startup.
pub fn init_tracing(default_level: LogLevel) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(env_filter(default_level))
        .init();
}

/// Initialize tracing to stderr plus a log file in `log_dir`.
///
/// The returned guard flushes the file writer when dropped; keep it alive
/// for the lifetime of the application.
pub fn init_file_tracing(
    log_dir: impl AsRef<Path>,
    default_level: LogLevel,
) -> std::io::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir.as_ref())?;

    let file_appender = tracing_appender::rolling::never(log_dir.as_ref(), LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .with(env_filter(default_level))
        .init();

    Ok(guard)
}

/// Initialize tracing from the `[logging]` settings section.
///
/// Returns the file writer guard when file logging is enabled.
pub fn init_from_settings(settings: &LoggingSettings) -> std::io::Result<Option<WorkerGuard>> {
    if settings.log_to_file {
        init_file_tracing(&settings.logs_folder, settings.level).map(Some)
    } else {
        init_tracing(settings.level);
        Ok(None)
    }
}

/// Initialize tracing for tests (only logs warnings and above).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

fn env_filter(default_level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_filter_str()))
}
