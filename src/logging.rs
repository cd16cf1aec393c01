use std::fs;
use std::io;
use std::path::Path;

use time::UtcOffset;
use time::macros::format_description;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{self, EnvFilter, fmt, prelude::*};

/// Initialize logging to stderr and, optionally, to a file.
///
/// Returns the `WorkerGuard` of the non-blocking file writer; keep it alive for
/// the duration of the program or buffered file output may be lost.
///
/// # Arguments
/// * `no_color` - Disable ANSI colors in stderr output
/// * `log_level` - Filter directive for stderr (otherwise `RUST_LOG`, defaulting to "info")
/// * `log_file` - Append DEBUG-level logs to this file
///
/// Calling this again after a subscriber has been installed is not an error.
pub fn init_logger(no_color: bool, log_level: Option<&str>, log_file: Option<&Path>) -> io::Result<WorkerGuard> {
    let timer = fmt::time::OffsetTime::new(
        UtcOffset::UTC,
        format_description!("[[[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z]"),
    );

    let stderr_filter = match log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_timer(timer.clone())
        .with_ansi(!no_color)
        .with_filter(stderr_filter);

    let result = match log_file {
        Some(path) => {
            let file = fs::OpenOptions::new().create(true).append(true).open(path)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            let file_layer = fmt::layer()
                .with_writer(non_blocking)
                .with_timer(timer)
                .with_ansi(false)
                .with_filter(EnvFilter::new("debug"));

            tracing_subscriber::registry()
                .with(stderr_layer)
                .with(file_layer)
                .try_init()
                .map(|()| guard)
        }
        None => {
            let (_, guard) = tracing_appender::non_blocking(io::sink());
            tracing_subscriber::registry()
                .with(stderr_layer)
                .try_init()
                .map(|()| guard)
        }
    };

    match result {
        Ok(guard) => Ok(guard),
        // Another subscriber is already installed (tests, embedding programs).
        Err(e) if e.to_string().contains("already been set") || e.to_string().contains("SetLoggerError") => {
            let (_, guard) = tracing_appender::non_blocking(io::sink());
            Ok(guard)
        }
        Err(e) => Err(io::Error::other(e)),
    }
}
