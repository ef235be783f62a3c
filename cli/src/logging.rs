//! Tracing initialization

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global subscriber.
///
/// `RUST_LOG` wins when no `-v` flag is given. A log file, when requested,
/// receives the same events without ANSI colors; the returned guard must be
/// kept alive until exit so buffered lines are flushed. A log file that
/// cannot be opened is reported as a warning on stderr.
pub fn init_tracing(verbose: u8, log_file: Option<&Path>) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let opened = log_file.map(|path| (path, open_log_file(path)));
    let mut open_error = None;
    let (file_layer, guard) = match opened {
        Some((_, Ok(file))) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        Some((path, Err(e))) => {
            open_error = Some((path, e));
            (None, None)
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    if let Some((path, e)) = open_error {
        warn!("Cannot open log file {}: {}", path.display(), e);
    }
    guard
}

/// Open `path` for appending, creating missing parent directories.
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        std::fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
