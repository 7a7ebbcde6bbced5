use std::fs::{File, OpenOptions};

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use crate::constants::ENV_LOG_FILE;

/// Level for a count of `-v` flags: info, then debug, then trace.
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn open_log_file() -> Option<(String, File)> {
    let path = std::env::var(ENV_LOG_FILE).ok().filter(|p| !p.is_empty())?;
    match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => Some((path, file)),
        Err(e) => {
            eprintln!("Failed to open log file {}: {}", path, e);
            None
        }
    }
}

/// Stderr logging for the batch CLI, plus a debug-level file layer when
/// `GHNOT_LOG_FILE` is set.
pub fn init_tracing(verbosity: u8) {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(level_for_verbosity(verbosity));

    let file_layer = open_log_file().map(|(_, file)| {
        fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(true)
            .with_filter(LevelFilter::DEBUG)
    });

    let _ = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init();
}

/// File-only logging for the terminal UI, which owns stdout and stderr.
/// Without `GHNOT_LOG_FILE` nothing is recorded.
pub fn init_file_tracing() {
    let Some((path, file)) = open_log_file() else {
        return;
    };

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_filter(LevelFilter::DEBUG);

    if tracing_subscriber::registry().with(file_layer).try_init().is_ok() {
        eprintln!("File logging enabled: {}", path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(level_for_verbosity(0), LevelFilter::INFO);
        assert_eq!(level_for_verbosity(1), LevelFilter::DEBUG);
        assert_eq!(level_for_verbosity(2), LevelFilter::TRACE);
        assert_eq!(level_for_verbosity(9), LevelFilter::TRACE);
    }
}
