//! Logging setup for Margolis.
//!
//! - Writes to `~/.margolis/margolis.log` by default (cleared on each run)
//! - Optionally mirrors to stdout
//! - Level configurable via `RUST_LOG`, defaulting to `info`

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::{config_directory, DEFAULT_LOG_FILE};

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard flushes and closes the log file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Initialize logging.
///
/// Creates `log_dir` if needed, clears any previous `log_file` in it and
/// installs a global subscriber writing to the file and, if
/// `stdout_enabled`, to stdout. When `RUST_LOG` is not set the level is
/// `info`, or `debug` with `debug_mode`.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot
/// be cleared.
pub fn init_logging(
    log_dir: &Path,
    log_file: &str,
    stdout_enabled: bool,
    debug_mode: bool,
) -> Result<LoggingGuard, io::Error> {
    prepare_log_file(log_dir, log_file)?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    let stdout_layer = stdout_enabled.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(io::stdout)
            .with_ansi(true)
            .compact()
    });

    let default_level = if debug_mode { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Creates the log directory and truncates the log file.
fn prepare_log_file(log_dir: &Path, log_file: &str) -> io::Result<()> {
    fs::create_dir_all(log_dir)?;
    fs::write(log_dir.join(log_file), "")
}

/// Splits a configured log file path into the directory and file name
/// [`init_logging`] expects.
pub fn split_log_path(path: &Path) -> (PathBuf, String) {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());
    (dir, file)
}

/// Get default log directory path.
pub fn default_log_dir() -> PathBuf {
    config_directory()
}

/// Get default log file name.
pub fn default_log_file() -> &'static str {
    DEFAULT_LOG_FILE
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_paths() {
        assert_eq!(default_log_file(), "margolis.log");
        assert!(default_log_dir().ends_with(".margolis"));
    }

    #[test]
    fn test_split_log_path() {
        let (dir, file) = split_log_path(Path::new("/var/log/margolis/run.log"));
        assert_eq!(dir, PathBuf::from("/var/log/margolis"));
        assert_eq!(file, "run.log");

        let (dir, file) = split_log_path(Path::new("run.log"));
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(file, "run.log");
    }

    #[test]
    fn test_clears_existing_file() {
        // init_logging installs a global subscriber, so only the file handling is exercised here
        let temp = TempDir::new().unwrap();
        let log_dir = temp.path().join("nested");
        fs::create_dir_all(&log_dir).unwrap();
        fs::write(log_dir.join("margolis.log"), "old log data").unwrap();

        prepare_log_file(&log_dir, "margolis.log").unwrap();

        assert_eq!(fs::read_to_string(log_dir.join("margolis.log")).unwrap(), "");
    }

    #[test]
    fn test_creates_missing_directory() {
        let temp = TempDir::new().unwrap();
        let log_dir = temp.path().join("a").join("b");

        prepare_log_file(&log_dir, "run.log").unwrap();

        assert!(log_dir.join("run.log").exists());
    }

    #[test]
    fn test_guard_structure() {
        use tracing_appender::non_blocking::NonBlocking;

        let (non_blocking, guard) = NonBlocking::new(std::io::sink());
        drop(non_blocking);

        let _logging_guard = LoggingGuard { _file_guard: guard };
    }
}
