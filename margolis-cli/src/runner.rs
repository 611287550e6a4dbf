//! CLI runner for common setup.
//!
//! Encapsulates configuration loading and logging initialization so
//! command handlers start from a ready environment.

use std::path::Path;
use tracing::info;

use margolis::config::ConfigFile;
use margolis::logging::{init_logging, split_log_path, LoggingGuard};

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Load configuration and initialize logging.
    ///
    /// Uses `config_path` if given, otherwise `~/.margolis/config.ini`.
    /// Log lines go to the configured log file only, so they do not
    /// interleave with the report on stdout.
    pub fn new(config_path: Option<&Path>, debug_mode: bool) -> Result<Self, CliError> {
        let config = match config_path {
            Some(path) => ConfigFile::load_from(path)?,
            None => ConfigFile::load()?,
        };

        let (log_dir, log_file) = split_log_path(&config.logging.file);
        let logging_guard =
            init_logging(&log_dir, &log_file, false, debug_mode).map_err(CliError::LoggingInit)?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("Margolis v{}", margolis::VERSION);
        info!("Margolis CLI: {} command", command);
        info!(log_file = %self.config.logging.file.display(), "Logging to file");
    }
}
