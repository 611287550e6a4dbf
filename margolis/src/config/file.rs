//! Configuration file handling for ~/.margolis/config.ini.
//!
//! Settings structs live in [`super::settings`], constants in
//! [`super::defaults`], parsing in [`super::parser`].

use ini::Ini;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::settings::ConfigFile;
use crate::error::SimulationError;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Values parsed individually but do not form a runnable simulation
    #[error("Invalid configuration: {0}")]
    Rejected(#[from] SimulationError),
}

impl ConfigFile {
    /// Load configuration from the default path (~/.margolis/config.ini).
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        Self::from_ini(&ini)
    }

    /// Builds a configuration from already-parsed INI content.
    pub fn from_ini(ini: &Ini) -> Result<Self, ConfigFileError> {
        let config = super::parser::parse_ini(ini)?;
        config.simulation.validate()?;
        Ok(config)
    }
}

/// Get the path to the config directory (~/.margolis).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".margolis")
}

/// Get the path to the config file (~/.margolis/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}
