//! Configuration for a simulation run.
//!
//! A run is described by a [`SimulationConfig`]: resource capacities,
//! duration, wait thresholds, generator pacing, stage timings and the
//! international traffic share. It can be built in code or loaded from
//! `~/.margolis/config.ini`:
//!
//! ```ini
//! [simulation]
//! duration = 300
//! max_planes = 100
//!
//! [airport]
//! profile = gru
//!
//! [resources]
//! runway = 3
//! tower = 2
//! gate = 5
//!
//! [thresholds]
//! critical_wait = 60
//! crash_wait = 90
//! deadlock_wait = 30
//! ```
//!
//! # Example
//!
//! ```
//! use margolis::config::{AirportProfile, SimulationConfig};
//!
//! let config = SimulationConfig::for_airport(AirportProfile::LondonHeathrow);
//! assert_eq!(config.international_percentage, 95);
//! assert!(config.validate().is_ok());
//! ```

mod defaults;
mod file;
mod parser;
mod profile;
mod settings;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use profile::AirportProfile;
pub use settings::{
    ConfigFile, DurationRange, LoggingSettings, ResourceCapacities, SimulationConfig,
    StageTimings, WaitThresholds,
};
