//! Default values and constants for all configuration settings.
//!
//! The defaults reproduce the reference airport: three runways, five gates,
//! two simultaneous tower operations and a five-minute run.

use std::path::PathBuf;
use std::time::Duration;

use super::file::config_directory;
use super::profile::AirportProfile;
use super::settings::*;
use crate::airport::DEFAULT_PRIORITY_POLL_INTERVAL;

// =============================================================================
// Simulation
// =============================================================================

/// Default simulation duration in seconds.
pub const DEFAULT_SIMULATION_DURATION_SECS: u64 = 300;

/// Default ceiling on planes spawned per run.
pub const DEFAULT_MAX_PLANES: usize = 100;

/// Default grace period for in-flight planes after the generator stops.
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 60;

/// Default interval between status log lines.
pub const DEFAULT_STATUS_INTERVAL_SECS: u64 = 30;

// =============================================================================
// Resources
// =============================================================================

/// Default number of runways.
pub const DEFAULT_RUNWAY_CAPACITY: usize = 3;

/// Default number of simultaneous tower operations.
pub const DEFAULT_TOWER_CAPACITY: usize = 2;

/// Default number of gates.
pub const DEFAULT_GATE_CAPACITY: usize = 5;

// =============================================================================
// Wait thresholds
// =============================================================================

/// Priority-gate wait before a domestic plane goes critical.
pub const DEFAULT_CRITICAL_WAIT_SECS: u64 = 60;

/// Priority-gate wait before a domestic plane crashes.
pub const DEFAULT_CRASH_WAIT_SECS: u64 = 90;

/// Stage wait before an acquisition chain is presumed deadlocked.
pub const DEFAULT_DEADLOCK_WAIT_SECS: u64 = 30;

// =============================================================================
// Generator
// =============================================================================

/// Minimum pause between spawns in seconds.
pub const DEFAULT_SPAWN_INTERVAL_MIN_SECS: u64 = 1;

/// Maximum pause between spawns in seconds.
pub const DEFAULT_SPAWN_INTERVAL_MAX_SECS: u64 = 10;

// =============================================================================
// Stage timings (milliseconds)
// =============================================================================

pub const DEFAULT_LANDING_MIN_MS: u64 = 500;
pub const DEFAULT_LANDING_MAX_MS: u64 = 1_500;
pub const DEFAULT_DISEMBARK_MIN_MS: u64 = 1_000;
pub const DEFAULT_DISEMBARK_MAX_MS: u64 = 3_000;
pub const DEFAULT_GATE_HOLD_MS: u64 = 500;
pub const DEFAULT_TAKEOFF_MIN_MS: u64 = 800;
pub const DEFAULT_TAKEOFF_MAX_MS: u64 = 2_000;
pub const DEFAULT_TURNAROUND_MIN_MS: u64 = 2_000;
pub const DEFAULT_TURNAROUND_MAX_MS: u64 = 5_000;

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "margolis.log";

fn millis_range(min: u64, max: u64) -> DurationRange {
    DurationRange::new(Duration::from_millis(min), Duration::from_millis(max))
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let airport = AirportProfile::default();
        Self {
            duration: Duration::from_secs(DEFAULT_SIMULATION_DURATION_SECS),
            resources: ResourceCapacities::default(),
            max_planes: DEFAULT_MAX_PLANES,
            thresholds: WaitThresholds::default(),
            priority_poll_interval: DEFAULT_PRIORITY_POLL_INTERVAL,
            spawn_interval: DurationRange::new(
                Duration::from_secs(DEFAULT_SPAWN_INTERVAL_MIN_SECS),
                Duration::from_secs(DEFAULT_SPAWN_INTERVAL_MAX_SECS),
            ),
            airport,
            international_percentage: airport.international_percentage(),
            timings: StageTimings::default(),
            shutdown_grace: Duration::from_secs(DEFAULT_SHUTDOWN_GRACE_SECS),
            status_interval: Duration::from_secs(DEFAULT_STATUS_INTERVAL_SECS),
            seed: None,
        }
    }
}

impl Default for ResourceCapacities {
    fn default() -> Self {
        Self {
            runway: DEFAULT_RUNWAY_CAPACITY,
            tower: DEFAULT_TOWER_CAPACITY,
            gate: DEFAULT_GATE_CAPACITY,
        }
    }
}

impl Default for WaitThresholds {
    fn default() -> Self {
        Self {
            critical: Duration::from_secs(DEFAULT_CRITICAL_WAIT_SECS),
            crash: Duration::from_secs(DEFAULT_CRASH_WAIT_SECS),
            deadlock: Duration::from_secs(DEFAULT_DEADLOCK_WAIT_SECS),
        }
    }
}

impl Default for StageTimings {
    fn default() -> Self {
        Self {
            landing: millis_range(DEFAULT_LANDING_MIN_MS, DEFAULT_LANDING_MAX_MS),
            disembark: millis_range(DEFAULT_DISEMBARK_MIN_MS, DEFAULT_DISEMBARK_MAX_MS),
            gate_hold: Duration::from_millis(DEFAULT_GATE_HOLD_MS),
            takeoff: millis_range(DEFAULT_TAKEOFF_MIN_MS, DEFAULT_TAKEOFF_MAX_MS),
            turnaround: millis_range(DEFAULT_TURNAROUND_MIN_MS, DEFAULT_TURNAROUND_MAX_MS),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: default_log_path(),
        }
    }
}

/// Default log file location (~/.margolis/margolis.log).
pub fn default_log_path() -> PathBuf {
    config_directory().join(DEFAULT_LOG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_capacities() {
        let resources = ResourceCapacities::default();
        assert_eq!(resources.runway, 3);
        assert_eq!(resources.tower, 2);
        assert_eq!(resources.gate, 5);
    }

    #[test]
    fn test_default_thresholds() {
        let thresholds = WaitThresholds::default();
        assert_eq!(thresholds.critical, Duration::from_secs(60));
        assert_eq!(thresholds.crash, Duration::from_secs(90));
        assert_eq!(thresholds.deadlock, Duration::from_secs(30));
    }

    #[test]
    fn test_default_percentage_follows_airport() {
        let config = SimulationConfig::default();
        assert_eq!(config.airport, AirportProfile::SaoPauloGuarulhos);
        assert_eq!(config.international_percentage, 35);
    }

    #[test]
    fn test_default_log_path_file_name() {
        let path = default_log_path();
        assert_eq!(path.file_name().unwrap(), DEFAULT_LOG_FILE);
    }
}
