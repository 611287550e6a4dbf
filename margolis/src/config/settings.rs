//! Settings structs for all configuration sections.
//!
//! These are pure data types. Defaults live in [`super::defaults`], INI
//! parsing in [`super::parser`].

use rand::Rng;
use std::path::PathBuf;
use std::time::Duration;

use super::profile::AirportProfile;
use crate::error::SimulationError;

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    /// Simulation parameters handed to the core
    pub simulation: SimulationConfig,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Everything the simulation core needs for one run.
///
/// Immutable once the run starts.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// How long the generator keeps spawning planes.
    pub duration: Duration,
    /// Capacity of each shared resource.
    pub resources: ResourceCapacities,
    /// Ceiling on the number of planes spawned in one run.
    pub max_planes: usize,
    /// Starvation and deadlock thresholds.
    pub thresholds: WaitThresholds,
    /// How often a domestic plane re-checks the priority gate.
    pub priority_poll_interval: Duration,
    /// Pause between two spawns.
    pub spawn_interval: DurationRange,
    /// Airport the traffic mix was taken from.
    pub airport: AirportProfile,
    /// Chance (0-100) that a spawned plane is international.
    pub international_percentage: u8,
    /// Simulated work durations of each stage.
    pub timings: StageTimings,
    /// How long in-flight planes may keep running after the generator stops.
    pub shutdown_grace: Duration,
    /// Interval between status log lines.
    pub status_interval: Duration,
    /// RNG seed; `None` draws one from entropy.
    pub seed: Option<u64>,
}

impl SimulationConfig {
    /// Default configuration with the traffic mix of the given airport.
    pub fn for_airport(airport: AirportProfile) -> Self {
        Self {
            airport,
            international_percentage: airport.international_percentage(),
            ..Self::default()
        }
    }

    /// Checks the configuration for values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), SimulationError> {
        let invalid = |reason: &str| {
            Err(SimulationError::InvalidConfig {
                reason: reason.to_string(),
            })
        };

        if self.resources.runway == 0 || self.resources.tower == 0 || self.resources.gate == 0 {
            return invalid("every resource capacity must be at least 1");
        }
        if self.max_planes == 0 {
            return invalid("max_planes must be at least 1");
        }
        if self.international_percentage > 100 {
            return invalid("international_percentage must be between 0 and 100");
        }
        if self.thresholds.critical >= self.thresholds.crash {
            return invalid("critical wait must be shorter than crash wait");
        }
        if self.priority_poll_interval.is_zero() {
            return invalid("priority_poll_interval must be greater than zero");
        }
        if self.status_interval.is_zero() {
            return invalid("status_interval must be greater than zero");
        }
        for (name, range) in [
            ("spawn_interval", self.spawn_interval),
            ("landing", self.timings.landing),
            ("disembark", self.timings.disembark),
            ("takeoff", self.timings.takeoff),
            ("turnaround", self.timings.turnaround),
        ] {
            if range.min > range.max {
                return Err(SimulationError::InvalidConfig {
                    reason: format!("{} range minimum exceeds its maximum", name),
                });
            }
        }
        Ok(())
    }
}

/// Capacity of each shared resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceCapacities {
    /// Number of runways
    pub runway: usize,
    /// Simultaneous operations the control tower can direct
    pub tower: usize,
    /// Number of gates
    pub gate: usize,
}

/// Thresholds for the wait-time heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitThresholds {
    /// Priority-gate wait after which a domestic plane is flagged critical.
    pub critical: Duration,
    /// Priority-gate wait after which a domestic plane crashes.
    pub crash: Duration,
    /// Stage wait after which an acquisition chain is presumed deadlocked.
    pub deadlock: Duration,
}

/// An inclusive range of durations.
///
/// A range with equal bounds always yields that exact duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationRange {
    pub min: Duration,
    pub max: Duration,
}

impl DurationRange {
    pub const fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    /// A range that always yields `duration`.
    pub const fn fixed(duration: Duration) -> Self {
        Self::new(duration, duration)
    }

    /// Draws a duration from the range.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.min >= self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }
}

/// Simulated work durations of the lifecycle stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTimings {
    /// Runway + tower held for landing.
    pub landing: DurationRange,
    /// Gate + tower held for disembarking.
    pub disembark: DurationRange,
    /// Extra time the gate stays held after the tower is released.
    pub gate_hold: Duration,
    /// Gate + runway + tower held for takeoff.
    pub takeoff: DurationRange,
    /// Resource-free ground time between disembark and takeoff.
    pub turnaround: DurationRange,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
