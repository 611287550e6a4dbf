//! Simulation driver.
//!
//! Owns one run from start to report:
//!
//! 1. launch the plane generator and the status reporter
//! 2. wait for the configured duration, or for external cancellation
//! 3. stop the generator (in-flight planes are never interrupted)
//! 4. give in-flight planes the shutdown grace period to land their outcome,
//!    then abandon the rest
//! 5. build the report from the final stats and plane states

use std::sync::Arc;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::airport::Airport;
use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::generator::PlaneGenerator;
use crate::plane::PlaneRegistry;
use crate::report::SimulationReport;
use crate::stats::SimulationStats;
use crate::status::StatusReporter;

/// A validated, allocated simulation ready to run.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    airport: Arc<Airport>,
    registry: PlaneRegistry,
}

impl Simulation {
    /// Validates `config` and allocates the plane registry.
    ///
    /// This is the only place a run can fail; once created, a simulation
    /// always produces a report.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let registry = PlaneRegistry::with_capacity(config.max_planes)?;
        let airport = Arc::new(Airport::new(&config, Arc::new(SimulationStats::new())));
        Ok(Self {
            config,
            airport,
            registry,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The shared airport, for observing a run in progress.
    pub fn airport(&self) -> &Arc<Airport> {
        &self.airport
    }

    /// Runs until the configured duration elapses or `shutdown` is cancelled.
    pub async fn run(self, shutdown: CancellationToken) -> SimulationReport {
        let Self {
            config,
            airport,
            mut registry,
        } = self;
        let started = Instant::now();
        registry.start_clock(started);

        info!(
            airport = %config.airport,
            international_pct = config.international_percentage,
            duration_secs = config.duration.as_secs(),
            runways = config.resources.runway,
            towers = config.resources.tower,
            gates = config.resources.gate,
            max_planes = config.max_planes,
            "Airport open"
        );

        let spawning = shutdown.child_token();
        let generator = PlaneGenerator::new(Arc::clone(&airport), registry, &config);
        let status = tokio::spawn(
            StatusReporter::new(Arc::clone(&airport), config.status_interval)
                .run(spawning.clone()),
        );

        let deadline = async {
            tokio::select! {
                _ = tokio::time::sleep(config.duration) => {
                    info!(elapsed_secs = config.duration.as_secs(), "Simulation time over");
                }
                _ = shutdown.cancelled() => {
                    warn!("Simulation interrupted");
                }
            }
            spawning.cancel();
        };
        let (registry, ()) = tokio::join!(generator.run(spawning.clone()), deadline);

        info!(
            in_flight = registry.in_flight(),
            grace_secs = config.shutdown_grace.as_secs(),
            "Generator stopped, waiting for planes in flight"
        );
        let planes = registry.drain(&airport, config.shutdown_grace).await;

        if let Err(e) = status.await {
            warn!(error = %e, "Status reporter failed");
        }

        let stats = airport.stats().snapshot();
        info!(
            spawned = stats.total_spawned,
            succeeded = stats.succeeded,
            crashed_starvation = stats.crashed_by_starvation,
            crashed_deadlock = stats.crashed_by_deadlock,
            abandoned = stats.abandoned,
            "Simulation finished"
        );

        SimulationReport::new(config.airport, started.elapsed(), stats, planes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResourceCapacities;
    use std::time::Duration;

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = SimulationConfig {
            resources: ResourceCapacities {
                runway: 0,
                tower: 2,
                gate: 5,
            },
            ..SimulationConfig::default()
        };
        assert!(matches!(
            Simulation::new(config),
            Err(SimulationError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_new_rejects_zero_status_interval() {
        let config = SimulationConfig {
            status_interval: Duration::ZERO,
            ..SimulationConfig::default()
        };
        match Simulation::new(config) {
            Err(SimulationError::InvalidConfig { reason }) => {
                assert!(reason.contains("status_interval"));
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("zero status interval accepted"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_before_start_spawns_nothing() {
        let shutdown = CancellationToken::new();
        shutdown.cancel();
        let simulation = Simulation::new(SimulationConfig {
            seed: Some(3),
            ..SimulationConfig::default()
        })
        .unwrap();

        let report = simulation.run(shutdown).await;

        assert_eq!(report.stats.total_spawned, 0);
        assert!(report.stats.is_consistent());
        assert!(report.planes.is_empty());
    }
}
