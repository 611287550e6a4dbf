//! Periodic status reporter.
//!
//! Logs a one-line summary of the airport at a fixed interval while the
//! simulation runs.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::airport::{Airport, ResourceKind};

/// Logs airport status until cancelled.
pub struct StatusReporter {
    airport: Arc<Airport>,
    interval: Duration,
}

impl StatusReporter {
    pub fn new(airport: Arc<Airport>, interval: Duration) -> Self {
        Self { airport, interval }
    }

    /// Runs the reporter until cancelled.
    pub async fn run(self, shutdown: CancellationToken) {
        let started = Instant::now();
        let mut interval = tokio::time::interval_at(started + self.interval, self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = interval.tick() => {}
            }
            self.report(started.elapsed());
        }
    }

    fn report(&self, elapsed: Duration) {
        let stats = self.airport.stats().snapshot();
        let pools = self.airport.pools();
        info!(
            elapsed_secs = elapsed.as_secs(),
            active = stats.active,
            spawned = stats.total_spawned,
            succeeded = stats.succeeded,
            crashed_starvation = stats.crashed_by_starvation,
            crashed_deadlock = stats.crashed_by_deadlock,
            runways_free = pools.available(ResourceKind::Runway),
            towers_free = pools.available(ResourceKind::Tower),
            gates_free = pools.available(ResourceKind::Gate),
            international = self.airport.priority().international_in_flight(),
            "Status"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::stats::SimulationStats;

    #[tokio::test(start_paused = true)]
    async fn test_reporter_stops_on_cancel() {
        let airport = Arc::new(Airport::new(
            &SimulationConfig::default(),
            Arc::new(SimulationStats::new()),
        ));
        let shutdown = CancellationToken::new();
        let task = tokio::spawn(
            StatusReporter::new(airport, Duration::from_secs(30)).run(shutdown.clone()),
        );

        tokio::time::sleep(Duration::from_secs(95)).await;
        assert!(!task.is_finished());

        shutdown.cancel();
        task.await.unwrap();
    }
}
