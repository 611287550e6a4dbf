//! Arena of plane tasks for one run.
//!
//! The registry is allocated once for the configured maximum number of
//! planes. It owns every plane task handle and, at shutdown, joins them
//! against a single grace deadline.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info_span, warn, Instrument};

use super::lifecycle::fly;
use super::model::{FlightClass, Plane, PlaneId, PlaneState};
use crate::airport::Airport;
use crate::error::SimulationError;

struct PlaneSlot {
    id: PlaneId,
    class: FlightClass,
    state_rx: watch::Receiver<PlaneState>,
    launched_at: Instant,
    handle: JoinHandle<Plane>,
}

/// Where a plane was when the run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalPlaneState {
    pub id: PlaneId,
    pub class: FlightClass,
    pub state: PlaneState,
    /// True if the plane's task was aborted at shutdown.
    pub abandoned: bool,
    /// Time from run start to the plane's arrival.
    pub created_after: Duration,
    /// Time from run start to the plane's terminal state, if it reached one.
    pub finished_after: Option<Duration>,
}

/// Owns every plane task of a run.
pub struct PlaneRegistry {
    slots: Vec<PlaneSlot>,
    capacity: usize,
    started_at: Instant,
}

impl PlaneRegistry {
    /// Allocates room for `capacity` planes up front.
    ///
    /// Fails with [`SimulationError::RegistryAllocation`] if the memory
    /// cannot be reserved.
    pub fn with_capacity(capacity: usize) -> Result<Self, SimulationError> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|source| SimulationError::RegistryAllocation { capacity, source })?;
        Ok(Self {
            slots,
            capacity,
            started_at: Instant::now(),
        })
    }

    /// Sets the instant plane arrival and finish times are measured from.
    pub fn start_clock(&mut self, at: Instant) {
        self.started_at = at;
    }

    /// Number of planes launched so far.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    /// Identifier the next launched plane will get.
    pub fn next_id(&self) -> PlaneId {
        PlaneId(self.slots.len() as u32 + 1)
    }

    /// Spawns a task flying a new plane of `class`.
    ///
    /// Returns `None` without spawning if the registry is full.
    pub fn launch<R>(
        &mut self,
        airport: &Arc<Airport>,
        class: FlightClass,
        rng: R,
    ) -> Option<PlaneId>
    where
        R: Rng + Send + 'static,
    {
        if self.is_full() {
            return None;
        }

        let id = self.next_id();
        let (plane, state_rx) = Plane::new(id, class);
        let span = info_span!("plane", id = %id, class = %class);
        let handle = tokio::spawn(fly(Arc::clone(airport), plane, rng).instrument(span));

        self.slots.push(PlaneSlot {
            id,
            class,
            state_rx,
            launched_at: Instant::now(),
            handle,
        });
        Some(id)
    }

    /// Number of launched planes not yet in a terminal state.
    pub fn in_flight(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| !slot.state_rx.borrow().is_terminal())
            .count()
    }

    /// Waits for every plane until `grace` has passed, then aborts the rest.
    ///
    /// Aborted planes keep the last state they published and are recorded
    /// with the airport's stats as abandoned.
    pub async fn drain(self, airport: &Airport, grace: Duration) -> Vec<FinalPlaneState> {
        let deadline = Instant::now() + grace;
        let started_at = self.started_at;
        let mut finals = Vec::with_capacity(self.slots.len());

        for mut slot in self.slots {
            let created_after = slot.launched_at.duration_since(started_at);
            let mut abandoned = false;

            let finished = match tokio::time::timeout_at(deadline, &mut slot.handle).await {
                Ok(Ok(plane)) => Some(plane),
                Ok(Err(e)) => {
                    warn!(plane = %slot.id, error = %e, "Plane task failed");
                    None
                }
                Err(_) => {
                    slot.handle.abort();
                    abandoned = true;
                    airport.stats().plane_abandoned();
                    warn!(
                        plane = %slot.id,
                        state = %*slot.state_rx.borrow(),
                        "Plane still active at shutdown, abandoned"
                    );
                    None
                }
            };

            let record = match finished {
                Some(plane) => FinalPlaneState {
                    id: slot.id,
                    class: slot.class,
                    state: plane.state(),
                    abandoned: false,
                    created_after,
                    finished_after: plane.finished_at().map(|at| at.duration_since(started_at)),
                },
                None => FinalPlaneState {
                    id: slot.id,
                    class: slot.class,
                    state: *slot.state_rx.borrow(),
                    abandoned,
                    created_after,
                    finished_after: None,
                },
            };
            finals.push(record);
        }

        debug!(planes = finals.len(), "Registry drained");
        finals
    }
}

impl std::fmt::Debug for PlaneRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaneRegistry")
            .field("launched", &self.slots.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DurationRange, SimulationConfig, StageTimings};
    use crate::stats::SimulationStats;
    use rand::rngs::mock::StepRng;

    fn airport() -> Arc<Airport> {
        let config = SimulationConfig {
            timings: StageTimings {
                landing: DurationRange::fixed(Duration::from_secs(1)),
                disembark: DurationRange::fixed(Duration::from_secs(1)),
                gate_hold: Duration::from_millis(500),
                takeoff: DurationRange::fixed(Duration::from_secs(1)),
                turnaround: DurationRange::fixed(Duration::from_secs(2)),
            },
            ..SimulationConfig::default()
        };
        Arc::new(Airport::new(&config, Arc::new(SimulationStats::new())))
    }

    #[test]
    fn test_with_capacity_reserves_up_front() {
        let registry = PlaneRegistry::with_capacity(100).unwrap();
        assert!(registry.is_empty());
        assert_eq!(registry.capacity(), 100);
        assert_eq!(registry.next_id(), PlaneId(1));
    }

    #[test]
    fn test_impossible_capacity_is_an_error() {
        let err = PlaneRegistry::with_capacity(usize::MAX).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::RegistryAllocation { capacity, .. } if capacity == usize::MAX
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_launch_stops_at_capacity() {
        let airport = airport();
        let mut registry = PlaneRegistry::with_capacity(2).unwrap();

        assert_eq!(
            registry.launch(&airport, FlightClass::Domestic, StepRng::new(0, 1)),
            Some(PlaneId(1))
        );
        assert_eq!(
            registry.launch(&airport, FlightClass::International, StepRng::new(0, 1)),
            Some(PlaneId(2))
        );
        assert!(registry.is_full());
        assert_eq!(
            registry.launch(&airport, FlightClass::Domestic, StepRng::new(0, 1)),
            None
        );
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drain_collects_finished_planes() {
        let airport = airport();
        let mut registry = PlaneRegistry::with_capacity(4).unwrap();
        for class in [FlightClass::Domestic, FlightClass::International] {
            airport.stats().plane_entered();
            registry.launch(&airport, class, StepRng::new(0, 1));
        }

        let finals = registry.drain(&airport, Duration::from_secs(60)).await;

        assert_eq!(finals.len(), 2);
        for record in &finals {
            assert_eq!(record.state, PlaneState::Finished);
            assert!(!record.abandoned);
            assert!(record.finished_after.is_some());
        }
        assert_eq!(airport.stats().snapshot().abandoned, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_measured_from_clock_start() {
        let airport = airport();
        let mut registry = PlaneRegistry::with_capacity(1).unwrap();

        tokio::time::sleep(Duration::from_secs(5)).await;
        registry.start_clock(Instant::now());
        tokio::time::sleep(Duration::from_secs(2)).await;
        airport.stats().plane_entered();
        registry.launch(&airport, FlightClass::Domestic, StepRng::new(0, 1));

        let finals = registry.drain(&airport, Duration::from_secs(60)).await;

        let created = finals[0].created_after;
        assert!(created >= Duration::from_secs(2) && created < Duration::from_millis(2_010));
        assert!(finals[0].finished_after.unwrap() < Duration::from_secs(20));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drain_abandons_planes_past_grace() {
        let airport = airport();
        let mut registry = PlaneRegistry::with_capacity(1).unwrap();
        airport.stats().plane_entered();
        registry.launch(&airport, FlightClass::International, StepRng::new(0, 1));

        // Landing takes a second; the grace period is shorter
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(registry.in_flight(), 1);
        let finals = registry.drain(&airport, Duration::from_millis(200)).await;

        assert_eq!(finals.len(), 1);
        assert!(finals[0].abandoned);
        assert_eq!(finals[0].state, PlaneState::DuringLanding);
        assert_eq!(finals[0].finished_after, None);

        let s = airport.stats().snapshot();
        assert_eq!(s.abandoned, 1);
        assert_eq!(s.active, 1);
        assert!(s.is_consistent());

        // Aborting released the presence guard
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(airport.priority().international_in_flight(), 0);
    }
}
