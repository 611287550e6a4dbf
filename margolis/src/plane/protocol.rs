//! Resource acquisition protocol for a single stage.
//!
//! A stage runs in three phases:
//!
//! 1. **Priority gate** (domestic only): wait until no international plane is
//!    present, checking for starvation on every wake-up.
//! 2. **Acquisition chain**: take each resource in the class's order. Every
//!    acquisition is bounded by the stage's deadlock deadline, and the
//!    elapsed wait is checked again before each further acquisition.
//!    Abandoning the chain releases what is already held, newest first.
//! 3. **Work**: hold the full chain for the simulated duration, then release.
//!
//! A domestic plane re-samples the gate right after it obtains the tower.
//! If an international plane arrived in the meantime the tower goes back and
//! the plane returns to the gate, so no domestic plane ever holds a tower it
//! took while an international plane was present.

use rand::Rng;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::model::Plane;
use super::stage::{Stage, StageOutcome};
use crate::airport::{Airport, GateWatcher, ResourceKind, ResourcePermit, StarvationCheck};

/// Runs one stage of `plane`'s lifecycle.
///
/// The plane must already be in the stage's waiting state; its wait clock
/// is the reference for both heuristics.
pub(crate) async fn run_stage<R: Rng + ?Sized>(
    airport: &Airport,
    plane: &mut Plane,
    stage: Stage,
    rng: &mut R,
) -> StageOutcome {
    let order = stage.acquisition_order(plane.class());
    let deadline = airport.monitor().deadlock_deadline(plane.waiting_since());
    let mut watcher = stage
        .is_gated(plane.class())
        .then(|| airport.priority().watch());
    let mut held: Vec<ResourcePermit<'_>> = Vec::with_capacity(order.len());

    info!(stage = %stage, first = %order[0], "Requesting resources");

    // The first resource, behind the priority gate when the chain is gated
    loop {
        if let Some(watcher) = watcher.as_mut() {
            if !wait_for_priority(airport, plane, stage, watcher).await {
                return StageOutcome::Starvation;
            }
        }

        let Some(permit) = acquire_until(airport, order[0], deadline).await else {
            return abandon_chain(plane, stage, held);
        };

        if let Some(watcher) = watcher.as_mut() {
            if !watcher.is_clear() {
                debug!(
                    stage = %stage,
                    "International traffic arrived while taking the tower, yielding"
                );
                permit.release();
                continue;
            }
        }

        held.push(permit);
        break;
    }

    for &kind in &order[1..] {
        debug!(stage = %stage, held = ?held_kinds(&held), requesting = %kind, "Resource acquired");

        if airport.monitor().deadlock_suspected(plane.waited()) {
            return abandon_chain(plane, stage, held);
        }

        match acquire_until(airport, kind, deadline).await {
            Some(permit) => held.push(permit),
            None => return abandon_chain(plane, stage, held),
        }
    }

    plane.set_state(stage.active_state());
    let work = stage.work(airport.timings()).sample(rng);
    info!(stage = %stage, work_ms = work.as_millis() as u64, "Resources acquired, starting");
    tokio::time::sleep(work).await;

    if stage == Stage::Disembark {
        // Tower first; the gate stays occupied a little longer for turnaround
        let (tower, gate): (Vec<_>, Vec<_>) = held
            .into_iter()
            .partition(|permit| permit.kind() == ResourceKind::Tower);
        release_all(tower);
        tokio::time::sleep(airport.timings().gate_hold).await;
        release_all(gate);
    } else {
        release_all(held);
    }

    info!(stage = %stage, "Completed");
    StageOutcome::Completed
}

/// Holds a domestic plane at the priority gate until no international plane is present.
///
/// Returns false if the plane starved waiting.
async fn wait_for_priority(
    airport: &Airport,
    plane: &mut Plane,
    stage: Stage,
    watcher: &mut GateWatcher,
) -> bool {
    while !watcher.is_clear() {
        watcher.wait().await;

        let waited = plane.waited();
        match airport
            .monitor()
            .check_starvation(waited, plane.is_in_critical_state())
        {
            StarvationCheck::Waiting => {}
            StarvationCheck::Critical => {
                plane.mark_critical();
                airport.stats().starvation_warning();
                warn!(
                    stage = %stage,
                    waited_secs = waited.as_secs(),
                    "Critical state: held back by international traffic"
                );
            }
            StarvationCheck::Crash => {
                warn!(
                    stage = %stage,
                    waited_secs = waited.as_secs(),
                    "Starvation: crashed waiting for international traffic to clear"
                );
                return false;
            }
        }
    }
    true
}

/// Acquires `kind`, giving up at `deadline`.
async fn acquire_until(
    airport: &Airport,
    kind: ResourceKind,
    deadline: Instant,
) -> Option<ResourcePermit<'_>> {
    tokio::time::timeout_at(deadline, airport.pools().acquire(kind))
        .await
        .ok()
}

/// Gives up a chain presumed deadlocked, releasing held resources newest first.
fn abandon_chain(plane: &Plane, stage: Stage, held: Vec<ResourcePermit<'_>>) -> StageOutcome {
    warn!(
        stage = %stage,
        waited_secs = plane.waited().as_secs(),
        releasing = ?held_kinds(&held),
        "Deadlock suspected, abandoning acquisition chain"
    );
    release_all(held);
    StageOutcome::Deadlock
}

/// Releases permits in reverse acquisition order.
fn release_all(mut held: Vec<ResourcePermit<'_>>) {
    while let Some(permit) = held.pop() {
        permit.release();
    }
}

fn held_kinds(held: &[ResourcePermit<'_>]) -> Vec<ResourceKind> {
    held.iter().map(ResourcePermit::kind).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DurationRange, ResourceCapacities, SimulationConfig, StageTimings};
    use crate::plane::model::{FlightClass, PlaneId, PlaneState};
    use crate::stats::SimulationStats;
    use rand::rngs::mock::StepRng;
    use std::sync::Arc;
    use std::time::Duration;

    fn fixed_timings(work: Duration) -> StageTimings {
        StageTimings {
            landing: DurationRange::fixed(work),
            disembark: DurationRange::fixed(work),
            gate_hold: Duration::from_millis(500),
            takeoff: DurationRange::fixed(work),
            turnaround: DurationRange::fixed(Duration::from_secs(2)),
        }
    }

    fn airport(resources: ResourceCapacities, work: Duration) -> Arc<Airport> {
        let config = SimulationConfig {
            resources,
            timings: fixed_timings(work),
            ..SimulationConfig::default()
        };
        Arc::new(Airport::new(&config, Arc::new(SimulationStats::new())))
    }

    fn waiting_plane(id: u32, class: FlightClass, stage: Stage) -> Plane {
        let (mut plane, _rx) = Plane::new(PlaneId(id), class);
        plane.start_waiting(stage.waiting_state());
        plane
    }

    fn full(airport: &Airport) {
        for kind in ResourceKind::ALL {
            assert_eq!(
                airport.pools().available(kind),
                airport.pools().capacity(kind),
                "{kind} not fully released"
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_uncontended_stage_completes_and_releases() {
        let airport = airport(ResourceCapacities::default(), Duration::from_secs(1));
        let mut rng = StepRng::new(0, 1);

        for class in [FlightClass::Domestic, FlightClass::International] {
            for stage in Stage::ALL {
                let mut plane = waiting_plane(1, class, stage);
                let outcome = run_stage(&airport, &mut plane, stage, &mut rng).await;
                assert_eq!(outcome, StageOutcome::Completed);
                assert_eq!(plane.state(), stage.active_state());
                full(&airport);
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_disembark_releases_tower_before_gate() {
        let airport = airport(ResourceCapacities::default(), Duration::from_secs(1));
        let task_airport = Arc::clone(&airport);

        let task = tokio::spawn(async move {
            let mut plane = waiting_plane(1, FlightClass::International, Stage::Disembark);
            let mut rng = StepRng::new(0, 1);
            run_stage(&task_airport, &mut plane, Stage::Disembark, &mut rng).await
        });

        // Mid gate hold: work (1s) is over, gate hold (0.5s) is not
        tokio::time::sleep(Duration::from_millis(1_250)).await;
        assert_eq!(airport.pools().in_flight(ResourceKind::Tower), 0);
        assert_eq!(airport.pools().in_flight(ResourceKind::Gate), 1);

        assert_eq!(task.await.unwrap(), StageOutcome::Completed);
        full(&airport);
    }

    #[tokio::test(start_paused = true)]
    async fn test_chain_abandoned_after_deadlock_threshold() {
        let resources = ResourceCapacities {
            runway: 3,
            tower: 1,
            gate: 5,
        };
        let airport = airport(resources, Duration::from_secs(1));

        // Someone else holds the only tower for longer than the threshold
        let tower = airport.pools().try_acquire(ResourceKind::Tower).unwrap();

        let mut plane = waiting_plane(2, FlightClass::International, Stage::Landing);
        let mut rng = StepRng::new(0, 1);
        let started = Instant::now();
        let outcome = run_stage(&airport, &mut plane, Stage::Landing, &mut rng).await;

        assert_eq!(outcome, StageOutcome::Deadlock);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(30) && elapsed < Duration::from_secs(31));
        // The runway taken first went back to the pool
        assert_eq!(airport.pools().available(ResourceKind::Runway), 3);
        assert_eq!(plane.state(), PlaneState::WaitingForLanding);

        tower.release();
        full(&airport);
    }

    #[tokio::test(start_paused = true)]
    async fn test_domestic_starves_behind_international() {
        let airport = airport(ResourceCapacities::default(), Duration::from_secs(1));
        let _presence = airport.priority().enter_international();

        let mut plane = waiting_plane(3, FlightClass::Domestic, Stage::Landing);
        let mut rng = StepRng::new(0, 1);
        let outcome = run_stage(&airport, &mut plane, Stage::Landing, &mut rng).await;

        assert_eq!(outcome, StageOutcome::Starvation);
        assert!(plane.waited() > Duration::from_secs(90));
        assert!(plane.is_in_critical_state());
        assert_eq!(airport.stats().snapshot().starvation_warnings, 1);
        // Never touched the tower
        assert_eq!(airport.pools().peak_in_flight(ResourceKind::Tower), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_domestic_proceeds_once_international_leaves() {
        let airport = airport(ResourceCapacities::default(), Duration::from_secs(1));
        let holder_airport = Arc::clone(&airport);
        let holder = tokio::spawn(async move {
            let _presence = holder_airport.priority().enter_international();
            tokio::time::sleep(Duration::from_secs(10)).await;
        });
        tokio::task::yield_now().await;

        let mut plane = waiting_plane(4, FlightClass::Domestic, Stage::Landing);
        let mut rng = StepRng::new(0, 1);
        let started = Instant::now();
        let outcome = run_stage(&airport, &mut plane, Stage::Landing, &mut rng).await;
        holder.await.unwrap();

        assert_eq!(outcome, StageOutcome::Completed);
        assert!(started.elapsed() >= Duration::from_secs(11));
        assert!(!plane.is_in_critical_state());
        full(&airport);
    }

    #[tokio::test(start_paused = true)]
    async fn test_domestic_yields_tower_when_international_arrives_mid_acquisition() {
        let resources = ResourceCapacities {
            runway: 3,
            tower: 1,
            gate: 5,
        };
        let airport = airport(resources, Duration::from_secs(1));
        let tower = airport.pools().try_acquire(ResourceKind::Tower).unwrap();

        // The gate is clear, so the domestic plane queues on the tower itself
        let task_airport = Arc::clone(&airport);
        let task = tokio::spawn(async move {
            let mut plane = waiting_plane(6, FlightClass::Domestic, Stage::Landing);
            let mut rng = StepRng::new(0, 1);
            let outcome = run_stage(&task_airport, &mut plane, Stage::Landing, &mut rng).await;
            (outcome, plane)
        });
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!task.is_finished());

        let presence = airport.priority().enter_international();
        tower.release();

        for _ in 0..5 {
            tokio::time::sleep(Duration::from_secs(1)).await;
            assert_eq!(airport.pools().in_flight(ResourceKind::Tower), 0);
            assert_eq!(airport.pools().in_flight(ResourceKind::Runway), 0);
        }
        assert!(!task.is_finished());

        drop(presence);
        let (outcome, plane) = task.await.unwrap();

        assert_eq!(outcome, StageOutcome::Completed);
        assert_eq!(plane.state(), PlaneState::DuringLanding);
        assert!(!plane.is_in_critical_state());
        full(&airport);
    }

    #[tokio::test(start_paused = true)]
    async fn test_international_ignores_priority_gate() {
        let airport = airport(ResourceCapacities::default(), Duration::from_secs(1));
        let _other = airport.priority().enter_international();

        let mut plane = waiting_plane(5, FlightClass::International, Stage::Takeoff);
        let mut rng = StepRng::new(0, 1);
        let started = Instant::now();
        let outcome = run_stage(&airport, &mut plane, Stage::Takeoff, &mut rng).await;

        assert_eq!(outcome, StageOutcome::Completed);
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
