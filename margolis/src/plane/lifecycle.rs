//! One plane's full lifecycle: landing, disembark, turnaround and takeoff.

use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info, warn};

use super::model::{FlightClass, Plane};
use super::protocol::run_stage;
use super::stage::{Stage, StageOutcome};
use crate::airport::Airport;
use crate::stats::PlaneOutcome;

/// Flies `plane` through every stage and returns it in a terminal state.
///
/// International planes register with the priority gate for their whole
/// stay; the registration is a guard, so it is withdrawn even if this
/// future is dropped mid-flight. Stats are updated exactly once, when the
/// plane reaches its terminal state.
pub async fn fly<R: Rng>(airport: Arc<Airport>, mut plane: Plane, mut rng: R) -> Plane {
    let presence = (plane.class() == FlightClass::International)
        .then(|| airport.priority().enter_international());

    info!("Arrived, requesting to land");
    let outcome = run_lifecycle(&airport, &mut plane, &mut rng).await;

    plane.finish(outcome);
    drop(presence);
    airport.stats().plane_finished(outcome);

    let total_secs = plane
        .finished_at()
        .map(|at| at.duration_since(plane.created_at()).as_secs_f64())
        .unwrap_or_default();
    match outcome {
        PlaneOutcome::Finished => info!(total_secs, "Took off, lifecycle complete"),
        PlaneOutcome::CrashedStarvation | PlaneOutcome::CrashedDeadlock => {
            warn!(total_secs, state = %plane.state(), "Crashed")
        }
    }

    plane
}

async fn run_lifecycle<R: Rng>(airport: &Airport, plane: &mut Plane, rng: &mut R) -> PlaneOutcome {
    for stage in Stage::ALL {
        plane.start_waiting(stage.waiting_state());

        if stage == Stage::Takeoff {
            // Ground turnaround holds nothing and does not count as waiting
            let turnaround = airport.timings().turnaround.sample(rng);
            debug!(turnaround_ms = turnaround.as_millis() as u64, "Turnaround");
            tokio::time::sleep(turnaround).await;
            plane.restart_wait_clock();
        }

        match run_stage(airport, plane, stage, rng).await {
            StageOutcome::Completed => {}
            StageOutcome::Deadlock => return PlaneOutcome::CrashedDeadlock,
            StageOutcome::Starvation => return PlaneOutcome::CrashedStarvation,
        }
    }
    PlaneOutcome::Finished
}
