//! Outcome counters for a simulation run.
//!
//! All counters sit behind one lock so that a snapshot is always internally
//! consistent: at every snapshot
//!
//! ```text
//! succeeded + crashed_by_starvation + crashed_by_deadlock + active == total_spawned
//! ```
//!
//! Updates happen only at lifecycle boundaries: [`SimulationStats::plane_entered`]
//! when a plane is spawned, [`SimulationStats::plane_finished`] when it reaches
//! a terminal state. Rates are derived from snapshots and never stored.

use parking_lot::Mutex;

/// How a plane's lifecycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaneOutcome {
    /// Landed, disembarked and took off.
    Finished,
    /// Held at the priority gate past the crash threshold.
    CrashedStarvation,
    /// Abandoned its acquisition chain past the deadlock threshold.
    CrashedDeadlock,
}

/// Thread-safe simulation counters.
///
/// # Example
///
/// ```
/// use margolis::stats::{PlaneOutcome, SimulationStats};
///
/// let stats = SimulationStats::new();
/// stats.plane_entered();
/// stats.plane_finished(PlaneOutcome::Finished);
///
/// let snapshot = stats.snapshot();
/// assert_eq!(snapshot.succeeded, 1);
/// assert!(snapshot.is_consistent());
/// ```
#[derive(Debug, Default)]
pub struct SimulationStats {
    inner: Mutex<StatsSnapshot>,
}

impl SimulationStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new plane entering the airport.
    ///
    /// Counts it as spawned and active in one step and updates the peak.
    pub fn plane_entered(&self) {
        let mut s = self.inner.lock();
        s.total_spawned += 1;
        s.active += 1;
        s.peak_active = s.peak_active.max(s.active);
    }

    /// Records a plane reaching a terminal state.
    pub fn plane_finished(&self, outcome: PlaneOutcome) {
        let mut s = self.inner.lock();
        s.active = s.active.saturating_sub(1);
        match outcome {
            PlaneOutcome::Finished => s.succeeded += 1,
            PlaneOutcome::CrashedStarvation => s.crashed_by_starvation += 1,
            PlaneOutcome::CrashedDeadlock => {
                s.crashed_by_deadlock += 1;
                s.deadlocks_detected += 1;
            }
        }
    }

    /// Records a domestic plane going critical at the priority gate.
    pub fn starvation_warning(&self) {
        self.inner.lock().starvation_warnings += 1;
    }

    /// Records a plane force-abandoned at shutdown.
    ///
    /// The plane never reached a terminal state, so it stays counted as active.
    pub fn plane_abandoned(&self) {
        self.inner.lock().abandoned += 1;
    }

    /// Returns a consistent copy of all counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        *self.inner.lock()
    }
}

/// A point-in-time copy of the simulation counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Planes created by the generator
    pub total_spawned: u64,
    /// Planes that completed every stage
    pub succeeded: u64,
    /// Planes crashed by starvation
    pub crashed_by_starvation: u64,
    /// Planes crashed by the deadlock heuristic
    pub crashed_by_deadlock: u64,
    /// Domestic planes that went critical at the priority gate
    pub starvation_warnings: u64,
    /// Acquisition chains abandoned as deadlocked
    pub deadlocks_detected: u64,
    /// Planes not yet in a terminal state
    pub active: u64,
    /// Highest number of simultaneously active planes
    pub peak_active: u64,
    /// Planes force-abandoned at shutdown (included in `active`)
    pub abandoned: u64,
}

impl StatsSnapshot {
    /// Returns true if every spawned plane is accounted for exactly once.
    pub fn is_consistent(&self) -> bool {
        self.succeeded + self.crashed_by_starvation + self.crashed_by_deadlock + self.active
            == self.total_spawned
    }

    /// Share of spawned planes that finished (0.0 - 1.0).
    pub fn success_rate(&self) -> f64 {
        self.rate(self.succeeded)
    }

    /// Share of spawned planes crashed by starvation (0.0 - 1.0).
    pub fn starvation_rate(&self) -> f64 {
        self.rate(self.crashed_by_starvation)
    }

    /// Share of spawned planes crashed by deadlock (0.0 - 1.0).
    pub fn deadlock_rate(&self) -> f64 {
        self.rate(self.crashed_by_deadlock)
    }

    fn rate(&self, count: u64) -> f64 {
        if self.total_spawned == 0 {
            0.0
        } else {
            count as f64 / self.total_spawned as f64
        }
    }
}
