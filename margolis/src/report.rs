//! End-of-run report.
//!
//! Built from the final stats snapshot and the state every plane was in
//! when the run ended. Rates are derived here, never stored.

use std::fmt;
use std::time::Duration;

use crate::config::AirportProfile;
use crate::plane::{FinalPlaneState, PlaneState};
use crate::stats::StatsSnapshot;

/// Number of planes in each [`PlaneState`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateTally {
    pub waiting_for_landing: usize,
    pub during_landing: usize,
    pub waiting_for_gate: usize,
    pub during_disembark: usize,
    pub waiting_for_takeoff: usize,
    pub during_takeoff: usize,
    pub finished: usize,
    pub crashed_starvation: usize,
    pub crashed_deadlock: usize,
}

impl StateTally {
    /// Counts the final state of every plane.
    pub fn from_planes(planes: &[FinalPlaneState]) -> Self {
        let mut tally = Self::default();
        for plane in planes {
            *tally.count_mut(plane.state) += 1;
        }
        tally
    }

    /// Number of planes in `state`.
    pub fn count(&self, state: PlaneState) -> usize {
        match state {
            PlaneState::WaitingForLanding => self.waiting_for_landing,
            PlaneState::DuringLanding => self.during_landing,
            PlaneState::WaitingForGate => self.waiting_for_gate,
            PlaneState::DuringDisembark => self.during_disembark,
            PlaneState::WaitingForTakeoff => self.waiting_for_takeoff,
            PlaneState::DuringTakeoff => self.during_takeoff,
            PlaneState::Finished => self.finished,
            PlaneState::CrashedStarvation => self.crashed_starvation,
            PlaneState::CrashedDeadlock => self.crashed_deadlock,
        }
    }

    fn count_mut(&mut self, state: PlaneState) -> &mut usize {
        match state {
            PlaneState::WaitingForLanding => &mut self.waiting_for_landing,
            PlaneState::DuringLanding => &mut self.during_landing,
            PlaneState::WaitingForGate => &mut self.waiting_for_gate,
            PlaneState::DuringDisembark => &mut self.during_disembark,
            PlaneState::WaitingForTakeoff => &mut self.waiting_for_takeoff,
            PlaneState::DuringTakeoff => &mut self.during_takeoff,
            PlaneState::Finished => &mut self.finished,
            PlaneState::CrashedStarvation => &mut self.crashed_starvation,
            PlaneState::CrashedDeadlock => &mut self.crashed_deadlock,
        }
    }

    /// Planes that never reached a terminal state.
    pub fn unfinished(&self) -> usize {
        PlaneState::ALL
            .into_iter()
            .filter(|state| !state.is_terminal())
            .map(|state| self.count(state))
            .sum()
    }
}

/// Everything known about a run once it is over.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub airport: AirportProfile,
    pub elapsed: Duration,
    pub stats: StatsSnapshot,
    pub planes: Vec<FinalPlaneState>,
    pub tally: StateTally,
}

impl SimulationReport {
    pub fn new(
        airport: AirportProfile,
        elapsed: Duration,
        stats: StatsSnapshot,
        planes: Vec<FinalPlaneState>,
    ) -> Self {
        let tally = StateTally::from_planes(&planes);
        Self {
            airport,
            elapsed,
            stats,
            planes,
            tally,
        }
    }

    /// Planes whose tasks were aborted at shutdown.
    pub fn abandoned(&self) -> impl Iterator<Item = &FinalPlaneState> {
        self.planes.iter().filter(|plane| plane.abandoned)
    }
}

fn percent(rate: f64) -> f64 {
    rate * 100.0
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.stats;

        writeln!(f, "Simulation Report: {}", self.airport)?;
        writeln!(f, "=================")?;
        writeln!(f)?;
        writeln!(f, "Summary:")?;
        writeln!(f, "  Run time:                 {:.1}s", self.elapsed.as_secs_f64())?;
        writeln!(f, "  Planes spawned:           {}", s.total_spawned)?;
        writeln!(f, "  Peak planes at once:      {}", s.peak_active)?;
        writeln!(f, "  Completed successfully:   {}", s.succeeded)?;
        writeln!(f, "  Crashed (starvation):     {}", s.crashed_by_starvation)?;
        writeln!(f, "  Crashed (deadlock):       {}", s.crashed_by_deadlock)?;
        writeln!(f, "  Still active at cutoff:   {}", s.active)?;
        writeln!(f)?;
        writeln!(f, "Problems:")?;
        writeln!(f, "  Starvation warnings:      {}", s.starvation_warnings)?;
        writeln!(f, "  Deadlocks detected:       {}", s.deadlocks_detected)?;

        if s.total_spawned > 0 {
            let failure = s.starvation_rate() + s.deadlock_rate();
            writeln!(f)?;
            writeln!(f, "Rates:")?;
            writeln!(f, "  Success:                  {:.1}%", percent(s.success_rate()))?;
            writeln!(f, "  Failure:                  {:.1}%", percent(failure))?;
            writeln!(f, "    starvation:             {:.1}%", percent(s.starvation_rate()))?;
            writeln!(f, "    deadlock:               {:.1}%", percent(s.deadlock_rate()))?;
        }

        writeln!(f)?;
        writeln!(f, "Final states:")?;
        for state in PlaneState::ALL {
            let count = self.tally.count(state);
            if count > 0 {
                writeln!(f, "  {:<24}  {}", format!("{state}:"), count)?;
            }
        }
        if self.planes.is_empty() {
            writeln!(f, "  (no planes)")?;
        }

        let abandoned: Vec<_> = self.abandoned().collect();
        if !abandoned.is_empty() {
            writeln!(f)?;
            writeln!(f, "Abandoned at shutdown: {}", abandoned.len())?;
            for plane in abandoned {
                writeln!(f, "  plane {} ({}): {}", plane.id, plane.class, plane.state)?;
            }
        }

        Ok(())
    }
}
