//! Plane records and lifecycle states.

use std::fmt;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::stats::PlaneOutcome;

/// Stable handle of a plane within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaneId(pub u32);

impl fmt::Display for PlaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Traffic class of a plane. Decides acquisition order and priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlightClass {
    Domestic,
    International,
}

impl fmt::Display for FlightClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domestic => write!(f, "domestic"),
            Self::International => write!(f, "international"),
        }
    }
}

/// Where a plane is in its lifecycle.
///
/// ```text
/// WaitingForLanding → DuringLanding → WaitingForGate → DuringDisembark
///   → WaitingForTakeoff → DuringTakeoff → Finished
///
/// any Waiting* ──stage failure──► CrashedStarvation | CrashedDeadlock
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaneState {
    WaitingForLanding,
    DuringLanding,
    WaitingForGate,
    DuringDisembark,
    WaitingForTakeoff,
    DuringTakeoff,
    Finished,
    CrashedStarvation,
    CrashedDeadlock,
}

impl PlaneState {
    /// Every state, in lifecycle order.
    pub const ALL: [PlaneState; 9] = [
        Self::WaitingForLanding,
        Self::DuringLanding,
        Self::WaitingForGate,
        Self::DuringDisembark,
        Self::WaitingForTakeoff,
        Self::DuringTakeoff,
        Self::Finished,
        Self::CrashedStarvation,
        Self::CrashedDeadlock,
    ];

    /// Returns true for states no transition leaves.
    pub fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }

    /// Returns the outcome a terminal state represents.
    pub fn outcome(&self) -> Option<PlaneOutcome> {
        match self {
            Self::Finished => Some(PlaneOutcome::Finished),
            Self::CrashedStarvation => Some(PlaneOutcome::CrashedStarvation),
            Self::CrashedDeadlock => Some(PlaneOutcome::CrashedDeadlock),
            _ => None,
        }
    }
}

impl From<PlaneOutcome> for PlaneState {
    fn from(outcome: PlaneOutcome) -> Self {
        match outcome {
            PlaneOutcome::Finished => Self::Finished,
            PlaneOutcome::CrashedStarvation => Self::CrashedStarvation,
            PlaneOutcome::CrashedDeadlock => Self::CrashedDeadlock,
        }
    }
}

impl fmt::Display for PlaneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::WaitingForLanding => "waiting for landing",
            Self::DuringLanding => "landing",
            Self::WaitingForGate => "waiting for gate",
            Self::DuringDisembark => "disembarking",
            Self::WaitingForTakeoff => "waiting for takeoff",
            Self::DuringTakeoff => "taking off",
            Self::Finished => "finished",
            Self::CrashedStarvation => "crashed (starvation)",
            Self::CrashedDeadlock => "crashed (deadlock)",
        };
        f.write_str(name)
    }
}

/// The record of one plane.
///
/// Owned and mutated only by the plane's own task. Every state change is
/// also published on a watch channel so the registry can report where a
/// plane was even if its task is abandoned.
#[derive(Debug)]
pub struct Plane {
    id: PlaneId,
    class: FlightClass,
    state: PlaneState,
    created_at: Instant,
    waiting_since: Instant,
    finished_at: Option<Instant>,
    in_critical_state: bool,
    published: watch::Sender<PlaneState>,
}

impl Plane {
    /// Creates a plane waiting for landing, with a receiver that follows its state.
    pub fn new(id: PlaneId, class: FlightClass) -> (Self, watch::Receiver<PlaneState>) {
        let now = Instant::now();
        let (published, state_rx) = watch::channel(PlaneState::WaitingForLanding);
        let plane = Self {
            id,
            class,
            state: PlaneState::WaitingForLanding,
            created_at: now,
            waiting_since: now,
            finished_at: None,
            in_critical_state: false,
            published,
        };
        (plane, state_rx)
    }

    pub fn id(&self) -> PlaneId {
        self.id
    }

    pub fn class(&self) -> FlightClass {
        self.class
    }

    pub fn state(&self) -> PlaneState {
        self.state
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn finished_at(&self) -> Option<Instant> {
        self.finished_at
    }

    pub fn is_in_critical_state(&self) -> bool {
        self.in_critical_state
    }

    /// Time since the plane started waiting for its current stage.
    pub fn waited(&self) -> Duration {
        self.waiting_since.elapsed()
    }

    pub fn waiting_since(&self) -> Instant {
        self.waiting_since
    }

    pub(crate) fn set_state(&mut self, state: PlaneState) {
        debug_assert!(!self.state.is_terminal(), "terminal planes never move");
        self.state = state;
        self.published.send_replace(state);
    }

    /// Enters a waiting state and restarts the wait clock.
    pub(crate) fn start_waiting(&mut self, state: PlaneState) {
        self.waiting_since = Instant::now();
        self.set_state(state);
    }

    /// Restarts the wait clock without changing state.
    pub(crate) fn restart_wait_clock(&mut self) {
        self.waiting_since = Instant::now();
    }

    pub(crate) fn mark_critical(&mut self) {
        self.in_critical_state = true;
    }

    pub(crate) fn finish(&mut self, outcome: PlaneOutcome) {
        self.finished_at = Some(Instant::now());
        self.set_state(outcome.into());
    }
}
