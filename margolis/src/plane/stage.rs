//! Lifecycle stages and their class-dependent acquisition orders.
//!
//! | Stage     | Domestic order         | International order    |
//! |-----------|------------------------|------------------------|
//! | Landing   | tower → runway         | runway → tower         |
//! | Disembark | tower → gate           | gate → tower           |
//! | Takeoff   | tower → gate → runway  | gate → runway → tower  |
//!
//! The two classes take shared resources in opposite orders, so a domestic
//! and an international plane can each hold what the other needs next.

use std::fmt;

use super::model::{FlightClass, PlaneState};
use crate::airport::ResourceKind;
use crate::config::{DurationRange, StageTimings};

use ResourceKind::{Gate, Runway, Tower};

/// One resource-holding step of a plane's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Landing,
    Disembark,
    Takeoff,
}

impl Stage {
    /// Stages in lifecycle order.
    pub const ALL: [Stage; 3] = [Self::Landing, Self::Disembark, Self::Takeoff];

    /// Resources to acquire, in order, for a plane of the given class.
    pub fn acquisition_order(&self, class: FlightClass) -> &'static [ResourceKind] {
        match (self, class) {
            (Self::Landing, FlightClass::Domestic) => &[Tower, Runway],
            (Self::Landing, FlightClass::International) => &[Runway, Tower],
            (Self::Disembark, FlightClass::Domestic) => &[Tower, Gate],
            (Self::Disembark, FlightClass::International) => &[Gate, Tower],
            (Self::Takeoff, FlightClass::Domestic) => &[Tower, Gate, Runway],
            (Self::Takeoff, FlightClass::International) => &[Gate, Runway, Tower],
        }
    }

    /// Returns true if planes of this class pass the priority gate before acquiring.
    ///
    /// Only domestic chains that start at the tower are gated.
    pub fn is_gated(&self, class: FlightClass) -> bool {
        class == FlightClass::Domestic && self.acquisition_order(class).first() == Some(&Tower)
    }

    /// State while waiting for this stage's resources.
    pub fn waiting_state(&self) -> PlaneState {
        match self {
            Self::Landing => PlaneState::WaitingForLanding,
            Self::Disembark => PlaneState::WaitingForGate,
            Self::Takeoff => PlaneState::WaitingForTakeoff,
        }
    }

    /// State while holding this stage's resources.
    pub fn active_state(&self) -> PlaneState {
        match self {
            Self::Landing => PlaneState::DuringLanding,
            Self::Disembark => PlaneState::DuringDisembark,
            Self::Takeoff => PlaneState::DuringTakeoff,
        }
    }

    /// How long the stage holds its full chain.
    pub fn work(&self, timings: &StageTimings) -> DurationRange {
        match self {
            Self::Landing => timings.landing,
            Self::Disembark => timings.disembark,
            Self::Takeoff => timings.takeoff,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Landing => write!(f, "landing"),
            Self::Disembark => write!(f, "disembark"),
            Self::Takeoff => write!(f, "takeoff"),
        }
    }
}

/// Result of running one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// Resources acquired, used and released.
    Completed,
    /// Chain abandoned by the deadlock heuristic; held resources released.
    Deadlock,
    /// Priority gate abandoned by the starvation heuristic.
    Starvation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orders_are_mirrored_for_landing_and_disembark() {
        for stage in [Stage::Landing, Stage::Disembark] {
            let mut domestic = stage.acquisition_order(FlightClass::Domestic).to_vec();
            domestic.reverse();
            assert_eq!(
                domestic,
                stage.acquisition_order(FlightClass::International)
            );
        }
    }

    #[test]
    fn test_takeoff_orders() {
        assert_eq!(
            Stage::Takeoff.acquisition_order(FlightClass::Domestic),
            &[Tower, Gate, Runway]
        );
        assert_eq!(
            Stage::Takeoff.acquisition_order(FlightClass::International),
            &[Gate, Runway, Tower]
        );
    }

    #[test]
    fn test_only_domestic_stages_are_gated() {
        for stage in Stage::ALL {
            assert!(stage.is_gated(FlightClass::Domestic));
            assert!(!stage.is_gated(FlightClass::International));
        }
    }

    #[test]
    fn test_stage_states() {
        assert_eq!(Stage::Landing.waiting_state(), PlaneState::WaitingForLanding);
        assert_eq!(Stage::Disembark.active_state(), PlaneState::DuringDisembark);
        assert_eq!(Stage::Takeoff.waiting_state(), PlaneState::WaitingForTakeoff);
    }

    #[test]
    fn test_work_ranges_follow_timings() {
        let timings = StageTimings::default();
        assert_eq!(Stage::Landing.work(&timings), timings.landing);
        assert_eq!(Stage::Takeoff.work(&timings), timings.takeoff);
    }
}
