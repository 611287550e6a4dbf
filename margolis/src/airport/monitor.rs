//! Wait-time heuristics for starvation and deadlock.
//!
//! Neither heuristic inspects who holds what. Both look only at how long a
//! plane has been waiting since it entered its current stage:
//!
//! - **Starvation**: a domestic plane held at the priority gate goes critical
//!   after the critical threshold and crashes after the crash threshold.
//! - **Deadlock**: a plane still assembling its acquisition chain after the
//!   deadlock threshold abandons the chain and crashes.
//!
//! The deadlock check is a proxy for a circular wait. It reports heavy but
//! legitimate contention as a deadlock, and it misses a real circular wait
//! that resolves before the threshold.

use std::time::Duration;
use tokio::time::Instant;

use crate::config::WaitThresholds;

/// Result of a starvation check for a domestic plane at the priority gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarvationCheck {
    /// Still within tolerance, keep waiting.
    Waiting,
    /// The critical threshold was crossed for the first time.
    Critical,
    /// The crash threshold was crossed; the stage must be abandoned.
    Crash,
}

/// Evaluates wait durations against the configured thresholds.
#[derive(Debug, Clone, Copy)]
pub struct WaitMonitor {
    thresholds: WaitThresholds,
}

impl WaitMonitor {
    /// Creates a monitor with the given thresholds.
    pub fn new(thresholds: WaitThresholds) -> Self {
        Self { thresholds }
    }

    /// Returns the configured thresholds.
    pub fn thresholds(&self) -> WaitThresholds {
        self.thresholds
    }

    /// Classifies how long a domestic plane has waited at the priority gate.
    ///
    /// `Critical` is reported only once per plane: callers pass whether the
    /// plane is already flagged.
    pub fn check_starvation(&self, waited: Duration, already_critical: bool) -> StarvationCheck {
        if waited > self.thresholds.crash {
            StarvationCheck::Crash
        } else if waited > self.thresholds.critical && !already_critical {
            StarvationCheck::Critical
        } else {
            StarvationCheck::Waiting
        }
    }

    /// Returns true if a chain that started waiting `waited` ago is presumed deadlocked.
    pub fn deadlock_suspected(&self, waited: Duration) -> bool {
        waited > self.thresholds.deadlock
    }

    /// Returns the instant after which a chain entered at `stage_entered` is abandoned.
    pub fn deadlock_deadline(&self, stage_entered: Instant) -> Instant {
        stage_entered + self.thresholds.deadlock
    }
}

impl Default for WaitMonitor {
    fn default() -> Self {
        Self::new(WaitThresholds::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_starvation_below_critical() {
        let monitor = WaitMonitor::default();
        assert_eq!(monitor.check_starvation(secs(0), false), StarvationCheck::Waiting);
        assert_eq!(monitor.check_starvation(secs(60), false), StarvationCheck::Waiting);
    }

    #[test]
    fn test_starvation_critical_reported_once() {
        let monitor = WaitMonitor::default();
        let waited = secs(61);
        assert_eq!(monitor.check_starvation(waited, false), StarvationCheck::Critical);
        assert_eq!(monitor.check_starvation(waited, true), StarvationCheck::Waiting);
    }

    #[test]
    fn test_starvation_crash_beats_critical() {
        let monitor = WaitMonitor::default();
        assert_eq!(monitor.check_starvation(secs(90), true), StarvationCheck::Waiting);
        assert_eq!(monitor.check_starvation(secs(91), false), StarvationCheck::Crash);
        assert_eq!(monitor.check_starvation(secs(91), true), StarvationCheck::Crash);
    }

    #[test]
    fn test_deadlock_threshold_is_strict() {
        let monitor = WaitMonitor::default();
        assert!(!monitor.deadlock_suspected(secs(30)));
        assert!(monitor.deadlock_suspected(secs(30) + Duration::from_millis(1)));
    }

    #[test]
    fn test_custom_thresholds() {
        let monitor = WaitMonitor::new(WaitThresholds {
            critical: secs(2),
            crash: secs(4),
            deadlock: secs(1),
        });
        assert_eq!(monitor.check_starvation(secs(3), false), StarvationCheck::Critical);
        assert_eq!(monitor.check_starvation(secs(5), true), StarvationCheck::Crash);
        assert!(monitor.deadlock_suspected(secs(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadlock_deadline() {
        let monitor = WaitMonitor::default();
        let entered = Instant::now();
        assert_eq!(monitor.deadlock_deadline(entered) - entered, secs(30));
    }
}
