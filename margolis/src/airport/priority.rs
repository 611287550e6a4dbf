//! International-first priority arbitration.
//!
//! International planes have unconditional precedence over domestic planes.
//! Every international plane registers its presence when it enters the
//! airport and withdraws it when it leaves, whatever the outcome. Domestic
//! planes may not start a tower-first acquisition chain while any
//! international plane is present.
//!
//! # Design
//!
//! The presence counter lives in a `watch` channel, so it has its own lock
//! and never contends with the resource pools:
//!
//! ```text
//! International: enter_international() ──► counter += 1
//!                drop(presence)        ──► counter -= 1  (notifies watchers)
//!
//! Domestic:      watch() ──► is_clear()? ──no──► wait() (change or poll interval)
//!                                  │                   │
//!                                  yes ◄───────────────┘
//! ```
//!
//! Waiting domestic planes wake as soon as the counter changes, and at least
//! once per poll interval otherwise, so the starvation monitor keeps sampling
//! at poll granularity even when nothing changes.

use std::time::Duration;
use tokio::sync::watch;

/// Default interval between priority re-checks of a waiting domestic plane.
pub const DEFAULT_PRIORITY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Shared counter of international planes currently inside the airport.
#[derive(Debug)]
pub struct PriorityGate {
    international: watch::Sender<usize>,
    poll_interval: Duration,
}

impl PriorityGate {
    /// Creates a gate with no international planes present.
    pub fn new(poll_interval: Duration) -> Self {
        let (international, _) = watch::channel(0);
        Self {
            international,
            poll_interval,
        }
    }

    /// Registers an international plane for as long as the returned guard lives.
    pub fn enter_international(&self) -> InternationalPresence<'_> {
        self.international.send_modify(|count| *count += 1);
        InternationalPresence { gate: self }
    }

    /// Returns the number of international planes currently present.
    pub fn international_in_flight(&self) -> usize {
        *self.international.borrow()
    }

    /// Returns the poll interval used by waiting domestic planes.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Creates a watcher for a domestic plane waiting on the gate.
    pub fn watch(&self) -> GateWatcher {
        GateWatcher {
            rx: self.international.subscribe(),
            poll_interval: self.poll_interval,
        }
    }
}

impl Default for PriorityGate {
    fn default() -> Self {
        Self::new(DEFAULT_PRIORITY_POLL_INTERVAL)
    }
}

/// Presence of one international plane.
///
/// Dropping the guard withdraws the presence, so success, crash, and task
/// abort at shutdown all restore the counter.
#[derive(Debug)]
pub struct InternationalPresence<'a> {
    gate: &'a PriorityGate,
}

impl Drop for InternationalPresence<'_> {
    fn drop(&mut self) {
        self.gate
            .international
            .send_modify(|count| *count = count.saturating_sub(1));
    }
}

/// A domestic plane's view of the gate.
#[derive(Debug)]
pub struct GateWatcher {
    rx: watch::Receiver<usize>,
    poll_interval: Duration,
}

impl GateWatcher {
    /// Returns true if no international plane is present right now.
    pub fn is_clear(&mut self) -> bool {
        *self.rx.borrow_and_update() == 0
    }

    /// Suspends until the counter changes or one poll interval elapses.
    pub async fn wait(&mut self) {
        // The sender lives as long as the gate; an error here only means
        // the airport is being torn down, which a poll timeout covers too.
        let _ = tokio::time::timeout(self.poll_interval, self.rx.changed()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[test]
    fn test_gate_starts_clear() {
        let gate = PriorityGate::default();
        assert_eq!(gate.international_in_flight(), 0);
        assert!(gate.watch().is_clear());
        assert_eq!(gate.poll_interval(), DEFAULT_PRIORITY_POLL_INTERVAL);
    }

    #[test]
    fn test_presence_counts_and_withdraws() {
        let gate = PriorityGate::default();

        let first = gate.enter_international();
        let second = gate.enter_international();
        assert_eq!(gate.international_in_flight(), 2);
        assert!(!gate.watch().is_clear());

        drop(first);
        assert_eq!(gate.international_in_flight(), 1);

        drop(second);
        assert_eq!(gate.international_in_flight(), 0);
        assert!(gate.watch().is_clear());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_returns_after_poll_interval() {
        let gate = PriorityGate::new(Duration::from_millis(100));
        let _presence = gate.enter_international();
        let mut watcher = gate.watch();
        assert!(!watcher.is_clear());

        let start = Instant::now();
        watcher.wait().await;
        assert_eq!(start.elapsed(), Duration::from_millis(100));
        assert!(!watcher.is_clear());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_wakes_when_presence_withdrawn() {
        let gate = std::sync::Arc::new(PriorityGate::new(Duration::from_secs(10)));
        let mut watcher = gate.watch();

        let gate_clone = std::sync::Arc::clone(&gate);
        let holder = tokio::spawn(async move {
            let _presence = gate_clone.enter_international();
            tokio::time::sleep(Duration::from_secs(2)).await;
        });

        // Let the holder register first
        tokio::task::yield_now().await;
        assert!(!watcher.is_clear());

        let start = Instant::now();
        while !watcher.is_clear() {
            watcher.wait().await;
        }
        holder.await.unwrap();

        // Woken by the change at 2s, not by the 10s poll interval
        assert!(start.elapsed() < Duration::from_secs(10));
        assert_eq!(gate.international_in_flight(), 0);
    }
}
