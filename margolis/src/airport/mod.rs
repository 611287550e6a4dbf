//! The shared airport: resources, priority arbitration and wait monitoring.
//!
//! An [`Airport`] is created once per run and shared by every plane task
//! behind an `Arc`. It owns each piece of shared mutable state behind the
//! manager that guards it:
//!
//! - [`ResourcePools`]: free slots of runway, tower and gate (one semaphore each)
//! - [`PriorityGate`]: number of international planes present (its own lock)
//! - [`SimulationStats`]: outcome counters (their own lock)
//!
//! Nothing outside these managers touches the raw counters.

mod monitor;
mod priority;
mod resource_pool;

pub use monitor::{StarvationCheck, WaitMonitor};
pub use priority::{
    GateWatcher, InternationalPresence, PriorityGate, DEFAULT_PRIORITY_POLL_INTERVAL,
};
pub use resource_pool::{ResourceKind, ResourcePermit, ResourcePool, ResourcePools};

use std::sync::Arc;

use crate::config::{SimulationConfig, StageTimings};
use crate::stats::SimulationStats;

/// Shared state of one simulated airport.
#[derive(Debug)]
pub struct Airport {
    pools: ResourcePools,
    priority: PriorityGate,
    monitor: WaitMonitor,
    timings: StageTimings,
    stats: Arc<SimulationStats>,
}

impl Airport {
    /// Opens an airport with the capacities, thresholds and timings of `config`.
    pub fn new(config: &SimulationConfig, stats: Arc<SimulationStats>) -> Self {
        Self {
            pools: ResourcePools::new(config.resources),
            priority: PriorityGate::new(config.priority_poll_interval),
            monitor: WaitMonitor::new(config.thresholds),
            timings: config.timings,
            stats,
        }
    }

    pub fn pools(&self) -> &ResourcePools {
        &self.pools
    }

    pub fn priority(&self) -> &PriorityGate {
        &self.priority
    }

    pub fn monitor(&self) -> &WaitMonitor {
        &self.monitor
    }

    pub fn timings(&self) -> &StageTimings {
        &self.timings
    }

    pub fn stats(&self) -> &Arc<SimulationStats> {
        &self.stats
    }
}
