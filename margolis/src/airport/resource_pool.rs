//! Capacity-bounded pools for the shared airport resources.
//!
//! Each resource (runway, control tower, gate) is a semaphore-backed pool.
//! A plane acquires one permit per resource in the order its stage requires
//! and returns it when the stage releases the resource.
//!
//! # Resource Kinds
//!
//! - [`ResourceKind::Runway`]: landing and takeoff strips
//! - [`ResourceKind::Tower`]: simultaneous operations the control tower can direct
//! - [`ResourceKind::Gate`]: boarding gates
//!
//! # Fairness
//!
//! Pools do NOT order waiters by plane class or arrival time. Priority is
//! handled by the [`PriorityGate`](super::PriorityGate) before a plane ever
//! reaches a pool, so a freed permit may go to any waiting plane.
//!
//! # Example
//!
//! ```ignore
//! use margolis::airport::{ResourceKind, ResourcePools, ResourceCapacities};
//!
//! let pools = ResourcePools::new(ResourceCapacities::default());
//!
//! let permit = pools.acquire(ResourceKind::Runway).await;
//! // Use the runway...
//! permit.release();
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::config::ResourceCapacities;

// =============================================================================
// Resource Kind
// =============================================================================

/// The three shared resources planes compete for.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum ResourceKind {
    /// Landing / takeoff strip.
    Runway,

    /// A control-tower operation slot.
    Tower,

    /// A boarding gate.
    Gate,
}

impl ResourceKind {
    /// All resource kinds, in declaration order.
    pub const ALL: [ResourceKind; 3] = [Self::Runway, Self::Tower, Self::Gate];
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Runway => write!(f, "runway"),
            Self::Tower => write!(f, "tower"),
            Self::Gate => write!(f, "gate"),
        }
    }
}

// =============================================================================
// Resource Pool (single resource)
// =============================================================================

/// A semaphore-backed pool for a single resource.
///
/// `available` never exceeds `capacity` and never goes negative: the
/// semaphore only hands out permits it has, and a permit returns exactly
/// one slot when released.
#[derive(Debug)]
pub struct ResourcePool {
    kind: ResourceKind,
    semaphore: Arc<Semaphore>,
    capacity: usize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl ResourcePool {
    /// Creates a new pool with the given capacity.
    pub fn new(kind: ResourceKind, capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be > 0");
        Self {
            kind,
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Acquires a slot, suspending the caller until one is free.
    pub async fn acquire(&self) -> ResourcePermit<'_> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("resource semaphore is never closed");

        self.track(permit)
    }

    /// Tries to acquire a slot without waiting.
    ///
    /// Returns `None` if the resource is fully occupied.
    pub fn try_acquire(&self) -> Option<ResourcePermit<'_>> {
        let permit = self.semaphore.clone().try_acquire_owned().ok()?;
        Some(self.track(permit))
    }

    fn track(&self, permit: OwnedSemaphorePermit) -> ResourcePermit<'_> {
        let current = self.in_flight.fetch_add(1, Ordering::Relaxed) + 1;
        self.update_peak(current);

        ResourcePermit {
            _permit: permit,
            in_flight: &self.in_flight,
            kind: self.kind,
        }
    }

    /// Updates the peak counter if current exceeds it.
    fn update_peak(&self, current: usize) {
        let mut peak = self.peak_in_flight.load(Ordering::Relaxed);
        while current > peak {
            match self.peak_in_flight.compare_exchange_weak(
                peak,
                current,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(p) => peak = p,
            }
        }
    }

    /// Returns the resource this pool manages.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Returns the total capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of free slots.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Returns the number of slots currently held.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Returns the highest number of slots held at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::Relaxed)
    }
}

// =============================================================================
// Resource Permit
// =============================================================================

/// A held slot of one resource.
///
/// The slot is returned to its pool when the permit is released or dropped,
/// so a plane abandoned mid-stage can never leak a resource.
pub struct ResourcePermit<'a> {
    _permit: OwnedSemaphorePermit,
    in_flight: &'a AtomicUsize,
    kind: ResourceKind,
}

impl ResourcePermit<'_> {
    /// Returns the resource this permit holds.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Returns the slot to its pool.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for ResourcePermit<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::Relaxed);
    }
}

impl std::fmt::Debug for ResourcePermit<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourcePermit")
            .field("kind", &self.kind)
            .finish()
    }
}

// =============================================================================
// Resource Pools Collection
// =============================================================================

/// The runway, tower and gate pools of one airport.
///
/// Each pool has its own semaphore; acquiring one resource never serializes
/// access to another.
pub struct ResourcePools {
    runway: ResourcePool,
    tower: ResourcePool,
    gate: ResourcePool,
}

impl ResourcePools {
    /// Creates the pools with the given capacities.
    pub fn new(capacities: ResourceCapacities) -> Self {
        Self {
            runway: ResourcePool::new(ResourceKind::Runway, capacities.runway),
            tower: ResourcePool::new(ResourceKind::Tower, capacities.tower),
            gate: ResourcePool::new(ResourceKind::Gate, capacities.gate),
        }
    }

    /// Returns the pool for the given resource.
    pub fn get(&self, kind: ResourceKind) -> &ResourcePool {
        match kind {
            ResourceKind::Runway => &self.runway,
            ResourceKind::Tower => &self.tower,
            ResourceKind::Gate => &self.gate,
        }
    }

    /// Acquires a slot of the given resource, waiting if it is full.
    pub async fn acquire(&self, kind: ResourceKind) -> ResourcePermit<'_> {
        self.get(kind).acquire().await
    }

    /// Tries to acquire a slot without waiting.
    pub fn try_acquire(&self, kind: ResourceKind) -> Option<ResourcePermit<'_>> {
        self.get(kind).try_acquire()
    }

    /// Returns the free slots of the given resource.
    pub fn available(&self, kind: ResourceKind) -> usize {
        self.get(kind).available()
    }

    /// Returns the capacity of the given resource.
    pub fn capacity(&self, kind: ResourceKind) -> usize {
        self.get(kind).capacity()
    }

    /// Returns the held slots of the given resource.
    pub fn in_flight(&self, kind: ResourceKind) -> usize {
        self.get(kind).in_flight()
    }

    /// Returns the peak held slots of the given resource.
    pub fn peak_in_flight(&self, kind: ResourceKind) -> usize {
        self.get(kind).peak_in_flight()
    }
}

impl std::fmt::Debug for ResourcePools {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourcePools")
            .field(
                "runway",
                &format_args!("{}/{}", self.runway.in_flight(), self.runway.capacity()),
            )
            .field(
                "tower",
                &format_args!("{}/{}", self.tower.in_flight(), self.tower.capacity()),
            )
            .field(
                "gate",
                &format_args!("{}/{}", self.gate.in_flight(), self.gate.capacity()),
            )
            .finish()
    }
}
