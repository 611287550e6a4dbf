//! Plane generator.
//!
//! Launches planes at random intervals until cancelled or until the
//! registry is full. All randomness comes from one seeded ChaCha stream:
//! the generator draws classes and intervals from it and hands each plane
//! its own stream seeded from it, so a fixed seed reproduces the same
//! draws in the same order.

use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::airport::Airport;
use crate::config::{DurationRange, SimulationConfig};
use crate::plane::{FlightClass, PlaneRegistry};

/// Spawns planes into an airport.
pub struct PlaneGenerator {
    airport: Arc<Airport>,
    registry: PlaneRegistry,
    rng: ChaCha8Rng,
    spawn_interval: DurationRange,
    international_percentage: u8,
}

impl PlaneGenerator {
    /// Creates a generator filling `registry` with planes for `airport`.
    ///
    /// Uses the configured seed if there is one, otherwise seeds from entropy.
    pub fn new(airport: Arc<Airport>, registry: PlaneRegistry, config: &SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            airport,
            registry,
            rng,
            spawn_interval: config.spawn_interval,
            international_percentage: config.international_percentage,
        }
    }

    /// Draws the class of the next plane.
    fn next_class(&mut self) -> FlightClass {
        if self.rng.gen_range(0..100) < self.international_percentage {
            FlightClass::International
        } else {
            FlightClass::Domestic
        }
    }

    /// Launches one plane. Returns false if the registry is full.
    fn spawn_one(&mut self) -> bool {
        if self.registry.is_full() {
            return false;
        }

        let class = self.next_class();
        let plane_rng = ChaCha8Rng::seed_from_u64(self.rng.gen());

        // Counted before launch so the plane is active before it can finish
        self.airport.stats().plane_entered();
        match self.registry.launch(&self.airport, class, plane_rng) {
            Some(id) => {
                info!(plane = %id, class = %class, "New plane entering airspace");
                true
            }
            None => false,
        }
    }

    /// Runs until `shutdown` is cancelled or the registry is full.
    ///
    /// Returns the registry holding every launched plane.
    pub async fn run(mut self, shutdown: CancellationToken) -> PlaneRegistry {
        while !shutdown.is_cancelled() {
            if !self.spawn_one() {
                info!(
                    max_planes = self.registry.capacity(),
                    "Plane limit reached, generator stopping"
                );
                break;
            }

            let pause = self.spawn_interval.sample(&mut self.rng);
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(pause) => {}
            }
        }

        debug!(launched = self.registry.len(), "Generator stopped");
        self.registry
    }
}
