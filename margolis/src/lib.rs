//! Margolis - airport resource contention simulator
//!
//! Planes land, disembark and take off at an airport with a fixed number of
//! runways, control towers and gates. Domestic and international planes take
//! these resources in opposite orders, and international traffic has strict
//! priority, so the simulation produces real deadlocks and starvation. Both
//! are resolved by wait-time heuristics that crash the plane involved.
//!
//! # Example
//!
//! ```no_run
//! use margolis::config::{AirportProfile, SimulationConfig};
//! use margolis::simulation::Simulation;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<(), margolis::error::SimulationError> {
//! let config = SimulationConfig::for_airport(AirportProfile::JohnFKennedy);
//! let report = Simulation::new(config)?.run(CancellationToken::new()).await;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

pub mod airport;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod plane;
pub mod report;
pub mod simulation;
pub mod stats;
pub mod status;

/// Version of the Margolis library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
