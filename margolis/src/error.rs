//! Fatal simulation errors.
//!
//! Stage failures (deadlock, starvation) are outcomes of a plane's
//! lifecycle, not errors; see [`StageOutcome`](crate::plane::StageOutcome).
//! The errors here stop a run before any plane starts.

use thiserror::Error;

/// Errors that prevent a simulation from starting.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// The configuration cannot describe a runnable simulation
    #[error("invalid simulation configuration: {reason}")]
    InvalidConfig { reason: String },

    /// The plane record table could not be allocated
    #[error("failed to allocate records for {capacity} planes: {source}")]
    RegistryAllocation {
        capacity: usize,
        #[source]
        source: std::collections::TryReserveError,
    },
}
