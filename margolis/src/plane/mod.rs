//! Planes: records, stages, the acquisition protocol and the task registry.
//!
//! Each plane runs as its own task ([`fly`]) and moves through three stages.
//! Every stage acquires a class-specific chain of resources
//! ([`Stage::acquisition_order`]), holds it for the stage's work time and
//! releases it. Stage failures are domain outcomes ([`StageOutcome`]) that
//! end the plane in a crashed state; they are never errors.

mod lifecycle;
mod model;
mod protocol;
mod registry;
mod stage;

pub use lifecycle::fly;
pub use model::{FlightClass, Plane, PlaneId, PlaneState};
pub use registry::{FinalPlaneState, PlaneRegistry};
pub use stage::{Stage, StageOutcome};
