//! CLI command implementations.
//!
//! - [`run`] - Run a simulation and print its report
//! - [`profiles`] - List the airport traffic profiles

pub mod profiles;
pub mod run;
