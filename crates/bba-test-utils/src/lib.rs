#![forbid(unsafe_code)]
#![expect(
    clippy::expect_used,
    reason = "test utility crate — expects are acceptable"
)]
#![expect(
    clippy::missing_panics_doc,
    reason = "test utility crate — panic documentation not needed"
)]

//! Shared test utilities for the bba workspace.

pub mod fixtures;
pub mod rng;
pub mod sim;

pub use fixtures::*;
pub use rng::*;
pub use sim::{SessionReport, SessionSim};
