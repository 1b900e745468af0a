//! All integration tests for the bba workspace
#![expect(
    clippy::unwrap_used,
    reason = "integration test crate — unwraps are acceptable in test code"
)]

mod bba_abr;
mod bba_events;
