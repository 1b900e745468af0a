use std::time::Duration;

use crate::{AbrError, AbrReason, MappingZone};

/// Fail-safe applied after a decision-time error.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Fallback {
    /// The minimum ladder rate was selected for this decision.
    MinRate,
    /// Rate-based BBA-0 bounds replaced the chunk-size bounds.
    Bba0Bounds,
    /// An out-of-range input was clamped into the ladder.
    Clamped,
    /// The throughput estimate was left untouched.
    SkipThroughput,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Fault {
    pub error: AbrError,
    pub fallback: Fallback,
}

/// Observability events emitted by [`BbaController`](crate::BbaController).
#[derive(Clone, Debug, PartialEq)]
pub enum AbrEvent {
    /// One control action computed.
    ControlAction {
        policy: &'static str,
        throughput_estimate: Option<f64>,
        target_rate: f64,
        smoothed_rate: f64,
        buffer_secs: f64,
        zone: MappingZone,
        idle: Duration,
    },
    /// Level chosen for the next fragment.
    LevelDecision {
        from_level: usize,
        to_level: usize,
        reason: AbrReason,
    },
    /// A detected problem and the fallback applied.
    Fault(Fault),
}

/// Receives controller events. Injected at construction.
#[cfg_attr(test, unimock::unimock(api = AbrSinkMock))]
pub trait AbrSink {
    fn emit(&self, event: AbrEvent);
}

/// Sink that discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl AbrSink for NullSink {
    fn emit(&self, _event: AbrEvent) {}
}
