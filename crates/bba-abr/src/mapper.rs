//! Buffer occupancy to target rate.
//!
//! Both policies share the same control skeleton: below the reservoir pick
//! the lowest rate, above reservoir + cushion pick the highest, in between
//! interpolate linearly and step to an adjacent rung only when the
//! interpolated value leaves the band around the current rate. They differ
//! only in how the reservoir and interpolation bounds are derived.

use crate::{AbrError, AbrResult, BbaOptions, ChunkSpan, Fallback, Fault, FeedbackSample, Ladder};

/// Region of the buffer the occupancy fell into.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MappingZone {
    Reservoir,
    Cushion,
    UpperReservoir,
    /// Bounds could not be derived; the minimum rate was forced.
    Degenerate,
}

/// Reservoir/cushion geometry and the values interpolated across the cushion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CushionMap {
    pub reservoir_secs: f64,
    pub cushion_secs: f64,
    /// Value at `buffer == reservoir`.
    pub lower: f64,
    /// Value at `buffer == reservoir + cushion`.
    pub upper: f64,
}

impl CushionMap {
    /// Reservoir and cushion carved out of `max_buffer_secs`.
    ///
    /// Fails when the cushion is not strictly positive.
    pub fn new(
        reservoir_secs: f64,
        upper_reservoir_secs: f64,
        max_buffer_secs: f64,
        lower: f64,
        upper: f64,
    ) -> AbrResult<Self> {
        let cushion_secs = max_buffer_secs - reservoir_secs - upper_reservoir_secs;
        // also rejects NaN
        if !(cushion_secs > 0.0) || !cushion_secs.is_finite() {
            return Err(AbrError::DegenerateCushion {
                cushion_secs,
                reservoir_secs,
                max_buffer_secs,
            });
        }
        Ok(Self {
            reservoir_secs,
            cushion_secs,
            lower,
            upper,
        })
    }

    pub fn zone(&self, buffer_secs: f64) -> MappingZone {
        if buffer_secs <= self.reservoir_secs {
            MappingZone::Reservoir
        } else if buffer_secs >= self.reservoir_secs + self.cushion_secs {
            MappingZone::UpperReservoir
        } else {
            MappingZone::Cushion
        }
    }

    /// Linear interpolation from `lower` at the reservoir edge to `upper` at
    /// the top of the cushion.
    pub fn interpolate(&self, buffer_secs: f64) -> f64 {
        let (b, r, c) = (buffer_secs, self.reservoir_secs, self.cushion_secs);
        (self.upper * b - self.upper * r - self.lower * b + self.lower * r + self.lower * c) / c
    }

    /// Target rate for the given occupancy, before smoothing.
    ///
    /// Inside the cushion an interpolated value at or above the next rung
    /// steps up to the highest rung strictly below it; one at or below the
    /// previous rung steps down to the lowest rung strictly above it.
    /// Anything in between holds `current_rate`.
    pub fn target_rate(&self, buffer_secs: f64, ladder: &Ladder, current_rate: f64) -> f64 {
        match self.zone(buffer_secs) {
            MappingZone::Reservoir | MappingZone::Degenerate => ladder.min_rate(),
            MappingZone::UpperReservoir => ladder.max_rate(),
            MappingZone::Cushion => {
                let level = self.interpolate(buffer_secs);
                if level >= ladder.rate_plus(current_rate) {
                    ladder.largest_below(level).unwrap_or(ladder.min_rate())
                } else if level <= ladder.rate_minus(current_rate) {
                    ladder.smallest_above(level).unwrap_or(ladder.min_rate())
                } else {
                    current_rate
                }
            }
        }
    }
}

/// Strategy deriving the cushion map for one decision.
///
/// `current_rate` is the host's rate after clamping into the ladder and takes
/// precedence over `feedback.current_rate`. An `Err` means no usable map
/// exists and the decision must fail safe to the minimum rate. Recoverable
/// problems that degrade the map instead are pushed onto `faults`.
pub trait ReservoirPolicy {
    fn name(&self) -> &'static str;

    fn cushion_map(
        &self,
        feedback: &FeedbackSample,
        current_rate: f64,
        opts: &BbaOptions,
        faults: &mut Vec<Fault>,
    ) -> AbrResult<CushionMap>;
}

/// Reservoir and cushion as fixed fractions of buffer capacity, interpolating
/// between the lowest and highest ladder rates.
#[derive(Clone, Copy, Debug, Default)]
pub struct Bba0;

impl ReservoirPolicy for Bba0 {
    fn name(&self) -> &'static str {
        "bba0"
    }

    fn cushion_map(
        &self,
        feedback: &FeedbackSample,
        _current_rate: f64,
        opts: &BbaOptions,
        _faults: &mut Vec<Fault>,
    ) -> AbrResult<CushionMap> {
        let max_buffer = feedback.max_buffer_secs;
        CushionMap::new(
            opts.reservoir_fraction * max_buffer,
            opts.upper_reservoir_fraction * max_buffer,
            max_buffer,
            feedback.min_rate(),
            feedback.max_rate(),
        )
    }
}

/// Reservoir sized by the time the last chunk needs to download over the
/// spare bandwidth, interpolating between the smallest and largest chunk at
/// the current segment.
///
/// A chunk table with any unusable level falls back to [`Bba0`]'s map for
/// that decision; see [`ChunkSpan::at_current_segment`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Bba1;

impl ReservoirPolicy for Bba1 {
    fn name(&self) -> &'static str {
        "bba1"
    }

    fn cushion_map(
        &self,
        feedback: &FeedbackSample,
        current_rate: f64,
        opts: &BbaOptions,
        faults: &mut Vec<Fault>,
    ) -> AbrResult<CushionMap> {
        let chunks = feedback
            .chunks
            .as_ref()
            .ok_or(AbrError::MissingChunkFeedback)?;

        let headroom = chunks.bandwidth_estimate - current_rate;
        // also rejects NaN
        if !(headroom > 0.0) {
            return Err(AbrError::NoBandwidthHeadroom {
                bandwidth: chunks.bandwidth_estimate,
                current_rate,
            });
        }

        let span = match ChunkSpan::at_current_segment(chunks) {
            Ok(span) => span,
            Err(errors) => {
                faults.extend(errors.into_iter().map(|error| Fault {
                    error,
                    fallback: Fallback::Bba0Bounds,
                }));
                return Bba0.cushion_map(feedback, current_rate, opts, faults);
            }
        };

        #[expect(clippy::cast_precision_loss)] // chunk sizes are far below 2^52 bytes
        let (last_bytes, min_bytes, max_bytes) = (
            chunks.last_fragment_bytes as f64,
            span.min_bytes as f64,
            span.max_bytes as f64,
        );

        let max_buffer = feedback.max_buffer_secs;
        CushionMap::new(
            last_bytes / headroom,
            opts.upper_reservoir_fraction * max_buffer,
            max_buffer,
            min_bytes,
            max_bytes,
        )
    }
}
