//! Buffer-based bitrate adaptation.
//!
//! Picks the quality level of the next fragment from how full the playback
//! buffer is, rather than from a throughput forecast. Two policies are
//! provided:
//!
//! - [`Bba0`]: reservoir and cushion are fixed fractions of buffer capacity;
//!   the cushion maps linearly onto the ladder's rate range.
//! - [`Bba1`]: the reservoir is the time the last chunk needs to download over
//!   the spare bandwidth, and the cushion maps onto the span of chunk sizes at
//!   the current segment.
//!
//! Both feed their target through a time-scaled smoothing filter and quantize
//! the result onto the ladder with asymmetric hysteresis. Problems in the
//! feedback never abort a decision; they are reported through an injected
//! [`AbrSink`] and the controller falls back to the safest choice.
//!
//! ## Example
//!
//! ```rust
//! use bba_abr::{Bba0, BbaController, BbaOptions, FeedbackSample, Ladder};
//!
//! let mut controller = BbaController::new(BbaOptions::default(), Bba0)?;
//!
//! let feedback = FeedbackSample {
//!     last_download_secs: 1.5,
//!     current_rate: 500_000.0,
//!     fragment_duration_secs: 2.0,
//!     queued_secs: 40.0,
//!     max_buffer_secs: 60.0,
//!     ladder: Ladder::new([250_000.0, 500_000.0, 1_000_000.0, 2_000_000.0])?,
//!     current_level: 1,
//!     chunks: None,
//! };
//!
//! let decision = controller.decide(&feedback);
//! assert!(decision.target_level < feedback.ladder.len());
//! # Ok::<(), bba_abr::AbrError>(())
//! ```

#![forbid(unsafe_code)]

mod chunk;
mod controller;
mod error;
mod estimator;
mod events;
mod ladder;
mod mapper;
mod quantizer;
mod types;

pub use chunk::{ChunkSpan, byte_range_span, chunk_size};
pub use controller::{AbrDecision, AbrReason, Bba0Controller, Bba1Controller, BbaController};
pub use error::{AbrError, AbrResult};
pub use estimator::RateFilter;
pub use events::{AbrEvent, AbrSink, Fallback, Fault, NullSink};
pub use ladder::Ladder;
pub use mapper::{Bba0, Bba1, CushionMap, MappingZone, ReservoirPolicy};
pub use quantizer::quantize;
pub use types::{BbaOptions, ChunkFeedback, FeedbackSample, LevelPlaylist, SegmentDescriptor};
