use thiserror::Error;

/// Every condition the controller detects, at construction or per decision.
///
/// Construction errors are returned. Decision-time errors never abort a
/// decision: they are reported through [`AbrSink`](crate::AbrSink) together
/// with the [`Fallback`](crate::Fallback) that was applied.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AbrError {
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    #[error("invalid rate ladder: {0}")]
    InvalidLadder(String),
    #[error(
        "degenerate cushion {cushion_secs:.3}s (reservoir {reservoir_secs:.3}s, buffer {max_buffer_secs:.3}s)"
    )]
    DegenerateCushion {
        cushion_secs: f64,
        reservoir_secs: f64,
        max_buffer_secs: f64,
    },
    #[error("no bandwidth headroom: estimate {bandwidth} <= current rate {current_rate}")]
    NoBandwidthHeadroom { bandwidth: f64, current_rate: f64 },
    #[error("chunk feedback missing or empty")]
    MissingChunkFeedback,
    #[error("malformed byte range {range:?} for level {level}")]
    MalformedByteRange { level: usize, range: String },
    #[error("segment {segment} missing from level {level} playlist")]
    MissingSegment { level: usize, segment: usize },
    #[error("level {level} outside ladder of {len} rates")]
    LevelOutOfRange { level: usize, len: usize },
    #[error("current rate {rate} outside ladder span [{min}, {max}]")]
    RateOutOfRange { rate: f64, min: f64, max: f64 },
    #[error("invalid download time {0}s")]
    InvalidDownloadTime(f64),
}

pub type AbrResult<T> = Result<T, AbrError>;
