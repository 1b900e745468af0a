use crate::{AbrError, AbrResult, Ladder};

/// Controller configuration, fixed for the lifetime of a session.
#[derive(Clone, PartialEq)]
pub struct BbaOptions {
    /// Buffer level (seconds) below which the session counts as buffering.
    pub buffer_low_watermark_secs: f64,
    /// Up-switch hysteresis as a fraction of the target rate.
    pub hysteresis_fraction: f64,
    /// Lower reservoir as a fraction of buffer capacity (BBA-0).
    pub reservoir_fraction: f64,
    /// Gain of the time-scaled smoothing filter, per second of download time.
    pub smoothing_factor: f64,
    /// Upper reservoir as a fraction of buffer capacity.
    pub upper_reservoir_fraction: f64,
}

impl Default for BbaOptions {
    fn default() -> Self {
        Self {
            buffer_low_watermark_secs: 30.0,
            hysteresis_fraction: 0.15,
            reservoir_fraction: 0.3,
            smoothing_factor: 0.2,
            upper_reservoir_fraction: 0.1,
        }
    }
}

impl std::fmt::Debug for BbaOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BbaOptions")
            .field("buffer_low_watermark_secs", &self.buffer_low_watermark_secs)
            .field("hysteresis", &format_args!("{:.0}%", self.hysteresis_fraction * 100.0))
            .field("reservoir", &format_args!("{:.0}%", self.reservoir_fraction * 100.0))
            .field("smoothing_factor", &self.smoothing_factor)
            .field(
                "upper_reservoir",
                &format_args!("{:.0}%", self.upper_reservoir_fraction * 100.0),
            )
            .finish()
    }
}

impl BbaOptions {
    /// Preset for the chunk-aware controller, which buffers deeper before playing.
    #[must_use]
    pub fn bba1() -> Self {
        Self {
            buffer_low_watermark_secs: 40.0,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_buffer_low_watermark_secs(mut self, secs: f64) -> Self {
        self.buffer_low_watermark_secs = secs;
        self
    }

    #[must_use]
    pub fn with_hysteresis_fraction(mut self, fraction: f64) -> Self {
        self.hysteresis_fraction = fraction;
        self
    }

    #[must_use]
    pub fn with_smoothing_factor(mut self, alpha: f64) -> Self {
        self.smoothing_factor = alpha;
        self
    }

    #[must_use]
    pub fn with_reservoir_fractions(mut self, lower: f64, upper: f64) -> Self {
        self.reservoir_fraction = lower;
        self.upper_reservoir_fraction = upper;
        self
    }

    pub fn validate(&self) -> AbrResult<()> {
        let open_unit = |v: f64| v > 0.0 && v < 1.0;
        let half_open_unit = |v: f64| (0.0..1.0).contains(&v);

        if !open_unit(self.smoothing_factor) {
            return Err(AbrError::InvalidOptions(format!(
                "smoothing_factor {} not in (0, 1)",
                self.smoothing_factor
            )));
        }
        if !open_unit(self.hysteresis_fraction) {
            return Err(AbrError::InvalidOptions(format!(
                "hysteresis_fraction {} not in (0, 1)",
                self.hysteresis_fraction
            )));
        }
        if !half_open_unit(self.reservoir_fraction)
            || !half_open_unit(self.upper_reservoir_fraction)
            || self.reservoir_fraction + self.upper_reservoir_fraction >= 1.0
        {
            return Err(AbrError::InvalidOptions(format!(
                "reservoir fractions {} + {} leave no cushion",
                self.reservoir_fraction, self.upper_reservoir_fraction
            )));
        }
        if !self.buffer_low_watermark_secs.is_finite() || self.buffer_low_watermark_secs <= 0.0 {
            return Err(AbrError::InvalidOptions(format!(
                "buffer_low_watermark_secs {} must be positive",
                self.buffer_low_watermark_secs
            )));
        }
        Ok(())
    }
}

/// One segment of a level playlist, as advertised by the manifest.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SegmentDescriptor {
    /// Byte range in `"start-end"` form; its span is the chunk size.
    pub byte_range: String,
}

impl SegmentDescriptor {
    pub fn new(byte_range: impl Into<String>) -> Self {
        Self {
            byte_range: byte_range.into(),
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LevelPlaylist {
    pub segments: Vec<SegmentDescriptor>,
}

/// Extra feedback consumed by the chunk-aware (BBA-1) policy.
///
/// `bandwidth_estimate` and the ladder rates must be expressed in the same
/// unit as `last_fragment_bytes` per second.
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkFeedback {
    pub bandwidth_estimate: f64,
    pub last_fragment_bytes: u64,
    /// 1-based number of the segment about to be requested.
    pub segment_number: usize,
    /// One playlist per ladder level, in ladder order.
    pub playlists: Vec<LevelPlaylist>,
}

/// Host feedback for one fragment boundary.
#[derive(Clone, Debug, PartialEq)]
pub struct FeedbackSample {
    /// Seconds spent fetching the last fragment.
    pub last_download_secs: f64,
    /// Bitrate of the level just downloaded.
    pub current_rate: f64,
    pub fragment_duration_secs: f64,
    /// Seconds of media currently buffered.
    pub queued_secs: f64,
    /// Buffer capacity in seconds.
    pub max_buffer_secs: f64,
    pub ladder: Ladder,
    pub current_level: usize,
    pub chunks: Option<ChunkFeedback>,
}

impl FeedbackSample {
    pub fn min_rate(&self) -> f64 {
        self.ladder.min_rate()
    }

    pub fn max_rate(&self) -> f64 {
        self.ladder.max_rate()
    }
}
