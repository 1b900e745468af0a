//! Trace-driven host player.
//!
//! Plays the role of the streaming client around a controller: downloads one
//! fragment per step at the chosen level over a given bandwidth, drains and
//! refills the playback buffer, and feeds the controller the resulting
//! [`FeedbackSample`].
//!
//! Rates, bandwidth and chunk sizes all share one unit (bytes per second and
//! bytes), matching what the chunk-aware policy expects.

use bba_abr::{
    AbrDecision, AbrSink, BbaController, ChunkFeedback, FeedbackSample, Ladder, LevelPlaylist,
    ReservoirPolicy, SegmentDescriptor,
};

use crate::Xorshift64;

#[derive(Clone, Debug)]
pub struct SessionSim {
    ladder: Ladder,
    fragment_duration_secs: f64,
    max_buffer_secs: f64,
    /// Per-level segment sizes when chunk feedback is published.
    chunk_sizes: Option<Vec<Vec<u64>>>,
}

/// What happened over one simulated session.
#[derive(Clone, Debug, Default)]
pub struct SessionReport {
    pub decisions: Vec<AbrDecision>,
    /// Level each fragment was downloaded at.
    pub levels: Vec<usize>,
    /// Buffer occupancy reported after each fragment.
    pub buffer_secs: Vec<f64>,
    pub stalls: usize,
    /// Total time playback waited on downloads.
    pub stall_secs: f64,
}

impl SessionReport {
    /// Number of level changes between consecutive fragments.
    pub fn switches(&self) -> usize {
        self.levels.windows(2).filter(|w| w[0] != w[1]).count()
    }
}

impl SessionSim {
    #[must_use]
    pub fn new(ladder: Ladder, fragment_duration_secs: f64, max_buffer_secs: f64) -> Self {
        Self {
            ladder,
            fragment_duration_secs,
            max_buffer_secs,
            chunk_sizes: None,
        }
    }

    /// Publish per-segment chunk tables whose sizes vary by up to
    /// `jitter_fraction` around `rate * fragment_duration`.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "positive sizes well inside u64"
    )]
    pub fn with_chunk_tables(mut self, segments: usize, jitter_fraction: f64, seed: u64) -> Self {
        let mut rng = Xorshift64::new(seed);
        let sizes: Vec<Vec<u64>> = self
            .ladder
            .rates()
            .iter()
            .map(|rate| {
                (0..segments)
                    .map(|_| {
                        let jitter = rng.range_f64(-jitter_fraction, jitter_fraction);
                        let bytes = rate * self.fragment_duration_secs * (1.0 + jitter);
                        bytes.max(1.0) as u64
                    })
                    .collect()
            })
            .collect();
        self.chunk_sizes = Some(sizes);
        self
    }

    pub fn ladder(&self) -> &Ladder {
        &self.ladder
    }

    /// Byte-range playlists built from the chunk tables, one per level.
    pub fn playlists(&self) -> Option<Vec<LevelPlaylist>> {
        let sizes = self.chunk_sizes.as_ref()?;
        Some(
            sizes
                .iter()
                .map(|level_sizes| {
                    let mut offset = 0_u64;
                    LevelPlaylist {
                        segments: level_sizes
                            .iter()
                            .map(|size| {
                                let start = offset;
                                offset += size;
                                SegmentDescriptor::new(format!("{start}-{offset}"))
                            })
                            .collect(),
                    }
                })
                .collect(),
        )
    }

    #[expect(clippy::cast_precision_loss, reason = "chunk sizes are small")]
    fn fragment_bytes(&self, level: usize, segment: usize) -> f64 {
        let table = self
            .chunk_sizes
            .as_ref()
            .and_then(|sizes| sizes.get(level))
            .and_then(|level_sizes| level_sizes.get(segment));
        match table {
            Some(&bytes) => bytes as f64,
            None => self.ladder.rate(level).unwrap_or(0.0) * self.fragment_duration_secs,
        }
    }

    /// Play one fragment per bandwidth sample, starting at level 0 with an
    /// empty buffer.
    ///
    /// The idle duration the controller asks for is honoured only once the
    /// buffer cannot take another fragment.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "positive sizes well inside u64"
    )]
    pub fn run<P: ReservoirPolicy, S: AbrSink>(
        &self,
        controller: &mut BbaController<P, S>,
        bandwidth: &[f64],
    ) -> SessionReport {
        let playlists = self.playlists();
        let mut report = SessionReport::default();
        let mut level = 0;
        let mut buffer = 0.0_f64;

        for (segment, &bw) in bandwidth.iter().enumerate() {
            let rate = self.ladder.rate(level).expect("controller keeps level in ladder");
            let bytes = self.fragment_bytes(level, segment);
            let download_secs = bytes / bw;

            if download_secs > buffer && segment > 0 {
                report.stalls += 1;
                report.stall_secs += download_secs - buffer;
            }
            buffer = ((buffer - download_secs).max(0.0) + self.fragment_duration_secs)
                .min(self.max_buffer_secs);

            let chunks = playlists.as_ref().map(|playlists| {
                ChunkFeedback {
                    bandwidth_estimate: bytes / download_secs,
                    last_fragment_bytes: bytes as u64,
                    // next segment, 1-based
                    segment_number: segment + 2,
                    playlists: playlists.clone(),
                }
            });

            let feedback = FeedbackSample {
                last_download_secs: download_secs,
                current_rate: rate,
                fragment_duration_secs: self.fragment_duration_secs,
                queued_secs: buffer,
                max_buffer_secs: self.max_buffer_secs,
                ladder: self.ladder.clone(),
                current_level: level,
                chunks,
            };

            let decision = controller.decide(&feedback);
            if buffer + self.fragment_duration_secs > self.max_buffer_secs {
                buffer = (buffer - decision.idle.as_secs_f64()).max(0.0);
            }

            report.levels.push(level);
            report.buffer_secs.push(buffer);
            level = decision.target_level;
            report.decisions.push(decision);
        }

        report
    }
}
