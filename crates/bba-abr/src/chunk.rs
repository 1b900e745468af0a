//! Chunk sizes from per-level segment byte ranges.

use crate::{AbrError, AbrResult, ChunkFeedback, LevelPlaylist};

/// Span of a `"start-end"` byte range, `end - start`.
pub fn byte_range_span(range: &str) -> Option<u64> {
    let (start, end) = range.trim().split_once('-')?;
    let start: u64 = start.trim().parse().ok()?;
    let end: u64 = end.trim().parse().ok()?;
    end.checked_sub(start)
}

/// Size of segment `segment_number` (1-based) in one level's playlist.
pub fn chunk_size(playlist: &LevelPlaylist, level: usize, segment_number: usize) -> AbrResult<u64> {
    let segment = segment_number
        .checked_sub(1)
        .and_then(|idx| playlist.segments.get(idx))
        .ok_or(AbrError::MissingSegment {
            level,
            segment: segment_number,
        })?;

    byte_range_span(&segment.byte_range).ok_or_else(|| AbrError::MalformedByteRange {
        level,
        range: segment.byte_range.clone(),
    })
}

/// Smallest and largest chunk size across levels at the current segment.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ChunkSpan {
    pub min_bytes: u64,
    pub max_bytes: u64,
}

impl ChunkSpan {
    /// Looks up every level; fails with all per-level errors if any level
    /// has no usable size.
    ///
    /// Strictly, only a missing level 0 or top level leaves the span
    /// unbounded, since chunk size grows with rate. An inner gap is still
    /// rejected: it signals a table out of step with the manifest, and the
    /// surviving edges are not trusted either.
    pub fn at_current_segment(chunks: &ChunkFeedback) -> Result<Self, Vec<AbrError>> {
        if chunks.playlists.is_empty() {
            return Err(vec![AbrError::MissingChunkFeedback]);
        }

        let mut sizes = Vec::with_capacity(chunks.playlists.len());
        let mut errors = Vec::new();
        for (level, playlist) in chunks.playlists.iter().enumerate() {
            match chunk_size(playlist, level, chunks.segment_number) {
                Ok(size) => sizes.push(size),
                Err(e) => errors.push(e),
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        match (sizes.iter().min(), sizes.iter().max()) {
            (Some(&min_bytes), Some(&max_bytes)) => Ok(Self {
                min_bytes,
                max_bytes,
            }),
            _ => Err(vec![AbrError::MissingChunkFeedback]),
        }
    }
}
