//! Core signal types for score-track representation.

use std::fmt;

/// An independently processed run of per-bin scores (typically one
/// chromosome). Bin geometry is either uniform (raw vectors: bin `i`
/// covers `[i * bin_size, (i + 1) * bin_size)`) or explicit (bedgraph
/// rows carry their own start/end coordinates).
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Chromosome name, if the input carried one.
    pub label: Option<String>,
    /// Per-bin scores, in position order.
    pub scores: Vec<f64>,
    /// Physical size of one bin in nt.
    pub bin_size: u64,
    /// Explicit nt start per bin (bedgraph input). None = uniform from 0.
    starts: Option<Vec<u64>>,
    /// Explicit nt end per bin (bedgraph input). None = uniform.
    ends: Option<Vec<u64>>,
}

impl Segment {
    /// Create an unlabeled segment from a raw score vector.
    /// Bin `i` occupies `[i, i + 1)` nt.
    pub fn from_scores(scores: Vec<f64>) -> Self {
        Self {
            label: None,
            scores,
            bin_size: 1,
            starts: None,
            ends: None,
        }
    }

    /// Create a labeled segment from bedgraph-derived rows.
    /// `starts`, `ends`, and `scores` must have equal lengths.
    pub fn from_rows(
        label: impl Into<String>,
        starts: Vec<u64>,
        ends: Vec<u64>,
        scores: Vec<f64>,
        bin_size: u64,
    ) -> Self {
        debug_assert_eq!(starts.len(), scores.len());
        debug_assert_eq!(ends.len(), scores.len());
        Self {
            label: Some(label.into()),
            scores,
            bin_size,
            starts: Some(starts),
            ends: Some(ends),
        }
    }

    /// Number of bins in the segment.
    #[inline]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Returns true if the segment has no bins.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Chromosome name, if any.
    #[inline]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// nt start coordinate of bin `i`.
    #[inline]
    pub fn bin_start(&self, i: usize) -> u64 {
        match &self.starts {
            Some(starts) => starts[i],
            None => i as u64 * self.bin_size,
        }
    }

    /// nt end coordinate of bin `i`.
    #[inline]
    pub fn bin_end(&self, i: usize) -> u64 {
        match &self.ends {
            Some(ends) => ends[i],
            None => (i as u64 + 1) * self.bin_size,
        }
    }

    /// nt range covered by the window of `window_bins` bins starting at
    /// bin `start`. The window must fit inside the segment.
    #[inline]
    pub fn window_range(&self, start: usize, window_bins: usize) -> (u64, u64) {
        (self.bin_start(start), self.bin_end(start + window_bins - 1))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} bins x {} nt)",
            self.label().unwrap_or("<unlabeled>"),
            self.len(),
            self.bin_size
        )
    }
}

/// An ordered collection of segments forming one score track.
///
/// Segment order is first-appearance order in the input; output rows are
/// emitted in that order. `labeled` discriminates segmented (bedgraph)
/// from plain vector input and selects the output row shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreTrack {
    pub segments: Vec<Segment>,
    pub labeled: bool,
}

impl ScoreTrack {
    /// Build a single-segment track from a raw score vector.
    pub fn from_scores(scores: Vec<f64>) -> Self {
        Self {
            segments: vec![Segment::from_scores(scores)],
            labeled: false,
        }
    }

    /// Build a track from labeled segments.
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            labeled: true,
        }
    }

    /// Total number of bins across all segments.
    pub fn total_bins(&self) -> usize {
        self.segments.iter().map(|s| s.len()).sum()
    }

    /// Returns true if the track holds no bins at all.
    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(|s| s.is_empty())
    }
}
