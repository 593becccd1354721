//! Candidate generation: turns aggregated windows into ranked candidates.

use crate::rolling::{AggregateBundle, AggregationMethod, WindowAggregate};

/// A scored window competing for selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Window start bin within the segment.
    pub start: usize,
    /// Primary ranking key (method-dependent).
    pub priority: f64,
    /// Secondary ranking key: the window mean for MaxMean, unused for PQ.
    pub tie_mean: f64,
    /// Reported score, per the configured aggregation method.
    pub score: f64,
    /// Bin index the priority is anchored to (the window's center bin).
    pub original_idx: usize,
    /// Candidate position in window-start order; breaks ranking ties.
    pub method_idx: usize,
    /// Full statistic bundle, carried for preserve-cols output.
    pub bundle: AggregateBundle,
}

/// Centermost bin of the window `[start, start + window_bins)`.
///
/// For even window lengths this is the *lower* of the two center bins
/// (`start + (window_bins - 1) / 2`). This choice is a stable contract:
/// it determines OriginalIdx and MethodIdx output exactly.
#[inline]
pub fn center_bin(start: usize, window_bins: usize) -> usize {
    start + (window_bins - 1) / 2
}

/// Candidates for the priority-queue sweep: priority is the raw score at
/// the window's center bin, not an aggregate.
pub fn pq_candidates(
    scores: &[f64],
    aggregates: &[WindowAggregate],
    window_bins: usize,
    aggregation: AggregationMethod,
) -> Vec<Candidate> {
    aggregates
        .iter()
        .enumerate()
        .map(|(idx, wa)| {
            let center = center_bin(wa.start, window_bins);
            Candidate {
                start: wa.start,
                priority: scores[center],
                tie_mean: 0.0,
                score: wa.bundle.statistic(aggregation),
                original_idx: center,
                method_idx: idx,
                bundle: wa.bundle,
            }
        })
        .collect()
}

/// Candidates for the max-mean sweep: ranked by window max, ties by
/// window mean, so windows with a higher max *and* a higher mean win.
pub fn maxmean_candidates(
    aggregates: &[WindowAggregate],
    window_bins: usize,
    aggregation: AggregationMethod,
) -> Vec<Candidate> {
    aggregates
        .iter()
        .enumerate()
        .map(|(idx, wa)| {
            Candidate {
                start: wa.start,
                priority: wa.bundle.max,
                tie_mean: wa.bundle.mean,
                score: wa.bundle.statistic(aggregation),
                original_idx: center_bin(wa.start, window_bins),
                method_idx: idx,
                bundle: wa.bundle,
            }
        })
        .collect()
}
