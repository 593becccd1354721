//! Greedy priority-queue sweep (PQ and MaxMean strategies).
//!
//! Candidates are drained from a binary max-heap in priority order; each
//! is accepted if it keeps the required distance from every previously
//! accepted window, and discarded permanently otherwise. Accepted window
//! starts are kept in a sorted array so each check is a binary search,
//! keeping the whole sweep O(M log M) for M candidates.
//!
//! This is an interval-packing heuristic: it is not weight-optimal, by
//! design (the WIS strategy is the exact one).

use crate::candidate::Candidate;
use crate::signal::Segment;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Heap adapter: orders by descending priority, then descending tie mean,
/// then *ascending* original index, so equal-priority windows pop in
/// deterministic left-to-right order.
struct Ranked(Candidate);

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .priority
            .total_cmp(&other.0.priority)
            .then(self.0.tie_mean.total_cmp(&other.0.tie_mean))
            .then(other.0.original_idx.cmp(&self.0.original_idx))
    }
}

/// Run the greedy sweep over one segment's candidates.
///
/// Two windows conflict when the nt distance between their starts is
/// strictly less than `exclusion_total`; a distance exactly equal to it
/// is allowed. Selections whose reported score is not positive still
/// block their neighborhood during the sweep but are dropped from the
/// returned set.
///
/// Returns accepted candidates sorted by ascending window start.
pub fn sweep_select(
    candidates: Vec<Candidate>,
    segment: &Segment,
    window_bins: usize,
    exclusion_total: u64,
) -> Vec<Candidate> {
    let mut heap: BinaryHeap<Ranked> = candidates.into_iter().map(Ranked).collect();

    // Sorted nt starts of accepted windows
    let mut accepted_starts: Vec<u64> = Vec::new();
    let mut accepted: Vec<Candidate> = Vec::new();

    while let Some(Ranked(cand)) = heap.pop() {
        let (start_nt, _end_nt) = segment.window_range(cand.start, window_bins);
        let pos = accepted_starts.partition_point(|&s| s < start_nt);

        let clear_left = pos == 0 || start_nt - accepted_starts[pos - 1] >= exclusion_total;
        let clear_right =
            pos == accepted_starts.len() || accepted_starts[pos] - start_nt >= exclusion_total;

        if clear_left && clear_right {
            accepted_starts.insert(pos, start_nt);
            accepted.push(cand);
        }
    }

    accepted.retain(|c| c.score > 0.0);
    accepted.sort_by_key(|c| c.start);
    accepted
}
