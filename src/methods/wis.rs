//! Weighted interval scheduling: the exact selection strategy.
//!
//! Classic maximum-weight independent set over a line of intervals,
//! solved by dynamic programming over end-sorted rows. This is the only
//! strategy with a global optimality guarantee; the greedy sweeps trade
//! that for locality of scoring.

/// One input row treated directly as a candidate interval. The window
/// aggregator is bypassed for this strategy: rows carry their own weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WisInterval {
    /// nt start of the row.
    pub start: u64,
    /// nt end of the row (half-open).
    pub end: u64,
    /// Row score, used as the DP weight without aggregation.
    pub weight: f64,
    /// Row index within its segment.
    pub row_idx: usize,
}

/// An interval chosen by the DP.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WisPick {
    pub start: u64,
    pub end: u64,
    pub weight: f64,
    /// Original row index within the segment.
    pub row_idx: usize,
    /// Position in the end-sorted order the DP ran over.
    pub sorted_idx: usize,
}

/// Select the maximum-total-weight subset of pairwise compatible rows.
///
/// Rows `i` (earlier end) and `j` are compatible iff
/// `start_j - end_i >= exclusion_size`; a gap exactly equal to the
/// exclusion is allowed, anything smaller (including overlap) conflicts.
/// Backtrack ties are resolved in favor of inclusion.
///
/// O(M log M): sort, one binary search per row, linear DP and trace.
pub fn wis_select(mut rows: Vec<WisInterval>, exclusion_size: u64) -> Vec<WisPick> {
    let n = rows.len();
    if n == 0 {
        return Vec::new();
    }

    // Stable sort keeps input order for fully tied rows
    rows.sort_by(|a, b| a.end.cmp(&b.end).then(a.start.cmp(&b.start)));

    let ends: Vec<u64> = rows.iter().map(|r| r.end).collect();

    // p[j] = number of rows compatible to the left of row j
    // (so best[p[j]] below is the optimum over those rows)
    let p: Vec<usize> = rows
        .iter()
        .map(|r| {
            let limit = r.start as i64 - exclusion_size as i64;
            ends.partition_point(|&e| (e as i64) <= limit)
        })
        .collect();

    // best[j] = optimal total weight over the first j sorted rows
    let mut best = vec![0.0f64; n + 1];
    for j in 0..n {
        best[j + 1] = (rows[j].weight + best[p[j]]).max(best[j]);
    }

    let mut picks = Vec::new();
    let mut j = n;
    while j > 0 {
        let idx = j - 1;
        if rows[idx].weight + best[p[idx]] >= best[idx] {
            picks.push(WisPick {
                start: rows[idx].start,
                end: rows[idx].end,
                weight: rows[idx].weight,
                row_idx: rows[idx].row_idx,
                sorted_idx: idx,
            });
            j = p[idx];
        } else {
            j = idx;
        }
    }

    picks.reverse();
    picks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(defs: &[(u64, u64, f64)]) -> Vec<WisInterval> {
        defs.iter()
            .enumerate()
            .map(|(i, &(start, end, weight))| WisInterval {
                start,
                end,
                weight,
                row_idx: i,
            })
            .collect()
    }

    #[test]
    fn test_reference_scenario() {
        // A=(0,3,5), B=(2,5,6), C=(5,8,5): {A, C} with weight 10 beats {B}
        let picks = wis_select(rows(&[(0, 3, 5.0), (2, 5, 6.0), (5, 8, 5.0)]), 0);
        let chosen: Vec<u64> = picks.iter().map(|p| p.start).collect();
        assert_eq!(chosen, vec![0, 5]);
        let total: f64 = picks.iter().map(|p| p.weight).sum();
        assert_eq!(total, 10.0);
    }

    #[test]
    fn test_exclusion_gap_boundary() {
        // Gap of exactly exclusion_size is compatible...
        let picks = wis_select(rows(&[(0, 3, 5.0), (8, 10, 5.0)]), 5);
        assert_eq!(picks.len(), 2);
        // ...one nt less conflicts
        let picks = wis_select(rows(&[(0, 3, 5.0), (7, 10, 5.0)]), 5);
        assert_eq!(picks.len(), 1);
    }

    #[test]
    fn test_adjacent_intervals_compatible_without_exclusion() {
        let picks = wis_select(rows(&[(0, 3, 1.0), (3, 6, 1.0), (6, 9, 1.0)]), 0);
        assert_eq!(picks.len(), 3);
    }

    #[test]
    fn test_single_heavy_interval_wins() {
        let picks = wis_select(rows(&[(0, 3, 2.0), (2, 5, 10.0), (4, 7, 2.0)]), 0);
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].start, 2);
    }

    #[test]
    fn test_ties_favor_inclusion() {
        // Two disjoint unit-weight rows tie with one spanning row of
        // weight 2; inclusion-favoring trace picks the two rows
        let picks = wis_select(rows(&[(0, 2, 1.0), (0, 6, 2.0), (4, 6, 1.0)]), 0);
        assert_eq!(picks.len(), 2);
        assert_eq!(picks[0].start, 0);
        assert_eq!(picks[0].end, 2);
        assert_eq!(picks[1].start, 4);
    }

    #[test]
    fn test_sorted_idx_and_row_idx() {
        let picks = wis_select(rows(&[(5, 8, 5.0), (0, 3, 5.0)]), 0);
        assert_eq!(picks.len(), 2);
        assert_eq!(picks[0].row_idx, 1); // (0,3) was input row 1
        assert_eq!(picks[0].sorted_idx, 0); // but sorts first by end
        assert_eq!(picks[1].row_idx, 0);
        assert_eq!(picks[1].sorted_idx, 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(wis_select(Vec::new(), 100).is_empty());
    }
}
