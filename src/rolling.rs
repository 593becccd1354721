//! Rolling-window aggregation over per-bin scores.
//!
//! For a segment of N bins and window length W, produces one statistic
//! bundle per valid window start in a single left-to-right sweep:
//!
//! - sum/mean/variance: running accumulators, O(1) per slide
//! - min/max: monotonic index deques, amortized O(1) per slide
//! - median/percentile: a sorted window array maintained with
//!   binary-search insert/remove. The memmove makes this O(W) per slide
//!   (O(N*W) total) rather than O(log W) with a balanced multiset; at the
//!   default W=125 the flat array wins on constant factors and code size.
//!
//! Scores must be finite; the sorted-array maintenance has no defined
//! order for NaN.

use std::collections::VecDeque;

/// Rolling statistics over one window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateBundle {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub sum: f64,
    pub median: f64,
    pub variance: f64,
    pub percentile: f64,
}

impl AggregateBundle {
    /// Select one statistic from the bundle.
    #[inline]
    pub fn statistic(&self, method: AggregationMethod) -> f64 {
        match method {
            AggregationMethod::Min => self.min,
            AggregationMethod::Max => self.max,
            AggregationMethod::Mean => self.mean,
            AggregationMethod::Sum => self.sum,
            AggregationMethod::Median => self.median,
            AggregationMethod::Variance => self.variance,
            AggregationMethod::Percentile => self.percentile,
        }
    }

    /// Bundle for a single value: every statistic collapses to the value
    /// itself, variance to 0. Used for strategies that treat an input row
    /// as its own one-row window.
    pub fn degenerate(value: f64) -> Self {
        Self {
            min: value,
            max: value,
            mean: value,
            sum: value,
            median: value,
            variance: 0.0,
            percentile: value,
        }
    }
}

/// Statistic used as the reported score of each selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationMethod {
    Min,
    Max,
    Mean,
    Sum,
    Median,
    Variance,
    Percentile,
}

impl AggregationMethod {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "min" => Some(AggregationMethod::Min),
            "max" => Some(AggregationMethod::Max),
            "mean" => Some(AggregationMethod::Mean),
            "sum" => Some(AggregationMethod::Sum),
            "median" => Some(AggregationMethod::Median),
            "variance" => Some(AggregationMethod::Variance),
            "percentile" => Some(AggregationMethod::Percentile),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AggregationMethod::Min => "min",
            AggregationMethod::Max => "max",
            AggregationMethod::Mean => "mean",
            AggregationMethod::Sum => "sum",
            AggregationMethod::Median => "median",
            AggregationMethod::Variance => "variance",
            AggregationMethod::Percentile => "percentile",
        }
    }
}

/// One aggregated window: its start bin and statistic bundle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowAggregate {
    pub start: usize,
    pub bundle: AggregateBundle,
}

/// Compute the bundle for every valid window start `i in [0, N-W]`.
///
/// Returns an empty vector when the segment is shorter than the window
/// (the degenerate case is a skip, not an error). `percentile` is the
/// fractional rank in (0, 1]; 0.5 reproduces the median exactly.
pub fn aggregate_windows(
    scores: &[f64],
    window_bins: usize,
    percentile: f64,
) -> Vec<WindowAggregate> {
    let n = scores.len();
    let w = window_bins;
    debug_assert!(w >= 1);
    if n < w {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(n - w + 1);
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    let mut sorted: Vec<f64> = Vec::with_capacity(w);
    let mut min_q: VecDeque<usize> = VecDeque::with_capacity(w);
    let mut max_q: VecDeque<usize> = VecDeque::with_capacity(w);

    for j in 0..n {
        let x = scores[j];
        sum += x;
        sum_sq += x * x;

        let pos = sorted.partition_point(|&v| v < x);
        sorted.insert(pos, x);

        while let Some(&b) = max_q.back() {
            if scores[b] <= x {
                max_q.pop_back();
            } else {
                break;
            }
        }
        max_q.push_back(j);

        while let Some(&b) = min_q.back() {
            if scores[b] >= x {
                min_q.pop_back();
            } else {
                break;
            }
        }
        min_q.push_back(j);

        // Evict the bin that left the window
        if j + 1 > w {
            let gone = j - w;
            let y = scores[gone];
            sum -= y;
            sum_sq -= y * y;
            let pos = sorted.partition_point(|&v| v < y);
            sorted.remove(pos);
            if min_q.front() == Some(&gone) {
                min_q.pop_front();
            }
            if max_q.front() == Some(&gone) {
                max_q.pop_front();
            }
        }

        if j + 1 >= w {
            let start = j + 1 - w;
            let mean = sum / w as f64;
            // Sample variance (ddof = 1); a one-bin window has variance 0.
            let variance = if w > 1 {
                ((sum_sq - sum * sum / w as f64) / (w - 1) as f64).max(0.0)
            } else {
                0.0
            };
            out.push(WindowAggregate {
                start,
                bundle: AggregateBundle {
                    min: scores[*min_q.front().expect("window is non-empty")],
                    max: scores[*max_q.front().expect("window is non-empty")],
                    mean,
                    sum,
                    median: interpolated_rank(&sorted, 0.5),
                    variance,
                    percentile: interpolated_rank(&sorted, percentile),
                },
            });
        }
    }

    out
}

/// Linear-interpolated order statistic at fractional rank `p * (len - 1)`
/// over an ascending-sorted slice.
fn interpolated_rank(sorted: &[f64], p: f64) -> f64 {
    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (rank - lo as f64) * (sorted[hi] - sorted[lo])
    }
}
