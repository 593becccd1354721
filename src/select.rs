//! Filter orchestration: per-segment strategy runs and result assembly.
//!
//! [`select`] is a pure function of (track, config). Segments are fully
//! independent, so they fan out across the rayon pool with no shared
//! state beyond the final merge.

use crate::candidate::{maxmean_candidates, pq_candidates};
use crate::config::{ConfigError, FilterConfig};
use crate::methods::{sweep_select, wis_select, FilterMethod, WisInterval};
use crate::rolling::{aggregate_windows, AggregateBundle};
use crate::signal::{ScoreTrack, Segment};
use crate::track::TrackError;
use rayon::prelude::*;
use std::fmt;
use thiserror::Error;

/// Errors surfaced by a complete read-filter-write run.
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("input error: {0}")]
    Track(#[from] TrackError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The nine diagnostic columns attached when preserve-cols is set,
/// in output order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionDiagnostics {
    pub original_idx: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub sum: f64,
    pub median: f64,
    pub variance: f64,
    pub percentile: f64,
    pub method_idx: usize,
}

impl RegionDiagnostics {
    fn new(bundle: &AggregateBundle, original_idx: usize, method_idx: usize) -> Self {
        Self {
            original_idx,
            min: bundle.min,
            max: bundle.max,
            mean: bundle.mean,
            sum: bundle.sum,
            median: bundle.median,
            variance: bundle.variance,
            percentile: bundle.percentile,
            method_idx,
        }
    }
}

/// One selected region in nt coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub start: u64,
    pub end: u64,
    pub score: f64,
    pub diagnostics: Option<RegionDiagnostics>,
}

/// A selected region carrying its chromosome name.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentedRegion {
    pub chrom: String,
    pub region: Region,
}

/// Final output rows: plain (Start, Stop, Score) for vector input,
/// segmented (Chromosome, Start, Stop, Score) for bedgraph input.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionSet {
    Plain(Vec<Region>),
    Segmented(Vec<SegmentedRegion>),
}

impl RegionSet {
    pub fn len(&self) -> usize {
        match self {
            RegionSet::Plain(rows) => rows.len(),
            RegionSet::Segmented(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Per-run counters, reported to stderr with `--stats`.
#[derive(Debug, Default, Clone)]
pub struct FilterStats {
    pub segments: usize,
    /// Segments shorter than the window (zero candidates, not an error).
    pub segments_skipped: usize,
    pub candidates: usize,
    pub selections: usize,
}

impl fmt::Display for FilterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Segments: {} ({} skipped), Candidates: {}, Selections: {}",
            self.segments, self.segments_skipped, self.candidates, self.selections
        )
    }
}

/// Result of one filtering run.
#[derive(Debug, Clone)]
pub struct FilterResult {
    pub regions: RegionSet,
    pub stats: FilterStats,
}

/// A selection before assembly, tagged with its segment index.
struct RawSelection {
    segment: usize,
    start: u64,
    end: u64,
    score: f64,
    original_idx: usize,
    method_idx: usize,
    bundle: AggregateBundle,
}

struct SegmentOutcome {
    selections: Vec<RawSelection>,
    candidates: usize,
    skipped: bool,
}

/// Run the configured strategy over every segment of the track.
///
/// Validates the configuration up front, processes segments in parallel,
/// applies the `max_elements` cap (top scores of the unbounded run, ties
/// by ascending segment then start), and emits rows ordered by
/// (segment, start).
pub fn select(track: &ScoreTrack, config: &FilterConfig) -> Result<FilterResult, ConfigError> {
    config.validate()?;

    let outcomes: Vec<SegmentOutcome> = track
        .segments
        .par_iter()
        .enumerate()
        .map(|(idx, segment)| process_segment(idx, segment, config))
        .collect();

    let mut stats = FilterStats {
        segments: track.segments.len(),
        ..Default::default()
    };
    let mut rows: Vec<RawSelection> = Vec::new();
    for outcome in outcomes {
        stats.candidates += outcome.candidates;
        if outcome.skipped {
            stats.segments_skipped += 1;
        }
        rows.extend(outcome.selections);
    }

    if let Some(cap) = config.max_elements {
        if rows.len() > cap {
            rows.sort_by(|a, b| {
                b.score
                    .total_cmp(&a.score)
                    .then(a.segment.cmp(&b.segment))
                    .then(a.start.cmp(&b.start))
            });
            rows.truncate(cap);
        }
    }
    rows.sort_by(|a, b| a.segment.cmp(&b.segment).then(a.start.cmp(&b.start)));
    stats.selections = rows.len();

    let preserve = config.preserve_cols;
    let regions = if track.labeled {
        RegionSet::Segmented(
            rows.into_iter()
                .map(|row| SegmentedRegion {
                    chrom: track.segments[row.segment]
                        .label()
                        .unwrap_or_default()
                        .to_string(),
                    region: to_region(row, preserve),
                })
                .collect(),
        )
    } else {
        RegionSet::Plain(rows.into_iter().map(|row| to_region(row, preserve)).collect())
    };

    Ok(FilterResult { regions, stats })
}

fn to_region(row: RawSelection, preserve: bool) -> Region {
    let diagnostics = preserve
        .then(|| RegionDiagnostics::new(&row.bundle, row.original_idx, row.method_idx));
    Region {
        start: row.start,
        end: row.end,
        score: row.score,
        diagnostics,
    }
}

fn process_segment(seg_idx: usize, segment: &Segment, config: &FilterConfig) -> SegmentOutcome {
    match config.method {
        FilterMethod::Pq | FilterMethod::MaxMean => sweep_segment(seg_idx, segment, config),
        FilterMethod::Wis => wis_segment(seg_idx, segment, config),
    }
}

fn sweep_segment(seg_idx: usize, segment: &Segment, config: &FilterConfig) -> SegmentOutcome {
    let w = config.window_bins;
    if segment.len() < w {
        return SegmentOutcome {
            selections: Vec::new(),
            candidates: 0,
            skipped: true,
        };
    }

    let aggregates = aggregate_windows(&segment.scores, w, config.percentile);
    let candidates = match config.method {
        FilterMethod::Pq => pq_candidates(&segment.scores, &aggregates, w, config.aggregation),
        FilterMethod::MaxMean => maxmean_candidates(&aggregates, w, config.aggregation),
        FilterMethod::Wis => unreachable!("wis does not sweep"),
    };
    let total = candidates.len();

    let exclusion_total = config.exclusion_total(segment.bin_size);
    let picked = sweep_select(candidates, segment, w, exclusion_total);

    let selections = picked
        .into_iter()
        .map(|cand| {
            let (start, end) = segment.window_range(cand.start, w);
            RawSelection {
                segment: seg_idx,
                start,
                end,
                score: cand.score,
                original_idx: cand.original_idx,
                method_idx: cand.method_idx,
                bundle: cand.bundle,
            }
        })
        .collect();

    SegmentOutcome {
        selections,
        candidates: total,
        skipped: false,
    }
}

fn wis_segment(seg_idx: usize, segment: &Segment, config: &FilterConfig) -> SegmentOutcome {
    let rows: Vec<WisInterval> = (0..segment.len())
        .map(|i| WisInterval {
            start: segment.bin_start(i),
            end: segment.bin_end(i),
            weight: segment.scores[i],
            row_idx: i,
        })
        .collect();
    let total = rows.len();

    let selections = wis_select(rows, config.exclusion_size)
        .into_iter()
        .map(|pick| RawSelection {
            segment: seg_idx,
            start: pick.start,
            end: pick.end,
            score: pick.weight,
            original_idx: pick.row_idx,
            method_idx: pick.sorted_idx,
            bundle: AggregateBundle::degenerate(pick.weight),
        })
        .collect();

    SegmentOutcome {
        selections,
        candidates: total,
        skipped: false,
    }
}
