//! End-to-end filtering scenarios and invariants.
//!
//! Covers:
//! 1. Reference scenarios for MaxMean and WIS
//! 2. Non-overlap and window-length invariants on noisy input
//! 3. max_elements cap semantics
//! 4. Percentile/median consistency
//! 5. Degenerate inputs

use reef_regions::generate::{GenerateCommand, GenerateConfig};
use reef_regions::output::write_regions;
use reef_regions::prelude::*;
use reef_regions::track::parse_bedgraph;

fn plain_rows(result: &FilterResult) -> Vec<(u64, u64, f64)> {
    match &result.regions {
        RegionSet::Plain(rows) => rows.iter().map(|r| (r.start, r.end, r.score)).collect(),
        RegionSet::Segmented(_) => panic!("expected plain rows"),
    }
}

fn segmented_rows(result: &FilterResult) -> Vec<(String, u64, u64, f64)> {
    match &result.regions {
        RegionSet::Segmented(rows) => rows
            .iter()
            .map(|r| (r.chrom.clone(), r.region.start, r.region.end, r.region.score))
            .collect(),
        RegionSet::Plain(_) => panic!("expected segmented rows"),
    }
}

#[test]
fn maxmean_two_peak_scenario() {
    let track = ScoreTrack::from_scores(vec![1.0, 5.0, 1.0, 1.0, 9.0, 1.0]);
    let config = FilterConfig::new(FilterMethod::MaxMean)
        .with_window_bins(2)
        .with_exclusion_size(0);

    let result = select(&track, &config).unwrap();
    assert_eq!(plain_rows(&result), vec![(0, 2, 5.0), (3, 5, 9.0)]);
}

#[test]
fn wis_prefers_two_light_intervals_over_one_heavy() {
    let content = "chr1\t0\t3\t5.0\nchr1\t2\t5\t6.0\nchr1\t5\t8\t5.0\n";
    let track = parse_bedgraph(content, None).unwrap();
    let config = FilterConfig::new(FilterMethod::Wis).with_exclusion_size(0);

    let result = select(&track, &config).unwrap();
    let rows = segmented_rows(&result);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].1, 0);
    assert_eq!(rows[1].1, 5);
    let total: f64 = rows.iter().map(|r| r.3).sum();
    assert_eq!(total, 10.0);
}

#[test]
fn sweep_selections_respect_exclusion_distance() {
    // Noisy synthetic track; verify the invariant rather than exact picks
    let generated = {
        let mut out = Vec::new();
        GenerateCommand::new(GenerateConfig {
            chromosomes: 2,
            bins: 2000,
            bin_size: 100,
            peaks: 40,
            peak_height: 30.0,
            peak_width: 4,
            noise: 2.0,
            seed: 11,
        })
        .run(&mut out)
        .unwrap();
        String::from_utf8(out).unwrap()
    };
    let track = parse_bedgraph(&generated, None).unwrap();

    for method in [FilterMethod::Pq, FilterMethod::MaxMean] {
        let config = FilterConfig::new(method)
            .with_window_bins(5)
            .with_exclusion_size(300);
        let exclusion_total = config.exclusion_total(100);
        let result = select(&track, &config).unwrap();

        let rows = segmented_rows(&result);
        assert!(!rows.is_empty(), "{} found no regions", method);
        for pair in rows.windows(2) {
            let (ref chrom_a, start_a, end_a, _) = pair[0];
            let (ref chrom_b, start_b, end_b, _) = pair[1];
            // Window length invariant: 5 bins x 100 nt
            assert_eq!(end_a - start_a, 500);
            assert_eq!(end_b - start_b, 500);
            if chrom_a == chrom_b {
                assert!(
                    start_b - start_a >= exclusion_total,
                    "{}: starts {} and {} closer than {}",
                    method,
                    start_a,
                    start_b,
                    exclusion_total
                );
            }
        }
    }
}

#[test]
fn cap_keeps_exactly_the_top_scores_of_the_unbounded_run() {
    let generated = {
        let mut out = Vec::new();
        GenerateCommand::new(GenerateConfig {
            chromosomes: 1,
            bins: 1500,
            bin_size: 100,
            peaks: 30,
            peak_height: 25.0,
            peak_width: 3,
            noise: 1.0,
            seed: 3,
        })
        .run(&mut out)
        .unwrap();
        String::from_utf8(out).unwrap()
    };
    let track = parse_bedgraph(&generated, None).unwrap();

    let unbounded = FilterConfig::new(FilterMethod::MaxMean)
        .with_window_bins(3)
        .with_exclusion_size(200);
    let capped = unbounded.clone().with_max_elements(5);

    let full = segmented_rows(&select(&track, &unbounded).unwrap());
    let kept = segmented_rows(&select(&track, &capped).unwrap());

    assert!(full.len() > 5);
    assert_eq!(kept.len(), 5);

    // The kept rows are the 5 best scores of the unbounded run
    let mut best: Vec<f64> = full.iter().map(|r| r.3).collect();
    best.sort_by(|a, b| b.partial_cmp(a).unwrap());
    let mut kept_scores: Vec<f64> = kept.iter().map(|r| r.3).collect();
    kept_scores.sort_by(|a, b| b.partial_cmp(a).unwrap());
    assert_eq!(kept_scores, best[..5].to_vec());

    // And they come back in (segment, start) order
    for pair in kept.windows(2) {
        assert!(pair[0].1 < pair[1].1);
    }
}

#[test]
fn percentile_half_reports_median_scores() {
    let content = "chr1\t0\t100\t2.0\nchr1\t100\t200\t7.0\nchr1\t200\t300\t1.0\n\
                   chr1\t300\t400\t8.0\nchr1\t400\t500\t2.0\nchr1\t500\t600\t8.0\n";
    let track = parse_bedgraph(content, None).unwrap();

    let median = FilterConfig::new(FilterMethod::Pq)
        .with_window_bins(2)
        .with_exclusion_size(0)
        .with_aggregation(AggregationMethod::Median);
    let pctl = median
        .clone()
        .with_aggregation(AggregationMethod::Percentile)
        .with_percentile(0.5);

    let a = segmented_rows(&select(&track, &median).unwrap());
    let b = segmented_rows(&select(&track, &pctl).unwrap());
    assert_eq!(a, b);
    assert!(!a.is_empty());
}

#[test]
fn segments_shorter_than_window_are_skipped() {
    let content = "chr1\t0\t100\t5.0\nchr2\t0\t100\t1.0\nchr2\t100\t200\t9.0\nchr2\t200\t300\t1.0\n";
    let track = parse_bedgraph(content, None).unwrap();
    let config = FilterConfig::new(FilterMethod::Pq)
        .with_window_bins(3)
        .with_exclusion_size(0);

    let result = select(&track, &config).unwrap();
    assert_eq!(result.stats.segments_skipped, 1);
    let rows = segmented_rows(&result);
    assert!(rows.iter().all(|r| r.0 == "chr2"));
}

#[test]
fn empty_input_produces_empty_result() {
    let track = parse_bedgraph("", None).unwrap();
    let result = select(&track, &FilterConfig::new(FilterMethod::Wis)).unwrap();
    assert!(result.regions.is_empty());
}

#[test]
fn preserve_cols_roundtrip_through_writer() {
    let content = "chr1\t0\t100\t1.0\nchr1\t100\t200\t9.0\nchr1\t200\t300\t1.0\n";
    let track = parse_bedgraph(content, None).unwrap();
    let config = FilterConfig::new(FilterMethod::MaxMean)
        .with_window_bins(3)
        .with_exclusion_size(0)
        .with_preserve_cols(true);

    let result = select(&track, &config).unwrap();
    let mut out = Vec::new();
    write_regions(&result.regions, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    let fields: Vec<&str> = text.trim_end().split('\t').collect();
    // Chromosome, Start, Stop, Score + 9 diagnostic columns
    assert_eq!(fields.len(), 13);
    assert_eq!(fields[0], "chr1");
    assert_eq!(fields[3], "9.0"); // Score = rolling max
    assert_eq!(fields[4], "1"); // OriginalIdx = center bin
    assert_eq!(fields[6], "9.0"); // RollingMax
    assert_eq!(fields[12], "0"); // MethodIdx
}

#[test]
fn invalid_percentile_is_fatal_before_processing() {
    let track = ScoreTrack::from_scores(vec![1.0; 10]);
    let config = FilterConfig::new(FilterMethod::Pq).with_percentile(2.0);
    assert!(matches!(
        select(&track, &config),
        Err(ConfigError::PercentileOutOfRange(_))
    ));
}
