//! Optimality checks for the weighted interval scheduling strategy.
//!
//! The DP result is compared against a brute-force search over all
//! subsets of small random interval sets. Any subset whose pairwise
//! gaps satisfy the exclusion is admissible; the DP must match the
//! best admissible total weight exactly.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use reef_regions::methods::wis::{wis_select, WisInterval};

fn compatible(a: &WisInterval, b: &WisInterval, exclusion: u64) -> bool {
    let (first, second) = if a.end <= b.end { (a, b) } else { (b, a) };
    second.start >= first.end && second.start - first.end >= exclusion
}

/// Best total weight over all admissible subsets, by exhaustive search.
fn brute_force(rows: &[WisInterval], exclusion: u64) -> f64 {
    let n = rows.len();
    assert!(n <= 16, "exhaustive search only meant for small sets");
    let mut best = 0.0f64;
    for mask in 0u32..(1 << n) {
        let chosen: Vec<&WisInterval> = (0..n)
            .filter(|&i| mask & (1 << i) != 0)
            .map(|i| &rows[i])
            .collect();
        let ok = chosen
            .iter()
            .enumerate()
            .all(|(i, a)| chosen[i + 1..].iter().all(|b| compatible(a, b, exclusion)));
        if ok {
            let total: f64 = chosen.iter().map(|r| r.weight).sum();
            if total > best {
                best = total;
            }
        }
    }
    best
}

fn random_rows(rng: &mut SmallRng, count: usize) -> Vec<WisInterval> {
    (0..count)
        .map(|row_idx| {
            let start = rng.gen_range(0..500u64);
            let len = rng.gen_range(1..80u64);
            WisInterval {
                start,
                end: start + len,
                // Integer weights sidestep float-sum ordering effects in
                // the brute-force comparison
                weight: rng.gen_range(1..100) as f64,
                row_idx,
            }
        })
        .collect()
}

#[test]
fn dp_matches_exhaustive_search_no_exclusion() {
    let mut rng = SmallRng::seed_from_u64(1);
    for trial in 0..200 {
        let rows = random_rows(&mut rng, 10);
        let expected = brute_force(&rows, 0);
        let total: f64 = wis_select(rows, 0).iter().map(|p| p.weight).sum();
        assert_eq!(total, expected, "trial {}", trial);
    }
}

#[test]
fn dp_matches_exhaustive_search_with_exclusion() {
    let mut rng = SmallRng::seed_from_u64(2);
    for trial in 0..200 {
        let rows = random_rows(&mut rng, 12);
        for exclusion in [1, 25, 100] {
            let expected = brute_force(&rows, exclusion);
            let total: f64 = wis_select(rows.clone(), exclusion)
                .iter()
                .map(|p| p.weight)
                .sum();
            assert_eq!(total, expected, "trial {} exclusion {}", trial, exclusion);
        }
    }
}

#[test]
fn picks_are_admissible_and_ordered() {
    let mut rng = SmallRng::seed_from_u64(3);
    for _ in 0..50 {
        let rows = random_rows(&mut rng, 12);
        let picks = wis_select(rows, 40);
        for pair in picks.windows(2) {
            assert!(pair[0].end <= pair[1].start);
            assert!(pair[1].start - pair[0].end >= 40);
        }
    }
}

#[test]
fn large_exclusion_forces_single_pick() {
    let mut rng = SmallRng::seed_from_u64(4);
    let rows = random_rows(&mut rng, 12);
    let heaviest = rows
        .iter()
        .map(|r| r.weight)
        .fold(f64::MIN, f64::max);
    // Every row fits in [0, 580); a 1000 nt gap is unsatisfiable
    let picks = wis_select(rows, 1000);
    assert_eq!(picks.len(), 1);
    assert_eq!(picks[0].weight, heaviest);
}
