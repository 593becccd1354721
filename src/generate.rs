//! Generate synthetic score tracks for benchmarking.
//!
//! Produces BedGraph-style tracks: low uniform background noise with a
//! configurable number of spiked peaks per chromosome. Deterministic for
//! a given seed, so benchmark inputs are reproducible.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::io::{self, Write};
use std::time::Instant;

/// Configuration for the generate command.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Number of chromosomes (chr1, chr2, ...).
    pub chromosomes: usize,
    /// Bins per chromosome.
    pub bins: usize,
    /// Physical bin size in nt.
    pub bin_size: u64,
    /// Peaks spiked into each chromosome.
    pub peaks: usize,
    /// Peak height added at the peak center, decaying linearly over
    /// `peak_width` bins on each side.
    pub peak_height: f64,
    /// Half-width of each peak in bins.
    pub peak_width: usize,
    /// Upper bound of the uniform background noise.
    pub noise: f64,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            chromosomes: 2,
            bins: 10_000,
            bin_size: 200,
            peaks: 20,
            peak_height: 50.0,
            peak_width: 3,
            noise: 1.0,
            seed: 42,
        }
    }
}

/// Statistics from generate operation.
#[derive(Debug, Default, Clone)]
pub struct GenerateStats {
    pub rows: u64,
    pub segments: usize,
    pub elapsed_secs: f64,
}

impl fmt::Display for GenerateStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows across {} segments ({:.1}s)",
            self.rows, self.segments, self.elapsed_secs
        )
    }
}

/// Generate command.
pub struct GenerateCommand {
    config: GenerateConfig,
}

impl GenerateCommand {
    pub fn new(config: GenerateConfig) -> Self {
        Self { config }
    }

    /// Write the synthetic track to the given writer.
    pub fn run<W: Write>(&self, out: &mut W) -> io::Result<GenerateStats> {
        let start = Instant::now();
        let mut stats = GenerateStats {
            segments: self.config.chromosomes,
            ..Default::default()
        };

        let mut int_buf = itoa::Buffer::new();
        let mut float_buf = ryu::Buffer::new();

        for chrom_idx in 0..self.config.chromosomes {
            // Per-chromosome stream so chromosome count does not change
            // earlier chromosomes' data
            let mut rng = SmallRng::seed_from_u64(self.config.seed.wrapping_add(chrom_idx as u64));
            let scores = self.chromosome_scores(&mut rng);
            let name = format!("chr{}", chrom_idx + 1);

            for (bin, score) in scores.iter().enumerate() {
                let pos = bin as u64 * self.config.bin_size;
                out.write_all(name.as_bytes())?;
                out.write_all(b"\t")?;
                out.write_all(int_buf.format(pos).as_bytes())?;
                out.write_all(b"\t")?;
                out.write_all(int_buf.format(pos + self.config.bin_size).as_bytes())?;
                out.write_all(b"\t")?;
                out.write_all(float_buf.format(*score).as_bytes())?;
                out.write_all(b"\n")?;
                stats.rows += 1;
            }
        }

        stats.elapsed_secs = start.elapsed().as_secs_f64();
        Ok(stats)
    }

    /// Background noise plus linearly decaying spikes.
    fn chromosome_scores(&self, rng: &mut SmallRng) -> Vec<f64> {
        let n = self.config.bins;
        let mut scores: Vec<f64> = (0..n).map(|_| rng.gen_range(0.0..self.config.noise)).collect();

        for _ in 0..self.config.peaks {
            let center = rng.gen_range(0..n);
            let height = self.config.peak_height * rng.gen_range(0.5..1.0);
            let width = self.config.peak_width.max(1);
            for offset in 0..=width {
                let decay = 1.0 - offset as f64 / (width + 1) as f64;
                if center >= offset {
                    scores[center - offset] += height * decay;
                }
                if center + offset < n {
                    scores[center + offset] += height * decay;
                }
            }
        }

        scores
    }
}
