//! REEF: Region Exclusion and Extraction Filter
//!
//! Usage: reef <COMMAND> [OPTIONS]

use clap::{Parser, Subcommand};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use reef_regions::config::ConfigError;
use reef_regions::generate::{GenerateCommand, GenerateConfig};
use reef_regions::output::{write_regions, write_regions_to_path};
use reef_regions::select::{select, FilterError};
use reef_regions::track::{self, TrackError, TrackFormat};
use reef_regions::{AggregationMethod, FilterConfig, FilterMethod, ScoreTrack};

#[derive(Parser)]
#[command(name = "reef")]
#[command(version)]
#[command(
    about = "REEF: Region Exclusion and Extraction Filter - selects high-scoring, non-overlapping regions from genomic score tracks",
    long_about = None
)]
struct Cli {
    /// Number of threads to use (default: number of CPUs)
    #[arg(long, short = 't', global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter a score track down to non-overlapping high-scoring regions
    Filter {
        /// Filter method (pq|wis|maxmean)
        #[arg(short, long)]
        method: String,

        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format (vector|bedgraph); inferred from the file
        /// extension when omitted
        #[arg(short, long)]
        format: Option<String>,

        /// Window length that excludes overlap (bins)
        #[arg(short, long, default_value = "125")]
        window_bins: usize,

        /// Bin size in nt (default: inferred from input spacing)
        #[arg(short, long)]
        bin_size: Option<u64>,

        /// Exclusion size enforced between selections (nt)
        #[arg(short = 'x', long, default_value = "24800")]
        exclusion_size: u64,

        /// Statistic reported as each region's score
        /// (min|max|mean|sum|median|variance|percentile)
        #[arg(short, long, default_value = "max")]
        aggregation: String,

        /// Percentile rank in (0, 1], used with '-a percentile'
        #[arg(short = 'c', long, default_value = "0.95")]
        percentile: f64,

        /// Maximum number of reported regions (default: unbounded)
        #[arg(short = 'n', long)]
        max_elements: Option<usize>,

        /// Keep diagnostic columns in the output
        #[arg(short, long)]
        preserve_cols: bool,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print run statistics to stderr
        #[arg(long)]
        stats: bool,

        /// Suppress progress messages
        #[arg(short, long)]
        quiet: bool,
    },

    /// Generate a synthetic score track for benchmarking
    Generate {
        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of chromosomes
        #[arg(long, default_value = "2")]
        chromosomes: usize,

        /// Bins per chromosome
        #[arg(long, default_value = "10000")]
        bins: usize,

        /// Bin size in nt
        #[arg(short, long, default_value = "200")]
        bin_size: u64,

        /// Peaks spiked into each chromosome
        #[arg(long, default_value = "20")]
        peaks: usize,

        /// Peak height at the peak center
        #[arg(long, default_value = "50.0")]
        peak_height: f64,

        /// Peak half-width in bins
        #[arg(long, default_value = "3")]
        peak_width: usize,

        /// Upper bound of the uniform background noise
        #[arg(long, default_value = "1.0")]
        noise: f64,

        /// RNG seed for reproducibility
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },
}

fn main() {
    let cli = Cli::parse();

    // Configure thread pool if --threads specified
    if let Some(n) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .expect("Failed to initialize thread pool");
    }

    let result = match cli.command {
        Commands::Filter {
            method,
            input,
            format,
            window_bins,
            bin_size,
            exclusion_size,
            aggregation,
            percentile,
            max_elements,
            preserve_cols,
            output,
            stats,
            quiet,
        } => run_filter(
            method,
            input,
            format,
            window_bins,
            bin_size,
            exclusion_size,
            aggregation,
            percentile,
            max_elements,
            preserve_cols,
            output,
            stats,
            quiet,
        ),

        Commands::Generate {
            output,
            chromosomes,
            bins,
            bin_size,
            peaks,
            peak_height,
            peak_width,
            noise,
            seed,
        } => run_generate(
            output,
            chromosomes,
            bins,
            bin_size,
            peaks,
            peak_height,
            peak_width,
            noise,
            seed,
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run_filter(
    method: String,
    input: PathBuf,
    format: Option<String>,
    window_bins: usize,
    bin_size: Option<u64>,
    exclusion_size: u64,
    aggregation: String,
    percentile: f64,
    max_elements: Option<usize>,
    preserve_cols: bool,
    output: Option<PathBuf>,
    stats: bool,
    quiet: bool,
) -> Result<(), FilterError> {
    let method =
        FilterMethod::parse(&method).ok_or_else(|| ConfigError::UnknownMethod(method.clone()))?;
    let aggregation = AggregationMethod::parse(&aggregation)
        .ok_or_else(|| ConfigError::UnknownAggregation(aggregation.clone()))?;

    let mut config = FilterConfig::new(method)
        .with_window_bins(window_bins)
        .with_exclusion_size(exclusion_size)
        .with_aggregation(aggregation)
        .with_percentile(percentile)
        .with_preserve_cols(preserve_cols);
    if let Some(b) = bin_size {
        config = config.with_bin_size(b);
    }
    if let Some(n) = max_elements {
        config = config.with_max_elements(n);
    }
    // Reject bad configuration before touching the input
    config.validate()?;

    let format = match format {
        Some(name) => TrackFormat::parse(&name).ok_or_else(|| {
            TrackError::InvalidFormat(format!("unknown input format: {}", name))
        })?,
        None => TrackFormat::from_extension(&input),
    };

    if !quiet {
        eprintln!("reef filter: reading input...");
    }
    let track = read_track(&input, format, config.bin_size)?;

    if !quiet {
        eprintln!("reef filter: filtering with {} method...", method);
    }
    let start = Instant::now();
    let result = select(&track, &config)?;
    if !quiet {
        eprintln!(
            "reef filter: method completed in {:.2}s, found {} regions",
            start.elapsed().as_secs_f64(),
            result.regions.len()
        );
    }
    if stats {
        eprintln!("Filter stats: {}", result.stats);
    }

    match output {
        Some(path) => write_regions_to_path(&result.regions, path)?,
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_regions(&result.regions, &mut handle)?;
            handle.flush()?;
        }
    }

    Ok(())
}

fn read_track(
    input: &PathBuf,
    format: TrackFormat,
    bin_size: Option<u64>,
) -> Result<ScoreTrack, TrackError> {
    if input.to_string_lossy() == "-" {
        let stdin = io::stdin();
        let handle = stdin.lock();
        match format {
            TrackFormat::Vector => track::read_vector_from(handle, bin_size),
            TrackFormat::Bedgraph => track::read_bedgraph_from(handle, bin_size),
        }
    } else {
        match format {
            TrackFormat::Vector => track::read_vector(input, bin_size),
            TrackFormat::Bedgraph => track::read_bedgraph(input, bin_size),
        }
    }
}

fn run_generate(
    output: Option<PathBuf>,
    chromosomes: usize,
    bins: usize,
    bin_size: u64,
    peaks: usize,
    peak_height: f64,
    peak_width: usize,
    noise: f64,
    seed: u64,
) -> Result<(), FilterError> {
    let cmd = GenerateCommand::new(GenerateConfig {
        chromosomes,
        bins,
        bin_size,
        peaks,
        peak_height,
        peak_width,
        noise,
        seed,
    });

    let stats = match output {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            let mut writer = BufWriter::new(file);
            let stats = cmd.run(&mut writer)?;
            writer.flush()?;
            stats
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            let stats = cmd.run(&mut handle)?;
            handle.flush()?;
            stats
        }
    };

    eprintln!("Generated: {}", stats);
    Ok(())
}
