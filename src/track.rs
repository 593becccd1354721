//! Score-track readers: plain vectors and BedGraph-style rows.
//!
//! Large files are memory-mapped and scanned with memchr; small files
//! and stdin go through buffered line reading. Both paths feed the same
//! per-line parser and builder, so validation is identical.

use crate::signal::{ScoreTrack, Segment};
use memchr::memchr;
use memmap2::Mmap;
use rustc_hash::FxHashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// Minimum file size to use mmap (smaller files use buffered I/O)
const MMAP_THRESHOLD: u64 = 64 * 1024;

/// Errors that can occur while reading a score track.
#[derive(Error, Debug)]
pub enum TrackError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid track format: {0}")]
    InvalidFormat(String),
}

pub type Result<T> = std::result::Result<T, TrackError>;

/// Input file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackFormat {
    /// One score per line, a single implicit segment.
    Vector,
    /// Tab-delimited (chrom, start, end, score, ...) rows.
    Bedgraph,
}

impl TrackFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "vector" => Some(TrackFormat::Vector),
            "bedgraph" => Some(TrackFormat::Bedgraph),
            _ => None,
        }
    }

    /// Guess the format from a file extension; vector is the fallback.
    pub fn from_extension(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("bed") | Some("bedgraph") | Some("bdg") => TrackFormat::Bedgraph,
            _ => TrackFormat::Vector,
        }
    }
}

/// Read a newline-delimited score vector into a single-segment track.
/// `bin_size` overrides the implicit 1 nt per bin.
pub fn read_vector<P: AsRef<Path>>(path: P, bin_size: Option<u64>) -> Result<ScoreTrack> {
    let file = File::open(path)?;
    read_vector_from(BufReader::new(file), bin_size)
}

/// Read a score vector from any buffered source (e.g. stdin).
pub fn read_vector_from<R: BufRead>(reader: R, bin_size: Option<u64>) -> Result<ScoreTrack> {
    let mut scores = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let value: f64 = trimmed.parse().map_err(|_| TrackError::Parse {
            line: idx + 1,
            message: format!("non-numeric score: {}", trimmed),
        })?;
        scores.push(value);
    }

    let mut segment = Segment::from_scores(scores);
    segment.bin_size = bin_size.unwrap_or(1);
    Ok(ScoreTrack {
        segments: vec![segment],
        labeled: false,
    })
}

/// Parse a score vector from an in-memory string.
pub fn parse_vector(content: &str, bin_size: Option<u64>) -> Result<ScoreTrack> {
    read_vector_from(content.as_bytes(), bin_size)
}

/// Read a BedGraph-style file into a labeled track. Files at or above
/// the mmap threshold are memory-mapped.
pub fn read_bedgraph<P: AsRef<Path>>(path: P, bin_size: Option<u64>) -> Result<ScoreTrack> {
    let file = File::open(path)?;
    let len = file.metadata()?.len();
    if len >= MMAP_THRESHOLD {
        let mmap = unsafe { Mmap::map(&file)? };
        parse_bedgraph_bytes(&mmap, bin_size)
    } else {
        read_bedgraph_from(BufReader::new(file), bin_size)
    }
}

/// Read BedGraph rows from any buffered source (e.g. stdin).
pub fn read_bedgraph_from<R: BufRead>(reader: R, bin_size: Option<u64>) -> Result<ScoreTrack> {
    let mut builder = TrackBuilder::new(bin_size);
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        builder.push_line(idx + 1, &line)?;
    }
    builder.finish()
}

/// Parse BedGraph rows from an in-memory string.
pub fn parse_bedgraph(content: &str, bin_size: Option<u64>) -> Result<ScoreTrack> {
    read_bedgraph_from(content.as_bytes(), bin_size)
}

/// Byte-slice parse path used for memory-mapped input.
fn parse_bedgraph_bytes(data: &[u8], bin_size: Option<u64>) -> Result<ScoreTrack> {
    let mut builder = TrackBuilder::new(bin_size);
    let mut pos = 0;
    let mut line_no = 0;
    while pos < data.len() {
        let end = match memchr(b'\n', &data[pos..]) {
            Some(off) => pos + off,
            None => data.len(),
        };
        line_no += 1;
        let line = std::str::from_utf8(&data[pos..end]).map_err(|_| TrackError::Parse {
            line: line_no,
            message: "line is not valid UTF-8".to_string(),
        })?;
        builder.push_line(line_no, line)?;
        pos = end + 1;
    }
    builder.finish()
}

/// Accumulates contiguously grouped rows into segments.
struct TrackBuilder {
    forced_bin: Option<u64>,
    segments: Vec<Segment>,
    current: Option<OpenSegment>,
    seen: FxHashSet<String>,
    columns: Option<usize>,
}

struct OpenSegment {
    label: String,
    starts: Vec<u64>,
    ends: Vec<u64>,
    scores: Vec<f64>,
}

impl TrackBuilder {
    fn new(forced_bin: Option<u64>) -> Self {
        Self {
            forced_bin,
            segments: Vec::new(),
            current: None,
            seen: FxHashSet::default(),
            columns: None,
        }
    }

    fn push_line(&mut self, line_no: usize, line: &str) -> Result<()> {
        let line = line.trim_end_matches(['\r', '\n']);
        let trimmed = line.trim();
        if trimmed.is_empty()
            || trimmed.starts_with('#')
            || trimmed.starts_with("track")
            || trimmed.starts_with("browser")
        {
            return Ok(());
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 4 {
            return Err(TrackError::Parse {
                line: line_no,
                message: format!("expected at least 4 fields, got {}", fields.len()),
            });
        }
        match self.columns {
            None => self.columns = Some(fields.len()),
            Some(n) if n != fields.len() => {
                return Err(TrackError::Parse {
                    line: line_no,
                    message: format!("expected {} fields, got {}", n, fields.len()),
                });
            }
            Some(_) => {}
        }

        let chrom = fields[0];
        let start: u64 = fields[1].parse().map_err(|_| TrackError::Parse {
            line: line_no,
            message: format!("invalid start coordinate: {}", fields[1]),
        })?;
        let end: u64 = fields[2].parse().map_err(|_| TrackError::Parse {
            line: line_no,
            message: format!("invalid end coordinate: {}", fields[2]),
        })?;
        if start > end {
            return Err(TrackError::Parse {
                line: line_no,
                message: format!("start ({}) > end ({})", start, end),
            });
        }

        // Score = sum of all remaining columns
        let mut score = 0.0f64;
        for field in &fields[3..] {
            score += field.parse::<f64>().map_err(|_| TrackError::Parse {
                line: line_no,
                message: format!("non-numeric score: {}", field),
            })?;
        }

        self.push_row(line_no, chrom, start, end, score)
    }

    fn push_row(&mut self, line_no: usize, chrom: &str, start: u64, end: u64, score: f64) -> Result<()> {
        let switch = match &self.current {
            Some(open) => open.label != chrom,
            None => true,
        };

        if switch {
            if !self.seen.insert(chrom.to_string()) {
                return Err(TrackError::InvalidFormat(format!(
                    "rows for segment {} are not grouped contiguously (line {})",
                    chrom, line_no
                )));
            }
            self.close_current();
            self.current = Some(OpenSegment {
                label: chrom.to_string(),
                starts: Vec::new(),
                ends: Vec::new(),
                scores: Vec::new(),
            });
        }

        let open = self.current.as_mut().expect("segment was just opened");
        if let Some(&last) = open.starts.last() {
            if start < last {
                return Err(TrackError::Parse {
                    line: line_no,
                    message: format!(
                        "unsorted start within segment {}: {} after {}",
                        chrom, start, last
                    ),
                });
            }
        }
        open.starts.push(start);
        open.ends.push(end);
        open.scores.push(score);
        Ok(())
    }

    fn close_current(&mut self) {
        if let Some(open) = self.current.take() {
            // Bin size: forced, else inferred from the first row's span
            let inferred = open
                .starts
                .first()
                .zip(open.ends.first())
                .map(|(&s, &e)| (e - s).max(1))
                .unwrap_or(1);
            let bin_size = self.forced_bin.unwrap_or(inferred);
            self.segments.push(Segment::from_rows(
                open.label,
                open.starts,
                open.ends,
                open.scores,
                bin_size,
            ));
        }
    }

    fn finish(mut self) -> Result<ScoreTrack> {
        self.close_current();
        Ok(ScoreTrack {
            segments: self.segments,
            labeled: true,
        })
    }
}
