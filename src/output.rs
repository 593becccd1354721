//! Tabular output for selected regions.
//!
//! Plain rows: Start, Stop, Score. Segmented rows: Chromosome, Start,
//! Stop, Score. With preserve-cols, nine diagnostic columns follow in
//! fixed order: OriginalIdx, RollingMin, RollingMax, RollingMean,
//! RollingSum, RollingMedian, RollingVariance, RollingPercentile,
//! MethodIdx.

use crate::select::{Region, RegionSet};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Buffer size for file output (256KB for better throughput)
const BUF_SIZE: usize = 256 * 1024;

/// Write all rows of a region set, tab-delimited, one region per line.
pub fn write_regions<W: Write>(regions: &RegionSet, out: &mut W) -> io::Result<()> {
    let mut int_buf = itoa::Buffer::new();
    let mut float_buf = ryu::Buffer::new();

    match regions {
        RegionSet::Plain(rows) => {
            for region in rows {
                write_region(out, None, region, &mut int_buf, &mut float_buf)?;
            }
        }
        RegionSet::Segmented(rows) => {
            for row in rows {
                write_region(out, Some(&row.chrom), &row.region, &mut int_buf, &mut float_buf)?;
            }
        }
    }
    Ok(())
}

/// Write a region set to a file path.
pub fn write_regions_to_path<P: AsRef<Path>>(regions: &RegionSet, path: P) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::with_capacity(BUF_SIZE, file);
    write_regions(regions, &mut writer)?;
    writer.flush()
}

fn write_region<W: Write>(
    out: &mut W,
    chrom: Option<&str>,
    region: &Region,
    int_buf: &mut itoa::Buffer,
    float_buf: &mut ryu::Buffer,
) -> io::Result<()> {
    if let Some(chrom) = chrom {
        out.write_all(chrom.as_bytes())?;
        out.write_all(b"\t")?;
    }
    out.write_all(int_buf.format(region.start).as_bytes())?;
    out.write_all(b"\t")?;
    out.write_all(int_buf.format(region.end).as_bytes())?;
    out.write_all(b"\t")?;
    out.write_all(float_buf.format(region.score).as_bytes())?;

    if let Some(diag) = &region.diagnostics {
        out.write_all(b"\t")?;
        out.write_all(int_buf.format(diag.original_idx).as_bytes())?;
        for value in [
            diag.min,
            diag.max,
            diag.mean,
            diag.sum,
            diag.median,
            diag.variance,
            diag.percentile,
        ] {
            out.write_all(b"\t")?;
            out.write_all(float_buf.format(value).as_bytes())?;
        }
        out.write_all(b"\t")?;
        out.write_all(int_buf.format(diag.method_idx).as_bytes())?;
    }

    out.write_all(b"\n")
}
