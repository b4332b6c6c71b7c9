//! Gene presence, coverage and indel extraction.
//!
//! For each interval in a BED-like file, this step collects indels from a
//! VCF, counts covered positions from a per-position coverage table, and
//! writes a `<prefix>_<gene>.info` file whose first line is the payload the
//! report recognizers read after the `Found in <gene>:` prefix:
//! `Gene is present;<covered>/<length>;<indel mapping literal>`.
//!
//! Malformed rows in any of the three inputs are fatal: a producer must
//! halt rather than emit a report no downstream record can be built from.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::error::CdiffError;
use crate::literal::format_indel_map;

/// A gene is called present when covered/length exceeds this fraction.
const PRESENCE_THRESHOLD: f64 = 0.9;

/// One interval from the BED-like file: `<ref> <start> <end> <gene>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BedInterval {
    pub reference: String,
    pub start: u64,
    pub end: u64,
    pub gene: String,
}

impl BedInterval {
    /// Interval length as reported in the coverage fraction.
    pub fn length(&self) -> u64 {
        self.end - self.start
    }
}

/// Read all intervals from a BED-like file.
pub fn read_intervals(path: &Path) -> Result<Vec<BedInterval>, CdiffError> {
    let display = path.display().to_string();
    let file = File::open(path).map_err(|e| CdiffError::io(display.as_str(), e))?;
    let mut intervals = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| CdiffError::io(display.as_str(), e))?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        let malformed = || CdiffError::malformed("interval", display.as_str(), line.as_str());
        if fields.len() < 4 {
            return Err(malformed());
        }
        intervals.push(BedInterval {
            reference: fields[0].to_string(),
            start: fields[1].parse().map_err(|_| malformed())?,
            end: fields[2].parse().map_err(|_| malformed())?,
            gene: fields[3].to_string(),
        });
    }
    Ok(intervals)
}

/// Collect indels whose position falls inside `[start, end]`, in file order.
/// A repeated position overwrites the earlier pair in place.
pub fn indels_in_region(
    vcf: &Path,
    start: u64,
    end: u64,
) -> Result<Vec<(u64, (String, String))>, CdiffError> {
    let display = vcf.display().to_string();
    let file = File::open(vcf).map_err(|e| CdiffError::io(display.as_str(), e))?;
    let mut indels: Vec<(u64, (String, String))> = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| CdiffError::io(display.as_str(), e))?;
        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        let malformed = || CdiffError::malformed("VCF", display.as_str(), line.as_str());
        if fields.len() < 10 {
            return Err(malformed());
        }
        let pos: u64 = fields[1].parse().map_err(|_| malformed())?;
        if pos < start || pos > end {
            continue;
        }
        let pair = (fields[3].to_string(), fields[4].to_string());
        match indels.iter_mut().find(|(p, _)| *p == pos) {
            Some(entry) => entry.1 = pair,
            None => indels.push((pos, pair)),
        }
    }
    Ok(indels)
}

/// Count covered positions (`start < pos <= end` with non-zero depth) in the
/// per-position coverage table, returning the count and the in-range rows
/// with zero depth. The table is position-sorted; the scan stops past `end`.
pub fn gene_coverage(
    coverage: &Path,
    start: u64,
    end: u64,
) -> Result<(u64, Vec<String>), CdiffError> {
    let display = coverage.display().to_string();
    let file = File::open(coverage).map_err(|e| CdiffError::io(display.as_str(), e))?;
    let mut covered = 0u64;
    let mut uncovered = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| CdiffError::io(display.as_str(), e))?;
        if line.starts_with("Locus") || line.trim().is_empty() {
            continue;
        }
        let malformed = || CdiffError::malformed("coverage", display.as_str(), line.as_str());
        let mut fields = line.split(',');
        let locus = fields.next().ok_or_else(malformed)?;
        let pos: u64 = locus
            .split(':')
            .nth(1)
            .and_then(|p| p.parse().ok())
            .ok_or_else(malformed)?;
        let total_depth: u64 = fields
            .next()
            .and_then(|d| d.parse().ok())
            .ok_or_else(malformed)?;
        if pos > end {
            break;
        }
        if pos > start {
            if total_depth != 0 {
                covered += 1;
            } else {
                uncovered.push(line);
            }
        }
    }
    Ok((covered, uncovered))
}

/// Write one gene-info file: the presence/coverage/indel payload line, then
/// any zero-coverage rows verbatim.
pub fn write_gene_info(
    path: &Path,
    covered: u64,
    length: u64,
    indels: &[(u64, (String, String))],
    uncovered: &[String],
) -> Result<(), CdiffError> {
    let display = path.display().to_string();
    let mut out = File::create(path).map_err(|e| CdiffError::io(display.as_str(), e))?;
    let present = if covered as f64 / length as f64 > PRESENCE_THRESHOLD {
        "Gene is present"
    } else {
        "Gene is not present"
    };
    writeln!(
        out,
        "{};{}/{};{}",
        present,
        covered,
        length,
        format_indel_map(indels)
    )
    .map_err(|e| CdiffError::io(display.as_str(), e))?;
    for row in uncovered {
        writeln!(out, "{}", row).map_err(|e| CdiffError::io(display.as_str(), e))?;
    }
    Ok(())
}

/// Run the extraction for every interval, writing `<prefix>_<gene>.info`.
pub fn extract_genes(
    vcf: &Path,
    coverage: &Path,
    bed: &Path,
    output_prefix: &str,
) -> Result<(), CdiffError> {
    for interval in read_intervals(bed)? {
        let indels = indels_in_region(vcf, interval.start, interval.end)?;
        let (covered, uncovered) = gene_coverage(coverage, interval.start, interval.end)?;
        let info_path = format!("{}_{}.info", output_prefix, interval.gene);
        log::info!(
            "{}: {}/{} covered, {} indels -> {}",
            interval.gene,
            covered,
            interval.length(),
            indels.len(),
            info_path
        );
        write_gene_info(
            Path::new(&info_path),
            covered,
            interval.length(),
            &indels,
            &uncovered,
        )?;
    }
    Ok(())
}
