//! Batch summary: concatenate per-sample CSV files keeping one header.
//!
//! The input directory holds one subdirectory per sample; every CSV found
//! is appended to `<output_dir>/<basename(input_dir)>.csv`. Exactly one
//! header line ends up in the output no matter how many files contribute
//! rows; an output file that already exists is assumed to carry its header.

use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::CdiffError;

/// Subdirectories of `path`, sorted for deterministic concatenation order.
fn subdirectories(path: &Path) -> Result<Vec<PathBuf>, CdiffError> {
    let display = path.display().to_string();
    let mut dirs = Vec::new();
    for entry in fs::read_dir(path).map_err(|e| CdiffError::io(display.as_str(), e))? {
        let entry = entry.map_err(|e| CdiffError::io(display.as_str(), e))?;
        if entry.path().is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// CSV files directly inside `path`, sorted.
fn csv_files(path: &Path) -> Result<Vec<PathBuf>, CdiffError> {
    let display = path.display().to_string();
    let mut files = Vec::new();
    for entry in fs::read_dir(path).map_err(|e| CdiffError::io(display.as_str(), e))? {
        let entry = entry.map_err(|e| CdiffError::io(display.as_str(), e))?;
        let entry_path = entry.path();
        if entry_path.is_file() && entry_path.extension().is_some_and(|ext| ext == "csv") {
            files.push(entry_path);
        }
    }
    files.sort();
    Ok(files)
}

/// Concatenate every per-sample CSV under `input_dir` into one summary file
/// under `output_dir`, keeping exactly one header line total.
pub fn summarize(input_dir: &Path, output_dir: &Path) -> Result<(), CdiffError> {
    let out_display = output_dir.display().to_string();
    fs::create_dir_all(output_dir).map_err(|e| CdiffError::io(out_display.as_str(), e))?;

    let base = input_dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let out_path = output_dir.join(format!("{}.csv", base));
    let mut wrote_header = out_path.exists();

    let out_display = out_path.display().to_string();
    let mut out = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&out_path)
        .map_err(|e| CdiffError::io(out_display.as_str(), e))?;

    for sample_dir in subdirectories(input_dir)? {
        for file in csv_files(&sample_dir)? {
            log::info!("appending {}", file.display());
            let display = file.display().to_string();
            let handle =
                fs::File::open(&file).map_err(|e| CdiffError::io(display.as_str(), e))?;
            let mut lines = BufReader::new(handle).lines();
            let Some(header) = lines.next() else {
                continue;
            };
            let header = header.map_err(|e| CdiffError::io(display.as_str(), e))?;
            if !wrote_header {
                writeln!(out, "{}", header).map_err(|e| CdiffError::io(out_display.as_str(), e))?;
                wrote_header = true;
            }
            for line in lines {
                let line = line.map_err(|e| CdiffError::io(display.as_str(), e))?;
                writeln!(out, "{}", line).map_err(|e| CdiffError::io(out_display.as_str(), e))?;
            }
        }
    }
    Ok(())
}
