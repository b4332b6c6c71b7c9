//! Record serializers: the semicolon-delimited tabular row and the lossless
//! JSON object.
//!
//! The tabular form is lossy on purpose (two cells are `/`- and `:`-joined
//! composites); the JSON file carries the full record including the nested
//! coverage sub-record. The header is written once per destination file;
//! row emission is a separate append so the batch summarizer can keep a
//! single header across many concatenated files.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::error::CdiffError;
use crate::record::SampleRecord;

/// Fixed column order of the tabular output. The seeded ST string carries
/// its own internal semicolon and fills both the `ST` and `STalleles`
/// columns.
pub const CSV_HEADER: &str =
    "Name;cdtA/B;tcdA;tcdB;tcdClength;117del;A117T;TRST;TR6;TR10;ST;STalleles;WGS;tcdA:tcdB:tcdC:cdtA:cdtB";

/// Render one record as a semicolon-delimited data row (no newline).
pub fn csv_row(record: &SampleRecord) -> String {
    let cov = &record.cov_info;
    let cells: [String; 13] = [
        record.name.clone(),
        format!("{}/{}", record.cdt_a, record.cdt_b),
        record.tcd_a.clone(),
        record.tcd_b.clone(),
        record.tcd_c_length.clone(),
        record.del_117.clone(),
        record.a117t.clone(),
        record.trst.clone(),
        record.tr6.clone(),
        record.tr10.clone(),
        record.st.clone(),
        record.wgs.clone(),
        format!(
            "{}:{}:{}:{}:{}",
            cov.tcd_a, cov.tcd_b, cov.tcd_c, cov.cdt_a, cov.cdt_b
        ),
    ];
    cells.join(";")
}

/// Write the header line, truncating any existing file.
pub fn write_csv_header(path: &Path) -> Result<(), CdiffError> {
    let display = path.display().to_string();
    let mut file = File::create(path).map_err(|e| CdiffError::io(display.as_str(), e))?;
    writeln!(file, "{}", CSV_HEADER).map_err(|e| CdiffError::io(display.as_str(), e))
}

/// Append one data row to an existing tabular file.
pub fn append_csv_row(path: &Path, record: &SampleRecord) -> Result<(), CdiffError> {
    let display = path.display().to_string();
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| CdiffError::io(display.as_str(), e))?;
    writeln!(file, "{}", csv_row(record)).map_err(|e| CdiffError::io(display.as_str(), e))
}

/// Write the full record as a single JSON object.
pub fn write_json(path: &Path, record: &SampleRecord) -> Result<(), CdiffError> {
    let display = path.display().to_string();
    let file = File::create(path).map_err(|e| CdiffError::io(display.as_str(), e))?;
    serde_json::to_writer(file, record)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_row_have_matching_delimiters() {
        // ST default "ST;NA:NA" spans ST and STalleles, so the rendered row
        // has as many semicolon cells as the header
        let record = SampleRecord::seeded("ST;NA:NA", "NA");
        let row = csv_row(&record);
        assert_eq!(
            row.split(';').count(),
            CSV_HEADER.split(';').count(),
        );
    }

    #[test]
    fn default_record_row() {
        let record = SampleRecord::seeded("ST;NA:NA", "NA");
        assert_eq!(
            csv_row(&record),
            "-;-/-;-;-;0;-;-;-;-;-;ST;NA:NA;NA;-:-:-:-:-"
        );
    }

    #[test]
    fn composite_cells_are_joined_in_fixed_order() {
        let mut record = SampleRecord::seeded("ST;NA:NA", "WGS42");
        record.set_presence("cdtA");
        record.cov_info.set("tcdA", "10/20");
        record.cov_info.set("cdtB", "5/9");
        let row = csv_row(&record);
        assert!(row.contains(";+/-;"));
        assert!(row.ends_with(";10/20:-:-:-:5/9"));
    }
}
