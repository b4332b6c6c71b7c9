//! Report parsing: field recognizers and the single-pass driver.
//!
//! A report is the concatenated textual output of the upstream steps
//! (gene-info files, the variant-call echo, the typing block). Lines are
//! loosely ordered, so each recognizer tests a literal line prefix and
//! mutates the shared [`SampleRecord`] on match; unrelated lines pass
//! through every recognizer untouched. The driver runs the whole ordered
//! recognizer table against every line and never backtracks. The typing
//! block is the one multi-line section: its recognizer reads two further
//! lines from the same forward-only stream.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use crate::error::CdiffError;
use crate::indel::{indel_length_summary, rederive_for_117del};
use crate::literal::{list_items, strip_ends};
use crate::record::{SampleRecord, ABSENT, PRESENT, UNKNOWN};
use crate::typing::{NO_COMBINATION, TYPING_HEADER};

/// Toxin gene pair reported by the gene-info step.
const TOXIN_GENES: [&str; 2] = ["tcdA", "tcdB"];
/// Binary toxin gene pair.
const BINARY_TOXIN_GENES: [&str; 2] = ["cdtA", "cdtB"];
/// Regulatory gene carrying the indel summary.
const REGULATORY_GENE: &str = "tcdC";

/// Raw-line marker for the known deletion at 18499.
const DEL_117_MARKER: &str = "18499: ('CT', 'C')";
/// Minimum read depth for a point-mutation call.
const MIN_DEPTH: i64 = 20;

/// Forward-only line stream over a report, with I/O errors carrying the
/// source path. The typing-block recognizer reads its bounded lookahead
/// through the same cursor, so consumed lines are never re-offered.
pub struct ReportLines<R> {
    lines: Lines<R>,
    path: String,
}

impl<R: BufRead> ReportLines<R> {
    pub fn new(reader: R, path: impl Into<String>) -> Self {
        Self {
            lines: reader.lines(),
            path: path.into(),
        }
    }

    /// Next line, or `None` at end of stream.
    pub fn next_line(&mut self) -> Result<Option<String>, CdiffError> {
        self.lines
            .next()
            .transpose()
            .map_err(|e| CdiffError::io(self.path.as_str(), e))
    }
}

/// The ordered recognizer table applied to every line. Triggers are
/// disjoint prefixes, but nothing here relies on that: each recognizer is a
/// no-op on lines that are not its own.
const LINE_RECOGNIZERS: [fn(&str, &mut SampleRecord); 5] = [
    recognize_sample_id,
    recognize_point_mutation,
    recognize_toxin_genes,
    recognize_regulatory_gene,
    recognize_binary_toxin_genes,
];

/// Parse one report stream into a fully-populated record.
pub fn parse_report<R: BufRead>(
    reader: R,
    path: &str,
    stbit: &str,
    wgsnumber: &str,
) -> Result<SampleRecord, CdiffError> {
    let mut lines = ReportLines::new(reader, path);
    let mut record = SampleRecord::seeded(stbit, wgsnumber);
    while let Some(line) = lines.next_line()? {
        for recognize in LINE_RECOGNIZERS {
            recognize(&line, &mut record);
        }
        if line.starts_with(TYPING_HEADER) {
            recognize_typing_block(&mut lines, &mut record)?;
        }
    }
    Ok(record)
}

/// Open and parse a report file.
pub fn parse_report_file(
    path: &Path,
    stbit: &str,
    wgsnumber: &str,
) -> Result<SampleRecord, CdiffError> {
    let display = path.display().to_string();
    let file = File::open(path).map_err(|e| CdiffError::io(display.as_str(), e))?;
    parse_report(BufReader::new(file), &display, stbit, wgsnumber)
}

/// `Strain: <identifier>` — later matches overwrite earlier ones.
fn recognize_sample_id(line: &str, record: &mut SampleRecord) {
    if line.starts_with("Strain") {
        if let Some(name) = line.split(':').nth(1) {
            record.name = name.trim().to_string();
        }
    }
}

/// `Found in tcdA:...` / `Found in tcdB:...`
fn recognize_toxin_genes(line: &str, record: &mut SampleRecord) {
    recognize_gene_presence(line, record, &TOXIN_GENES);
}

/// `Found in cdtA:...` / `Found in cdtB:...`
fn recognize_binary_toxin_genes(line: &str, record: &mut SampleRecord) {
    recognize_gene_presence(line, record, &BINARY_TOXIN_GENES);
}

fn recognize_gene_presence(line: &str, record: &mut SampleRecord, genes: &[&str]) {
    for gene in genes {
        let Some(rest) = line.trim().strip_prefix(&format!("Found in {}:", gene)) else {
            continue;
        };
        let fields: Vec<&str> = rest.split(';').collect();
        if fields.first() == Some(&"Gene is present") {
            record.set_presence(gene);
        }
        // Coverage is recorded whether or not the gene is present.
        if let Some(fraction) = fields.get(1) {
            record.cov_info.set(gene, fraction);
        }
    }
}

/// `Found in tcdC:<presence>;<fraction>;<indel mapping literal>`
fn recognize_regulatory_gene(line: &str, record: &mut SampleRecord) {
    let Some(rest) = line.strip_prefix(&format!("Found in {}:", REGULATORY_GENE)) else {
        return;
    };
    let fields: Vec<&str> = rest.split(';').collect();
    if let Some(fraction) = fields.get(1) {
        record.cov_info.set(REGULATORY_GENE, fraction);
    }
    if let Some(info) = fields.get(2) {
        record.tcd_c_length = indel_length_summary(info);
    }
    if line.contains(DEL_117_MARKER) {
        record.del_117 = PRESENT.to_string();
        record.tcd_c_length = rederive_for_117del(&record.tcd_c_length);
    } else {
        record.del_117 = ABSENT.to_string();
    }
}

/// `gi|...` — a variant-call line echoed by the upstream caller. The call
/// is made only if the allele column reads `A`, the quality flag (the
/// one-character slice at offset 6 of the raw line, per the upstream
/// contract) is not `LowQual`, and the `DP` depth exceeds [`MIN_DEPTH`].
fn recognize_point_mutation(line: &str, record: &mut SampleRecord) {
    if !line.starts_with("gi|") {
        return;
    }
    log::debug!("variant-call line: {}", line);
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some(allele) = tokens.get(4) else { return };
    if *allele != "A" {
        return;
    }
    if line.get(6..7).is_some_and(|flag| flag == "LowQual") {
        return;
    }
    let Some(index) = tokens
        .get(8)
        .and_then(|format_col| format_col.split(':').position(|f| f == "DP"))
    else {
        return;
    };
    let Some(depth) = tokens.get(9).and_then(|sample| sample.split(':').nth(index)) else {
        return;
    };
    if depth.parse::<i64>().is_ok_and(|d| d > MIN_DEPTH) {
        record.a117t = PRESENT.to_string();
    }
}

/// The three-line typing block following the `TRST results` header:
/// a bracketed list of TR6 hits, a quoted TR10 token, and the combination
/// label. A non-bracketed first line means the upstream step found nothing;
/// both loci then resolve to `Unknown` and no further lines are consumed.
fn recognize_typing_block<R: BufRead>(
    lines: &mut ReportLines<R>,
    record: &mut SampleRecord,
) -> Result<(), CdiffError> {
    let first = lines.next_line()?.unwrap_or_default();
    let first = first.trim();
    let mut tr6 = String::new();
    let mut tr10 = String::new();
    if first.starts_with('[') {
        tr6 = list_items(first).join(",");
        record.tr6 = tr6.clone();
        if let Some(line) = lines.next_line()? {
            tr10 = strip_ends(line.trim()).trim_matches('\'').to_string();
            record.tr10 = tr10.clone();
        }
        if let Some(line) = lines.next_line()? {
            if let Some(label) = line.split_whitespace().next() {
                record.trst = label.trim_matches('\'').to_string();
            }
        }
    }
    if tr6.is_empty() {
        record.tr6 = UNKNOWN.to_string();
    }
    if tr10.is_empty() {
        record.tr10 = UNKNOWN.to_string();
    }
    if record.trst == NO_COMBINATION {
        record.trst = UNKNOWN.to_string();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(text: &str) -> SampleRecord {
        parse_report(Cursor::new(text), "<test>", "ST;NA:NA", "NA").unwrap()
    }

    #[test]
    fn sample_id_is_extracted_and_overwritten() {
        let mut record = SampleRecord::seeded("ST;NA:NA", "NA");
        recognize_sample_id("Strain: cdiff1", &mut record);
        assert_eq!(record.name, "cdiff1");
        recognize_sample_id("Strain: cdiff2", &mut record);
        assert_eq!(record.name, "cdiff2");
        recognize_sample_id("Found in tcdA:...", &mut record);
        assert_eq!(record.name, "cdiff2");
    }

    #[test]
    fn toxin_gene_presence_and_coverage() {
        let mut record = SampleRecord::seeded("ST;NA:NA", "NA");
        recognize_toxin_genes("Found in tcdA:Gene is present;8130/8133;{}", &mut record);
        recognize_toxin_genes("Found in tcdB:Gene is not present;64/7101;{}", &mut record);
        assert_eq!(record.tcd_a, "+");
        assert_eq!(record.tcd_b, "-");
        assert_eq!(record.cov_info.tcd_a, "8130/8133");
        // coverage recorded even for the absent gene
        assert_eq!(record.cov_info.tcd_b, "64/7101");
    }

    #[test]
    fn regulatory_gene_without_deletion_marker() {
        let mut record = SampleRecord::seeded("ST;NA:NA", "NA");
        recognize_regulatory_gene(
            "Found in tcdC:Gene is present;700/700;{18600: ('GAT', 'G')}",
            &mut record,
        );
        assert_eq!(record.cov_info.tcd_c, "700/700");
        assert_eq!(record.tcd_c_length, "2");
        assert_eq!(record.del_117, "-");
    }

    #[test]
    fn regulatory_gene_with_deletion_marker_rederives_length() {
        let mut record = SampleRecord::seeded("ST;NA:NA", "NA");
        recognize_regulatory_gene(
            "Found in tcdC:Gene is present;700/700;{18499: ('CT', 'C'), 18600: ('GACTT', 'G')}",
            &mut record,
        );
        assert_eq!(record.del_117, "+");
        // raw summary 1_4: first element not canonical, remainder kept
        assert_eq!(record.tcd_c_length, "['4']");
    }

    #[test]
    fn deletion_marker_with_canonical_first_length() {
        let mut record = SampleRecord::seeded("ST;NA:NA", "NA");
        recognize_regulatory_gene(
            "Found in tcdC:Gene is present;700/700;{18400: ('GACTT', 'G'), 18499: ('CT', 'C')}",
            &mut record,
        );
        assert_eq!(record.del_117, "+");
        assert_eq!(record.tcd_c_length, "4");
    }

    #[test]
    fn point_mutation_requires_all_three_gates() {
        let format_cols = "GT:AD:DP:GQ:PL 1:0,40:41:99:1485,0";
        let pass = format!("gi|126697566|ref|NC_009089.1| 138499 . G A 1374.77 . AC=1 {format_cols}");
        let mut record = SampleRecord::seeded("ST;NA:NA", "NA");
        recognize_point_mutation(&pass, &mut record);
        assert_eq!(record.a117t, "+");

        // wrong allele
        let mut record = SampleRecord::seeded("ST;NA:NA", "NA");
        let wrong_allele = pass.replace(" G A ", " G T ");
        recognize_point_mutation(&wrong_allele, &mut record);
        assert_eq!(record.a117t, "-");

        // depth at the threshold is not enough
        let mut record = SampleRecord::seeded("ST;NA:NA", "NA");
        let shallow = pass.replace("1:0,40:41:99", "1:0,40:20:99");
        recognize_point_mutation(&shallow, &mut record);
        assert_eq!(record.a117t, "-");
    }

    #[test]
    fn point_mutation_ignores_short_lines() {
        let mut record = SampleRecord::seeded("ST;NA:NA", "NA");
        recognize_point_mutation("gi|126697566|ref|NC_009089.1|", &mut record);
        assert_eq!(record.a117t, "-");
    }

    #[test]
    fn typing_block_with_hits() {
        let record = parse("TRST results\n['tr6A', 'tr6B']\n['tr10F']\ntr027\ttr6A\ttr10F\n");
        assert_eq!(record.tr6, "tr6A,tr6B");
        assert_eq!(record.tr10, "tr10F");
        assert_eq!(record.trst, "tr027");
    }

    #[test]
    fn typing_block_with_empty_list() {
        let record = parse("TRST results\n[]\n[]\ntrunknown\n");
        assert_eq!(record.tr6, "Unknown");
        assert_eq!(record.tr10, "Unknown");
        assert_eq!(record.trst, "Unknown");
    }

    #[test]
    fn typing_block_with_non_bracketed_body() {
        let record = parse("TRST results\nno matches\n");
        assert_eq!(record.tr6, "Unknown");
        assert_eq!(record.tr10, "Unknown");
        // the combination label keeps its seed when the list path is not taken
        assert_eq!(record.trst, "-");
    }

    #[test]
    fn typing_block_lines_are_not_reoffered() {
        // the consumed block lines must not reach the other recognizers
        let record = parse("TRST results\n['tr6A']\n['tr10F']\nStrain: sneaky\n");
        assert_eq!(record.name, "-");
        assert_eq!(record.trst, "Strain:");
    }

    #[test]
    fn report_without_gene_lines_keeps_defaults() {
        let record = parse("Strain: cdiff9\nsomething unrelated\n");
        assert_eq!(record.name, "cdiff9");
        assert_eq!(record.tcd_a, "-");
        assert_eq!(record.cov_info, crate::record::CoverageInfo::default());
        assert_eq!(record.tcd_c_length, "0");
    }
}
