//! Tandem-repeat sequence typing (TRST).
//!
//! The database directory holds FASTA-like fragment files and type tables
//! for the two repeat loci, plus the combination table. Each type's full
//! sequence is composed by concatenating its fragments; the assembled
//! contig sequence is then searched case-insensitively for every composed
//! sequence and its reverse complement. The resulting block is what the
//! report parser later consumes as the `TRST results` section.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::error::CdiffError;
use crate::literal::format_list;

/// Fixed file names inside the database directory.
pub const TR6_FRAGMENTS_FILE: &str = "TR6_repeat_sequences.ashx";
pub const TR10_FRAGMENTS_FILE: &str = "TR10_repeat_sequences.ashx";
pub const TR6_TYPES_FILE: &str = "TR6_types.ashx";
pub const TR10_TYPES_FILE: &str = "TR10_types.ashx";
pub const COMBINATIONS_FILE: &str = "TRST_types.ashx";

/// Header line of the typing block.
pub const TYPING_HEADER: &str = "TRST results";
/// Written when no combination matches both hit lists.
pub const NO_COMBINATION: &str = "trunknown";

/// Reverse complement a DNA sequence. Case is preserved and non-ACGT
/// characters pass through unchanged.
pub fn reverse_complement(seq: &str) -> String {
    seq.chars()
        .rev()
        .map(|c| match c {
            'A' => 'T',
            'T' => 'A',
            'G' => 'C',
            'C' => 'G',
            'a' => 't',
            't' => 'a',
            'g' => 'c',
            'c' => 'g',
            _ => c,
        })
        .collect()
}

/// Read a FASTA-like fragment file into a name -> sequence table.
pub fn read_fragments(db: &Path, file: &str) -> Result<HashMap<String, String>, CdiffError> {
    let path = db.join(file);
    let display = path.display().to_string();
    let handle = File::open(&path).map_err(|e| CdiffError::io(display.as_str(), e))?;
    let mut fragments = HashMap::new();
    let mut name = String::new();
    let mut seq = String::new();
    for line in BufReader::new(handle).lines() {
        let line = line.map_err(|e| CdiffError::io(display.as_str(), e))?;
        if let Some(header) = line.strip_prefix('>') {
            if !seq.is_empty() {
                fragments.insert(name.clone(), seq.clone());
            }
            name = header.trim().to_string();
            seq.clear();
        } else {
            seq.push_str(line.trim());
        }
    }
    if !seq.is_empty() {
        fragments.insert(name, seq);
    }
    Ok(fragments)
}

/// Compose every type's full sequence from its fragment pattern
/// (`<type>,\t<frag>-<frag>-...`), preserving table order. Lines without the
/// `,\t` separator are skipped; a pattern entry missing from the fragment
/// table is fatal.
pub fn compose_types(
    db: &Path,
    file: &str,
    fragments: &HashMap<String, String>,
) -> Result<Vec<(String, String)>, CdiffError> {
    let path = db.join(file);
    let display = path.display().to_string();
    let handle = File::open(&path).map_err(|e| CdiffError::io(display.as_str(), e))?;
    let mut types = Vec::new();
    for line in BufReader::new(handle).lines() {
        let line = line.map_err(|e| CdiffError::io(display.as_str(), e))?;
        let Some((key, pattern)) = line.split_once(",\t") else {
            continue;
        };
        let mut seq = String::new();
        for entry in pattern.trim().split('-') {
            let fragment = fragments.get(entry).ok_or_else(|| CdiffError::FragmentNotFound {
                file: file.to_string(),
                fragment: entry.to_string(),
            })?;
            seq.push_str(fragment);
        }
        types.push((key.to_string(), seq));
    }
    Ok(types)
}

/// Names of every type whose composed sequence (or its reverse complement)
/// occurs in the assembled contig sequence, case-insensitively, in table
/// order. Sequences are plain DNA, so a substring scan is sufficient.
pub fn matching_types(sequence: &str, types: &[(String, String)]) -> Vec<String> {
    let haystack = sequence.to_ascii_uppercase();
    types
        .iter()
        .filter(|(_, seq)| {
            let upper = seq.to_ascii_uppercase();
            haystack.contains(&upper) || haystack.contains(&reverse_complement(&upper))
        })
        .map(|(name, _)| name.clone())
        .collect()
}

/// Read a contigs file: the first line is a header, the remainder is the
/// sequence with newlines removed.
pub fn read_contig_sequence(path: &Path) -> Result<String, CdiffError> {
    let display = path.display().to_string();
    let handle = File::open(path).map_err(|e| CdiffError::io(display.as_str(), e))?;
    let mut lines = BufReader::new(handle).lines();
    lines.next(); // header
    let mut sequence = String::new();
    for line in lines {
        let line = line.map_err(|e| CdiffError::io(display.as_str(), e))?;
        sequence.push_str(line.trim_end());
    }
    Ok(sequence)
}

/// Write the typing block: the header, both hit lists as list literals, and
/// every combination from the database matched by both lists, or the
/// `trunknown` sentinel when none is.
pub fn write_typing_report<W: Write>(
    out: &mut W,
    db: &Path,
    tr6_hits: &[String],
    tr10_hits: &[String],
) -> Result<(), CdiffError> {
    let path = db.join(COMBINATIONS_FILE);
    let display = path.display().to_string();
    let combinations = File::open(&path).map_err(|e| CdiffError::io(display.as_str(), e))?;

    let io_err = |e: std::io::Error| CdiffError::io("typing report", e);
    writeln!(out, "{}", TYPING_HEADER).map_err(io_err)?;
    writeln!(out, "{}", format_list(tr6_hits)).map_err(io_err)?;
    writeln!(out, "{}", format_list(tr10_hits)).map_err(io_err)?;

    let mut found = false;
    for line in BufReader::new(combinations).lines() {
        let line = line.map_err(|e| CdiffError::io(display.as_str(), e))?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.trim().split('\t').collect();
        let &[combo, tr6_type, tr10_type] = fields.as_slice() else {
            return Err(CdiffError::malformed(
                "combination",
                display.as_str(),
                line.as_str(),
            ));
        };
        if tr6_hits.iter().any(|h| h == tr6_type) && tr10_hits.iter().any(|h| h == tr10_type) {
            writeln!(out, "{}\t{}\t{}", combo, tr6_type, tr10_type).map_err(io_err)?;
            found = true;
        }
    }
    if !found {
        writeln!(out, "{}", NO_COMBINATION).map_err(io_err)?;
    }
    Ok(())
}

/// Full typing run: load both loci from the database, search the contigs,
/// and write the report block to `outfile`.
pub fn run_typing(contigs: &Path, db: &Path, outfile: &Path) -> Result<(), CdiffError> {
    let tr6_fragments = read_fragments(db, TR6_FRAGMENTS_FILE)?;
    let tr10_fragments = read_fragments(db, TR10_FRAGMENTS_FILE)?;
    let tr6_types = compose_types(db, TR6_TYPES_FILE, &tr6_fragments)?;
    let tr10_types = compose_types(db, TR10_TYPES_FILE, &tr10_fragments)?;

    let sequence = read_contig_sequence(contigs)?;
    let tr6_hits = matching_types(&sequence, &tr6_types);
    let tr10_hits = matching_types(&sequence, &tr10_types);
    log::info!(
        "typing hits: TR6 {:?}, TR10 {:?}",
        tr6_hits,
        tr10_hits
    );

    let display = outfile.display().to_string();
    let mut out = File::create(outfile).map_err(|e| CdiffError::io(display.as_str(), e))?;
    write_typing_report(&mut out, db, &tr6_hits, &tr10_hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_db(dir: &Path) {
        fs::write(
            dir.join(TR6_FRAGMENTS_FILE),
            ">f1\nACGT\nACGT\n>f2\nTTTT\n",
        )
        .unwrap();
        fs::write(dir.join(TR10_FRAGMENTS_FILE), ">g1\nGGCC\n").unwrap();
        fs::write(dir.join(TR6_TYPES_FILE), "tr6A,\tf1-f2\ntr6B,\tf2\n").unwrap();
        fs::write(dir.join(TR10_TYPES_FILE), "tr10F,\tg1\n").unwrap();
        fs::write(
            dir.join(COMBINATIONS_FILE),
            "tr027\ttr6A\ttr10F\ntr099\ttr6Z\ttr10F\n",
        )
        .unwrap();
    }

    #[test]
    fn fragments_concatenate_multiline_sequences() {
        let dir = TempDir::new().unwrap();
        write_db(dir.path());
        let fragments = read_fragments(dir.path(), TR6_FRAGMENTS_FILE).unwrap();
        assert_eq!(fragments["f1"], "ACGTACGT");
        assert_eq!(fragments["f2"], "TTTT");
    }

    #[test]
    fn types_compose_in_table_order() {
        let dir = TempDir::new().unwrap();
        write_db(dir.path());
        let fragments = read_fragments(dir.path(), TR6_FRAGMENTS_FILE).unwrap();
        let types = compose_types(dir.path(), TR6_TYPES_FILE, &fragments).unwrap();
        assert_eq!(
            types,
            vec![
                ("tr6A".to_string(), "ACGTACGTTTTT".to_string()),
                ("tr6B".to_string(), "TTTT".to_string()),
            ]
        );
    }

    #[test]
    fn missing_fragment_is_fatal() {
        let dir = TempDir::new().unwrap();
        write_db(dir.path());
        fs::write(dir.path().join(TR6_TYPES_FILE), "tr6X,\tf1-missing\n").unwrap();
        let fragments = read_fragments(dir.path(), TR6_FRAGMENTS_FILE).unwrap();
        let err = compose_types(dir.path(), TR6_TYPES_FILE, &fragments).unwrap_err();
        assert!(matches!(err, CdiffError::FragmentNotFound { .. }));
    }

    #[test]
    fn matching_is_case_insensitive_and_covers_reverse_strand() {
        let types = vec![("t1".to_string(), "acgtACGT".to_string())];
        assert_eq!(matching_types("ttACGTACGTtt", &types), vec!["t1"]);
        // reverse complement of ACGTACGT is ACGTACGT; use an asymmetric probe
        let types = vec![("t2".to_string(), "AAACCC".to_string())];
        assert_eq!(matching_types("ttGGGTTTtt", &types), vec!["t2"]);
        assert!(matching_types("ttttt", &types).is_empty());
    }

    #[test]
    fn report_block_round_trips_through_the_parser_contract() {
        let dir = TempDir::new().unwrap();
        write_db(dir.path());
        let mut buf = Vec::new();
        write_typing_report(
            &mut buf,
            dir.path(),
            &["tr6A".to_string()],
            &["tr10F".to_string()],
        )
        .unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "TRST results\n['tr6A']\n['tr10F']\ntr027\ttr6A\ttr10F\n"
        );
    }

    #[test]
    fn no_combination_writes_sentinel() {
        let dir = TempDir::new().unwrap();
        write_db(dir.path());
        let mut buf = Vec::new();
        write_typing_report(&mut buf, dir.path(), &[], &[]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "TRST results\n[]\n[]\ntrunknown\n");
    }
}
