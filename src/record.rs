//! The sample record accumulated while parsing a report.
//!
//! One instance per report. Every field starts at its sentinel so a report
//! missing a section still yields a fully-populated record, and the serde
//! field names match the external JSON contract exactly.

use serde::{Deserialize, Serialize};

/// Sentinel for "not determined".
pub const ABSENT: &str = "-";
/// Flag value for a present gene or positive call.
pub const PRESENT: &str = "+";
/// Sentinel for a typing result that could not be assigned.
pub const UNKNOWN: &str = "Unknown";

/// Coverage fractions for the five genes of interest, as `present/total`
/// strings. The key set is fixed; it never grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageInfo {
    #[serde(rename = "tcdA")]
    pub tcd_a: String,
    #[serde(rename = "tcdB")]
    pub tcd_b: String,
    #[serde(rename = "tcdC")]
    pub tcd_c: String,
    #[serde(rename = "cdtA")]
    pub cdt_a: String,
    #[serde(rename = "cdtB")]
    pub cdt_b: String,
}

impl Default for CoverageInfo {
    fn default() -> Self {
        Self {
            tcd_a: ABSENT.to_string(),
            tcd_b: ABSENT.to_string(),
            tcd_c: ABSENT.to_string(),
            cdt_a: ABSENT.to_string(),
            cdt_b: ABSENT.to_string(),
        }
    }
}

impl CoverageInfo {
    /// Record a coverage fraction for one of the five known genes.
    /// Unknown gene names are ignored.
    pub fn set(&mut self, gene: &str, fraction: &str) {
        match gene {
            "tcdA" => self.tcd_a = fraction.to_string(),
            "tcdB" => self.tcd_b = fraction.to_string(),
            "tcdC" => self.tcd_c = fraction.to_string(),
            "cdtA" => self.cdt_a = fraction.to_string(),
            "cdtB" => self.cdt_b = fraction.to_string(),
            _ => {}
        }
    }
}

/// One parsed diagnostic report, fully populated at all times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRecord {
    /// Sample identifier from the `Strain:` line.
    #[serde(rename = "Name")]
    pub name: String,

    /// Binary toxin gene presence flags.
    #[serde(rename = "cdtA")]
    pub cdt_a: String,
    #[serde(rename = "cdtB")]
    pub cdt_b: String,

    /// Toxin gene presence flags.
    #[serde(rename = "tcdA")]
    pub tcd_a: String,
    #[serde(rename = "tcdB")]
    pub tcd_b: String,

    /// Underscore-joined tcdC indel lengths, or `"0"`.
    #[serde(rename = "tcdClength")]
    pub tcd_c_length: String,

    /// The known deletion at position 18499 (`CT` -> `C`).
    #[serde(rename = "117del")]
    pub del_117: String,

    /// Point mutation call gated on allele, quality and depth.
    #[serde(rename = "A117T")]
    pub a117t: String,

    /// Tandem-repeat typing results.
    #[serde(rename = "TRST")]
    pub trst: String,
    #[serde(rename = "TR6")]
    pub tr6: String,
    #[serde(rename = "TR10")]
    pub tr10: String,

    /// Sequence-type string, supplied by the caller.
    #[serde(rename = "ST")]
    pub st: String,

    /// Sample-set label, supplied by the caller.
    #[serde(rename = "WGS")]
    pub wgs: String,

    #[serde(rename = "cov_info")]
    pub cov_info: CoverageInfo,
}

impl SampleRecord {
    /// Create a record seeded with defaults plus the two caller-supplied
    /// fields.
    pub fn seeded(stbit: &str, wgsnumber: &str) -> Self {
        Self {
            name: ABSENT.to_string(),
            cdt_a: ABSENT.to_string(),
            cdt_b: ABSENT.to_string(),
            tcd_a: ABSENT.to_string(),
            tcd_b: ABSENT.to_string(),
            tcd_c_length: crate::indel::NO_INDEL.to_string(),
            del_117: ABSENT.to_string(),
            a117t: ABSENT.to_string(),
            trst: ABSENT.to_string(),
            tr6: ABSENT.to_string(),
            tr10: ABSENT.to_string(),
            st: stbit.to_string(),
            wgs: wgsnumber.to_string(),
            cov_info: CoverageInfo::default(),
        }
    }

    /// Mark one of the four toxin genes present. Unknown gene names are
    /// ignored; the regulatory gene carries no presence flag.
    pub fn set_presence(&mut self, gene: &str) {
        match gene {
            "tcdA" => self.tcd_a = PRESENT.to_string(),
            "tcdB" => self.tcd_b = PRESENT.to_string(),
            "cdtA" => self.cdt_a = PRESENT.to_string(),
            "cdtB" => self.cdt_b = PRESENT.to_string(),
            _ => {}
        }
    }
}
