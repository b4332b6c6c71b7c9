//! Indel length derivation for the regulatory gene (tcdC).
//!
//! The gene-info line carries its indels as a mapping literal; the record
//! keeps only the signed length differences, underscore-joined. A deletion
//! is positive (`len(ref) > len(alt)`), an insertion negative, and anything
//! unparseable is the `"0"` sentinel rather than an error.

use crate::literal::indel_pairs;

/// Sentinel for "no indel" or an unparseable indel section.
pub const NO_INDEL: &str = "0";

/// Canonical tcdC deletion lengths kept verbatim by the 117-deletion
/// re-derivation. Fixed lookup set; flagged for domain-expert review.
const CANONICAL_117DEL_LENGTHS: [&str; 3] = ["4", "18", "54"];

/// Derive the underscore-joined indel length summary from a mapping literal.
///
/// # Examples
///
/// ```
/// use cdiff_qc::indel::indel_length_summary;
///
/// assert_eq!(indel_length_summary("{18499: ('CT', 'C')}"), "1");
/// assert_eq!(indel_length_summary("{5: ('A', 'AT'), 9: ('GGGG', 'G')}"), "-1_3");
/// assert_eq!(indel_length_summary("{}"), "0");
/// ```
pub fn indel_length_summary(info: &str) -> String {
    let deltas: Vec<String> = indel_pairs(info)
        .map(|(reference, alternate)| {
            (reference.len() as i64 - alternate.len() as i64).to_string()
        })
        .collect();
    if deltas.is_empty() {
        NO_INDEL.to_string()
    } else {
        deltas.join("_")
    }
}

/// Re-derive the length summary once the known 117 deletion has been seen.
///
/// The first underscore element is kept verbatim if it is one of the
/// canonical lengths; otherwise the summary becomes the list repr of the
/// remaining elements, or `"0"` if nothing remains. Deliberately order- and
/// position-sensitive; do not generalize.
pub fn rederive_for_117del(summary: &str) -> String {
    let mut elements: Vec<&str> = summary.split('_').collect();
    let first = elements.remove(0);
    if CANONICAL_117DEL_LENGTHS.contains(&first) {
        first.to_string()
    } else if !elements.is_empty() {
        let quoted: Vec<String> = elements.iter().map(|e| format!("'{}'", e)).collect();
        format!("[{}]", quoted.join(", "))
    } else {
        NO_INDEL.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("{18499: ('CT', 'C')}", "1")]
    #[case("{100: ('GACTT', 'G')}", "4")]
    #[case("{100: ('G', 'GAT')}", "-2")]
    #[case("{100: ('AT', 'GC')}", "0")]
    #[case("{}", "0")]
    #[case("", "0")]
    #[case("completely malformed", "0")]
    fn summary_cases(#[case] info: &str, #[case] expected: &str) {
        assert_eq!(indel_length_summary(info), expected);
    }

    #[test]
    fn summary_preserves_encounter_order() {
        let info = "{5: ('AACT', 'A'), 9: ('G', 'GT'), 20: ('C', 'C')}";
        assert_eq!(indel_length_summary(info), "3_-1_0");
    }

    #[rstest]
    #[case("4", "4")]
    #[case("18", "18")]
    #[case("54", "54")]
    #[case("4_7", "4")]
    #[case("1", "0")]
    #[case("1_2_3", "['2', '3']")]
    #[case("0", "0")]
    fn rederivation_cases(#[case] summary: &str, #[case] expected: &str) {
        assert_eq!(rederive_for_117del(summary), expected);
    }
}
