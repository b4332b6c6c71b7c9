//! Embedded-value extractors for the report micro-format.
//!
//! The gene-info and typing steps print some of their intermediate values as
//! debug-style literals: a `pos: (ref, alt)` mapping for indels and a
//! bracketed, single-quoted list for repeat-type hits. These are not a real
//! grammar; extraction is a tolerant pattern match over the fixed surface
//! syntax, and anything that does not match simply yields no values.
//!
//! Because this crate also contains the producers, the writers for both
//! literals live here next to the readers.

use once_cell::sync::Lazy;
use regex::Regex;

/// One `pos: (REF, ALT)` entry, matched per chunk after splitting on `),`.
/// REF/ALT must be plain DNA letters; either quote character is accepted.
static INDEL_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\{?\s?\d+:\s\(['"]([ATCG]+)['"],\s['"]([ATCG]+)"#).expect("valid regex")
});

/// Extract every `(ref, alt)` pair from a serialized indel mapping literal.
///
/// Produces zero pairs (not an error) for an empty mapping (`{}`), a missing
/// section, or entries whose sequences are not letter-only.
///
/// # Examples
///
/// ```
/// use cdiff_qc::literal::indel_pairs;
///
/// let pairs: Vec<_> = indel_pairs("{18499: ('CT', 'C'), 18650: ('A', 'AT')}").collect();
/// assert_eq!(pairs, vec![("CT".to_string(), "C".to_string()),
///                        ("A".to_string(), "AT".to_string())]);
/// assert_eq!(indel_pairs("{}").count(), 0);
/// ```
pub fn indel_pairs(info: &str) -> impl Iterator<Item = (String, String)> + '_ {
    info.split("),").filter_map(|chunk| {
        INDEL_PAIR
            .captures(chunk)
            .map(|caps| (caps[1].to_string(), caps[2].to_string()))
    })
}

/// Extract the bare strings from a serialized list literal such as
/// `['tr6A', 'tr6B']`. An empty literal (`[]`) yields an empty vector.
pub fn list_items(literal: &str) -> Vec<String> {
    let trimmed = literal.trim();
    if !trimmed.starts_with('[') {
        return Vec::new();
    }
    strip_ends(trimmed)
        .split(", ")
        .map(|item| item.trim_matches('\'').to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Drop the first and last character of `s` (empty result if shorter than 2).
pub(crate) fn strip_ends(s: &str) -> &str {
    let mut chars = s.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}

/// Write a list of strings as the single-quoted list literal the report
/// parser reads back, e.g. `['tr6A', 'tr6B']` or `[]`.
pub fn format_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|item| format!("'{}'", item)).collect();
    format!("[{}]", quoted.join(", "))
}

/// Write an ordered `pos -> (ref, alt)` mapping as the indel mapping literal,
/// e.g. `{18499: ('CT', 'C')}` or `{}`.
pub fn format_indel_map(indels: &[(u64, (String, String))]) -> String {
    let entries: Vec<String> = indels
        .iter()
        .map(|(pos, (reference, alternate))| {
            format!("{}: ('{}', '{}')", pos, reference, alternate)
        })
        .collect();
    format!("{{{}}}", entries.join(", "))
}
