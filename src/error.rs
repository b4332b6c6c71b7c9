//! Error types for cdiff-qc.
//!
//! Field-level extraction problems inside the report recognizers are never
//! errors: they resolve to the documented sentinels (`"-"`, `"0"`,
//! `"Unknown"`). `CdiffError` covers the failures that must stop a run:
//! unreadable files, malformed producer inputs, and broken typing databases.

use thiserror::Error;

/// Main error type for cdiff-qc operations.
#[derive(Error, Debug)]
pub enum CdiffError {
    /// File I/O error with the path involved.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Structured output could not be serialized.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A TRST type pattern references a repeat fragment that is not in the
    /// fragment table. The producer must halt: a composed type sequence with
    /// a hole in it would make every downstream match meaningless.
    #[error("repeat fragment not found in {file}: {fragment}")]
    FragmentNotFound { file: String, fragment: String },

    /// A line in one of the producer inputs (BED intervals, VCF, coverage
    /// table, typing database) does not match its fixed column contract.
    #[error("malformed {kind} line in {path}: {line}")]
    MalformedLine {
        kind: &'static str,
        path: String,
        line: String,
    },
}

impl CdiffError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        CdiffError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(
        kind: &'static str,
        path: impl Into<String>,
        line: impl Into<String>,
    ) -> Self {
        CdiffError::MalformedLine {
            kind,
            path: path.into(),
            line: line.into(),
        }
    }
}
