// SPDX-License-Identifier: MIT

//! cdiff-qc: C. difficile QC pipeline tooling.
//!
//! Three producers and one consumer around a line-oriented diagnostic
//! report: gene presence/coverage/indel extraction ([`genes`]),
//! tandem-repeat sequence typing ([`typing`]), parsing of the concatenated
//! report into a fixed-schema sample record ([`report`]), and batch
//! summarization of the per-sample tabular outputs ([`summary`]).
//!
//! # Example
//!
//! ```
//! use cdiff_qc::{parse_report, csv_row};
//! use std::io::Cursor;
//!
//! let report = "Strain: cdiff1\n\
//!               Found in tcdA:Gene is present;8130/8133;{}\n\
//!               Found in tcdB:Gene is not present;64/7101;{}\n";
//! let record = parse_report(Cursor::new(report), "<mem>", "ST;NA:NA", "NA").unwrap();
//! assert_eq!(record.name, "cdiff1");
//! assert_eq!(record.tcd_a, "+");
//! assert!(csv_row(&record).starts_with("cdiff1;-/-;+;-;"));
//! ```

pub mod error;
pub mod genes;
pub mod indel;
pub mod literal;
pub mod record;
pub mod report;
pub mod serialize;
pub mod summary;
pub mod typing;

pub use error::CdiffError;
pub use genes::extract_genes;
pub use record::{CoverageInfo, SampleRecord};
pub use report::{parse_report, parse_report_file, ReportLines};
pub use serialize::{append_csv_row, csv_row, write_csv_header, write_json, CSV_HEADER};
pub use summary::summarize;
pub use typing::run_typing;
