// SPDX-License-Identifier: MIT

//! cdiff-qc CLI
//!
//! One subcommand per pipeline stage: gene/indel extraction, TRST typing,
//! report parsing, and batch summarization.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use cdiff_qc::{
    append_csv_row, extract_genes, parse_report_file, run_typing, summarize, write_csv_header,
    write_json, CdiffError,
};

#[derive(Parser)]
#[command(name = "cdiff-qc")]
#[command(author, version, about = "C. difficile QC pipeline tools")]
#[command(
    long_about = "Extract gene/indel info from a VCF, type tandem repeats against a TRST \
database, parse the concatenated diagnostic report into CSV + JSON, and summarize batches.

Examples:
  cdiff-qc extract-genes -i sample.indel.vcf -c sample.coverage -b intervals.bed -o sample
  cdiff-qc trst -i contigs.fsa --db trstdb -o sample_trst.txt
  cdiff-qc parse-report -r report.txt -w WGS42 -o output
  cdiff-qc summarize -i runs/batch1 -o summaries"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a report file into a per-sample CSV row and JSON record
    ParseReport {
        /// Report file (concatenated upstream output)
        #[arg(short, long)]
        report_file: PathBuf,

        /// Sample-set label recorded in the WGS column
        #[arg(short, long, default_value = "NA")]
        wgsnumber: String,

        /// Sequence-type string recorded in the ST/STalleles columns
        #[arg(short, long, default_value = "ST;NA:NA")]
        stbit: String,

        /// Output directory for <sample>.csv and <sample>.json
        #[arg(short, long, default_value = "output")]
        output_dir: PathBuf,
    },

    /// Extract gene presence, coverage and indels from a VCF
    ExtractGenes {
        /// Indel VCF for the sample
        #[arg(short, long)]
        indelvcf: PathBuf,

        /// Per-position coverage table
        #[arg(short, long)]
        covfile: PathBuf,

        /// BED-like interval file (<ref> <start> <end> <gene>)
        #[arg(short = 'b', long)]
        intervalsbed: PathBuf,

        /// Output prefix; one <prefix>_<gene>.info file per interval
        #[arg(short, long)]
        outputname: String,
    },

    /// Type tandem repeats against a TRST database
    Trst {
        /// Assembled contigs (FASTA-like, single header line)
        #[arg(short = 'i', long)]
        contigs: PathBuf,

        /// TRST database directory
        #[arg(long = "db")]
        trstdb: PathBuf,

        /// Output file for the typing block
        #[arg(short, long)]
        outfile: PathBuf,
    },

    /// Concatenate per-sample CSV files keeping one header
    Summarize {
        /// Directory of per-sample subdirectories
        #[arg(short, long, default_value = "input")]
        input_dir: PathBuf,

        /// Directory for the combined CSV
        #[arg(short, long, default_value = "output")]
        output_dir: PathBuf,
    },
}

fn run(cli: Cli) -> Result<(), CdiffError> {
    match cli.command {
        Commands::ParseReport {
            report_file,
            wgsnumber,
            stbit,
            output_dir,
        } => {
            let record = parse_report_file(&report_file, &stbit, &wgsnumber)?;
            fs::create_dir_all(&output_dir)
                .map_err(|e| CdiffError::io(output_dir.display().to_string(), e))?;
            let csv_path = output_dir.join(format!("{}.csv", record.name));
            write_csv_header(&csv_path)?;
            append_csv_row(&csv_path, &record)?;
            write_json(&output_dir.join(format!("{}.json", record.name)), &record)?;
            Ok(())
        }
        Commands::ExtractGenes {
            indelvcf,
            covfile,
            intervalsbed,
            outputname,
        } => extract_genes(&indelvcf, &covfile, &intervalsbed, &outputname),
        Commands::Trst {
            contigs,
            trstdb,
            outfile,
        } => run_typing(&contigs, &trstdb, &outfile),
        Commands::Summarize {
            input_dir,
            output_dir,
        } => summarize(&input_dir, &output_dir),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
