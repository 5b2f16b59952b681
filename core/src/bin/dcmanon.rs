use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use mrseq_core::anonymize::{Anonymizer, RuleMapBuilder};
use mrseq_core::cli::setup_logging;
use std::path::PathBuf;
use std::process;

/// Remove or replace patient-identifying tags in DICOM files
#[derive(Parser, Debug)]
#[command(name = "dcmanon")]
#[command(about = "Anonymize a DICOM file or a directory of DICOM files")]
#[command(version)]
struct Cli {
    /// Path to the input DICOM file or a directory containing DICOM files
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Path to the output DICOM file or a directory that will contain the DICOM files
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// New Patient's Name and Patient ID
    #[arg(long, value_name = "ID")]
    id: Option<String>,

    /// Keep private tags (not supported yet: private tags are always removed)
    #[arg(long = "keepPrivateTags")]
    keep_private_tags: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.keep_private_tags {
        warn!("--keepPrivateTags is not supported, private tags will be removed");
    }

    let rules = RuleMapBuilder::new().maybe_identity(cli.id).build();
    let anonymizer = Anonymizer::new(rules);

    let written = anonymizer
        .anonymize_path(&cli.input, &cli.output)
        .with_context(|| format!("failed to anonymize {}", cli.input.display()))?;

    info!("Wrote {} anonymized file(s)", written.len());
    Ok(())
}
