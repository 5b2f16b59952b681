pub mod report;

use crate::volume::FailurePolicy;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for mrseq
#[derive(Parser, Debug)]
#[command(name = "mrseq")]
#[command(about = "Select axial T1/T2/T1c MRI sequences from a DICOM study and convert them to NIfTI")]
#[command(version)]
pub struct Cli {
    /// Directory containing <prefix>.Seq<N>.Ser<M>.Img<K>.dcm slices
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output directory for the .nii volumes (created if missing)
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Also write the series table as JSON under this file name in OUTPUT
    #[arg(long, value_name = "NAME")]
    pub json: Option<String>,

    /// JSON file with classification rules replacing the built-in ones
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Scratch directory used during conversion (default: INPUT/Temp)
    #[arg(long, value_name = "DIR")]
    pub scratch: Option<PathBuf>,

    /// What to do when a sequence fails to convert
    #[arg(long, default_value = "abort")]
    pub on_failure: OnFailure,

    /// Output format of the final report
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Failure handling options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OnFailure {
    /// Stop at the first failed sequence
    Abort,
    /// Log the failure and continue with the next sequence
    Skip,
}

impl From<OnFailure> for FailurePolicy {
    fn from(arg: OnFailure) -> Self {
        match arg {
            OnFailure::Abort => FailurePolicy::Abort,
            OnFailure::Skip => FailurePolicy::SkipRole,
        }
    }
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}

/// Initializes env_logger at Info level, or Debug when verbose
pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}
