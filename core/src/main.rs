use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use mrseq_core::cli::{setup_logging, Cli, OutputFormat};
use mrseq_core::{ClassifierConfig, ExtractOptions, SequenceExtractor, TextReport};
use std::process;

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let classifier = match &cli.rules {
        Some(path) => {
            info!("Loading classification rules from {}", path.display());
            ClassifierConfig::from_json_file(path)
                .with_context(|| format!("failed to load rules from {}", path.display()))?
        }
        None => ClassifierConfig::default(),
    };

    let options = ExtractOptions {
        json_name: cli.json.clone(),
        classifier,
        scratch_dir: cli.scratch.clone(),
        policy: cli.on_failure.into(),
        ..Default::default()
    };

    let summary = SequenceExtractor::create_nii(&cli.input, &cli.output, &options)
        .with_context(|| format!("failed to process {}", cli.input.display()))?;

    for failed in summary.report.failed() {
        warn!(
            "{} ({}) was not converted: {}",
            failed.role,
            failed.series,
            failed.error.as_deref().unwrap_or("unknown error")
        );
    }

    match cli.format {
        OutputFormat::Text => print!("{}", TextReport::new(&summary)),
        OutputFormat::Json => {
            let json = serde_json::json!({
                "sequences": summary.index,
                "classification": summary.classification,
                "outcomes": summary.report.outcomes,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}
