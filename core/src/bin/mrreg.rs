use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use mrseq_core::cli::setup_logging;
use mrseq_core::registration::{ElastixRegistrar, Registrar};
use std::path::PathBuf;
use std::process;

/// Rigidly register a moving NIfTI volume onto a fixed one
#[derive(Parser, Debug)]
#[command(name = "mrreg")]
#[command(about = "Rigid registration of two NIfTI volumes with elastix")]
#[command(version)]
struct Cli {
    /// Fixed volume, e.g. T1_ax.nii
    #[arg(value_name = "FIXED")]
    fixed: PathBuf,

    /// Moving volume, e.g. T2_ax.nii
    #[arg(value_name = "MOVING")]
    moving: PathBuf,

    /// Directory receiving the parameter map, transform and resampled image
    #[arg(value_name = "OUTPUT_DIR")]
    output_dir: PathBuf,

    /// Path to the elastix executable
    #[arg(long, default_value = "elastix")]
    elastix: PathBuf,

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
    let registrar = ElastixRegistrar::new(&cli.elastix);
    let outcome = registrar
        .register(&cli.fixed, &cli.moving, &cli.output_dir)
        .and_then(|outcome| outcome.into_result())
        .with_context(|| {
            format!(
                "failed to register {} onto {}",
                cli.moving.display(),
                cli.fixed.display()
            )
        })?;

    if let Some(transform) = &outcome.transform_parameters {
        info!("Transform parameters: {}", transform.display());
    }
    if let Some(image) = &outcome.result_image {
        info!("Registered image: {}", image.display());
    }
    Ok(())
}
