//! stain-quant - Stain coverage quantification for histology images.
//!
//! This binary discovers samples, runs the chosen classification strategy
//! over them and writes the result table.

use clap::Parser;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stain_quant::{
    batch::ArtifactEncoder,
    config::{Cli, Command, DualConfig, HueConfig, RunOptions},
    discover_dual, discover_single, write_report, ArtifactWriter, BatchError, BatchRunner,
    BatchSummary, DualImageClassifier, FsImageSource, HueBandClassifier, SampleRecord,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Command::Dual(config) => run_dual(config).await,
        Command::Hue(config) => run_hue(config).await,
    }
}

// =============================================================================
// Dual Command
// =============================================================================

async fn run_dual(config: DualConfig) -> ExitCode {
    init_logging(config.run.verbose);

    if let Err(e) = config.validate() {
        error!("{}", BatchError::Config(e));
        return ExitCode::FAILURE;
    }

    info!("Paired-image quantification");
    info!("  Input: {}", config.input.display());
    info!(
        "  Renderings: \"<sample> {}.{}\" / \"<sample> {}.{}\"",
        config.primary_suffix, config.extension, config.counterstain_suffix, config.extension
    );
    info!(
        "  Thresholds: white >= {}, dark <= {}",
        config.white_threshold, config.dark_threshold
    );

    let samples = match discover_dual(&config.input, &config.layout()).await {
        Ok(samples) => samples,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("  Found {} sample folder(s)", samples.len());

    let started = Instant::now();
    let runner = BatchRunner::new(FsImageSource::new(), config.run.jobs());
    let classifier =
        DualImageClassifier::with_thresholds(config.white_threshold, config.dark_threshold);
    let summary = runner.run_dual(samples, classifier).await;

    finish(&config.run, summary, started)
}

// =============================================================================
// Hue Command
// =============================================================================

async fn run_hue(config: HueConfig) -> ExitCode {
    init_logging(config.run.verbose);

    if let Err(e) = config.validate() {
        error!("{}", BatchError::Config(e));
        return ExitCode::FAILURE;
    }

    info!("Hue-band quantification");
    info!("  Input: {}", config.input.display());
    info!("  Counterstain hue band: ({}, {})", config.hue_min, config.hue_max);
    match config.artifact_dir {
        Some(ref dir) => info!("  Processed images: {}", dir.display()),
        None => info!("  Processed images: not written"),
    }

    let samples = match discover_single(&config.input).await {
        Ok(samples) => samples,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("  Found {} image(s)", samples.len());

    let artifacts = config.artifact_dir.as_ref().map(|dir| {
        ArtifactWriter::with_encoder(dir, ArtifactEncoder::with_quality(config.jpeg_quality))
    });

    let started = Instant::now();
    let runner = BatchRunner::new(FsImageSource::new(), config.run.jobs());
    let classifier = HueBandClassifier::with_band(config.band());
    let summary = runner.run_hue_band(samples, classifier, artifacts).await;

    if summary.artifact_failures > 0 {
        warn!(
            "{} processed image(s) could not be written",
            summary.artifact_failures
        );
    }

    finish(&config.run, summary, started)
}

// =============================================================================
// Shared
// =============================================================================

/// Write the result table and report the batch outcome.
fn finish<R: SampleRecord>(
    run: &RunOptions,
    summary: BatchSummary<R>,
    started: Instant,
) -> ExitCode {
    info!(
        "Processed {} sample(s), skipped {} in {:.2?}",
        summary.processed,
        summary.skipped,
        started.elapsed()
    );

    if let Err(e) = write_report(&run.output, run.report_format(), &summary.records) {
        error!("{}", e);
        return ExitCode::FAILURE;
    }
    info!("Results saved to {}", run.output.display());

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "stain_quant=debug"
    } else {
        "stain_quant=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
