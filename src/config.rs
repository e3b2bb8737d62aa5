//! Configuration management for stain-quant.
//!
//! Every option can be given on the command line or through an environment
//! variable with the `STAIN_` prefix. Thresholds default to the values the
//! classifiers were calibrated with.
//!
//! # Example
//!
//! ```ignore
//! use clap::Parser;
//! use stain_quant::config::{Cli, Command};
//!
//! let cli = Cli::parse();
//! match cli.command {
//!     Command::Dual(config) => println!("paired samples under {}", config.input.display()),
//!     Command::Hue(config) => println!("images in {}", config.input.display()),
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `STAIN_INPUT` - Input directory
//! - `STAIN_OUTPUT` - Result table path
//! - `STAIN_FORMAT` - `csv` or `json` (default: from the output extension)
//! - `STAIN_JOBS` - Samples processed concurrently (default: available cores)
//! - `STAIN_PRIMARY_SUFFIX` / `STAIN_COUNTERSTAIN_SUFFIX` / `STAIN_EXTENSION` - Paired naming
//! - `STAIN_WHITE_THRESHOLD` / `STAIN_DARK_THRESHOLD` - Paired gray thresholds
//! - `STAIN_ARTIFACT_DIR` - Where hue-band processed images go
//! - `STAIN_HUE_MIN` / `STAIN_HUE_MAX` - Counterstain hue band
//! - `STAIN_JPEG_QUALITY` - JPEG quality of artifacts

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::batch::{
    DualLayout, DEFAULT_ARTIFACT_JPEG_QUALITY, DEFAULT_COUNTERSTAIN_SUFFIX,
    DEFAULT_PAIRED_EXTENSION, DEFAULT_PRIMARY_SUFFIX,
};
use crate::classify::{
    HueBand, DEFAULT_DARK_THRESHOLD, DEFAULT_HUE_MAX, DEFAULT_HUE_MIN, DEFAULT_WHITE_THRESHOLD,
};
use crate::report::ReportFormat;

// =============================================================================
// CLI Arguments
// =============================================================================

/// stain-quant - Stain coverage quantification for histology images.
///
/// Classifies every pixel into background, primary stain or counterstain
/// and writes intensity and area metrics per sample to a table.
#[derive(Parser, Debug, Clone)]
#[command(name = "stain-quant")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Quantify paired primary/counterstain renderings, one folder per sample
    Dual(DualConfig),

    /// Quantify single color images by counterstain hue band
    Hue(HueConfig),
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct RunOptions {
    /// Result table path (.csv or .json).
    #[arg(short, long, env = "STAIN_OUTPUT")]
    pub output: PathBuf,

    /// Table format. Inferred from the output extension when omitted.
    #[arg(long, value_enum, env = "STAIN_FORMAT")]
    pub format: Option<ReportFormat>,

    /// Number of samples processed concurrently.
    ///
    /// Each in-flight sample holds its decoded images in memory.
    #[arg(short, long, env = "STAIN_JOBS")]
    pub jobs: Option<usize>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl RunOptions {
    pub fn validate(&self) -> Result<(), String> {
        if self.output.as_os_str().is_empty() {
            return Err("Output path is required. Set --output or STAIN_OUTPUT".to_string());
        }
        if self.jobs == Some(0) {
            return Err("jobs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Table format, explicit or inferred from the output path.
    pub fn report_format(&self) -> ReportFormat {
        self.format
            .unwrap_or_else(|| ReportFormat::from_path(&self.output))
    }

    /// Concurrency limit, defaulting to the number of available cores.
    pub fn jobs(&self) -> usize {
        self.jobs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

// =============================================================================
// Dual Command
// =============================================================================

/// Configuration for the paired-image strategy.
#[derive(Args, Debug, Clone)]
pub struct DualConfig {
    /// Root directory containing one folder per sample.
    #[arg(short, long, env = "STAIN_INPUT")]
    pub input: PathBuf,

    /// Filename suffix of the primary-stain rendering.
    #[arg(long, default_value = DEFAULT_PRIMARY_SUFFIX, env = "STAIN_PRIMARY_SUFFIX")]
    pub primary_suffix: String,

    /// Filename suffix of the counterstain rendering.
    #[arg(long, default_value = DEFAULT_COUNTERSTAIN_SUFFIX, env = "STAIN_COUNTERSTAIN_SUFFIX")]
    pub counterstain_suffix: String,

    /// Extension of both renderings.
    #[arg(long, default_value = DEFAULT_PAIRED_EXTENSION, env = "STAIN_EXTENSION")]
    pub extension: String,

    /// Gray value at and above which a pixel is white.
    #[arg(long, default_value_t = DEFAULT_WHITE_THRESHOLD, env = "STAIN_WHITE_THRESHOLD")]
    pub white_threshold: u8,

    /// Gray value at and below which a counterstain pixel is ignored.
    #[arg(long, default_value_t = DEFAULT_DARK_THRESHOLD, env = "STAIN_DARK_THRESHOLD")]
    pub dark_threshold: u8,

    #[command(flatten)]
    pub run: RunOptions,
}

impl DualConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        self.run.validate()?;

        if self.primary_suffix.is_empty() || self.counterstain_suffix.is_empty() {
            return Err("Rendering suffixes must not be empty".to_string());
        }
        if self.primary_suffix == self.counterstain_suffix {
            return Err("Primary and counterstain suffixes must differ".to_string());
        }
        if self.extension.is_empty() || self.extension.starts_with('.') {
            return Err("extension must be given without a leading dot, e.g. jpg".to_string());
        }
        if self.dark_threshold >= self.white_threshold {
            return Err(format!(
                "dark_threshold ({}) must be below white_threshold ({})",
                self.dark_threshold, self.white_threshold
            ));
        }
        Ok(())
    }

    pub fn layout(&self) -> DualLayout {
        DualLayout {
            primary_suffix: self.primary_suffix.clone(),
            counterstain_suffix: self.counterstain_suffix.clone(),
            extension: self.extension.clone(),
        }
    }
}

// =============================================================================
// Hue Command
// =============================================================================

/// Configuration for the single-image hue-band strategy.
#[derive(Args, Debug, Clone)]
pub struct HueConfig {
    /// Directory containing the images (.png, .jpg, .jpeg).
    #[arg(short, long, env = "STAIN_INPUT")]
    pub input: PathBuf,

    /// Directory for processed images with background and counterstain
    /// painted white. No artifacts are written when omitted.
    #[arg(long, env = "STAIN_ARTIFACT_DIR")]
    pub artifact_dir: Option<PathBuf>,

    /// Lower exclusive bound of the counterstain hue band (0-1).
    #[arg(long, default_value_t = DEFAULT_HUE_MIN, env = "STAIN_HUE_MIN")]
    pub hue_min: f64,

    /// Upper exclusive bound of the counterstain hue band (0-1).
    #[arg(long, default_value_t = DEFAULT_HUE_MAX, env = "STAIN_HUE_MAX")]
    pub hue_max: f64,

    /// JPEG quality of processed images (1-100).
    #[arg(long, default_value_t = DEFAULT_ARTIFACT_JPEG_QUALITY, env = "STAIN_JPEG_QUALITY")]
    pub jpeg_quality: u8,

    #[command(flatten)]
    pub run: RunOptions,
}

impl HueConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        self.run.validate()?;

        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if !in_unit(self.hue_min) || !in_unit(self.hue_max) {
            return Err("hue_min and hue_max must be between 0 and 1".to_string());
        }
        if self.hue_min >= self.hue_max {
            return Err(format!(
                "hue_min ({}) must be below hue_max ({})",
                self.hue_min, self.hue_max
            ));
        }
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err("jpeg_quality must be between 1 and 100".to_string());
        }
        if let Some(dir) = &self.artifact_dir {
            if same_dir(dir, &self.input) {
                return Err("artifact_dir must differ from the input directory".to_string());
            }
        }
        Ok(())
    }

    pub fn band(&self) -> HueBand {
        HueBand::new(self.hue_min, self.hue_max)
    }
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

// =============================================================================
// Tests
// =============================================================================
