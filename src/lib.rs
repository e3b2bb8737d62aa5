//! # stain-quant
//!
//! Stain coverage quantification for exported histology images.
//!
//! Given a stained tissue image (or a primary-stain and counterstain pair of
//! renderings), every pixel is classified as background, primary-stain
//! tissue or counterstain tissue. Each sample then yields one record with
//! inverted intensity statistics and area proportions.
//!
//! ## Strategies
//!
//! - **Paired images** ([`DualImageClassifier`]): two aligned renderings,
//!   each gray-thresholded on its own
//! - **Hue band** ([`HueBandClassifier`]): one color image; counterstain is
//!   a hue band, primary stain is what remains after removing background
//!   and counterstain
//!
//! ## Architecture
//!
//! - [`pixel`] - Masks and 8-bit color conversions
//! - [`classify`] - Background rule and both classification strategies
//! - [`stats`] - Intensity statistics and area metrics
//! - [`record`] - Per-sample result rows
//! - [`batch`] - Sample discovery, image loading, artifacts, concurrent runner
//! - [`report`] - CSV / JSON table writers
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust
//! use image::{Rgb, RgbImage};
//! use stain_quant::{HueBandClassifier, StainClassifier};
//!
//! let image = RgbImage::from_pixel(4, 4, Rgb([150, 100, 50]));
//! let record = HueBandClassifier::new().measure("sample.png", &image);
//!
//! assert_eq!(record.brown_area, 16);
//! assert_eq!(record.blue_pixel_area, 0);
//! assert_eq!(record.brown_percentage, 100.0);
//! ```

pub mod batch;
pub mod classify;
pub mod config;
pub mod error;
pub mod pixel;
pub mod record;
pub mod report;
pub mod stats;

// Re-export commonly used types
pub use batch::{
    discover_dual, discover_single, ArtifactWriter, BatchRunner, BatchSummary, DualLayout,
    DualSample, FsImageSource, ImageSource, SingleSample,
};
pub use classify::{
    background_mask, is_background, DualClassification, DualImageClassifier, DualImages, HueBand,
    HueBandClassification, HueBandClassifier, StainClassifier,
};
pub use config::{Cli, Command, DualConfig, HueConfig, RunOptions};
pub use error::{BatchError, SampleError};
pub use pixel::Mask;
pub use record::{DualSampleRecord, HueBandSampleRecord, SampleRecord};
pub use report::{write_records, write_report, ReportFormat};
pub use stats::{DualAreas, HueBandAreas, IntensityStatistics};
