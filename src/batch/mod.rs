//! Batch processing around the classification core.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        discover (folder layouts)        │
//! └────────────────────┬────────────────────┘
//!                      │ samples
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │               BatchRunner               │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │ ImageSource  │  │ ArtifactWriter  │  │
//! │  │ (decode)     │  │ (hue band only) │  │
//! │  └──────────────┘  └─────────────────┘  │
//! └────────────────────┬────────────────────┘
//!                      │ records
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │          report (CSV / JSON)            │
//! └─────────────────────────────────────────┘
//! ```

mod artifact;
mod discover;
mod runner;
mod source;

pub use artifact::{
    ArtifactEncoder, ArtifactWriter, ARTIFACT_SUFFIX, DEFAULT_ARTIFACT_JPEG_QUALITY,
};
pub use discover::{
    discover_dual, discover_single, is_single_image_name, DualLayout, DualSample, SingleSample,
    DEFAULT_COUNTERSTAIN_SUFFIX, DEFAULT_PAIRED_EXTENSION, DEFAULT_PRIMARY_SUFFIX,
    SINGLE_IMAGE_EXTENSIONS,
};
pub use runner::{BatchRunner, BatchSummary};
pub use source::{decode_rgb, FsImageSource, ImageSource};
