//! Stain classification strategies.
//!
//! Every strategy turns decoded pixels into tissue masks and a primary-stain
//! intensity array, then folds those into a result row.
//!
//! ```text
//!                 ┌──────────────────┐
//!   image(s) ───▶ │  BackgroundMask  │  near-white or black
//!                 └────────┬─────────┘
//!                          ▼
//!        ┌─────────────────┴──────────────────┐
//!        ▼                                    ▼
//! ┌──────────────────────┐        ┌──────────────────────┐
//! │ DualImageClassifier  │        │  HueBandClassifier   │
//! │ (gray thresholds on  │        │ (hue band, primary   │
//! │  two renderings)     │        │  by elimination)     │
//! └──────────┬───────────┘        └──────────┬───────────┘
//!            └─────────────┬─────────────────┘
//!                          ▼
//!          IntensityStatistics + area metrics
//! ```
//!
//! Classification never fails. An image without tissue yields an empty
//! intensity array, which becomes `NaN` statistics in the record.

mod background;
mod dual;
mod hue_band;

pub use background::{background_mask, is_background, BACKGROUND_WHITE_THRESHOLD};
pub use dual::{
    CounterstainMasks, DualClassification, DualImageClassifier, DualImages, PrimaryMasks,
    DEFAULT_DARK_THRESHOLD, DEFAULT_WHITE_THRESHOLD,
};
pub use hue_band::{
    HueBand, HueBandClassification, HueBandClassifier, DEFAULT_HUE_MAX, DEFAULT_HUE_MIN,
};

use crate::record::SampleRecord;

/// A pixel classification strategy.
///
/// Implementations are stateless apart from their thresholds, so one value
/// can be shared across worker threads.
pub trait StainClassifier: Send + Sync + 'static {
    /// Decoded pixels of one sample.
    type Input: Send + 'static;

    /// Masks and intensities produced for one sample.
    type Classification: Send + 'static;

    /// Result row type.
    type Record: SampleRecord;

    /// Classify every pixel of the sample.
    fn classify(&self, input: &Self::Input) -> Self::Classification;

    /// Build the result row for a classified sample.
    fn record(&self, sample_id: &str, classification: &Self::Classification) -> Self::Record;

    /// Classify and build the row in one step.
    fn measure(&self, sample_id: &str, input: &Self::Input) -> Self::Record {
        let classification = self.classify(input);
        self.record(sample_id, &classification)
    }
}
