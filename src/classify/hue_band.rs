//! Single-image classification by hue band.
//!
//! Counterstain is separated by hue; primary stain is whatever survives.
//!
//! 1. Background: near-white or black pixels of the original image.
//! 2. Counterstain band: normalized hue strictly inside `(min, max)`.
//! 3. A working copy is painted white wherever (1) or (2) holds, then
//!    converted to gray.
//! 4. Primary stain: every working-copy pixel whose gray value is not 255.
//!
//! Step 4 is an elimination, not a positive color test. A pixel is primary
//! stain only because it was not painted white and does not happen to be
//! white already.

use image::{Rgb, RgbImage};
use tracing::trace;

use crate::pixel::{gray, hsv, Mask};
use crate::record::HueBandSampleRecord;
use crate::stats::{HueBandAreas, IntensityStatistics};

use super::background::background_mask;
use super::StainClassifier;

/// Lower exclusive bound of the counterstain hue band.
pub const DEFAULT_HUE_MIN: f64 = 0.232;

/// Upper exclusive bound of the counterstain hue band.
pub const DEFAULT_HUE_MAX: f64 = 0.956;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Open interval of normalized hue values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HueBand {
    pub min: f64,
    pub max: f64,
}

impl HueBand {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether `hue` lies strictly between the bounds.
    #[inline]
    pub fn contains(&self, hue: f64) -> bool {
        hue > self.min && hue < self.max
    }
}

impl Default for HueBand {
    fn default() -> Self {
        Self::new(DEFAULT_HUE_MIN, DEFAULT_HUE_MAX)
    }
}

/// Result of classifying one image by hue band.
#[derive(Debug, Clone)]
pub struct HueBandClassification {
    /// Empty-slide pixels of the original image.
    pub background: Mask,
    /// Counterstain: hue strictly inside the band, background or not.
    ///
    /// May overlap `background`; both are painted white and neither is
    /// ever primary.
    pub counterstain: Mask,
    /// Pixels that survived whitening.
    pub primary: Mask,
    /// Gray values of the primary pixels, row-major.
    pub intensities: Vec<u8>,
    /// Original image with every non-tissue pixel painted white.
    pub working_image: RgbImage,
}

impl HueBandClassification {
    /// Areas as counted from the masks. A near-white pixel with a hue in
    /// the band counts as counterstain even though it is also background.
    pub fn areas(&self) -> HueBandAreas {
        HueBandAreas::new(
            self.primary.count(),
            self.counterstain.count(),
            self.primary.len(),
        )
    }

    pub fn statistics(&self) -> IntensityStatistics {
        IntensityStatistics::from_intensities(&self.intensities)
    }

    /// Release the masks and keep only the whited-out image.
    pub fn into_working_image(self) -> RgbImage {
        self.working_image
    }
}

/// Hue-band classifier for single color images.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HueBandClassifier {
    band: HueBand,
}

impl HueBandClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_band(band: HueBand) -> Self {
        Self { band }
    }

    pub fn band(&self) -> HueBand {
        self.band
    }

    /// Hue-band membership of every pixel.
    pub fn hue_band_mask(&self, image: &RgbImage) -> Mask {
        Mask::from_pixels(image, |p| self.band.contains(hsv(p).normalized_hue()))
    }
}

impl StainClassifier for HueBandClassifier {
    type Input = RgbImage;
    type Classification = HueBandClassification;
    type Record = HueBandSampleRecord;

    fn classify(&self, image: &RgbImage) -> HueBandClassification {
        let (width, height) = image.dimensions();

        let background = background_mask(image);
        let counterstain = self.hue_band_mask(image);
        let non_tissue = background.union(&counterstain);

        let mut working_image = image.clone();
        for (pixel, &remove) in working_image.pixels_mut().zip(non_tissue.as_slice()) {
            if remove {
                *pixel = WHITE;
            }
        }

        let mut primary = Vec::with_capacity(non_tissue.len());
        let mut intensities = Vec::new();
        for &pixel in working_image.pixels() {
            let g = gray(pixel);
            let survived = g != u8::MAX;
            if survived {
                intensities.push(g);
            }
            primary.push(survived);
        }
        let primary = Mask::from_vec(width, height, primary);

        trace!(
            primary = primary.count(),
            counterstain = counterstain.count(),
            background = background.count(),
            "classified by hue band"
        );

        HueBandClassification {
            background,
            counterstain,
            primary,
            intensities,
            working_image,
        }
    }

    fn record(
        &self,
        sample_id: &str,
        classification: &HueBandClassification,
    ) -> HueBandSampleRecord {
        HueBandSampleRecord::new(
            sample_id,
            &classification.statistics(),
            &classification.areas(),
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
