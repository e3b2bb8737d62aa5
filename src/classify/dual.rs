//! Paired-image classification.
//!
//! The sample arrives as two pixel-aligned renderings of the same region:
//! one showing only the primary stain, one showing only the counterstain.
//! Each is gray-thresholded on its own; the two are never combined per pixel.
//!
//! # Primary image
//!
//! ```text
//! tissue = gray < white_min  AND  NOT white  AND  NOT background
//! ```
//!
//! The tissue pixels' gray values form the intensity array.
//!
//! # Counterstain image
//!
//! White (`gray >= white_min`) and dark (`gray <= dark_max`) pixels are
//! blackened. A pixel is counterstain tissue when none of its channels is
//! zero after blackening and it is not dark. Only the count is used.

use image::{Rgb, RgbImage};
use tracing::trace;

use crate::pixel::{gray, Mask};
use crate::record::DualSampleRecord;
use crate::stats::{DualAreas, IntensityStatistics};

use super::background::is_background;
use super::StainClassifier;

/// Gray value at and above which a pixel counts as white.
pub const DEFAULT_WHITE_THRESHOLD: u8 = 250;

/// Gray value at and below which a counterstain pixel is ignored as dark.
pub const DEFAULT_DARK_THRESHOLD: u8 = 40;

// =============================================================================
// Input / Output
// =============================================================================

/// The two renderings of one paired sample.
#[derive(Debug, Clone)]
pub struct DualImages {
    /// Primary-stain (brown) rendering.
    pub primary: RgbImage,
    /// Counterstain (blue) rendering.
    pub counterstain: RgbImage,
}

impl DualImages {
    pub fn new(primary: RgbImage, counterstain: RgbImage) -> Self {
        Self {
            primary,
            counterstain,
        }
    }

    /// Whether both renderings have the same dimensions.
    pub fn is_aligned(&self) -> bool {
        self.primary.dimensions() == self.counterstain.dimensions()
    }
}

/// Masks of the primary-stain rendering.
#[derive(Debug, Clone)]
pub struct PrimaryMasks {
    pub background: Mask,
    pub white: Mask,
    pub tissue: Mask,
    /// Gray values of the tissue pixels, row-major.
    pub intensities: Vec<u8>,
}

/// Masks of the counterstain rendering.
#[derive(Debug, Clone)]
pub struct CounterstainMasks {
    pub white: Mask,
    pub dark: Mask,
    pub tissue: Mask,
}

/// Result of classifying one paired sample.
#[derive(Debug, Clone)]
pub struct DualClassification {
    pub primary: PrimaryMasks,
    pub counterstain: CounterstainMasks,
}

impl DualClassification {
    /// Primary area, counterstain area and counterstain image pixel count.
    pub fn areas(&self) -> DualAreas {
        DualAreas::new(
            self.primary.tissue.count(),
            self.counterstain.tissue.count(),
            self.counterstain.tissue.len(),
        )
    }

    /// Inverted intensity statistics of the primary tissue.
    pub fn statistics(&self) -> IntensityStatistics {
        IntensityStatistics::from_intensities(&self.primary.intensities)
    }
}

// =============================================================================
// Classifier
// =============================================================================

/// Gray-threshold classifier for paired primary/counterstain images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DualImageClassifier {
    white_min: u8,
    dark_max: u8,
}

impl DualImageClassifier {
    pub fn new() -> Self {
        Self::with_thresholds(DEFAULT_WHITE_THRESHOLD, DEFAULT_DARK_THRESHOLD)
    }

    /// Use custom white and dark gray thresholds (both inclusive).
    pub fn with_thresholds(white_min: u8, dark_max: u8) -> Self {
        Self {
            white_min,
            dark_max,
        }
    }

    pub fn white_threshold(&self) -> u8 {
        self.white_min
    }

    pub fn dark_threshold(&self) -> u8 {
        self.dark_max
    }

    #[inline]
    fn is_white(&self, gray: u8) -> bool {
        gray >= self.white_min
    }

    #[inline]
    fn is_dark(&self, gray: u8) -> bool {
        gray <= self.dark_max
    }

    /// Classify the primary-stain rendering.
    pub fn classify_primary(&self, image: &RgbImage) -> PrimaryMasks {
        let (width, height) = image.dimensions();
        let len = width as usize * height as usize;

        let mut background = Vec::with_capacity(len);
        let mut white = Vec::with_capacity(len);
        let mut tissue = Vec::with_capacity(len);
        let mut intensities = Vec::new();

        for &pixel in image.pixels() {
            let g = gray(pixel);
            let is_bg = is_background(pixel);
            let is_white = self.is_white(g);
            let is_tissue = g < self.white_min && !is_white && !is_bg;

            if is_tissue {
                intensities.push(g);
            }
            background.push(is_bg);
            white.push(is_white);
            tissue.push(is_tissue);
        }

        let masks = PrimaryMasks {
            background: Mask::from_vec(width, height, background),
            white: Mask::from_vec(width, height, white),
            tissue: Mask::from_vec(width, height, tissue),
            intensities,
        };
        trace!(
            tissue = masks.tissue.count(),
            background = masks.background.count(),
            "classified primary rendering"
        );
        masks
    }

    /// Classify the counterstain rendering.
    pub fn classify_counterstain(&self, image: &RgbImage) -> CounterstainMasks {
        let (width, height) = image.dimensions();
        let grays: Vec<u8> = image.pixels().map(|&p| gray(p)).collect();
        let at = |x: u32, y: u32| grays[y as usize * width as usize + x as usize];

        let white = Mask::from_fn(width, height, |x, y| self.is_white(at(x, y)));
        let dark = Mask::from_fn(width, height, |x, y| self.is_dark(at(x, y)));
        let tissue = Mask::from_fn(width, height, |x, y| {
            let blackened = if white.get(x, y) || dark.get(x, y) {
                Rgb([0, 0, 0])
            } else {
                *image.get_pixel(x, y)
            };
            blackened.0.iter().all(|&c| c != 0) && !dark.get(x, y)
        });

        trace!(
            tissue = tissue.count(),
            white = white.count(),
            dark = dark.count(),
            "classified counterstain rendering"
        );
        CounterstainMasks { white, dark, tissue }
    }
}

impl Default for DualImageClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl StainClassifier for DualImageClassifier {
    type Input = DualImages;
    type Classification = DualClassification;
    type Record = DualSampleRecord;

    fn classify(&self, input: &DualImages) -> DualClassification {
        DualClassification {
            primary: self.classify_primary(&input.primary),
            counterstain: self.classify_counterstain(&input.counterstain),
        }
    }

    fn record(&self, sample_id: &str, classification: &DualClassification) -> DualSampleRecord {
        DualSampleRecord::new(
            sample_id,
            &classification.statistics(),
            &classification.areas(),
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
