//! Area metrics derived from mask pixel counts.
//!
//! Pure arithmetic: the classifiers count pixels, these types turn the
//! counts into the per-strategy area and proportion fields. Every division
//! checks its denominator first, so the results are always finite.

/// `numerator / denominator * 100`, or `0.0` when the denominator is zero.
#[inline]
pub fn proportion(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64 * 100.0
}

/// Area metrics of the paired-image strategy.
///
/// The primary and counterstain counts come from two different images, so
/// `total_pixels` is the pixel count of the counterstain image alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DualAreas {
    pub primary: usize,
    pub counterstain: usize,
    pub total_pixels: usize,
}

impl DualAreas {
    pub fn new(primary: usize, counterstain: usize, total_pixels: usize) -> Self {
        Self {
            primary,
            counterstain,
            total_pixels,
        }
    }

    /// Primary share of all tissue pixels found in either image.
    pub fn proportion(&self) -> f64 {
        proportion(self.primary, self.primary + self.counterstain)
    }
}

/// Area metrics of the single-image hue-band strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HueBandAreas {
    pub primary: usize,
    pub counterstain: usize,
    pub total: usize,
}

impl HueBandAreas {
    pub fn new(primary: usize, counterstain: usize, total: usize) -> Self {
        Self {
            primary,
            counterstain,
            total,
        }
    }

    /// Primary plus counterstain pixels.
    pub fn total_tissue(&self) -> usize {
        self.primary + self.counterstain
    }

    /// Pixels that are neither primary nor counterstain.
    pub fn non_tissue(&self) -> usize {
        self.total.saturating_sub(self.total_tissue())
    }

    /// Primary share of the total tissue area.
    pub fn proportion(&self) -> f64 {
        proportion(self.primary, self.total_tissue())
    }
}
