//! Inverted intensity statistics over tissue pixels.
//!
//! Raw grayscale values are brightness: a darker pixel carries more stain.
//! Every location statistic is therefore reported as `255 - raw`, which also
//! swaps the order of the extremes and the quartiles:
//!
//! | reported | raw source             |
//! |----------|------------------------|
//! | average  | `255 - mean`           |
//! | max      | `255 - min`            |
//! | 75%      | `255 - 25th percentile`|
//! | median   | `255 - 50th percentile`|
//! | 25%      | `255 - 75th percentile`|
//! | min      | `255 - max`            |
//!
//! The standard deviation is a spread, not a location, and is reported raw
//! using the population formula.

use serde::Serialize;

/// Maximum 8-bit intensity, the pivot of the inversion.
pub const MAX_INTENSITY: f64 = 255.0;

/// Invert a raw brightness-derived value into a stain score.
#[inline]
pub fn invert(raw: f64) -> f64 {
    MAX_INTENSITY - raw
}

/// Summary statistics of a primary-stain intensity array.
///
/// All fields are `NaN` when the array was empty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntensityStatistics {
    pub average: f64,
    pub sd: f64,
    pub max: f64,
    pub p75: f64,
    pub median: f64,
    pub p25: f64,
    pub min: f64,
}

impl IntensityStatistics {
    /// Statistics with every field set to the undefined sentinel (`NaN`).
    pub fn undefined() -> Self {
        Self {
            average: f64::NAN,
            sd: f64::NAN,
            max: f64::NAN,
            p75: f64::NAN,
            median: f64::NAN,
            p25: f64::NAN,
            min: f64::NAN,
        }
    }

    /// Compute the inverted statistics of a raw grayscale intensity array.
    ///
    /// Order of `intensities` is irrelevant. An empty slice yields
    /// [`IntensityStatistics::undefined`].
    pub fn from_intensities(intensities: &[u8]) -> Self {
        if intensities.is_empty() {
            return Self::undefined();
        }

        let histogram = Histogram::from_values(intensities);
        let (mean, sd) = histogram.mean_and_population_sd();

        Self {
            average: invert(mean),
            sd,
            max: invert(histogram.min() as f64),
            p75: invert(histogram.percentile(25.0)),
            median: invert(histogram.percentile(50.0)),
            p25: invert(histogram.percentile(75.0)),
            min: invert(histogram.max() as f64),
        }
    }

    /// Whether the statistics were computed from at least one pixel.
    pub fn is_defined(&self) -> bool {
        !self.average.is_nan()
    }
}

impl Default for IntensityStatistics {
    fn default() -> Self {
        Self::undefined()
    }
}

// =============================================================================
// Histogram
// =============================================================================

/// 256-bin counting histogram of a non-empty u8 array.
///
/// Sorted-order queries walk the bins instead of sorting the pixels, so
/// memory stays constant regardless of the tissue area.
struct Histogram {
    bins: [u64; 256],
    len: u64,
}

impl Histogram {
    fn from_values(values: &[u8]) -> Self {
        let mut bins = [0u64; 256];
        for &v in values {
            bins[v as usize] += 1;
        }
        Self {
            bins,
            len: values.len() as u64,
        }
    }

    fn min(&self) -> u8 {
        self.bins.iter().position(|&c| c > 0).unwrap_or(0) as u8
    }

    fn max(&self) -> u8 {
        self.bins.iter().rposition(|&c| c > 0).unwrap_or(0) as u8
    }

    /// Value at position `rank` of the ascending sorted array.
    fn nth(&self, rank: u64) -> u8 {
        let mut seen = 0u64;
        for (value, &count) in self.bins.iter().enumerate() {
            seen += count;
            if seen > rank {
                return value as u8;
            }
        }
        self.max()
    }

    /// Percentile with linear interpolation between closest ranks.
    fn percentile(&self, p: f64) -> f64 {
        let position = p / 100.0 * (self.len - 1) as f64;
        let lower = position.floor();
        let fraction = position - lower;

        let lo = self.nth(lower as u64) as f64;
        if fraction == 0.0 {
            return lo;
        }
        let hi = self.nth(lower as u64 + 1) as f64;
        lo + (hi - lo) * fraction
    }

    /// Mean and population standard deviation (no Bessel correction).
    fn mean_and_population_sd(&self) -> (f64, f64) {
        let mut sum: u128 = 0;
        let mut sum_sq: u128 = 0;
        for (value, &count) in self.bins.iter().enumerate() {
            let v = value as u128;
            sum += v * count as u128;
            sum_sq += v * v * count as u128;
        }

        let n = self.len as u128;
        let mean = sum as f64 / n as f64;
        // n^2 * variance, exact in integers.
        let scaled_var = n * sum_sq - sum * sum;
        let sd = (scaled_var as f64).sqrt() / n as f64;
        (mean, sd)
    }
}

// =============================================================================
// Tests
// =============================================================================
