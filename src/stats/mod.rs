//! Metrics computed from classified pixels.
//!
//! - [`IntensityStatistics`]: inverted location statistics plus raw spread
//! - [`DualAreas`] / [`HueBandAreas`]: pixel-count areas and the primary
//!   stain proportion for each strategy

mod area;
mod intensity;

pub use area::{proportion, DualAreas, HueBandAreas};
pub use intensity::{invert, IntensityStatistics, MAX_INTENSITY};
