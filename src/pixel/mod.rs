//! Pixel-level building blocks shared by the classifiers.
//!
//! - [`Mask`]: boolean membership grid with the same shape as an image
//! - [`gray`] / [`to_gray`]: 8-bit RGB to grayscale intensity
//! - [`hsv`]: 8-bit RGB to hue/saturation/value

mod color;
mod mask;

pub use color::{gray, hsv, to_gray, Hsv, HUE_NORMALIZER, HUE_RANGE};
pub use mask::Mask;
