//! Empty-slide detection shared by every classification strategy.

use image::{Rgb, RgbImage};

use crate::pixel::Mask;

/// A channel value strictly above this is considered near-white.
pub const BACKGROUND_WHITE_THRESHOLD: u8 = 215;

/// Whether a pixel is empty slide: near-white on every channel, or pure black.
#[inline]
pub fn is_background(pixel: Rgb<u8>) -> bool {
    let channels = pixel.0;
    channels.iter().all(|&c| c > BACKGROUND_WHITE_THRESHOLD) || channels.iter().all(|&c| c == 0)
}

/// Background mask of a whole image.
pub fn background_mask(image: &RgbImage) -> Mask {
    Mask::from_pixels(image, is_background)
}
