//! Per-pixel boolean masks.

use image::{Rgb, RgbImage};

/// A same-shape boolean grid over an image, stored row-major.
///
/// `true` marks membership of the pixel in whatever class the mask describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    /// Create an all-`false` mask.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width as usize * height as usize],
        }
    }

    /// Build a mask by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> bool) -> Self {
        let mut bits = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                bits.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            bits,
        }
    }

    /// Wrap row-major membership bits.
    ///
    /// # Panics
    ///
    /// Panics if `bits.len()` is not `width * height`.
    pub fn from_vec(width: u32, height: u32, bits: Vec<bool>) -> Self {
        assert_eq!(
            bits.len(),
            width as usize * height as usize,
            "mask length does not match its shape"
        );
        Self {
            width,
            height,
            bits,
        }
    }

    /// Build a mask by evaluating a pixel predicate over an image.
    pub fn from_pixels(image: &RgbImage, mut predicate: impl FnMut(Rgb<u8>) -> bool) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            bits: image.pixels().map(|p| predicate(*p)).collect(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of pixels covered by the mask grid.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Membership of the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the grid.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        assert!(x < self.width && y < self.height, "mask index out of bounds");
        self.bits[y as usize * self.width as usize + x as usize]
    }

    /// Number of `true` pixels.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Row-major view of the membership bits.
    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    /// Pixel-wise OR of two masks of the same shape.
    ///
    /// # Panics
    ///
    /// Panics if the shapes differ.
    pub fn union(&self, other: &Mask) -> Mask {
        self.zip_with(other, |a, b| a || b)
    }

    /// Whether any pixel is `true` in both masks.
    ///
    /// # Panics
    ///
    /// Panics if the shapes differ.
    pub fn intersects(&self, other: &Mask) -> bool {
        self.assert_same_shape(other);
        self.bits.iter().zip(&other.bits).any(|(&a, &b)| a && b)
    }

    fn zip_with(&self, other: &Mask, f: impl Fn(bool, bool) -> bool) -> Mask {
        self.assert_same_shape(other);
        Mask {
            width: self.width,
            height: self.height,
            bits: self
                .bits
                .iter()
                .zip(&other.bits)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        }
    }

    fn assert_same_shape(&self, other: &Mask) {
        assert_eq!(
            (self.width, self.height),
            (other.width, other.height),
            "mask shapes differ"
        );
    }
}
