//! Fixed-point color conversions for 8-bit RGB pixels.
//!
//! Both conversions reproduce the integer arithmetic used by the common
//! 8-bit image toolkits that the input images are usually exported from,
//! so that threshold decisions land on exactly the same pixels.
//!
//! - [`gray`]: ITU-R BT.601 luma, 14-bit fixed point
//! - [`hsv`]: 8-bit HSV with hue in `[0, 180)`, 12-bit fixed point

use image::{GrayImage, Luma, Rgb, RgbImage};

// =============================================================================
// Grayscale
// =============================================================================

const GRAY_SHIFT: u32 = 14;
const GRAY_R: u32 = 4899;
const GRAY_G: u32 = 9617;
const GRAY_B: u32 = 1868;

/// Grayscale intensity of a single pixel.
///
/// `Y = 0.299 R + 0.587 G + 0.114 B`, rounded half up in 14-bit fixed point.
#[inline]
pub fn gray(pixel: Rgb<u8>) -> u8 {
    let [r, g, b] = pixel.0;
    let y = r as u32 * GRAY_R + g as u32 * GRAY_G + b as u32 * GRAY_B + (1 << (GRAY_SHIFT - 1));
    (y >> GRAY_SHIFT) as u8
}

/// Convert a whole image to a single grayscale channel.
pub fn to_gray(image: &RgbImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([gray(*image.get_pixel(x, y))])
    })
}

// =============================================================================
// HSV
// =============================================================================

/// Upper bound of the 8-bit hue scale (hue values lie in `0..HUE_RANGE`).
pub const HUE_RANGE: i32 = 180;

/// Divisor used to normalize 8-bit hue into `[0, 1]`.
pub const HUE_NORMALIZER: f64 = 179.0;

const HSV_SHIFT: u32 = 12;

/// Hue/saturation/value triple in 8-bit convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsv {
    /// Hue in `[0, 180)`.
    pub h: u8,
    /// Saturation in `[0, 255]`.
    pub s: u8,
    /// Value (max channel) in `[0, 255]`.
    pub v: u8,
}

impl Hsv {
    /// Hue normalized to `[0, 1]` by dividing by 179.
    #[inline]
    pub fn normalized_hue(&self) -> f64 {
        self.h as f64 / HUE_NORMALIZER
    }
}

struct DivTables {
    sat: [i32; 256],
    hue: [i32; 256],
}

fn div_tables() -> &'static DivTables {
    static TABLES: std::sync::OnceLock<DivTables> = std::sync::OnceLock::new();
    TABLES.get_or_init(|| {
        let mut sat = [0i32; 256];
        let mut hue = [0i32; 256];
        for i in 1..256 {
            sat[i] = (((255 << HSV_SHIFT) as f64) / i as f64).round() as i32;
            hue[i] = (((HUE_RANGE << HSV_SHIFT) as f64) / (6.0 * i as f64)).round() as i32;
        }
        DivTables { sat, hue }
    })
}

/// Convert a single pixel to 8-bit HSV.
pub fn hsv(pixel: Rgb<u8>) -> Hsv {
    let tables = div_tables();
    let [r, g, b] = pixel.0.map(i32::from);

    let v = r.max(g).max(b);
    let vmin = r.min(g).min(b);
    let diff = v - vmin;
    let round = 1 << (HSV_SHIFT - 1);

    let s = (diff * tables.sat[v as usize] + round) >> HSV_SHIFT;

    // Red wins ties over green, green over blue.
    let h = if v == r {
        g - b
    } else if v == g {
        b - r + 2 * diff
    } else {
        r - g + 4 * diff
    };
    let mut h = (h * tables.hue[diff as usize] + round) >> HSV_SHIFT;
    if h < 0 {
        h += HUE_RANGE;
    }

    Hsv {
        h: h as u8,
        s: s as u8,
        v: v as u8,
    }
}

// =============================================================================
// Tests
// =============================================================================
