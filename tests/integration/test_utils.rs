//! Test utilities for integration tests.
//!
//! Provides an in-memory image source with request tracking and helpers for
//! building synthetic stained images.

use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, Rgb, RgbImage};
use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use stain_quant::batch::ImageSource;
use stain_quant::error::SampleError;

// =============================================================================
// Reference colors
// =============================================================================

/// Brown (primary stain). Hue 15/179, outside the counterstain band.
pub const BROWN: Rgb<u8> = Rgb([150, 100, 50]);

/// Blue (counterstain). Hue 116/179, inside the counterstain band.
pub const BLUE: Rgb<u8> = Rgb([40, 60, 200]);

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

pub fn gray_px(v: u8) -> Rgb<u8> {
    Rgb([v, v, v])
}

// =============================================================================
// Mock Image Source
// =============================================================================

enum MockEntry {
    Image(RgbImage),
    Corrupt,
    Panic,
}

/// In-memory [`ImageSource`] keyed by path.
pub struct MockImageSource {
    entries: HashMap<PathBuf, MockEntry>,
    request_counts: Arc<RwLock<HashMap<PathBuf, usize>>>,
}

impl MockImageSource {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            request_counts: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn with_image(mut self, path: impl Into<PathBuf>, image: RgbImage) -> Self {
        self.entries.insert(path.into(), MockEntry::Image(image));
        self
    }

    /// Register a path that exists but cannot be decoded.
    pub fn with_corrupt(mut self, path: impl Into<PathBuf>) -> Self {
        self.entries.insert(path.into(), MockEntry::Corrupt);
        self
    }

    /// Register a path whose load panics, as a crashed worker would.
    pub fn with_panic(mut self, path: impl Into<PathBuf>) -> Self {
        self.entries.insert(path.into(), MockEntry::Panic);
        self
    }

    /// Shared handle to the per-path load counters.
    pub fn request_counts(&self) -> Arc<RwLock<HashMap<PathBuf, usize>>> {
        Arc::clone(&self.request_counts)
    }
}

impl Default for MockImageSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageSource for MockImageSource {
    async fn load(&self, path: &Path) -> Result<RgbImage, SampleError> {
        {
            let mut counts = self.request_counts.write().await;
            *counts.entry(path.to_path_buf()).or_insert(0) += 1;
        }

        match self.entries.get(path) {
            Some(MockEntry::Image(image)) => Ok(image.clone()),
            Some(MockEntry::Corrupt) => Err(SampleError::UnreadableImage {
                path: path.to_path_buf(),
                message: "corrupt test image".to_string(),
            }),
            Some(MockEntry::Panic) => panic!("worker crashed on {}", path.display()),
            None => Err(SampleError::MissingInput {
                path: path.to_path_buf(),
            }),
        }
    }
}

// =============================================================================
// Image builders
// =============================================================================

/// Image whose first `tissue` pixels (row-major) are `fg`, the rest `bg`.
pub fn image_with(width: u32, height: u32, tissue: u32, fg: Rgb<u8>, bg: Rgb<u8>) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        if y * width + x < tissue {
            fg
        } else {
            bg
        }
    })
}

/// A varied image covering background, brown, blue and in-between colors.
pub fn mixed_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| match (x + y * width) % 6 {
        0 => WHITE,
        1 => BLACK,
        2 => BROWN,
        3 => BLUE,
        4 => Rgb([(x * 37 % 256) as u8, (y * 53 % 256) as u8, ((x + y) * 11 % 256) as u8]),
        _ => Rgb([230, 235, 245]),
    })
}

pub fn encode_png(image: &RgbImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    encoder.encode_image(image).unwrap();
    buf
}

/// Check JPEG start and end markers.
pub fn is_valid_jpeg(data: &[u8]) -> bool {
    data.len() >= 4
        && data[0] == 0xFF
        && data[1] == 0xD8
        && data[data.len() - 2] == 0xFF
        && data[data.len() - 1] == 0xD9
}
