//! Processed-image artifacts.
//!
//! The hue-band strategy produces a copy of each input with background and
//! counterstain painted white. Writing it next to the numbers lets a reviewer
//! eyeball what was counted as primary stain.
//!
//! The artifact keeps the input's extension, so `slide.jpg` becomes
//! `slide_processed.jpg` in the artifact directory.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage};

use crate::error::SampleError;

/// Default JPEG quality for artifacts (1-100).
pub const DEFAULT_ARTIFACT_JPEG_QUALITY: u8 = 95;

/// Suffix appended to the input file stem.
pub const ARTIFACT_SUFFIX: &str = "_processed";

// =============================================================================
// Encoder
// =============================================================================

/// Encodes working images into the input's container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactEncoder {
    jpeg_quality: u8,
}

impl ArtifactEncoder {
    pub fn new() -> Self {
        Self::with_quality(DEFAULT_ARTIFACT_JPEG_QUALITY)
    }

    /// Create an encoder with the given JPEG quality, clamped to 1-100.
    pub fn with_quality(jpeg_quality: u8) -> Self {
        Self {
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    /// Encode `image` as `format`.
    ///
    /// JPEG uses the configured quality; every other format is written with
    /// the codec's defaults.
    pub fn encode(&self, image: &RgbImage, format: ImageFormat) -> Result<Bytes, String> {
        let mut output = Vec::new();
        if format == ImageFormat::Jpeg {
            let mut encoder = JpegEncoder::new_with_quality(&mut output, self.jpeg_quality);
            encoder.encode_image(image).map_err(|e| e.to_string())?;
        } else {
            image
                .write_to(&mut Cursor::new(&mut output), format)
                .map_err(|e| e.to_string())?;
        }
        Ok(Bytes::from(output))
    }
}

impl Default for ArtifactEncoder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Writer
// =============================================================================

/// Writes encoded artifacts into a directory.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    dir: PathBuf,
    encoder: ArtifactEncoder,
}

impl ArtifactWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_encoder(dir, ArtifactEncoder::new())
    }

    pub fn with_encoder(dir: impl Into<PathBuf>, encoder: ArtifactEncoder) -> Self {
        Self {
            dir: dir.into(),
            encoder,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Destination of the artifact for an input file.
    pub fn artifact_path(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = match input.extension() {
            Some(ext) => format!("{}{}.{}", stem, ARTIFACT_SUFFIX, ext.to_string_lossy()),
            None => format!("{}{}", stem, ARTIFACT_SUFFIX),
        };
        self.dir.join(name)
    }

    /// Encode and write the artifact for `input`, returning its path.
    ///
    /// Encoding runs on the blocking pool. The artifact directory is created
    /// on demand.
    pub async fn write(&self, input: &Path, image: RgbImage) -> Result<PathBuf, SampleError> {
        let path = self.artifact_path(input);
        let artifact_error = |message: String| SampleError::Artifact {
            path: path.clone(),
            message,
        };

        let format = ImageFormat::from_path(&path).map_err(|e| artifact_error(e.to_string()))?;
        let encoder = self.encoder;
        let data = tokio::task::spawn_blocking(move || encoder.encode(&image, format))
            .await
            .map_err(|e| artifact_error(e.to_string()))?
            .map_err(artifact_error)?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| artifact_error(e.to_string()))?;
        tokio::fs::write(&path, &data)
            .await
            .map_err(|e| artifact_error(e.to_string()))?;

        Ok(path)
    }
}

// =============================================================================
// Tests
// =============================================================================
