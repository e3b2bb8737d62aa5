//! Image loading.
//!
//! The runner only sees decoded 8-bit RGB pixels; where they come from is
//! behind the [`ImageSource`] trait so batches can be driven from memory in
//! tests.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use image::RgbImage;

use crate::error::SampleError;

/// Trait for loading decoded images by path.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Load and decode the image at `path` into 8-bit RGB.
    ///
    /// # Errors
    ///
    /// - [`SampleError::MissingInput`] if nothing exists at `path`
    /// - [`SampleError::UnreadableImage`] if it cannot be read or decoded
    async fn load(&self, path: &Path) -> Result<RgbImage, SampleError>;
}

/// Local filesystem implementation of [`ImageSource`].
///
/// Reads with `tokio::fs` and decodes on the blocking pool, since decoding
/// large JPEGs is CPU-bound.
#[derive(Debug, Clone, Default)]
pub struct FsImageSource;

impl FsImageSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ImageSource for FsImageSource {
    async fn load(&self, path: &Path) -> Result<RgbImage, SampleError> {
        let data = match tokio::fs::read(path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SampleError::MissingInput {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => return Err(unreadable(path, e.to_string())),
        };

        let owned = path.to_path_buf();
        tokio::task::spawn_blocking(move || decode_rgb(&data, &owned))
            .await
            .map_err(|e| unreadable(path, e.to_string()))?
    }
}

/// Decode encoded image bytes into 8-bit RGB.
///
/// The container format is detected from the data, not the file extension.
pub fn decode_rgb(data: &[u8], path: &Path) -> Result<RgbImage, SampleError> {
    image::load_from_memory(data)
        .map(|img| img.to_rgb8())
        .map_err(|e| unreadable(path, e.to_string()))
}

fn unreadable(path: &Path, message: String) -> SampleError {
    SampleError::UnreadableImage {
        path: PathBuf::from(path),
        message,
    }
}
