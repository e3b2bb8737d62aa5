//! Sample discovery by directory layout and filename convention.
//!
//! # Paired layout
//!
//! ```text
//! <root>/
//! ├── Sample_01/
//! │   ├── Sample_01 BrownTissue.jpg
//! │   └── Sample_01 BlueTissue.jpg
//! └── Sample_02/
//!     └── ...
//! ```
//!
//! # Single-image layout
//!
//! Every `.png`, `.jpg` or `.jpeg` file directly inside the input directory,
//! skipping `._*` resource-fork files.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::BatchError;

/// Default filename suffix of the primary-stain rendering.
pub const DEFAULT_PRIMARY_SUFFIX: &str = "BrownTissue";

/// Default filename suffix of the counterstain rendering.
pub const DEFAULT_COUNTERSTAIN_SUFFIX: &str = "BlueTissue";

/// Default extension of paired renderings.
pub const DEFAULT_PAIRED_EXTENSION: &str = "jpg";

/// Extensions accepted in the single-image layout (lowercase).
pub const SINGLE_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

// =============================================================================
// Samples
// =============================================================================

/// A paired sample: one folder, two renderings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DualSample {
    /// Folder name, used as the record's image name.
    pub id: String,
    pub primary: PathBuf,
    pub counterstain: PathBuf,
}

/// A single-image sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleSample {
    /// File name including extension, used as the record's image name.
    pub id: String,
    pub path: PathBuf,
}

/// Filename convention of the paired layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DualLayout {
    pub primary_suffix: String,
    pub counterstain_suffix: String,
    pub extension: String,
}

impl Default for DualLayout {
    fn default() -> Self {
        Self {
            primary_suffix: DEFAULT_PRIMARY_SUFFIX.to_string(),
            counterstain_suffix: DEFAULT_COUNTERSTAIN_SUFFIX.to_string(),
            extension: DEFAULT_PAIRED_EXTENSION.to_string(),
        }
    }
}

impl DualLayout {
    /// Expected paths of both renderings for the sample folder `dir`.
    pub fn sample(&self, dir: &Path, id: &str) -> DualSample {
        DualSample {
            id: id.to_string(),
            primary: dir.join(format!("{} {}.{}", id, self.primary_suffix, self.extension)),
            counterstain: dir.join(format!(
                "{} {}.{}",
                id, self.counterstain_suffix, self.extension
            )),
        }
    }
}

// =============================================================================
// Discovery
// =============================================================================

/// List paired samples under `root`, one per sub-directory.
///
/// Renderings are not checked for existence here; a missing file surfaces
/// when the sample is loaded.
pub async fn discover_dual(
    root: &Path,
    layout: &DualLayout,
) -> Result<Vec<DualSample>, BatchError> {
    let mut samples = Vec::new();
    for (path, name) in list_dir(root).await? {
        let is_dir = tokio::fs::metadata(&path)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if !is_dir {
            continue;
        }
        samples.push(layout.sample(&path, &name));
    }
    samples.sort_by(|a, b| a.id.cmp(&b.id));
    debug!(count = samples.len(), root = %root.display(), "discovered paired samples");
    Ok(samples)
}

/// List single-image samples directly inside `dir`.
pub async fn discover_single(dir: &Path) -> Result<Vec<SingleSample>, BatchError> {
    let mut samples = Vec::new();
    for (path, name) in list_dir(dir).await? {
        if !is_single_image_name(&name) {
            continue;
        }
        let is_file = tokio::fs::metadata(&path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if is_file {
            samples.push(SingleSample { id: name, path });
        }
    }
    samples.sort_by(|a, b| a.id.cmp(&b.id));
    debug!(count = samples.len(), dir = %dir.display(), "discovered images");
    Ok(samples)
}

/// Whether a file name belongs to the single-image layout.
pub fn is_single_image_name(name: &str) -> bool {
    if name.starts_with("._") {
        return false;
    }
    let lower = name.to_lowercase();
    SINGLE_IMAGE_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{}", ext)))
}

async fn list_dir(dir: &Path) -> Result<Vec<(PathBuf, String)>, BatchError> {
    let input_error = |e: std::io::Error| BatchError::InputRoot {
        path: dir.to_path_buf(),
        message: e.to_string(),
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(input_error)?;
    let mut out = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(input_error)? {
        // Names that are not valid UTF-8 cannot match the naming convention.
        if let Some(name) = entry.file_name().to_str() {
            out.push((entry.path(), name.to_string()));
        }
    }
    Ok(out)
}
