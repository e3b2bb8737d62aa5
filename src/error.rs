use std::path::PathBuf;

use thiserror::Error;

/// Errors that affect a single sample.
///
/// None of these stop a batch. The runner logs them and either skips the
/// sample or, for artifacts, keeps its record.
#[derive(Debug, Clone, Error)]
pub enum SampleError {
    /// An expected input file does not exist
    #[error("Missing input: {}", path.display())]
    MissingInput { path: PathBuf },

    /// The file exists but could not be read or decoded
    #[error("Unreadable image {}: {message}", path.display())]
    UnreadableImage { path: PathBuf, message: String },

    /// The per-sample worker task failed
    #[error("Worker for sample {sample} failed: {message}")]
    Worker { sample: String, message: String },

    /// The processed image could not be encoded or written
    #[error("Failed to write artifact {}: {message}", path.display())]
    Artifact { path: PathBuf, message: String },
}

impl SampleError {
    /// Whether the sample produces no record because of this error.
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            SampleError::MissingInput { .. }
                | SampleError::UnreadableImage { .. }
                | SampleError::Worker { .. }
        )
    }
}

/// Errors that abort a whole batch run.
#[derive(Debug, Clone, Error)]
pub enum BatchError {
    /// The input directory could not be listed
    #[error("Cannot read input directory {}: {message}", path.display())]
    InputRoot { path: PathBuf, message: String },

    /// The result table could not be written
    #[error("Cannot write report {}: {message}", path.display())]
    Report { path: PathBuf, message: String },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}
