//! Concurrent batch driver.
//!
//! Samples are independent, so the runner fans them out: each sample is
//! loaded asynchronously, then classified on the blocking pool. A semaphore
//! bounds how many samples are in flight, which bounds peak memory since
//! every in-flight sample holds one or two decoded images plus its masks.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       BatchRunner                        │
//! │                                                          │
//! │   sample ──▶ [permit] ──▶ load ──▶ classify ──▶ record   │
//! │   sample ──▶ [permit] ──▶ load ──▶ classify ──▶ record   │
//! │   sample ──▶ (waits for a permit)                        │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! A sample that fails to load is logged and skipped; it never aborts the
//! batch. Everything a sample allocates lives inside its task and is dropped
//! once its record exists.

use std::future::Future;
use std::sync::Arc;

use image::RgbImage;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::classify::{DualImageClassifier, DualImages, HueBandClassifier, StainClassifier};
use crate::error::SampleError;
use crate::record::{DualSampleRecord, HueBandSampleRecord, SampleRecord};

use super::artifact::ArtifactWriter;
use super::discover::{DualSample, SingleSample};
use super::source::ImageSource;

/// Outcome of a batch run.
#[derive(Debug, Clone)]
pub struct BatchSummary<R> {
    /// One record per processed sample, sorted by sample identifier.
    pub records: Vec<R>,
    /// Samples that produced a record.
    pub processed: usize,
    /// Samples skipped because of missing or unreadable input.
    pub skipped: usize,
    /// Artifacts that failed to write (their records are still included).
    pub artifact_failures: usize,
    /// Every per-sample error, in the order samples were submitted.
    pub errors: Vec<SampleError>,
}

impl<R> BatchSummary<R> {
    fn empty() -> Self {
        Self {
            records: Vec::new(),
            processed: 0,
            skipped: 0,
            artifact_failures: 0,
            errors: Vec::new(),
        }
    }

    /// Log and count a per-sample error.
    ///
    /// Skip errors mean the sample has no record; anything else is an
    /// artifact failure on a sample whose record was kept.
    fn note_error(&mut self, error: SampleError) {
        if error.is_skip() {
            warn!("Skipping sample: {}", error);
            self.skipped += 1;
        } else {
            warn!("{}", error);
            self.artifact_failures += 1;
        }
        self.errors.push(error);
    }
}

/// What a sample task hands back to the runner.
struct SampleOutcome<R> {
    record: R,
    artifact_error: Option<SampleError>,
}

/// A unit of work the runner can name in its logs.
trait BatchSample: Send + 'static {
    fn id(&self) -> &str;
}

impl BatchSample for DualSample {
    fn id(&self) -> &str {
        &self.id
    }
}

impl BatchSample for SingleSample {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Runs classification over many samples with bounded concurrency.
pub struct BatchRunner<S> {
    source: Arc<S>,
    jobs: usize,
}

impl<S: ImageSource + 'static> BatchRunner<S> {
    /// Create a runner that keeps at most `jobs` samples in flight.
    ///
    /// `jobs` of zero is treated as one.
    pub fn new(source: S, jobs: usize) -> Self {
        Self {
            source: Arc::new(source),
            jobs: jobs.max(1),
        }
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Classify paired samples.
    pub async fn run_dual(
        &self,
        samples: Vec<DualSample>,
        classifier: DualImageClassifier,
    ) -> BatchSummary<DualSampleRecord> {
        let classifier = Arc::new(classifier);
        self.run(samples, |source, sample| {
            let classifier = Arc::clone(&classifier);
            async move {
                let primary = source.load(&sample.primary).await?;
                let counterstain = source.load(&sample.counterstain).await?;
                let images = DualImages::new(primary, counterstain);
                if !images.is_aligned() {
                    warn!(
                        sample = %sample.id,
                        primary = ?images.primary.dimensions(),
                        counterstain = ?images.counterstain.dimensions(),
                        "paired renderings differ in size"
                    );
                }

                let (record, _) = classify_blocking(classifier, sample.id, images).await?;
                Ok::<_, SampleError>(SampleOutcome {
                    record,
                    artifact_error: None,
                })
            }
        })
        .await
    }

    /// Classify single images by hue band, optionally writing artifacts.
    pub async fn run_hue_band(
        &self,
        samples: Vec<SingleSample>,
        classifier: HueBandClassifier,
        artifacts: Option<ArtifactWriter>,
    ) -> BatchSummary<HueBandSampleRecord> {
        let classifier = Arc::new(classifier);
        let artifacts = artifacts.map(Arc::new);
        self.run(samples, |source, sample| {
            let classifier = Arc::clone(&classifier);
            let artifacts = artifacts.clone();
            async move {
                let image: RgbImage = source.load(&sample.path).await?;
                let (record, classification) =
                    classify_blocking(classifier, sample.id.clone(), image).await?;

                let mut artifact_error = None;
                if let Some(writer) = artifacts {
                    let working = classification.into_working_image();
                    match writer.write(&sample.path, working).await {
                        Ok(path) => {
                            debug!(sample = %sample.id, path = %path.display(), "wrote artifact")
                        }
                        Err(e) => artifact_error = Some(e),
                    }
                }

                Ok::<_, SampleError>(SampleOutcome {
                    record,
                    artifact_error,
                })
            }
        })
        .await
    }

    async fn run<T, R, F, Fut>(&self, samples: Vec<T>, process: F) -> BatchSummary<R>
    where
        T: BatchSample,
        R: SampleRecord,
        F: Fn(Arc<S>, T) -> Fut,
        Fut: Future<Output = Result<SampleOutcome<R>, SampleError>> + Send + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(self.jobs));
        let mut tasks: Vec<(String, JoinHandle<_>)> = Vec::with_capacity(samples.len());

        for sample in samples {
            let id = sample.id().to_string();
            let semaphore = Arc::clone(&semaphore);
            let fut = process(Arc::clone(&self.source), sample);
            let handle = tokio::spawn(async move {
                // The semaphore is never closed, so acquiring only waits.
                let _permit = semaphore.acquire_owned().await.ok();
                fut.await
            });
            tasks.push((id, handle));
        }

        let mut summary = BatchSummary::empty();
        for (id, handle) in tasks {
            let result = handle.await.unwrap_or_else(|e| {
                Err(SampleError::Worker {
                    sample: id,
                    message: e.to_string(),
                })
            });

            match result {
                Ok(outcome) => {
                    debug!(sample = outcome.record.sample_id(), "processed sample");
                    summary.processed += 1;
                    if let Some(e) = outcome.artifact_error {
                        summary.note_error(e);
                    }
                    summary.records.push(outcome.record);
                }
                Err(e) => summary.note_error(e),
            }
        }

        summary
            .records
            .sort_by(|a, b| a.sample_id().cmp(b.sample_id()));
        summary
    }
}

/// Classify on the blocking pool and build the record there too.
async fn classify_blocking<C: StainClassifier>(
    classifier: Arc<C>,
    sample_id: String,
    input: C::Input,
) -> Result<(C::Record, C::Classification), SampleError> {
    let worker_id = sample_id.clone();
    tokio::task::spawn_blocking(move || {
        let classification = classifier.classify(&input);
        drop(input);
        let record = classifier.record(&sample_id, &classification);
        (record, classification)
    })
    .await
    .map_err(|e| SampleError::Worker {
        sample: worker_id,
        message: e.to_string(),
    })
}
