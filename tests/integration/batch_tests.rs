//! Batch runner tests against the in-memory image source.

use std::path::PathBuf;

use image::RgbImage;
use tempfile::TempDir;

use stain_quant::{
    ArtifactWriter, BatchRunner, DualImageClassifier, DualLayout, HueBandClassifier,
    SampleError, SingleSample,
};

use super::test_utils::{image_with, MockImageSource, BLUE, BROWN, WHITE};

fn single(id: &str) -> SingleSample {
    SingleSample {
        id: id.to_string(),
        path: PathBuf::from("/slides").join(id),
    }
}

// =============================================================================
// Paired samples
// =============================================================================

#[tokio::test]
async fn test_dual_run_produces_sorted_records() {
    let layout = DualLayout::default();
    let mut source = MockImageSource::new();
    let mut samples = Vec::new();

    for (id, brown) in [("S3", 3), ("S1", 1), ("S2", 2)] {
        let sample = layout.sample(&PathBuf::from("/data").join(id), id);
        source = source
            .with_image(&sample.primary, image_with(2, 2, brown, BROWN, WHITE))
            .with_image(&sample.counterstain, image_with(2, 2, 1, BLUE, WHITE));
        samples.push(sample);
    }

    let runner = BatchRunner::new(source, 2);
    let summary = runner.run_dual(samples, DualImageClassifier::new()).await;

    assert_eq!(summary.processed, 3);
    assert_eq!(summary.skipped, 0);
    let ids: Vec<&str> = summary.records.iter().map(|r| r.image_name.as_str()).collect();
    assert_eq!(ids, vec!["S1", "S2", "S3"]);
    assert_eq!(summary.records[0].brown_tissue_area, 1);
    assert_eq!(summary.records[0].quantity, 50.0);
    assert_eq!(summary.records[2].brown_tissue_area, 3);
    assert_eq!(summary.records[2].quantity, 75.0);
}

#[tokio::test]
async fn test_dual_missing_rendering_is_skipped() {
    let layout = DualLayout::default();
    let complete = layout.sample(&PathBuf::from("/data/A"), "A");
    let partial = layout.sample(&PathBuf::from("/data/B"), "B");

    let source = MockImageSource::new()
        .with_image(&complete.primary, image_with(2, 2, 2, BROWN, WHITE))
        .with_image(&complete.counterstain, image_with(2, 2, 2, BLUE, WHITE))
        .with_image(&partial.primary, image_with(2, 2, 2, BROWN, WHITE));
    let counts = source.request_counts();

    let runner = BatchRunner::new(source, 4);
    let summary = runner
        .run_dual(vec![complete, partial.clone()], DualImageClassifier::new())
        .await;

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.records.len(), 1);
    assert_eq!(summary.records[0].image_name, "A");

    let counts = counts.read().await;
    assert_eq!(counts.get(&partial.counterstain), Some(&1));
}

// =============================================================================
// Single images
// =============================================================================

#[tokio::test]
async fn test_hue_run_skips_unreadable_images() {
    let source = MockImageSource::new()
        .with_image("/slides/a.png", RgbImage::from_pixel(2, 2, BROWN))
        .with_corrupt("/slides/b.png")
        .with_image("/slides/c.jpg", image_with(2, 2, 2, BLUE, BROWN));

    let runner = BatchRunner::new(source, 1);
    let samples = vec![single("c.jpg"), single("b.png"), single("a.png"), single("d.png")];
    let summary = runner
        .run_hue_band(samples, HueBandClassifier::new(), None)
        .await;

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.artifact_failures, 0);

    let a = &summary.records[0];
    assert_eq!(a.image_name, "a.png");
    assert_eq!(a.brown_percentage, 100.0);

    let c = &summary.records[1];
    assert_eq!(c.image_name, "c.jpg");
    assert_eq!(c.blue_pixel_area, 2);
    assert_eq!(c.brown_area, 2);
    assert_eq!(c.brown_percentage, 50.0);
}

#[tokio::test]
async fn test_panicking_sample_is_skipped_with_its_id() {
    let source = MockImageSource::new()
        .with_image("/slides/a.png", RgbImage::from_pixel(2, 2, BROWN))
        .with_panic("/slides/boom.png");

    let runner = BatchRunner::new(source, 2);
    let summary = runner
        .run_hue_band(
            vec![single("boom.png"), single("a.png")],
            HueBandClassifier::new(),
            None,
        )
        .await;

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.records[0].image_name, "a.png");
    assert_eq!(summary.errors.len(), 1);
    match &summary.errors[0] {
        SampleError::Worker { sample, .. } => assert_eq!(sample, "boom.png"),
        other => panic!("expected a worker error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_artifact_failure_keeps_the_record() {
    let out = TempDir::new().unwrap();
    let source =
        MockImageSource::new().with_image("/slides/a.xyz", RgbImage::from_pixel(2, 2, BROWN));

    let runner = BatchRunner::new(source, 1);
    let summary = runner
        .run_hue_band(
            vec![single("a.xyz")],
            HueBandClassifier::new(),
            Some(ArtifactWriter::new(out.path())),
        )
        .await;

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.artifact_failures, 1);
    assert_eq!(summary.records.len(), 1);
    assert!(matches!(summary.errors[..], [SampleError::Artifact { .. }]));
}

#[tokio::test]
async fn test_empty_batch() {
    let runner = BatchRunner::new(MockImageSource::new(), 4);
    let summary = runner
        .run_hue_band(Vec::new(), HueBandClassifier::new(), None)
        .await;

    assert_eq!(summary.processed, 0);
    assert_eq!(summary.skipped, 0);
    assert!(summary.records.is_empty());
}

#[tokio::test]
async fn test_zero_jobs_still_runs() {
    let source =
        MockImageSource::new().with_image("/slides/a.png", RgbImage::from_pixel(1, 1, BROWN));
    let runner = BatchRunner::new(source, 0);
    assert_eq!(runner.jobs(), 1);

    let summary = runner
        .run_hue_band(vec![single("a.png")], HueBandClassifier::new(), None)
        .await;
    assert_eq!(summary.processed, 1);
}

#[tokio::test]
async fn test_many_samples_with_bounded_concurrency() {
    let mut source = MockImageSource::new();
    let mut samples = Vec::new();
    for i in 0..40 {
        let id = format!("img{:02}.png", i);
        source = source.with_image(
            PathBuf::from("/slides").join(&id),
            image_with(4, 4, i % 17, BROWN, BLUE),
        );
        samples.push(single(&id));
    }
    let counts = source.request_counts();

    let runner = BatchRunner::new(source, 3);
    let summary = runner
        .run_hue_band(samples, HueBandClassifier::new(), None)
        .await;

    assert_eq!(summary.processed, 40);
    assert_eq!(summary.records.len(), 40);
    for (i, record) in summary.records.iter().enumerate() {
        assert_eq!(record.image_name, format!("img{:02}.png", i));
        assert_eq!(record.brown_area, (i as u32 % 17) as usize);
        assert_eq!(record.total_tissue_area, 16);
    }
    assert!(counts.read().await.values().all(|&n| n == 1));
}
