//! End-to-end tests on a temporary directory tree.
//!
//! Images are written to disk, discovered, loaded through the filesystem
//! source, classified, and the result table is written and read back.

use std::path::Path;

use image::RgbImage;
use tempfile::TempDir;

use stain_quant::{
    discover_dual, discover_single, write_report, ArtifactWriter, BatchRunner,
    DualImageClassifier, DualLayout, FsImageSource, HueBandClassifier, ReportFormat,
};

use super::test_utils::{
    encode_jpeg, encode_png, image_with, is_valid_jpeg, BLACK, BLUE, BROWN, WHITE,
};

fn write_file(path: &Path, data: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, data).unwrap();
}

fn png_layout() -> DualLayout {
    DualLayout {
        extension: "png".to_string(),
        ..DualLayout::default()
    }
}

// =============================================================================
// Paired layout
// =============================================================================

#[tokio::test]
async fn test_dual_end_to_end_csv() {
    let root = TempDir::new().unwrap();
    let layout = png_layout();

    for (id, brown) in [("Case 2", 2u32), ("Case 1", 4)] {
        let sample = layout.sample(&root.path().join(id), id);
        write_file(&sample.primary, &encode_png(&image_with(2, 4, brown, BROWN, WHITE)));
        write_file(&sample.counterstain, &encode_png(&image_with(2, 4, 4, BLUE, WHITE)));
    }
    // Folder without renderings: discovered, then skipped at load time.
    std::fs::create_dir_all(root.path().join("Empty")).unwrap();
    // Stray file at the root is not a sample.
    write_file(&root.path().join("notes.txt"), b"not a sample");

    let samples = discover_dual(root.path(), &layout).await.unwrap();
    let ids: Vec<&str> = samples.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["Case 1", "Case 2", "Empty"]);

    let runner = BatchRunner::new(FsImageSource::new(), 2);
    let summary = runner.run_dual(samples, DualImageClassifier::new()).await;
    assert_eq!(summary.processed, 2);
    assert_eq!(summary.skipped, 1);

    let output = root.path().join("out").join("results.csv");
    write_report(&output, ReportFormat::Csv, &summary.records).unwrap();

    let mut reader = csv::Reader::from_path(&output).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[0], "Image Name");
    assert_eq!(&headers[11], "Quantity");

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], "Case 1");
    assert_eq!(&rows[0][8], "4");
    assert_eq!(&rows[0][9], "4");
    assert_eq!(&rows[0][10], "8");
    assert_eq!(&rows[0][11], "50.0");
    assert_eq!(&rows[1][0], "Case 2");
    assert_eq!(&rows[1][8], "2");
}

#[tokio::test]
async fn test_dual_jpeg_renderings() {
    let root = TempDir::new().unwrap();
    let layout = DualLayout::default();
    let sample = layout.sample(&root.path().join("S"), "S");

    write_file(
        &sample.primary,
        &encode_jpeg(&RgbImage::from_pixel(16, 16, BROWN), 95),
    );
    write_file(
        &sample.counterstain,
        &encode_jpeg(&RgbImage::from_pixel(16, 16, WHITE), 95),
    );

    let samples = discover_dual(root.path(), &layout).await.unwrap();
    assert_eq!(samples, vec![sample]);

    let runner = BatchRunner::new(FsImageSource::new(), 1);
    let summary = runner.run_dual(samples, DualImageClassifier::new()).await;

    let record = &summary.records[0];
    assert_eq!(record.brown_tissue_area, 256);
    assert_eq!(record.blue_tissue_area, 0);
    assert_eq!(record.total_image_pixels, 256);
    assert!((record.average_intensity - 146.0).abs() < 3.0);
}

#[tokio::test]
async fn test_missing_root_is_an_error() {
    let root = TempDir::new().unwrap();
    let missing = root.path().join("nope");

    assert!(discover_dual(&missing, &DualLayout::default()).await.is_err());
    assert!(discover_single(&missing).await.is_err());
}

// =============================================================================
// Single-image layout
// =============================================================================

#[tokio::test]
async fn test_hue_end_to_end_with_artifacts() {
    let root = TempDir::new().unwrap();
    let input = root.path().join("images");
    let artifacts = root.path().join("processed");

    let image = RgbImage::from_fn(4, 2, |x, y| match (x + y) % 4 {
        0 => BROWN,
        1 => BLUE,
        2 => WHITE,
        _ => BLACK,
    });
    write_file(&input.join("b.png"), &encode_png(&image));
    write_file(&input.join("a.jpg"), &encode_jpeg(&RgbImage::from_pixel(8, 8, BROWN), 95));
    write_file(&input.join("._b.png"), b"resource fork");
    write_file(&input.join("c.png"), b"definitely not a png");
    write_file(&input.join("readme.md"), b"# notes");

    let samples = discover_single(&input).await.unwrap();
    let ids: Vec<&str> = samples.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["a.jpg", "b.png", "c.png"]);

    let runner = BatchRunner::new(FsImageSource::new(), 2);
    let summary = runner
        .run_hue_band(
            samples,
            HueBandClassifier::new(),
            Some(ArtifactWriter::new(&artifacts)),
        )
        .await;

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.artifact_failures, 0);

    let b = &summary.records[1];
    assert_eq!(b.image_name, "b.png");
    assert_eq!(b.brown_area, 2);
    assert_eq!(b.blue_pixel_area, 2);
    assert_eq!(b.non_tissue_area, 4);

    // PNG artifacts are lossless: removed pixels are exactly white.
    let processed = image::open(artifacts.join("b_processed.png"))
        .unwrap()
        .to_rgb8();
    assert_eq!(processed.dimensions(), (4, 2));
    assert_eq!(*processed.get_pixel(0, 0), BROWN);
    assert_eq!(*processed.get_pixel(1, 0), WHITE);
    assert_eq!(*processed.get_pixel(3, 0), WHITE);

    let jpeg = std::fs::read(artifacts.join("a_processed.jpg")).unwrap();
    assert!(is_valid_jpeg(&jpeg));
    assert!(!artifacts.join("c_processed.png").exists());
}

#[tokio::test]
async fn test_hue_report_as_json() {
    let root = TempDir::new().unwrap();
    let input = root.path().join("images");
    write_file(&input.join("blank.png"), &encode_png(&RgbImage::from_pixel(3, 3, WHITE)));

    let samples = discover_single(&input).await.unwrap();
    let runner = BatchRunner::new(FsImageSource::new(), 1);
    let summary = runner
        .run_hue_band(samples, HueBandClassifier::new(), None)
        .await;

    let output = root.path().join("results.json");
    write_report(&output, ReportFormat::from_path(&output), &summary.records).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let row = &value[0];
    assert_eq!(row["Image Name"], "blank.png");
    assert_eq!(row["Brown Area"], 0);
    assert_eq!(row["Non-Tissue Area"], 9);
    assert_eq!(row["Brown Percentage"], 0.0);
    assert!(row["Average Intensity"].is_null());
}
