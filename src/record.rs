//! Per-sample output records.
//!
//! Each strategy has its own fixed column set. Column names are the
//! serialized field names, so the CSV header and JSON keys match the
//! tables downstream spreadsheets already expect.

use serde::Serialize;

use crate::stats::{DualAreas, HueBandAreas, IntensityStatistics};

/// One row of a result table.
pub trait SampleRecord: Serialize + Send + 'static {
    /// Identifier of the sample this row describes.
    fn sample_id(&self) -> &str;
}

// =============================================================================
// Paired-image record
// =============================================================================

/// Result row of the paired-image strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DualSampleRecord {
    #[serde(rename = "Image Name")]
    pub image_name: String,
    #[serde(rename = "Average Intensity")]
    pub average_intensity: f64,
    #[serde(rename = "SD Intensity")]
    pub sd_intensity: f64,
    #[serde(rename = "Max Intensity")]
    pub max_intensity: f64,
    #[serde(rename = "75% Intensity")]
    pub intensity_75: f64,
    #[serde(rename = "Median Intensity")]
    pub median_intensity: f64,
    #[serde(rename = "25% Intensity")]
    pub intensity_25: f64,
    #[serde(rename = "Min Intensity")]
    pub min_intensity: f64,
    #[serde(rename = "Brown Tissue Area")]
    pub brown_tissue_area: usize,
    #[serde(rename = "Blue Tissue Area")]
    pub blue_tissue_area: usize,
    #[serde(rename = "Total Image Pixels")]
    pub total_image_pixels: usize,
    #[serde(rename = "Quantity")]
    pub quantity: f64,
}

impl DualSampleRecord {
    pub fn new(
        image_name: impl Into<String>,
        stats: &IntensityStatistics,
        areas: &DualAreas,
    ) -> Self {
        Self {
            image_name: image_name.into(),
            average_intensity: stats.average,
            sd_intensity: stats.sd,
            max_intensity: stats.max,
            intensity_75: stats.p75,
            median_intensity: stats.median,
            intensity_25: stats.p25,
            min_intensity: stats.min,
            brown_tissue_area: areas.primary,
            blue_tissue_area: areas.counterstain,
            total_image_pixels: areas.total_pixels,
            quantity: areas.proportion(),
        }
    }
}

impl SampleRecord for DualSampleRecord {
    fn sample_id(&self) -> &str {
        &self.image_name
    }
}

// =============================================================================
// Hue-band record
// =============================================================================

/// Result row of the single-image hue-band strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HueBandSampleRecord {
    #[serde(rename = "Image Name")]
    pub image_name: String,
    #[serde(rename = "Average Intensity")]
    pub average_intensity: f64,
    #[serde(rename = "SD Intensity")]
    pub sd_intensity: f64,
    #[serde(rename = "Max Intensity")]
    pub max_intensity: f64,
    #[serde(rename = "75% Intensity")]
    pub intensity_75: f64,
    #[serde(rename = "Median Intensity")]
    pub median_intensity: f64,
    #[serde(rename = "25% Intensity")]
    pub intensity_25: f64,
    #[serde(rename = "Min Intensity")]
    pub min_intensity: f64,
    #[serde(rename = "Brown Area")]
    pub brown_area: usize,
    #[serde(rename = "Total Tissue Area")]
    pub total_tissue_area: usize,
    #[serde(rename = "Non-Tissue Area")]
    pub non_tissue_area: usize,
    #[serde(rename = "Blue Pixel Area")]
    pub blue_pixel_area: usize,
    #[serde(rename = "Brown Percentage")]
    pub brown_percentage: f64,
}

impl HueBandSampleRecord {
    pub fn new(
        image_name: impl Into<String>,
        stats: &IntensityStatistics,
        areas: &HueBandAreas,
    ) -> Self {
        Self {
            image_name: image_name.into(),
            average_intensity: stats.average,
            sd_intensity: stats.sd,
            max_intensity: stats.max,
            intensity_75: stats.p75,
            median_intensity: stats.median,
            intensity_25: stats.p25,
            min_intensity: stats.min,
            brown_area: areas.primary,
            total_tissue_area: areas.total_tissue(),
            non_tissue_area: areas.non_tissue(),
            blue_pixel_area: areas.counterstain,
            brown_percentage: areas.proportion(),
        }
    }
}

impl SampleRecord for HueBandSampleRecord {
    fn sample_id(&self) -> &str {
        &self.image_name
    }
}
