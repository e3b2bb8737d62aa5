//! Result table writers.
//!
//! Records are written in the order given. CSV keeps undefined statistics
//! as `NaN`; JSON writes them as `null`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use clap::ValueEnum;
use serde::Serialize;

use crate::error::BatchError;

/// Output format of the result table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Comma-separated values with a header row
    Csv,
    /// Pretty-printed JSON array of objects
    Json,
}

impl ReportFormat {
    /// Infer the format from a file extension, defaulting to CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ReportFormat::Json,
            _ => ReportFormat::Csv,
        }
    }
}

/// Serialize records into any writer.
pub fn write_records<W: Write, R: Serialize>(
    writer: W,
    format: ReportFormat,
    records: &[R],
) -> Result<(), String> {
    match format {
        ReportFormat::Csv => {
            let mut csv = csv::Writer::from_writer(writer);
            for record in records {
                csv.serialize(record).map_err(|e| e.to_string())?;
            }
            csv.flush().map_err(|e| e.to_string())
        }
        ReportFormat::Json => {
            let mut writer = writer;
            serde_json::to_writer_pretty(&mut writer, records).map_err(|e| e.to_string())?;
            writeln!(writer).map_err(|e| e.to_string())?;
            writer.flush().map_err(|e| e.to_string())
        }
    }
}

/// Write records to `path`, creating its parent directory if needed.
pub fn write_report<R: Serialize>(
    path: &Path,
    format: ReportFormat,
    records: &[R],
) -> Result<(), BatchError> {
    let report_error = |message: String| BatchError::Report {
        path: path.to_path_buf(),
        message,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| report_error(e.to_string()))?;
    }
    let file = File::create(path).map_err(|e| report_error(e.to_string()))?;
    write_records(BufWriter::new(file), format, records).map_err(report_error)
}
