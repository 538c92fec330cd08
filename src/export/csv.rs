//! CSV preview exporter
//!
//! Writes the column names as a header followed by the data rows, joined
//! by the dataset's delimiter. The delimiter must be a single byte.

use crate::export::{ExportError, ExportResult};
use crate::models::Dataset;
use csv::WriterBuilder;

/// CSV exporter for dataset previews
pub struct CsvExporter;

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}

fn csv_error(e: csv::Error) -> ExportError {
    ExportError::ExportError(format!("Failed to write CSV: {}", e))
}

impl CsvExporter {
    pub fn new() -> Self {
        Self
    }

    pub fn export(&self, dataset: &Dataset) -> Result<ExportResult, ExportError> {
        let delimiter = match dataset.delimiter.as_bytes() {
            [byte] => *byte,
            _ => {
                return Err(ExportError::ExportError(format!(
                    "Dataset delimiter must be a single byte, got {:?}",
                    dataset.delimiter
                )));
            }
        };

        // Data rows need not match the header width
        let mut writer = WriterBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_writer(Vec::new());

        writer
            .write_record(dataset.columns.iter().map(|c| c.name.as_str()))
            .map_err(csv_error)?;
        for row in &dataset.data {
            writer.write_record(row).map_err(csv_error)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ExportError::ExportError(format!("Failed to flush CSV: {}", e)))?;
        let content = String::from_utf8(bytes)
            .map_err(|e| ExportError::SerializationError(e.to_string()))?;
        Ok(ExportResult {
            content,
            format: "csv".to_string(),
        })
    }
}
