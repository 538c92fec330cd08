//! Export functionality
//!
//! Provides previews of an assembled dataset:
//! - JSON (the dataset itself)
//! - Markdown (study summary and column table)
//! - CSV (header row and data rows)

pub mod csv;
pub mod markdown;

use crate::models::Dataset;

/// Result of an export operation.
///
/// Contains the exported content and format identifier.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[must_use = "export results contain the exported content and should be used"]
pub struct ExportResult {
    /// Exported content
    pub content: String,
    /// Format identifier
    pub format: String,
}

/// Error during export
#[derive(Debug, thiserror::Error, serde::Serialize, serde::Deserialize)]
pub enum ExportError {
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Export error: {0}")]
    ExportError(String),
}

// Re-export for convenience
pub use csv::CsvExporter;
pub use markdown::MarkdownExporter;

/// JSON exporter for whole datasets
pub struct JsonExporter;

impl Default for JsonExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonExporter {
    pub fn new() -> Self {
        Self
    }

    /// Pretty-printed dataset JSON
    pub fn export(&self, dataset: &Dataset) -> Result<ExportResult, ExportError> {
        let content = serde_json::to_string_pretty(dataset)
            .map_err(|e| ExportError::SerializationError(e.to_string()))?;
        Ok(ExportResult {
            content,
            format: "json".to_string(),
        })
    }
}
