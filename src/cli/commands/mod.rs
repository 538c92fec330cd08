//! CLI command implementations

pub mod extract;
pub mod load;
pub mod payload;

use super::error::CliError;
use crate::export::{CsvExporter, JsonExporter, MarkdownExporter};
use crate::models::Dataset;
use std::io::{self, Read};
use std::path::PathBuf;

/// Input source for commands
#[derive(Debug, Clone)]
pub enum InputSource {
    File(PathBuf),
    Stdin,
}

impl InputSource {
    /// `-` reads stdin; anything else is a file path.
    pub fn parse(input: &str) -> Self {
        if input == "-" {
            Self::Stdin
        } else {
            Self::File(PathBuf::from(input))
        }
    }
}

/// Load input content from InputSource
pub fn load_input(input: &InputSource) -> Result<String, CliError> {
    match input {
        InputSource::File(path) => {
            if !path.exists() {
                return Err(CliError::FileNotFound(path.clone()));
            }
            std::fs::read_to_string(path)
                .map_err(|e| CliError::FileReadError(path.clone(), e.to_string()))
        }
        InputSource::Stdin => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| CliError::InvalidArgument(format!("Failed to read stdin: {}", e)))?;
            Ok(buffer)
        }
    }
}

/// How a dataset is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Whole dataset as JSON
    Json,
    /// Study summary and column table
    Markdown,
    /// Header row and data rows
    Csv,
    /// Column list as JSON
    Columns,
}

/// Renders `dataset` in `format`.
pub fn render(dataset: &Dataset, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Json => Ok(JsonExporter::new().export(dataset)?.content),
        OutputFormat::Markdown => Ok(MarkdownExporter::new().export(dataset)?.content),
        OutputFormat::Csv => Ok(CsvExporter::new().export(dataset)?.content),
        OutputFormat::Columns => serde_json::to_string_pretty(&dataset.columns)
            .map_err(|e| CliError::SerializationError(e.to_string())),
    }
}

/// Single-threaded runtime for one pipeline run.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::RuntimeError(e.to_string()))
}
