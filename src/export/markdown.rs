//! Markdown exporter for datasets
//!
//! Renders the study summary and a column table, for reading in a
//! terminal or on GitHub.

use crate::export::{ExportError, ExportResult};
use crate::models::Dataset;

/// Markdown exporter for dataset previews
pub struct MarkdownExporter;

impl Default for MarkdownExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownExporter {
    /// Create a new Markdown exporter instance
    pub fn new() -> Self {
        Self
    }

    /// Export a dataset summary to Markdown
    ///
    /// # Arguments
    ///
    /// * `dataset` - The Dataset to export
    ///
    /// # Returns
    ///
    /// A Markdown document with a study heading and a column table
    pub fn export(&self, dataset: &Dataset) -> Result<ExportResult, ExportError> {
        let mut md = String::new();

        md.push_str(&format!("# {}\n\n", dataset.study_name));
        md.push_str(&format!("{}\n\n", dataset.study_description));

        md.push_str("| Property | Value |\n");
        md.push_str("|----------|-------|\n");
        md.push_str(&format!("| **File** | {} |\n", escape_cell(&dataset.file_name)));
        md.push_str(&format!("| **MIME type** | {} |\n", dataset.mime_type));
        if !dataset.schema_org_name.is_empty() {
            md.push_str(&format!(
                "| **schema.org name** | {} |\n",
                escape_cell(&dataset.schema_org_name)
            ));
        }
        md.push_str(&format!(
            "| **Last modified** | {} |\n\n",
            dataset.last_modified.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        if !dataset.study_group_name.is_empty() {
            md.push_str(&format!("## Study group: {}\n\n", dataset.study_group_name));
            md.push_str(&format!("{}\n\n", dataset.study_group_description));
        }

        md.push_str(&format!("## Columns ({})\n\n", dataset.columns.len()));
        if dataset.columns.is_empty() {
            md.push_str("_No columns found._\n");
        } else {
            md.push_str("| # | Name | Label | Type | Description |\n");
            md.push_str("|---|------|-------|------|-------------|\n");
            for column in &dataset.columns {
                md.push_str(&format!(
                    "| {} | {} | {} | {} | {} |\n",
                    column.position,
                    escape_cell(&column.name),
                    escape_cell(&column.label),
                    column.type_id().unwrap_or("-"),
                    escape_cell(&column.description),
                ));
            }
        }

        Ok(ExportResult {
            content: md,
            format: "markdown".to_string(),
        })
    }
}

/// Keeps a value on one table row.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_cell() {
        assert_eq!(escape_cell("a|b\nc"), "a\\|b c");
    }

    #[test]
    fn test_empty_dataset_has_no_table() {
        let result = MarkdownExporter::new().export(&Dataset::default()).unwrap();
        assert!(result.content.contains("## Columns (0)"));
        assert!(result.content.contains("_No columns found._"));
        assert!(!result.content.contains("## Study group"));
    }
}
