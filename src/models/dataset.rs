//! Dataset model for the SDK

use super::column::Column;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// File name used when the document names no distribution or dataset
pub const DEFAULT_FILE_NAME: &str = "cdi-json-ld.json";

/// Study name used when the dataset node has no name
pub const DEFAULT_STUDY_NAME: &str = "CDI Dataset";

/// Placeholder study description
pub const DEFAULT_STUDY_DESCRIPTION: &str = "Please describe the content and Method of this study.";

/// Placeholder study group description
pub const DEFAULT_STUDY_GROUP_DESCRIPTION: &str =
    "Please describe the structure of this study group.";

/// MIME type recorded for JSON-LD input
pub const JSON_LD_MIME_TYPE: &str = "application/ld+json";

/// Input type recorded for JSON-LD input
pub const JSON_LD_INPUT_TYPE: &str = "json-ld";

/// Root output record of a load.
///
/// A dataset is always built from scratch and replaces the previous one
/// wholesale; nothing is updated incrementally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub file_name: String,
    pub study_name: String,
    /// Value of `http://schema.org/name`, falling back to the study name
    #[serde(default)]
    pub schema_org_name: String,
    pub study_description: String,
    #[serde(default)]
    pub study_group_name: String,
    #[serde(default)]
    pub study_group_description: String,
    pub mime_type: String,
    pub input_type: String,
    /// Field delimiter used by the CSV preview
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    /// Ordered columns with dense zero-based positions
    #[serde(default)]
    pub columns: Vec<Column>,
    /// Data rows (empty for metadata-only input)
    #[serde(default)]
    pub data: Vec<Vec<String>>,
    /// The document the dataset was extracted from
    #[serde(default)]
    pub raw_document: Value,
    /// Pretty-printed copy of `raw_document`
    #[serde(default)]
    pub serialized_document: String,
    pub last_modified: DateTime<Utc>,
}

fn default_delimiter() -> String {
    ",".to_string()
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            file_name: String::new(),
            study_name: String::new(),
            schema_org_name: String::new(),
            study_description: String::new(),
            study_group_name: String::new(),
            study_group_description: String::new(),
            mime_type: String::new(),
            input_type: String::new(),
            delimiter: default_delimiter(),
            columns: Vec::new(),
            data: Vec::new(),
            raw_document: Value::Null,
            serialized_document: String::new(),
            last_modified: Utc::now(),
        }
    }
}

impl Dataset {
    /// Column with the given name, if any.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in position order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}
