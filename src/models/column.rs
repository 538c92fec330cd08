//! Column model for the SDK

use super::representation::RepresentationType;
use serde::{Deserialize, Serialize};

/// Column model representing one variable of a dataset
///
/// Columns are created once per extraction run. After assembly only the
/// enrichment pass touches them, and then only `description`,
/// `definition` and `representation_type`.
///
/// # Example
///
/// ```rust
/// use cdi_metadata_sdk::models::Column;
///
/// let column = Column::new("energy".to_string());
/// assert_eq!(column.id, "energy");
/// assert_eq!(column.label, "energy");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Zero-based position within the dataset
    pub position: usize,
    /// Column identifier
    pub id: String,
    /// Column name (the variable name)
    pub name: String,
    /// Display label
    #[serde(default)]
    pub label: String,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Natural-language definition
    #[serde(default)]
    pub definition: String,
    /// Intended data type from the representation catalog
    #[serde(
        rename = "hasIntendedDataType",
        skip_serializing_if = "Option::is_none"
    )]
    pub representation_type: Option<RepresentationType>,
    /// Whether the column uses a code list
    #[serde(default)]
    pub coded: bool,
}

impl Column {
    /// Create a new column whose id, name and label all equal `name`.
    pub fn new(name: String) -> Self {
        Self {
            position: 0,
            id: name.clone(),
            label: name.clone(),
            name,
            description: String::new(),
            definition: String::new(),
            representation_type: None,
            coded: false,
        }
    }

    /// Identifier of the representation type, if one is assigned.
    pub fn type_id(&self) -> Option<&str> {
        self.representation_type.as_ref().map(|t| t.id.as_str())
    }
}

/// Renumber positions densely from zero in sequence order.
pub fn renumber(columns: &mut [Column]) {
    for (index, column) in columns.iter_mut().enumerate() {
        column.position = index;
    }
}
