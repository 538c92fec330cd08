//! Dataverse resource map documents.
//!
//! The resource map export lists a dataset's variables and, for
//! enriched datasets, a `results` array holding model-generated
//! descriptions per variable under `ollama_remote`.

use crate::jsonld::inference::TypeInferencer;
use crate::jsonld::property::{first_present, is_absent, value_text};
use crate::models::Column;
use crate::models::column::renumber;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// One entry of `variables`.
///
/// Fields are read leniently: a null or oddly typed field becomes empty
/// instead of rejecting the whole variable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMapVariable {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "lenient_order")]
    pub file_order: Option<i64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub variable_format_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub variable_metadata: Vec<Value>,
}

/// Strings, numbers and booleans as text; anything else as `None`.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(value_text(&Value::deserialize(deserializer)?))
}

/// Integer from a number or a numeric string.
fn lenient_order<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Value>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => Vec::new(),
    })
}

/// Name equality ignoring case, shared by every name lookup.
pub fn same_name_ignoring_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

impl ResourceMapVariable {
    fn non_empty(value: &Option<String>) -> Option<&str> {
        value.as_deref().filter(|s| !s.is_empty())
    }

    pub fn name(&self) -> Option<&str> {
        Self::non_empty(&self.name)
    }

    pub fn label(&self) -> Option<&str> {
        Self::non_empty(&self.label)
    }

    /// First `variableMetadata` entry carrying a definition.
    pub fn metadata_definition(&self) -> Option<String> {
        self.variable_metadata
            .iter()
            .find_map(|m| m.get("definition").and_then(value_text))
    }
}

/// One entry of `results`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceMapResult {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default)]
    pub ollama_remote: Option<Value>,
}

/// A parsed resource map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceMap {
    #[serde(default)]
    pub variables: Vec<ResourceMapVariable>,
    #[serde(default)]
    pub results: Vec<ResourceMapResult>,
}

impl ResourceMap {
    /// Reads a resource map from an untyped body.
    ///
    /// Entries that do not have the expected shape are skipped one by
    /// one, so a single odd variable does not discard the rest.
    pub fn from_value(body: &Value) -> Self {
        Self {
            variables: entries(body, "variables"),
            results: entries(body, "results"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty() && self.results.is_empty()
    }

    /// Variable with the given name, exact match first, then ignoring case.
    pub fn variable(&self, name: &str) -> Option<&ResourceMapVariable> {
        self.variables
            .iter()
            .find(|v| v.name() == Some(name))
            .or_else(|| {
                self.variables
                    .iter()
                    .find(|v| v.name().is_some_and(|n| same_name_ignoring_case(n, name)))
            })
    }

    /// Columns built from `variables`, for documents that yield none.
    pub fn fallback_columns(&self, inferencer: &TypeInferencer) -> Vec<Column> {
        let mut columns: Vec<Column> = self
            .variables
            .iter()
            .enumerate()
            .map(|(index, variable)| variable_to_column(index, variable, inferencer))
            .collect();
        columns.sort_by_key(|c| c.position);
        renumber(&mut columns);
        columns
    }
}

fn entries<T: for<'de> Deserialize<'de>>(body: &Value, key: &str) -> Vec<T> {
    let Some(items) = body.get(key).and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping malformed resource map {} entry: {}", key, e);
                None
            }
        })
        .collect()
}

fn variable_to_column(
    index: usize,
    variable: &ResourceMapVariable,
    inferencer: &TypeInferencer,
) -> Column {
    let synthesized = format!("Var{}", index + 1);
    let id = first_present([
        variable.id.as_ref().filter(|v| !is_absent(v)).and_then(value_text),
        variable.name().map(str::to_string),
        variable.label().map(str::to_string),
    ])
    .unwrap_or_else(|| synthesized.clone());

    let mut column = Column::new(variable.name().unwrap_or_default().to_string());
    column.id = id;
    column.label = first_present([variable.label(), variable.name()])
        .unwrap_or_default()
        .to_string();
    column.position = variable
        .file_order
        .filter(|order| *order > 0)
        .map(|order| order as usize)
        .unwrap_or(index);
    column.representation_type =
        inferencer.from_format_type(variable.variable_format_type.as_deref());
    column.coded = false;

    debug!(
        "Mapped resource map variable {} to column {}",
        variable.name().unwrap_or(&synthesized),
        column.id
    );
    column
}
