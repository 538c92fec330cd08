//! Definition payload shapes and how they enrich a column.
//!
//! A parsed payload comes in one of three layouts:
//!
//! ```text
//! keyed:  {"HealthZone": {"definition": "...", "units": ..., "properties": ...}}
//! nested: {"variable": {"definition": "...", ...}}
//! flat:   {"definition": "...", "units": ..., "properties": ...}
//! ```

use crate::jsonld::property::{is_absent, value_text};
use crate::models::Column;
use serde_json::{Map, Value};

/// Maximum number of property strings appended to a description
pub const MAX_PROPERTY_NOTES: usize = 3;

/// A payload classified by layout, pointing at the entry that holds the
/// definition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefinitionPayload<'a> {
    /// Entry stored under the variable's name, or under the first other
    /// key whose value carries a definition
    Keyed {
        key: &'a str,
        entry: &'a Map<String, Value>,
    },
    /// Entry stored under `variable`
    Nested(&'a Map<String, Value>),
    /// The payload itself is the entry
    Flat(&'a Map<String, Value>),
}

fn entry_with_definition(value: &Value) -> Option<&Map<String, Value>> {
    value
        .as_object()
        .filter(|entry| entry.get("definition").is_some_and(|d| !is_absent(d)))
}

impl<'a> DefinitionPayload<'a> {
    /// Classifies `payload` for `variable`; `None` when no layout holds a
    /// definition.
    pub fn classify(payload: &'a Value, variable: Option<&str>) -> Option<Self> {
        let object = payload.as_object()?;

        let named = variable
            .and_then(|name| object.get_key_value(name))
            .and_then(|(key, value)| Some((key.as_str(), entry_with_definition(value)?)));
        if let Some((key, entry)) = named {
            return Some(Self::Keyed { key, entry });
        }

        let keyed = object
            .iter()
            .filter(|(key, _)| key.as_str() != "variable")
            .find_map(|(key, value)| Some((key.as_str(), entry_with_definition(value)?)));
        if let Some((key, entry)) = keyed {
            return Some(Self::Keyed { key, entry });
        }

        if let Some(entry) = object.get("variable").and_then(entry_with_definition) {
            return Some(Self::Nested(entry));
        }

        entry_with_definition(payload).map(Self::Flat)
    }

    pub fn entry(&self) -> &'a Map<String, Value> {
        match self {
            Self::Keyed { entry, .. } => entry,
            Self::Nested(entry) | Self::Flat(entry) => entry,
        }
    }

    pub fn definition(&self) -> Option<String> {
        self.entry().get("definition").and_then(definition_text)
    }

    pub fn units(&self) -> Option<String> {
        self.entry()
            .get("units")
            .map(format_units)
            .filter(|s| !s.is_empty())
    }

    pub fn property_notes(&self) -> Vec<String> {
        self.entry()
            .get("properties")
            .map(format_properties)
            .unwrap_or_default()
    }

    /// Writes definition, units and property notes into `column`.
    pub fn apply(&self, column: &mut Column) {
        if let Some(definition) = self.definition() {
            column.definition = definition.clone();
            column.description = definition;
        }

        if let Some(units) = self.units() {
            if column.description.is_empty() {
                column.description = units;
            } else {
                column.description.push_str(&format!(" ({units})"));
            }
        }

        let notes = self.property_notes();
        if !notes.is_empty() && !column.description.is_empty() {
            let shown: Vec<&str> = notes
                .iter()
                .take(MAX_PROPERTY_NOTES)
                .map(String::as_str)
                .collect();
            column.description.push_str(&format!(" - {}", shown.join(", ")));
        }
    }
}

fn definition_text(value: &Value) -> Option<String> {
    if is_absent(value) {
        return None;
    }
    value_text(value).or_else(|| Some(value.to_string()))
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Renders `units` as text.
///
/// Strings pass through; arrays list each unit's symbol or name; objects
/// become `key: value` pairs (non-string values contribute their key).
pub fn format_units(units: &Value) -> String {
    match units {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|unit| match unit {
                Value::String(s) => s.clone(),
                Value::Object(map) => map
                    .get("symbol")
                    .filter(|v| !is_absent(v))
                    .or_else(|| map.get("name").filter(|v| !is_absent(v)))
                    .map(display)
                    .unwrap_or_else(|| unit.to_string()),
                other => display(other),
            })
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| match value {
                Value::String(s) => format!("{key}: {s}"),
                _ => key.clone(),
            })
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    }
}

/// Renders `properties` as a list of short notes.
pub fn format_properties(properties: &Value) -> Vec<String> {
    match properties {
        Value::Object(map) => [("type", "Type"), ("scale", "Scale"), ("dimension", "Dimension")]
            .iter()
            .filter_map(|(key, title)| {
                map.get(*key)
                    .filter(|v| !is_absent(v))
                    .map(|v| format!("{title}: {}", display(v)))
            })
            .collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Object(map) => map
                    .get("name")
                    .filter(|v| !is_absent(v))
                    .map(display),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}
