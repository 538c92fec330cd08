//! Column enrichment from resource maps
//!
//! Matches columns against the `results` of a resource map and copies
//! model-generated definitions, units and properties into them. Columns
//! without a match may still pick up a definition from the variable's
//! `variableMetadata`.

pub mod definitions;
pub mod payload;
pub mod resourcemap;

pub use definitions::{DefinitionPayload, format_properties, format_units};
pub use payload::{ParsedPayload, PayloadRecovery, clean_payload, parse_payload};
pub use resourcemap::{
    ResourceMap, ResourceMapResult, ResourceMapVariable, same_name_ignoring_case,
};

use crate::models::Column;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use tracing::{debug, info, warn};

/// Name-keyed view over `results[].ollama_remote`.
///
/// Keeps first-seen order; a later entry with the same name replaces the
/// earlier one's value in place.
#[derive(Debug, Default)]
pub struct DefinitionLookup<'a> {
    entries: Vec<(&'a str, &'a Value)>,
}

impl<'a> DefinitionLookup<'a> {
    pub fn build(map: &'a ResourceMap) -> Self {
        let mut lookup = Self::default();
        for result in &map.results {
            let (Some(name), Some(remote)) = (result.name.as_deref(), result.ollama_remote.as_ref())
            else {
                continue;
            };
            if name.is_empty() || remote.is_null() {
                continue;
            }
            match lookup.entries.iter_mut().find(|(key, _)| *key == name) {
                Some(entry) => entry.1 = remote,
                None => lookup.entries.push((name, remote)),
            }
        }
        info!("Built definition lookup with {} entries", lookup.len());
        lookup
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact name match, then the first key equal ignoring case.
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        if let Some((_, value)) = self.entries.iter().find(|(key, _)| *key == name) {
            return Some(value);
        }
        let (key, value) = self
            .entries
            .iter()
            .find(|(key, _)| same_name_ignoring_case(key, name))?;
        debug!(
            "Matched definitions for {} case-insensitively via {}",
            name, key
        );
        Some(value)
    }
}

/// Counts reported by [`Enricher::enrich`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentReport {
    /// Columns that took a definition payload
    pub from_payload: usize,
    /// Columns that took a `variableMetadata` definition
    pub from_metadata: usize,
    /// Payload strings that needed a fallback to parse
    pub recovered_payloads: usize,
}

impl EnrichmentReport {
    pub fn enriched(&self) -> usize {
        self.from_payload + self.from_metadata
    }
}

/// Applies resource-map definitions to columns.
#[derive(Debug, Clone)]
pub struct Enricher {
    use_variable_metadata: bool,
}

impl Default for Enricher {
    fn default() -> Self {
        Self::new()
    }
}

impl Enricher {
    pub fn new() -> Self {
        Self {
            use_variable_metadata: true,
        }
    }

    /// Disables the `variableMetadata` fallback.
    pub fn without_variable_metadata(mut self) -> Self {
        self.use_variable_metadata = false;
        self
    }

    /// Enriches `columns` in place. Positions and order are untouched.
    pub fn enrich(&self, columns: &mut [Column], map: &ResourceMap) -> EnrichmentReport {
        let mut report = EnrichmentReport::default();
        if map.is_empty() {
            return report;
        }

        let lookup = DefinitionLookup::build(map);
        for column in columns.iter_mut() {
            let name = column.name.clone();
            if let Some(remote) = lookup.get(&name)
                && let Some(ollama) = remote.get("ollama").filter(|v| !v.is_null())
            {
                let payload = self.payload_value(ollama, &name, &mut report);
                if let Some(shape) = DefinitionPayload::classify(&payload, Some(&name)) {
                    shape.apply(column);
                    report.from_payload += 1;
                    info!("Applied definition payload to column {}", name);
                } else {
                    debug!("Definition payload for {} has no definition", name);
                }
            }

            if self.use_variable_metadata && column.definition.is_empty() {
                let definition = map
                    .variable(&name)
                    .and_then(ResourceMapVariable::metadata_definition);
                if let Some(definition) = definition {
                    if column.description.is_empty() {
                        column.description = definition.clone();
                    }
                    column.definition = definition;
                    report.from_metadata += 1;
                    debug!("Applied variableMetadata definition to column {}", name);
                }
            }
        }

        info!(
            "Enriched {} of {} columns ({} from payloads, {} from variable metadata)",
            report.enriched(),
            columns.len(),
            report.from_payload,
            report.from_metadata
        );
        report
    }

    fn payload_value<'v>(
        &self,
        ollama: &'v Value,
        name: &str,
        report: &mut EnrichmentReport,
    ) -> Cow<'v, Value> {
        match ollama {
            Value::String(raw) => {
                let parsed = parse_payload(raw);
                if parsed.recovery != PayloadRecovery::Parsed {
                    warn!(
                        "Recovered definition payload for {} via {:?}",
                        name, parsed.recovery
                    );
                    report.recovered_payloads += 1;
                }
                Cow::Owned(parsed.value)
            }
            other => Cow::Borrowed(other),
        }
    }
}
