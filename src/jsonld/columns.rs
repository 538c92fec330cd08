//! Column extraction from CDI JSON-LD documents.
//!
//! Two conventions are read:
//!
//! - **label**: a node with id `https://ddi-cdi.org/label/Column` whose
//!   keys `https://ddi-cdi.org/label/<n>` reference concept nodes; the
//!   trailing `<n>` gives the column order.
//! - **xdi**: the nested `xdiCdifMapping.@graph` list, whose
//!   `xdi dictionary` fields name XDI variables.
//!
//! Both feed one name-keyed candidate map, label entries first. Only
//! label candidates reach the final column list; xdi entries occupy
//! their names in the map but are filtered out afterwards.

use super::inference::TypeInferencer;
use super::node_index::NodeIndex;
use super::property::{PropertyResolver, reference_id};
use crate::models::column::renumber;
use crate::models::{Column, RepresentationCatalog};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, info};

/// Key prefix of the label convention
pub const LABEL_ROOT: &str = "https://ddi-cdi.org/label/";

/// Identifier of the column-index node
pub const COLUMN_INDEX_NODE: &str = "https://ddi-cdi.org/label/Column";

/// Nested mapping document key
pub const XDI_MAPPING: &str = "xdiCdifMapping";

/// Field of a mapping item naming the XDI variable
pub const XDI_DICTIONARY: &str = "xdi dictionary";

/// Known XAS data columns, most important first
pub const DEFAULT_PRIORITY_VARIABLES: [&str; 19] = [
    "energy", "i0", "itrans", "mutrans", "ifluor", "mufluor", "irefer", "murefer", "normtrans",
    "normfluor", "normrefer", "k", "chi", "chi_mag", "chi_pha", "chi_re", "chi_im", "r", "angle",
];

/// Mapping entries that name XDI sections rather than variables
pub const DEFAULT_STRUCTURAL_NAMES: [&str; 10] = [
    "Beamline",
    "detector",
    "facility",
    "scan",
    "Sample",
    "Element",
    "Mono",
    "Column",
    "variables",
    "monochormator",
];

/// Where a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateSource {
    Label,
    Xdi,
}

/// A variable found during extraction, before filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableCandidate {
    pub name: String,
    pub label: String,
    pub description: String,
    pub position: usize,
    pub source: CandidateSource,
}

/// Immutable lookup tables used by the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionCatalog {
    /// Ranking for xdi variables
    pub priority_variables: Vec<String>,
    /// xdi entries that are never variables
    pub structural_names: Vec<String>,
}

impl Default for ExtractionCatalog {
    fn default() -> Self {
        Self {
            priority_variables: DEFAULT_PRIORITY_VARIABLES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            structural_names: DEFAULT_STRUCTURAL_NAMES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ExtractionCatalog {
    fn priority(&self, name: &str) -> Option<usize> {
        self.priority_variables.iter().position(|p| p == name)
    }

    fn is_structural(&self, name: &str) -> bool {
        self.structural_names.iter().any(|s| s == name)
    }

    /// Listed names by list index, then unlisted names alphabetically.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match (self.priority(a), self.priority(b)) {
            (Some(pa), Some(pb)) => pa.cmp(&pb),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.cmp(b),
        }
    }
}

/// Name-keyed candidate map that remembers insertion order.
#[derive(Debug, Default)]
pub struct CandidateMap {
    order: Vec<VariableCandidate>,
    index: HashMap<String, usize>,
}

impl CandidateMap {
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Inserts unless the name is taken; returns whether it was inserted.
    pub fn insert(&mut self, candidate: VariableCandidate) -> bool {
        if self.contains(&candidate.name) {
            return false;
        }
        self.index.insert(candidate.name.clone(), self.order.len());
        self.order.push(candidate);
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn into_vec(self) -> Vec<VariableCandidate> {
        self.order
    }
}

/// Numeric suffix of a label key; the leading digits of the last path
/// segment, or 0 when there are none.
pub fn label_key_order(key: &str) -> i64 {
    let segment = key.rsplit('/').next().unwrap_or(key).trim_start();
    let digits: String = segment.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

/// Splits a definition into `(name, label)`.
///
/// Definitions such as `energy (eV)` carry the variable name as their
/// first space-separated token.
pub fn split_definition(definition: &str) -> (String, String) {
    if definition.contains(' ') {
        let name = definition.split(' ').next().unwrap_or_default();
        (name.to_string(), definition.to_string())
    } else {
        (definition.to_string(), definition.to_string())
    }
}

/// Extracts columns from a CDI JSON-LD document.
#[derive(Debug, Clone, Default)]
pub struct ColumnExtractor {
    catalog: ExtractionCatalog,
    inferencer: TypeInferencer,
}

impl ColumnExtractor {
    pub fn new(catalog: ExtractionCatalog, types: RepresentationCatalog) -> Self {
        Self {
            catalog,
            inferencer: TypeInferencer::new(types),
        }
    }

    pub fn catalog(&self) -> &ExtractionCatalog {
        &self.catalog
    }

    pub fn inferencer(&self) -> &TypeInferencer {
        &self.inferencer
    }

    /// All candidates from both conventions, in map insertion order.
    pub fn extract_candidates(&self, document: &Value) -> Vec<VariableCandidate> {
        let index = NodeIndex::build(document);
        let mut candidates = CandidateMap::default();
        self.collect_label_candidates(&index, &mut candidates);
        self.collect_xdi_candidates(document, &mut candidates);
        candidates.into_vec()
    }

    /// Final, typed column list.
    ///
    /// Keeps label candidates only, in position order, renumbered from 0.
    pub fn extract_columns(&self, document: &Value) -> Vec<Column> {
        let mut retained: Vec<VariableCandidate> = self
            .extract_candidates(document)
            .into_iter()
            .filter(|c| c.source == CandidateSource::Label)
            .collect();
        retained.sort_by_key(|c| c.position);

        let mut columns: Vec<Column> = retained
            .into_iter()
            .map(|candidate| self.to_column(candidate))
            .collect();
        renumber(&mut columns);

        for column in &columns {
            debug!(
                position = column.position,
                name = %column.name,
                label = %column.label,
                "Extracted column"
            );
        }
        columns
    }

    fn to_column(&self, candidate: VariableCandidate) -> Column {
        let mut column = Column::new(candidate.name);
        column.label = candidate.label;
        column.description = candidate.description;
        column.representation_type = self.inferencer.infer(&column.name, &column.label);
        column.coded = false;
        column
    }

    fn collect_label_candidates(&self, index: &NodeIndex<'_>, candidates: &mut CandidateMap) {
        let Some(root) = index.get(COLUMN_INDEX_NODE).and_then(Value::as_object) else {
            return;
        };

        let mut keys: Vec<&String> = root
            .keys()
            .filter(|k| k.starts_with(LABEL_ROOT) && k.as_str() != COLUMN_INDEX_NODE)
            .collect();
        keys.sort_by_key(|k| label_key_order(k));
        info!("Found {} column label keys", keys.len());

        for (position, key) in keys.into_iter().enumerate() {
            let Some(definition) = root
                .get(key.as_str())
                .and_then(reference_id)
                .and_then(|id| index.get(id))
                .and_then(|node| PropertyResolver::CONCEPT.get_text(node, "definition"))
            else {
                debug!("Skipping label key {} without a resolvable definition", key);
                continue;
            };

            let (name, label) = split_definition(&definition);
            if name.is_empty() {
                continue;
            }
            candidates.insert(VariableCandidate {
                name,
                label,
                description: definition,
                position,
                source: CandidateSource::Label,
            });
        }
    }

    fn collect_xdi_candidates(&self, document: &Value, candidates: &mut CandidateMap) {
        let Some(items) = document
            .get(XDI_MAPPING)
            .and_then(|m| m.get("@graph"))
            .and_then(Value::as_array)
        else {
            return;
        };

        let mut names: Vec<&str> = items
            .iter()
            .filter_map(|item| item.get(XDI_DICTIONARY).and_then(Value::as_str))
            .filter(|name| !name.is_empty() && !name.contains('.'))
            .filter(|name| !self.catalog.is_structural(name))
            .collect();
        names.sort_by(|a, b| self.catalog.compare(a, b));
        info!("Found {} variables in {}", names.len(), XDI_MAPPING);

        let mut position = candidates.len();
        for name in names {
            let inserted = candidates.insert(VariableCandidate {
                name: name.to_string(),
                label: name.to_string(),
                description: String::new(),
                position,
                source: CandidateSource::Xdi,
            });
            if inserted {
                position += 1;
            }
        }
    }
}
