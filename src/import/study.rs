//! Study-level metadata from the dataset node of a CDI document.

use crate::jsonld::node_index::{find_dataset_node, find_node_by_id};
use crate::jsonld::property::{PropertyResolver, first_present, reference_id, value_text};
use crate::models::dataset::{
    DEFAULT_FILE_NAME, DEFAULT_STUDY_DESCRIPTION, DEFAULT_STUDY_GROUP_DESCRIPTION,
    DEFAULT_STUDY_NAME,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Names and descriptions read from the dataset node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyMetadata {
    pub file_name: String,
    pub study_name: String,
    pub schema_org_name: String,
    pub study_description: String,
    pub study_group_name: String,
    pub study_group_description: String,
}

impl Default for StudyMetadata {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.to_string(),
            study_name: DEFAULT_STUDY_NAME.to_string(),
            schema_org_name: String::new(),
            study_description: DEFAULT_STUDY_DESCRIPTION.to_string(),
            study_group_name: String::new(),
            study_group_description: String::new(),
        }
    }
}

const RESOLVER: PropertyResolver = PropertyResolver::RESOURCE;

impl StudyMetadata {
    /// Reads study metadata from `document`; defaults when it has no
    /// dataset node.
    pub fn extract(document: &Value) -> Self {
        let Some(node) = find_dataset_node(document) else {
            debug!("No dataset node found, using default study metadata");
            return Self::default();
        };

        let name = RESOLVER.get_text(node, "name");
        let file_name = first_present([
            distribution_file_name(document, node),
            name.clone(),
            RESOLVER.get_text(node, "identifier"),
        ])
        .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());

        let schema_org_name = first_present([
            RESOLVER.get_text(node, "http://schema.org/name"),
            name.clone(),
        ])
        .unwrap_or_default();

        let study_group_name = group_name(document, node).unwrap_or_default();
        let study_group_description = if study_group_name.is_empty() {
            String::new()
        } else {
            publisher_description(document, node)
                .unwrap_or_else(|| DEFAULT_STUDY_GROUP_DESCRIPTION.to_string())
        };

        Self {
            file_name,
            study_name: name.unwrap_or_else(|| DEFAULT_STUDY_NAME.to_string()),
            schema_org_name,
            study_description: RESOLVER
                .get_text(node, "description")
                .unwrap_or_else(|| DEFAULT_STUDY_DESCRIPTION.to_string()),
            study_group_name,
            study_group_description,
        }
    }
}

/// Name of the first distribution that resolves to a node with a name.
fn distribution_file_name(document: &Value, node: &Value) -> Option<String> {
    let distribution = RESOLVER.get(node, "distribution")?;
    let refs = match distribution {
        Value::Array(items) => items.as_slice(),
        single => std::slice::from_ref(single),
    };
    refs.iter()
        .filter_map(reference_id)
        .filter_map(|id| find_node_by_id(document, id))
        .find_map(|dist| RESOLVER.get_text(dist, "name"))
}

/// Publisher, else provider: a referenced node's name, or an inline
/// value.
fn group_name(document: &Value, node: &Value) -> Option<String> {
    let reference = first_present([RESOLVER.get(node, "publisher"), RESOLVER.get(node, "provider")])?;
    let first = match reference {
        Value::Array(items) => items.first()?,
        other => other,
    };
    match reference_id(first) {
        Some(id) => find_node_by_id(document, id).and_then(|n| RESOLVER.get_text(n, "name")),
        None => first_present([RESOLVER.get_text(first, "name"), value_text(first)]),
    }
}

/// Description of the referenced publisher node. Providers never
/// contribute one.
fn publisher_description(document: &Value, node: &Value) -> Option<String> {
    let id = reference_id(RESOLVER.get(node, "publisher")?)?;
    let publisher = find_node_by_id(document, id)?;
    RESOLVER.get_text(publisher, "description")
}
