//! Node lookup over the containers a CDI document may hold.
//!
//! Nodes live in the top-level `@graph` array and in the sibling
//! `CDIGenerated` array; lookups always search them in that order.

use super::property::SCHEMA_ORG;
use serde_json::Value;
use std::collections::HashMap;

/// Top-level graph container
pub const GRAPH: &str = "@graph";

/// Container of generated CDI nodes
pub const CDI_GENERATED: &str = "CDIGenerated";

/// Node containers in search order
pub const NODE_CONTAINERS: [&str; 2] = [GRAPH, CDI_GENERATED];

/// Nodes of one container, or an empty slice when it is missing or not an array.
pub fn container<'a>(document: &'a Value, name: &str) -> &'a [Value] {
    document
        .get(name)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// The `@id` of a node, if it has a string one.
pub fn node_id(node: &Value) -> Option<&str> {
    node.get("@id").and_then(Value::as_str)
}

/// Scans the containers for the first node whose `@id` equals `id`.
///
/// Nothing is cached; every call re-scans the document.
pub fn find_node_by_id<'a>(document: &'a Value, id: &str) -> Option<&'a Value> {
    if id.is_empty() {
        return None;
    }
    NODE_CONTAINERS
        .iter()
        .flat_map(|name| container(document, name))
        .find(|node| node_id(node) == Some(id))
}

/// First node whose `@type` matches `target`.
///
/// A type value matches when it equals `target`, equals the schema.org
/// IRI of `target`'s local name, or contains `Dataset` at all. The last
/// rule catches types such as `dcat:Dataset` or `cdi:PhysicalDataset`.
pub fn find_node_by_type<'a>(target: &str, nodes: &'a [Value]) -> Option<&'a Value> {
    let schema_form = format!("{SCHEMA_ORG}{}", super::property::base_name(target));
    nodes.iter().find(|node| {
        node_types(node).any(|t| t == target || t == schema_form || t.contains("Dataset"))
    })
}

fn node_types(node: &Value) -> impl Iterator<Item = &str> {
    let types: &[Value] = match node.get("@type") {
        Some(Value::Array(items)) => items,
        Some(single) => std::slice::from_ref(single),
        None => &[],
    };
    types.iter().filter_map(Value::as_str)
}

/// Locates the node describing the dataset itself.
///
/// Each container is tried in turn: first by type, then by an `@id`
/// that looks like a DOI.
pub fn find_dataset_node(document: &Value) -> Option<&Value> {
    NODE_CONTAINERS.iter().find_map(|name| {
        let nodes = container(document, name);
        find_node_by_type("schema:Dataset", nodes)
            .or_else(|| find_node_by_type("http://schema.org/Dataset", nodes))
            .or_else(|| {
                nodes
                    .iter()
                    .find(|n| node_id(n).is_some_and(|id| id.contains("doi.org")))
            })
    })
}

/// Per-run `@id` index over the document's node containers.
///
/// Built once at the start of an extraction run and dropped at its end.
/// The first occurrence in search order wins, so lookups agree with
/// [`find_node_by_id`].
#[derive(Debug)]
pub struct NodeIndex<'a> {
    nodes: HashMap<&'a str, &'a Value>,
}

impl<'a> NodeIndex<'a> {
    pub fn build(document: &'a Value) -> Self {
        let mut nodes = HashMap::new();
        for node in NODE_CONTAINERS
            .iter()
            .flat_map(|name| container(document, name))
        {
            if let Some(id) = node_id(node) {
                nodes.entry(id).or_insert(node);
            }
        }
        Self { nodes }
    }

    pub fn get(&self, id: &str) -> Option<&'a Value> {
        self.nodes.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
