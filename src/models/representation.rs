//! Representation type catalog
//!
//! A representation type describes the intended data kind of a column
//! (DDI-CDI `hasIntendedDataType`). The catalog is an ordered list; its
//! first entry is the fallback whenever a lookup finds nothing better.

use serde::{Deserialize, Serialize};

/// A single catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepresentationType {
    /// Catalog identifier (e.g., "String", "Decimal")
    pub id: String,
    /// Primitive kind (e.g., "string", "decimal")
    #[serde(rename = "type")]
    pub kind: String,
    /// Human-readable label
    #[serde(default)]
    pub label: String,
}

impl RepresentationType {
    pub fn new(id: &str, kind: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: kind.to_string(),
            label: label.to_string(),
        }
    }
}

/// One step of a catalog lookup chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeQuery<'a> {
    /// Match on the catalog identifier
    Id(&'a str),
    /// Match on the primitive kind
    Kind(&'a str),
}

/// Ordered, immutable catalog of representation types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepresentationCatalog {
    types: Vec<RepresentationType>,
}

impl Default for RepresentationCatalog {
    fn default() -> Self {
        Self::new(vec![
            RepresentationType::new("String", "string", "String"),
            RepresentationType::new("Decimal", "decimal", "Decimal"),
            RepresentationType::new("Float", "float", "Float"),
            RepresentationType::new("Double", "double", "Double"),
            RepresentationType::new("Integer", "integer", "Integer"),
            RepresentationType::new("Long", "long", "Long"),
            RepresentationType::new("Boolean", "boolean", "Boolean"),
            RepresentationType::new("Date", "date", "Date"),
            RepresentationType::new("DateTime", "dateTime", "Date and time"),
            RepresentationType::new("Time", "time", "Time"),
            RepresentationType::new("Duration", "duration", "Duration"),
            RepresentationType::new("AnyURI", "anyURI", "URI"),
        ])
    }
}

impl RepresentationCatalog {
    pub fn new(types: Vec<RepresentationType>) -> Self {
        Self { types }
    }

    pub fn types(&self) -> &[RepresentationType] {
        &self.types
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn find(&self, query: TypeQuery<'_>) -> Option<&RepresentationType> {
        self.types.iter().find(|t| match query {
            TypeQuery::Id(id) => t.id == id,
            TypeQuery::Kind(kind) => t.kind == kind,
        })
    }

    /// Resolves the first query that matches, falling back to the first
    /// catalog entry. Returns `None` only for an empty catalog.
    pub fn resolve(&self, chain: &[TypeQuery<'_>]) -> Option<&RepresentationType> {
        crate::jsonld::property::first_present(chain.iter().map(|q| self.find(*q)))
            .or_else(|| self.types.first())
    }
}
