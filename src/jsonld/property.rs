//! Property resolution for loosely expanded JSON-LD nodes.
//!
//! Upstream documents are inconsistent about vocabulary expansion: the
//! same logical property may appear as `http://schema.org/name`,
//! `schema:name` or plain `name`. A [`PropertyResolver`] holds the ordered
//! list of key variants to probe for one class of properties.

use serde_json::Value;

/// schema.org namespace IRI
pub const SCHEMA_ORG: &str = "http://schema.org/";

/// SKOS core namespace IRI
pub const SKOS: &str = "http://www.w3.org/2004/02/skos/core#";

/// Compact schema.org prefix
pub const SCHEMA_PREFIX: &str = "schema:";

/// A single way of spelling a property key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyVariant {
    /// Namespace or prefix followed by the base name
    Prefixed(&'static str),
    /// The property name exactly as requested
    Verbatim,
    /// The base name (suffix after the last `:`)
    Base,
}

/// Ordered key variants for one class of properties.
#[derive(Debug, Clone, Copy)]
pub struct PropertyResolver {
    variants: &'static [KeyVariant],
}

impl PropertyResolver {
    /// Concept properties (column definitions), which may use SKOS.
    pub const CONCEPT: PropertyResolver = PropertyResolver {
        variants: &[
            KeyVariant::Prefixed(SCHEMA_ORG),
            KeyVariant::Prefixed(SKOS),
            KeyVariant::Verbatim,
            KeyVariant::Prefixed(SCHEMA_PREFIX),
            KeyVariant::Base,
        ],
    };

    /// Resource properties (dataset, distribution, publisher nodes).
    pub const RESOURCE: PropertyResolver = PropertyResolver {
        variants: &[
            KeyVariant::Prefixed(SCHEMA_ORG),
            KeyVariant::Verbatim,
            KeyVariant::Prefixed(SCHEMA_PREFIX),
            KeyVariant::Base,
        ],
    };

    pub const fn new(variants: &'static [KeyVariant]) -> Self {
        Self { variants }
    }

    /// Candidate keys for `property`, in probing order.
    pub fn candidate_keys(&self, property: &str) -> Vec<String> {
        let base = base_name(property);
        self.variants
            .iter()
            .map(|variant| match variant {
                KeyVariant::Prefixed(prefix) => format!("{prefix}{base}"),
                KeyVariant::Verbatim => property.to_string(),
                KeyVariant::Base => base.to_string(),
            })
            .collect()
    }

    /// Value of the first candidate key present on `node` with a non-null value.
    pub fn get<'a>(&self, node: &'a Value, property: &str) -> Option<&'a Value> {
        let object = node.as_object()?;
        first_present(
            self.candidate_keys(property)
                .into_iter()
                .map(|key| object.get(&key).filter(|v| !v.is_null())),
        )
    }

    /// [`get`](Self::get) followed by [`extract_value`].
    pub fn get_value<'a>(&self, node: &'a Value, property: &str) -> Option<&'a Value> {
        extract_value(self.get(node, property))
    }

    /// [`get_value`](Self::get_value) rendered as text.
    pub fn get_text(&self, node: &Value, property: &str) -> Option<String> {
        value_text(self.get_value(node, property)?)
    }
}

/// Suffix after the last `:`, or the whole name.
pub fn base_name(property: &str) -> &str {
    property.rsplit(':').next().unwrap_or(property)
}

/// Unwraps the single-value encodings JSON-LD allows.
///
/// Arrays contribute only their first element; value objects contribute
/// their `@value`. Nulls and empty strings count as absent.
pub fn extract_value(property: Option<&Value>) -> Option<&Value> {
    let property = property?;
    let value = match property {
        Value::Array(items) => {
            let first = items.first()?;
            first.get("@value").unwrap_or(first)
        }
        Value::Object(map) => map.get("@value").unwrap_or(property),
        _ => property,
    };
    if is_absent(value) { None } else { Some(value) }
}

/// Identifier a reference value points at: `{"@id": ...}` or a bare
/// string, looking only at the first element of an array.
pub fn reference_id(value: &Value) -> Option<&str> {
    let first = match value {
        Value::Array(items) => items.first()?,
        other => other,
    };
    match first {
        Value::String(id) => Some(id.as_str()),
        Value::Object(map) => map.get("@id").and_then(Value::as_str),
        _ => None,
    }
    .filter(|id| !id.is_empty())
}

/// Scalar text of a value; strings as-is, numbers and booleans rendered.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Whether a value carries nothing usable (null, false, zero, "").
pub fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

/// First present value of a prioritized chain of optional lookups.
///
/// Pass a lazy iterator (e.g. built with `map`) so that later lookups
/// only run when the earlier ones come back empty.
pub fn first_present<T, I>(chain: I) -> Option<T>
where
    I: IntoIterator<Item = Option<T>>,
{
    chain.into_iter().flatten().next()
}
