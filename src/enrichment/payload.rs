//! Tolerant parsing of model-generated JSON payloads.
//!
//! Definition payloads are produced by a language model and stored as
//! text. They are usually JSON, but often wrapped in a markdown fence,
//! decorated with comments, or left with trailing commas. The parser
//! cleans what it can, and when the result still is not JSON it falls
//! back to pulling out a single `definition` field, and finally to using
//! the text itself as the definition.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Characters of raw text kept when nothing else can be recovered
pub const MAX_RAW_DEFINITION_CHARS: usize = 500;

static RE_OPEN_JSON_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^```json\s*\n?").expect("Invalid regex"));
static RE_OPEN_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^```\s*\n?").expect("Invalid regex"));
static RE_CLOSE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n?\s*```\s*$").expect("Invalid regex"));
static RE_BLOCK_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("Invalid regex"));
static RE_TRAILING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",(\s*[}\]])").expect("Invalid regex"));
static RE_DOUBLE_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*,").expect("Invalid regex"));
static RE_DEFINITION_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:^|[^\w])"?definition"?\s*:\s*"((?:[^"\\]|\\.)*)""#).expect("Invalid regex")
});

/// Which layer of the parser produced the object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PayloadRecovery {
    /// The cleaned text parsed as a JSON object
    Parsed,
    /// Only a `definition` string field could be recovered
    DefinitionField,
    /// The raw text, truncated, became the definition
    Truncated,
}

/// Result of [`parse_payload`]. `value` is always a JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedPayload {
    pub value: Value,
    pub recovery: PayloadRecovery,
}

/// Parses a payload string into a JSON object. Never fails.
pub fn parse_payload(raw: &str) -> ParsedPayload {
    let cleaned = clean_payload(raw);
    match serde_json::from_str::<Value>(&cleaned) {
        Ok(value) if value.is_object() => ParsedPayload {
            value,
            recovery: PayloadRecovery::Parsed,
        },
        Ok(_) => {
            tracing::warn!("Definition payload parsed to a non-object value");
            recover(raw)
        }
        Err(e) => {
            tracing::warn!("Failed to parse definition payload: {}", e);
            recover(raw)
        }
    }
}

/// Applies every cleanup step without parsing.
pub fn clean_payload(raw: &str) -> String {
    let unfenced = strip_fences(raw);
    let span = object_span(&unfenced);
    let uncommented = strip_comments(span);
    let without_trailing = RE_TRAILING_COMMA.replace_all(&uncommented, "$1");
    RE_DOUBLE_COMMA
        .replace_all(&without_trailing, ",")
        .into_owned()
}

/// Removes a surrounding markdown code fence.
pub fn strip_fences(raw: &str) -> String {
    let text = raw.trim();
    let text = RE_OPEN_JSON_FENCE.replace(text, "");
    let text = RE_OPEN_FENCE.replace(&text, "");
    let text = RE_CLOSE_FENCE.replace(&text, "");
    text.trim().to_string()
}

/// Span from the first `{` to the last `}`, or the whole text.
pub fn object_span(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

/// Drops `/* */` and `//` comments.
///
/// A `//` only starts a comment when an even number of `"` precede it on
/// its line, which keeps URLs inside string values intact.
pub fn strip_comments(text: &str) -> String {
    let lines: Vec<String> = text
        .split('\n')
        .map(|line| {
            let mut cleaned = RE_BLOCK_COMMENT.replace_all(line, "").into_owned();
            if let Some(index) = cleaned.find("//") {
                let quotes = cleaned[..index].matches('"').count();
                if quotes % 2 == 0 {
                    cleaned.truncate(index);
                    cleaned.truncate(cleaned.trim_end().len());
                }
            }
            cleaned
        })
        .collect();
    RE_BLOCK_COMMENT
        .replace_all(&lines.join("\n"), "")
        .into_owned()
}

/// Reverses the JSON escapes a definition string is likely to contain.
pub fn unescape_json_string(text: &str) -> String {
    text.replace("\\\"", "\"")
        .replace("\\n", "\n")
        .replace("\\\\", "\\")
}

fn recover(raw: &str) -> ParsedPayload {
    let (definition, recovery) = match RE_DEFINITION_FIELD
        .captures(raw)
        .and_then(|c| c.get(1))
        .filter(|m| !m.as_str().is_empty())
    {
        Some(m) => (
            unescape_json_string(m.as_str()),
            PayloadRecovery::DefinitionField,
        ),
        None => (
            raw.chars().take(MAX_RAW_DEFINITION_CHARS).collect(),
            PayloadRecovery::Truncated,
        ),
    };

    let mut object = Map::new();
    object.insert("definition".to_string(), Value::String(definition));
    ParsedPayload {
        value: Value::Object(object),
        recovery,
    }
}
