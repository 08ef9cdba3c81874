// Structured extraction - strict JSON parse with per-object recovery

use super::{cleaner, RecoveryError};
use crate::models::RawDescriptor;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Matches one well-formed `{"path", "type", "content"}` object, keys in that
/// order, with a non-empty path and type
static OBJECT_PATTERN: OnceLock<Regex> = OnceLock::new();

fn object_pattern() -> &'static Regex {
    OBJECT_PATTERN.get_or_init(|| {
        Regex::new(
            r#"(?s)\{\s*"path"\s*:\s*"((?:[^"\\]|\\.)+)"\s*,\s*"type"\s*:\s*"((?:[^"\\]|\\.)+)"\s*,\s*"content"\s*:\s*"((?:[^"\\]|\\.)*)"\s*\}"#,
        )
        .unwrap()
    })
}

/// Extracts descriptors from cleaned text.
///
/// A strict parse is tried first. When it fails, individually well-formed
/// objects are collected; none at all is a `StructuredExtractionFailed`.
/// An empty `Ok` means the text held an empty array.
pub fn extract_structured(cleaned: &str) -> Result<Vec<RawDescriptor>, RecoveryError> {
    match serde_json::from_str::<Value>(cleaned) {
        Ok(Value::Array(items)) => Ok(items.iter().map(RawDescriptor::from_value).collect()),
        Ok(other) => Err(RecoveryError::StructuredExtractionFailed(format!(
            "expected a JSON array, found {}",
            json_type_name(&other)
        ))),
        Err(parse_error) => {
            log::debug!(
                "[structured] Strict parse failed ({}), scanning for objects",
                parse_error
            );
            let objects = extract_objects(cleaned);
            if objects.is_empty() {
                Err(RecoveryError::StructuredExtractionFailed(
                    parse_error.to_string(),
                ))
            } else {
                Ok(objects)
            }
        }
    }
}

/// Collects every well-formed descriptor object in `text`, in order
pub fn extract_objects(text: &str) -> Vec<RawDescriptor> {
    object_pattern()
        .captures_iter(text)
        .map(|caps| {
            let field = |i: usize| caps.get(i).map(|m| decode_json_string(m.as_str()));
            RawDescriptor {
                path: field(1),
                kind: field(2),
                content: field(3),
            }
        })
        .collect()
}

/// Salvages descriptors from an array that never closes.
///
/// Output cut off by the token limit ends mid-object; every object before
/// the cut is still recoverable.
pub fn extract_truncated(raw: &str) -> Vec<RawDescriptor> {
    let Some(start) = raw.find('[') else {
        return Vec::new();
    };
    let repaired = cleaner::repair(&raw[start..]);
    extract_objects(&repaired)
}

/// Decodes the body of a JSON string literal, keeping the raw text when it
/// is not a valid literal
fn decode_json_string(body: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{}\"", body)).unwrap_or_else(|_| body.to_string())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
