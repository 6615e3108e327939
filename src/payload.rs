//! QR payload normalization
//!
//! Payloads arrive in two shapes:
//! - a JSON object, optionally wrapping the interesting fields under `"data"`
//! - flat text of comma-separated `key:value` segments
//!
//! Both end up as a [`ParsedRecord`]. Parsing never fails; the worst case is an
//! empty record.

use crate::models::ParsedRecord;
use serde_json::Value;

/// Member of a JSON payload that wraps the actual fields
pub const DATA_KEY: &str = "data";

const SEGMENT_SEPARATOR: char = ',';
const KEY_VALUE_SEPARATOR: char = ':';

/// Normalize decoded QR text into a record.
///
/// JSON objects are returned as-is, or their `"data"` member when that member
/// is itself an object. Anything else (invalid JSON, or JSON that is not an
/// object) is read as `key:value` segments from the original text.
pub fn parse_payload(text: &str) -> ParsedRecord {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(object)) => {
            if let Some(Value::Object(inner)) = object.get(DATA_KEY) {
                return inner.clone().into();
            }
            return object.into();
        }
        Ok(other) => {
            log::debug!(
                "Payload is JSON {} rather than an object, reading it as key:value text",
                json_kind(&other)
            );
        }
        Err(_) => {}
    }

    parse_key_values(text)
}

/// Read comma-separated `key:value` segments.
///
/// Only the first `:` splits a segment, so values may contain `:`. Keys and
/// values are trimmed and a repeated key overwrites the earlier value. Segments
/// without `:` or with a blank key are skipped and reported.
pub fn parse_key_values(text: &str) -> ParsedRecord {
    let mut record = ParsedRecord::new();

    for segment in text.split(SEGMENT_SEPARATOR) {
        match segment.split_once(KEY_VALUE_SEPARATOR) {
            Some((key, value)) if !key.trim().is_empty() => {
                record.insert(key.trim(), value.trim());
            }
            _ => log::warn!("Skipping invalid entry: {:?}", segment),
        }
    }

    record
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
