use crate::error::Result;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

/// Normalized key/value content of one QR payload.
///
/// Keys keep the order in which the payload introduced them. Values coming from
/// a JSON payload are kept as they were; the `key:value` path only produces
/// strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRecord {
    fields: Map<String, Value>,
}

impl ParsedRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field; an existing key keeps its position and gets the new value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    /// Look up a field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Look up a field holding a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no field was parsed
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Borrow the fields as a JSON object
    pub fn as_object(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Serialize as a JSON object indented with four spaces
    pub fn to_pretty_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.fields.serialize(&mut ser)?;
        // serde_json only ever emits UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl From<Map<String, Value>> for ParsedRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ParsedRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = ParsedRecord::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}
