//! Dynamically-typed input tree.

use indexmap::IndexMap;

use crate::error::Result;

/// A node of the input tree.
///
/// Produced by whatever parsed the source document; the encoder only reads it.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Encoded as a length-delimited UTF-8 string.
    Text(String),
    /// Encoded as a varint, or as a single byte when overridden to
    /// length-delimited. Wide enough to carry every u64 and i64 so that
    /// out-of-range input can be reported instead of miscoded.
    Integer(i128),
    /// Repeated field: each element is emitted under the same field number.
    Sequence(Vec<Value>),
    /// Nested message keyed by decimal field numbers.
    Mapping(Map),
    /// Scalar with no wire representation.
    Unsupported(Unsupported),
}

/// Scalars the encoder cannot represent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Unsupported {
    Null,
    Bool(bool),
    Float(f64),
}

impl Unsupported {
    /// Short name used in errors and log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Unsupported::Null => "null",
            Unsupported::Bool(_) => "bool",
            Unsupported::Float(_) => "float",
        }
    }
}

impl Value {
    /// Short name of this node's type.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Integer(_) => "integer",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
            Value::Unsupported(u) => u.kind(),
        }
    }

    /// Returns the mapping if this node is one.
    pub fn as_mapping(&self) -> Option<&Map> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Parses a JSON document, keeping object keys in document order.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let json: serde_json::Value = serde_json::from_str(s)?;
        Ok(Value::from(json))
    }
}

/// Mapping from field-number key to node, in insertion order.
///
/// Keys stay as the strings the document carried; they are parsed into
/// field numbers only while encoding.
#[derive(Debug, Clone, Default)]
pub struct Map {
    entries: IndexMap<String, Value>,
}

impl Map {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field. An existing key keeps its position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Looks up a field by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Iterates over fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Field order is part of the encoding, so equality is order-sensitive.
impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len() && self.entries.iter().eq(other.entries.iter())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Map {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(i128::from(value))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Integer(i128::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(i128::from(value))
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Sequence(value)
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Value::Mapping(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match json {
            Json::Null => Value::Unsupported(Unsupported::Null),
            Json::Bool(b) => Value::Unsupported(Unsupported::Bool(b)),
            Json::Number(n) => number_to_value(&n),
            Json::String(s) => Value::Text(s),
            Json::Array(items) => Value::Sequence(items.into_iter().map(Value::from).collect()),
            // `preserve_order` keeps serde_json's map in document order.
            Json::Object(obj) => Value::Mapping(obj.into_iter().collect()),
        }
    }
}

/// Integral JSON numbers become `Integer` whatever their magnitude, so that
/// out-of-range values reach the encoder's range check. Integers beyond
/// i128 saturate, which keeps them out of range.
fn number_to_value(n: &serde_json::Number) -> Value {
    if let Some(u) = n.as_u64() {
        return Value::Integer(i128::from(u));
    }
    if let Some(i) = n.as_i64() {
        return Value::Integer(i128::from(i));
    }

    // `arbitrary_precision` keeps the literal text of the number.
    let text = n.to_string();
    let digits = text.strip_prefix('-').unwrap_or(&text);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        let value = text.parse::<i128>().unwrap_or(if text.starts_with('-') {
            i128::MIN
        } else {
            i128::MAX
        });
        return Value::Integer(value);
    }

    Value::Unsupported(Unsupported::Float(n.as_f64().unwrap_or(f64::NAN)))
}
