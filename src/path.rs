//! Field paths and the wire-type override table.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::types::WireType;

/// Separator between field numbers in the text form of a path.
const SEPARATOR: char = '.';

/// Position of a field through nested messages, outermost field first.
///
/// The text form joins field numbers with `.`; a trailing separator is
/// accepted, so `"3.5"` and `"3.5."` name the same field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath(Vec<u32>);

impl FieldPath {
    /// The empty path of a top-level message.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns the path extended by one field.
    pub fn child(&self, field_number: u32) -> Self {
        let mut path = self.clone();
        path.push(field_number);
        path
    }

    pub fn push(&mut self, field_number: u32) {
        self.0.push(field_number);
    }

    pub fn pop(&mut self) -> Option<u32> {
        self.0.pop()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    /// Number of fields in the path.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u32>> for FieldPath {
    fn from(fields: Vec<u32>) -> Self {
        Self(fields)
    }
}

impl From<&[u32]> for FieldPath {
    fn from(fields: &[u32]) -> Self {
        Self(fields.to_vec())
    }
}

impl Borrow<[u32]> for FieldPath {
    fn borrow(&self) -> &[u32] {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", SEPARATOR)?;
            }
            write!(f, "{}", field)?;
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.strip_suffix(SEPARATOR).unwrap_or(s);
        if trimmed.is_empty() {
            return Err(Error::InvalidFieldPath(s.to_string()));
        }
        trimmed
            .split(SEPARATOR)
            .map(|segment| {
                segment
                    .parse::<u32>()
                    .map_err(|_| Error::InvalidFieldPath(s.to_string()))
            })
            .collect::<Result<Vec<u32>>>()
            .map(FieldPath)
    }
}

/// Converts a numeric wire-type code from configuration.
fn wire_type_from_code(code: u64) -> Result<WireType> {
    u8::try_from(code)
        .ok()
        .and_then(WireType::from_u8)
        .ok_or(Error::InvalidWireType(code))
}

/// Explicit wire types for fields whose dynamic type is ambiguous.
///
/// Read-only during encoding; one table can be shared by any number of
/// concurrent encode calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "HashMap<String, u64>")]
pub struct Overrides {
    entries: HashMap<FieldPath, WireType>,
}

impl Overrides {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the wire type for a path, returning the previous one.
    pub fn insert(&mut self, path: impl Into<FieldPath>, wire_type: WireType) -> Option<WireType> {
        self.entries.insert(path.into(), wire_type)
    }

    /// Looks up the wire type for a path.
    pub fn get(&self, path: &[u32]) -> Option<WireType> {
        self.entries.get(path).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the table in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, WireType)> {
        self.entries.iter().map(|(p, w)| (p, *w))
    }

    /// Parses a JSON object of the form `{"3.5": 2, "7": 0}`.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let raw: HashMap<String, u64> = serde_json::from_str(s)?;
        Self::try_from(raw)
    }
}

impl TryFrom<HashMap<String, u64>> for Overrides {
    type Error = Error;

    /// Keys that spell the same path (`"3.5"` and `"3.5."`) must agree on
    /// the wire type.
    fn try_from(raw: HashMap<String, u64>) -> Result<Self> {
        let mut overrides = Overrides::new();
        for (key, code) in raw {
            let path: FieldPath = key.parse()?;
            let wire_type = wire_type_from_code(code)?;
            match overrides.entries.get(&path) {
                Some(existing) if *existing != wire_type => {
                    return Err(Error::ConflictingOverride(path.to_string()));
                }
                Some(_) => {}
                None => {
                    overrides.entries.insert(path, wire_type);
                }
            }
        }
        Ok(overrides)
    }
}

impl FromIterator<(FieldPath, WireType)> for Overrides {
    fn from_iter<I: IntoIterator<Item = (FieldPath, WireType)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
