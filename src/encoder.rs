//! Schema-less message encoder.
//!
//! Walks a [`Map`] by recursive descent and emits each entry as a protobuf
//! field. Wire types follow the dynamic type of the value:
//!
//! | value        | wire type                                    |
//! |--------------|----------------------------------------------|
//! | text         | length-delimited UTF-8                       |
//! | integer      | varint, or a one-byte blob when overridden   |
//! | mapping      | length-delimited nested message              |
//! | sequence     | one field per element, same field number     |
//!
//! Nesting depth is bounded by [`EncodeOptions::max_depth`].

use log::{debug, trace, warn};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::path::{FieldPath, Overrides};
use crate::types::WireType;
use crate::value::{Map, Value};
use crate::writer::Writer;

/// Default nesting limit, matching protobuf's usual recursion limit.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// How the encoder treats input it cannot represent faithfully.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Unsupported values and integers too wide for a byte field are errors.
    #[default]
    Strict,
    /// Unsupported values (booleans included) are dropped and byte fields
    /// keep the low 8 bits. Each case is logged.
    Permissive,
}

/// Encoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EncodeOptions {
    /// Deepest nested message allowed below the top-level one.
    pub max_depth: usize,
    pub mode: Mode,
}

impl EncodeOptions {
    /// Sets the nesting limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the mode.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Default options in permissive mode.
    pub fn permissive() -> Self {
        Self::default().with_mode(Mode::Permissive)
    }
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            mode: Mode::Strict,
        }
    }
}

/// Encoder turns input trees into protobuf wire-format bytes.
///
/// Holds no per-call state, so one encoder can serve any number of calls.
#[derive(Debug, Clone, Copy)]
pub struct Encoder<'a> {
    overrides: Option<&'a Overrides>,
    options: EncodeOptions,
}

impl<'a> Encoder<'a> {
    /// Creates an encoder with default options.
    pub fn new(overrides: Option<&'a Overrides>) -> Self {
        Self::with_options(overrides, EncodeOptions::default())
    }

    /// Creates an encoder with the given options.
    pub fn with_options(overrides: Option<&'a Overrides>, options: EncodeOptions) -> Self {
        Self { overrides, options }
    }

    /// Returns the encoder's options.
    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    /// Encodes a top-level message. The root must be a mapping.
    pub fn encode(&self, root: &Value) -> Result<Vec<u8>> {
        match root {
            Value::Mapping(message) => self.encode_message(message, &FieldPath::root()),
            other => Err(Error::InvalidRoot { kind: other.kind() }),
        }
    }

    /// Encodes a message whose fields live under `path`.
    ///
    /// Override lookups use `path` followed by each field's number.
    pub fn encode_message(&self, message: &Map, path: &FieldPath) -> Result<Vec<u8>> {
        let mut path = path.clone();
        let mut writer = Writer::new();
        self.write_message(&mut writer, message, &mut path, 0)?;
        Ok(writer.into_bytes())
    }

    /// Encodes `message` as a length-delimited field `field_number` of the
    /// message at `path`.
    pub fn encode_nested_message(
        &self,
        field_number: u32,
        message: &Map,
        path: &FieldPath,
    ) -> Result<Vec<u8>> {
        let mut path = path.child(field_number);
        let mut writer = Writer::new();
        self.write_nested_message(&mut writer, field_number, message, &mut path, 0)?;
        Ok(writer.into_bytes())
    }

    fn write_message(
        &self,
        writer: &mut Writer,
        message: &Map,
        path: &mut FieldPath,
        depth: usize,
    ) -> Result<()> {
        if depth > self.options.max_depth {
            return Err(Error::MaxDepthExceeded {
                limit: self.options.max_depth,
            });
        }

        for (key, value) in message.iter() {
            let field_number = parse_field_number(key)?;
            path.push(field_number);
            let result = self.write_field(writer, field_number, value, path, depth);
            path.pop();
            result?;
        }
        Ok(())
    }

    /// Writes one entry. `path` already ends with `field_number`.
    fn write_field(
        &self,
        writer: &mut Writer,
        field_number: u32,
        value: &Value,
        path: &mut FieldPath,
        depth: usize,
    ) -> Result<()> {
        let hint = self.overrides.and_then(|o| o.get(path.as_slice()));
        trace!("field {} ({}) hint={:?}", path, value.kind(), hint);

        match value {
            Value::Text(text) => {
                writer.write_string_field(field_number, text);
                Ok(())
            }
            Value::Integer(n) => self.write_integer(writer, field_number, *n, hint),
            Value::Mapping(message) => {
                self.write_nested_message(writer, field_number, message, path, depth)
            }
            Value::Sequence(items) => {
                // Every element shares the field's path, and therefore its hint.
                for item in items {
                    match item {
                        Value::Integer(n) => self.write_integer(writer, field_number, *n, hint)?,
                        Value::Mapping(message) => {
                            self.write_nested_message(writer, field_number, message, path, depth)?
                        }
                        other => self.skip(field_number, other.kind())?,
                    }
                }
                Ok(())
            }
            Value::Unsupported(u) => self.skip(field_number, u.kind()),
        }
    }

    fn write_nested_message(
        &self,
        writer: &mut Writer,
        field_number: u32,
        message: &Map,
        path: &mut FieldPath,
        depth: usize,
    ) -> Result<()> {
        // Encode separately so the length prefix is the exact payload size.
        let mut nested = Writer::new();
        self.write_message(&mut nested, message, path, depth + 1)?;
        writer.write_message_field(field_number, nested.as_bytes());
        Ok(())
    }

    fn write_integer(
        &self,
        writer: &mut Writer,
        field_number: u32,
        value: i128,
        hint: Option<WireType>,
    ) -> Result<()> {
        let value =
            u64::try_from(value).map_err(|_| Error::InvalidInteger { field_number, value })?;

        match hint {
            Some(WireType::Bytes) => {
                let byte = self.single_byte(field_number, value)?;
                writer.write_bytes_field(field_number, &[byte]);
            }
            Some(WireType::Varint) | None => writer.write_uint64_field(field_number, value),
        }
        Ok(())
    }

    fn single_byte(&self, field_number: u32, value: u64) -> Result<u8> {
        match (u8::try_from(value), self.options.mode) {
            (Ok(byte), _) => Ok(byte),
            (Err(_), Mode::Strict) => {
                Err(Error::IntegerOutOfRangeForByteEncoding { field_number, value })
            }
            (Err(_), Mode::Permissive) => {
                warn!(
                    "field {}: {} truncated to {} for single-byte encoding",
                    field_number, value, value as u8
                );
                Ok(value as u8)
            }
        }
    }

    fn skip(&self, field_number: u32, kind: &'static str) -> Result<()> {
        match self.options.mode {
            Mode::Strict => Err(Error::unsupported(field_number, kind)),
            Mode::Permissive => {
                debug!("field {}: skipping unsupported {} value", field_number, kind);
                Ok(())
            }
        }
    }
}

fn parse_field_number(key: &str) -> Result<u32> {
    key.parse::<u32>()
        .map_err(|_| Error::invalid_field_key(key))
}
