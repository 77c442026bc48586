//! Protobuf wire-format writer.

use crate::types::{FieldTag, WireType, MAX_VARINT_BYTES};

const INITIAL_CAPACITY: usize = 256;

/// Writer appends protobuf wire-format data to a binary buffer.
///
/// Bytes are only ever appended, so the order of calls is the order of the
/// encoded fields.
pub struct Writer {
    buffer: Vec<u8>,
}

impl Writer {
    /// Creates a new writer with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// Creates a new writer with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Returns the current length of the buffer.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns the encoded bytes as a slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Consumes the writer and returns the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Resets the writer for reuse.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Writes an unsigned varint (LEB128, least significant group first).
    pub fn write_varint(&mut self, mut value: u64) {
        while value > 0x7f {
            self.buffer.push((value as u8 & 0x7f) | 0x80);
            value >>= 7;
        }
        self.buffer.push(value as u8);
    }

    /// Writes a field tag.
    pub fn write_tag(&mut self, field_number: u32, wire_type: WireType) {
        self.write_varint(FieldTag::new(field_number, wire_type).encode());
    }

    /// Writes length-prefixed bytes.
    pub fn write_length_prefixed_bytes(&mut self, data: &[u8]) {
        self.write_varint(data.len() as u64);
        self.buffer.extend_from_slice(data);
    }

    /// Writes a tagged field with uint32 value.
    pub fn write_uint32_field(&mut self, field_number: u32, value: u32) {
        self.write_uint64_field(field_number, u64::from(value));
    }

    /// Writes a tagged field with uint64 value.
    pub fn write_uint64_field(&mut self, field_number: u32, value: u64) {
        self.write_tag(field_number, WireType::Varint);
        self.write_varint(value);
    }

    /// Writes a tagged field with string value (UTF-8 payload).
    pub fn write_string_field(&mut self, field_number: u32, value: &str) {
        self.write_bytes_field(field_number, value.as_bytes());
    }

    /// Writes a tagged field with bytes value.
    pub fn write_bytes_field(&mut self, field_number: u32, value: &[u8]) {
        self.write_tag(field_number, WireType::Bytes);
        self.write_length_prefixed_bytes(value);
    }

    /// Writes an already-encoded message as a length-delimited field.
    pub fn write_message_field(&mut self, field_number: u32, message: &[u8]) {
        self.write_bytes_field(field_number, message);
    }
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

/// Encodes a value as a standalone varint.
pub fn encode_varint(value: u64) -> Vec<u8> {
    let mut writer = Writer::with_capacity(MAX_VARINT_BYTES);
    writer.write_varint(value);
    writer.into_bytes()
}

/// Encodes a field tag as a standalone varint.
pub fn encode_tag(field_number: u32, wire_type: WireType) -> Vec<u8> {
    let mut writer = Writer::with_capacity(MAX_VARINT_BYTES);
    writer.write_tag(field_number, wire_type);
    writer.into_bytes()
}

/// Encodes a complete length-delimited string field.
pub fn encode_string(field_number: u32, value: &str) -> Vec<u8> {
    let mut writer = Writer::with_capacity(value.len() + 2 * MAX_VARINT_BYTES);
    writer.write_string_field(field_number, value);
    writer.into_bytes()
}

/// Encodes a complete length-delimited bytes field.
pub fn encode_bytes(field_number: u32, value: &[u8]) -> Vec<u8> {
    let mut writer = Writer::with_capacity(value.len() + 2 * MAX_VARINT_BYTES);
    writer.write_bytes_field(field_number, value);
    writer.into_bytes()
}

/// Encodes a complete varint field.
pub fn encode_uint32(field_number: u32, value: u32) -> Vec<u8> {
    let mut writer = Writer::with_capacity(2 * MAX_VARINT_BYTES);
    writer.write_uint32_field(field_number, value);
    writer.into_bytes()
}
