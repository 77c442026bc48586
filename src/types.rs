//! Wire format types and utilities.

/// Maximum number of bytes for a varint-encoded u64.
/// A u64 has 64 bits and each varint byte carries 7 of them,
/// so ceil(64/7) = 10 bytes.
pub const MAX_VARINT_BYTES: usize = 10;

/// Wire types emitted by the encoder.
///
/// Only the two wire types a dynamically-typed tree can produce are
/// representable. Fixed-width (1, 5) and group (3, 4) wire types are never
/// written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WireType {
    /// Variable-length unsigned integer (LEB128).
    Varint = 0,
    /// Length-prefixed bytes: strings, byte blobs and nested messages.
    Bytes = 2,
}

impl WireType {
    /// Converts a u8 to a WireType.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(WireType::Varint),
            2 => Some(WireType::Bytes),
            _ => None,
        }
    }
}

/// Field tag containing field number and wire type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldTag {
    pub field_number: u32,
    pub wire_type: WireType,
}

impl FieldTag {
    /// Creates a new field tag.
    pub fn new(field_number: u32, wire_type: WireType) -> Self {
        Self {
            field_number,
            wire_type,
        }
    }

    /// Packs the tag as `field_number << 3 | wire_type`.
    ///
    /// Widened to u64 so every u32 field number fits without overflow.
    pub fn encode(&self) -> u64 {
        (u64::from(self.field_number) << 3) | (self.wire_type as u64)
    }

    /// Unpacks a tag value. Returns None for unknown wire types or field
    /// numbers that do not fit in a u32.
    pub fn decode(value: u64) -> Option<Self> {
        let wire_type = WireType::from_u8((value & 0x07) as u8)?;
        let field_number = u32::try_from(value >> 3).ok()?;
        Some(Self {
            field_number,
            wire_type,
        })
    }
}
