//! Minimal wire reader used to check encoder output.

use looseproto::{FieldTag, WireType, MAX_VARINT_BYTES};

/// A decoded field: tag plus raw payload.
#[derive(Debug, PartialEq)]
pub enum Field<'a> {
    Varint(u32, u64),
    Bytes(u32, &'a [u8]),
}

pub struct Reader<'a> {
    buffer: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            buffer: data,
            pos: 0,
        }
    }

    pub fn has_more(&self) -> bool {
        self.pos < self.buffer.len()
    }

    pub fn read_varint64(&mut self) -> Option<u64> {
        let mut result: u64 = 0;
        let mut shift = 0;

        for i in 0..MAX_VARINT_BYTES {
            let b = *self.buffer.get(self.pos)?;
            self.pos += 1;

            // The 10th byte carries only bit 63.
            if i == 9 && b > 1 {
                return None;
            }

            result |= ((b & 0x7f) as u64) << shift;
            if b & 0x80 == 0 {
                return Some(result);
            }
            shift += 7;
        }
        None
    }

    pub fn read_tag(&mut self) -> Option<FieldTag> {
        FieldTag::decode(self.read_varint64()?)
    }

    pub fn read_length_prefixed_bytes(&mut self) -> Option<&'a [u8]> {
        let length = self.read_varint64()? as usize;
        let end = self.pos.checked_add(length)?;
        let bytes = self.buffer.get(self.pos..end)?;
        self.pos = end;
        Some(bytes)
    }

    pub fn read_field(&mut self) -> Option<Field<'a>> {
        let tag = self.read_tag()?;
        match tag.wire_type {
            WireType::Varint => Some(Field::Varint(tag.field_number, self.read_varint64()?)),
            WireType::Bytes => Some(Field::Bytes(
                tag.field_number,
                self.read_length_prefixed_bytes()?,
            )),
        }
    }
}

/// Decodes every field of a message, panicking on malformed input.
pub fn read_fields(data: &[u8]) -> Vec<Field<'_>> {
    let mut reader = Reader::new(data);
    let mut fields = Vec::new();
    while reader.has_more() {
        fields.push(reader.read_field().expect("malformed field"));
    }
    fields
}
