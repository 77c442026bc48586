//! Looseproto - schema-less protobuf wire-format encoder for Rust
//!
//! Encodes a dynamically-typed tree (typically a parsed JSON document whose
//! keys are field numbers) into protobuf binary, without generated code or
//! a `.proto` description. Integers become varints, strings and nested
//! mappings become length-delimited fields, and sequences become repeated
//! fields. An optional [`Overrides`] table forces a wire type per field path
//! where the value's type alone is ambiguous.
//!
//! # Example
//!
//! ```rust
//! use looseproto::{convert, Overrides, Result, Value};
//!
//! fn main() -> Result<()> {
//!     let tree = Value::from_json_str(r#"{"1": "hello", "2": 5, "7": 65}"#)?;
//!     let overrides = Overrides::from_json_str(r#"{"7": 2}"#)?;
//!
//!     let bytes = convert(&tree, Some(&overrides))?;
//!     assert_eq!(
//!         bytes,
//!         [0x0a, 0x05, b'h', b'e', b'l', b'l', b'o', 0x10, 0x05, 0x3a, 0x01, 0x41]
//!     );
//!     Ok(())
//! }
//! ```

mod encoder;
mod error;
mod path;
mod types;
mod value;
mod writer;

pub use encoder::{EncodeOptions, Encoder, Mode, DEFAULT_MAX_DEPTH};
pub use error::{Error, Result};
pub use path::{FieldPath, Overrides};
pub use types::{FieldTag, WireType, MAX_VARINT_BYTES};
pub use value::{Map, Unsupported, Value};
pub use writer::{encode_bytes, encode_string, encode_tag, encode_uint32, encode_varint, Writer};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Encodes a top-level message with default options.
///
/// Equivalent to [`Encoder::encode_message`] with the root path.
pub fn convert(tree: &Value, overrides: Option<&Overrides>) -> Result<Vec<u8>> {
    convert_with(tree, overrides, EncodeOptions::default())
}

/// Encodes a top-level message with explicit options.
pub fn convert_with(
    tree: &Value,
    overrides: Option<&Overrides>,
    options: EncodeOptions,
) -> Result<Vec<u8>> {
    Encoder::with_options(overrides, options).encode(tree)
}

/// Parses a JSON document and encodes it with default options.
pub fn convert_json(json: &str, overrides: Option<&Overrides>) -> Result<Vec<u8>> {
    convert(&Value::from_json_str(json)?, overrides)
}

/// Encodes a top-level message and returns it as lowercase hex.
pub fn convert_to_hex(tree: &Value, overrides: Option<&Overrides>) -> Result<String> {
    convert(tree, overrides).map(hex::encode)
}
