//! Error types for encoding operations.

use thiserror::Error;

/// Result type for encoding operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for encoding operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A mapping key is not a decimal field number.
    #[error("invalid field key: {key:?} is not a decimal field number")]
    InvalidFieldKey { key: String },

    /// Integer outside the encodable range (negative, or wider than u64).
    #[error("invalid integer {value} for field {field_number}: must be in 0..=u64::MAX")]
    InvalidInteger { field_number: u32, value: i128 },

    /// Integer declared as length-delimited does not fit in one byte.
    #[error("integer {value} for field {field_number} does not fit in a single byte")]
    IntegerOutOfRangeForByteEncoding { field_number: u32, value: u64 },

    /// Value kind the encoder has no wire representation for.
    #[error("unsupported value type {kind} for field {field_number}")]
    UnsupportedValueType {
        field_number: u32,
        kind: &'static str,
    },

    /// Input tree nests deeper than the configured limit.
    #[error("maximum nesting depth of {limit} exceeded")]
    MaxDepthExceeded { limit: usize },

    /// Top-level value is not a mapping.
    #[error("message root must be a mapping, got {kind}")]
    InvalidRoot { kind: &'static str },

    /// Override table names a wire type the encoder cannot emit.
    #[error("invalid wire type: {0}")]
    InvalidWireType(u64),

    /// Override table key is not a dotted sequence of field numbers.
    #[error("invalid field path: {0:?}")]
    InvalidFieldPath(String),

    /// Two override keys name the same path with different wire types.
    #[error("conflicting wire types for field path {0:?}")]
    ConflictingOverride(String),

    /// JSON parse error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Creates an invalid field key error.
    pub fn invalid_field_key(key: impl Into<String>) -> Self {
        Self::InvalidFieldKey { key: key.into() }
    }

    /// Creates an unsupported value type error.
    pub fn unsupported(field_number: u32, kind: &'static str) -> Self {
        Self::UnsupportedValueType { field_number, kind }
    }
}
