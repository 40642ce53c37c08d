//! Error types for score encoding/decoding, validation and schema setup.

use thiserror::Error;

/// Error during binary decoding of a score record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("unexpected end of input while reading {context}: needed {needed} bytes, {available} available")]
    UnexpectedEof {
        context: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("read {read} bytes of {total}")]
    TrailingBytes { read: usize, total: usize },

    #[error("in field {field:?}: {source}")]
    InField {
        field: String,
        #[source]
        source: Box<CodecError>,
    },
}

impl CodecError {
    /// Wraps this error with the name of the record field it occurred in.
    pub fn in_field(self, field: impl Into<String>) -> Self {
        CodecError::InField {
            field: field.into(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping field wrappers.
    pub fn root(&self) -> &CodecError {
        match self {
            CodecError::InField { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Error during binary encoding of a score record.
///
/// Values that passed validation always encode. Anything else is refused
/// rather than written as bytes that would decode to a different value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("value {value} does not fit a {length}-byte {} integer", signedness(.signed))]
    IntOverflow {
        value: i128,
        length: usize,
        signed: bool,
    },

    #[error("list length {len} exceeds maximum {max}")]
    LengthExceedsLimit { len: usize, max: usize },

    #[error("value does not match category: expected {expected}")]
    ShapeMismatch { expected: &'static str },

    #[error("record of type {found:?} cannot be encoded as {expected:?}")]
    SchemaMismatch { expected: String, found: String },

    #[error("in field {field:?}: {source}")]
    InField {
        field: String,
        #[source]
        source: Box<EncodeError>,
    },
}

impl EncodeError {
    /// Wraps this error with the name of the record field it occurred in.
    pub fn in_field(self, field: impl Into<String>) -> Self {
        EncodeError::InField {
            field: field.into(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping field wrappers.
    pub fn root(&self) -> &EncodeError {
        match self {
            EncodeError::InField { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Error during semantic validation of a score.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("expected unsigned integer, got {value}")]
    NegativeUnsigned { value: i128 },

    #[error("value {value} overflows {length} bytes")]
    IntOverflow { value: i128, length: usize },

    #[error("list length overflow: {len} (max {max})")]
    ListTooLong { len: usize, max: usize },

    #[error("value does not match category: expected {expected}")]
    TypeMismatch { expected: &'static str },

    #[error("record of type {found:?} where {expected:?} was expected")]
    SchemaMismatch { expected: String, found: String },

    #[error("in field {field:?}: {source}")]
    InField {
        field: String,
        #[source]
        source: Box<ValidationError>,
    },

    #[error("{0}")]
    Rule(String),
}

impl ValidationError {
    /// Wraps this error with the name of the record field it occurred in.
    pub fn in_field(self, field: impl Into<String>) -> Self {
        ValidationError::InField {
            field: field.into(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping field wrappers.
    pub fn root(&self) -> &ValidationError {
        match self {
            ValidationError::InField { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Error while building a schema or addressing its fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("integer length {length} must be between 1 and {max} bytes")]
    InvalidIntLength { length: usize, max: usize },

    #[error("default {default} does not fit a {length}-byte {} integer", signedness(.signed))]
    DefaultOutOfRange {
        default: i128,
        length: usize,
        signed: bool,
    },

    #[error("duplicate field name {name:?}")]
    DuplicateField { name: String },

    #[error("unknown field {name:?}")]
    UnknownField { name: String },

    #[error("field {field:?} holds a {expected} value")]
    ShapeMismatch { field: String, expected: &'static str },
}

fn signedness(signed: &bool) -> &'static str {
    if *signed { "signed" } else { "unsigned" }
}

/// Error from tournament bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TournamentError {
    #[error("block {id:?} is already registered")]
    DuplicateBlock { id: String },

    #[error("ranking {id:?} is already registered")]
    DuplicateRanking { id: String },

    #[error("unknown block {id:?}")]
    UnknownBlock { id: String },

    #[error("unknown ranking {id:?}")]
    UnknownRanking { id: String },

    #[error("failed to decode score in block {block:?}: {source}")]
    Codec {
        block: String,
        #[source]
        source: CodecError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_error_root() {
        let err = CodecError::TrailingBytes { read: 2, total: 3 }
            .in_field("inner")
            .in_field("outer");
        assert_eq!(err.root(), &CodecError::TrailingBytes { read: 2, total: 3 });
        assert_eq!(
            err.to_string(),
            "in field \"outer\": in field \"inner\": read 2 bytes of 3"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::IntOverflow { value: 256, length: 1 };
        assert_eq!(err.to_string(), "value 256 overflows 1 bytes");

        let err = SchemaError::DefaultOutOfRange {
            default: -1,
            length: 2,
            signed: false,
        };
        assert_eq!(err.to_string(), "default -1 does not fit a 2-byte unsigned integer");
    }

    #[test]
    fn test_encode_error_root() {
        let err = EncodeError::IntOverflow {
            value: 300,
            length: 1,
            signed: false,
        }
        .in_field("points");
        assert!(matches!(err.root(), EncodeError::IntOverflow { value: 300, .. }));
        assert_eq!(
            err.to_string(),
            "in field \"points\": value 300 does not fit a 1-byte unsigned integer"
        );
    }
}
