//! Error types for BCS encoding, decoding and schema resolution.

use thiserror::Error;

use crate::util::encoding::Encoding;

/// Error taxonomy shared by every error type in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// B001: Value does not fit the declared integer width
    Range,
    /// B002: Not enough bytes remain in the input
    TruncatedInput,
    /// B003: ULEB128 overflow, over-long or non-canonical
    MalformedVarint,
    /// B004: Boolean byte other than 0x00 or 0x01
    InvalidBoolean,
    /// B005: String bytes are not valid UTF-8
    InvalidUtf8,
    /// B006: Fixed array arity does not match the schema
    LengthMismatch,
    /// B007: Type name registered twice
    DuplicateDefinition,
    /// B008: Type name not registered
    UnknownType,
    /// B009: Recursion depth limit reached
    MaxDepthExceeded,
    /// B010: Schema is inconsistent (wrong kind, arity, unparsable type string)
    Schema,
    /// B011: Value shape does not match the type tag
    TypeMismatch,
    /// B012: Structurally invalid input (bad tag byte, trailing bytes, limits)
    Malformed,
    /// B013: Invalid hex/base58/base64 text
    Encoding,
}

impl ErrorKind {
    /// Returns the stable error code string (e.g., "B001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Range => "B001",
            ErrorKind::TruncatedInput => "B002",
            ErrorKind::MalformedVarint => "B003",
            ErrorKind::InvalidBoolean => "B004",
            ErrorKind::InvalidUtf8 => "B005",
            ErrorKind::LengthMismatch => "B006",
            ErrorKind::DuplicateDefinition => "B007",
            ErrorKind::UnknownType => "B008",
            ErrorKind::MaxDepthExceeded => "B009",
            ErrorKind::Schema => "B010",
            ErrorKind::TypeMismatch => "B011",
            ErrorKind::Malformed => "B012",
            ErrorKind::Encoding => "B013",
        }
    }
}

/// Error raised by the schema registry or the type-string parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("[B007] type `{name}` is already registered")]
    DuplicateDefinition { name: String },

    #[error("[B008] unknown type `{name}`")]
    UnknownType { name: String },

    #[error("[B010] `{name}` is registered as {found}, but was referenced as {expected}")]
    KindMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("[B010] `{name}` expects {expected} type argument(s), got {found}")]
    TypeArgCount {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("[B010] type parameter #{index} used outside of a generic definition")]
    UnboundParam { index: usize },

    #[error("[B010] alias `{name}` does not resolve to a concrete type")]
    AliasCycle { name: String },

    #[error("[B010] `{name}` declares {reason}")]
    InvalidDefinition { name: String, reason: String },

    #[error("[B010] invalid type string `{input}`: {reason}")]
    InvalidTypeString { input: String, reason: &'static str },
}

impl SchemaError {
    /// Returns the taxonomy kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SchemaError::DuplicateDefinition { .. } => ErrorKind::DuplicateDefinition,
            SchemaError::UnknownType { .. } => ErrorKind::UnknownType,
            _ => ErrorKind::Schema,
        }
    }
}

/// Error during encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("[B001] value {value} does not fit in {type_name}")]
    Range {
        type_name: &'static str,
        value: String,
    },

    #[error("[B006] fixed array expects {expected} elements, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("[B009] nesting depth exceeds maximum {max_depth}")]
    MaxDepthExceeded { max_depth: usize },

    #[error("[B011] expected a value of type {expected}, found {found}")]
    TypeMismatch { expected: String, found: &'static str },

    #[error("[B011] struct `{type_name}` is missing field `{field}`")]
    MissingField { type_name: String, field: String },

    #[error("[B011] struct `{type_name}` has no field `{field}`")]
    UnexpectedField { type_name: String, field: String },

    #[error("[B011] enum `{type_name}` has no variant `{variant}`")]
    UnknownVariant { type_name: String, variant: String },

    #[error("[B011] variant `{type_name}::{variant}` {reason}")]
    PayloadMismatch {
        type_name: String,
        variant: String,
        reason: &'static str,
    },

    #[error("[B012] {field} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("[B013] `{input}` is not valid {} text", .encoding.name())]
    InvalidByteText { encoding: Encoding, input: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl EncodeError {
    /// Returns the taxonomy kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EncodeError::Range { .. } => ErrorKind::Range,
            EncodeError::LengthMismatch { .. } => ErrorKind::LengthMismatch,
            EncodeError::MaxDepthExceeded { .. } => ErrorKind::MaxDepthExceeded,
            EncodeError::TypeMismatch { .. }
            | EncodeError::MissingField { .. }
            | EncodeError::UnexpectedField { .. }
            | EncodeError::UnknownVariant { .. }
            | EncodeError::PayloadMismatch { .. } => ErrorKind::TypeMismatch,
            EncodeError::LengthExceedsLimit { .. } => ErrorKind::Malformed,
            EncodeError::InvalidByteText { .. } => ErrorKind::Encoding,
            EncodeError::Schema(e) => e.kind(),
        }
    }
}

/// Error during decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("[B002] unexpected end of input while reading {context}: need {needed} byte(s), {remaining} remaining")]
    TruncatedInput {
        context: &'static str,
        needed: usize,
        remaining: usize,
    },

    #[error("[B003] uleb128 exceeds maximum length (10 bytes)")]
    VarintTooLong,

    #[error("[B003] uleb128 overflow (value exceeds u64)")]
    VarintOverflow,

    #[error("[B003] uleb128 is not minimally encoded")]
    VarintNotCanonical,

    #[error("[B004] invalid bool value: {value:#04x} (expected 0x00 or 0x01)")]
    InvalidBool { value: u8 },

    #[error("[B005] invalid UTF-8 in {context}")]
    InvalidUtf8 { context: &'static str },

    #[error("[B009] nesting depth exceeds maximum {max_depth}")]
    MaxDepthExceeded { max_depth: usize },

    #[error("[B012] invalid option tag: {value:#04x} (expected 0x00 or 0x01)")]
    InvalidOptionTag { value: u8 },

    #[error("[B012] enum `{type_name}` has no variant at index {index} ({variants} variants)")]
    InvalidVariantIndex {
        type_name: String,
        index: u64,
        variants: usize,
    },

    #[error("[B012] {context} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        context: &'static str,
        len: u64,
        max: usize,
    },

    #[error("[B012] {remaining} trailing byte(s) after decoded value")]
    TrailingBytes { remaining: usize },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl DecodeError {
    /// Returns the taxonomy kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::TruncatedInput { .. } => ErrorKind::TruncatedInput,
            DecodeError::VarintTooLong
            | DecodeError::VarintOverflow
            | DecodeError::VarintNotCanonical => ErrorKind::MalformedVarint,
            DecodeError::InvalidBool { .. } => ErrorKind::InvalidBoolean,
            DecodeError::InvalidUtf8 { .. } => ErrorKind::InvalidUtf8,
            DecodeError::MaxDepthExceeded { .. } => ErrorKind::MaxDepthExceeded,
            DecodeError::InvalidOptionTag { .. }
            | DecodeError::InvalidVariantIndex { .. }
            | DecodeError::LengthExceedsLimit { .. }
            | DecodeError::TrailingBytes { .. } => ErrorKind::Malformed,
            DecodeError::Schema(e) => e.kind(),
        }
    }
}

/// Error while converting between bytes and hex/base58/base64 text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodingError {
    #[error("[B013] invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("[B013] invalid base58: {0}")]
    Base58(#[from] bs58::decode::Error),

    #[error("[B013] invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("[B013] unknown encoding `{name}` (expected hex, base58 or base64)")]
    UnknownEncoding { name: String },
}

/// Umbrella error for entry points that parse type strings or text input
/// before encoding or decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

impl Error {
    /// Returns the taxonomy kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Schema(e) => e.kind(),
            Error::Encode(e) => e.kind(),
            Error::Decode(e) => e.kind(),
            Error::Encoding(_) => ErrorKind::Encoding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_codes_are_unique() {
        let kinds = [
            ErrorKind::Range,
            ErrorKind::TruncatedInput,
            ErrorKind::MalformedVarint,
            ErrorKind::InvalidBoolean,
            ErrorKind::InvalidUtf8,
            ErrorKind::LengthMismatch,
            ErrorKind::DuplicateDefinition,
            ErrorKind::UnknownType,
            ErrorKind::MaxDepthExceeded,
            ErrorKind::Schema,
            ErrorKind::TypeMismatch,
            ErrorKind::Malformed,
            ErrorKind::Encoding,
        ];
        let mut codes: Vec<_> = kinds.iter().map(|k| k.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn test_schema_error_propagates_kind() {
        let err: DecodeError = SchemaError::UnknownType { name: "Coin".into() }.into();
        assert_eq!(err.kind(), ErrorKind::UnknownType);

        let err: Error = EncodeError::from(SchemaError::DuplicateDefinition {
            name: "Coin".into(),
        })
        .into();
        assert_eq!(err.kind(), ErrorKind::DuplicateDefinition);
    }

    #[test]
    fn test_display_carries_code() {
        let err = DecodeError::InvalidBool { value: 5 };
        assert_eq!(
            err.to_string(),
            "[B004] invalid bool value: 0x05 (expected 0x00 or 0x01)"
        );
    }
}
