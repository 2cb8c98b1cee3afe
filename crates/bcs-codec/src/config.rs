//! Engine configuration.

use crate::limits::{ADDRESS_LENGTH, DEFAULT_MAX_DEPTH, MAX_SEQUENCE_LEN};
use crate::util::encoding::Encoding;

/// Naming convention used when parsing and printing type strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypeNaming {
    /// `vector<T>` and `string`.
    #[default]
    Move,
    /// `Vec<T>` and `String`.
    Rust,
}

impl TypeNaming {
    /// Keyword for variable-length sequences.
    pub fn vector_keyword(self) -> &'static str {
        match self {
            TypeNaming::Move => "vector",
            TypeNaming::Rust => "Vec",
        }
    }

    /// Keyword for UTF-8 strings.
    pub fn string_keyword(self) -> &'static str {
        match self {
            TypeNaming::Move => "string",
            TypeNaming::Rust => "String",
        }
    }
}

/// Options controlling encode/decode behavior.
///
/// None of these options change the bytes produced for a valid value; they
/// only bound what the engine accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BcsConfig {
    /// Maximum nesting depth before failing with `MaxDepthExceeded`.
    pub max_depth: usize,
    /// Maximum element count for vectors, maps, bytes and strings.
    pub max_sequence_len: usize,
    /// Accept input with bytes left over after the decoded value.
    pub allow_trailing_bytes: bool,
    /// Convention for type strings.
    pub naming: TypeNaming,
    /// Byte length of the prelude `address` type.
    pub address_length: usize,
    /// Text encoding accepted for `[u8; N]` values given as strings.
    pub address_encoding: Encoding,
}

impl Default for BcsConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_sequence_len: MAX_SEQUENCE_LEN,
            allow_trailing_bytes: false,
            naming: TypeNaming::Move,
            address_length: ADDRESS_LENGTH,
            address_encoding: Encoding::Hex,
        }
    }
}

impl BcsConfig {
    /// Move-flavored type strings (`vector<u8>`, `string`).
    pub fn move_config() -> Self {
        Self::default()
    }

    /// Rust-flavored type strings (`Vec<u8>`, `String`).
    pub fn rust_config() -> Self {
        Self {
            naming: TypeNaming::Rust,
            ..Self::default()
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_sequence_len(mut self, max_sequence_len: usize) -> Self {
        self.max_sequence_len = max_sequence_len;
        self
    }

    pub fn with_trailing_bytes(mut self, allow: bool) -> Self {
        self.allow_trailing_bytes = allow;
        self
    }

    /// Sets the length of the prelude `address` (20 for EVM-style chains).
    pub fn with_address_length(mut self, len: usize) -> Self {
        self.address_length = len;
        self
    }

    pub fn with_address_encoding(mut self, encoding: Encoding) -> Self {
        self.address_encoding = encoding;
        self
    }
}
