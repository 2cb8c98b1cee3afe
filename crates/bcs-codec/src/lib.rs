//! BCS: Binary Canonical Serialization driven by runtime schemas.
//!
//! This crate encodes and decodes values in the BCS wire format used by
//! Move-based chains. Types are described at runtime with [`TypeTag`]s and a
//! [`Registry`] of named struct, enum and alias definitions, so schemas can be
//! loaded or assembled without generating Rust types.
//!
//! # Quick Start
//!
//! ```rust
//! use bcs_codec::{Bcs, Value};
//!
//! let mut bcs = Bcs::with_move_prelude();
//! bcs.register_struct_str(
//!     "Coin",
//!     &[],
//!     &[("owner", "address"), ("value", "u64")],
//! )
//! .unwrap();
//!
//! let coin = Value::structure([
//!     ("owner", Value::byte_array(&[0xab; 32])),
//!     ("value", Value::U64(1_000)),
//! ]);
//!
//! let bytes = bcs.encode_str("Coin", &coin).unwrap();
//! assert_eq!(bytes.len(), 40);
//!
//! let decoded = bcs.decode_str("Coin", &bytes).unwrap();
//! assert_eq!(decoded, coin);
//! ```
//!
//! # Modules
//!
//! - [`model`]: Type tags, definitions, values and type-string parsing
//! - [`registry`]: Named type definitions and reference resolution
//! - [`codec`]: Primitive and container readers/writers
//! - [`engine`]: The [`Bcs`] codec tying schema and wire format together
//! - [`config`]: Depth, length and naming settings
//! - [`util`]: Hex, base58 and base64 text encodings
//! - [`error`]: Error types
//! - [`limits`]: Wire-format and default safety limits
//!
//! # Wire Format
//!
//! - Integers are fixed-width little-endian (`u8` through `u256`)
//! - `bool` is a single `0x00` or `0x01` byte
//! - Lengths and enum variant indices are ULEB128
//! - Fixed arrays and struct fields carry no framing
//! - Maps are written in the order given; no sorting is applied
//!
//! # Security
//!
//! The decoder is designed to safely handle untrusted input:
//! - Declared lengths are checked against the remaining input before allocation
//! - Nesting depth is bounded by [`BcsConfig::max_depth`]
//! - Non-canonical varints and trailing bytes are rejected

pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
pub mod limits;
pub mod model;
pub mod registry;
pub mod util;

// Re-export commonly used types at crate root
pub use codec::{Reader, UintWidth, Writer};
pub use config::{BcsConfig, TypeNaming};
pub use engine::Bcs;
pub use error::{DecodeError, EncodeError, EncodingError, Error, ErrorKind, SchemaError};
pub use model::{
    parse_type_tag, Definition, EncodedValue, EnumDef, FieldDef, StructDef, TypeRef, TypeTag,
    Value, VariantDef,
};
pub use registry::{Registry, Resolved};
pub use util::Encoding;

/// U256 as used by [`Value::U256`].
pub use alloy_primitives::U256;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
