//! Decoding limits and wire constants.
//!
//! Every length read from untrusted input is checked against these bounds
//! (and against the remaining input) before anything is allocated.

/// Maximum number of bytes in a ULEB128 varint carrying a u64.
pub const MAX_ULEB128_BYTES: usize = 10;

/// Default maximum nesting depth for encode/decode recursion.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Default maximum element count accepted for vectors, maps, bytes and strings.
///
/// Matches the `2^31 - 1` sequence bound used by canonical BCS implementations.
pub const MAX_SEQUENCE_LEN: usize = (1 << 31) - 1;

/// Byte length of an on-chain address in the Move prelude.
pub const ADDRESS_LENGTH: usize = 32;
