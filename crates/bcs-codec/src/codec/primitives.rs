//! Primitive encoding/decoding for the BCS wire format.
//!
//! Implements fixed-width little-endian unsigned integers, booleans and
//! ULEB128 varints. ULEB128 is only ever used for lengths and enum variant
//! indices; integers declared in a schema are always fixed width.

use alloy_primitives::U256;

use crate::error::{DecodeError, EncodeError};
use crate::limits::MAX_ULEB128_BYTES;

/// Bit widths of the unsigned integer types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UintWidth {
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
}

impl UintWidth {
    /// Returns the width in bits.
    pub fn bits(self) -> usize {
        self.byte_len() * 8
    }

    /// Returns the number of bytes on the wire.
    pub fn byte_len(self) -> usize {
        match self {
            UintWidth::U8 => 1,
            UintWidth::U16 => 2,
            UintWidth::U32 => 4,
            UintWidth::U64 => 8,
            UintWidth::U128 => 16,
            UintWidth::U256 => 32,
        }
    }

    /// Returns the type name as it appears in type strings.
    pub fn name(self) -> &'static str {
        match self {
            UintWidth::U8 => "u8",
            UintWidth::U16 => "u16",
            UintWidth::U32 => "u32",
            UintWidth::U64 => "u64",
            UintWidth::U128 => "u128",
            UintWidth::U256 => "u256",
        }
    }
}

// =============================================================================
// DECODING
// =============================================================================

/// Cursor over a byte slice for decoding.
///
/// Every read is bounds-checked; running off the end yields
/// [`DecodeError::TruncatedInput`] and never panics.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader from a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the current position in the data.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the remaining bytes.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Returns the number of remaining bytes.
    pub fn remaining_len(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns true if all data has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Moves the cursor back to an earlier position.
    pub(crate) fn rewind(&mut self, pos: usize) {
        debug_assert!(pos <= self.pos);
        self.pos = pos;
    }

    /// Reads a single byte.
    #[inline]
    pub fn read_byte(&mut self, context: &'static str) -> Result<u8, DecodeError> {
        if self.pos >= self.data.len() {
            return Err(DecodeError::TruncatedInput {
                context,
                needed: 1,
                remaining: 0,
            });
        }
        let byte = self.data[self.pos];
        self.pos += 1;
        Ok(byte)
    }

    /// Reads exactly n bytes.
    #[inline]
    pub fn read_bytes(&mut self, n: usize, context: &'static str) -> Result<&'a [u8], DecodeError> {
        let remaining = self.remaining_len();
        if n > remaining {
            return Err(DecodeError::TruncatedInput {
                context,
                needed: n,
                remaining,
            });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Reads exactly `N` bytes into an array.
    #[inline]
    pub fn read_array<const N: usize>(&mut self, context: &'static str) -> Result<[u8; N], DecodeError> {
        let bytes = self.read_bytes(N, context)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Reads a bool, rejecting any byte other than 0x00 and 0x01.
    pub fn read_bool(&mut self, context: &'static str) -> Result<bool, DecodeError> {
        match self.read_byte(context)? {
            0x00 => Ok(false),
            0x01 => Ok(true),
            value => Err(DecodeError::InvalidBool { value }),
        }
    }

    pub fn read_u8(&mut self, context: &'static str) -> Result<u8, DecodeError> {
        self.read_byte(context)
    }

    pub fn read_u16(&mut self, context: &'static str) -> Result<u16, DecodeError> {
        Ok(u16::from_le_bytes(self.read_array(context)?))
    }

    pub fn read_u32(&mut self, context: &'static str) -> Result<u32, DecodeError> {
        Ok(u32::from_le_bytes(self.read_array(context)?))
    }

    pub fn read_u64(&mut self, context: &'static str) -> Result<u64, DecodeError> {
        Ok(u64::from_le_bytes(self.read_array(context)?))
    }

    pub fn read_u128(&mut self, context: &'static str) -> Result<u128, DecodeError> {
        Ok(u128::from_le_bytes(self.read_array(context)?))
    }

    pub fn read_u256(&mut self, context: &'static str) -> Result<U256, DecodeError> {
        Ok(U256::from_le_bytes(self.read_array::<32>(context)?))
    }

    /// Reads an unsigned integer of the given width, widened to 256 bits.
    pub fn read_uint(&mut self, width: UintWidth, context: &'static str) -> Result<U256, DecodeError> {
        let bytes = self.read_bytes(width.byte_len(), context)?;
        let mut wide = [0u8; 32];
        wide[..bytes.len()].copy_from_slice(bytes);
        Ok(U256::from_le_bytes(wide))
    }

    /// Reads an unsigned ULEB128 varint.
    ///
    /// Rejects chains longer than 10 bytes, values above `u64::MAX`, and
    /// non-minimal encodings (a final byte of zero after a continuation).
    #[inline]
    pub fn read_uleb128(&mut self, context: &'static str) -> Result<u64, DecodeError> {
        let mut result: u64 = 0;
        let mut shift = 0;

        for i in 0..MAX_ULEB128_BYTES {
            let byte = self.read_byte(context)?;
            let value = (byte & 0x7F) as u64;

            if shift == 63 && value > 1 {
                return Err(DecodeError::VarintOverflow);
            }

            result |= value << shift;

            if byte & 0x80 == 0 {
                if byte == 0 && i > 0 {
                    return Err(DecodeError::VarintNotCanonical);
                }
                return Ok(result);
            }
            shift += 7;
        }

        Err(DecodeError::VarintTooLong)
    }

    /// Reads a ULEB128 length and checks it against `max`.
    pub fn read_len(&mut self, max: usize, context: &'static str) -> Result<usize, DecodeError> {
        let len = self.read_uleb128(context)?;
        if len > max as u64 {
            return Err(DecodeError::LengthExceedsLimit { context, len, max });
        }
        Ok(len as usize)
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Writer for encoding binary data.
#[derive(Debug, Clone, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Creates a new writer.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Creates a new writer with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Returns the written bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Returns a reference to the written bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Returns the number of bytes written.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if no bytes have been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Drops everything written after `len` bytes.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.buf.truncate(len);
    }

    /// Writes a single byte.
    #[inline]
    pub fn write_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Writes raw bytes.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.push(value as u8);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u128(&mut self, value: u128) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u256(&mut self, value: &U256) {
        self.buf.extend_from_slice(&value.to_le_bytes::<32>());
    }

    /// Writes `value` as a little-endian integer of the given width.
    ///
    /// Fails with [`EncodeError::Range`] if the value needs more bits.
    pub fn write_uint(&mut self, value: &U256, width: UintWidth) -> Result<(), EncodeError> {
        if value.bit_len() > width.bits() {
            return Err(EncodeError::Range {
                type_name: width.name(),
                value: value.to_string(),
            });
        }
        let bytes = value.to_le_bytes::<32>();
        self.buf.extend_from_slice(&bytes[..width.byte_len()]);
        Ok(())
    }

    /// Writes an unsigned ULEB128 varint.
    #[inline]
    pub fn write_uleb128(&mut self, mut value: u64) {
        let mut buf = [0u8; MAX_ULEB128_BYTES];
        let mut len = 0;
        loop {
            let mut byte = (value & 0x7F) as u8;
            value >>= 7;
            if value != 0 {
                byte |= 0x80;
            }
            buf[len] = byte;
            len += 1;
            if value == 0 {
                break;
            }
        }
        self.buf.extend_from_slice(&buf[..len]);
    }
}

/// Returns the number of bytes `value` occupies as ULEB128.
pub fn uleb128_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}
